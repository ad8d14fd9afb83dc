use std::collections::BTreeSet;

use image::Luma;
use imageproc::region_labelling::{Connectivity, connected_components};
use tracing::debug;

use crate::{
    error::{HoleError, Result},
    traits::ComponentCounter,
    types::{LOW, PaddedPartMask},
};

/// Imageproc-based component counter
///
/// Labels the part pixels with `connected_components` and counts the distinct
/// non-zero labels. Four-connectivity is the default and the only
/// neighbourhood the Euler scan accepts as a partner.
#[derive(Debug, Clone)]
pub struct LabellingComponentCounter {
    pub connectivity: Connectivity,
}

impl Default for LabellingComponentCounter {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Four,
        }
    }
}

impl ComponentCounter for LabellingComponentCounter {
    fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    fn count_components(&self, mask: &PaddedPartMask) -> Result<u32> {
        let labels = connected_components(mask.image(), self.connectivity, Luma([LOW]));

        if labels.dimensions() != mask.dimensions() {
            return Err(HoleError::DimensionMismatch {
                expected: mask.dimensions(),
                actual: labels.dimensions(),
            });
        }

        let distinct: BTreeSet<u32> = labels
            .pixels()
            .map(|p| p.0[0])
            .filter(|&label| label != 0)
            .collect();
        let count = u32::try_from(distinct.len()).map_err(|_| {
            HoleError::InvalidInput(format!("too many components: {}", distinct.len()))
        })?;

        debug!(components = count, connectivity = ?self.connectivity, "components labelled");
        Ok(count)
    }
}
