pub mod builder;

use tracing::info;

use crate::{
    algorithms::OtsuBinarizer,
    counter::HoleCounter,
    error::Result,
    traits::{ComponentCounter, EulerCalculator},
    types::{BinaryMask, HoleReport, Inspection, Raster},
};

/// Counter pair as held by a [`Pipeline`]
pub type DynHoleCounter = HoleCounter<Box<dyn ComponentCounter>, Box<dyn EulerCalculator>>;

/// Binarization followed by hole counting
pub struct Pipeline {
    binarizer: OtsuBinarizer,
    hole_counter: DynHoleCounter,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(binarizer: OtsuBinarizer, hole_counter: DynHoleCounter) -> Self {
        Self {
            binarizer,
            hole_counter,
        }
    }

    /// Process a raster through the entire pipeline
    pub fn process(&self, raster: &Raster) -> Result<Inspection> {
        let (image_width, image_height) = raster.dimensions();

        // Step 1: Otsu threshold scaled by the multiplier
        let (mask, threshold) = self.binarizer.binarize_with_threshold(raster)?;

        // Step 2: components and Euler characteristic of the part
        let report = self.hole_counter.count(&mask)?;

        info!(
            width = image_width,
            height = image_height,
            threshold = threshold.effective,
            holes = report.holes,
            "raster inspected"
        );

        Ok(Inspection {
            mask,
            threshold,
            report,
            image_width,
            image_height,
        })
    }

    /// Count holes of an already binarized mask
    pub fn count_mask(&self, mask: &BinaryMask) -> Result<HoleReport> {
        self.hole_counter.count(mask)
    }

    pub fn binarizer(&self) -> &OtsuBinarizer {
        &self.binarizer
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: Otsu x {} binarization ({} part), 4-connected hole counting",
            self.binarizer.threshold_multiplier, self.binarizer.polarity
        )
    }
}
