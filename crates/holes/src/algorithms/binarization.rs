use image::Luma;
use tracing::debug;

use crate::{
    error::{HoleError, Result},
    traits::Binarizer,
    types::{BinaryMask, HIGH, LOW, Polarity, Raster, Threshold},
};

/// Multiplier applied to the Otsu level unless configured otherwise
pub const DEFAULT_THRESHOLD_MULTIPLIER: f64 = 1.2;

/// Scale an Otsu level and clamp the result to the 8-bit intensity range.
pub fn scaled_threshold(otsu: u8, multiplier: f64) -> f64 {
    (f64::from(otsu) * multiplier).clamp(0.0, f64::from(u8::MAX))
}

/// Otsu thresholding with a multiplicative bias on the computed level.
///
/// Pixels at or above the effective threshold become the high sentinel,
/// everything else the low one. Photographs of a dark part on a light
/// backdrop therefore come out as [`Polarity::PartIsLow`].
#[derive(Debug, Clone)]
pub struct OtsuBinarizer {
    pub threshold_multiplier: f64,
    pub polarity: Polarity,
}

impl Default for OtsuBinarizer {
    fn default() -> Self {
        Self {
            threshold_multiplier: DEFAULT_THRESHOLD_MULTIPLIER,
            polarity: Polarity::PartIsLow,
        }
    }
}

impl OtsuBinarizer {
    pub fn new(threshold_multiplier: f64, polarity: Polarity) -> Result<Self> {
        validate_multiplier(threshold_multiplier)?;
        Ok(Self {
            threshold_multiplier,
            polarity,
        })
    }

    /// Compute the Otsu level of `raster` and the cut value derived from it
    pub fn threshold(&self, raster: &Raster) -> Result<Threshold> {
        validate_multiplier(self.threshold_multiplier)?;

        let otsu = imageproc::contrast::otsu_level(raster.image());
        let effective = scaled_threshold(otsu, self.threshold_multiplier);
        debug!(otsu, multiplier = self.threshold_multiplier, effective, "threshold selected");

        Ok(Threshold {
            otsu,
            multiplier: self.threshold_multiplier,
            effective,
        })
    }

    /// Binarize and also return the threshold that was applied
    pub fn binarize_with_threshold(&self, raster: &Raster) -> Result<(BinaryMask, Threshold)> {
        let threshold = self.threshold(raster)?;

        let mut binary = raster.image().clone();
        for p in binary.pixels_mut() {
            *p = if f64::from(p.0[0]) >= threshold.effective {
                Luma([HIGH])
            } else {
                Luma([LOW])
            };
        }

        Ok((BinaryMask::new(binary, self.polarity)?, threshold))
    }
}

impl Binarizer for OtsuBinarizer {
    fn binarize(&self, raster: &Raster) -> Result<BinaryMask> {
        self.binarize_with_threshold(raster).map(|(mask, _)| mask)
    }
}

fn validate_multiplier(multiplier: f64) -> Result<()> {
    if !multiplier.is_finite() {
        return Err(HoleError::InvalidInput(format!(
            "threshold multiplier must be finite, got {multiplier}"
        )));
    }
    Ok(())
}
