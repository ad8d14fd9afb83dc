use image::{DynamicImage, GrayImage, Luma, imageops};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{HoleError, Result};

/// Low sentinel of a binary mask
pub const LOW: u8 = 0;
/// High sentinel of a binary mask
pub const HIGH: u8 = 255;

/// A non-empty single-channel 8-bit grayscale image
#[derive(Debug, Clone, PartialEq)]
pub struct Raster(GrayImage);

impl Raster {
    pub fn new(image: GrayImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(HoleError::InvalidInput(format!(
                "raster must have positive dimensions, got {}x{}",
                image.width(),
                image.height()
            )));
        }
        Ok(Self(image))
    }

    pub fn image(&self) -> &GrayImage {
        &self.0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn into_image(self) -> GrayImage {
        self.0
    }
}

impl TryFrom<DynamicImage> for Raster {
    type Error = HoleError;

    fn try_from(image: DynamicImage) -> Result<Self> {
        match image {
            DynamicImage::ImageLuma8(gray) => Self::new(gray),
            other => Err(HoleError::InvalidInput(format!(
                "expected a single-channel 8-bit image, got {:?}",
                other.color()
            ))),
        }
    }
}

/// Which sentinel value of a mask is the solid part
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Polarity {
    /// Dark part on a light background (holes are light as well)
    #[default]
    PartIsLow,
    /// Light part on a dark background
    PartIsHigh,
}

impl Polarity {
    /// Pixel value the part has under this polarity
    pub fn part_value(self) -> u8 {
        match self {
            Self::PartIsLow => LOW,
            Self::PartIsHigh => HIGH,
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            Self::PartIsLow => Self::PartIsHigh,
            Self::PartIsHigh => Self::PartIsLow,
        }
    }
}

/// Fails unless every pixel is one of the two sentinels.
pub(crate) fn ensure_two_valued(image: &GrayImage) -> Result<()> {
    if let Some((x, y, Luma([value]))) = image
        .enumerate_pixels()
        .find(|(_, _, Luma([v]))| *v != LOW && *v != HIGH)
    {
        return Err(HoleError::InvalidInput(format!(
            "mask is not two-valued: pixel ({x}, {y}) has value {value}"
        )));
    }
    Ok(())
}

/// A strictly two-valued (0/255) mask tagged with its polarity
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: GrayImage,
    polarity: Polarity,
}

impl BinaryMask {
    pub fn new(image: GrayImage, polarity: Polarity) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(HoleError::InvalidInput("mask is empty".to_string()));
        }
        ensure_two_valued(&image)?;
        Ok(Self { image, polarity })
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn into_image(self) -> GrayImage {
        self.image
    }

    /// Number of pixels belonging to the part
    pub fn part_pixel_count(&self) -> usize {
        let part = self.polarity.part_value();
        self.image.as_raw().iter().filter(|&&v| v == part).count()
    }

    /// The same mask with the part as the high sentinel.
    pub fn to_part_high(&self) -> BinaryMask {
        match self.polarity {
            Polarity::PartIsHigh => self.clone(),
            Polarity::PartIsLow => {
                let mut image = self.image.clone();
                imageops::invert(&mut image);
                BinaryMask {
                    image,
                    polarity: Polarity::PartIsHigh,
                }
            }
        }
    }
}

/// Part-high mask surrounded by a one pixel background frame.
///
/// Component counting and the Euler scan both consume this type, so the
/// polarity fix and the border are applied exactly once for both.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedPartMask {
    image: GrayImage,
}

impl PaddedPartMask {
    pub fn from_mask(mask: &BinaryMask) -> Result<Self> {
        let part = mask.to_part_high();
        let (width, height) = part.dimensions();

        let mut image = GrayImage::from_pixel(width + 2, height + 2, Luma([LOW]));
        imageops::replace(&mut image, part.image(), 1, 1);

        let expected = (width + 2, height + 2);
        if image.dimensions() != expected {
            return Err(HoleError::DimensionMismatch {
                expected,
                actual: image.dimensions(),
            });
        }

        Ok(Self { image })
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn has_part(&self) -> bool {
        self.image.as_raw().contains(&HIGH)
    }
}

/// Threshold chosen by the binarizer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Threshold {
    /// Otsu level of the raster
    pub otsu: u8,
    pub multiplier: f64,
    /// Cut value actually applied, clamped to [0, 255]
    pub effective: f64,
}

/// Outcome of one hole count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HoleReport {
    /// 4-connected part components
    pub components: u32,
    /// Euler characteristic of the part
    pub euler: i64,
    pub holes: u32,
    /// True when `components - euler` was negative and clamped to zero
    pub clamped: bool,
}

impl HoleReport {
    pub fn empty() -> Self {
        Self {
            components: 0,
            euler: 0,
            holes: 0,
            clamped: false,
        }
    }
}

/// Mask and count produced for one raster
#[derive(Debug, Clone)]
pub struct Inspection {
    pub mask: BinaryMask,
    pub threshold: Threshold,
    pub report: HoleReport,
    pub image_width: u32,
    pub image_height: u32,
}

impl Inspection {
    pub fn holes(&self) -> u32 {
        self.report.holes
    }
}
