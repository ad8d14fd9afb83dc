use imageproc::region_labelling::Connectivity;

use crate::{
    error::Result,
    types::{BinaryMask, PaddedPartMask, Raster},
};

/// Trait for turning a grayscale raster into a two-valued mask
pub trait Binarizer: Send + Sync {
    fn binarize(&self, raster: &Raster) -> Result<BinaryMask>;
}

/// Trait for counting connected part regions
pub trait ComponentCounter: Send + Sync {
    /// Neighbourhood used to decide whether two pixels belong together
    fn connectivity(&self) -> Connectivity;

    /// Count the part components of a padded mask
    fn count_components(&self, mask: &PaddedPartMask) -> Result<u32>;
}

/// Trait for computing the Euler characteristic of a part
pub trait EulerCalculator: Send + Sync {
    /// Neighbourhood the characteristic is defined for
    fn connectivity(&self) -> Connectivity;

    fn euler_characteristic(&self, mask: &PaddedPartMask) -> Result<i64>;
}

impl<T> ComponentCounter for Box<T>
where
    T: ComponentCounter + ?Sized,
{
    fn connectivity(&self) -> Connectivity {
        (**self).connectivity()
    }

    fn count_components(&self, mask: &PaddedPartMask) -> Result<u32> {
        (**self).count_components(mask)
    }
}

impl<T> EulerCalculator for Box<T>
where
    T: EulerCalculator + ?Sized,
{
    fn connectivity(&self) -> Connectivity {
        (**self).connectivity()
    }

    fn euler_characteristic(&self, mask: &PaddedPartMask) -> Result<i64> {
        (**self).euler_characteristic(mask)
    }
}
