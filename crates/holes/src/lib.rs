//! # Hole Counting Library
//!
//! Counts the topological holes of a solid part photographed against a
//! contrasting background.
//!
//! ## Core Features
//!
//! - **Adaptive binarization**: Otsu threshold scaled by a tunable multiplier
//! - **Component counting**: 4-connected labelling of the part
//! - **Euler characteristic**: 2x2 corner-pattern counting on the same mask
//! - **Hole count**: `holes = components - euler`, clamped at zero
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use holes::{Pipeline, io::load_raster};
//!
//! let pipeline = Pipeline::builder().build()?;
//!
//! let raster = load_raster("part.png")?;
//! let inspection = pipeline.process(&raster)?;
//! println!("Holes: {}", inspection.holes());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Counting a ready-made mask
//!
//! ```rust
//! use holes::{BinaryMask, HoleCounter, Polarity};
//! use image::{GrayImage, Luma};
//!
//! // White ring on black: one hole.
//! let mut img = GrayImage::from_pixel(3, 3, Luma([255u8]));
//! img.put_pixel(1, 1, Luma([0u8]));
//! let mask = BinaryMask::new(img, Polarity::PartIsHigh)?;
//!
//! let report = HoleCounter::default().count(&mask)?;
//! assert_eq!(report.holes, 1);
//! # Ok::<(), holes::HoleError>(())
//! ```

pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod counter;
pub mod pipeline;
pub mod config;
pub mod io;

// Re-exports for convenience
pub use error::{HoleError, Result};
pub use types::{BinaryMask, HoleReport, Inspection, PaddedPartMask, Polarity, Raster, Threshold};
pub use traits::*;
pub use algorithms::*;
pub use counter::HoleCounter;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use config::HoleCountConfig;
pub use imageproc::region_labelling::Connectivity;

/// Count the holes of a grayscale raster with default settings
pub fn count_holes(raster: &Raster) -> Result<u32> {
    Ok(Pipeline::builder().build()?.process(raster)?.holes())
}
