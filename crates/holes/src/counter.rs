use tracing::{debug, info, warn};

use crate::{
    algorithms::{LabellingComponentCounter, QuadEulerCalculator},
    error::{HoleError, Result},
    traits::{ComponentCounter, EulerCalculator},
    types::{BinaryMask, HoleReport, PaddedPartMask},
};

/// Counts holes as `components - euler characteristic`.
///
/// The counter and the Euler calculator are checked for matching
/// connectivity when the `HoleCounter` is built, and both always measure the
/// same padded mask.
#[derive(Debug, Clone)]
pub struct HoleCounter<C = LabellingComponentCounter, E = QuadEulerCalculator>
where
    C: ComponentCounter,
    E: EulerCalculator,
{
    component_counter: C,
    euler_calculator: E,
}

impl<C, E> HoleCounter<C, E>
where
    C: ComponentCounter,
    E: EulerCalculator,
{
    pub fn new(component_counter: C, euler_calculator: E) -> Result<Self> {
        let components = component_counter.connectivity();
        let euler = euler_calculator.connectivity();
        if components != euler {
            return Err(HoleError::ConnectivityMismatch { components, euler });
        }

        Ok(Self {
            component_counter,
            euler_calculator,
        })
    }

    /// Count the holes of the part in `mask`
    pub fn count(&self, mask: &BinaryMask) -> Result<HoleReport> {
        if mask.part_pixel_count() == 0 {
            debug!("mask has no part pixels");
            return Ok(HoleReport::empty());
        }

        let padded = PaddedPartMask::from_mask(mask)?;
        self.measure(&padded)
    }

    /// Measure an already padded part mask
    pub fn measure(&self, padded: &PaddedPartMask) -> Result<HoleReport> {
        if !padded.has_part() {
            return Ok(HoleReport::empty());
        }

        let components = self.component_counter.count_components(padded)?;
        let euler = self.euler_calculator.euler_characteristic(padded)?;

        let raw = i64::from(components) - euler;
        let clamped = raw < 0;
        if clamped {
            warn!(components, euler, "negative hole count clamped to zero");
        }
        let holes = u32::try_from(raw.max(0))
            .map_err(|_| HoleError::InvalidInput(format!("hole count {raw} out of range")))?;

        info!(components, euler, holes, "holes counted");
        Ok(HoleReport {
            components,
            euler,
            holes,
            clamped,
        })
    }
}

impl Default for HoleCounter {
    fn default() -> Self {
        Self {
            component_counter: LabellingComponentCounter::default(),
            euler_calculator: QuadEulerCalculator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HIGH, LOW, Polarity};
    use image::{GrayImage, Luma};
    use imageproc::region_labelling::Connectivity;

    /// Dark part (`#`) on a light background, as the binarizer emits it.
    fn part_low_mask(pattern: &[&str]) -> BinaryMask {
        let height = pattern.len() as u32;
        let width = pattern[0].len() as u32;
        let mut img = GrayImage::from_pixel(width, height, Luma([HIGH]));
        for (y, row) in pattern.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    img.put_pixel(x as u32, y as u32, Luma([LOW]));
                }
            }
        }
        BinaryMask::new(img, Polarity::PartIsLow).expect("valid mask")
    }

    fn count(pattern: &[&str]) -> HoleReport {
        HoleCounter::default()
            .count(&part_low_mask(pattern))
            .expect("Should count holes")
    }

    #[test]
    fn test_all_background() {
        let report = count(&["....", "....", "...."]);
        assert_eq!(report, HoleReport::empty());
    }

    #[test]
    fn test_filled_rectangle() {
        let report = count(&[
            "......",
            ".####.",
            ".####.",
            "......",
        ]);
        assert_eq!((report.components, report.euler, report.holes), (1, 1, 0));
    }

    #[test]
    fn test_rectangle_with_one_hole() {
        let report = count(&[
            ".......",
            ".#####.",
            ".#...#.",
            ".#...#.",
            ".#####.",
            ".......",
        ]);
        assert_eq!((report.components, report.euler, report.holes), (1, 0, 1));
    }

    #[test]
    fn test_rectangle_with_two_holes() {
        let report = count(&[
            ".........",
            ".#######.",
            ".#..#..#.",
            ".#..#..#.",
            ".#######.",
            ".........",
        ]);
        assert_eq!((report.components, report.euler, report.holes), (1, -1, 2));
    }

    #[test]
    fn test_two_disjoint_rectangles() {
        let report = count(&[
            "..........",
            ".###..###.",
            ".###..###.",
            "..........",
        ]);
        assert_eq!((report.components, report.euler, report.holes), (2, 2, 0));
    }

    #[test]
    fn test_part_touching_image_edge() {
        let report = count(&[
            "#####",
            "#...#",
            "#####",
        ]);
        assert_eq!(report.holes, 1);
    }

    #[test]
    fn test_polarity_is_respected() {
        let low = part_low_mask(&[
            ".....",
            ".###.",
            ".#.#.",
            ".###.",
            ".....",
        ]);
        let mut inverted = low.image().clone();
        image::imageops::invert(&mut inverted);
        let high = BinaryMask::new(inverted, Polarity::PartIsHigh).expect("valid mask");

        let counter = HoleCounter::default();
        assert_eq!(
            counter.count(&low).expect("count"),
            counter.count(&high).expect("count")
        );
        assert_eq!(counter.count(&high).expect("count").holes, 1);
    }

    #[test]
    fn test_border_invariance() {
        let pattern = [
            "........",
            ".######.",
            ".#..#.#.",
            ".######.",
            "........",
        ];
        let mask = part_low_mask(&pattern);
        let (width, height) = mask.dimensions();

        let mut framed = GrayImage::from_pixel(width + 2, height + 2, Luma([HIGH]));
        image::imageops::replace(&mut framed, mask.image(), 1, 1);
        let framed = BinaryMask::new(framed, Polarity::PartIsLow).expect("valid mask");

        let counter = HoleCounter::default();
        assert_eq!(
            counter.count(&mask).expect("count").holes,
            counter.count(&framed).expect("count").holes
        );
    }

    #[test]
    fn test_deterministic() {
        let pattern = [
            ".......",
            ".#####.",
            ".#.#.#.",
            ".#####.",
            ".......",
        ];
        let first = count(&pattern);
        for _ in 0..5 {
            assert_eq!(count(&pattern), first);
        }
        assert_eq!(first.holes, 2);
    }

    #[test]
    fn test_rejects_eight_connected_counter() {
        let result = HoleCounter::new(
            LabellingComponentCounter {
                connectivity: Connectivity::Eight,
            },
            QuadEulerCalculator,
        );
        assert!(matches!(
            result,
            Err(HoleError::ConnectivityMismatch {
                components: Connectivity::Eight,
                euler: Connectivity::Four,
            })
        ));
    }

    #[test]
    fn test_diagonal_contact_is_surfaced() {
        let mask = part_low_mask(&[
            "....",
            ".#..",
            "..#.",
            "....",
        ]);
        assert!(matches!(
            HoleCounter::default().count(&mask),
            Err(HoleError::NonIntegralEuler { .. })
        ));
    }
}
