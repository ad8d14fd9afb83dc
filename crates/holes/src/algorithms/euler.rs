use imageproc::region_labelling::Connectivity;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{HoleError, Result},
    traits::EulerCalculator,
    types::{LOW, PaddedPartMask, ensure_two_valued},
};

/// Corner pattern counts gathered over every 2x2 window of a mask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EulerTally {
    /// Windows with exactly one part pixel
    pub exterior: i64,
    /// Windows with exactly three part pixels
    pub interior: i64,
    /// Windows holding two part pixels on a diagonal. Recorded, never scored.
    pub diagonal: i64,
}

impl EulerTally {
    pub fn difference(&self) -> i64 {
        self.exterior - self.interior
    }

    /// `(exterior - interior) / 4`, refusing to truncate a remainder
    pub fn characteristic(&self) -> Result<i64> {
        let difference = self.difference();
        if difference % 4 != 0 {
            return Err(HoleError::NonIntegralEuler { difference });
        }
        Ok(difference / 4)
    }
}

/// Euler characteristic by 2x2 corner-pattern counting (Gray's method),
/// scored for four-connected parts.
#[derive(Debug, Clone, Default)]
pub struct QuadEulerCalculator;

impl QuadEulerCalculator {
    /// Scan every 2x2 window of `mask` and count its corner patterns
    pub fn tally(&self, mask: &PaddedPartMask) -> Result<EulerTally> {
        let image = mask.image();
        ensure_two_valued(image)?;

        let width = image.width() as usize;
        let rows: Vec<&[u8]> = image.as_raw().chunks_exact(width).collect();

        let mut tally = EulerTally::default();
        for pair in rows.windows(2) {
            let (top, bottom) = (pair[0], pair[1]);
            for (upper, lower) in top.windows(2).zip(bottom.windows(2)) {
                let sum = [upper[0], upper[1], lower[0], lower[1]]
                    .iter()
                    .filter(|&&v| v != LOW)
                    .count();
                match sum {
                    1 => tally.exterior += 1,
                    3 => tally.interior += 1,
                    2 if upper[0] == lower[1] => tally.diagonal += 1,
                    _ => {}
                }
            }
        }

        debug!(
            exterior = tally.exterior,
            interior = tally.interior,
            diagonal = tally.diagonal,
            "corner patterns counted"
        );
        Ok(tally)
    }
}

impl EulerCalculator for QuadEulerCalculator {
    fn connectivity(&self) -> Connectivity {
        Connectivity::Four
    }

    fn euler_characteristic(&self, mask: &PaddedPartMask) -> Result<i64> {
        self.tally(mask)?.characteristic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BinaryMask, HIGH, Polarity};
    use image::{GrayImage, Luma};

    fn padded(pattern: &[&str]) -> PaddedPartMask {
        let height = pattern.len() as u32;
        let width = pattern[0].len() as u32;
        let mut img = GrayImage::new(width, height);
        for (y, row) in pattern.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    img.put_pixel(x as u32, y as u32, Luma([HIGH]));
                }
            }
        }
        let mask = BinaryMask::new(img, Polarity::PartIsHigh).expect("valid mask");
        PaddedPartMask::from_mask(&mask).expect("padding")
    }

    #[test]
    fn test_solid_block() {
        let tally = QuadEulerCalculator
            .tally(&padded(&["####", "####", "####"]))
            .expect("tally");
        assert_eq!(tally.exterior, 4);
        assert_eq!(tally.interior, 0);
        assert_eq!(tally.characteristic().expect("integral"), 1);
    }

    #[test]
    fn test_single_pixel() {
        let chi = QuadEulerCalculator
            .euler_characteristic(&padded(&["#"]))
            .expect("chi");
        assert_eq!(chi, 1);
    }

    #[test]
    fn test_ring() {
        let tally = QuadEulerCalculator
            .tally(&padded(&["###", "#.#", "###"]))
            .expect("tally");
        assert_eq!(tally.exterior, 4);
        assert_eq!(tally.interior, 4);
        assert_eq!(tally.characteristic().expect("integral"), 0);
    }

    #[test]
    fn test_two_holes() {
        let chi = QuadEulerCalculator
            .euler_characteristic(&padded(&[
                "#######",
                "#.###.#",
                "#######",
            ]))
            .expect("chi");
        assert_eq!(chi, -1);
    }

    #[test]
    fn test_empty_mask() {
        let tally = QuadEulerCalculator
            .tally(&padded(&["...", "..."]))
            .expect("tally");
        assert_eq!(tally, EulerTally::default());
    }

    #[test]
    fn test_diagonal_pattern_is_not_scored() {
        let tally = QuadEulerCalculator
            .tally(&padded(&["#.", ".#"]))
            .expect("tally");
        assert_eq!(tally.exterior, 6);
        assert_eq!(tally.interior, 0);
        assert_eq!(tally.diagonal, 1);
        assert!(matches!(
            tally.characteristic(),
            Err(HoleError::NonIntegralEuler { difference: 6 })
        ));
    }

    #[test]
    fn test_reports_four_connectivity() {
        assert_eq!(
            EulerCalculator::connectivity(&QuadEulerCalculator),
            Connectivity::Four
        );
    }
}
