//! Sector classifier
//!
//! Infers the position label of an arbitrary board coordinate. `top` runs from
//! 0 (attacking end) to 100 (own goal line), `left` from 0 (left touchline) to
//! 100 (right touchline).
//!
//! | band            | left < a | center | left > b | a / b   |
//! |-----------------|----------|--------|----------|---------|
//! | top >= 85       |    -     | GOL    |    -     | 35 / 65 |
//! | top >= 70       | LTE      | ZAG    | LTD      | 30 / 70 |
//! | top >= 55       | ME       | VOL    | MD       | 35 / 65 |
//! | top >= 35       | ME       | MEI    | MD       | 30 / 70 |
//! | top >= 15       | PTE      | ATA    | PTD      | 30 / 70 |
//! | otherwise       |    -     | ATA    |    -     |         |
//!
//! Bands are tested top to bottom and the first match wins, so a value sitting
//! exactly on a band edge belongs to the band listed first (`top = 70` is a
//! defender, `top = 85` at the center is the goalkeeper). Outside the
//! goalkeeper box (`left` not strictly between 35 and 65) a deep coordinate
//! falls through to the back line. Left/right edges are strict.

use crate::catalog::Sector;

pub const GOAL_BAND: f64 = 85.0;
pub const BACK_LINE_BAND: f64 = 70.0;
pub const HOLDING_BAND: f64 = 55.0;
pub const MIDFIELD_BAND: f64 = 35.0;
pub const FORWARD_BAND: f64 = 15.0;

/// Classify a normalized coordinate. Total and deterministic for any input,
/// including out-of-range and NaN values (which land in `ATA`).
pub fn classify(top: f64, left: f64) -> Sector {
    if top >= GOAL_BAND && left > 35.0 && left < 65.0 {
        return Sector::Gol;
    }

    if top >= BACK_LINE_BAND {
        return flank(left, 30.0, 70.0, Sector::Lte, Sector::Zag, Sector::Ltd);
    }

    if top >= HOLDING_BAND {
        return flank(left, 35.0, 65.0, Sector::Me, Sector::Vol, Sector::Md);
    }

    if top >= MIDFIELD_BAND {
        return flank(left, 30.0, 70.0, Sector::Me, Sector::Mei, Sector::Md);
    }

    if top >= FORWARD_BAND {
        return flank(left, 30.0, 70.0, Sector::Pte, Sector::Ata, Sector::Ptd);
    }

    Sector::Ata
}

#[inline]
fn flank(left: f64, low: f64, high: f64, lhs: Sector, center: Sector, rhs: Sector) -> Sector {
    if left < low {
        lhs
    } else if left > high {
        rhs
    } else {
        center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_table() {
        assert_eq!(classify(85.0, 50.0), Sector::Gol);
        assert_eq!(classify(86.0, 50.0), Sector::Gol);
        assert_eq!(classify(70.0, 50.0), Sector::Zag);
        assert_eq!(classify(71.0, 20.0), Sector::Lte);
        assert_eq!(classify(15.0, 50.0), Sector::Ata);
        assert_eq!(classify(16.0, 50.0), Sector::Ata);
    }

    #[test]
    fn test_goal_box_is_narrow() {
        assert_eq!(classify(92.0, 50.0), Sector::Gol);
        assert_eq!(classify(92.0, 35.0), Sector::Zag);
        assert_eq!(classify(92.0, 65.0), Sector::Zag);
        assert_eq!(classify(92.0, 20.0), Sector::Lte);
        assert_eq!(classify(92.0, 80.0), Sector::Ltd);
    }

    #[test]
    fn test_back_line_flanks() {
        assert_eq!(classify(75.0, 29.0), Sector::Lte);
        assert_eq!(classify(75.0, 30.0), Sector::Zag);
        assert_eq!(classify(75.0, 70.0), Sector::Zag);
        assert_eq!(classify(75.0, 71.0), Sector::Ltd);
    }

    #[test]
    fn test_holding_band() {
        assert_eq!(classify(60.0, 34.0), Sector::Me);
        assert_eq!(classify(60.0, 35.0), Sector::Vol);
        assert_eq!(classify(60.0, 66.0), Sector::Md);
        assert_eq!(classify(55.0, 50.0), Sector::Vol);
    }

    #[test]
    fn test_midfield_band() {
        assert_eq!(classify(50.0, 25.0), Sector::Me);
        assert_eq!(classify(50.0, 50.0), Sector::Mei);
        assert_eq!(classify(50.0, 75.0), Sector::Md);
        assert_eq!(classify(35.0, 50.0), Sector::Mei);
    }

    #[test]
    fn test_forward_band_and_top_edge() {
        assert_eq!(classify(25.0, 10.0), Sector::Pte);
        assert_eq!(classify(25.0, 90.0), Sector::Ptd);
        assert_eq!(classify(25.0, 50.0), Sector::Ata);
        assert_eq!(classify(5.0, 5.0), Sector::Ata);
        assert_eq!(classify(0.0, 100.0), Sector::Ata);
    }

    #[test]
    fn test_catalog_defaults_classify_sensibly() {
        // Default goalkeeper spots sit inside the goal box
        assert_eq!(classify(88.0, 50.0), Sector::Gol);
        assert_eq!(classify(90.0, 50.0), Sector::Gol);
        // 4-2-3-1 holding pair
        assert_eq!(classify(58.0, 40.0), Sector::Vol);
        assert_eq!(classify(58.0, 60.0), Sector::Vol);
    }

    #[test]
    fn test_nan_is_total() {
        assert_eq!(classify(f64::NAN, 50.0), Sector::Ata);
        assert_eq!(classify(50.0, f64::NAN), Sector::Mei);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every coordinate of the board maps to a field sector (never BANCO)
            #[test]
            fn prop_classify_total(top in 0.0f64..=100.0, left in 0.0f64..=100.0) {
                let sector = classify(top, left);
                prop_assert!(Sector::ALL.contains(&sector));
                prop_assert_ne!(sector, Sector::Banco);
            }

            /// Property: same input, same output
            #[test]
            fn prop_classify_deterministic(top in -50.0f64..150.0, left in -50.0f64..150.0) {
                prop_assert_eq!(classify(top, left), classify(top, left));
            }

            /// Property: the goalkeeper label only appears in the deep central box
            #[test]
            fn prop_gol_only_in_box(top in 0.0f64..=100.0, left in 0.0f64..=100.0) {
                if classify(top, left) == Sector::Gol {
                    prop_assert!(top >= 85.0 && left > 35.0 && left < 65.0);
                }
            }
        }
    }
}
