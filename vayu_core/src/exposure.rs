//! Cigarette-equivalent exposure.
//!
//! Uses the rule of thumb that breathing 22 µg/m³ of PM2.5 for a full day is
//! comparable to smoking one cigarette.

use crate::types::Exposure;

/// PM2.5 concentration (µg/m³) over 24 hours equivalent to one cigarette
pub const CIGARETTE_PM25_REFERENCE: f64 = 22.0;

/// Hours in the reference exposure window
pub const REFERENCE_HOURS: f64 = 24.0;

/// Cigarette equivalent of breathing `concentration` for `hours`, rounded to
/// two decimals. An absent concentration gives [`Exposure::NoData`].
pub fn compute_exposure_equivalent(concentration: Option<f64>, hours: f64) -> Exposure {
    match concentration {
        Some(c) => {
            let cigarettes = (c / CIGARETTE_PM25_REFERENCE) * (hours / REFERENCE_HOURS);
            Exposure::Cigarettes(round2(cigarettes))
        }
        None => Exposure::NoData,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
