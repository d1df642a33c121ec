//! US AQI conversion.
//!
//! Concentrations are converted by piecewise-linear interpolation over a
//! fixed breakpoint table. Table rows are published with a 0.1 µg/m³ step
//! between one row's high and the next row's low, so each row is treated as
//! covering `[low, next.low)`; the last row is closed at its high. Values in
//! the step (e.g. 12.05) interpolate along the lower row.

use crate::types::{AqiCategory, Breakpoint, Pollutant, ALL_CATEGORIES};
use serde::Serialize;

/// PM2.5 breakpoints (µg/m³, 24-hour)
pub const PM25_BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 12.0, 0.0, 50.0),
    Breakpoint::new(12.1, 35.4, 51.0, 100.0),
    Breakpoint::new(35.5, 55.4, 101.0, 150.0),
    Breakpoint::new(55.5, 150.4, 151.0, 200.0),
    Breakpoint::new(150.5, 250.4, 201.0, 300.0),
    Breakpoint::new(250.5, 500.4, 301.0, 500.0),
];

/// PM10 breakpoints (µg/m³, 24-hour)
pub const PM10_BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint::new(0.0, 54.0, 0.0, 50.0),
    Breakpoint::new(55.0, 154.0, 51.0, 100.0),
    Breakpoint::new(155.0, 254.0, 101.0, 150.0),
    Breakpoint::new(255.0, 354.0, 151.0, 200.0),
    Breakpoint::new(355.0, 424.0, 201.0, 300.0),
    Breakpoint::new(425.0, 604.0, 301.0, 500.0),
];

/// Breakpoint table for a pollutant
pub fn breakpoints(pollutant: Pollutant) -> &'static [Breakpoint] {
    match pollutant {
        Pollutant::Pm25 => &PM25_BREAKPOINTS,
        Pollutant::Pm10 => &PM10_BREAKPOINTS,
    }
}

/// Convert a PM2.5 concentration to a US AQI value.
///
/// Returns `None` for negative or NaN input and above 500.4 µg/m³.
pub fn compute_index(concentration: f64) -> Option<f64> {
    compute_index_for(Pollutant::Pm25, concentration)
}

/// Convert a concentration of `pollutant` to a US AQI value.
pub fn compute_index_for(pollutant: Pollutant, concentration: f64) -> Option<f64> {
    let table = breakpoints(pollutant);
    find_segment(table, concentration).map(|bp| bp.interpolate(concentration))
}

fn find_segment(table: &[Breakpoint], concentration: f64) -> Option<&Breakpoint> {
    // NaN fails every comparison and falls through to None
    for (i, bp) in table.iter().enumerate() {
        let upper_ok = match table.get(i + 1) {
            Some(next) => concentration < next.concentration_low,
            None => concentration <= bp.concentration_high,
        };
        if concentration >= bp.concentration_low && upper_ok {
            return Some(bp);
        }
    }
    None
}

/// Map an index value into its severity band.
pub fn categorize(index: f64) -> AqiCategory {
    if index <= 50.0 {
        AqiCategory::Good
    } else if index <= 100.0 {
        AqiCategory::Moderate
    } else if index <= 150.0 {
        AqiCategory::UnhealthyForSensitiveGroups
    } else if index <= 200.0 {
        AqiCategory::Unhealthy
    } else if index <= 300.0 {
        AqiCategory::VeryUnhealthy
    } else {
        AqiCategory::Hazardous
    }
}

/// The six categories in order, for rendering a legend
pub fn category_table() -> &'static [AqiCategory] {
    &ALL_CATEGORIES
}

/// Outcome of the AQI calculator for a PM2.5/PM10 pair
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct CalculatorResult {
    pub pm25_index: f64,
    pub pm10_index: f64,
    /// The larger of the two sub-indices
    pub index: f64,
    pub category: AqiCategory,
}

/// Combine PM2.5 and PM10 readings into one index.
///
/// Both sub-indices must be defined; otherwise there is no result.
pub fn calculate(pm25: f64, pm10: f64) -> Option<CalculatorResult> {
    let pm25_index = compute_index_for(Pollutant::Pm25, pm25)?;
    let pm10_index = compute_index_for(Pollutant::Pm10, pm10)?;
    let index = pm25_index.max(pm10_index);
    Some(CalculatorResult {
        pm25_index,
        pm10_index,
        index,
        category: categorize(index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_first_segment_is_linear() {
        for c in [0.0, 1.5, 6.0, 9.9, 12.0] {
            let index = compute_index(c).unwrap();
            assert!(approx(index, c * 50.0 / 12.0), "c={} index={}", c, index);
        }
        assert_eq!(compute_index(0.0), Some(0.0));
        assert!(approx(compute_index(12.0).unwrap(), 50.0));
    }

    #[test]
    fn test_boundary_values() {
        assert!(approx(compute_index(12.1).unwrap(), 51.0));
        assert!(approx(compute_index(35.5).unwrap(), 101.0));
        assert!(approx(compute_index(500.4).unwrap(), 500.0));
    }

    #[test]
    fn test_value_in_step_uses_lower_segment() {
        let index = compute_index(12.05).unwrap();
        assert!(approx(index, 12.05 * 50.0 / 12.0));
        assert!(index > 50.0 && index < 51.0);
    }

    #[test]
    fn test_adjacent_segments_have_no_gap_or_overlap() {
        for table in [&PM25_BREAKPOINTS, &PM10_BREAKPOINTS] {
            for pair in table.windows(2) {
                let (lo, hi) = (&pair[0], &pair[1]);
                assert!(hi.concentration_low > lo.concentration_high);
                assert!(hi.index_low > lo.index_high);
                assert!(hi.index_low - lo.index_high <= 1.0);

                let at_high = find_segment(table, lo.concentration_high).unwrap();
                assert_eq!(at_high, lo);
                let at_next = find_segment(table, hi.concentration_low).unwrap();
                assert_eq!(at_next, hi);

                let midpoint = (lo.concentration_high + hi.concentration_low) / 2.0;
                assert!(find_segment(table, midpoint).is_some());
            }
        }
    }

    #[test]
    fn test_out_of_domain() {
        assert_eq!(compute_index(600.0), None);
        assert_eq!(compute_index(500.5), None);
        assert_eq!(compute_index(-0.1), None);
        assert_eq!(compute_index(f64::NAN), None);
        assert_eq!(compute_index_for(Pollutant::Pm10, 605.0), None);
    }

    #[test]
    fn test_repeated_calls_identical() {
        let first = compute_index(87.3);
        for _ in 0..10 {
            assert_eq!(compute_index(87.3), first);
        }
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize(0.0), AqiCategory::Good);
        assert_eq!(categorize(50.0), AqiCategory::Good);
        assert_eq!(categorize(51.0), AqiCategory::Moderate);
        assert_eq!(categorize(150.0), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(categorize(200.0), AqiCategory::Unhealthy);
        assert_eq!(categorize(300.0), AqiCategory::VeryUnhealthy);
        assert_eq!(categorize(500.0), AqiCategory::Hazardous);
        assert_eq!(categorize(500.0).label(), "Hazardous");
    }

    #[test]
    fn test_category_table_ordered() {
        let table = category_table();
        assert_eq!(table.len(), 6);
        for (rank, category) in table.iter().enumerate() {
            assert_eq!(category.severity_rank() as usize, rank);
        }
        assert_eq!(table[2].color_hex(), "#ff7e00");
    }

    #[test]
    fn test_calculator_takes_worse_pollutant() {
        let result = calculate(10.0, 200.0).unwrap();
        assert!(approx(result.pm25_index, 10.0 * 50.0 / 12.0));
        assert!(result.pm10_index > result.pm25_index);
        assert_eq!(result.index, result.pm10_index);
        assert_eq!(result.category, AqiCategory::UnhealthyForSensitiveGroups);
    }

    #[test]
    fn test_calculator_needs_both_readings() {
        assert!(calculate(700.0, 20.0).is_none());
        assert!(calculate(20.0, -1.0).is_none());
        // zero is a valid reading
        let result = calculate(0.0, 0.0).unwrap();
        assert_eq!(result.index, 0.0);
        assert_eq!(result.category, AqiCategory::Good);
    }
}
