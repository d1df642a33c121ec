//! Dashboard composition.
//!
//! Turns the latest measures and the owned history into a view model that a
//! renderer (terminal or JSON) can print as-is. Every refresh tick is one
//! [`refresh`] call: a single fetch attempt whose failure is logged and shown
//! as "No data".

use crate::aqi::{categorize, compute_index};
use crate::exposure::compute_exposure_equivalent;
use crate::history::{DailyIndex, PollutionHistory};
use crate::source::AirQualitySource;
use crate::{AqiCategory, CurrentMeasures, Exposure, NO_DATA};
use serde::Serialize;

/// Map marker for the monitoring location
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub tooltip: String,
    pub popup: String,
}

/// Everything the dashboard page shows for one refresh
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Dashboard {
    pub location_name: String,
    pub pm25: String,
    pub pm10: String,
    pub temperature: String,
    pub humidity: String,
    pub aqi: String,
    pub aqi_value: Option<f64>,
    pub category: Option<AqiCategory>,
    pub health_advice: String,
    pub exposure: Exposure,
    pub cigarette_equivalent: String,
    pub marker: Option<MapMarker>,
    pub history_title: String,
    pub history: Vec<DailyIndex>,
    pub last_updated: String,
}

impl Dashboard {
    /// Compose the view model. `None` measures means the fetch failed.
    pub fn compose(
        measures: Option<&CurrentMeasures>,
        history: &PollutionHistory,
        exposure_hours: f64,
    ) -> Self {
        let Some(m) = measures else {
            return Self::unavailable();
        };

        let location_name = m
            .location_name
            .clone()
            .unwrap_or_else(|| "Unknown Location".to_string());

        let aqi_value = m.pm02.and_then(compute_index);
        let category = aqi_value.map(categorize);

        let (health_advice, exposure, cigarette_equivalent) = match category {
            Some(category) => {
                let exposure = compute_exposure_equivalent(m.pm02, exposure_hours);
                let sentence = match exposure {
                    Exposure::Cigarettes(n) => {
                        format!("Equivalent to smoking {:.2} cigarettes per day.", n)
                    }
                    Exposure::NoData => {
                        "No data available for cigarette equivalent.".to_string()
                    }
                };
                (category.health_advice().to_string(), exposure, sentence)
            }
            None => (
                "No data available for health advice.".to_string(),
                Exposure::NoData,
                "No data available for cigarette equivalent.".to_string(),
            ),
        };

        let pm25 = with_unit(m.pm02, "µg/m³");
        let pm10 = with_unit(m.pm10, "µg/m³");
        let marker = match (m.latitude, m.longitude) {
            (Some(latitude), Some(longitude)) => Some(MapMarker {
                latitude,
                longitude,
                tooltip: location_name.clone(),
                popup: format!("PM2.5: {}, PM10: {}", pm25, pm10),
            }),
            _ => None,
        };

        let last_updated = match m.timestamp {
            Some(ts) => format!("Last Updated: {}", ts.format("%Y-%m-%d %H:%M:%S")),
            None => format!("Last Updated: {}", NO_DATA),
        };

        Self {
            location_name,
            temperature: with_unit(m.atmp, "°C"),
            humidity: with_unit(m.rhum, "%"),
            pm25,
            pm10,
            aqi: aqi_value
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| NO_DATA.to_string()),
            aqi_value,
            category,
            health_advice,
            exposure,
            cigarette_equivalent,
            marker,
            history_title: "Past 7 Days PM2.5 Levels".to_string(),
            history: history_window(history),
            last_updated,
        }
    }

    /// The dashboard shown when no measures could be fetched
    pub fn unavailable() -> Self {
        Self {
            location_name: NO_DATA.to_string(),
            pm25: NO_DATA.to_string(),
            pm10: NO_DATA.to_string(),
            temperature: NO_DATA.to_string(),
            humidity: NO_DATA.to_string(),
            aqi: NO_DATA.to_string(),
            aqi_value: None,
            category: None,
            health_advice: NO_DATA.to_string(),
            exposure: Exposure::NoData,
            cigarette_equivalent: NO_DATA.to_string(),
            marker: None,
            history_title: "Past 7 Days PM2.5 Levels".to_string(),
            history: Vec::new(),
            last_updated: format!("Last Updated: {}", NO_DATA),
        }
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", v, unit),
        None => NO_DATA.to_string(),
    }
}

fn history_window(history: &PollutionHistory) -> Vec<DailyIndex> {
    let window = PollutionHistory::new(history.last_days(7).to_vec());
    window.with_indices()
}

/// One refresh tick: fetch once, compose, never fail.
pub fn refresh<S: AirQualitySource + ?Sized>(
    source: &mut S,
    history: &PollutionHistory,
    exposure_hours: f64,
) -> Dashboard {
    match source.fetch_current() {
        Ok(measures) => Dashboard::compose(Some(&measures), history, exposure_hours),
        Err(e) => {
            tracing::error!("Error fetching data from API: {}", e);
            Dashboard::compose(None, history, exposure_hours)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FixedSource;
    use chrono::{TimeZone, Utc};

    fn kathmandu() -> CurrentMeasures {
        CurrentMeasures {
            location_name: Some("Kathmandu".into()),
            pm02: Some(22.0),
            pm10: Some(40.0),
            atmp: Some(14.5),
            rhum: Some(60.0),
            latitude: Some(27.7172),
            longitude: Some(85.324),
            timestamp: Some(Utc.with_ymd_and_hms(2025, 1, 22, 6, 15, 0).unwrap()),
        }
    }

    #[test]
    fn test_compose_full_measures() {
        let dashboard = Dashboard::compose(Some(&kathmandu()), &PollutionHistory::sample(), 24.0);

        assert_eq!(dashboard.location_name, "Kathmandu");
        assert_eq!(dashboard.pm25, "22 µg/m³");
        assert_eq!(dashboard.temperature, "14.5 °C");
        assert_eq!(dashboard.humidity, "60 %");
        assert_eq!(dashboard.category, Some(AqiCategory::Moderate));
        assert_eq!(dashboard.aqi, "71.82");
        assert_eq!(
            dashboard.health_advice,
            "Moderate air quality. Sensitive groups should limit outdoor activities."
        );
        assert_eq!(dashboard.exposure, Exposure::Cigarettes(1.0));
        assert_eq!(
            dashboard.cigarette_equivalent,
            "Equivalent to smoking 1.00 cigarettes per day."
        );
        assert_eq!(dashboard.last_updated, "Last Updated: 2025-01-22 06:15:00");
        assert_eq!(dashboard.history.len(), 7);

        let marker = dashboard.marker.unwrap();
        assert_eq!(marker.tooltip, "Kathmandu");
        assert_eq!(marker.popup, "PM2.5: 22 µg/m³, PM10: 40 µg/m³");
    }

    #[test]
    fn test_compose_without_pm25() {
        let measures = CurrentMeasures {
            pm02: None,
            ..kathmandu()
        };
        let dashboard = Dashboard::compose(Some(&measures), &PollutionHistory::sample(), 24.0);
        assert_eq!(dashboard.aqi, "No data");
        assert_eq!(dashboard.category, None);
        assert_eq!(dashboard.health_advice, "No data available for health advice.");
        assert_eq!(
            dashboard.cigarette_equivalent,
            "No data available for cigarette equivalent."
        );
        assert_eq!(dashboard.exposure, Exposure::NoData);
    }

    #[test]
    fn test_compose_out_of_range_pm25() {
        let measures = CurrentMeasures {
            pm02: Some(650.0),
            ..kathmandu()
        };
        let dashboard = Dashboard::compose(Some(&measures), &PollutionHistory::sample(), 24.0);
        assert_eq!(dashboard.aqi, "No data");
        assert_eq!(dashboard.pm25, "650 µg/m³");
    }

    #[test]
    fn test_compose_sparse_measures() {
        let dashboard = Dashboard::compose(
            Some(&CurrentMeasures::default()),
            &PollutionHistory::default(),
            24.0,
        );
        assert_eq!(dashboard.location_name, "Unknown Location");
        assert_eq!(dashboard.temperature, "No data");
        assert_eq!(dashboard.last_updated, "Last Updated: No data");
        assert!(dashboard.marker.is_none());
        assert!(dashboard.history.is_empty());
    }

    #[test]
    fn test_refresh_catches_fetch_failure() {
        crate::logging::init_test();
        let dashboard = refresh(&mut FixedSource::failing(), &PollutionHistory::sample(), 24.0);
        assert_eq!(dashboard, Dashboard::unavailable());
        assert_eq!(dashboard.last_updated, "Last Updated: No data");
    }

    #[test]
    fn test_refresh_is_repeatable() {
        let mut source = FixedSource::new(kathmandu());
        let history = PollutionHistory::sample();
        let first = refresh(&mut source, &history, 24.0);
        let second = refresh(&mut source, &history, 24.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serializes_to_json() {
        let dashboard = Dashboard::compose(Some(&kathmandu()), &PollutionHistory::sample(), 12.0);
        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["category"], "moderate");
        assert_eq!(json["exposure"]["kind"], "cigarettes");
        assert_eq!(json["exposure"]["cigarettes"], 0.5);
    }
}
