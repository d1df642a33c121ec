//! Core domain types for the Vayu air-quality toolkit.
//!
//! This module defines the fundamental types used throughout the system:
//! - Pollutants and their breakpoint rows
//! - AQI categories and exposure results
//! - Upstream measurements
//! - Historical daily averages and global dataset rows

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Pollutant and Breakpoint Types
// ============================================================================

/// Pollutant whose concentration can be converted to an index
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    Pm25,
    Pm10,
}

impl Pollutant {
    /// Display name, e.g. "PM2.5"
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
        }
    }
}

/// One row of a breakpoint table: a linear segment between a concentration
/// range (µg/m³) and an index range (0–500 scale).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakpoint {
    pub concentration_low: f64,
    pub concentration_high: f64,
    pub index_low: f64,
    pub index_high: f64,
}

impl Breakpoint {
    pub const fn new(
        concentration_low: f64,
        concentration_high: f64,
        index_low: f64,
        index_high: f64,
    ) -> Self {
        Self {
            concentration_low,
            concentration_high,
            index_low,
            index_high,
        }
    }

    /// Linear interpolation of `concentration` along this segment
    pub fn interpolate(&self, concentration: f64) -> f64 {
        (self.index_high - self.index_low) / (self.concentration_high - self.concentration_low)
            * (concentration - self.concentration_low)
            + self.index_low
    }
}

// ============================================================================
// Category and Exposure Types
// ============================================================================

/// The six US AQI severity bands, ordered from best to worst
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// All categories in severity order, for legends and iteration
pub const ALL_CATEGORIES: [AqiCategory; 6] = [
    AqiCategory::Good,
    AqiCategory::Moderate,
    AqiCategory::UnhealthyForSensitiveGroups,
    AqiCategory::Unhealthy,
    AqiCategory::VeryUnhealthy,
    AqiCategory::Hazardous,
];

impl AqiCategory {
    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// 0 for Good up to 5 for Hazardous
    pub fn severity_rank(self) -> u8 {
        self as u8
    }

    /// Legend color as a hex string
    pub fn color_hex(self) -> &'static str {
        match self {
            AqiCategory::Good => "#00e400",
            AqiCategory::Moderate => "#ffff00",
            AqiCategory::UnhealthyForSensitiveGroups => "#ff7e00",
            AqiCategory::Unhealthy => "#ff0000",
            AqiCategory::VeryUnhealthy => "#8f3f97",
            AqiCategory::Hazardous => "#7e0023",
        }
    }

    pub fn color_name(self) -> &'static str {
        match self {
            AqiCategory::Good => "Green",
            AqiCategory::Moderate => "Yellow",
            AqiCategory::UnhealthyForSensitiveGroups => "Orange",
            AqiCategory::Unhealthy => "Red",
            AqiCategory::VeryUnhealthy => "Purple",
            AqiCategory::Hazardous => "Maroon",
        }
    }

    /// Index range shown in the legend, e.g. "51-100"
    pub fn range_label(self) -> &'static str {
        match self {
            AqiCategory::Good => "0-50",
            AqiCategory::Moderate => "51-100",
            AqiCategory::UnhealthyForSensitiveGroups => "101-150",
            AqiCategory::Unhealthy => "151-200",
            AqiCategory::VeryUnhealthy => "201-300",
            AqiCategory::Hazardous => "301-500",
        }
    }

    pub fn health_advice(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good air quality. No precautions needed.",
            AqiCategory::Moderate => {
                "Moderate air quality. Sensitive groups should limit outdoor activities."
            }
            AqiCategory::UnhealthyForSensitiveGroups => {
                "Unhealthy for sensitive groups. Reduce outdoor exertion."
            }
            AqiCategory::Unhealthy => "Unhealthy. Everyone should limit outdoor activities.",
            AqiCategory::VeryUnhealthy => "Very unhealthy. Stay indoors with air filtration.",
            AqiCategory::Hazardous => "Hazardous. Avoid outdoor activities.",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cigarette-equivalent exposure, or the "no data" sentinel when the
/// concentration was absent
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
#[serde(tag = "kind", content = "cigarettes", rename_all = "snake_case")]
pub enum Exposure {
    Cigarettes(f64),
    NoData,
}

impl Exposure {
    pub fn cigarettes(self) -> Option<f64> {
        match self {
            Exposure::Cigarettes(n) => Some(n),
            Exposure::NoData => None,
        }
    }
}

impl fmt::Display for Exposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exposure::Cigarettes(n) => write!(f, "{:.2}", n),
            Exposure::NoData => f.write_str(crate::NO_DATA),
        }
    }
}

// ============================================================================
// Upstream Measurement Types
// ============================================================================

/// Current measures for one monitoring location, as returned by the
/// AirGradient public API. Every field is optional upstream.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMeasures {
    #[serde(default)]
    pub location_name: Option<String>,
    /// PM2.5 in µg/m³
    #[serde(default)]
    pub pm02: Option<f64>,
    /// PM10 in µg/m³
    #[serde(default)]
    pub pm10: Option<f64>,
    /// Temperature in °C
    #[serde(default)]
    pub atmp: Option<f64>,
    /// Relative humidity in %
    #[serde(default)]
    pub rhum: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

// ============================================================================
// History and Dataset Types
// ============================================================================

/// Daily average PM2.5 for one calendar day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyAverage {
    pub date: NaiveDate,
    pub pm25: f64,
}

/// One city row of the global air pollution dataset
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CityAirQuality {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "AQI Value")]
    pub aqi: f64,
    #[serde(rename = "AQI Category", default)]
    pub aqi_category: String,
    #[serde(rename = "CO AQI Value")]
    pub co_aqi: f64,
    #[serde(rename = "Ozone AQI Value")]
    pub ozone_aqi: f64,
    #[serde(rename = "NO2 AQI Value")]
    pub no2_aqi: f64,
    #[serde(rename = "PM2.5 AQI Value")]
    pub pm25_aqi: f64,
}

/// Column of the global dataset that can be shaded on the map
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MapLayer {
    Aqi,
    Co,
    Ozone,
    No2,
    Pm25,
}

impl MapLayer {
    /// Column header in the dataset
    pub fn column(self) -> &'static str {
        match self {
            MapLayer::Aqi => "AQI Value",
            MapLayer::Co => "CO AQI Value",
            MapLayer::Ozone => "Ozone AQI Value",
            MapLayer::No2 => "NO2 AQI Value",
            MapLayer::Pm25 => "PM2.5 AQI Value",
        }
    }

    pub fn value_of(self, row: &CityAirQuality) -> f64 {
        match self {
            MapLayer::Aqi => row.aqi,
            MapLayer::Co => row.co_aqi,
            MapLayer::Ozone => row.ozone_aqi,
            MapLayer::No2 => row.no2_aqi,
            MapLayer::Pm25 => row.pm25_aqi,
        }
    }
}
