#![forbid(unsafe_code)]

//! Core domain model and computations for the Vayu air-quality toolkit.
//!
//! This crate provides:
//! - US AQI conversion and categories
//! - Cigarette-equivalent exposure
//! - The upstream measures client
//! - Daily history and the global dataset
//! - Dashboard composition

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod aqi;
pub mod exposure;
pub mod source;
pub mod history;
pub mod dataset;
pub mod dashboard;

/// Sentinel shown wherever a value is absent
pub const NO_DATA: &str = "No data";

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use aqi::{calculate, categorize, compute_index, compute_index_for, CalculatorResult};
pub use exposure::compute_exposure_equivalent;
pub use source::{AirGradientClient, AirQualitySource, FixedSource};
pub use history::PollutionHistory;
pub use dataset::{Choropleth, GlobalDataset};
pub use dashboard::{refresh, Dashboard};
