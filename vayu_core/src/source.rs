//! Sources of current air-quality measurements.
//!
//! The dashboard only needs "give me the latest measures"; the AirGradient
//! public API is the production source. Each fetch is a single attempt.

use crate::{CurrentMeasures, Error, Result};

/// A type that can get the current measures for one location.
pub trait AirQualitySource {
    /// Fetch the latest measures. Partial data comes back as `None` fields.
    fn fetch_current(&mut self) -> Result<CurrentMeasures>;
}

/// Blocking HTTP client for the AirGradient public API.
pub struct AirGradientClient {
    client: reqwest::blocking::Client,
    api_url: String,
}

impl AirGradientClient {
    /// Create a client for a measures endpoint, e.g.
    /// [`crate::config::DEFAULT_API_URL`].
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl AirQualitySource for AirGradientClient {
    fn fetch_current(&mut self) -> Result<CurrentMeasures> {
        tracing::debug!("Fetching current measures from {}", self.api_url);
        let response = self.client.get(&self.api_url).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let measures: CurrentMeasures = response.json()?;
        tracing::info!(
            "Fetched measures for {}",
            measures.location_name.as_deref().unwrap_or("unknown location")
        );
        Ok(measures)
    }
}

/// Source that repeatedly provides the given measures, or fails every time
/// when constructed with [`FixedSource::failing`].
pub struct FixedSource {
    measures: Option<CurrentMeasures>,
}

impl FixedSource {
    pub fn new(measures: CurrentMeasures) -> Self {
        Self {
            measures: Some(measures),
        }
    }

    pub fn failing() -> Self {
        Self { measures: None }
    }
}

impl AirQualitySource for FixedSource {
    fn fetch_current(&mut self) -> Result<CurrentMeasures> {
        self.measures
            .clone()
            .ok_or_else(|| Error::Other("source unavailable".into()))
    }
}
