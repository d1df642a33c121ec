//! Global air pollution dataset and per-country map shading.
//!
//! The dataset has one row per city. A map layer picks one AQI column; each
//! country is shaded by the mean of its cities on a Viridis ramp scaled over
//! the layer's observed range.

use crate::{CityAirQuality, Error, MapLayer, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Viridis control points (sRGB), evenly spaced from t=0 to t=1
const VIRIDIS: [[u8; 3]; 9] = [
    [0x44, 0x01, 0x54],
    [0x47, 0x2d, 0x7b],
    [0x3b, 0x52, 0x8b],
    [0x2c, 0x72, 0x8e],
    [0x21, 0x91, 0x8c],
    [0x28, 0xae, 0x80],
    [0x5e, 0xc9, 0x62],
    [0xad, 0xdc, 0x30],
    [0xfd, 0xe7, 0x25],
];

/// Sample the Viridis ramp at `t` (clamped to `[0, 1]`) as a hex color.
pub fn viridis_hex(t: f64) -> String {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let max_idx = (VIRIDIS.len() - 1) as f64;
    let scaled = t * max_idx;
    let lo = (scaled as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - lo as f64;
    let (a, b) = (VIRIDIS[lo], VIRIDIS[lo + 1]);
    let channel = |i: usize| {
        (a[i] as f64 + (b[i] as f64 - a[i] as f64) * frac).round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

/// One country's shade on a map layer
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CountryShade {
    pub country: String,
    pub mean: f64,
    /// City with the highest value, shown on hover
    pub worst_city: String,
    pub worst_value: f64,
    pub city_count: usize,
    pub fill: String,
}

/// A full map layer: every country's shade plus the value range used
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Choropleth {
    pub layer: MapLayer,
    pub title: String,
    pub min: f64,
    pub max: f64,
    /// Sorted by mean, highest first
    pub countries: Vec<CountryShade>,
}

/// The global dataset, owned by whoever loaded it
#[derive(Clone, Debug, Default)]
pub struct GlobalDataset {
    rows: Vec<CityAirQuality>,
}

impl GlobalDataset {
    pub fn new(rows: Vec<CityAirQuality>) -> Self {
        Self { rows }
    }

    /// Load the dataset CSV. Rows without a country or with unparsable
    /// values are skipped with a warning.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for result in reader.deserialize::<CityAirQuality>() {
            match result {
                Ok(row) if !row.country.is_empty() => rows.push(row),
                Ok(row) => {
                    skipped += 1;
                    tracing::debug!("Skipping dataset row without country: {}", row.city);
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Failed to deserialize dataset row: {}", e);
                }
            }
        }

        if rows.is_empty() {
            return Err(Error::Dataset(format!("no usable rows in {:?}", path)));
        }

        tracing::info!(
            "Loaded {} cities from {:?} ({} skipped)",
            rows.len(),
            path,
            skipped
        );
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Shade every country on `layer`.
    pub fn choropleth(&self, layer: MapLayer) -> Choropleth {
        let mut by_country: BTreeMap<&str, Vec<&CityAirQuality>> = BTreeMap::new();
        for row in &self.rows {
            by_country.entry(row.country.as_str()).or_default().push(row);
        }

        let mut countries: Vec<CountryShade> = by_country
            .into_iter()
            .map(|(country, cities)| {
                let total: f64 = cities.iter().map(|c| layer.value_of(c)).sum();
                let worst = cities
                    .iter()
                    .max_by(|a, b| layer.value_of(a).total_cmp(&layer.value_of(b)));
                CountryShade {
                    country: country.to_string(),
                    mean: total / cities.len() as f64,
                    worst_city: worst.map(|c| c.city.clone()).unwrap_or_default(),
                    worst_value: worst.map(|c| layer.value_of(c)).unwrap_or_default(),
                    city_count: cities.len(),
                    fill: String::new(),
                }
            })
            .collect();

        let min = countries.iter().map(|c| c.mean).fold(f64::INFINITY, f64::min);
        let max = countries
            .iter()
            .map(|c| c.mean)
            .fold(f64::NEG_INFINITY, f64::max);
        let (min, max) = if countries.is_empty() { (0.0, 0.0) } else { (min, max) };
        let span = max - min;

        for shade in &mut countries {
            let t = if span > 0.0 { (shade.mean - min) / span } else { 0.0 };
            shade.fill = viridis_hex(t);
        }
        countries.sort_by(|a, b| {
            b.mean
                .total_cmp(&a.mean)
                .then_with(|| a.country.cmp(&b.country))
        });

        Choropleth {
            layer,
            title: format!("Heat Map of {}", layer.column()),
            min,
            max,
            countries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Country,City,AQI Value,AQI Category,CO AQI Value,CO AQI Category,Ozone AQI Value,Ozone AQI Category,NO2 AQI Value,NO2 AQI Category,PM2.5 AQI Value,PM2.5 AQI Category\n";

    fn write_dataset(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("global.csv");
        std::fs::write(&path, format!("{}{}", HEADER, body)).unwrap();
        path
    }

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis_hex(0.0), "#440154");
        assert_eq!(viridis_hex(1.0), "#fde725");
        assert_eq!(viridis_hex(-3.0), "#440154");
        assert_eq!(viridis_hex(0.5), "#21918c");
    }

    #[test]
    fn test_choropleth_by_country() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_dataset(
            temp_dir.path(),
            "Nepal,Kathmandu,170,Unhealthy,2,Good,30,Good,5,Good,170,Unhealthy\n\
             Nepal,Pokhara,90,Moderate,1,Good,40,Good,1,Good,90,Moderate\n\
             Iceland,Reykjavik,20,Good,1,Good,20,Good,0,Good,15,Good\n\
             ,Nowhere,10,Good,1,Good,1,Good,1,Good,1,Good\n",
        );

        let dataset = GlobalDataset::load_csv(&path).unwrap();
        assert_eq!(dataset.len(), 3);

        let map = dataset.choropleth(MapLayer::Aqi);
        assert_eq!(map.title, "Heat Map of AQI Value");
        assert_eq!(map.countries.len(), 2);

        let nepal = &map.countries[0];
        assert_eq!(nepal.country, "Nepal");
        assert_eq!(nepal.mean, 130.0);
        assert_eq!(nepal.worst_city, "Kathmandu");
        assert_eq!(nepal.city_count, 2);
        assert_eq!(nepal.fill, "#fde725");
        assert_eq!(map.countries[1].fill, "#440154");
        assert_eq!((map.min, map.max), (20.0, 130.0));
    }

    #[test]
    fn test_layer_selects_column() {
        let dataset = GlobalDataset::new(vec![CityAirQuality {
            country: "Nepal".into(),
            city: "Biratnagar".into(),
            aqi: 150.0,
            aqi_category: "Unhealthy for Sensitive Groups".into(),
            co_aqi: 3.0,
            ozone_aqi: 45.0,
            no2_aqi: 7.0,
            pm25_aqi: 150.0,
        }]);
        let map = dataset.choropleth(MapLayer::Ozone);
        assert_eq!(map.countries[0].mean, 45.0);
        // single country has no span; shade at the bottom of the ramp
        assert_eq!(map.countries[0].fill, "#440154");
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_dataset(temp_dir.path(), "");
        assert!(matches!(
            GlobalDataset::load_csv(&path),
            Err(Error::Dataset(_))
        ));
    }
}
