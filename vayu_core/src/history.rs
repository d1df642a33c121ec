//! Daily PM2.5 history for the "past 7 days" chart.
//!
//! History is an owned series built once by the caller, either from the
//! built-in sample week or from a CSV file with `date,pm25` columns. It is
//! never written back.

use crate::aqi::{categorize, compute_index};
use crate::{AqiCategory, DailyAverage, Result};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CSV row format for reading daily averages
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    pm25: f64,
}

impl TryFrom<CsvRow> for DailyAverage {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
            .map_err(|e| crate::Error::Other(format!("Invalid date {:?}: {}", row.date, e)))?;
        if !row.pm25.is_finite() || row.pm25 < 0.0 {
            return Err(crate::Error::Other(format!(
                "Invalid PM2.5 value {} on {}",
                row.pm25, date
            )));
        }
        Ok(DailyAverage {
            date,
            pm25: row.pm25,
        })
    }
}

/// A day of the series with its derived index
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DailyIndex {
    pub date: NaiveDate,
    pub pm25: f64,
    pub aqi: Option<f64>,
    pub category: Option<AqiCategory>,
}

/// Daily PM2.5 averages, sorted oldest first
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct PollutionHistory {
    days: Vec<DailyAverage>,
}

impl PollutionHistory {
    /// Build a history from arbitrary-order days; later duplicates of a date
    /// replace earlier ones.
    pub fn new(mut days: Vec<DailyAverage>) -> Self {
        days.sort_by(|a, b| a.date.cmp(&b.date));
        let mut deduped: Vec<DailyAverage> = Vec::with_capacity(days.len());
        for day in days {
            match deduped.last_mut() {
                Some(last) if last.date == day.date => *last = day,
                _ => deduped.push(day),
            }
        }
        Self { days: deduped }
    }

    /// The sample week shown when no history file is configured
    pub fn sample() -> Self {
        const SAMPLE: [(u32, f64); 7] = [
            (16, 85.2),
            (17, 78.4),
            (18, 90.1),
            (19, 88.7),
            (20, 92.3),
            (21, 95.5),
            (22, 89.8),
        ];
        let days = SAMPLE
            .iter()
            .filter_map(|&(day, pm25)| {
                NaiveDate::from_ymd_opt(2025, 1, day).map(|date| DailyAverage { date, pm25 })
            })
            .collect();
        Self::new(days)
    }

    /// Load a history from a CSV file with `date,pm25` headers.
    ///
    /// Malformed rows are skipped with a warning.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut days = Vec::new();
        for result in reader.deserialize::<CsvRow>() {
            match result {
                Ok(row) => match DailyAverage::try_from(row) {
                    Ok(day) => days.push(day),
                    Err(e) => {
                        tracing::warn!("Failed to parse history row: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to deserialize history row: {}", e);
                }
            }
        }

        tracing::info!("Loaded {} daily averages from {:?}", days.len(), path);
        Ok(Self::new(days))
    }

    pub fn days(&self) -> &[DailyAverage] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days within `n` days of the most recent entry (inclusive of it)
    pub fn last_days(&self, n: i64) -> &[DailyAverage] {
        let Some(latest) = self.days.last() else {
            return &[];
        };
        let cutoff = latest.date - Duration::days(n - 1);
        let start = self.days.partition_point(|d| d.date < cutoff);
        &self.days[start..]
    }

    pub fn mean_pm25(&self) -> Option<f64> {
        if self.days.is_empty() {
            return None;
        }
        let total: f64 = self.days.iter().map(|d| d.pm25).sum();
        Some(total / self.days.len() as f64)
    }

    /// Day with the highest PM2.5
    pub fn peak(&self) -> Option<&DailyAverage> {
        self.days
            .iter()
            .max_by(|a, b| a.pm25.total_cmp(&b.pm25))
    }

    /// Each day with its AQI and category
    pub fn with_indices(&self) -> Vec<DailyIndex> {
        self.days
            .iter()
            .map(|d| {
                let aqi = compute_index(d.pm25);
                DailyIndex {
                    date: d.date,
                    pm25: d.pm25,
                    aqi,
                    category: aqi.map(categorize),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sample_week() {
        let history = PollutionHistory::sample();
        assert_eq!(history.days().len(), 7);
        assert_eq!(history.days()[0].date, date(2025, 1, 16));
        assert_eq!(history.days()[6].pm25, 89.8);

        let peak = history.peak().unwrap();
        assert_eq!(peak.date, date(2025, 1, 21));
        assert_eq!(peak.pm25, 95.5);

        let mean = history.mean_pm25().unwrap();
        assert!((mean - 620.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_indices_are_unhealthy() {
        let history = PollutionHistory::sample();
        for day in history.with_indices() {
            assert_eq!(day.category, Some(AqiCategory::Unhealthy));
        }
    }

    #[test]
    fn test_load_csv_skips_bad_rows() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.csv");
        std::fs::write(
            &path,
            "date,pm25\n2025-02-02,40.5\nnot-a-date,10\n2025-02-01, 35.0\n2025-02-03,abc\n2025-02-04,-3\n",
        )
        .unwrap();

        let history = PollutionHistory::load_csv(&path).unwrap();
        assert_eq!(history.days().len(), 2);
        // sorted oldest first
        assert_eq!(history.days()[0].date, date(2025, 2, 1));
        assert_eq!(history.days()[1].pm25, 40.5);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = PollutionHistory::load_csv(&temp_dir.path().join("missing.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_dates_keep_latest() {
        let history = PollutionHistory::new(vec![
            DailyAverage { date: date(2025, 1, 2), pm25: 10.0 },
            DailyAverage { date: date(2025, 1, 1), pm25: 5.0 },
            DailyAverage { date: date(2025, 1, 2), pm25: 20.0 },
        ]);
        assert_eq!(history.days().len(), 2);
        assert_eq!(history.days()[1].pm25, 20.0);
    }

    #[test]
    fn test_last_days_window() {
        let days = (1..=10)
            .map(|d| DailyAverage { date: date(2025, 3, d), pm25: d as f64 })
            .collect();
        let history = PollutionHistory::new(days);

        let week = history.last_days(7);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(2025, 3, 4));
        assert_eq!(history.last_days(30).len(), 10);
        assert!(PollutionHistory::default().last_days(7).is_empty());
    }

    #[test]
    fn test_empty_history() {
        let history = PollutionHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.mean_pm25(), None);
        assert!(history.peak().is_none());
    }
}
