use std::collections::BTreeMap;

/// Exceedance-day counts for one station, keyed by calendar year. A `None`
/// count marks a year that was requested but absent from the data; a year
/// present in the data with no exceedances counts as `Some(0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct StationExceedance {
    pub code: String,
    pub locality: Option<String>,
    pub counts: BTreeMap<i32, Option<u32>>,
}

impl StationExceedance {
    pub fn label(&self) -> String {
        match &self.locality {
            Some(locality) => format!("{}_{}", locality, self.code),
            None => self.code.clone(),
        }
    }

    /// Total exceedance days over the years that carry data.
    pub fn total_days(&self) -> u32 {
        self.counts.values().flatten().sum()
    }
}

/// Mean exceedance-day count across a voivodeship's stations, per year.
#[derive(Debug, Clone, PartialEq)]
pub struct VoivodeshipExceedance {
    pub voivodeship: String,
    pub mean_days: BTreeMap<i32, f64>,
}

/// Monthly mean PM2.5 for one column (a station, or a locality once
/// stations sharing it have been averaged), keyed by (year, month).
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    pub label: String,
    pub means: BTreeMap<(i32, u32), Option<f64>>,
}
