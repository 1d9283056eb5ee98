use crate::models::{CombinedTable, StationExceedance, VoivodeshipExceedance};
use crate::utils::constants::PM25_DAILY_LIMIT;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Daily means for one station column. A day whose 24 hourly slots are all
/// missing yields a missing daily value.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    pub code: String,
    pub locality: Option<String>,
    pub values: BTreeMap<NaiveDate, Option<f64>>,
}

/// Resamples the combined table to daily means and counts exceedance days
/// per station per year, with a companion regional rollup.
pub struct ExceedanceAnalyzer {
    threshold: f64,
}

impl ExceedanceAnalyzer {
    pub fn new() -> Self {
        Self {
            threshold: PM25_DAILY_LIMIT,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Mean of the available hourly values per station-day. Days with no
    /// available values stay in the series as missing, so they can be
    /// excluded from flagging rather than counted as non-exceeding.
    pub fn daily_means(&self, table: &CombinedTable) -> Vec<DailySeries> {
        table
            .columns
            .iter()
            .map(|column| {
                let mut per_day: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
                for (ts, value) in table.timestamps.iter().zip(&column.values) {
                    let entry = per_day.entry(ts.date()).or_insert((0.0, 0));
                    if let Some(v) = value {
                        entry.0 += v;
                        entry.1 += 1;
                    }
                }

                let values = per_day
                    .into_iter()
                    .map(|(date, (sum, count))| {
                        let mean = (count > 0).then(|| sum / count as f64);
                        (date, mean)
                    })
                    .collect();

                DailySeries {
                    code: column.code.clone(),
                    locality: column.locality.clone(),
                    values,
                }
            })
            .collect()
    }

    /// Exceedance-day counts per station, restricted to the requested
    /// years. A daily mean strictly above the threshold counts; exactly on
    /// the threshold does not; missing days contribute nothing. Requested
    /// years absent from the data yield missing counts.
    pub fn count_exceedance_days(
        &self,
        table: &CombinedTable,
        years: &[i32],
    ) -> Vec<StationExceedance> {
        let requested: BTreeSet<i32> = years.iter().copied().collect();
        let data_years = table.years();

        self.daily_means(table)
            .into_iter()
            .map(|series| {
                let mut exceeding_per_year: BTreeMap<i32, u32> = BTreeMap::new();
                for (date, mean) in &series.values {
                    if matches!(mean, Some(v) if *v > self.threshold) {
                        *exceeding_per_year.entry(date.year()).or_insert(0) += 1;
                    }
                }

                let counts = requested
                    .iter()
                    .map(|&year| {
                        let count = data_years
                            .contains(&year)
                            .then(|| exceeding_per_year.get(&year).copied().unwrap_or(0));
                        (year, count)
                    })
                    .collect();

                StationExceedance {
                    code: series.code,
                    locality: series.locality,
                    counts,
                }
            })
            .collect()
    }

    /// Average exceedance-day counts across the stations of each
    /// voivodeship, per year. Stations with no known voivodeship are
    /// dropped; years with no counts for a voivodeship are omitted.
    pub fn voivodeship_summary(
        &self,
        station_counts: &[StationExceedance],
        voivodeships: &HashMap<String, String>,
    ) -> Vec<VoivodeshipExceedance> {
        let mut grouped: BTreeMap<String, BTreeMap<i32, Vec<u32>>> = BTreeMap::new();

        for station in station_counts {
            let Some(voivodeship) = voivodeships.get(&station.code) else {
                continue;
            };
            for (&year, &count) in &station.counts {
                if let Some(count) = count {
                    grouped
                        .entry(voivodeship.clone())
                        .or_default()
                        .entry(year)
                        .or_default()
                        .push(count);
                }
            }
        }

        grouped
            .into_iter()
            .map(|(voivodeship, per_year)| {
                let mean_days = per_year
                    .into_iter()
                    .map(|(year, counts)| {
                        let mean = counts.iter().sum::<u32>() as f64 / counts.len() as f64;
                        (year, mean)
                    })
                    .collect();
                VoivodeshipExceedance {
                    voivodeship,
                    mean_days,
                }
            })
            .collect()
    }
}

impl Default for ExceedanceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
