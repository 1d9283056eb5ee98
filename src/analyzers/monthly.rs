use crate::models::{CombinedTable, MonthlySeries};
use chrono::Datelike;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Monthly mean PM2.5 per station, with a locality-level variant that
/// averages the stations sharing a locality.
pub struct MonthlyAnalyzer;

impl MonthlyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Mean of available hourly values per station per (year, month),
    /// restricted to the requested years. A month with no available values
    /// is missing.
    pub fn station_monthly_means(
        &self,
        table: &CombinedTable,
        years: &[i32],
    ) -> Vec<MonthlySeries> {
        let requested: BTreeSet<i32> = years.iter().copied().collect();

        table
            .columns
            .iter()
            .map(|column| {
                let mut per_month: BTreeMap<(i32, u32), (f64, u32)> = BTreeMap::new();
                for (ts, value) in table.timestamps.iter().zip(&column.values) {
                    let year = ts.date().year();
                    if !requested.contains(&year) {
                        continue;
                    }
                    let entry = per_month.entry((year, ts.date().month())).or_insert((0.0, 0));
                    if let Some(v) = value {
                        entry.0 += v;
                        entry.1 += 1;
                    }
                }

                let means = per_month
                    .into_iter()
                    .map(|(month, (sum, count))| {
                        let mean = (count > 0).then(|| sum / count as f64);
                        (month, mean)
                    })
                    .collect();

                MonthlySeries {
                    label: column.label(),
                    means,
                }
            })
            .collect()
    }

    /// Locality-level means for the configured cities: the per-station
    /// monthly means of stations sharing the locality, averaged. Cities
    /// with no station in the run are skipped with a warning.
    pub fn locality_monthly_means(
        &self,
        table: &CombinedTable,
        years: &[i32],
        cities: &[String],
    ) -> Vec<MonthlySeries> {
        let requested: BTreeSet<i32> = years.iter().copied().collect();

        cities
            .iter()
            .filter_map(|city| {
                let member_columns: Vec<_> = table
                    .columns
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.locality.as_deref() == Some(city.as_str()))
                    .map(|(i, _)| i)
                    .collect();

                if member_columns.is_empty() {
                    warn!(city = %city, "configured city has no station in this run");
                    return None;
                }

                // Per-station monthly means first, then the mean of means,
                // so stations with uneven coverage weigh equally.
                let mut per_month: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
                for &col in &member_columns {
                    let mut station_months: BTreeMap<(i32, u32), (f64, u32)> = BTreeMap::new();
                    for (ts, value) in table.timestamps.iter().zip(&table.columns[col].values) {
                        let year = ts.date().year();
                        if !requested.contains(&year) {
                            continue;
                        }
                        let entry = station_months
                            .entry((year, ts.date().month()))
                            .or_insert((0.0, 0));
                        if let Some(v) = value {
                            entry.0 += v;
                            entry.1 += 1;
                        }
                    }
                    for (month, (sum, count)) in station_months {
                        let slot = per_month.entry(month).or_default();
                        if count > 0 {
                            slot.push(sum / count as f64);
                        }
                    }
                }

                let means = per_month
                    .into_iter()
                    .map(|(month, station_means)| {
                        let mean = (!station_means.is_empty()).then(|| {
                            station_means.iter().sum::<f64>() / station_means.len() as f64
                        });
                        (month, mean)
                    })
                    .collect();

                Some(MonthlySeries {
                    label: city.clone(),
                    means,
                })
            })
            .collect()
    }
}

impl Default for MonthlyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
