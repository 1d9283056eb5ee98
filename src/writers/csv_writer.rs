use crate::error::Result;
use crate::models::{MonthlySeries, StationExceedance, VoivodeshipExceedance};
use csv::Writer;
use std::collections::BTreeSet;
use std::path::Path;

/// Writes the per-year output tables. Every writer creates the target
/// directory if needed; cells for missing values are left empty rather
/// than written as zero.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    /// Wide table: one row per month of `year`, one column per series.
    pub fn write_monthly_means(
        &self,
        path: &Path,
        series: &[MonthlySeries],
        year: i32,
    ) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut writer = Writer::from_path(path)?;

        let mut header = vec!["month".to_string()];
        header.extend(series.iter().map(|s| s.label.clone()));
        writer.write_record(&header)?;

        let months: BTreeSet<u32> = series
            .iter()
            .flat_map(|s| s.means.keys())
            .filter(|(y, _)| *y == year)
            .map(|(_, m)| *m)
            .collect();

        for month in months {
            let mut row = vec![format!("{}-{:02}", year, month)];
            for s in series {
                let cell = s
                    .means
                    .get(&(year, month))
                    .copied()
                    .flatten()
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_default();
                row.push(cell);
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Long table: one row per station with its exceedance-day count for
    /// `year`. Stations whose count is missing for the year get an empty
    /// cell.
    pub fn write_exceedance_days(
        &self,
        path: &Path,
        counts: &[StationExceedance],
        year: i32,
    ) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut writer = Writer::from_path(path)?;

        writer.write_record(["station", "exceedance_days"])?;
        for station in counts {
            let cell = station
                .counts
                .get(&year)
                .copied()
                .flatten()
                .map(|c| c.to_string())
                .unwrap_or_default();
            writer.write_record([station.label(), cell])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Regional rollup: one row per voivodeship with its mean count for
    /// `year`. Voivodeships without data for the year are omitted.
    pub fn write_voivodeship_summary(
        &self,
        path: &Path,
        summary: &[VoivodeshipExceedance],
        year: i32,
    ) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut writer = Writer::from_path(path)?;

        writer.write_record(["voivodeship", "mean_exceedance_days"])?;
        for region in summary {
            if let Some(mean) = region.mean_days.get(&year) {
                writer.write_record([region.voivodeship.clone(), format!("{:.2}", mean)])?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
