use crate::error::{PipelineError, Result};
use crate::models::HourlyTable;
use crate::utils::timestamps::days_in_year;

/// Correctness gates run after full cleaning. A violation indicates
/// upstream data corruption or a reconciliation bug, so both checks abort
/// the run rather than recover.
pub struct ConsistencyChecker;

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self
    }

    /// Every yearly table must carry the identical station-column count.
    pub fn check_station_counts(&self, tables: &[HourlyTable]) -> Result<()> {
        let mut counts: Vec<(i32, usize)> =
            tables.iter().map(|t| (t.year, t.column_count())).collect();
        counts.sort_by_key(|(year, _)| *year);

        let all_equal = counts
            .windows(2)
            .all(|pair| pair[0].1 == pair[1].1);

        if !all_equal {
            let details = counts
                .iter()
                .map(|(year, count)| format!("{}: {} stations", year, count))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(PipelineError::StationCountMismatch { details });
        }

        Ok(())
    }

    /// Every yearly table must cover the calendar-correct number of
    /// distinct days, leap years included.
    pub fn check_day_counts(&self, tables: &[HourlyTable]) -> Result<()> {
        for table in tables {
            let expected = days_in_year(table.year);
            let actual = table.distinct_days();
            if actual != expected {
                return Err(PipelineError::DayCountMismatch {
                    year: table.year,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Run both gates.
    pub fn check_all(&self, tables: &[HourlyTable]) -> Result<()> {
        self.check_station_counts(tables)?;
        self.check_day_counts(tables)?;
        Ok(())
    }
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self::new()
    }
}
