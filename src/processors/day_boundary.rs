use crate::models::HourlyTable;
use chrono::{Duration, Timelike};

/// Reassigns readings stamped at local midnight to the preceding calendar
/// day. The agency's reporting convention places the "00:00" reading at the
/// end of the prior day, not the start of the new one, so this must run
/// after timestamp parsing and before any daily resampling.
pub fn correct_day_boundary(mut table: HourlyTable) -> HourlyTable {
    for ts in &mut table.timestamps {
        if ts.hour() == 0 && ts.minute() == 0 {
            *ts -= Duration::days(1);
        }
    }
    table
}
