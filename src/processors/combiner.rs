use crate::error::{PipelineError, Result};
use crate::models::{CombinedTable, HourlyTable, StationColumn};

/// Concatenates the cleaned yearly tables row-wise into one long table.
/// By this point every table shares an identical, ordered column set, and
/// years are disjoint, so no timestamp deduplication is needed.
pub fn combine_years(tables: Vec<HourlyTable>) -> Result<CombinedTable> {
    let mut tables = tables;
    tables.sort_by_key(|t| t.year);

    let mut iter = tables.into_iter();
    let first = iter.next().ok_or_else(|| {
        PipelineError::MissingData("no yearly tables to combine".to_string())
    })?;

    let labels: Vec<String> = first.columns.iter().map(|c| c.label()).collect();
    let mut timestamps = first.timestamps;
    let mut columns: Vec<StationColumn> = first.columns;

    for table in iter {
        let table_labels: Vec<String> = table.columns.iter().map(|c| c.label()).collect();
        if table_labels != labels {
            return Err(PipelineError::InvalidFormat(format!(
                "year {} column set diverges from the combined run",
                table.year
            )));
        }

        timestamps.extend(table.timestamps);
        for (combined, yearly) in columns.iter_mut().zip(table.columns) {
            combined.values.extend(yearly.values);
        }
    }

    Ok(CombinedTable {
        timestamps,
        columns,
    })
}
