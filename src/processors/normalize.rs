use crate::error::{PipelineError, Result};
use crate::models::{HourlyTable, StationColumn};
use crate::readers::RawRows;
use crate::utils::codes::clean_station_code;
use crate::utils::constants::STATION_CODE_MARKER;
use crate::utils::timestamps::{floor_to_minute, parse_sheet_timestamp};

/// Promotes the station-code marker row to column labels and coerces the
/// remaining rows into a typed hourly table: timestamps truncated to minute
/// resolution, measurement cells parsed as floats with decimal commas
/// normalized, unparsable cells becoming missing.
///
/// A sheet with no measurement rows normalizes to a zero-row table; the
/// day-count gate downstream decides whether that is acceptable.
pub struct ShapeNormalizer;

impl ShapeNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, year: i32, rows: RawRows) -> Result<HourlyTable> {
        let header_idx = rows
            .iter()
            .position(|row| {
                row.first().map(|c| c.trim() == STATION_CODE_MARKER) == Some(true)
            })
            .ok_or_else(|| {
                PipelineError::InvalidFormat(format!(
                    "year {} sheet has no '{}' header row",
                    year, STATION_CODE_MARKER
                ))
            })?;

        let codes: Vec<String> = rows[header_idx]
            .iter()
            .skip(1)
            .map(|cell| clean_station_code(cell))
            .collect();

        let mut timestamps = Vec::new();
        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); codes.len()];

        for (idx, row) in rows.iter().enumerate() {
            if idx == header_idx {
                continue;
            }

            let first = row.first().map(String::as_str).unwrap_or("");
            let ts = parse_sheet_timestamp(first).ok_or_else(|| {
                PipelineError::InvalidFormat(format!(
                    "year {} sheet has a non-timestamp data row: '{}'",
                    year, first
                ))
            })?;
            timestamps.push(floor_to_minute(ts));

            // Exports are ragged; short rows pad with missing cells.
            for (col, cell_values) in values.iter_mut().enumerate() {
                let cell = row.get(col + 1).map(String::as_str).unwrap_or("");
                cell_values.push(parse_measurement(cell));
            }
        }

        let columns = codes
            .into_iter()
            .zip(values)
            .map(|(code, vals)| StationColumn::new(code, vals))
            .collect();

        Ok(HourlyTable::new(year, timestamps, columns))
    }
}

impl Default for ShapeNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a measurement cell, normalizing decimal commas. Anything that
/// still fails to parse is a missing value, never zero.
fn parse_measurement(cell: &str) -> Option<f64> {
    let cleaned = cell.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_parse_measurement() {
        assert_eq!(parse_measurement("12,5"), Some(12.5));
        assert_eq!(parse_measurement("12.5"), Some(12.5));
        assert_eq!(parse_measurement(" 8 "), Some(8.0));
        assert_eq!(parse_measurement(""), None);
        assert_eq!(parse_measurement("brak"), None);
    }

    #[test]
    fn test_normalize_promotes_header_and_parses_cells() -> Result<()> {
        let rows = vec![
            row(&["Kod stacji", " DsWrocAlWisn ", "MzWar\nKondrat"]),
            row(&["2021-01-01 01:00:00", "12,5", "x"]),
            row(&["2021-01-01 02:00:30", "", "7,0"]),
        ];

        let table = ShapeNormalizer::new().normalize(2021, rows)?;

        assert_eq!(table.year, 2021);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);

        // Codes are trimmed of surrounding and embedded whitespace.
        assert_eq!(table.columns[0].code, "DsWrocAlWisn");
        assert_eq!(table.columns[1].code, "MzWarKondrat");

        // Unparsable and empty cells become missing, not zero.
        assert_eq!(table.columns[0].values, vec![Some(12.5), None]);
        assert_eq!(table.columns[1].values, vec![None, Some(7.0)]);

        // Timestamps are floored to the minute.
        let expected = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(2, 0, 0)
            .unwrap();
        assert_eq!(table.timestamps[1], expected);

        Ok(())
    }

    #[test]
    fn test_normalize_ragged_rows_pad_with_missing() -> Result<()> {
        let rows = vec![
            row(&["Kod stacji", "DsWrocAlWisn", "MzWarKondrat"]),
            row(&["2021-01-01 01:00:00", "5,0"]),
        ];

        let table = ShapeNormalizer::new().normalize(2021, rows)?;

        assert_eq!(table.columns[1].values, vec![None]);

        Ok(())
    }

    #[test]
    fn test_normalize_without_header_fails() {
        let rows = vec![row(&["2021-01-01 01:00:00", "5,0"])];
        let result = ShapeNormalizer::new().normalize(2021, rows);

        assert!(matches!(result, Err(PipelineError::InvalidFormat(_))));
    }

    #[test]
    fn test_normalize_without_data_rows_yields_empty_table() -> Result<()> {
        let rows = vec![row(&["Kod stacji", "DsWrocAlWisn"])];
        let table = ShapeNormalizer::new().normalize(2021, rows)?;

        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.columns[0].code, "DsWrocAlWisn");

        Ok(())
    }
}
