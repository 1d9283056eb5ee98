use crate::error::Result;
use crate::utils::constants::STATION_CODE_MARKER;
use crate::utils::timestamps::parse_sheet_timestamp;
use csv::ReaderBuilder;
use std::path::Path;

/// Loosely-typed rows of a raw yearly sheet, straight out of the export.
pub type RawRows = Vec<Vec<String>>;

/// Reads a raw yearly measurement sheet and drops everything that is not
/// data: titles, blank separators and footnotes go, timestamped rows and
/// the station-code header row stay.
pub struct SheetReader;

impl SheetReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the sheet as untyped rows. The export has no uniform record
    /// width, so the reader runs in flexible mode with no header handling.
    pub fn read_raw(&self, path: &Path) -> Result<RawRows> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(rows)
    }

    /// Retain only rows whose first cell is a timestamp or the literal
    /// station-code marker.
    pub fn filter_rows(&self, rows: RawRows) -> RawRows {
        rows.into_iter()
            .filter(|row| {
                let first = row.first().map(String::as_str).unwrap_or("");
                first.trim() == STATION_CODE_MARKER || parse_sheet_timestamp(first).is_some()
            })
            .collect()
    }

    /// Read and filter in one pass.
    pub fn read_filtered(&self, path: &Path) -> Result<RawRows> {
        Ok(self.filter_rows(self.read_raw(path)?))
    }

    /// True when at least one timestamped measurement row survived
    /// filtering.
    pub fn has_measurement_rows(rows: &RawRows) -> bool {
        rows.iter().any(|row| {
            row.first()
                .map(|cell| parse_sheet_timestamp(cell).is_some())
                .unwrap_or(false)
        })
    }
}

impl Default for SheetReader {
    fn default() -> Self {
        Self::new()
    }
}
