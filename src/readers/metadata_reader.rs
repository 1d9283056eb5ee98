use crate::error::{PipelineError, Result};
use crate::models::StationMetadata;
use crate::utils::codes::clean_station_code;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::Path;
use validator::Validate;

/// Metadata sheet column headers, as published by the agency.
const CODE_HEADER: &str = "Kod stacji";
const HISTORICAL_CODE_HEADER_PREFIX: &str = "Stary Kod stacji";
const LOCALITY_HEADER: &str = "Miejscowość";
const VOIVODESHIP_HEADER: &str = "Województwo";

/// Reads the station metadata sheet: current codes, localities,
/// voivodeships and the historical-code aliases each station carries.
pub struct MetadataReader;

impl MetadataReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_stations(&self, path: &Path) -> Result<Vec<StationMetadata>> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

        let headers = reader.headers()?.clone();
        let code_idx = find_column(&headers, CODE_HEADER)?;
        let locality_idx = find_column(&headers, LOCALITY_HEADER)?;
        let voivodeship_idx = find_column(&headers, VOIVODESHIP_HEADER)?;
        // The historical-code header wraps across lines in some exports, so
        // match it by prefix.
        let historical_idx = headers
            .iter()
            .position(|h| h.trim().starts_with(HISTORICAL_CODE_HEADER_PREFIX));

        let mut stations = Vec::new();
        for record in reader.records() {
            let record = record?;

            let code = clean_station_code(record.get(code_idx).unwrap_or(""));
            if code.is_empty() {
                continue;
            }

            let locality = record.get(locality_idx).unwrap_or("").trim().to_string();
            let voivodeship = match record.get(voivodeship_idx).unwrap_or("").trim() {
                "" => None,
                v => Some(v.to_string()),
            };

            let historical_codes = historical_idx
                .and_then(|idx| record.get(idx))
                .map(parse_historical_codes)
                .unwrap_or_default();

            let station = StationMetadata::new(code, locality, voivodeship, historical_codes);
            station.validate()?;
            stations.push(station);
        }

        Ok(stations)
    }
}

impl Default for MetadataReader {
    fn default() -> Self {
        Self::new()
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| {
            PipelineError::InvalidFormat(format!("metadata sheet has no '{}' column", name))
        })
}

/// A station may list several historical codes, comma-joined in one cell.
fn parse_historical_codes(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(clean_station_code)
        .filter(|code| !code.is_empty())
        .collect()
}

/// Immutable historical-code → current-code mapping, built once per run.
pub fn build_code_lookup(stations: &[StationMetadata]) -> HashMap<String, String> {
    let mut lookup = HashMap::new();
    for station in stations {
        for historical in &station.historical_codes {
            lookup.insert(historical.clone(), station.code.clone());
        }
    }
    lookup
}

/// Current code → locality, for attaching compound column labels.
pub fn build_locality_map(stations: &[StationMetadata]) -> HashMap<String, String> {
    stations
        .iter()
        .map(|s| (s.code.clone(), s.locality.clone()))
        .collect()
}

/// Current code → voivodeship; stations without one are simply absent and
/// end up dropped from the regional summary.
pub fn build_voivodeship_map(stations: &[StationMetadata]) -> HashMap<String, String> {
    stations
        .iter()
        .filter_map(|s| {
            s.voivodeship
                .as_ref()
                .map(|v| (s.code.clone(), v.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_metadata_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Nr,Kod stacji,Stary Kod stacji (o ile inny od aktualnego),Miejscowość,Województwo"
        )
        .unwrap();
        writeln!(file, "1,DsWrocAlWisn,\"DsWrocAlWisn1, DsWrocAlWisn2\",Wrocław,dolnośląskie")
            .unwrap();
        writeln!(file, "2, MzWarKondrat ,,Warszawa,mazowieckie").unwrap();
        writeln!(file, "3,PdBialWarsz,,Białystok,").unwrap();
        file
    }

    #[test]
    fn test_read_stations() -> Result<()> {
        let file = sample_metadata_file();
        let stations = MetadataReader::new().read_stations(file.path())?;

        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].code, "DsWrocAlWisn");
        assert_eq!(
            stations[0].historical_codes,
            vec!["DsWrocAlWisn1".to_string(), "DsWrocAlWisn2".to_string()]
        );
        // Whitespace around codes is stripped.
        assert_eq!(stations[1].code, "MzWarKondrat");
        assert!(stations[1].historical_codes.is_empty());
        // Missing voivodeship stays missing rather than becoming "".
        assert_eq!(stations[2].voivodeship, None);

        Ok(())
    }

    #[test]
    fn test_build_code_lookup() -> Result<()> {
        let file = sample_metadata_file();
        let stations = MetadataReader::new().read_stations(file.path())?;
        let lookup = build_code_lookup(&stations);

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.get("DsWrocAlWisn1"), Some(&"DsWrocAlWisn".to_string()));
        assert_eq!(lookup.get("DsWrocAlWisn2"), Some(&"DsWrocAlWisn".to_string()));

        Ok(())
    }

    #[test]
    fn test_build_maps() -> Result<()> {
        let file = sample_metadata_file();
        let stations = MetadataReader::new().read_stations(file.path())?;

        let localities = build_locality_map(&stations);
        assert_eq!(localities.get("MzWarKondrat"), Some(&"Warszawa".to_string()));

        let voivodeships = build_voivodeship_map(&stations);
        assert_eq!(
            voivodeships.get("DsWrocAlWisn"),
            Some(&"dolnośląskie".to_string())
        );
        assert!(!voivodeships.contains_key("PdBialWarsz"));

        Ok(())
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Nr,Kod,Miasto").unwrap();
        writeln!(file, "1,DsWrocAlWisn,Wrocław").unwrap();

        let result = MetadataReader::new().read_stations(file.path());
        assert!(matches!(result, Err(PipelineError::InvalidFormat(_))));
    }
}
