/// Canonicalize a station code cell: strip embedded control characters
/// (some exports carry stray CR/LF/tabs inside the code) and surrounding
/// whitespace.
pub fn clean_station_code(raw: &str) -> String {
    raw.replace(['\n', '\r', '\t'], "").trim().to_string()
}
