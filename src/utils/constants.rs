/// Daily-mean PM2.5 reference threshold (µg/m³); a day is an exceedance
/// day when its mean is strictly above this value.
pub const PM25_DAILY_LIMIT: f64 = 15.0;

/// Marker token in the first column of a raw sheet identifying the
/// station-code header row.
pub const STATION_CODE_MARKER: &str = "Kod stacji";

/// File names
pub const METADATA_FILE: &str = "station_metadata.csv";

/// Output file names
pub const MONTHLY_MEANS_FILE: &str = "monthly_means.csv";
pub const CITY_MONTHLY_MEANS_FILE: &str = "city_monthly_means.csv";
pub const EXCEEDANCE_DAYS_FILE: &str = "exceedance_days.csv";
pub const VOIVODESHIP_EXCEEDANCE_FILE: &str = "voivodeship_exceedance.csv";

/// Name of the yearly measurement archive as published per year.
pub fn sheet_archive_name(year: i32) -> String {
    format!("{}_PM25_1g.zip", year)
}

/// Name of the raw measurement sheet inside the yearly archive.
pub fn sheet_file_name(year: i32) -> String {
    format!("{}_PM25_1g.csv", year)
}
