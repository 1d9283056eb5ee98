pub mod codes;
pub mod constants;
pub mod progress;
pub mod timestamps;

pub use codes::clean_station_code;
pub use constants::*;
pub use progress::ProgressReporter;
pub use timestamps::{days_in_year, floor_to_minute, parse_sheet_timestamp};
