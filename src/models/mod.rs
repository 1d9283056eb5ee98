pub mod aggregate;
pub mod station;
pub mod table;

pub use aggregate::{MonthlySeries, StationExceedance, VoivodeshipExceedance};
pub use station::StationMetadata;
pub use table::{CombinedTable, HourlyTable, StationColumn};
