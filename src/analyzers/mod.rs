pub mod exceedance;
pub mod monthly;

pub use exceedance::{DailySeries, ExceedanceAnalyzer};
pub use monthly::MonthlyAnalyzer;
