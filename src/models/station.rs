use serde::{Deserialize, Serialize};
use validator::Validate;

/// One row of the agency metadata sheet: the current station code plus the
/// descriptive fields the pipeline joins against.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    #[validate(length(min = 1))]
    pub code: String,

    #[validate(length(min = 1))]
    pub locality: String,

    /// Administrative region; missing for a handful of retired stations.
    pub voivodeship: Option<String>,

    /// Codes this station was issued before `code`; empty for most stations.
    pub historical_codes: Vec<String>,
}

impl StationMetadata {
    pub fn new(
        code: String,
        locality: String,
        voivodeship: Option<String>,
        historical_codes: Vec<String>,
    ) -> Self {
        Self {
            code,
            locality,
            voivodeship,
            historical_codes,
        }
    }

    pub fn has_historical_codes(&self) -> bool {
        !self.historical_codes.is_empty()
    }
}
