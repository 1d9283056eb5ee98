use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Whether an ambiguous-but-recoverable condition only warns or aborts the
/// run. The source behavior is to warn and continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Warn,
    Abort,
}

/// Per-report parameters supplied by the YAML configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Localities to summarize at city level.
    #[serde(default)]
    pub cities: Vec<String>,

    /// Behavior when the historical-code lookup turns out empty.
    #[serde(default)]
    pub on_empty_lookup: FailureMode,

    /// Behavior when row filtering leaves a yearly sheet without
    /// measurement rows.
    #[serde(default)]
    pub on_empty_sheet: FailureMode,
}

impl ReportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
