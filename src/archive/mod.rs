use crate::error::{PipelineError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// Extracts the raw measurement sheet from a yearly archive into a managed
/// temporary directory. The directory lives as long as the extractor, so
/// extracted paths stay valid for the whole run.
pub struct ArchiveExtractor {
    temp_dir: TempDir,
}

impl ArchiveExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn temp_dir_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Extract `sheet_name` from the archive. Some published archives name
    /// the inner sheet inconsistently, so when the exact name is missing
    /// the lone CSV entry is taken instead.
    pub fn extract_sheet(&self, zip_path: &Path, sheet_name: &str) -> Result<PathBuf> {
        let file = File::open(zip_path)?;
        let mut archive = ZipArchive::new(file)?;

        let entry_name = resolve_entry_name(&archive, sheet_name).ok_or_else(|| {
            PipelineError::SheetNotFound(sheet_name.to_string(), zip_path.to_path_buf())
        })?;

        let mut zip_file = archive.by_name(&entry_name)?;

        // Flatten any directory prefix carried by the entry.
        let file_name = Path::new(&entry_name)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| sheet_name.to_string());
        let dest_path = self.temp_dir.path().join(file_name);

        let dest_file = File::create(&dest_path)?;
        let mut writer = BufWriter::new(dest_file);
        std::io::copy(&mut zip_file, &mut writer)?;
        writer.flush()?;

        Ok(dest_path)
    }
}

fn resolve_entry_name(archive: &ZipArchive<File>, sheet_name: &str) -> Option<String> {
    let names: Vec<&str> = archive.file_names().collect();

    if let Some(exact) = names.iter().find(|n| {
        **n == sheet_name
            || Path::new(n).file_name().map(|f| f.to_string_lossy() == sheet_name) == Some(true)
    }) {
        return Some(exact.to_string());
    }

    let csv_entries: Vec<&&str> = names
        .iter()
        .filter(|n| n.to_lowercase().ends_with(".csv"))
        .collect();

    match csv_entries.as_slice() {
        [only] => Some(only.to_string()),
        _ => None,
    }
}
