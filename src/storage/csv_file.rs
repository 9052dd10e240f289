use super::TableStorage;
use crate::core::LinkTable;
use crate::HarvestResult;
use csv::WriterBuilder;
use log::{debug, warn};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 3] = ["url", "text", "date"];

/// Keeps the whole table in one CSV file, rewritten from scratch on every
/// persist.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    /// Creates the parent directory if needed.
    pub fn new<P: AsRef<Path>>(path: P) -> HarvestResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("links.csv"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_staging(&self, table: &LinkTable, staging: &Path) -> HarvestResult<()> {
        // Header is written by hand so an empty table still gets one.
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(staging)?;
        writer.write_record(CSV_HEADER)?;
        for record in table.records() {
            writer.serialize(record)?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(staging, &self.path)?;
        Ok(())
    }
}

impl TableStorage for CsvStorage {
    fn persist(&self, table: &LinkTable) -> HarvestResult<()> {
        let staging = self.staging_path();
        if let Err(e) = self.write_staging(table, &staging) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", staging.display(), cleanup);
                }
            }
            return Err(e);
        }
        debug!("Wrote {} rows to {}", table.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
