use crate::core::RunReport;
use crate::HarvestResult;
use log::info;
use std::fs;
use std::path::Path;

pub fn write_report(report: &RunReport, path: &Path) -> HarvestResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    info!("Run report written to {}", path.display());
    Ok(())
}
