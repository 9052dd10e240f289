pub mod csv_file;
pub mod report;

use crate::core::LinkTable;
use crate::HarvestResult;

pub use csv_file::CsvStorage;
pub use report::write_report;

/// Destination the accumulated table is flushed to after every date.
pub trait TableStorage: Send + Sync {
    fn persist(&self, table: &LinkTable) -> HarvestResult<()>;

    /// Human-readable location, used in logs and the run report.
    fn location(&self) -> String;
}
