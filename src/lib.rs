pub mod browser;
pub mod core;
pub mod stats;
pub mod storage;

pub use crate::core::{
    date_range, DateEntry, HarvestConfig, HarvestError, HarvestResult, Harvester, LinkRecord,
    LinkTable, RunReport,
};
pub use browser::{Browser, BrowserSession, ChromeBrowser};
pub use stats::StatsTracker;
pub use storage::{CsvStorage, TableStorage};
