mod collector;
mod config;
mod dates;
mod errors;
mod harvesting;
mod pager;
mod report;
mod search;
mod table;

pub use collector::{collect_links, Collected};
pub use config::{
    BrowserOptions, DelayRange, HarvestConfig, DEFAULT_ANCHOR_XPATH, DEFAULT_LOAD_MORE_XPATH,
    DEFAULT_MARKER, DEFAULT_OUTPUT,
};
pub use dates::{date_range, DateEntry};
pub use errors::{HarvestError, HarvestResult};
pub use harvesting::Harvester;
pub use pager::{exhaust, Exhaustion, StopReason};
pub use report::{DateOutcome, DateReport, RunReport, Stage};
pub use search::{SearchTemplate, DEFAULT_SEARCH_BASE, DEFAULT_SECTION, DEFAULT_SORT};
pub use table::{LinkRecord, LinkTable};
