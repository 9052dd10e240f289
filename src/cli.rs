//! Command-line flags. Every flag can also come from the environment; anything
//! left unset falls back to [`HarvestConfig::default`].

use archivescraper::core::{
    BrowserOptions, DelayRange, SearchTemplate, DEFAULT_MARKER, DEFAULT_OUTPUT,
    DEFAULT_SEARCH_BASE, DEFAULT_SECTION, DEFAULT_SORT,
};
use archivescraper::{HarvestConfig, HarvestResult};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// First day to harvest (inclusive), YYYY-MM-DD
    #[arg(long, env = "HARVEST_START", default_value = "1992-01-01")]
    pub start: NaiveDate,

    /// Day to stop at (exclusive), YYYY-MM-DD
    #[arg(long, env = "HARVEST_END", default_value = "2019-01-01")]
    pub end: NaiveDate,

    /// CSV file rewritten after every day
    #[arg(short, long, env = "HARVEST_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Optional JSON file describing every day's outcome
    #[arg(short, long, env = "HARVEST_REPORT")]
    pub report: Option<PathBuf>,

    /// Chrome or Chromium executable; autodetected when omitted
    #[arg(long, env = "CHROME_PATH")]
    pub chrome: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,

    /// Launch Chrome with --no-sandbox (needed in most containers)
    #[arg(long, env = "HARVEST_NO_SANDBOX")]
    pub no_sandbox: bool,

    /// Shortest pause after a "load more" click, in milliseconds
    #[arg(long, default_value_t = 2_000)]
    pub min_delay_ms: u64,

    /// Upper bound (exclusive) of the pause after a click, in milliseconds
    #[arg(long, default_value_t = 6_000)]
    pub max_delay_ms: u64,

    /// Search page the per-day query is appended to
    #[arg(long, env = "HARVEST_SEARCH_BASE", default_value = DEFAULT_SEARCH_BASE)]
    pub search_base: String,

    /// Value of the `sections` search filter
    #[arg(long, default_value = DEFAULT_SECTION)]
    pub section: String,

    /// Result ordering passed as `sort`
    #[arg(long, default_value = DEFAULT_SORT)]
    pub sort: String,

    /// Text an anchor must contain to be kept
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// DevTools request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Exit with status 2 when any day failed
    #[arg(long)]
    pub fail_on_error: bool,
}

impl Cli {
    pub fn into_config(self) -> HarvestResult<HarvestConfig> {
        let browser = BrowserOptions {
            executable: self.chrome,
            headless: !self.headed,
            no_sandbox: self.no_sandbox,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..BrowserOptions::default()
        };

        let search = SearchTemplate::default()
            .with_base(&self.search_base)?
            .with_section(self.section)
            .with_sort(self.sort);

        let mut config = HarvestConfig::default()
            .with_range(self.start, self.end)
            .with_search(search)
            .with_output(self.output)
            .with_marker(self.marker)
            .with_delay(DelayRange::new(
                Duration::from_millis(self.min_delay_ms),
                Duration::from_millis(self.max_delay_ms),
            ))
            .with_browser(browser);
        if let Some(report) = self.report {
            config = config.with_report(report);
        }

        config.validate()?;
        Ok(config)
    }
}
