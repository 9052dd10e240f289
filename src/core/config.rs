use super::search::SearchTemplate;
use super::{HarvestError, HarvestResult};
use chrono::{Datelike, NaiveDate};
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LOAD_MORE_XPATH: &str = r#"//*[@id="site-content"]/div/div[2]/div[2]/div/button"#;
pub const DEFAULT_ANCHOR_XPATH: &str =
    r#"//*[@id="site-content"]/div/div[2]/div[1]/ol/li[.]/div/div/a"#;
pub const DEFAULT_MARKER: &str = "PRINT EDITION";
pub const DEFAULT_OUTPUT: &str = "nyt_urls_1991_2018.csv";

/// Last year whose date code is still eight digits.
const MAX_YEAR: i32 = 9999;

/// Half-open range `[min, max)` the pause after each "load more" click is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(2),
            max: Duration::from_secs(6),
        }
    }
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::rng().random_range(self.min..self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserOptions {
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub no_sandbox: bool,
    pub request_timeout: Duration,
    pub extra_args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            no_sandbox: false,
            request_timeout: Duration::from_secs(30),
            extra_args: vec!["--disable-gpu".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub search: SearchTemplate,
    pub load_more_xpath: String,
    pub anchor_xpath: String,
    pub marker: String,
    pub delay: DelayRange,
    pub output: PathBuf,
    pub report: Option<PathBuf>,
    pub browser: BrowserOptions,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1992, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or_default(),
            search: SearchTemplate::default(),
            load_more_xpath: DEFAULT_LOAD_MORE_XPATH.to_string(),
            anchor_xpath: DEFAULT_ANCHOR_XPATH.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            delay: DelayRange::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            report: None,
            browser: BrowserOptions::default(),
        }
    }
}

impl HarvestConfig {
    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_search(mut self, search: SearchTemplate) -> Self {
        self.search = search;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_delay(mut self, delay: DelayRange) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_report(mut self, report: impl Into<PathBuf>) -> Self {
        self.report = Some(report.into());
        self
    }

    pub fn with_browser(mut self, browser: BrowserOptions) -> Self {
        self.browser = browser;
        self
    }

    pub fn validate(&self) -> HarvestResult<()> {
        if self.marker.is_empty() {
            return Err(HarvestError::Config("marker must not be empty".to_string()));
        }
        if self.delay.min > self.delay.max {
            return Err(HarvestError::Config(format!(
                "minimum delay {:?} exceeds maximum delay {:?}",
                self.delay.min, self.delay.max
            )));
        }
        if self.load_more_xpath.is_empty() || self.anchor_xpath.is_empty() {
            return Err(HarvestError::Config("XPath locators must not be empty".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(HarvestError::Config("output path must not be empty".to_string()));
        }
        self.search.base()?;
        for (name, date) in [("start", self.start), ("end", self.end)] {
            if !(0..=MAX_YEAR).contains(&date.year()) {
                return Err(HarvestError::Config(format!(
                    "{} date {} has no YYYYMMDD form",
                    name, date
                )));
            }
        }
        Ok(())
    }
}
