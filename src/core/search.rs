use super::dates::DateEntry;
use super::{HarvestError, HarvestResult};
use url::Url;

pub const DEFAULT_SEARCH_BASE: &str = "https://www.nytimes.com/search";
pub const DEFAULT_SECTION: &str = "U.S.|nyt://section/a34d3d6c-c77f-5931-b951-241b4e28681c";
pub const DEFAULT_SORT: &str = "best";
pub const DEFAULT_TYPES: &str = "article";

/// Fixed parts of the archive search query. Only the date varies per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTemplate {
    base: String,
    pub section: String,
    pub sort: String,
    pub types: String,
}

impl Default for SearchTemplate {
    fn default() -> Self {
        Self {
            base: DEFAULT_SEARCH_BASE.to_string(),
            section: DEFAULT_SECTION.to_string(),
            sort: DEFAULT_SORT.to_string(),
            types: DEFAULT_TYPES.to_string(),
        }
    }
}

impl SearchTemplate {
    pub fn with_base(mut self, base: &str) -> HarvestResult<Self> {
        parse_base(base)?;
        self.base = base.to_string();
        Ok(self)
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn base(&self) -> HarvestResult<Url> {
        parse_base(&self.base)
    }

    /// Search URL restricted to the single day of `entry`.
    pub fn url_for(&self, entry: &DateEntry) -> HarvestResult<Url> {
        let mut url = self.base()?;
        url.query_pairs_mut()
            .clear()
            .append_pair("dropmab", "false")
            .append_pair("endDate", &entry.date_code)
            .append_pair("query", "")
            .append_pair("sections", &self.section)
            .append_pair("sort", &self.sort)
            .append_pair("startDate", &entry.date_code)
            .append_pair("types", &self.types);
        Ok(url)
    }
}

fn parse_base(base: &str) -> HarvestResult<Url> {
    let url = Url::parse(base)?;
    if url.cannot_be_a_base() {
        return Err(HarvestError::Config(format!(
            "search base {} cannot carry a query",
            url
        )));
    }
    Ok(url)
}
