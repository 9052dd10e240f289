use super::{Browser, BrowserSession, PageElement};
use crate::{HarvestError, HarvestResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone)]
pub struct MockAnchor {
    pub href: Option<String>,
    pub text: Option<String>,
}

impl MockAnchor {
    pub fn new(href: &str, text: &str) -> Self {
        Self {
            href: Some(href.to_string()),
            text: Some(text.to_string()),
        }
    }
}

/// Scripted behaviour of one search-results page.
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    /// How many times the "load more" control is present before it disappears.
    pub load_more_rounds: usize,
    /// When set, the control lookup after this many clicks fails with a
    /// non-"not found" error instead of succeeding.
    pub lookup_error_after: Option<usize>,
    pub anchors: Vec<MockAnchor>,
    pub fail_navigation: Option<String>,
    pub fail_click: bool,
    pub fail_anchor_lookup: bool,
}

impl MockPage {
    pub fn with_anchors(anchors: Vec<MockAnchor>) -> Self {
        Self {
            anchors,
            ..Self::default()
        }
    }

    pub fn with_load_more_rounds(mut self, rounds: usize) -> Self {
        self.load_more_rounds = rounds;
        self
    }

    pub fn failing_navigation(reason: &str) -> Self {
        Self {
            fail_navigation: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    launches: usize,
    closes: usize,
    clicks: usize,
    visited: Vec<String>,
    fail_launch: bool,
    fail_close: bool,
}

/// In-memory stand-in for a real browser. Pages are looked up by exact URL;
/// unknown URLs load an empty results page.
#[derive(Clone, Default)]
pub struct MockBrowser {
    pages: Arc<HashMap<String, MockPage>>,
    state: Arc<Mutex<MockState>>,
}

impl MockBrowser {
    pub fn new(pages: HashMap<String, MockPage>) -> Self {
        Self {
            pages: Arc::new(pages),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn failing_launch(self) -> Self {
        self.state.lock().fail_launch = true;
        self
    }

    pub fn failing_close(self) -> Self {
        self.state.lock().fail_close = true;
        self
    }

    pub fn launches(&self) -> usize {
        self.state.lock().launches
    }

    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }

    pub fn clicks(&self) -> usize {
        self.state.lock().clicks
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().visited.clone()
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn launch(&self) -> HarvestResult<Box<dyn BrowserSession>> {
        let mut state = self.state.lock();
        if state.fail_launch {
            return Err(HarvestError::Launch("mock browser refused to start".to_string()));
        }
        state.launches += 1;
        Ok(Box::new(MockSession {
            pages: Arc::clone(&self.pages),
            state: Arc::clone(&self.state),
            page: None,
            clicks_on_page: Arc::new(Mutex::new(0)),
        }))
    }
}

pub struct MockSession {
    pages: Arc<HashMap<String, MockPage>>,
    state: Arc<Mutex<MockState>>,
    page: Option<MockPage>,
    clicks_on_page: Arc<Mutex<usize>>,
}

impl MockSession {
    fn current(&self) -> HarvestResult<&MockPage> {
        self.page
            .as_ref()
            .ok_or_else(|| HarvestError::Browser("no page loaded".to_string()))
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn goto(&mut self, url: &Url) -> HarvestResult<()> {
        self.state.lock().visited.push(url.to_string());
        let page = self.pages.get(url.as_str()).cloned().unwrap_or_default();
        if let Some(ref reason) = page.fail_navigation {
            return Err(HarvestError::Navigation {
                url: url.to_string(),
                reason: reason.clone(),
            });
        }
        *self.clicks_on_page.lock() = 0;
        self.page = Some(page);
        Ok(())
    }

    async fn find(&self, xpath: &str) -> HarvestResult<Box<dyn PageElement>> {
        let page = self.current()?;
        let clicks = *self.clicks_on_page.lock();
        if page.lookup_error_after == Some(clicks) {
            return Err(HarvestError::Browser("mock lookup timed out".to_string()));
        }
        if clicks >= page.load_more_rounds {
            return Err(HarvestError::not_found(xpath));
        }
        Ok(Box::new(MockButton {
            fail: page.fail_click,
            clicks_on_page: Arc::clone(&self.clicks_on_page),
            state: Arc::clone(&self.state),
        }))
    }

    async fn find_all(&self, _xpath: &str) -> HarvestResult<Vec<Box<dyn PageElement>>> {
        let page = self.current()?;
        if page.fail_anchor_lookup {
            return Err(HarvestError::Browser("mock anchor lookup failed".to_string()));
        }
        Ok(page
            .anchors
            .iter()
            .cloned()
            .map(|anchor| Box::new(anchor) as Box<dyn PageElement>)
            .collect())
    }

    async fn close(self: Box<Self>) -> HarvestResult<()> {
        let mut state = self.state.lock();
        state.closes += 1;
        if state.fail_close {
            return Err(HarvestError::Browser("mock browser did not exit".to_string()));
        }
        Ok(())
    }
}

struct MockButton {
    fail: bool,
    clicks_on_page: Arc<Mutex<usize>>,
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl PageElement for MockButton {
    async fn click(&self) -> HarvestResult<()> {
        if self.fail {
            return Err(HarvestError::Browser("element is not clickable".to_string()));
        }
        *self.clicks_on_page.lock() += 1;
        self.state.lock().clicks += 1;
        Ok(())
    }

    async fn attribute(&self, _name: &str) -> HarvestResult<Option<String>> {
        Ok(None)
    }

    async fn text(&self) -> HarvestResult<Option<String>> {
        Ok(Some("Show More".to_string()))
    }
}

#[async_trait]
impl PageElement for MockAnchor {
    async fn click(&self) -> HarvestResult<()> {
        Ok(())
    }

    async fn attribute(&self, name: &str) -> HarvestResult<Option<String>> {
        Ok(match name {
            "href" => self.href.clone(),
            _ => None,
        })
    }

    async fn text(&self) -> HarvestResult<Option<String>> {
        Ok(self.text.clone())
    }
}
