use super::{Browser, BrowserSession, PageElement};
use crate::core::BrowserOptions;
use crate::{HarvestError, HarvestResult};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::dom::{DiscardSearchResultsParams, PerformSearchParams};
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser as CdpBrowser, BrowserConfig, Element, Page};
use futures::StreamExt;
use log::{debug, trace, warn};
use tokio::task::JoinHandle;
use url::Url;

impl From<CdpError> for HarvestError {
    fn from(err: CdpError) -> Self {
        HarvestError::Browser(err.to_string())
    }
}

/// Reads the outcome of a `DOM.performSearch` for `xpath`. Chrome answers an
/// empty search with a result count of zero, which is the only way a lookup
/// reports absence; a protocol error is some other failure.
fn match_count(search: Result<i64, CdpError>, xpath: &str) -> HarvestResult<usize> {
    match search {
        Ok(count) if count > 0 => Ok(count as usize),
        Ok(_) => Err(HarvestError::not_found(xpath)),
        Err(e) => Err(HarvestError::Browser(e.to_string())),
    }
}

/// Headless Chrome driven over the DevTools protocol. Every `launch` starts a
/// new Chrome process.
#[derive(Debug, Clone, Default)]
pub struct ChromeBrowser {
    options: BrowserOptions,
}

impl ChromeBrowser {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    fn browser_config(&self) -> HarvestResult<BrowserConfig> {
        let mut builder = BrowserConfig::builder().request_timeout(self.options.request_timeout);

        if let Some(ref executable) = self.options.executable {
            builder = builder.chrome_executable(executable);
        }
        if !self.options.headless {
            builder = builder.with_head();
        }
        if self.options.no_sandbox {
            builder = builder.no_sandbox();
        }
        for arg in &self.options.extra_args {
            builder = builder.arg(arg.as_str());
        }

        builder.build().map_err(HarvestError::Launch)
    }
}

#[async_trait]
impl Browser for ChromeBrowser {
    async fn launch(&self) -> HarvestResult<Box<dyn BrowserSession>> {
        let config = self.browser_config()?;
        let (browser, mut handler) = CdpBrowser::launch(config)
            .await
            .map_err(|e| HarvestError::Launch(e.to_string()))?;

        // The handler drives the websocket; the browser stalls if it is not polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let session = ChromeSession {
                    browser,
                    page: None,
                    handler_task,
                };
                if let Err(close_err) = Box::new(session).close().await {
                    warn!("Failed to close browser after page creation error: {}", close_err);
                }
                return Err(HarvestError::Launch(e.to_string()));
            }
        };

        debug!("Launched Chrome session");
        Ok(Box::new(ChromeSession {
            browser,
            page: Some(page),
            handler_task,
        }))
    }
}

pub struct ChromeSession {
    browser: CdpBrowser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
}

impl ChromeSession {
    fn page(&self) -> HarvestResult<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| HarvestError::Browser("session has no open page".to_string()))
    }

    /// Number of nodes matching `xpath`, or `ElementNotFound` when there are none.
    /// `find_xpath` cannot be asked directly: Chrome rejects fetching results of
    /// an empty search.
    async fn count_matches(&self, xpath: &str) -> HarvestResult<usize> {
        let page = self.page()?;
        page.get_document().await?;

        let search = match page.execute(PerformSearchParams::new(xpath)).await {
            Ok(response) => {
                let found = response.result.result_count;
                let discard = DiscardSearchResultsParams::new(response.result.search_id.clone());
                if let Err(e) = page.execute(discard).await {
                    trace!("Failed to discard search for {}: {}", xpath, e);
                }
                Ok(found)
            }
            Err(e) => Err(e),
        };
        match_count(search, xpath)
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&mut self, url: &Url) -> HarvestResult<()> {
        debug!("Navigating to {}", url);
        self.page()?
            .goto(url.as_str())
            .await
            .map_err(|e| HarvestError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn find(&self, xpath: &str) -> HarvestResult<Box<dyn PageElement>> {
        self.count_matches(xpath).await?;
        let element = self.page()?.find_xpath(xpath).await?;
        Ok(Box::new(ChromeElement { element }))
    }

    async fn find_all(&self, xpath: &str) -> HarvestResult<Vec<Box<dyn PageElement>>> {
        match self.count_matches(xpath).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                trace!("No elements match {}", xpath);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }
        let elements = self.page()?.find_xpaths(xpath).await?;
        trace!("{} elements match {}", elements.len(), xpath);
        Ok(elements
            .into_iter()
            .map(|element| Box::new(ChromeElement { element }) as Box<dyn PageElement>)
            .collect())
    }

    async fn close(self: Box<Self>) -> HarvestResult<()> {
        let mut session = self;
        let closed = session.browser.close().await;
        if closed.is_ok() {
            // Reap the child so it does not linger as a zombie.
            if let Err(e) = session.browser.wait().await {
                warn!("Failed waiting for Chrome to exit: {}", e);
            }
        }
        session.handler_task.abort();
        closed?;
        debug!("Closed Chrome session");
        Ok(())
    }
}

struct ChromeElement {
    element: Element,
}

#[async_trait]
impl PageElement for ChromeElement {
    async fn click(&self) -> HarvestResult<()> {
        self.element.click().await?;
        Ok(())
    }

    async fn attribute(&self, name: &str) -> HarvestResult<Option<String>> {
        Ok(self.element.attribute(name).await?)
    }

    async fn text(&self) -> HarvestResult<Option<String>> {
        Ok(self.element.inner_text().await?)
    }
}
