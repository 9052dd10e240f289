use crate::HarvestResult;
use async_trait::async_trait;
use url::Url;

/// Something that can start a fresh browser session.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn launch(&self) -> HarvestResult<Box<dyn BrowserSession>>;
}

/// A live browser process with one page.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn goto(&mut self, url: &Url) -> HarvestResult<()>;

    /// First element matching `xpath`. Absence is reported as
    /// [`HarvestError::ElementNotFound`](crate::HarvestError::ElementNotFound).
    async fn find(&self, xpath: &str) -> HarvestResult<Box<dyn PageElement>>;

    /// All elements matching `xpath` in document order. No match is an empty list.
    async fn find_all(&self, xpath: &str) -> HarvestResult<Vec<Box<dyn PageElement>>>;

    async fn close(self: Box<Self>) -> HarvestResult<()>;
}

#[async_trait]
pub trait PageElement: Send + Sync {
    async fn click(&self) -> HarvestResult<()>;
    async fn attribute(&self, name: &str) -> HarvestResult<Option<String>>;
    /// Rendered text, as a user would see it.
    async fn text(&self) -> HarvestResult<Option<String>>;
}
