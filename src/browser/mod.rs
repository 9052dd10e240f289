pub mod chrome;
pub mod mock_browser;

mod session;
pub use chrome::ChromeBrowser;
pub use mock_browser::{MockAnchor, MockBrowser, MockPage};
pub use session::{Browser, BrowserSession, PageElement};
