use super::config::DelayRange;
use super::HarvestResult;
use crate::browser::BrowserSession;
use log::{debug, warn};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The control is gone: every result is on the page.
    Absent,
    /// The lookup failed for some other reason. The loop still stops, so the
    /// day's results may be incomplete.
    LookupFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhaustion {
    pub clicks: usize,
    pub delays: Vec<Duration>,
    pub stop: StopReason,
}

/// Click the "load more" control until it can no longer be found, pausing a
/// random interval from `delay` after every click. A failed click is an error.
pub async fn exhaust(
    session: &dyn BrowserSession,
    load_more_xpath: &str,
    delay: &DelayRange,
) -> HarvestResult<Exhaustion> {
    let mut clicks = 0;
    let mut delays = Vec::new();

    loop {
        let button = match session.find(load_more_xpath).await {
            Ok(button) => button,
            Err(e) if e.is_not_found() => {
                debug!("Load-more control gone after {} clicks", clicks);
                return Ok(Exhaustion {
                    clicks,
                    delays,
                    stop: StopReason::Absent,
                });
            }
            Err(e) => {
                warn!(
                    "Load-more lookup failed after {} clicks, treating page as exhausted: {}",
                    clicks, e
                );
                return Ok(Exhaustion {
                    clicks,
                    delays,
                    stop: StopReason::LookupFailed(e.to_string()),
                });
            }
        };

        button.click().await?;
        clicks += 1;

        let pause = delay.sample();
        debug!("Clicked load-more ({}), waiting {:?}", clicks, pause);
        sleep(pause).await;
        delays.push(pause);
    }
}
