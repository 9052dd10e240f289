use super::table::LinkRecord;
use super::HarvestResult;
use crate::browser::BrowserSession;
use log::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    pub anchors_seen: usize,
    pub records: Vec<LinkRecord>,
}

/// Read every anchor matching `anchor_xpath` and keep those whose rendered text
/// contains `marker` verbatim. Kept records are tagged with `date_code`.
/// Any lookup or read error fails the whole collection.
pub async fn collect_links(
    session: &dyn BrowserSession,
    anchor_xpath: &str,
    marker: &str,
    date_code: &str,
) -> HarvestResult<Collected> {
    let anchors = session.find_all(anchor_xpath).await?;
    let anchors_seen = anchors.len();
    let mut records = Vec::new();

    for anchor in anchors {
        let url = anchor.attribute("href").await?.unwrap_or_default();
        let text = anchor.text().await?.unwrap_or_default();
        trace!("Anchor {} -> {:?}", url, text);

        if text.contains(marker) {
            records.push(LinkRecord::new(url, text, date_code));
        }
    }

    debug!(
        "Kept {} of {} anchors for {}",
        records.len(),
        anchors_seen,
        date_code
    );
    Ok(Collected {
        anchors_seen,
        records,
    })
}
