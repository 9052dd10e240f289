use crate::core::collector::{collect_links, Collected};
use crate::core::config::HarvestConfig;
use crate::core::dates::DateEntry;
use crate::core::pager::{exhaust, Exhaustion, StopReason};
use crate::core::report::{DateOutcome, DateReport, RunReport, Stage};
use crate::core::table::LinkTable;
use crate::core::HarvestError;
use crate::browser::{Browser, BrowserSession};
use crate::stats::StatsTracker;
use crate::storage::TableStorage;
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::time::Instant;
use url::Url;

/// Visits one day at a time: fresh browser, exhaust the results page, collect
/// marked links, close the browser, flush the table.
pub struct Harvester<B: Browser, S: TableStorage> {
    browser: B,
    storage: S,
    config: HarvestConfig,
    stats: Arc<StatsTracker>,
}

impl<B: Browser, S: TableStorage> Harvester<B, S> {
    pub fn new(browser: B, storage: S, config: HarvestConfig) -> Self {
        info!("Initializing harvester");
        Self {
            browser,
            storage,
            config,
            stats: Arc::new(StatsTracker::new()),
        }
    }

    pub fn stats(&self) -> Arc<StatsTracker> {
        Arc::clone(&self.stats)
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Never fails as a whole: a date that goes wrong is recorded in the
    /// report and the run moves on.
    pub async fn run(&self, dates: &[DateEntry]) -> (LinkTable, RunReport) {
        let mut table = LinkTable::new();
        let mut report = RunReport::new(self.storage.location());
        let total = dates.len();

        info!(
            "Starting harvest run {} over {} dates into {}",
            report.run_id,
            total,
            self.storage.location()
        );

        for (index, entry) in dates.iter().enumerate() {
            let started = Instant::now();
            let (url, outcome) = match self.config.search.url_for(entry) {
                Ok(url) => {
                    let (next, outcome) = self.harvest_date(table, entry, &url).await;
                    table = next;
                    (url.to_string(), outcome)
                }
                Err(e) => (String::new(), DateOutcome::failed(Stage::Navigate, &e)),
            };

            match &outcome {
                DateOutcome::Harvested { records, .. } => {
                    debug!("{}: kept {} links", entry.date_code, records);
                }
                DateOutcome::Failed { stage, error } => {
                    warn!(
                        "{}: failed at {} stage ({}): {}",
                        entry.date_code, stage, url, error
                    );
                    self.stats.record_failure(stage.to_string());
                }
            }

            report.dates.push(DateReport {
                date: entry.date_code.clone(),
                url,
                outcome,
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
            info!("{} out of {}", index + 1, total);
        }

        report.total_records = table.len();
        report.finished_at = Some(Utc::now());
        self.stats.finish();

        info!(
            "Harvest run {} completed: {} records, {} failed dates",
            report.run_id,
            report.total_records,
            report.failures().count()
        );
        (table, report)
    }

    async fn harvest_date(
        &self,
        table: LinkTable,
        entry: &DateEntry,
        url: &Url,
    ) -> (LinkTable, DateOutcome) {
        let mut session = match self.browser.launch().await {
            Ok(session) => session,
            Err(e) => return (table, DateOutcome::failed(Stage::Launch, &e)),
        };

        let visited = self.visit(session.as_mut(), entry, url).await;

        // Released on every path, whatever happened on the page.
        let closed = session.close().await;

        let (exhaustion, collected) = match visited {
            Ok(visited) => visited,
            Err((stage, e)) => {
                if let Err(close_err) = closed {
                    warn!("{}: failed to close browser: {}", entry.date_code, close_err);
                }
                return (table, DateOutcome::failed(stage, &e));
            }
        };
        if let Err(e) = closed {
            return (table, DateOutcome::failed(Stage::Close, &e));
        }

        let records = collected.records.len();
        let table = table.append(collected.records);
        if let Err(e) = self.storage.persist(&table) {
            return (table, DateOutcome::failed(Stage::Persist, &e));
        }

        let possibly_truncated = matches!(exhaustion.stop, StopReason::LookupFailed(_));
        if possibly_truncated {
            self.stats.record_truncated_page();
        }

        self.stats.record_success(
            exhaustion.clicks,
            exhaustion.delays.iter().sum(),
            collected.anchors_seen,
            records,
        );
        (
            table,
            DateOutcome::Harvested {
                clicks: exhaustion.clicks,
                anchors_seen: collected.anchors_seen,
                records,
                possibly_truncated,
            },
        )
    }

    async fn visit(
        &self,
        session: &mut dyn BrowserSession,
        entry: &DateEntry,
        url: &Url,
    ) -> Result<(Exhaustion, Collected), (Stage, HarvestError)> {
        session
            .goto(url)
            .await
            .map_err(|e| (Stage::Navigate, e))?;

        let exhaustion = exhaust(&*session, &self.config.load_more_xpath, &self.config.delay)
            .await
            .map_err(|e| (Stage::Exhaust, e))?;

        let collected = collect_links(
            &*session,
            &self.config.anchor_xpath,
            &self.config.marker,
            &entry.date_code,
        )
        .await
        .map_err(|e| (Stage::Collect, e))?;

        Ok((exhaustion, collected))
    }
}
