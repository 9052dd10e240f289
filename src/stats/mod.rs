use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct HarvestStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub dates_processed: usize,
    pub dates_succeeded: usize,
    pub dates_failed: usize,
    pub clicks: usize,
    pub truncated_pages: usize,
    pub anchors_seen: usize,
    pub links_kept: usize,
    pub waited: Duration,
    pub failure_stages: HashMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<HarvestStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(HarvestStats {
                start_time: Utc::now(),
                end_time: None,
                dates_processed: 0,
                dates_succeeded: 0,
                dates_failed: 0,
                clicks: 0,
                truncated_pages: 0,
                anchors_seen: 0,
                links_kept: 0,
                waited: Duration::ZERO,
                failure_stages: HashMap::new(),
            })),
        }
    }

    pub fn record_success(&self, clicks: usize, waited: Duration, anchors: usize, kept: usize) {
        let mut stats = self.stats.write();
        stats.dates_processed += 1;
        stats.dates_succeeded += 1;
        stats.clicks += clicks;
        stats.waited += waited;
        stats.anchors_seen += anchors;
        stats.links_kept += kept;
    }

    pub fn record_failure(&self, stage: String) {
        let mut stats = self.stats.write();
        stats.dates_processed += 1;
        stats.dates_failed += 1;
        *stats.failure_stages.entry(stage).or_insert(0) += 1;
    }

    pub fn record_truncated_page(&self) {
        self.stats.write().truncated_pages += 1;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> HarvestStats {
        self.stats.read().clone()
    }

    pub fn print_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        println!("\nHarvest Statistics:");
        println!("===================");
        println!("Duration: {} seconds", duration.num_seconds());
        println!("Dates Processed: {}", stats.dates_processed);
        println!("Dates Succeeded: {}", stats.dates_succeeded);
        println!("Dates Failed: {}", stats.dates_failed);
        println!("Load-more Clicks: {}", stats.clicks);
        println!("Time Spent Waiting: {:.1}s", stats.waited.as_secs_f64());
        println!("Anchors Seen: {}", stats.anchors_seen);
        println!("Links Kept: {}", stats.links_kept);
        if stats.truncated_pages > 0 {
            println!(
                "Pages Possibly Truncated: {} (load-more lookup failed)",
                stats.truncated_pages
            );
        }

        if !stats.failure_stages.is_empty() {
            println!("\nFailures by Stage:");
            for (stage, count) in &stats.failure_stages {
                println!("  {}: {}", stage, count);
            }
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
