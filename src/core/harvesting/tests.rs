use super::Harvester;
use crate::browser::{MockAnchor, MockBrowser, MockPage};
use crate::core::{
    date_range, DateEntry, DateOutcome, HarvestConfig, LinkRecord, LinkTable, Stage,
};
use crate::storage::{CsvStorage, TableStorage};
use crate::{HarvestError, HarvestResult};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::{tempdir, TempDir};

fn two_days() -> Vec<DateEntry> {
    date_range(
        NaiveDate::from_ymd_opt(1992, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(1992, 1, 3).unwrap(),
    )
}

fn url_of(config: &HarvestConfig, entry: &DateEntry) -> String {
    config.search.url_for(entry).unwrap().to_string()
}

fn csv_storage(dir: &TempDir) -> CsvStorage {
    CsvStorage::new(dir.path().join("links.csv")).unwrap()
}

fn first_day_page() -> MockPage {
    MockPage::with_anchors(vec![
        MockAnchor::new("https://archive.test/a", "Markets rally"),
        MockAnchor::new("https://archive.test/b", "See PRINT EDITION page A1"),
        MockAnchor::new("https://archive.test/c", "print edition"),
    ])
    .with_load_more_rounds(2)
}

fn second_day_page() -> MockPage {
    MockPage::with_anchors(vec![MockAnchor::new(
        "https://archive.test/d",
        "Weather outlook",
    )])
}

/// Fails the first `failures` persists, then writes through.
struct FlakyStorage {
    inner: CsvStorage,
    failures: AtomicUsize,
}

impl TableStorage for FlakyStorage {
    fn persist(&self, table: &LinkTable) -> HarvestResult<()> {
        if self.failures.load(Ordering::SeqCst) > 0 {
            self.failures.fetch_sub(1, Ordering::SeqCst);
            return Err(HarvestError::IoError(std::io::Error::other("disk full")));
        }
        self.inner.persist(table)
    }

    fn location(&self) -> String {
        self.inner.location()
    }
}

#[tokio::test(start_paused = true)]
async fn test_two_day_run_writes_single_match() {
    let dir = tempdir().unwrap();
    let config = HarvestConfig::default();
    let days = two_days();
    let browser = MockBrowser::new(HashMap::from([
        (url_of(&config, &days[0]), first_day_page()),
        (url_of(&config, &days[1]), second_day_page()),
    ]));
    let storage = csv_storage(&dir);
    let output = storage.path().to_path_buf();

    let harvester = Harvester::new(browser.clone(), storage, config);
    let (table, report) = harvester.run(&days).await;

    assert_eq!(
        table.records(),
        &[LinkRecord::new(
            "https://archive.test/b",
            "See PRINT EDITION page A1",
            "19920101"
        )]
    );
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "url,text,date\nhttps://archive.test/b,See PRINT EDITION page A1,19920101\n"
    );

    assert_eq!(report.total_records, 1);
    assert!(!report.has_failures());
    assert_eq!(
        report.dates[0].outcome,
        DateOutcome::Harvested {
            clicks: 2,
            anchors_seen: 3,
            records: 1,
            possibly_truncated: false,
        }
    );
    assert!(matches!(
        report.dates[1].outcome,
        DateOutcome::Harvested { records: 0, .. }
    ));

    // One fresh browser per date, each one released.
    assert_eq!(browser.launches(), 2);
    assert_eq!(browser.closes(), 2);
    assert_eq!(browser.clicks(), 2);

    let stats = harvester.stats().get_stats();
    assert_eq!(stats.dates_succeeded, 2);
    assert_eq!(stats.links_kept, 1);
    assert_eq!(stats.anchors_seen, 4);
}

#[tokio::test(start_paused = true)]
async fn test_navigation_failure_keeps_earlier_output() {
    let dir = tempdir().unwrap();
    let config = HarvestConfig::default();
    let days = two_days();
    let browser = MockBrowser::new(HashMap::from([
        (url_of(&config, &days[0]), first_day_page()),
        (
            url_of(&config, &days[1]),
            MockPage::failing_navigation("net::ERR_CONNECTION_RESET"),
        ),
    ]));
    let storage = csv_storage(&dir);
    let output = storage.path().to_path_buf();

    let harvester = Harvester::new(browser.clone(), storage, config);
    let (table, report) = harvester.run(&days).await;

    assert_eq!(table.len(), 1);
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "url,text,date\nhttps://archive.test/b,See PRINT EDITION page A1,19920101\n"
    );

    let failed: Vec<_> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].date, "19920102");
    match &failed[0].outcome {
        DateOutcome::Failed { stage, error } => {
            assert_eq!(*stage, Stage::Navigate);
            assert!(error.contains("ERR_CONNECTION_RESET"));
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    // The failed date's session is still closed.
    assert_eq!(browser.closes(), 2);
    assert_eq!(harvester.stats().get_stats().failure_stages.get("navigate"), Some(&1));
}

#[tokio::test(start_paused = true)]
async fn test_collect_failure_discards_partial_records() {
    let dir = tempdir().unwrap();
    let config = HarvestConfig::default();
    let days = two_days();
    let broken = MockPage {
        fail_anchor_lookup: true,
        ..first_day_page()
    };
    let browser = MockBrowser::new(HashMap::from([
        (url_of(&config, &days[0]), broken),
        (
            url_of(&config, &days[1]),
            MockPage::with_anchors(vec![MockAnchor::new(
                "https://archive.test/e",
                "PRINT EDITION",
            )]),
        ),
    ]));

    let harvester = Harvester::new(browser.clone(), csv_storage(&dir), config);
    let (table, report) = harvester.run(&days).await;

    assert_eq!(
        table.records(),
        &[LinkRecord::new("https://archive.test/e", "PRINT EDITION", "19920102")]
    );
    assert!(matches!(
        report.dates[0].outcome,
        DateOutcome::Failed {
            stage: Stage::Collect,
            ..
        }
    ));
    assert_eq!(browser.closes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_launch_failure_never_aborts_run() {
    let dir = tempdir().unwrap();
    let config = HarvestConfig::default();
    let days = two_days();
    let browser = MockBrowser::default().failing_launch();
    let storage = csv_storage(&dir);
    let output = storage.path().to_path_buf();

    let harvester = Harvester::new(browser, storage, config);
    let (table, report) = harvester.run(&days).await;

    assert!(table.is_empty());
    assert_eq!(report.dates.len(), 2);
    assert!(report.dates.iter().all(|d| matches!(
        d.outcome,
        DateOutcome::Failed {
            stage: Stage::Launch,
            ..
        }
    )));
    assert!(!output.exists());
}

#[tokio::test(start_paused = true)]
async fn test_close_failure_fails_the_date() {
    let dir = tempdir().unwrap();
    let config = HarvestConfig::default();
    let days = two_days();
    let browser = MockBrowser::new(HashMap::from([(
        url_of(&config, &days[0]),
        first_day_page(),
    )]))
    .failing_close();

    let harvester = Harvester::new(browser.clone(), csv_storage(&dir), config);
    let (table, report) = harvester.run(&days).await;

    assert!(table.is_empty());
    assert!(report.dates.iter().all(|d| matches!(
        d.outcome,
        DateOutcome::Failed {
            stage: Stage::Close,
            ..
        }
    )));
    assert_eq!(browser.closes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_persist_failure_keeps_records_for_next_flush() {
    let dir = tempdir().unwrap();
    let config = HarvestConfig::default();
    let days = two_days();
    let browser = MockBrowser::new(HashMap::from([
        (url_of(&config, &days[0]), first_day_page()),
        (url_of(&config, &days[1]), second_day_page()),
    ]));
    let storage = FlakyStorage {
        inner: csv_storage(&dir),
        failures: AtomicUsize::new(1),
    };
    let output = storage.inner.path().to_path_buf();

    let harvester = Harvester::new(browser, storage, config);
    let (table, report) = harvester.run(&days).await;

    assert!(matches!(
        report.dates[0].outcome,
        DateOutcome::Failed {
            stage: Stage::Persist,
            ..
        }
    ));
    assert_eq!(table.len(), 1);
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        "url,text,date\nhttps://archive.test/b,See PRINT EDITION page A1,19920101\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_transient_lookup_marks_date_as_possibly_truncated() {
    let dir = tempdir().unwrap();
    let config = HarvestConfig::default();
    let days = &two_days()[..1];
    let page = MockPage {
        lookup_error_after: Some(1),
        ..first_day_page()
    };
    let browser = MockBrowser::new(HashMap::from([(url_of(&config, &days[0]), page)]));

    let harvester = Harvester::new(browser, csv_storage(&dir), config);
    let (table, report) = harvester.run(days).await;

    assert_eq!(table.len(), 1);
    assert_eq!(
        report.dates[0].outcome,
        DateOutcome::Harvested {
            clicks: 1,
            anchors_seen: 3,
            records: 1,
            possibly_truncated: true,
        }
    );
    assert_eq!(harvester.stats().get_stats().truncated_pages, 1);
}

#[tokio::test(start_paused = true)]
async fn test_unpersisted_date_is_not_counted_as_truncated() {
    let dir = tempdir().unwrap();
    let config = HarvestConfig::default();
    let days = &two_days()[..1];
    let page = MockPage {
        lookup_error_after: Some(1),
        ..first_day_page()
    };
    let browser = MockBrowser::new(HashMap::from([(url_of(&config, &days[0]), page)]));
    let storage = FlakyStorage {
        inner: csv_storage(&dir),
        failures: AtomicUsize::new(1),
    };

    let harvester = Harvester::new(browser, storage, config);
    let (_, report) = harvester.run(days).await;

    assert!(matches!(
        report.dates[0].outcome,
        DateOutcome::Failed {
            stage: Stage::Persist,
            ..
        }
    ));
    let stats = harvester.stats().get_stats();
    assert_eq!(stats.truncated_pages, 0);
    assert_eq!(stats.failure_stages.get("persist"), Some(&1));
}
