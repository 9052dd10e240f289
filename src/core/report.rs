use super::HarvestError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Where in a date's iteration a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Launch,
    Navigate,
    Exhaust,
    Collect,
    Close,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Launch => "launch",
            Stage::Navigate => "navigate",
            Stage::Exhaust => "exhaust",
            Stage::Collect => "collect",
            Stage::Close => "close",
            Stage::Persist => "persist",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DateOutcome {
    Harvested {
        clicks: usize,
        anchors_seen: usize,
        records: usize,
        /// The load-more lookup failed for a reason other than absence.
        possibly_truncated: bool,
    },
    Failed {
        stage: Stage,
        error: String,
    },
}

impl DateOutcome {
    pub fn failed(stage: Stage, error: &HarvestError) -> Self {
        DateOutcome::Failed {
            stage,
            error: error.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, DateOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateReport {
    pub date: String,
    pub url: String,
    pub outcome: DateOutcome,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub output: String,
    pub total_records: usize,
    pub dates: Vec<DateReport>,
}

impl RunReport {
    pub fn new(output: String) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            started_at: Utc::now(),
            finished_at: None,
            output,
            total_records: 0,
            dates: Vec::new(),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &DateReport> {
        self.dates.iter().filter(|d| d.outcome.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}
