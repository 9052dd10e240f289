use serde::{Deserialize, Serialize};

/// A kept result link. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub text: String,
    pub date: String,
}

impl LinkRecord {
    pub fn new(url: impl Into<String>, text: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            date: date.into(),
        }
    }
}

/// Append-only table of every record kept so far, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    records: Vec<LinkRecord>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(mut self, records: Vec<LinkRecord>) -> Self {
        self.records.extend(records);
        self
    }

    pub fn records(&self) -> &[LinkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
