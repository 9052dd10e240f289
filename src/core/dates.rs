use chrono::NaiveDate;
use serde::Serialize;

pub const DATE_CODE_FORMAT: &str = "%Y%m%d";

/// One calendar day of the harvest range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateEntry {
    pub date: NaiveDate,
    /// `YYYYMMDD`, the form the archive search expects.
    pub date_code: String,
}

impl DateEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            date_code: date.format(DATE_CODE_FORMAT).to_string(),
        }
    }
}

/// Every day in `[start, end)`, ascending. Empty when `end <= start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<DateEntry> {
    start
        .iter_days()
        .take_while(|date| *date < end)
        .map(DateEntry::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_is_contiguous_and_ascending() {
        let entries = date_range(ymd(1992, 1, 1), ymd(1992, 3, 1));

        // 1992 is a leap year
        assert_eq!(entries.len(), 31 + 29);
        for pair in entries.windows(2) {
            assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
        }
        for entry in &entries {
            assert_eq!(entry.date_code.len(), 8);
            assert_eq!(entry.date_code, entry.date.format("%Y%m%d").to_string());
        }
        assert_eq!(entries[0].date_code, "19920101");
        assert_eq!(entries.last().unwrap().date_code, "19920229");
    }

    #[test]
    fn test_end_is_exclusive() {
        let entries = date_range(ymd(2018, 12, 30), ymd(2019, 1, 1));
        let codes: Vec<_> = entries.iter().map(|e| e.date_code.as_str()).collect();
        assert_eq!(codes, vec!["20181230", "20181231"]);
    }

    #[test]
    fn test_empty_when_end_not_after_start() {
        assert!(date_range(ymd(2000, 1, 1), ymd(2000, 1, 1)).is_empty());
        assert!(date_range(ymd(2000, 1, 2), ymd(2000, 1, 1)).is_empty());
    }

    #[test]
    fn test_full_default_range_length() {
        let entries = date_range(ymd(1992, 1, 1), ymd(2019, 1, 1));
        let expected = (ymd(2019, 1, 1) - ymd(1992, 1, 1)).num_days() as usize;
        assert_eq!(entries.len(), expected);
        assert_eq!(entries.len(), 9862);
    }
}
