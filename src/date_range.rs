use chrono::{NaiveDate, TimeDelta};

/// Signed whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Offset a date by a signed number of days, `None` past the calendar's range.
pub fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Inclusive range of calendar days. Empty when `end < start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering `days` inclusive days from `start`.
    /// Empty for `days <= 0`; clamped at the last representable date.
    pub fn starting(start: NaiveDate, days: i64) -> Self {
        if days <= 0 {
            return match start.pred_opt() {
                Some(end) => Self::new(start, end),
                None => Self::new(start.succ_opt().unwrap_or(start), start),
            };
        }
        let end = shift(start, days - 1).unwrap_or(NaiveDate::MAX);
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        (days_between(self.start, self.end) + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn iter(&self) -> DateRangeIter {
        DateRangeIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> DateRangeIter {
        self.iter()
    }
}

pub struct DateRangeIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRangeIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map_or(0, |next| DateRange::new(next, self.end).len());
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn iterates_inclusive() {
        let days: Vec<NaiveDate> = DateRange::new(date("2024-01-30"), date("2024-02-02")).iter().collect();
        assert_eq!(
            days,
            vec![
                date("2024-01-30"),
                date("2024-01-31"),
                date("2024-02-01"),
                date("2024-02-02")
            ]
        );
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::new(date("2024-03-01"), date("2024-03-01"));
        assert_eq!(range.len(), 1);
        assert_eq!(range.iter().count(), 1);
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = DateRange::new(date("2024-03-05"), date("2024-03-01"));
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.iter().next(), None);
    }

    #[test]
    fn crosses_leap_day() {
        let range = DateRange::new(date("2024-02-27"), date("2024-03-01"));
        assert_eq!(range.len(), 4);
        assert!(range.contains(date("2024-02-29")));

        let common = DateRange::new(date("2023-02-27"), date("2023-03-01"));
        assert_eq!(common.len(), 3);
    }

    #[test]
    fn starting_builds_span() {
        let range = DateRange::starting(date("2024-12-30"), 5);
        assert_eq!(range.end(), date("2025-01-03"));
        assert!(DateRange::starting(date("2024-12-30"), 0).is_empty());
        assert!(DateRange::starting(date("2024-12-30"), -3).is_empty());
    }

    #[test]
    fn starting_clamps_at_calendar_end() {
        let range = DateRange::starting(NaiveDate::MAX, 10);
        assert_eq!(range.end(), NaiveDate::MAX);
        assert_eq!(range.iter().count(), 1);
    }

    #[test]
    fn signed_difference() {
        assert_eq!(days_between(date("2024-01-01"), date("2024-01-29")), 28);
        assert_eq!(days_between(date("2024-01-29"), date("2024-01-01")), -28);
        assert_eq!(shift(date("2024-03-01"), -1), Some(date("2024-02-29")));
    }

    #[test]
    fn shift_out_of_range_is_none() {
        assert_eq!(shift(date("2024-01-01"), 200_000_000), None);
        assert_eq!(shift(date("2024-01-01"), i64::MIN), None);
        assert_eq!(shift(NaiveDate::MAX, 1), None);
    }
}
