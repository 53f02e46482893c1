use std::collections::btree_map::Entry;

use chrono::NaiveDate;

use crate::date_range::DateRange;
use crate::models::{CalendarMarks, DayMark, MarkKind, PeriodEntry, Statistics, DATE_KEY};
use crate::prediction::predicted_windows;

/// Mark recorded periods and the next `horizon_cycles` predicted periods.
/// Recorded days always win over predicted ones.
pub fn build_marks(history: &[PeriodEntry], stats: &Statistics, horizon_cycles: u32) -> CalendarMarks {
    let mut marks = CalendarMarks::default();

    for entry in history {
        // Open periods are assumed to run for the average length
        let range = match entry.end_date {
            Some(end) => DateRange::new(entry.start_date, end),
            None => DateRange::starting(entry.start_date, stats.avg_period_days),
        };
        for day in range {
            marks.insert_if_absent(day, MarkKind::Actual);
        }
    }
    let actual = marks.len();

    for window in predicted_windows(history, stats, horizon_cycles) {
        for day in DateRange::new(window.start, window.end) {
            marks.insert_if_absent(day, MarkKind::Predicted);
        }
    }

    tracing::debug!(
        actual,
        predicted = marks.len() - actual,
        horizon_cycles,
        "built calendar marks"
    );
    marks
}

impl CalendarMarks {
    fn insert_if_absent(&mut self, date: NaiveDate, kind: MarkKind) {
        if let Entry::Vacant(slot) = self.marks.entry(date.format(DATE_KEY).to_string()) {
            slot.insert(DayMark { kind });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_HORIZON_CYCLES;
    use crate::stats::compute_statistics;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_entry(start: &str, end: &str) -> PeriodEntry {
        PeriodEntry::new(date(start), Some(date(end)))
    }

    #[test]
    fn empty_history_has_no_marks() {
        let marks = build_marks(&[], &Statistics::default(), DEFAULT_HORIZON_CYCLES);
        assert!(marks.is_empty());
    }

    #[test]
    fn single_entry_marks_actual_days() {
        let history = vec![make_entry("2024-01-01", "2024-01-05")];
        let marks = build_marks(&history, &compute_statistics(&history), DEFAULT_HORIZON_CYCLES);

        assert_eq!(marks.count(MarkKind::Actual), 5);
        for day in DateRange::new(date("2024-01-01"), date("2024-01-05")) {
            assert_eq!(marks.get(day), Some(MarkKind::Actual));
        }
        assert_eq!(marks.get(date("2024-01-06")), None);
    }

    #[test]
    fn predicts_six_cycles_by_default() {
        let history = vec![make_entry("2024-01-01", "2024-01-05")];
        let marks = build_marks(&history, &compute_statistics(&history), DEFAULT_HORIZON_CYCLES);

        assert_eq!(marks.count(MarkKind::Predicted), 30);
        assert_eq!(marks.get_key("2024-01-29"), Some(MarkKind::Predicted));
        assert_eq!(marks.get_key("2024-02-02"), Some(MarkKind::Predicted));
        assert_eq!(marks.get_key("2024-02-03"), None);
        // sixth window: 2024-01-01 + 6 * 28
        assert_eq!(marks.get_key("2024-06-17"), Some(MarkKind::Predicted));
        assert_eq!(marks.get_key("2024-07-15"), None);
    }

    #[test]
    fn horizon_is_configurable() {
        let history = vec![make_entry("2024-01-01", "2024-01-05")];
        let stats = compute_statistics(&history);
        assert_eq!(build_marks(&history, &stats, 1).count(MarkKind::Predicted), 5);
        assert_eq!(build_marks(&history, &stats, 0).count(MarkKind::Predicted), 0);
    }

    #[test]
    fn actual_wins_over_predicted() {
        // A short cycle pulls the first predicted window onto recorded days.
        let history = vec![make_entry("2024-01-01", "2024-01-10")];
        let stats = Statistics {
            avg_period_days: 4,
            avg_cycle_days: 7,
        };
        let marks = build_marks(&history, &stats, 2);

        for day in DateRange::new(date("2024-01-01"), date("2024-01-10")) {
            assert_eq!(marks.get(day), Some(MarkKind::Actual));
        }
        // first window 01-08..01-11 keeps only its last day
        assert_eq!(marks.get_key("2024-01-11"), Some(MarkKind::Predicted));
        assert_eq!(marks.get_key("2024-01-14"), None);
        assert_eq!(marks.get_key("2024-01-15"), Some(MarkKind::Predicted));
        assert_eq!(marks.count(MarkKind::Predicted), 5);
    }

    #[test]
    fn open_entry_uses_average_period() {
        let history = vec![
            make_entry("2024-01-01", "2024-01-04"),
            PeriodEntry::new(date("2024-01-29"), None),
        ];
        let stats = compute_statistics(&history);
        let marks = build_marks(&history, &stats, 0);
        assert_eq!(marks.count(MarkKind::Actual), 8);
        assert_eq!(marks.get_key("2024-02-01"), Some(MarkKind::Actual));
        assert_eq!(marks.get_key("2024-02-02"), None);
    }

    #[test]
    fn zero_average_period_predicts_nothing() {
        let history = vec![make_entry("2024-01-01", "2024-01-05")];
        let stats = Statistics {
            avg_period_days: 0,
            avg_cycle_days: 28,
        };
        let marks = build_marks(&history, &stats, DEFAULT_HORIZON_CYCLES);
        assert_eq!(marks.count(MarkKind::Actual), 5);
        assert_eq!(marks.count(MarkKind::Predicted), 0);
        assert_eq!(marks.get_key("2024-01-29"), None);

        // an open entry has no assumed days either
        let open = vec![PeriodEntry::new(date("2024-01-29"), None)];
        assert!(build_marks(&open, &stats, 0).is_empty());
    }

    #[test]
    fn huge_cycle_length_stops_predictions() {
        let history = vec![make_entry("2024-01-01", "2024-01-05")];
        let stats = Statistics {
            avg_period_days: 5,
            avg_cycle_days: 20_000_000,
        };
        let marks = build_marks(&history, &stats, DEFAULT_HORIZON_CYCLES);
        assert_eq!(marks.count(MarkKind::Actual), 5);
        assert_eq!(marks.count(MarkKind::Predicted), 20);
    }

    #[test]
    fn month_view_filters() {
        let history = vec![make_entry("2024-01-30", "2024-02-02")];
        let marks = build_marks(&history, &compute_statistics(&history), 1);

        let feb = marks.month(2024, 2);
        assert_eq!(feb.count(MarkKind::Actual), 2);
        // predicted 02-27..03-01 across the leap day
        assert_eq!(feb.count(MarkKind::Predicted), 3);
        assert!(feb.iter().all(|(key, _)| key.starts_with("2024-02")));
        assert_eq!(marks.month(2024, 1).len(), 2);
        assert!(marks.month(2024, 13).is_empty());
    }

    #[test]
    fn serializes_as_date_map() {
        let history = vec![make_entry("2024-01-01", "2024-01-01")];
        let marks = build_marks(&history, &compute_statistics(&history), 1);
        let json = serde_json::to_value(&marks).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "2024-01-01": { "kind": "actual" },
                "2024-01-29": { "kind": "predicted" },
            })
        );
    }
}
