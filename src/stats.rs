use crate::date_range::days_between;
use crate::models::{CycleSummary, PeriodEntry, Statistics, DEFAULT_CYCLE_DAYS};

/// Compute average period and cycle length over the full history.
/// Input order does not matter and the slice is left untouched.
pub fn compute_statistics(history: &[PeriodEntry]) -> Statistics {
    if history.is_empty() {
        return Statistics::default();
    }

    let period_lengths: Vec<i64> = history.iter().filter_map(PeriodEntry::span_days).collect();
    let avg_period_days = rounded_mean(&period_lengths).unwrap_or(0);

    let cycle_lengths = cycle_lengths(history);
    let avg_cycle_days = rounded_mean(&cycle_lengths).unwrap_or(DEFAULT_CYCLE_DAYS);

    tracing::debug!(
        entries = history.len(),
        avg_period_days,
        avg_cycle_days,
        "computed cycle statistics"
    );

    Statistics {
        avg_period_days,
        avg_cycle_days,
    }
}

/// Overview of the history for list and stats screens.
pub fn cycle_summary(history: &[PeriodEntry]) -> CycleSummary {
    let cycle_lengths = cycle_lengths(history);
    let last = latest_entry(history);

    CycleSummary {
        total_entries: history.len(),
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        last_period_start: last.map(|e| e.start_date),
        last_period_end: last.and_then(|e| e.end_date),
    }
}

/// Entry with the latest start date. On ties the earliest in the slice wins.
pub fn latest_entry(history: &[PeriodEntry]) -> Option<&PeriodEntry> {
    history
        .iter()
        .reduce(|best, e| if e.start_date > best.start_date { e } else { best })
}

/// Gaps in days between consecutive period starts, chronologically.
fn cycle_lengths(history: &[PeriodEntry]) -> Vec<i64> {
    let mut sorted: Vec<&PeriodEntry> = history.iter().collect();
    sorted.sort_by_key(|e| e.start_date);

    sorted
        .windows(2)
        .map(|w| days_between(w[0].start_date, w[1].start_date))
        .collect()
}

/// Mean rounded half-up, `None` for an empty slice.
fn rounded_mean(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    let count = values.len() as i64;
    // floor(sum / count + 1/2) without going through floats
    Some((2 * sum + count).div_euclid(2 * count))
}
