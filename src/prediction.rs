use chrono::NaiveDate;

use crate::date_range::{days_between, shift, DateRange};
use crate::models::{Fertility, Phase, PeriodEntry, PhaseProjection, PredictedWindow, Statistics};
use crate::stats::latest_entry;

/// Project the current cycle phase for `today`.
/// Returns an unknown projection when there is no history to anchor on.
pub fn predict(history: &[PeriodEntry], stats: &Statistics, today: NaiveDate) -> PhaseProjection {
    let Some(latest) = latest_entry(history) else {
        return PhaseProjection::unknown();
    };

    let cycle_day = days_between(latest.start_date, today) + 1;
    let (phase, fertility) = classify(cycle_day);
    let days_until_next = stats.avg_cycle_days.saturating_sub(cycle_day);

    tracing::debug!(
        %today,
        last_start = %latest.start_date,
        cycle_day,
        ?phase,
        days_until_next,
        "projected cycle phase"
    );

    PhaseProjection {
        cycle_day,
        phase,
        days_left: days_until_next.max(0),
        days_until_next,
        fertility,
        next_period_start: shift(latest.start_date, stats.avg_cycle_days),
    }
}

/// Fixed day bands, independent of the user's average cycle length.
/// Ovulation takes days 14 and 15 so it is reachable after the Follicular band.
fn classify(cycle_day: i64) -> (Phase, Fertility) {
    match cycle_day {
        1..=5 => (Phase::Menstrual, Fertility::Low),
        6..=13 if cycle_day > 10 => (Phase::Follicular, Fertility::High),
        6..=13 => (Phase::Follicular, Fertility::Medium),
        14 | 15 => (Phase::Ovulation, Fertility::VeryHigh),
        d if d > 15 => (Phase::Luteal, Fertility::Low),
        _ => (Phase::Unknown, Fertility::Low),
    }
}

/// The next `horizon` period windows after the most recent recorded start.
/// Each window starts `avg_cycle_days` after the previous one.
pub fn predicted_windows(
    history: &[PeriodEntry],
    stats: &Statistics,
    horizon: u32,
) -> Vec<PredictedWindow> {
    let Some(latest) = latest_entry(history) else {
        return Vec::new();
    };

    let mut windows = Vec::new();
    let mut start = latest.start_date;
    for cycle in 1..=horizon {
        // Stop once the next start falls off the calendar
        let Some(next) = shift(start, stats.avg_cycle_days) else {
            break;
        };
        start = next;
        let range = DateRange::starting(start, stats.avg_period_days);
        windows.push(PredictedWindow {
            cycle,
            start: range.start(),
            end: range.end(),
        });
    }
    windows
}

/// Suggested end date for a period starting on `start`, from the average length.
pub fn suggest_end_date(start: NaiveDate, stats: &Statistics) -> Option<NaiveDate> {
    if stats.avg_period_days > 0 {
        shift(start, stats.avg_period_days - 1)
    } else {
        None
    }
}
