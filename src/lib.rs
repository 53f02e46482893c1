//! Cycle statistics and prediction for a personal period tracker.
//!
//! All engine functions are pure: they take a snapshot of the recorded
//! history (plus the reference date where "today" matters) and return a
//! fresh result. [`HistoryStore`] is a small in-memory holder for that
//! history, for callers that do not bring their own.

pub mod calendar;
pub mod date_range;
pub mod models;
pub mod prediction;
pub mod stats;
pub mod store;

pub use calendar::build_marks;
pub use date_range::DateRange;
pub use models::{
    CalendarMarks, CycleSummary, DayMark, Fertility, MarkKind, PeriodEntry, Phase,
    PhaseProjection, PredictedWindow, Statistics, TrackerSettings, DEFAULT_CYCLE_DAYS,
    DEFAULT_HORIZON_CYCLES,
};
pub use prediction::{predict, predicted_windows, suggest_end_date};
pub use stats::{compute_statistics, cycle_summary, latest_entry};
pub use store::{validate_entry, EntryError, HistoryStore, StoreError};
