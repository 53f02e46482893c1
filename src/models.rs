use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cycle length assumed until two period starts can be compared.
pub const DEFAULT_CYCLE_DAYS: i64 = 28;

/// Number of future cycles marked on the calendar by default.
pub const DEFAULT_HORIZON_CYCLES: u32 = 6;

/// Format of calendar mark keys.
pub(crate) const DATE_KEY: &str = "%Y-%m-%d";

/// A recorded period interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodEntry {
    pub id: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
    #[serde(default)]
    pub collection_methods: BTreeSet<String>,
}

impl PeriodEntry {
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), start_date, end_date)
    }

    pub fn with_id(id: impl Into<String>, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            id: id.into(),
            start_date,
            end_date,
            symptoms: BTreeSet::new(),
            collection_methods: BTreeSet::new(),
        }
    }

    pub fn symptom(mut self, label: impl Into<String>) -> Self {
        self.symptoms.insert(label.into());
        self
    }

    pub fn collection_method(mut self, label: impl Into<String>) -> Self {
        self.collection_methods.insert(label.into());
        self
    }

    /// Inclusive day count of the period, `None` while it is still open.
    /// Negative for malformed entries whose end precedes their start.
    pub fn span_days(&self) -> Option<i64> {
        self.end_date
            .map(|end| (end - self.start_date).num_days() + 1)
    }
}

/// Aggregates derived from the full history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub avg_period_days: i64,
    pub avg_cycle_days: i64,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            avg_period_days: 0,
            avg_cycle_days: DEFAULT_CYCLE_DAYS,
        }
    }
}

/// History overview for list screens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    pub total_entries: usize,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
    Unknown,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Menstrual => "Menstrual Phase",
            Phase::Follicular => "Follicular Phase",
            Phase::Ovulation => "Ovulation Phase",
            Phase::Luteal => "Luteal Phase",
            Phase::Unknown => "Unknown",
        }
    }

    /// Daily insight shown alongside the phase.
    pub fn tip(self) -> &'static str {
        match self {
            Phase::Menstrual => "Rest well and stay hydrated. Your energy might be low.",
            Phase::Follicular => "Your energy is rising! Great time for new projects and exercise.",
            Phase::Ovulation => "You're at your peak energy and fertility. Stay active!",
            Phase::Luteal => "Eat protein-rich foods and prioritize self-care as PMS might start.",
            Phase::Unknown => "Track your period to see insights.",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fertility {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Fertility {
    pub fn label(self) -> &'static str {
        match self {
            Fertility::Low => "Low",
            Fertility::Medium => "Medium",
            Fertility::High => "High",
            Fertility::VeryHigh => "Very High",
        }
    }
}

/// Where "today" sits in the current cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProjection {
    pub cycle_day: i64,
    pub phase: Phase,
    /// Days until the next predicted start, clamped at zero.
    pub days_left: i64,
    /// Unclamped `avg_cycle_days - cycle_day`; negative when overdue.
    pub days_until_next: i64,
    pub fertility: Fertility,
    pub next_period_start: Option<NaiveDate>,
}

impl PhaseProjection {
    pub fn unknown() -> Self {
        Self {
            cycle_day: 0,
            phase: Phase::Unknown,
            days_left: 0,
            days_until_next: 0,
            fertility: Fertility::Low,
            next_period_start: None,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.days_until_next < 0
    }
}

/// A future period window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PredictedWindow {
    /// 1 for the next expected period, 2 for the one after, and so on.
    pub cycle: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkKind {
    Actual,
    Predicted,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayMark {
    pub kind: MarkKind,
}

/// Calendar markings keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct CalendarMarks {
    pub(crate) marks: BTreeMap<String, DayMark>,
}

impl CalendarMarks {
    pub fn get(&self, date: NaiveDate) -> Option<MarkKind> {
        self.get_key(&date.format(DATE_KEY).to_string())
    }

    pub fn get_key(&self, key: &str) -> Option<MarkKind> {
        self.marks.get(key).map(|m| m.kind)
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MarkKind)> {
        self.marks.iter().map(|(k, m)| (k.as_str(), m.kind))
    }

    pub fn count(&self, kind: MarkKind) -> usize {
        self.marks.values().filter(|m| m.kind == kind).count()
    }

    /// Marks falling inside one calendar month.
    pub fn month(&self, year: i32, month: u32) -> CalendarMarks {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return CalendarMarks::default();
        };
        let lo = first.format(DATE_KEY).to_string();
        let marks = self
            .marks
            .range(lo..)
            .take_while(|(key, _)| {
                NaiveDate::parse_from_str(key, DATE_KEY)
                    .map(|d| d.year() == year && d.month() == month)
                    .unwrap_or(false)
            })
            .map(|(k, m)| (k.clone(), *m))
            .collect();
        CalendarMarks { marks }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerSettings {
    pub horizon_cycles: u32,
    pub reject_future_entries: bool,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            horizon_cycles: DEFAULT_HORIZON_CYCLES,
            reject_future_entries: true,
        }
    }
}

impl TrackerSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
