use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::calendar::build_marks;
use crate::models::{CalendarMarks, PeriodEntry, PhaseProjection, Statistics, TrackerSettings};
use crate::prediction::predict;
use crate::stats::compute_statistics;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("cannot track future date {0}")]
    FutureDate(NaiveDate),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid entry: {0}")]
    Invalid(#[from] EntryError),
    #[error("entry {0} already exists")]
    DuplicateId(String),
    #[error("entry {0} not found")]
    NotFound(String),
    #[error("history lock poisoned")]
    Poisoned,
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Check an entry before it is accepted into history.
pub fn validate_entry(
    entry: &PeriodEntry,
    today: NaiveDate,
    reject_future: bool,
) -> Result<(), EntryError> {
    if let Some(end) = entry.end_date {
        if end < entry.start_date {
            return Err(EntryError::EndBeforeStart {
                start: entry.start_date,
                end,
            });
        }
    }
    let last_day = entry.end_date.unwrap_or(entry.start_date);
    if reject_future && last_day > today {
        return Err(EntryError::FutureDate(last_day));
    }
    Ok(())
}

/// In-memory period history. The engine only ever sees snapshots of it.
pub struct HistoryStore {
    settings: TrackerSettings,
    entries: Mutex<Vec<PeriodEntry>>,
}

impl HistoryStore {
    pub fn new(settings: TrackerSettings) -> Self {
        Self::with_entries(settings, Vec::new())
    }

    pub fn with_entries(settings: TrackerSettings, entries: Vec<PeriodEntry>) -> Self {
        Self {
            settings,
            entries: Mutex::new(entries),
        }
    }

    /// Load a history previously produced by [`HistoryStore::export_json`].
    /// Entries are trusted as-is.
    pub fn from_json(json: &str, settings: TrackerSettings) -> Result<Self, StoreError> {
        let entries: Vec<PeriodEntry> = serde_json::from_str(json)?;
        tracing::info!(entries = entries.len(), "loaded period history");
        Ok(Self::with_entries(settings, entries))
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<PeriodEntry>>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Validate and record a new entry; the newest addition comes first.
    pub fn add(&self, entry: PeriodEntry, today: NaiveDate) -> Result<(), StoreError> {
        if let Err(e) = validate_entry(&entry, today, self.settings.reject_future_entries) {
            tracing::warn!(id = %entry.id, error = %e, "rejected period entry");
            return Err(e.into());
        }

        let mut entries = self.lock()?;
        if entries.iter().any(|e| e.id == entry.id) {
            tracing::warn!(id = %entry.id, "duplicate period entry");
            return Err(StoreError::DuplicateId(entry.id));
        }

        tracing::info!(
            id = %entry.id,
            start = %entry.start_date,
            end = ?entry.end_date,
            "recorded period entry"
        );
        entries.insert(0, entry);
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<PeriodEntry, StoreError> {
        let mut entries = self.lock()?;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = entries.remove(index);
        tracing::info!(id, "deleted period entry");
        Ok(removed)
    }

    pub fn snapshot(&self) -> Result<Vec<PeriodEntry>, StoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    pub fn statistics(&self) -> Result<Statistics, StoreError> {
        Ok(compute_statistics(&self.lock()?))
    }

    pub fn projection(&self, today: NaiveDate) -> Result<PhaseProjection, StoreError> {
        let history = self.lock()?;
        let stats = compute_statistics(&history);
        Ok(predict(&history, &stats, today))
    }

    pub fn calendar_marks(&self) -> Result<CalendarMarks, StoreError> {
        let history = self.lock()?;
        let stats = compute_statistics(&history);
        Ok(build_marks(&history, &stats, self.settings.horizon_cycles))
    }

    pub fn export_json(&self) -> Result<String, StoreError> {
        let entries = self.lock()?;
        Ok(serde_json::to_string_pretty(&*entries)?)
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(TrackerSettings::default())
    }
}
