//! Append-only history of finished and skipped intervals.
//!
//! Records are kept most-recent-first. The in-memory list is the source of
//! truth for the running process; the whole list is written to the store
//! after each change on a best-effort basis.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::record::SessionRecord;
use crate::storage::{JsonSlot, KeyValueStore, SESSIONS_KEY};

/// Sessions that started on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    /// Newest first.
    pub sessions: Vec<SessionRecord>,
}

pub struct SessionLog {
    records: Vec<SessionRecord>,
    slot: JsonSlot<Vec<SessionRecord>>,
}

impl SessionLog {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let slot = JsonSlot::new(store, SESSIONS_KEY);
        let records = slot.load().unwrap_or_default();
        Self { records, slot }
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert at the head. The id is bumped past any existing id so that
    /// records created within the same millisecond stay distinct.
    pub fn append(&mut self, mut record: SessionRecord) -> SessionRecord {
        if let Some(max_id) = self.records.iter().map(|r| r.id).max() {
            if record.id <= max_id {
                record.id = max_id + 1;
            }
        }
        debug!(
            id = record.id,
            session_type = %record.session_type,
            status = ?record.status,
            minutes = record.duration_minutes,
            "session logged"
        );
        self.records.insert(0, record.clone());
        self.persist();
        record
    }

    /// Returns whether a record was removed. Unknown ids are a no-op.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.slot.remove();
    }

    fn persist(&self) {
        self.slot.save(&self.records);
    }

    // ── Derived views ────────────────────────────────────────────────

    /// Records whose start falls on the calendar day of `now`, in `now`'s zone.
    pub fn today_in<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<&SessionRecord> {
        let tz = now.timezone();
        let today = now.date_naive();
        self.records
            .iter()
            .filter(|r| r.started_at.with_timezone(&tz).date_naive() == today)
            .collect()
    }

    pub fn today(&self) -> Vec<&SessionRecord> {
        self.today_in(&Local::now())
    }

    /// Minutes of completed focus started today.
    pub fn total_focus_minutes_today_in<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> u32 {
        self.today_in(now)
            .into_iter()
            .filter(|r| r.is_completed_focus())
            .map(|r| r.duration_minutes)
            .sum()
    }

    /// Same total expressed in hours, rounded to one decimal place.
    pub fn total_focus_hours_today_in<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> f64 {
        let minutes = f64::from(self.total_focus_minutes_today_in(now));
        (minutes / 60.0 * 10.0).round() / 10.0
    }

    pub fn total_focus_minutes_today(&self) -> u32 {
        self.total_focus_minutes_today_in(&Local::now())
    }

    pub fn total_focus_hours_today(&self) -> f64 {
        self.total_focus_hours_today_in(&Local::now())
    }

    /// All records partitioned by start day in `tz`; newest day first, each
    /// day newest session first.
    pub fn grouped_by_day_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<DayGroup> {
        let mut days: BTreeMap<NaiveDate, Vec<SessionRecord>> = BTreeMap::new();
        for record in &self.records {
            let date = record.started_at.with_timezone(tz).date_naive();
            days.entry(date).or_default().push(record.clone());
        }

        days.into_iter()
            .rev()
            .map(|(date, mut sessions)| {
                sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
                DayGroup { date, sessions }
            })
            .collect()
    }

    pub fn grouped_by_day(&self) -> Vec<DayGroup> {
        self.grouped_by_day_in(&Local)
    }

    /// Most recent record, if any.
    pub fn latest(&self) -> Option<&SessionRecord> {
        self.records.first()
    }
}

/// Whole-minute length of `started_at..ended_at`, rounded, never below one.
pub fn elapsed_minutes(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> u32 {
    let millis = (ended_at - started_at).num_milliseconds().max(0);
    let seconds = (millis as f64 / 1000.0).round();
    let minutes = (seconds / 60.0).round() as u32;
    minutes.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::SessionStatus;
    use crate::storage::MemoryStore;
    use crate::timer::Mode;
    use chrono::Duration;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, h, m, 0).unwrap()
    }

    fn focus(start: DateTime<Utc>, minutes: u32) -> SessionRecord {
        SessionRecord::new(
            Mode::Focus,
            SessionStatus::Completed,
            start,
            start + Duration::minutes(i64::from(minutes)),
            minutes,
        )
    }

    #[test]
    fn append_prepends_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut log = SessionLog::load(store.clone());
        log.append(focus(at(9, 0), 25));
        log.append(focus(at(10, 0), 25));
        assert_eq!(log.records()[0].started_at, at(10, 0));

        let reloaded = SessionLog::load(store);
        assert_eq!(reloaded.records(), log.records());
    }

    #[test]
    fn same_millisecond_ids_stay_unique() {
        let mut log = SessionLog::load(Arc::new(MemoryStore::new()));
        let a = log.append(focus(at(9, 0), 25));
        let b = log.append(focus(at(9, 0), 25));
        assert_ne!(a.id, b.id);
        assert!(b.id > a.id);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut log = SessionLog::load(Arc::new(MemoryStore::new()));
        let kept = log.append(focus(at(9, 0), 25));
        assert!(!log.remove(kept.id + 1000));
        assert_eq!(log.len(), 1);
        assert!(log.remove(kept.id));
        assert!(log.is_empty());
    }

    #[test]
    fn clear_empties_store() {
        let store = Arc::new(MemoryStore::new());
        let mut log = SessionLog::load(store.clone());
        log.append(focus(at(9, 0), 25));
        log.clear();
        assert!(log.is_empty());
        assert!(SessionLog::load(store).is_empty());
    }

    #[test]
    fn storage_failure_keeps_memory_copy() {
        let store = Arc::new(MemoryStore::new());
        let mut log = SessionLog::load(store.clone());
        store.set_failing(true);
        log.append(focus(at(9, 0), 25));
        assert_eq!(log.len(), 1);
        assert!(SessionLog::load(store).is_empty());
    }

    #[test]
    fn today_total_counts_completed_focus_only() {
        let mut log = SessionLog::load(Arc::new(MemoryStore::new()));
        log.append(focus(at(8, 0), 25));
        log.append(focus(at(9, 0), 25));
        log.append(focus(at(10, 0), 25));
        log.append(SessionRecord::new(
            Mode::ShortBreak,
            SessionStatus::Completed,
            at(10, 25),
            at(10, 30),
            5,
        ));
        log.append(SessionRecord::new(
            Mode::Focus,
            SessionStatus::Skipped,
            at(11, 0),
            at(11, 10),
            10,
        ));
        // yesterday
        log.append(focus(at(9, 0) - Duration::days(1), 25));

        let now = at(18, 0);
        assert_eq!(log.today_in(&now).len(), 5);
        assert_eq!(log.total_focus_minutes_today_in(&now), 75);
        assert!((log.total_focus_hours_today_in(&now) - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn day_boundary_is_midnight_of_the_viewing_zone() {
        let mut log = SessionLog::load(Arc::new(MemoryStore::new()));
        log.append(focus(at(23, 30), 25));
        let tz = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        // 23:30 UTC is 01:30 the next day at UTC+2.
        let now = (at(23, 50) + Duration::hours(2)).with_timezone(&tz);
        assert_eq!(log.today_in(&now).len(), 1);
        assert!(log.today_in(&at(12, 0)).len() == 1);
        assert!(log.today_in(&(at(12, 0) + Duration::days(1))).is_empty());
    }

    #[test]
    fn grouped_newest_day_first() {
        let mut log = SessionLog::load(Arc::new(MemoryStore::new()));
        let yesterday = at(9, 0) - Duration::days(1);
        log.append(focus(at(14, 0), 25));
        log.append(focus(yesterday, 25));
        log.append(focus(at(9, 0), 25));
        log.append(focus(yesterday + Duration::hours(3), 25));

        let groups = log.grouped_by_day_in(&Utc);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, at(0, 0).date_naive());
        assert_eq!(groups[0].sessions[0].started_at, at(14, 0));
        assert_eq!(groups[0].sessions[1].started_at, at(9, 0));
        assert_eq!(groups[1].sessions[0].started_at, yesterday + Duration::hours(3));
        assert_eq!(groups[1].sessions[1].started_at, yesterday);
    }

    #[test]
    fn elapsed_minutes_rounds_with_floor_of_one() {
        let t0 = at(9, 0);
        assert_eq!(elapsed_minutes(t0, t0), 1);
        assert_eq!(elapsed_minutes(t0, t0 + Duration::seconds(29)), 1);
        assert_eq!(elapsed_minutes(t0, t0 + Duration::seconds(90)), 2);
        assert_eq!(elapsed_minutes(t0, t0 + Duration::seconds(149)), 2);
        assert_eq!(elapsed_minutes(t0, t0 + Duration::minutes(12)), 12);
    }
}
