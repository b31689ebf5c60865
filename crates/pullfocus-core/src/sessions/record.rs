use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Completed,
    Skipped,
}

/// One finished or abandoned interval. Immutable once logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Creation time in epoch milliseconds, unique within a log.
    pub id: i64,
    #[serde(rename = "type")]
    pub session_type: Mode,
    pub status: SessionStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl SessionRecord {
    /// Build a record stamped with `ended_at` as its id.
    ///
    /// `ended_at` is clamped so it never precedes `started_at`, and the
    /// duration never drops below one minute.
    pub fn new(
        session_type: Mode,
        status: SessionStatus,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Self {
        let ended_at = ended_at.max(started_at);
        Self {
            id: ended_at.timestamp_millis(),
            session_type,
            status,
            started_at,
            ended_at,
            duration_minutes: duration_minutes.max(1),
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn is_completed_focus(&self) -> bool {
        self.status == SessionStatus::Completed && self.session_type == Mode::Focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn wire_shape_matches_stored_format() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let record = SessionRecord::new(
            Mode::ShortBreak,
            SessionStatus::Skipped,
            start,
            start + Duration::minutes(3),
            3,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "short-break");
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["startedAt"], start.timestamp_millis());
        assert_eq!(json["durationMinutes"], 3);
        assert!(json["description"].is_null());
        assert_eq!(json["id"], json["endedAt"]);
    }

    #[test]
    fn roundtrip_keeps_every_field() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let record = SessionRecord::new(
            Mode::Focus,
            SessionStatus::Completed,
            start,
            start + Duration::minutes(25),
            25,
        )
        .with_description(Some("draft chapter".into()));
        let json = serde_json::to_string(&record).unwrap();
        let parsed: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn end_never_precedes_start() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        let record = SessionRecord::new(
            Mode::Focus,
            SessionStatus::Skipped,
            start,
            start - Duration::seconds(5),
            0,
        );
        assert_eq!(record.ended_at, start);
        assert_eq!(record.duration_minutes, 1);
    }
}
