//! Records waiting in the local queue for remote confirmation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Evaluation;

/// Identity of a queued record: the moment it was saved locally.
///
/// Unique within a queue. [`SavedAt::after`] nudges the timestamp forward when
/// the clock has not advanced past the newest queued tag, so two saves in the
/// same instant still get distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedAt(DateTime<Utc>);

impl SavedAt {
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// A tag at `now`, or one microsecond past `newest` if the clock has not moved beyond it.
    pub fn after(newest: Option<SavedAt>, now: DateTime<Utc>) -> Self {
        match newest {
            Some(SavedAt(prev)) if now <= prev => Self(prev + Duration::microseconds(1)),
            _ => Self(now),
        }
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for SavedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// An evaluation plus its queue identity, as persisted on the device.
///
/// The persisted shape is the wire payload with an extra `_savedAt` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRecord {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    #[serde(rename = "_savedAt")]
    pub saved_at: SavedAt,
}

impl PendingRecord {
    pub fn new(evaluation: Evaluation, saved_at: SavedAt) -> Self {
        Self {
            evaluation,
            saved_at,
        }
    }

    /// The payload sent to the remote store, without save-only metadata.
    pub fn wire_payload(&self) -> &Evaluation {
        &self.evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Score;
    use chrono::TimeZone;

    fn evaluation() -> Evaluation {
        Evaluation::new("G", "3", "Prof", [Score::Good; 5], None)
    }

    #[test]
    fn test_saved_at_moves_past_a_stalled_clock() {
        let now = Utc.with_ymd_and_hms(2025, 10, 7, 12, 0, 0).unwrap();
        let first = SavedAt::after(None, now);
        let second = SavedAt::after(Some(first), now);
        let third = SavedAt::after(Some(second), now - Duration::seconds(5));
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn test_saved_at_uses_clock_when_it_advanced() {
        let earlier = Utc.with_ymd_and_hms(2025, 10, 7, 12, 0, 0).unwrap();
        let later = earlier + Duration::seconds(1);
        let tag = SavedAt::after(Some(SavedAt::from_datetime(earlier)), later);
        assert_eq!(tag.as_datetime(), later);
    }

    #[test]
    fn test_persisted_shape_adds_saved_at_key() {
        let at = Utc.with_ymd_and_hms(2025, 10, 7, 12, 0, 0).unwrap();
        let record = PendingRecord::new(evaluation(), SavedAt::from_datetime(at));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["grupo"], "G");
        assert!(json["_savedAt"].is_string());
        assert!(json.get("saved_at").is_none());

        let parsed: PendingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_reads_records_written_by_the_javascript_app() {
        let raw = r#"{
            "grupo": "Robotics", "turma": "1e2", "avaliador": "Prof. Lima",
            "criterio1": 1, "criterio2": 0.7, "criterio3": 0.3,
            "criterio4": 1, "criterio5": 0.7, "total": 3.7, "obs": null,
            "_savedAt": "2025-10-07T18:32:10.123Z"
        }"#;
        let record: PendingRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.evaluation.criterion1, Score::Excellent);
        assert_eq!(record.evaluation.total, 3.7);
        assert_eq!(record.evaluation.note, None);
    }
}
