use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClassId, UserId};

/// Kind of class that owns a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassKind {
    Group,
    OneToOne,
}

/// One concrete scheduled meeting.
///
/// `ends_at` is always `starts_at + duration_min`; sessions are never mutated
/// after materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub class_id: ClassId,
    #[serde(rename = "type")]
    pub kind: ClassKind,
    pub title: String,
    pub teacher_id: UserId,
    pub attendees: BTreeSet<UserId>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_chess_enabled: bool,
}

impl Session {
    pub fn duration(&self) -> Duration {
        self.ends_at - self.starts_at
    }

    /// True when the user teaches or attends this session.
    pub fn involves(&self, user_id: &str) -> bool {
        self.teacher_id == user_id || self.attendees.contains(user_id)
    }

    /// Half-open interval intersection: back-to-back sessions do not overlap.
    pub fn overlaps(&self, other: &Session) -> bool {
        self.starts_at < other.ends_at && other.starts_at < self.ends_at
    }
}

/// Sorts sessions ascending by start. Ties keep their relative order.
pub fn sort_by_start(sessions: &mut [Session]) {
    sessions.sort_by_key(|session| session.starts_at);
}

/// Appends a freshly generated batch to an existing list and re-sorts the
/// combined list by start time.
pub fn merge_sessions(mut existing: Vec<Session>, generated: Vec<Session>) -> Vec<Session> {
    existing.extend(generated);
    sort_by_start(&mut existing);
    existing
}
