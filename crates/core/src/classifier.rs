//! # Session Classifier
//!
//! Presentation state of a session as a pure function of its start and the
//! current time:
//!
//! - `COMPLETED`: the session started before `now`
//! - `JOINABLE`: it starts within the next [`JOIN_WINDOW_MINUTES`] (inclusive)
//! - `UPCOMING`: it starts later than that

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::Session;

/// Length of the joinable window before a session starts. Not configurable.
pub const JOIN_WINDOW_MINUTES: i64 = 30;

pub fn join_window() -> Duration {
    Duration::minutes(JOIN_WINDOW_MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Completed,
    Joinable,
    Upcoming,
}

impl SessionStatus {
    pub fn is_joinable(self) -> bool {
        self == SessionStatus::Joinable
    }
}

pub fn classify(starts_at: DateTime<Utc>, now: DateTime<Utc>) -> SessionStatus {
    if starts_at < now {
        SessionStatus::Completed
    } else if starts_at <= now + join_window() {
        SessionStatus::Joinable
    } else {
        SessionStatus::Upcoming
    }
}

pub fn classify_session(session: &Session, now: DateTime<Utc>) -> SessionStatus {
    classify(session.starts_at, now)
}

/// A session paired with its status at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedSession {
    #[serde(flatten)]
    pub session: Session,
    pub status: SessionStatus,
}

/// Classifies every session, keeping input order.
pub fn classify_all(
    sessions: impl IntoIterator<Item = Session>,
    now: DateTime<Utc>,
) -> Vec<ClassifiedSession> {
    sessions
        .into_iter()
        .map(|session| {
            let status = classify_session(&session, now);
            ClassifiedSession { session, status }
        })
        .collect()
}

/// Sessions split into what is still ahead and what has happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSplit {
    /// Joinable and upcoming sessions, soonest first.
    pub upcoming: Vec<Session>,
    /// Completed sessions, most recent first.
    pub completed: Vec<Session>,
}

pub fn split_by_status(
    sessions: impl IntoIterator<Item = Session>,
    now: DateTime<Utc>,
) -> SessionSplit {
    let (mut completed, mut upcoming): (Vec<_>, Vec<_>) = sessions
        .into_iter()
        .partition(|session| classify_session(session, now) == SessionStatus::Completed);

    upcoming.sort_by_key(|session| session.starts_at);
    completed.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));

    SessionSplit {
        upcoming,
        completed,
    }
}

/// The soonest session that has not started yet.
pub fn next_session(sessions: &[Session], now: DateTime<Utc>) -> Option<&Session> {
    sessions
        .iter()
        .filter(|session| session.starts_at >= now)
        .min_by_key(|session| session.starts_at)
}
