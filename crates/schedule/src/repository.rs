//! Session storage.
//!
//! Every write is one all-or-nothing batch: the whole batch is checked
//! against the `(class_id, starts_at)` uniqueness rule under the write lock
//! before anything is applied.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nexus_core::{
    errors::{ScheduleError, ScheduleResult},
    models::session::{sort_by_start, Session},
};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Result of replacing a class's upcoming sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
    pub removed: usize,
    pub inserted: usize,
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Adds a batch alongside existing sessions.
    ///
    /// Fails with `ScheduleError::Conflict`, storing nothing, if any session
    /// shares `(class_id, starts_at)` with a stored session or with another
    /// session of the batch.
    async fn insert_batch(&self, batch: Vec<Session>) -> ScheduleResult<Vec<Session>>;

    /// Removes the class's sessions starting after `now` and stores `batch`
    /// in their place. Sessions at or before `now` are kept.
    async fn replace_upcoming(
        &self,
        class_id: &str,
        now: DateTime<Utc>,
        batch: Vec<Session>,
    ) -> ScheduleResult<ReplaceOutcome>;

    async fn get(&self, id: Uuid) -> ScheduleResult<Option<Session>>;

    /// Sessions of one class, sorted by start.
    async fn list_for_class(&self, class_id: &str) -> ScheduleResult<Vec<Session>>;

    /// Sessions the user teaches or attends, sorted by start.
    async fn list_for_participant(&self, user_id: &str) -> ScheduleResult<Vec<Session>>;

    async fn list_all(&self) -> ScheduleResult<Vec<Session>>;
}

/// Process-local session store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<Vec<Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store without uniqueness checks.
    pub fn with_sessions(mut sessions: Vec<Session>) -> Self {
        sort_by_start(&mut sessions);
        Self {
            sessions: Arc::new(RwLock::new(sessions)),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert_batch(&self, mut batch: Vec<Session>) -> ScheduleResult<Vec<Session>> {
        let mut sessions = self.sessions.write().await;

        ensure_unique(&sessions, &batch)?;

        sort_by_start(&mut batch);
        sessions.extend(batch.iter().cloned());
        sort_by_start(&mut sessions);

        info!(inserted = batch.len(), total = sessions.len(), "stored session batch");
        Ok(batch)
    }

    async fn replace_upcoming(
        &self,
        class_id: &str,
        now: DateTime<Utc>,
        batch: Vec<Session>,
    ) -> ScheduleResult<ReplaceOutcome> {
        if let Some(stray) = batch.iter().find(|session| session.class_id != class_id) {
            return Err(ScheduleError::Validation(format!(
                "Session {} belongs to class {}, not {}",
                stray.id, stray.class_id, class_id
            )));
        }

        let mut sessions = self.sessions.write().await;

        let (replaced, kept): (Vec<Session>, Vec<Session>) = sessions
            .iter()
            .cloned()
            .partition(|session| session.class_id == class_id && session.starts_at > now);

        ensure_unique(&kept, &batch)?;

        let outcome = ReplaceOutcome {
            removed: replaced.len(),
            inserted: batch.len(),
        };

        *sessions = kept;
        sessions.extend(batch);
        sort_by_start(&mut sessions);

        info!(
            class_id,
            removed = outcome.removed,
            inserted = outcome.inserted,
            "replaced upcoming sessions"
        );
        Ok(outcome)
    }

    async fn get(&self, id: Uuid) -> ScheduleResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.iter().find(|session| session.id == id).cloned())
    }

    async fn list_for_class(&self, class_id: &str) -> ScheduleResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        let found: Vec<Session> = sessions
            .iter()
            .filter(|session| session.class_id == class_id)
            .cloned()
            .collect();
        debug!(class_id, count = found.len(), "listed class sessions");
        Ok(found)
    }

    async fn list_for_participant(&self, user_id: &str) -> ScheduleResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .iter()
            .filter(|session| session.involves(user_id))
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> ScheduleResult<Vec<Session>> {
        Ok(self.sessions.read().await.clone())
    }
}

/// Checks `batch` against `stored` and against itself.
fn ensure_unique(stored: &[Session], batch: &[Session]) -> ScheduleResult<()> {
    let mut slots: HashSet<(&str, DateTime<Utc>)> = stored
        .iter()
        .map(|session| (session.class_id.as_str(), session.starts_at))
        .collect();
    let mut ids: HashSet<Uuid> = stored.iter().map(|session| session.id).collect();

    for session in batch {
        if !slots.insert((session.class_id.as_str(), session.starts_at)) {
            return Err(ScheduleError::Conflict(format!(
                "Class {} already has a session starting at {}",
                session.class_id, session.starts_at
            )));
        }
        if !ids.insert(session.id) {
            return Err(ScheduleError::Conflict(format!(
                "Session {} already exists",
                session.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use nexus_core::models::session::ClassKind;
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 11, day, hour, 0, 0).unwrap()
    }

    fn session(class_id: &str, starts_at: DateTime<Utc>, attendee: &str) -> Session {
        Session {
            id: Uuid::now_v7(),
            class_id: class_id.to_string(),
            kind: ClassKind::Group,
            title: "Middlegame plans".to_string(),
            teacher_id: "t1".to_string(),
            attendees: [attendee.to_string()].into(),
            starts_at,
            ends_at: starts_at + Duration::minutes(60),
            is_chess_enabled: true,
        }
    }

    #[tokio::test]
    async fn insert_then_list_sorted() {
        let repo = InMemorySessionRepository::new();
        repo.insert_batch(vec![session("g1", at(9, 10), "s1"), session("g1", at(2, 10), "s1")])
            .await
            .unwrap();
        repo.insert_batch(vec![session("g2", at(5, 10), "s2")])
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        let days: Vec<DateTime<Utc>> = all.iter().map(|s| s.starts_at).collect();
        assert_eq!(days, vec![at(2, 10), at(5, 10), at(9, 10)]);

        assert_eq!(repo.list_for_class("g1").await.unwrap().len(), 2);
        assert_eq!(repo.list_for_participant("s2").await.unwrap().len(), 1);
        assert_eq!(repo.list_for_participant("t1").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn conflicting_batch_stores_nothing() {
        let repo = InMemorySessionRepository::new();
        repo.insert_batch(vec![session("g1", at(2, 10), "s1")])
            .await
            .unwrap();

        let err = repo
            .insert_batch(vec![session("g1", at(3, 10), "s1"), session("g1", at(2, 10), "s2")])
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::Conflict(_)));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_inside_one_batch_is_a_conflict() {
        let repo = InMemorySessionRepository::new();
        let err = repo
            .insert_batch(vec![session("g1", at(2, 10), "s1"), session("g1", at(2, 10), "s2")])
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::Conflict(_)));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_start_in_another_class_is_allowed() {
        let repo = InMemorySessionRepository::new();
        repo.insert_batch(vec![session("g1", at(2, 10), "s1"), session("g2", at(2, 10), "s2")])
            .await
            .unwrap();
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn replace_keeps_history_and_other_classes() {
        let past = session("g1", at(2, 10), "s1");
        let upcoming = session("g1", at(9, 10), "s1");
        let other = session("g2", at(9, 10), "s9");
        let repo = InMemorySessionRepository::with_sessions(vec![
            upcoming.clone(),
            past.clone(),
            other.clone(),
        ]);

        let replacement = session("g1", at(10, 12), "s3");
        let outcome = repo
            .replace_upcoming("g1", at(5, 0), vec![replacement.clone()])
            .await
            .unwrap();

        assert_eq!(outcome, ReplaceOutcome { removed: 1, inserted: 1 });
        assert!(repo.get(upcoming.id).await.unwrap().is_none());
        assert!(repo.get(past.id).await.unwrap().is_some());
        assert!(repo.get(other.id).await.unwrap().is_some());
        assert_eq!(repo.get(replacement.id).await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn replace_can_reuse_a_removed_start() {
        let upcoming = session("g1", at(9, 10), "s1");
        let repo = InMemorySessionRepository::with_sessions(vec![upcoming]);

        let outcome = repo
            .replace_upcoming("g1", at(5, 0), vec![session("g1", at(9, 10), "s2")])
            .await
            .unwrap();

        assert_eq!(outcome, ReplaceOutcome { removed: 1, inserted: 1 });
        let stored = repo.list_for_class("g1").await.unwrap();
        assert!(stored[0].attendees.contains("s2"));
    }

    #[tokio::test]
    async fn replace_rejects_sessions_of_another_class() {
        let repo = InMemorySessionRepository::new();
        let err = repo
            .replace_upcoming("g1", at(5, 0), vec![session("g2", at(9, 10), "s1")])
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[tokio::test]
    async fn replace_conflicting_with_history_changes_nothing() {
        // A stored session starting exactly at `now` counts as history.
        let kept = session("g1", at(5, 0), "s1");
        let upcoming = session("g1", at(9, 10), "s1");
        let repo = InMemorySessionRepository::with_sessions(vec![kept, upcoming.clone()]);

        let err = repo
            .replace_upcoming("g1", at(5, 0), vec![session("g1", at(5, 0), "s2")])
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::Conflict(_)));
        assert!(repo.get(upcoming.id).await.unwrap().is_some());
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }
}
