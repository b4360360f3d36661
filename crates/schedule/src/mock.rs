use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use nexus_core::{errors::ScheduleResult, models::session::Session};
use uuid::Uuid;

use crate::repository::{ReplaceOutcome, SessionRepository};

// Mock repository for testing
mock! {
    pub SessionRepo {}

    #[async_trait]
    impl SessionRepository for SessionRepo {
        async fn insert_batch(&self, batch: Vec<Session>) -> ScheduleResult<Vec<Session>>;

        async fn replace_upcoming(
            &self,
            class_id: &str,
            now: DateTime<Utc>,
            batch: Vec<Session>,
        ) -> ScheduleResult<ReplaceOutcome>;

        async fn get(&self, id: Uuid) -> ScheduleResult<Option<Session>>;

        async fn list_for_class(&self, class_id: &str) -> ScheduleResult<Vec<Session>>;

        async fn list_for_participant(&self, user_id: &str) -> ScheduleResult<Vec<Session>>;

        async fn list_all(&self) -> ScheduleResult<Vec<Session>>;
    }
}
