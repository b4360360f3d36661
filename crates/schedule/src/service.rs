//! # Schedule Service
//!
//! Ties the core together for callers that keep sessions around: the clock
//! is read once per operation, requests are materialized against that
//! instant, and batches are written through a [`SessionRepository`].
//!
//! Two write paths exist:
//!
//! - **submit**: append a newly materialized batch next to what is stored
//! - **regenerate**: the batch replaces the class's upcoming sessions, so a
//!   session absent from the new batch is gone; completed sessions stay

use nexus_core::{
    classifier::{classify_all, next_session, split_by_status, ClassifiedSession, SessionSplit},
    clock::Clock,
    errors::ScheduleResult,
    materializer::{expand, Generation, GenerationLimits},
    models::{class::Class, request::AuthoringRequest, session::Session},
    overlaps::{overlaps_for, Overlap},
    roster::{resolve_roster, Roster},
};
use tracing::{debug, info};

use crate::{
    config::SchedulingConfig,
    repository::{ReplaceOutcome, SessionRepository},
};

/// What a regeneration produced and what it displaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Regeneration {
    pub generation: Generation,
    pub outcome: ReplaceOutcome,
}

pub struct ScheduleService<R, C> {
    repository: R,
    clock: C,
    limits: GenerationLimits,
}

impl<R: SessionRepository, C: Clock> ScheduleService<R, C> {
    pub fn new(repository: R, clock: C, config: &SchedulingConfig) -> Self {
        Self {
            repository,
            clock,
            limits: config.generation_limits(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Materializes `request` and stores the batch alongside existing
    /// sessions. An empty generation stores nothing.
    ///
    /// # Errors
    ///
    /// * `ScheduleError::Validation` - the request is invalid
    /// * `ScheduleError::Conflict` - a session would share its class and
    ///   start with a stored one; nothing is stored
    pub async fn submit(&self, request: &AuthoringRequest) -> ScheduleResult<Generation> {
        let now = self.clock.now();
        let generation = expand(request, now, &self.limits)?;

        match &generation {
            Generation::Sessions(sessions) => {
                let stored = self.repository.insert_batch(sessions.clone()).await?;
                info!(
                    class_id = %request.class_id,
                    stored = stored.len(),
                    "submitted session batch"
                );
            }
            Generation::Empty(reason) => {
                info!(class_id = %request.class_id, %reason, "nothing to submit");
            }
        }

        Ok(generation)
    }

    /// Materializes `request` and replaces the class's upcoming sessions with
    /// the result. An empty generation clears them.
    pub async fn regenerate(&self, request: &AuthoringRequest) -> ScheduleResult<Regeneration> {
        let now = self.clock.now();
        let generation = expand(request, now, &self.limits)?;

        let outcome = self
            .repository
            .replace_upcoming(&request.class_id, now, generation.sessions().to_vec())
            .await?;

        info!(
            class_id = %request.class_id,
            removed = outcome.removed,
            inserted = outcome.inserted,
            "regenerated class schedule"
        );
        Ok(Regeneration {
            generation,
            outcome,
        })
    }

    /// Every session the user teaches or attends, soonest first, with its
    /// current status.
    pub async fn my_sessions(&self, user_id: &str) -> ScheduleResult<Vec<ClassifiedSession>> {
        let sessions = self.repository.list_for_participant(user_id).await?;
        debug!(user_id, count = sessions.len(), "classifying participant sessions");
        Ok(classify_all(sessions, self.clock.now()))
    }

    /// The user's sessions split into upcoming and completed.
    pub async fn my_schedule(&self, user_id: &str) -> ScheduleResult<SessionSplit> {
        let sessions = self.repository.list_for_participant(user_id).await?;
        Ok(split_by_status(sessions, self.clock.now()))
    }

    pub async fn next_session_for(&self, user_id: &str) -> ScheduleResult<Option<Session>> {
        let sessions = self.repository.list_for_participant(user_id).await?;
        Ok(next_session(&sessions, self.clock.now()).cloned())
    }

    pub async fn roster(&self, class: &Class) -> ScheduleResult<Roster> {
        let sessions = self.repository.list_for_class(class.id()).await?;
        Ok(resolve_roster(class, &sessions))
    }

    /// Double bookings of the user among stored sessions.
    pub async fn overlaps_for(&self, user_id: &str) -> ScheduleResult<Vec<Overlap>> {
        let sessions = self.repository.list_for_participant(user_id).await?;
        Ok(overlaps_for(user_id, &sessions))
    }
}
