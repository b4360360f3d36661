//! # Session Materializer
//!
//! Expands an [`AuthoringRequest`] into concrete [`Session`]s.
//!
//! ## Recurring expansion
//!
//! 1. Walk every calendar day from `start_date` to `end_date`, inclusive
//! 2. For each time slot whose weekday matches the day, place a candidate
//!    start at the slot's wall-clock time in the request timezone
//! 3. Keep the candidate only if it starts strictly after `now`
//! 4. End each session `duration_min` minutes after its start
//! 5. Sort the batch ascending by start
//!
//! The single path applies the same future-only rule, but reports a past
//! start as a validation error since the user picked that exact instant.
//!
//! Overlapping slots on the same weekday are generated independently; see
//! [`crate::overlaps`] for the read-side report.

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    clock::Clock,
    errors::{ScheduleError, ScheduleResult},
    models::{
        request::{AuthoringRequest, ScheduleInput},
        session::{sort_by_start, ClassKind, Session},
        time_slot::{TimeSlot, WallTime},
    },
};

/// Longest inclusive recurring range accepted by default, in days.
pub const DEFAULT_MAX_RANGE_DAYS: u32 = 366;

/// Bounds applied to every generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    pub max_range_days: u32,
    /// Used when the request carries no timezone.
    pub default_timezone: Tz,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            default_timezone: Tz::UTC,
        }
    }
}

/// Why a valid request produced no sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmptyReason {
    /// No slot weekday occurs inside the date range.
    NoMatchingDays,
    /// Every matching occurrence starts at or before `now`.
    AllInPast,
    /// Every matching occurrence falls in a daylight-saving gap.
    NoValidLocalTimes,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            EmptyReason::NoMatchingDays => "no time slot falls on a day inside the date range",
            EmptyReason::AllInPast => "every matching occurrence is already in the past",
            EmptyReason::NoValidLocalTimes => {
                "every matching occurrence falls in a daylight-saving gap"
            }
        };
        f.write_str(message)
    }
}

/// Outcome of a successful materialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    /// Non-empty batch, sorted by start.
    Sessions(Vec<Session>),
    Empty(EmptyReason),
}

impl Generation {
    pub fn sessions(&self) -> &[Session] {
        match self {
            Generation::Sessions(sessions) => sessions,
            Generation::Empty(_) => &[],
        }
    }

    pub fn into_sessions(self) -> Vec<Session> {
        match self {
            Generation::Sessions(sessions) => sessions,
            Generation::Empty(_) => Vec::new(),
        }
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            Generation::Sessions(_) => None,
            Generation::Empty(reason) => Some(*reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty_reason().is_some()
    }
}

/// Materializer bound to a clock and a set of limits.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use nexus_core::{
///     clock::FixedClock,
///     materializer::Materializer,
///     models::{
///         request::{AuthoringRequest, ScheduleInput},
///         session::ClassKind,
///         time_slot::{TimeSlot, Weekday},
///     },
/// };
///
/// let now = Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap();
/// let materializer = Materializer::new(FixedClock::at(now));
/// let request = AuthoringRequest {
///     title: "Endgames".to_string(),
///     class_id: "g1".to_string(),
///     class_type: ClassKind::Group,
///     teacher_id: "t1".to_string(),
///     attendees: vec!["s1".to_string()],
///     duration_min: 45,
///     chess_enabled: true,
///     timezone: None,
///     schedule: ScheduleInput::weekly(
///         NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
///         NaiveDate::from_ymd_opt(2026, 11, 8).unwrap(),
///         vec![TimeSlot::new(Weekday::Monday, "10:00", "10:45").unwrap()],
///     ),
/// };
///
/// let generation = materializer.materialize(&request).unwrap();
/// assert_eq!(generation.sessions().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Materializer<C> {
    clock: C,
    limits: GenerationLimits,
}

impl<C: Clock> Materializer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            limits: GenerationLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: GenerationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &GenerationLimits {
        &self.limits
    }

    /// Reads the clock once and expands the request against that instant.
    pub fn materialize(&self, request: &AuthoringRequest) -> ScheduleResult<Generation> {
        expand(request, self.clock.now(), &self.limits)
    }
}

/// Expands `request` against an explicit `now`.
///
/// Same request and same `now` always yield the same start/end pairs; only
/// the session ids differ between calls.
///
/// # Errors
///
/// `ScheduleError::Validation` when the request is incomplete or malformed:
/// missing single date/time, a non-future single start, an inverted or
/// oversized range, no time slots, a zero duration, blank identifiers, or a
/// OneToOne request without exactly one attendee.
pub fn expand(
    request: &AuthoringRequest,
    now: DateTime<Utc>,
    limits: &GenerationLimits,
) -> ScheduleResult<Generation> {
    validate_request(request)?;

    let timezone = request.timezone.unwrap_or(limits.default_timezone);
    let template = SessionTemplate::new(request);

    match &request.schedule {
        ScheduleInput::Single {
            date, start_time, ..
        } => {
            let date = date.ok_or_else(|| {
                ScheduleError::validation("A date is required for a single session")
            })?;
            let start_time = start_time.ok_or_else(|| {
                ScheduleError::validation("A start time is required for a single session")
            })?;

            let starts_at = localize(date, start_time, timezone).ok_or_else(|| {
                ScheduleError::validation(format!(
                    "{date} {start_time} does not exist in {timezone}"
                ))
            })?;

            if starts_at <= now {
                return Err(ScheduleError::validation(format!(
                    "Session must start in the future (requested {starts_at})"
                )));
            }

            debug!(class_id = %request.class_id, %starts_at, "materialized single session");
            Ok(Generation::Sessions(vec![template.instantiate(starts_at)]))
        }
        ScheduleInput::Weekly {
            start_date,
            end_date,
            time_slots,
        } => expand_weekly(
            &template,
            *start_date,
            *end_date,
            time_slots,
            timezone,
            now,
            limits,
        ),
    }
}

fn expand_weekly(
    template: &SessionTemplate<'_>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    time_slots: &[TimeSlot],
    timezone: Tz,
    now: DateTime<Utc>,
    limits: &GenerationLimits,
) -> ScheduleResult<Generation> {
    if time_slots.is_empty() {
        return Err(ScheduleError::validation(
            "At least one time slot is required for a recurring schedule",
        ));
    }

    if start_date > end_date {
        return Err(ScheduleError::validation(format!(
            "Start date {start_date} is after end date {end_date}"
        )));
    }

    let range_days = (end_date - start_date).num_days() + 1;
    if range_days > i64::from(limits.max_range_days) {
        return Err(ScheduleError::validation(format!(
            "Date range spans {range_days} days, the maximum is {}",
            limits.max_range_days
        )));
    }

    // Identical (day, start) slots would produce colliding sessions.
    let mut seen = BTreeSet::new();
    let time_slots: Vec<&TimeSlot> = time_slots
        .iter()
        .filter(|slot| seen.insert((slot.day, slot.start_time)))
        .collect();

    let mut sessions = Vec::new();
    let mut matched = 0usize;
    let mut in_past = 0usize;

    for date in start_date.iter_days().take_while(|date| *date <= end_date) {
        for slot in time_slots.iter().filter(|slot| slot.matches(date)) {
            matched += 1;

            let Some(starts_at) = localize(date, slot.start_time, timezone) else {
                warn!(
                    class_id = %template.request.class_id,
                    %date,
                    start_time = %slot.start_time,
                    %timezone,
                    "skipping occurrence inside a daylight-saving gap"
                );
                continue;
            };

            if starts_at <= now {
                in_past += 1;
                continue;
            }

            sessions.push(template.instantiate(starts_at));
        }
    }

    if sessions.is_empty() {
        let reason = if matched == 0 {
            EmptyReason::NoMatchingDays
        } else if in_past > 0 {
            EmptyReason::AllInPast
        } else {
            EmptyReason::NoValidLocalTimes
        };
        warn!(
            class_id = %template.request.class_id,
            %start_date,
            %end_date,
            %reason,
            "recurring schedule produced no sessions"
        );
        return Ok(Generation::Empty(reason));
    }

    sort_by_start(&mut sessions);
    debug!(
        class_id = %template.request.class_id,
        generated = sessions.len(),
        skipped_past = in_past,
        "materialized recurring sessions"
    );
    Ok(Generation::Sessions(sessions))
}

fn validate_request(request: &AuthoringRequest) -> ScheduleResult<()> {
    if request.title.trim().is_empty() {
        return Err(ScheduleError::validation("Title must not be empty"));
    }
    if request.class_id.trim().is_empty() {
        return Err(ScheduleError::validation("Class ID must not be empty"));
    }
    if request.teacher_id.trim().is_empty() {
        return Err(ScheduleError::validation("Teacher ID must not be empty"));
    }
    if request.duration_min == 0 {
        return Err(ScheduleError::validation(
            "Duration must be at least one minute",
        ));
    }
    if request.attendees.iter().any(|id| id.trim().is_empty()) {
        return Err(ScheduleError::validation("Attendee IDs must not be empty"));
    }
    if request.class_type == ClassKind::OneToOne {
        let distinct: BTreeSet<&str> = request.attendees.iter().map(String::as_str).collect();
        if distinct.len() != 1 {
            return Err(ScheduleError::validation(format!(
                "A one-to-one session needs exactly one attendee, got {}",
                distinct.len()
            )));
        }
    }
    Ok(())
}

/// Resolves a local date and wall time to a UTC instant. Ambiguous times take
/// the earlier instant; times inside a gap resolve to `None`.
fn localize(date: NaiveDate, time: WallTime, timezone: Tz) -> Option<DateTime<Utc>> {
    timezone
        .from_local_datetime(&date.and_time(time.as_naive_time()))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// The parts of a session shared by every occurrence of one request.
struct SessionTemplate<'a> {
    request: &'a AuthoringRequest,
    attendees: BTreeSet<String>,
    duration: Duration,
}

impl<'a> SessionTemplate<'a> {
    fn new(request: &'a AuthoringRequest) -> Self {
        Self {
            request,
            attendees: request.attendees.iter().cloned().collect(),
            duration: Duration::minutes(i64::from(request.duration_min)),
        }
    }

    fn instantiate(&self, starts_at: DateTime<Utc>) -> Session {
        Session {
            id: Uuid::now_v7(),
            class_id: self.request.class_id.clone(),
            kind: self.request.class_type,
            title: self.request.title.clone(),
            teacher_id: self.request.teacher_id.clone(),
            attendees: self.attendees.clone(),
            starts_at,
            ends_at: starts_at + self.duration,
            is_chess_enabled: self.request.chess_enabled,
        }
    }
}
