//! Input contract of the authoring surface.
//!
//! ```json
//! {
//!   "title": "Openings",
//!   "classId": "g1",
//!   "classType": "GROUP",
//!   "teacherId": "t1",
//!   "attendees": ["s1", "s2"],
//!   "durationMin": 60,
//!   "chessEnabled": true,
//!   "timezone": "Europe/Madrid",
//!   "schedule": {
//!     "mode": "weekly",
//!     "startDate": "2026-11-02",
//!     "endDate": "2026-11-15",
//!     "timeSlots": [{ "day": "Monday", "startTime": "10:00", "endTime": "11:00" }]
//!   }
//! }
//! ```

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{
    session::ClassKind,
    time_slot::{TimeSlot, WallTime},
    ClassId, UserId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoringRequest {
    pub title: String,
    pub class_id: ClassId,
    pub class_type: ClassKind,
    pub teacher_id: UserId,
    #[serde(default)]
    pub attendees: Vec<UserId>,
    pub duration_min: u32,
    #[serde(default)]
    pub chess_enabled: bool,
    /// IANA zone the wall-clock times are written in. Falls back to the
    /// configured default.
    #[serde(default)]
    pub timezone: Option<Tz>,
    pub schedule: ScheduleInput,
}

/// Either one dated meeting or a weekly pattern over an inclusive date range.
///
/// Fields of the single form are optional because they arrive from form
/// state; their absence is reported as a validation error, not a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ScheduleInput {
    #[serde(rename_all = "camelCase")]
    Single {
        #[serde(default)]
        date: Option<NaiveDate>,
        #[serde(default)]
        start_time: Option<WallTime>,
        #[serde(default)]
        end_time: Option<WallTime>,
    },
    #[serde(rename_all = "camelCase")]
    Weekly {
        start_date: NaiveDate,
        end_date: NaiveDate,
        #[serde(default)]
        time_slots: Vec<TimeSlot>,
    },
}

impl ScheduleInput {
    pub fn single(date: NaiveDate, start_time: WallTime, end_time: WallTime) -> Self {
        ScheduleInput::Single {
            date: Some(date),
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    pub fn weekly(start_date: NaiveDate, end_date: NaiveDate, time_slots: Vec<TimeSlot>) -> Self {
        ScheduleInput::Weekly {
            start_date,
            end_date,
            time_slots,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, ScheduleInput::Weekly { .. })
    }
}
