//! Weekly recurrence rules.
//!
//! A [`TimeSlot`] only exists to parameterize session generation; it is never
//! stored on its own.

use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};

static WALL_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])$").expect("valid regex"));

/// Day of the week, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// Index table for [`Weekday`]: Sunday=0 … Saturday=6.
///
/// Day matching during expansion goes through this table, never through
/// platform date numbering.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sunday,
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
];

impl Weekday {
    /// Position of the day in [`WEEKDAYS`].
    pub fn index(self) -> u8 {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        WEEKDAYS.get(usize::from(index)).copied()
    }

    /// Weekday of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        };
        f.write_str(name)
    }
}

/// Wall-clock time of day with minute precision, written as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallTime(NaiveTime);

impl WallTime {
    pub fn new(hour: u32, minute: u32) -> ScheduleResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(WallTime)
            .ok_or_else(|| {
                ScheduleError::validation(format!("{hour:02}:{minute:02} is not a valid time of day"))
            })
    }

    /// Parses a strict 24-hour `HH:MM` string.
    pub fn parse(value: &str) -> ScheduleResult<Self> {
        let captures = WALL_TIME_RE.captures(value).ok_or_else(|| {
            ScheduleError::validation(format!("Invalid time '{value}', expected HH:MM"))
        })?;

        // The pattern guarantees two ASCII digits in each group.
        let hour = captures[1].parse::<u32>().unwrap_or_default();
        let minute = captures[2].parse::<u32>().unwrap_or_default();
        Self::new(hour, minute)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive_time(self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WallTime::parse(s)
    }
}

impl TryFrom<String> for WallTime {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        WallTime::parse(&value)
    }
}

impl From<WallTime> for String {
    fn from(value: WallTime) -> Self {
        value.to_string()
    }
}

/// One weekly recurrence rule.
///
/// `end_time` is informational. Session length always comes from the
/// request's `duration_min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub day: Weekday,
    pub start_time: WallTime,
    pub end_time: WallTime,
}

impl TimeSlot {
    pub fn new(day: Weekday, start_time: &str, end_time: &str) -> ScheduleResult<Self> {
        Ok(Self {
            day,
            start_time: start_time.parse()?,
            end_time: end_time.parse()?,
        })
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        Weekday::of(date) == self.day
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_test::{assert_de_tokens_error, assert_tokens, Token};

    #[test]
    fn index_table_is_sunday_first() {
        let indices: Vec<u8> = WEEKDAYS.iter().map(|day| day.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(Weekday::from_index(0), Some(Weekday::Sunday));
        assert_eq!(Weekday::from_index(6), Some(Weekday::Saturday));
        assert_eq!(Weekday::from_index(7), None);
    }

    #[rstest]
    #[case(2026, 10, 18, Weekday::Sunday)]
    #[case(2026, 10, 19, Weekday::Monday)]
    #[case(2026, 10, 21, Weekday::Wednesday)]
    #[case(2026, 10, 24, Weekday::Saturday)]
    #[case(2024, 2, 29, Weekday::Thursday)]
    fn weekday_of_date(#[case] y: i32, #[case] m: u32, #[case] d: u32, #[case] expected: Weekday) {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(Weekday::of(date), expected);
    }

    #[rstest]
    #[case("00:00", 0, 0)]
    #[case("09:05", 9, 5)]
    #[case("19:59", 19, 59)]
    #[case("23:59", 23, 59)]
    fn parses_valid_wall_times(#[case] raw: &str, #[case] hour: u32, #[case] minute: u32) {
        let time = WallTime::parse(raw).unwrap();
        assert_eq!((time.hour(), time.minute()), (hour, minute));
        assert_eq!(time.to_string(), raw);
    }

    #[rstest]
    #[case("24:00")]
    #[case("9:00")]
    #[case("09:60")]
    #[case("09:5")]
    #[case("0900")]
    #[case(" 09:00")]
    #[case("09:00:00")]
    #[case("")]
    #[case("١٢:٠٠")]
    fn rejects_malformed_wall_times(#[case] raw: &str) {
        let err = WallTime::parse(raw).unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)), "{raw:?} -> {err}");
    }

    #[test]
    fn wall_time_serde_uses_hh_mm_strings() {
        let time = WallTime::new(14, 30).unwrap();
        assert_tokens(&time, &[Token::Str("14:30")]);
        assert_de_tokens_error::<WallTime>(
            &[Token::Str("2:30pm")],
            "Validation error: Invalid time '2:30pm', expected HH:MM",
        );
    }

    #[test]
    fn time_slot_json_shape() {
        let slot = TimeSlot::new(Weekday::Monday, "10:00", "11:00").unwrap();
        let json = serde_json::to_value(slot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "day": "Monday", "startTime": "10:00", "endTime": "11:00" })
        );
    }

    #[test]
    fn time_slot_matches_its_weekday_only() {
        let slot = TimeSlot::new(Weekday::Wednesday, "14:00", "15:00").unwrap();
        let wednesday = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        assert!(slot.matches(wednesday));
        assert!(!slot.matches(wednesday.succ_opt().unwrap()));
    }
}
