//! Double-booking report.
//!
//! Generation never rejects overlapping sessions. This module finds them
//! afterwards, per participant (teacher or attendee), so a caller can warn.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{session::Session, UserId};

/// Two sessions sharing a participant whose time ranges intersect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlap {
    pub participant_id: UserId,
    /// The earlier-starting session of the pair.
    pub first: Uuid,
    pub second: Uuid,
    /// Start of the shared interval.
    pub starts_at: DateTime<Utc>,
    /// End of the shared interval.
    pub ends_at: DateTime<Utc>,
}

/// Every overlapping pair, per participant, ordered by participant then start.
pub fn find_overlaps(sessions: &[Session]) -> Vec<Overlap> {
    let mut by_participant: BTreeMap<&str, Vec<&Session>> = BTreeMap::new();
    for session in sessions {
        by_participant
            .entry(session.teacher_id.as_str())
            .or_default()
            .push(session);
        for attendee in &session.attendees {
            if *attendee != session.teacher_id {
                by_participant.entry(attendee.as_str()).or_default().push(session);
            }
        }
    }

    let mut overlaps = Vec::new();
    for (participant, mut booked) in by_participant {
        booked.sort_by_key(|session| session.starts_at);
        collect_pairs(participant, &booked, &mut overlaps);
    }
    overlaps
}

/// Overlaps involving one participant only.
pub fn overlaps_for(user_id: &str, sessions: &[Session]) -> Vec<Overlap> {
    let mut booked: Vec<&Session> = sessions
        .iter()
        .filter(|session| session.involves(user_id))
        .collect();
    booked.sort_by_key(|session| session.starts_at);

    let mut overlaps = Vec::new();
    collect_pairs(user_id, &booked, &mut overlaps);
    overlaps
}

// `booked` must be sorted by start: once a later session starts at or after
// the current one's end, no later session can overlap it either.
fn collect_pairs(participant: &str, booked: &[&Session], out: &mut Vec<Overlap>) {
    for (i, first) in booked.iter().enumerate() {
        for second in booked[i + 1..]
            .iter()
            .take_while(|second| second.starts_at < first.ends_at)
        {
            if !first.overlaps(second) {
                continue;
            }
            out.push(Overlap {
                participant_id: participant.to_string(),
                first: first.id,
                second: second.id,
                starts_at: second.starts_at,
                ends_at: first.ends_at.min(second.ends_at),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::ClassKind;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn session(teacher: &str, attendees: &[&str], hour: u32, minutes: i64) -> Session {
        let starts_at = Utc.with_ymd_and_hms(2026, 11, 2, hour, 0, 0).unwrap();
        Session {
            id: Uuid::new_v4(),
            class_id: format!("{teacher}-{hour}"),
            kind: ClassKind::Group,
            title: "Lesson".to_string(),
            teacher_id: teacher.to_string(),
            attendees: attendees.iter().map(|id| id.to_string()).collect(),
            starts_at,
            ends_at: starts_at + Duration::minutes(minutes),
            is_chess_enabled: false,
        }
    }

    #[test]
    fn back_to_back_sessions_do_not_overlap() {
        let sessions = vec![session("t1", &["s1"], 10, 60), session("t1", &["s1"], 11, 60)];
        assert!(find_overlaps(&sessions).is_empty());
    }

    #[test]
    fn reports_shared_teacher_and_student() {
        let a = session("t1", &["s1"], 10, 90);
        let b = session("t1", &["s2"], 11, 60);
        let c = session("t2", &["s1"], 11, 30);
        let sessions = vec![c.clone(), a.clone(), b.clone()];

        let overlaps = find_overlaps(&sessions);

        let summary: Vec<(&str, Uuid, Uuid)> = overlaps
            .iter()
            .map(|o| (o.participant_id.as_str(), o.first, o.second))
            .collect();
        assert_eq!(summary, vec![("s1", a.id, c.id), ("t1", a.id, b.id)]);
        assert_eq!(overlaps[1].starts_at, b.starts_at);
        assert_eq!(overlaps[1].ends_at, a.ends_at);
    }

    #[test]
    fn overlaps_for_one_user() {
        let a = session("t1", &["s1"], 10, 120);
        let b = session("t2", &["s1"], 11, 30);
        let c = session("t2", &["s3"], 11, 30);
        let sessions = vec![a.clone(), b.clone(), c];

        let overlaps = overlaps_for("s1", &sessions);
        assert_eq!(overlaps.len(), 1);
        assert_eq!((overlaps[0].first, overlaps[0].second), (a.id, b.id));
        assert!(overlaps_for("s3", &sessions).is_empty());
    }

    #[test]
    fn contained_session_is_reported_past_a_non_overlapping_neighbour() {
        // 10:00-13:00 contains 12:00-12:30 even though 11:00-11:15 sits between.
        let long = session("t1", &[], 10, 180);
        let short = session("t1", &[], 11, 15);
        let later = session("t1", &[], 12, 30);
        let overlaps = find_overlaps(&[long.clone(), short, later.clone()]);

        assert_eq!(overlaps.len(), 2);
        assert!(overlaps.iter().any(|o| o.first == long.id && o.second == later.id));
    }
}
