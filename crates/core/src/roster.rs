//! # Roster Resolver
//!
//! A Group has no stored membership list. Its roster is the deduplicated
//! union of attendees over every session it owns, so a student with no
//! session in the class is not on its roster. A OneToOne's roster is its
//! fixed student.

use std::collections::BTreeSet;

use crate::models::{class::Class, session::Session, UserId};

/// Set of user ids, kept sorted for stable output.
pub type Roster = BTreeSet<UserId>;

/// Union of attendees over the sessions owned by `class_id`.
pub fn roster_for_class_id(class_id: &str, sessions: &[Session]) -> Roster {
    sessions
        .iter()
        .filter(|session| session.class_id == class_id)
        .flat_map(|session| session.attendees.iter().cloned())
        .collect()
}

pub fn resolve_roster(class: &Class, sessions: &[Session]) -> Roster {
    match class {
        Class::Group(group) => roster_for_class_id(&group.id, sessions),
        Class::OneToOne(one) => Roster::from([one.student_id.clone()]),
    }
}
