use serde::{Deserialize, Serialize};

use super::{session::ClassKind, ClassId, UserId};

/// A teaching relationship that owns sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Class {
    Group(Group),
    OneToOne(OneToOne),
}

/// Many students, no stored membership list: the roster is derived from
/// session attendees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: ClassId,
    pub title: String,
    pub subject: String,
    pub teacher_id: UserId,
    pub cap: u32,
    pub current_size: u32,
    pub duration_min: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneToOne {
    pub id: ClassId,
    pub title: String,
    pub subject: String,
    pub teacher_id: UserId,
    pub student_id: UserId,
    pub duration_min: u32,
}

impl Class {
    pub fn id(&self) -> &str {
        match self {
            Class::Group(group) => &group.id,
            Class::OneToOne(one) => &one.id,
        }
    }

    pub fn kind(&self) -> ClassKind {
        match self {
            Class::Group(_) => ClassKind::Group,
            Class::OneToOne(_) => ClassKind::OneToOne,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Class::Group(group) => &group.title,
            Class::OneToOne(one) => &one.title,
        }
    }

    pub fn teacher_id(&self) -> &str {
        match self {
            Class::Group(group) => &group.teacher_id,
            Class::OneToOne(one) => &one.teacher_id,
        }
    }

    pub fn duration_min(&self) -> u32 {
        match self {
            Class::Group(group) => group.duration_min,
            Class::OneToOne(one) => one.duration_min,
        }
    }
}

impl Group {
    /// Seats left once `roster_len` students are attending. Zero when full or
    /// over capacity.
    pub fn seats_remaining(&self, roster_len: usize) -> u32 {
        let taken = u32::try_from(roster_len).unwrap_or(u32::MAX);
        self.cap.saturating_sub(taken)
    }

    pub fn is_over_capacity(&self, roster_len: usize) -> bool {
        u32::try_from(roster_len).map_or(true, |taken| taken > self.cap)
    }
}
