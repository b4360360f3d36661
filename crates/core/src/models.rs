pub mod class;
pub mod request;
pub mod session;
pub mod time_slot;

/// User identifiers are opaque strings issued by the auth service.
pub type UserId = String;

/// Identifier of the Group or OneToOne that owns a session.
pub type ClassId = String;
