//! # Nexus Core
//!
//! The core crate holds the session-scheduling logic of Nexus LMS. It turns a
//! teaching commitment (a single meeting or a weekly pattern) into concrete
//! sessions and answers the read-side questions asked about them.
//!
//! ## Architecture
//!
//! - **Models**: time slots, sessions, classes and the authoring request
//! - **Materializer**: expands a request into dated sessions
//! - **Classifier**: completed / joinable / upcoming state relative to "now"
//! - **Roster**: derives a class's attendees from its sessions
//! - **Overlaps**: informational double-booking report
//! - **Clock**: the injected time source used by all of the above
//!
//! Everything here is synchronous and performs no I/O.

/// Injected time source
pub mod clock;
/// Session state relative to the current time
pub mod classifier;
/// Domain error type shared by every crate in the workspace
pub mod errors;
/// Expansion of authoring requests into sessions
pub mod materializer;
/// Domain models
pub mod models;
/// Double-booking detection
pub mod overlaps;
/// Attendee derivation
pub mod roster;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ScheduleError, ScheduleResult};
