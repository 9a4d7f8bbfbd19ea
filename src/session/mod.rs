//! Visitor Sessions
//!
//! Per-session state for the visitor tracker. Each session owns its own
//! `CountryVisitCounts`; nothing is shared between sessions and nothing
//! outlives the process.

pub mod counter;
pub mod store;

pub use counter::{CountryVisitCounts, VisitRow};
pub use store::{SessionId, SessionSnapshot, SessionStore, SessionStoreConfig, VisitOutcome};
