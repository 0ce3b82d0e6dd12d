//! Audit logging for billtrack
//!
//! Every add, replace and remove of a bill or pay series is appended to a
//! line-delimited JSON log together with before/after snapshots of the
//! stored record.

mod entry;
mod logger;

pub use entry::{record_diff, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
