//! Audit logging for the parking ledger
//!
//! Records every entry registration, exit, credential change and backup
//! restore in an append-only JSONL log.
//!
//! - `AuditEntry`: one log line with timestamp, operation, entity and
//!   optional before/after values.
//! - `AuditLogger`: appends entries and reads them back.
//! - `generate_diff`: one-line summary of the fields an update changed.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
