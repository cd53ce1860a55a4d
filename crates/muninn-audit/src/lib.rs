//! # muninn-audit
//!
//! Append-only audit trail for Muninn mailbox operations:
//! - One CSV file per action per calendar day, with a fixed column set
//!   per action
//! - Buffered writes with bounded loss on ungraceful termination
//! - An injectable sink boundary with an in-memory test double
//!
//! The sink is constructed explicitly by the CLI layer and passed into
//! business operations; nothing here is process-global.

mod action;
mod csv_file;
mod sink;

pub use action::AuditAction;
pub use csv_file::{open_audit_sink, CsvAuditSink, FLUSH_EVERY_ROWS, FLUSH_INTERVAL};
pub use sink::{AuditSink, MemoryAuditSink};
