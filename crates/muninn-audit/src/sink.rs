//! Pluggable audit sink boundary
//!
//! Business operations receive a sink as an injected dependency rather
//! than reaching for a process-wide file. The production implementation
//! is [`crate::CsvAuditSink`]; tests use [`MemoryAuditSink`].

use anyhow::{bail, Result};

/// An append-only record sink for audit rows
///
/// One sink instance is owned by one action's execution for the
/// lifetime of the process. Implementations prepend the timestamp
/// column; callers supply only the action-specific fields.
pub trait AuditSink {
    /// Append one row of action-specific fields
    fn write_row(&mut self, fields: &[&str]) -> Result<()>;

    /// Flush anything buffered and reject all further writes
    fn close(&mut self) -> Result<()>;
}

/// An in-memory sink that records rows as supplied
///
/// Test double: rows are stored verbatim, without the timestamp column
/// the file-backed sink prepends.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    rows: Vec<Vec<String>>,
    closed: bool,
}

impl MemoryAuditSink {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows written so far
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Whether the sink has been closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl AuditSink for MemoryAuditSink {
    fn write_row(&mut self, fields: &[&str]) -> Result<()> {
        if self.closed {
            bail!("audit sink is closed");
        }
        self.rows.push(fields.iter().map(|f| f.to_string()).collect());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
