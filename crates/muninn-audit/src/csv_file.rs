//! Buffered CSV audit file sink
//!
//! One file per action per calendar day, named
//! `<action>_audit_<YYYY-MM-DD>.csv`, appended to across process runs.
//! Rows are buffered and flushed when either the row threshold or the
//! flush interval is exceeded, observed at write time; `close` always
//! flushes whatever remains. Files are never rotated or deleted here.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Local;
use tracing::warn;

use crate::action::AuditAction;
use crate::sink::AuditSink;

/// Rows buffered before a flush is forced
pub const FLUSH_EVERY_ROWS: u32 = 10;

/// Longest a buffered row may wait before the next write forces a flush
pub const FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Timestamp format for the leading column of every row
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only CSV audit sink for one action's execution
pub struct CsvAuditSink {
    action: AuditAction,
    path: PathBuf,
    writer: BufWriter<File>,
    flush_every: u32,
    flush_interval: Duration,
    rows_since_flush: u32,
    last_flush: Instant,
    closed: bool,
}

impl CsvAuditSink {
    /// Open (creating if absent) today's audit file for `action` in the
    /// platform temporary-files directory
    pub fn open(action: AuditAction) -> Result<Self> {
        Self::open_in(std::env::temp_dir(), action)
    }

    /// Open today's audit file for `action` under `dir`
    ///
    /// A new (empty) file gets its action-specific header row written
    /// and flushed immediately, so the header survives even a crash
    /// before the first data row.
    pub fn open_in(dir: impl AsRef<Path>, action: AuditAction) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create audit directory {}", dir.display()))?;

        let date = Local::now().format("%Y-%m-%d");
        let path = dir.join(format!("{}_audit_{}.csv", action.slug(), date));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open audit file {}", path.display()))?;

        let is_new = file
            .metadata()
            .with_context(|| format!("failed to stat audit file {}", path.display()))?
            .len()
            == 0;

        let mut sink = Self {
            action,
            path,
            writer: BufWriter::new(file),
            flush_every: FLUSH_EVERY_ROWS,
            flush_interval: FLUSH_INTERVAL,
            rows_since_flush: 0,
            last_flush: Instant::now(),
            closed: false,
        };

        if is_new {
            let header: Vec<String> = sink
                .action
                .header()
                .iter()
                .map(|column| column.to_string())
                .collect();
            sink.write_line(&header)?;
            sink.flush()?;
        }

        Ok(sink)
    }

    /// Override the flush thresholds
    pub fn with_flush_policy(mut self, flush_every: u32, flush_interval: Duration) -> Self {
        self.flush_every = flush_every;
        self.flush_interval = flush_interval;
        self
    }

    /// Path of the underlying audit file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The action this sink records
    pub fn action(&self) -> &AuditAction {
        &self.action
    }

    /// Force buffered rows out to stable storage
    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("failed to flush audit file {}", self.path.display()))?;
        self.writer
            .get_ref()
            .sync_all()
            .with_context(|| format!("failed to sync audit file {}", self.path.display()))?;
        self.rows_since_flush = 0;
        self.last_flush = Instant::now();
        Ok(())
    }

    fn write_line(&mut self, fields: &[String]) -> Result<()> {
        let line = fields
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.writer, "{line}")
            .with_context(|| format!("failed to append to audit file {}", self.path.display()))
    }
}

impl AuditSink for CsvAuditSink {
    fn write_row(&mut self, fields: &[&str]) -> Result<()> {
        if self.closed {
            bail!("audit sink for {} is closed", self.action);
        }

        let mut row = Vec::with_capacity(fields.len() + 1);
        row.push(Local::now().format(TIMESTAMP_FORMAT).to_string());
        row.extend(fields.iter().map(|field| field.to_string()));
        self.write_line(&row)?;

        self.rows_since_flush += 1;
        if self.rows_since_flush >= self.flush_every
            || self.last_flush.elapsed() > self.flush_interval
        {
            self.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        self.closed = true;
        Ok(())
    }
}

impl Drop for CsvAuditSink {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.writer.flush();
        }
    }
}

/// Open the audit sink for `action`, degrading to `None` on failure
///
/// Auditing is best-effort: when the file cannot be opened (permission
/// denied, unwritable temp directory) one warning is surfaced and the
/// operation proceeds without an audit trail.
pub fn open_audit_sink(action: AuditAction) -> Option<CsvAuditSink> {
    match CsvAuditSink::open(action.clone()) {
        Ok(sink) => Some(sink),
        Err(err) => {
            warn!(
                action = %action,
                error = %err,
                "audit logging disabled: could not open audit file"
            );
            None
        }
    }
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
