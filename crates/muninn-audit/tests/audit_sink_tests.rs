//! Integration tests for the buffered CSV audit sink

use std::fs;
use std::time::Duration;

use muninn_audit::{AuditAction, AuditSink, CsvAuditSink};
use tempfile::TempDir;

fn read_lines(sink_path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(sink_path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_header_is_durable_immediately_after_open() {
    let dir = TempDir::new().unwrap();
    let sink = CsvAuditSink::open_in(dir.path(), AuditAction::SendMail).unwrap();

    let lines = read_lines(sink.path());
    assert_eq!(lines, vec!["Timestamp,To,Subject,Status,Details"]);
}

#[test]
fn test_rows_below_threshold_stay_buffered() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::ListInbox).unwrap();

    for i in 0..3 {
        sink.write_row(&["sender@example.com", &format!("subject {i}"), "", "unread"])
            .unwrap();
    }

    // Only the header has been forced out so far.
    assert_eq!(read_lines(sink.path()).len(), 1);
}

#[test]
fn test_count_threshold_flushes_ten_rows() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::ListEvents).unwrap();

    for i in 0..10 {
        sink.write_row(&[
            &format!("standup {i}"),
            "alice@example.com",
            "2026-08-06T09:00",
            "2026-08-06T09:15",
            "room 4",
        ])
        .unwrap();
    }

    let lines = read_lines(sink.path());
    assert_eq!(lines.len(), 11, "header plus all ten rows must be durable");
}

#[test]
fn test_time_threshold_flushes_at_next_write() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::FreeBusy)
        .unwrap()
        .with_flush_policy(100, Duration::from_millis(50));

    sink.write_row(&["bob@example.com", "09:00", "17:00", "busy"])
        .unwrap();
    assert_eq!(read_lines(sink.path()).len(), 1);

    std::thread::sleep(Duration::from_millis(80));
    sink.write_row(&["carol@example.com", "09:00", "17:00", "free"])
        .unwrap();

    let lines = read_lines(sink.path());
    assert_eq!(lines.len(), 3, "interval expiry must flush both rows");
}

#[test]
fn test_close_flushes_partial_buffer() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::CreateInvite).unwrap();

    sink.write_row(&["retro", "team@example.com", "10:00", "11:00", "created"])
        .unwrap();
    sink.write_row(&["planning", "team@example.com", "11:00", "12:00", "created"])
        .unwrap();
    sink.close().unwrap();

    let lines = read_lines(sink.path());
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_writes_rejected_after_close() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::SendMail).unwrap();

    sink.close().unwrap();
    let err = sink
        .write_row(&["x@example.com", "s", "sent", ""])
        .unwrap_err();
    assert!(err.to_string().contains("closed"));

    // A second close is a no-op, not an error.
    sink.close().unwrap();
}

#[test]
fn test_reopening_same_day_appends_without_second_header() {
    let dir = TempDir::new().unwrap();

    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::SendMail).unwrap();
    sink.write_row(&["a@example.com", "first", "sent", ""])
        .unwrap();
    sink.close().unwrap();
    let path = sink.path().to_path_buf();
    drop(sink);

    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::SendMail).unwrap();
    assert_eq!(sink.path(), path);
    sink.write_row(&["b@example.com", "second", "sent", ""])
        .unwrap();
    sink.close().unwrap();

    let lines = read_lines(&path);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Timestamp,"));
    assert!(!lines[1].starts_with("Timestamp,To"));
    assert!(!lines[2].starts_with("Timestamp,To"));
}

#[test]
fn test_file_name_carries_action_and_date() {
    let dir = TempDir::new().unwrap();
    let sink = CsvAuditSink::open_in(dir.path(), AuditAction::ListEvents).unwrap();

    let name = sink.path().file_name().unwrap().to_str().unwrap();
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    assert_eq!(name, format!("list-events_audit_{date}.csv"));
}

#[test]
fn test_rows_lead_with_second_precision_timestamp() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::ListInbox).unwrap();

    sink.write_row(&["sender@example.com", "hello", "2026-08-06", "read"])
        .unwrap();
    sink.close().unwrap();

    let lines = read_lines(sink.path());
    let first_field = lines[1].split(',').next().unwrap();
    assert!(
        chrono::NaiveDateTime::parse_from_str(first_field, "%Y-%m-%d %H:%M:%S").is_ok(),
        "unexpected timestamp field {first_field:?}"
    );
}

#[test]
fn test_fields_with_separators_are_quoted() {
    let dir = TempDir::new().unwrap();
    let mut sink = CsvAuditSink::open_in(dir.path(), AuditAction::SendMail).unwrap();

    sink.write_row(&[
        "a@example.com, b@example.com",
        "status: \"green\"",
        "sent",
        "",
    ])
    .unwrap();
    sink.close().unwrap();

    let lines = read_lines(sink.path());
    assert!(lines[1].contains("\"a@example.com, b@example.com\""));
    assert!(lines[1].contains("\"status: \"\"green\"\"\""));
}

#[test]
fn test_unknown_action_uses_generic_schema() {
    let dir = TempDir::new().unwrap();
    let action = AuditAction::Other("export-contacts".to_string());
    let mut sink = CsvAuditSink::open_in(dir.path(), action).unwrap();

    sink.write_row(&["export-contacts", "ok", "42 contacts"])
        .unwrap();
    sink.close().unwrap();

    let lines = read_lines(sink.path());
    assert_eq!(lines[0], "Timestamp,Action,Status,Details");
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_open_failure_is_an_error_not_a_panic() {
    let dir = TempDir::new().unwrap();
    let blocking_file = dir.path().join("not-a-directory");
    fs::write(&blocking_file, b"occupied").unwrap();

    let result = CsvAuditSink::open_in(&blocking_file, AuditAction::SendMail);
    assert!(result.is_err());
}
