//! Audit actions and their per-action column sets

use std::fmt;

/// Remote mailbox actions recorded in the audit trail
///
/// Each known action has a fixed column set; [`AuditAction::Other`]
/// covers future actions with a generic schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditAction {
    /// Calendar event listing
    ListEvents,
    /// Mail sending
    SendMail,
    /// Meeting invite creation
    CreateInvite,
    /// Inbox listing
    ListInbox,
    /// Free/busy availability check
    FreeBusy,
    /// Any action without a dedicated schema
    Other(String),
}

impl AuditAction {
    /// Header columns for this action's audit rows
    ///
    /// The leading `Timestamp` column is shared by every action and is
    /// filled in by the sink, not the caller.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::ListEvents => &[
                "Timestamp",
                "Subject",
                "Organizer",
                "Start",
                "End",
                "Location",
            ],
            Self::SendMail => &["Timestamp", "To", "Subject", "Status", "Details"],
            Self::CreateInvite => &[
                "Timestamp",
                "Subject",
                "Attendees",
                "Start",
                "End",
                "Status",
            ],
            Self::ListInbox => &["Timestamp", "From", "Subject", "Received", "Status"],
            Self::FreeBusy => &[
                "Timestamp",
                "Attendee",
                "WindowStart",
                "WindowEnd",
                "Availability",
            ],
            Self::Other(_) => &["Timestamp", "Action", "Status", "Details"],
        }
    }

    /// File-name slug for the per-day audit file
    pub fn slug(&self) -> String {
        match self {
            Self::ListEvents => "list-events".to_string(),
            Self::SendMail => "send-mail".to_string(),
            Self::CreateInvite => "create-invite".to_string(),
            Self::ListInbox => "list-inbox".to_string(),
            Self::FreeBusy => "free-busy".to_string(),
            Self::Other(name) => name
                .trim()
                .to_ascii_lowercase()
                .replace(|c: char| !c.is_ascii_alphanumeric(), "-"),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
