//! Report status transitions.
//!
//! Allowed moves:
//!
//! | from        | to                      |
//! |-------------|-------------------------|
//! | Pending     | InProgress, Rejected    |
//! | InProgress  | Resolved, Rejected      |
//! | Resolved    | Pending (reopen)        |
//!
//! A move to the current status is a no-op success. Resolved is not terminal: it can be
//! reopened, and reopening keeps `actual_resolution` as it was. Rejected has no outgoing
//! edge.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Report, ReportStatus};
use crate::error::{AppError, REPORT_INVALID_TRANSITION};

/// Caller-supplied extras for a status change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Applied only when entering `InProgress`.
    pub assigned_to: Option<String>,
    pub note: Option<String>,
}

impl StatusChange {
    pub fn assign(to: impl Into<String>) -> Self {
        Self {
            assigned_to: Some(to.into()),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionError {
    pub from: ReportStatus,
    pub to: ReportStatus,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot move report from {} to {}", self.from, self.to)
    }
}

impl std::error::Error for TransitionError {}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::new(REPORT_INVALID_TRANSITION, "Status transition not allowed")
            .with_details(format!("from={}; to={}", err.from, err.to))
    }
}

pub fn can_transition(from: ReportStatus, to: ReportStatus) -> bool {
    use ReportStatus::*;
    from == to
        || matches!(
            (from, to),
            (Pending, InProgress)
                | (Pending, Rejected)
                | (InProgress, Resolved)
                | (InProgress, Rejected)
                | (Resolved, Pending)
        )
}

/// Statuses reachable from `from` in one step, excluding `from` itself.
pub fn next_statuses(from: ReportStatus) -> Vec<ReportStatus> {
    ReportStatus::ALL
        .into_iter()
        .filter(|to| *to != from && can_transition(from, *to))
        .collect()
}

pub fn transition_note(from: ReportStatus, to: ReportStatus, note: Option<&str>) -> String {
    match note.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => format!("Status changed from {from} to {to}: {n}"),
        None => format!("Status changed from {from} to {to}"),
    }
}

/// Apply a status change to `report` in place.
///
/// Returns `Ok(false)` for a self-transition (report untouched) and `Ok(true)` when the
/// report was mutated. On error the report is untouched.
pub fn apply_transition(
    report: &mut Report,
    to: ReportStatus,
    change: &StatusChange,
    now: OffsetDateTime,
) -> Result<bool, TransitionError> {
    let from = report.status;
    if from == to {
        return Ok(false);
    }
    if !can_transition(from, to) {
        return Err(TransitionError { from, to });
    }

    report.status = to;
    report.updated_at = now;
    match to {
        ReportStatus::InProgress => {
            if let Some(who) = change.assigned_to.as_deref().map(str::trim) {
                if !who.is_empty() {
                    report.assigned_to = Some(who.to_string());
                }
            }
        }
        ReportStatus::Resolved => report.actual_resolution = Some(now),
        ReportStatus::Pending | ReportStatus::Rejected => {}
    }
    report
        .notes
        .push(transition_note(from, to, change.note.as_deref()));
    Ok(true)
}
