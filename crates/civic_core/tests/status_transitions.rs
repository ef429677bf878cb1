use time::macros::datetime;

use civic_core::demo::seed_reports;
use civic_core::domain::{Report, ReportStatus};
use civic_core::status::{apply_transition, can_transition, StatusChange, TransitionError};

fn report_in(status: ReportStatus) -> Report {
    let mut r = seed_reports().remove(0);
    r.status = status;
    r.notes.clear();
    r.assigned_to = None;
    r.actual_resolution = None;
    r
}

#[test]
fn pending_to_in_progress_succeeds_and_assigns() {
    let mut r = report_in(ReportStatus::Pending);
    let now = datetime!(2024-03-01 08:00 UTC);
    let changed = apply_transition(
        &mut r,
        ReportStatus::InProgress,
        &StatusChange::assign("Road Crew 2"),
        now,
    )
    .expect("allowed");
    assert!(changed);
    assert_eq!(r.status, ReportStatus::InProgress);
    assert_eq!(r.updated_at, now);
    assert_eq!(r.assigned_to.as_deref(), Some("Road Crew 2"));
    assert_eq!(r.notes, vec!["Status changed from Pending to In Progress"]);
}

#[test]
fn pending_to_resolved_is_rejected_with_pair() {
    let mut r = report_in(ReportStatus::Pending);
    let before = r.clone();
    let err = apply_transition(
        &mut r,
        ReportStatus::Resolved,
        &StatusChange::default(),
        datetime!(2024-03-01 08:00 UTC),
    )
    .unwrap_err();
    assert_eq!(
        err,
        TransitionError {
            from: ReportStatus::Pending,
            to: ReportStatus::Resolved
        }
    );
    assert_eq!(r, before);
}

#[test]
fn reopen_keeps_actual_resolution() {
    let mut r = report_in(ReportStatus::InProgress);
    let resolved_at = datetime!(2024-03-01 08:00 UTC);
    apply_transition(&mut r, ReportStatus::Resolved, &StatusChange::default(), resolved_at)
        .unwrap();
    assert_eq!(r.actual_resolution, Some(resolved_at));

    let reopened_at = datetime!(2024-03-02 08:00 UTC);
    let changed = apply_transition(
        &mut r,
        ReportStatus::Pending,
        &StatusChange::default().with_note("issue returned"),
        reopened_at,
    )
    .expect("reopen allowed");
    assert!(changed);
    assert_eq!(r.status, ReportStatus::Pending);
    assert_eq!(r.actual_resolution, Some(resolved_at));
    assert_eq!(
        r.notes.last().map(String::as_str),
        Some("Status changed from Resolved to Pending: issue returned")
    );
}

#[test]
fn self_transition_is_noop_for_every_status() {
    for status in ReportStatus::ALL {
        let mut r = report_in(status);
        let before = r.clone();
        let changed = apply_transition(
            &mut r,
            status,
            &StatusChange::assign("ignored"),
            datetime!(2024-03-01 08:00 UTC),
        )
        .expect("self transition");
        assert!(!changed);
        assert_eq!(r, before);
    }
}

#[test]
fn rejected_has_no_way_out_and_resolved_only_reopens() {
    for to in ReportStatus::ALL {
        if to != ReportStatus::Rejected {
            assert!(!can_transition(ReportStatus::Rejected, to));
        }
    }
    assert!(can_transition(ReportStatus::Resolved, ReportStatus::Pending));
    assert!(!can_transition(ReportStatus::Resolved, ReportStatus::InProgress));
    assert!(!can_transition(ReportStatus::Resolved, ReportStatus::Rejected));
}

#[test]
fn assignment_only_applies_when_entering_in_progress() {
    let mut r = report_in(ReportStatus::Pending);
    apply_transition(
        &mut r,
        ReportStatus::Rejected,
        &StatusChange::assign("Team X"),
        datetime!(2024-03-01 08:00 UTC),
    )
    .unwrap();
    assert_eq!(r.assigned_to, None);
}
