//! Help request lifecycle state machine.
//!
//! The single source of truth for which status movements are legal and
//! what side effects a movement carries. Route handlers never compare
//! statuses directly; they ask this module.
//!
//! ```text
//! pending -> approved | rejected
//! approved -> matched
//! matched -> in-progress | completed
//! in-progress -> completed
//! pending/approved/matched/in-progress -> cancelled
//! any other state -> pending   (explicit admin reset)
//! ```

use thiserror::Error;

use crate::models::help_request::{HelpRequestStatus, Urgency};
use crate::models::notification::NotificationPriority;

/// Error returned for a status movement outside the transition table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: HelpRequestStatus,
    pub to: HelpRequestStatus,
}

/// Side effects a legal transition carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEffects {
    /// Whether the owner receives a notification.
    pub notify_owner: bool,
    /// Whether the transition records the acting volunteer on the request.
    pub assign_volunteer: bool,
}

/// Returns true if the status permanently ends the lifecycle
/// (reachable again only through an explicit admin reset).
pub fn is_terminal(status: HelpRequestStatus) -> bool {
    matches!(
        status,
        HelpRequestStatus::Completed | HelpRequestStatus::Rejected | HelpRequestStatus::Cancelled
    )
}

/// Returns true if the status locks the record against owner edits and
/// deletes, protecting a volunteer's in-flight commitment.
pub fn locks_owner_changes(status: HelpRequestStatus) -> bool {
    matches!(
        status,
        HelpRequestStatus::Matched | HelpRequestStatus::InProgress | HelpRequestStatus::Completed
    )
}

/// Returns true if `from -> to` appears in the transition table.
///
/// Self-transitions are never legal; a repeated transition attempt is
/// rejected rather than silently reapplied.
pub fn is_legal_transition(from: HelpRequestStatus, to: HelpRequestStatus) -> bool {
    use HelpRequestStatus::*;

    if from == to {
        return false;
    }

    match (from, to) {
        // Explicit admin reset is the only path out of a terminal state.
        (_, Pending) => true,
        (Pending, Approved) | (Pending, Rejected) => true,
        (Approved, Matched) => true,
        (Matched, InProgress) | (Matched, Completed) => true,
        (InProgress, Completed) => true,
        (Pending, Cancelled)
        | (Approved, Cancelled)
        | (Matched, Cancelled)
        | (InProgress, Cancelled) => true,
        _ => false,
    }
}

/// Validates a transition and returns its side effects.
///
/// `admin_initiated` only affects the cancellation side effect: an owner
/// cancelling their own request does not notify themselves.
pub fn check_transition(
    from: HelpRequestStatus,
    to: HelpRequestStatus,
    admin_initiated: bool,
) -> Result<TransitionEffects, InvalidTransition> {
    use HelpRequestStatus::*;

    if !is_legal_transition(from, to) {
        return Err(InvalidTransition { from, to });
    }

    let effects = match to {
        Rejected => TransitionEffects {
            notify_owner: true,
            assign_volunteer: false,
        },
        Cancelled => TransitionEffects {
            notify_owner: admin_initiated,
            assign_volunteer: false,
        },
        Matched => TransitionEffects {
            notify_owner: true,
            assign_volunteer: true,
        },
        Completed => TransitionEffects {
            notify_owner: true,
            assign_volunteer: false,
        },
        Pending | Approved | InProgress => TransitionEffects {
            notify_owner: false,
            assign_volunteer: false,
        },
    };

    Ok(effects)
}

/// Maps a request's urgency to the priority of notifications about it.
pub fn priority_for_urgency(urgency: Urgency) -> NotificationPriority {
    match urgency {
        Urgency::Low => NotificationPriority::Low,
        Urgency::Normal => NotificationPriority::Medium,
        Urgency::High => NotificationPriority::High,
        Urgency::Urgent => NotificationPriority::Urgent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HelpRequestStatus::*;

    #[test]
    fn test_happy_path_is_legal() {
        assert!(is_legal_transition(Pending, Approved));
        assert!(is_legal_transition(Approved, Matched));
        assert!(is_legal_transition(Matched, InProgress));
        assert!(is_legal_transition(InProgress, Completed));
    }

    #[test]
    fn test_matched_can_complete_directly() {
        assert!(is_legal_transition(Matched, Completed));
    }

    #[test]
    fn test_rejection_only_from_pending() {
        assert!(is_legal_transition(Pending, Rejected));
        assert!(!is_legal_transition(Approved, Rejected));
        assert!(!is_legal_transition(Matched, Rejected));
        assert!(!is_legal_transition(Cancelled, Rejected));
    }

    #[test]
    fn test_cancel_from_non_terminal_states() {
        assert!(is_legal_transition(Pending, Cancelled));
        assert!(is_legal_transition(Approved, Cancelled));
        assert!(is_legal_transition(Matched, Cancelled));
        assert!(is_legal_transition(InProgress, Cancelled));
    }

    #[test]
    fn test_terminal_states_only_reset() {
        for terminal in [Completed, Rejected, Cancelled] {
            for target in HelpRequestStatus::ALL {
                if target == Pending {
                    assert!(is_legal_transition(terminal, target));
                } else {
                    assert!(
                        !is_legal_transition(terminal, target),
                        "{} -> {} should be illegal",
                        terminal,
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn test_reset_to_pending_from_anywhere() {
        for from in HelpRequestStatus::ALL {
            if from != Pending {
                assert!(is_legal_transition(from, Pending));
            }
        }
    }

    #[test]
    fn test_self_transitions_illegal() {
        for status in HelpRequestStatus::ALL {
            assert!(!is_legal_transition(status, status));
        }
    }

    // Exhaustive closure over the full transition table: only the listed
    // movements succeed, everything else is rejected.
    #[test]
    fn test_transition_table_closure() {
        let legal: &[(HelpRequestStatus, HelpRequestStatus)] = &[
            (Pending, Approved),
            (Pending, Rejected),
            (Pending, Cancelled),
            (Approved, Matched),
            (Approved, Cancelled),
            (Approved, Pending),
            (Rejected, Pending),
            (Matched, InProgress),
            (Matched, Completed),
            (Matched, Cancelled),
            (Matched, Pending),
            (InProgress, Completed),
            (InProgress, Cancelled),
            (InProgress, Pending),
            (Completed, Pending),
            (Cancelled, Pending),
        ];

        for from in HelpRequestStatus::ALL {
            for to in HelpRequestStatus::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    is_legal_transition(from, to),
                    expected,
                    "{} -> {} expected legal={}",
                    from,
                    to,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_check_transition_rejects_illegal() {
        let err = check_transition(Completed, Cancelled, true).unwrap_err();
        assert_eq!(err.from, Completed);
        assert_eq!(err.to, Cancelled);
    }

    #[test]
    fn test_rejected_notifies_owner() {
        let effects = check_transition(Pending, Rejected, true).unwrap();
        assert!(effects.notify_owner);
        assert!(!effects.assign_volunteer);
    }

    #[test]
    fn test_approved_does_not_notify() {
        let effects = check_transition(Pending, Approved, true).unwrap();
        assert!(!effects.notify_owner);
    }

    #[test]
    fn test_matched_assigns_volunteer_and_notifies() {
        let effects = check_transition(Approved, Matched, false).unwrap();
        assert!(effects.notify_owner);
        assert!(effects.assign_volunteer);
    }

    #[test]
    fn test_completed_notifies_owner() {
        let effects = check_transition(InProgress, Completed, true).unwrap();
        assert!(effects.notify_owner);
    }

    #[test]
    fn test_cancel_notifies_only_when_admin_initiated() {
        let admin = check_transition(Approved, Cancelled, true).unwrap();
        assert!(admin.notify_owner);

        let owner = check_transition(Approved, Cancelled, false).unwrap();
        assert!(!owner.notify_owner);
    }

    #[test]
    fn test_reset_has_no_side_effects() {
        let effects = check_transition(Rejected, Pending, true).unwrap();
        assert!(!effects.notify_owner);
        assert!(!effects.assign_volunteer);
    }

    #[test]
    fn test_is_terminal() {
        assert!(is_terminal(Completed));
        assert!(is_terminal(Rejected));
        assert!(is_terminal(Cancelled));
        assert!(!is_terminal(Pending));
        assert!(!is_terminal(Matched));
    }

    #[test]
    fn test_locks_owner_changes() {
        assert!(locks_owner_changes(Matched));
        assert!(locks_owner_changes(InProgress));
        assert!(locks_owner_changes(Completed));
        assert!(!locks_owner_changes(Pending));
        assert!(!locks_owner_changes(Approved));
        assert!(!locks_owner_changes(Rejected));
        assert!(!locks_owner_changes(Cancelled));
    }

    #[test]
    fn test_priority_for_urgency() {
        assert_eq!(priority_for_urgency(Urgency::Low), NotificationPriority::Low);
        assert_eq!(
            priority_for_urgency(Urgency::Normal),
            NotificationPriority::Medium
        );
        assert_eq!(
            priority_for_urgency(Urgency::High),
            NotificationPriority::High
        );
        assert_eq!(
            priority_for_urgency(Urgency::Urgent),
            NotificationPriority::Urgent
        );
    }
}
