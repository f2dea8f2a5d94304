//! Authorization gate for help request operations.
//!
//! Every capability decision in the system goes through [`authorize`]:
//! a pure function of the acting principal, the request's current state,
//! and the attempted operation. UI role checks are a presentation
//! convenience only; this module is the enforcement boundary.

use thiserror::Error;
use uuid::Uuid;

use crate::models::help_request::HelpRequestStatus;
use crate::models::user::UserRole;
use crate::services::lifecycle;

/// The acting identity for an authorization decision.
///
/// Always passed explicitly; never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Caller without a session. May prove ownership by supplying the
    /// request's email as a confirmation factor.
    Anonymous { email: Option<String> },
    /// Authenticated user.
    User {
        id: Uuid,
        email: String,
        role: UserRole,
    },
}

impl Principal {
    pub fn anonymous() -> Self {
        Principal::Anonymous { email: None }
    }

    pub fn anonymous_with_email(email: impl Into<String>) -> Self {
        Principal::Anonymous {
            email: Some(email.into()),
        }
    }

    /// Returns true if the principal carries the admin role.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Principal::User {
                role: UserRole::Admin,
                ..
            }
        )
    }

    /// Returns true if the principal carries the volunteer role.
    pub fn is_volunteer(&self) -> bool {
        matches!(
            self,
            Principal::User {
                role: UserRole::Volunteer,
                ..
            }
        )
    }
}

/// The slice of a help request an authorization decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct RequestState<'a> {
    /// Owner email recorded on the request (stored lowercase).
    pub owner_email: &'a str,
    /// Authenticated submitter, when the request was created logged-in.
    pub created_by: Option<Uuid>,
    pub status: HelpRequestStatus,
}

/// Operation being attempted against a help request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    View,
    Edit,
    Delete,
    /// Status transition toward the given target.
    Transition(HelpRequestStatus),
}

/// Reason an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// The principal has no rights over this request. Surfaced to
    /// clients as a not-found shape on read paths so record existence
    /// never leaks.
    #[error("Access denied")]
    Forbidden,
    /// The principal would otherwise be allowed, but the request's
    /// current status forbids the operation.
    #[error("Request status does not permit this operation")]
    PreconditionFailed,
}

/// Returns true if the principal is the request's owner, matched by
/// email (case-insensitive) or by submitter id.
pub fn is_owner(principal: &Principal, request: &RequestState<'_>) -> bool {
    match principal {
        Principal::Anonymous { email: Some(email) } => {
            email.eq_ignore_ascii_case(request.owner_email)
        }
        Principal::Anonymous { email: None } => false,
        Principal::User { id, email, .. } => {
            request.created_by == Some(*id) || email.eq_ignore_ascii_case(request.owner_email)
        }
    }
}

/// Decides whether `principal` may perform `operation` on `request`.
pub fn authorize(
    principal: &Principal,
    request: &RequestState<'_>,
    operation: Operation,
) -> Result<(), AccessDenied> {
    if principal.is_admin() {
        return Ok(());
    }

    let owner = is_owner(principal, request);
    let locked = lifecycle::locks_owner_changes(request.status);

    match operation {
        Operation::View => {
            if owner {
                Ok(())
            } else {
                Err(AccessDenied::Forbidden)
            }
        }
        Operation::Edit | Operation::Delete => {
            if !owner {
                Err(AccessDenied::Forbidden)
            } else if locked {
                Err(AccessDenied::PreconditionFailed)
            } else {
                Ok(())
            }
        }
        Operation::Transition(target) => match target {
            // Owners may withdraw their own request while their
            // edit/delete rights still hold.
            HelpRequestStatus::Cancelled if owner => {
                if locked {
                    Err(AccessDenied::PreconditionFailed)
                } else {
                    Ok(())
                }
            }
            // Volunteer self-assignment produces the matched transition.
            HelpRequestStatus::Matched
                if principal.is_volunteer()
                    && request.status == HelpRequestStatus::Approved =>
            {
                Ok(())
            }
            _ => Err(AccessDenied::Forbidden),
        },
    }
}

/// Convenience wrapper exposing the gate as a plain capability check.
pub fn can_perform(
    principal: &Principal,
    request: &RequestState<'_>,
    operation: Operation,
) -> bool {
    authorize(principal, request, operation).is_ok()
}

/// Checks the confirmation email supplied with a non-admin edit/delete.
///
/// A deliberate second factor beyond token possession, since many
/// requests are submitted without an account.
pub fn confirmation_matches(owner_email: &str, supplied: Option<&str>) -> bool {
    supplied
        .map(|email| email.trim().eq_ignore_ascii_case(owner_email))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER_EMAIL: &str = "a@x.com";

    fn request(status: HelpRequestStatus) -> RequestState<'static> {
        RequestState {
            owner_email: OWNER_EMAIL,
            created_by: None,
            status,
        }
    }

    fn admin() -> Principal {
        Principal::User {
            id: Uuid::new_v4(),
            email: "admin@localaid.org".to_string(),
            role: UserRole::Admin,
        }
    }

    fn volunteer() -> Principal {
        Principal::User {
            id: Uuid::new_v4(),
            email: "vol@localaid.org".to_string(),
            role: UserRole::Volunteer,
        }
    }

    fn owner() -> Principal {
        Principal::anonymous_with_email(OWNER_EMAIL)
    }

    fn stranger() -> Principal {
        Principal::anonymous_with_email("b@y.com")
    }

    #[test]
    fn test_admin_can_do_everything() {
        for status in HelpRequestStatus::ALL {
            let req = request(status);
            for op in [
                Operation::View,
                Operation::Edit,
                Operation::Delete,
                Operation::Transition(HelpRequestStatus::Pending),
            ] {
                assert!(can_perform(&admin(), &req, op));
            }
        }
    }

    #[test]
    fn test_owner_can_view() {
        assert!(can_perform(
            &owner(),
            &request(HelpRequestStatus::Pending),
            Operation::View
        ));
    }

    #[test]
    fn test_owner_email_match_is_case_insensitive() {
        let principal = Principal::anonymous_with_email("A@X.COM");
        assert!(can_perform(
            &principal,
            &request(HelpRequestStatus::Pending),
            Operation::View
        ));
    }

    #[test]
    fn test_owner_by_user_id() {
        let user_id = Uuid::new_v4();
        let principal = Principal::User {
            id: user_id,
            email: "other@mail.com".to_string(),
            role: UserRole::User,
        };
        let req = RequestState {
            owner_email: OWNER_EMAIL,
            created_by: Some(user_id),
            status: HelpRequestStatus::Pending,
        };
        assert!(can_perform(&principal, &req, Operation::View));
        assert!(can_perform(&principal, &req, Operation::Edit));
    }

    #[test]
    fn test_stranger_cannot_view() {
        assert_eq!(
            authorize(&stranger(), &request(HelpRequestStatus::Pending), Operation::View),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_unauthenticated_cannot_view() {
        assert_eq!(
            authorize(
                &Principal::anonymous(),
                &request(HelpRequestStatus::Pending),
                Operation::View
            ),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_owner_edit_allowed_before_commitment() {
        for status in [
            HelpRequestStatus::Pending,
            HelpRequestStatus::Approved,
            HelpRequestStatus::Rejected,
            HelpRequestStatus::Cancelled,
        ] {
            assert!(can_perform(&owner(), &request(status), Operation::Edit));
            assert!(can_perform(&owner(), &request(status), Operation::Delete));
        }
    }

    #[test]
    fn test_owner_locked_out_after_commitment() {
        for status in [
            HelpRequestStatus::Matched,
            HelpRequestStatus::InProgress,
            HelpRequestStatus::Completed,
        ] {
            assert_eq!(
                authorize(&owner(), &request(status), Operation::Edit),
                Err(AccessDenied::PreconditionFailed)
            );
            assert_eq!(
                authorize(&owner(), &request(status), Operation::Delete),
                Err(AccessDenied::PreconditionFailed)
            );
        }
    }

    #[test]
    fn test_admin_can_delete_matched_request() {
        assert!(can_perform(
            &admin(),
            &request(HelpRequestStatus::Matched),
            Operation::Delete
        ));
    }

    #[test]
    fn test_owner_may_cancel_while_unlocked() {
        assert!(can_perform(
            &owner(),
            &request(HelpRequestStatus::Pending),
            Operation::Transition(HelpRequestStatus::Cancelled)
        ));
        assert!(can_perform(
            &owner(),
            &request(HelpRequestStatus::Approved),
            Operation::Transition(HelpRequestStatus::Cancelled)
        ));
    }

    #[test]
    fn test_owner_cannot_cancel_after_match() {
        assert_eq!(
            authorize(
                &owner(),
                &request(HelpRequestStatus::Matched),
                Operation::Transition(HelpRequestStatus::Cancelled)
            ),
            Err(AccessDenied::PreconditionFailed)
        );
    }

    #[test]
    fn test_owner_cannot_approve_own_request() {
        assert_eq!(
            authorize(
                &owner(),
                &request(HelpRequestStatus::Pending),
                Operation::Transition(HelpRequestStatus::Approved)
            ),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_volunteer_may_self_assign_approved_request() {
        assert!(can_perform(
            &volunteer(),
            &request(HelpRequestStatus::Approved),
            Operation::Transition(HelpRequestStatus::Matched)
        ));
    }

    #[test]
    fn test_volunteer_cannot_match_pending_request() {
        assert_eq!(
            authorize(
                &volunteer(),
                &request(HelpRequestStatus::Pending),
                Operation::Transition(HelpRequestStatus::Matched)
            ),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_volunteer_cannot_complete() {
        assert_eq!(
            authorize(
                &volunteer(),
                &request(HelpRequestStatus::InProgress),
                Operation::Transition(HelpRequestStatus::Completed)
            ),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_plain_user_cannot_transition_others_requests() {
        let user = Principal::User {
            id: Uuid::new_v4(),
            email: "someone@mail.com".to_string(),
            role: UserRole::User,
        };
        assert_eq!(
            authorize(
                &user,
                &request(HelpRequestStatus::Approved),
                Operation::Transition(HelpRequestStatus::Matched)
            ),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_confirmation_matches() {
        assert!(confirmation_matches(OWNER_EMAIL, Some("a@x.com")));
        assert!(confirmation_matches(OWNER_EMAIL, Some("A@X.Com")));
        assert!(confirmation_matches(OWNER_EMAIL, Some("  a@x.com ")));
        assert!(!confirmation_matches(OWNER_EMAIL, Some("b@y.com")));
        assert!(!confirmation_matches(OWNER_EMAIL, None));
    }
}
