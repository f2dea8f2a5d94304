//! Notification fan-out for lifecycle events.
//!
//! Translates a qualifying status transition into exactly one
//! notification for the request's owner. The persistence layer writes
//! the record inside the same transaction as the status change, so the
//! transition is the idempotency boundary: a retried transition is
//! rejected by the state machine rather than duplicating a signal.

use uuid::Uuid;

use crate::models::help_request::{HelpRequestStatus, HelpType, Urgency};
use crate::models::notification::{NotificationPriority, NotificationType};
use crate::services::lifecycle::priority_for_urgency;

/// A notification ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_email: String,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub request_id: Option<Uuid>,
}

/// Builds the owner notification for a status transition.
pub fn status_notification(
    request_id: Uuid,
    owner_email: &str,
    help_type: HelpType,
    urgency: Urgency,
    new_status: HelpRequestStatus,
) -> NewNotification {
    let (title, message) = match new_status {
        HelpRequestStatus::Rejected => (
            "Request not approved".to_string(),
            format!(
                "Unfortunately your {} request could not be approved. \
                 You can update and resubmit it at any time.",
                help_type
            ),
        ),
        HelpRequestStatus::Matched => (
            "A volunteer is on the way".to_string(),
            format!(
                "Good news - a volunteer has taken on your {} request.",
                help_type
            ),
        ),
        HelpRequestStatus::Completed => (
            "Request completed".to_string(),
            format!("Your {} request has been marked as completed.", help_type),
        ),
        HelpRequestStatus::Cancelled => (
            "Request cancelled".to_string(),
            format!("Your {} request was cancelled by an administrator.", help_type),
        ),
        other => (
            "Request update".to_string(),
            format!("Your {} request is now {}.", help_type, other),
        ),
    };

    NewNotification {
        user_email: owner_email.to_lowercase(),
        title,
        message,
        notification_type: NotificationType::StatusUpdate,
        priority: priority_for_urgency(urgency),
        request_id: Some(request_id),
    }
}

/// Builds an admin broadcast announcement for one recipient.
pub fn announcement_notification(
    recipient_email: &str,
    title: &str,
    message: &str,
    priority: NotificationPriority,
) -> NewNotification {
    NewNotification {
        user_email: recipient_email.to_lowercase(),
        title: title.to_string(),
        message: message.to_string(),
        notification_type: NotificationType::Announcement,
        priority,
        request_id: None,
    }
}
