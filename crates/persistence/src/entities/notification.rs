//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::notification::{NotificationPriority, NotificationType};

/// Database enum for notification type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
pub enum NotificationTypeDb {
    StatusUpdate,
    Announcement,
}

impl From<NotificationType> for NotificationTypeDb {
    fn from(notification_type: NotificationType) -> Self {
        match notification_type {
            NotificationType::StatusUpdate => NotificationTypeDb::StatusUpdate,
            NotificationType::Announcement => NotificationTypeDb::Announcement,
        }
    }
}

impl From<NotificationTypeDb> for NotificationType {
    fn from(notification_type: NotificationTypeDb) -> Self {
        match notification_type {
            NotificationTypeDb::StatusUpdate => NotificationType::StatusUpdate,
            NotificationTypeDb::Announcement => NotificationType::Announcement,
        }
    }
}

/// Database enum for notification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_priority", rename_all = "lowercase")]
pub enum NotificationPriorityDb {
    Low,
    Medium,
    High,
    Urgent,
}

impl From<NotificationPriority> for NotificationPriorityDb {
    fn from(priority: NotificationPriority) -> Self {
        match priority {
            NotificationPriority::Low => NotificationPriorityDb::Low,
            NotificationPriority::Medium => NotificationPriorityDb::Medium,
            NotificationPriority::High => NotificationPriorityDb::High,
            NotificationPriority::Urgent => NotificationPriorityDb::Urgent,
        }
    }
}

impl From<NotificationPriorityDb> for NotificationPriority {
    fn from(priority: NotificationPriorityDb) -> Self {
        match priority {
            NotificationPriorityDb::Low => NotificationPriority::Low,
            NotificationPriorityDb::Medium => NotificationPriority::Medium,
            NotificationPriorityDb::High => NotificationPriority::High,
            NotificationPriorityDb::Urgent => NotificationPriority::Urgent,
        }
    }
}

/// Database row mapping for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_email: String,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationTypeDb,
    pub priority: NotificationPriorityDb,
    pub request_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_conversion_roundtrip() {
        for priority in [
            NotificationPriority::Low,
            NotificationPriority::Medium,
            NotificationPriority::High,
            NotificationPriority::Urgent,
        ] {
            let db: NotificationPriorityDb = priority.into();
            let back: NotificationPriority = db.into();
            assert_eq!(back, priority);
        }
    }
}
