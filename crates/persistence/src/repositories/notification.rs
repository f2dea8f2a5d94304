//! Notification repository.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::notification::NotificationPriority;
use domain::services::fanout::NewNotification;

use crate::entities::{NotificationEntity, NotificationPriorityDb, NotificationTypeDb};
use crate::metrics::QueryTimer;

/// Repository for notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewNotification) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_notification");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications
                (user_email, title, message, notification_type, priority, request_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.user_email)
        .bind(&new.title)
        .bind(&new.message)
        .bind(NotificationTypeDb::from(new.notification_type))
        .bind(NotificationPriorityDb::from(new.priority))
        .bind(new.request_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List notifications for a user, newest first.
    pub async fn list_for_email(
        &self,
        email: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT * FROM notifications
            WHERE LOWER(user_email) = LOWER($1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(email)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn unread_count(&self, email: &str) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_unread_notifications");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE LOWER(user_email) = LOWER($1) AND read = FALSE",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a notification read. Scoped to the owning email so a user
    /// cannot flip someone else's notification by guessing its id.
    pub async fn mark_read(
        &self,
        id: Uuid,
        email: &str,
    ) -> Result<Option<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_read");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1 AND LOWER(user_email) = LOWER($2)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert one announcement row per active user. Returns the number
    /// of recipients.
    pub async fn broadcast_announcement(
        &self,
        title: &str,
        message: &str,
        priority: NotificationPriority,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("broadcast_announcement");
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_email, title, message, notification_type, priority)
            SELECT LOWER(email), $1, $2, 'announcement', $3
            FROM users
            WHERE is_active = TRUE
            "#,
        )
        .bind(title)
        .bind(message)
        .bind(NotificationPriorityDb::from(priority))
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
