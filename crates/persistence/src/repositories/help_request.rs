//! Help request repository.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::help_request::{HelpRequestStatus, HelpType, Urgency};
use domain::services::fanout::NewNotification;

use crate::entities::{HelpRequestEntity, HelpRequestStatusDb, HelpTypeDb, UrgencyDb};
use crate::metrics::QueryTimer;

/// Insert payload for a new help request. Fields arrive already
/// sanitized and with the email lowercased.
#[derive(Debug, Clone)]
pub struct NewHelpRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub suburb: String,
    pub state: String,
    pub postcode: String,
    pub help_type: HelpType,
    pub urgency: Urgency,
    pub description: String,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub created_by: Option<Uuid>,
}

/// Partial update payload. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct HelpRequestChanges {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub help_type: Option<HelpType>,
    pub urgency: Option<Urgency>,
    pub description: Option<String>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
}

/// Repository for help request database operations.
#[derive(Clone)]
pub struct HelpRequestRepository {
    pool: PgPool,
}

impl HelpRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new help request. New requests always start pending.
    pub async fn create(&self, new: NewHelpRequest) -> Result<HelpRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_help_request");
        let result = sqlx::query_as::<_, HelpRequestEntity>(
            r#"
            INSERT INTO help_requests (
                full_name, email, phone, address, suburb, state, postcode,
                help_type, urgency, description, preferred_date, preferred_time,
                status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'pending', $13)
            RETURNING *
            "#,
        )
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(&new.suburb)
        .bind(&new.state)
        .bind(&new.postcode)
        .bind(HelpTypeDb::from(new.help_type))
        .bind(UrgencyDb::from(new.urgency))
        .bind(&new.description)
        .bind(new.preferred_date)
        .bind(&new.preferred_time)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<HelpRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_help_request_by_id");
        let result = sqlx::query_as::<_, HelpRequestEntity>(
            "SELECT * FROM help_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all requests, optionally filtered by status. Admin view.
    pub async fn list_all(
        &self,
        status: Option<HelpRequestStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HelpRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_help_requests");
        let result = sqlx::query_as::<_, HelpRequestEntity>(
            r#"
            SELECT * FROM help_requests
            WHERE ($1::help_request_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status.map(HelpRequestStatusDb::from))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_all(
        &self,
        status: Option<HelpRequestStatus>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_help_requests");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM help_requests
            WHERE ($1::help_request_status IS NULL OR status = $1)
            "#,
        )
        .bind(status.map(HelpRequestStatusDb::from))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List requests belonging to an owner, matched by email or by the
    /// account that created them.
    pub async fn list_for_owner(
        &self,
        email: &str,
        user_id: Option<Uuid>,
        status: Option<HelpRequestStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HelpRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_help_requests_for_owner");
        let result = sqlx::query_as::<_, HelpRequestEntity>(
            r#"
            SELECT * FROM help_requests
            WHERE (LOWER(email) = LOWER($1) OR ($2::uuid IS NOT NULL AND created_by = $2))
              AND ($3::help_request_status IS NULL OR status = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(email)
        .bind(user_id)
        .bind(status.map(HelpRequestStatusDb::from))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count_for_owner(
        &self,
        email: &str,
        user_id: Option<Uuid>,
        status: Option<HelpRequestStatus>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_help_requests_for_owner");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM help_requests
            WHERE (LOWER(email) = LOWER($1) OR ($2::uuid IS NOT NULL AND created_by = $2))
              AND ($3::help_request_status IS NULL OR status = $3)
            "#,
        )
        .bind(email)
        .bind(user_id)
        .bind(status.map(HelpRequestStatusDb::from))
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Apply a partial update. `None` fields keep their stored value.
    pub async fn update_fields(
        &self,
        id: Uuid,
        changes: HelpRequestChanges,
    ) -> Result<Option<HelpRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_help_request");
        let result = sqlx::query_as::<_, HelpRequestEntity>(
            r#"
            UPDATE help_requests SET
                full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                suburb = COALESCE($5, suburb),
                state = COALESCE($6, state),
                postcode = COALESCE($7, postcode),
                help_type = COALESCE($8, help_type),
                urgency = COALESCE($9, urgency),
                description = COALESCE($10, description),
                preferred_date = COALESCE($11, preferred_date),
                preferred_time = COALESCE($12, preferred_time),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.full_name)
        .bind(&changes.phone)
        .bind(&changes.address)
        .bind(&changes.suburb)
        .bind(&changes.state)
        .bind(&changes.postcode)
        .bind(changes.help_type.map(HelpTypeDb::from))
        .bind(changes.urgency.map(UrgencyDb::from))
        .bind(&changes.description)
        .bind(changes.preferred_date)
        .bind(&changes.preferred_time)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a help request. Returns true if a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_help_request");
        let result = sqlx::query("DELETE FROM help_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Move a request from `from` to `to` atomically.
    ///
    /// The UPDATE only matches while the stored status still equals
    /// `from`, so a concurrent transition that lands first makes this
    /// one return `None` instead of overwriting it. When a notification
    /// is supplied it is inserted in the same transaction, so the owner
    /// is never notified about a transition that did not commit.
    pub async fn transition_status(
        &self,
        id: Uuid,
        from: HelpRequestStatus,
        to: HelpRequestStatus,
        volunteer_id: Option<Uuid>,
        notification: Option<NewNotification>,
    ) -> Result<Option<HelpRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("transition_help_request_status");

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, HelpRequestEntity>(
            r#"
            UPDATE help_requests
            SET status = $3,
                volunteer_id = COALESCE($4, volunteer_id),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(HelpRequestStatusDb::from(from))
        .bind(HelpRequestStatusDb::from(to))
        .bind(volunteer_id)
        .fetch_optional(&mut *tx)
        .await?;

        match updated {
            Some(entity) => {
                if let Some(n) = notification {
                    sqlx::query(
                        r#"
                        INSERT INTO notifications
                            (user_email, title, message, notification_type, priority, request_id)
                        VALUES ($1, $2, $3, $4, $5, $6)
                        "#,
                    )
                    .bind(&n.user_email)
                    .bind(&n.title)
                    .bind(&n.message)
                    .bind(crate::entities::NotificationTypeDb::from(n.notification_type))
                    .bind(crate::entities::NotificationPriorityDb::from(n.priority))
                    .bind(n.request_id)
                    .execute(&mut *tx)
                    .await?;
                }
                tx.commit().await?;
                timer.record();
                Ok(Some(entity))
            }
            None => {
                // Lost the race (or the id does not exist). Nothing to
                // commit; caller re-reads to tell the two apart.
                tx.rollback().await?;
                timer.record();
                Ok(None)
            }
        }
    }
}
