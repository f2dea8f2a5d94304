//! Help request entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::help_request::{HelpRequestStatus, HelpType, Urgency};

/// Database enum for help request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "help_request_status", rename_all = "kebab-case")]
pub enum HelpRequestStatusDb {
    Pending,
    Approved,
    Rejected,
    Matched,
    InProgress,
    Completed,
    Cancelled,
}

impl From<HelpRequestStatus> for HelpRequestStatusDb {
    fn from(status: HelpRequestStatus) -> Self {
        match status {
            HelpRequestStatus::Pending => HelpRequestStatusDb::Pending,
            HelpRequestStatus::Approved => HelpRequestStatusDb::Approved,
            HelpRequestStatus::Rejected => HelpRequestStatusDb::Rejected,
            HelpRequestStatus::Matched => HelpRequestStatusDb::Matched,
            HelpRequestStatus::InProgress => HelpRequestStatusDb::InProgress,
            HelpRequestStatus::Completed => HelpRequestStatusDb::Completed,
            HelpRequestStatus::Cancelled => HelpRequestStatusDb::Cancelled,
        }
    }
}

impl From<HelpRequestStatusDb> for HelpRequestStatus {
    fn from(status: HelpRequestStatusDb) -> Self {
        match status {
            HelpRequestStatusDb::Pending => HelpRequestStatus::Pending,
            HelpRequestStatusDb::Approved => HelpRequestStatus::Approved,
            HelpRequestStatusDb::Rejected => HelpRequestStatus::Rejected,
            HelpRequestStatusDb::Matched => HelpRequestStatus::Matched,
            HelpRequestStatusDb::InProgress => HelpRequestStatus::InProgress,
            HelpRequestStatusDb::Completed => HelpRequestStatus::Completed,
            HelpRequestStatusDb::Cancelled => HelpRequestStatus::Cancelled,
        }
    }
}

/// Database enum for help type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "help_type", rename_all = "lowercase")]
pub enum HelpTypeDb {
    Transport,
    Shopping,
    Companionship,
    Household,
    Meals,
    Medical,
    Tech,
    Other,
}

impl From<HelpType> for HelpTypeDb {
    fn from(help_type: HelpType) -> Self {
        match help_type {
            HelpType::Transport => HelpTypeDb::Transport,
            HelpType::Shopping => HelpTypeDb::Shopping,
            HelpType::Companionship => HelpTypeDb::Companionship,
            HelpType::Household => HelpTypeDb::Household,
            HelpType::Meals => HelpTypeDb::Meals,
            HelpType::Medical => HelpTypeDb::Medical,
            HelpType::Tech => HelpTypeDb::Tech,
            HelpType::Other => HelpTypeDb::Other,
        }
    }
}

impl From<HelpTypeDb> for HelpType {
    fn from(help_type: HelpTypeDb) -> Self {
        match help_type {
            HelpTypeDb::Transport => HelpType::Transport,
            HelpTypeDb::Shopping => HelpType::Shopping,
            HelpTypeDb::Companionship => HelpType::Companionship,
            HelpTypeDb::Household => HelpType::Household,
            HelpTypeDb::Meals => HelpType::Meals,
            HelpTypeDb::Medical => HelpType::Medical,
            HelpTypeDb::Tech => HelpType::Tech,
            HelpTypeDb::Other => HelpType::Other,
        }
    }
}

/// Database enum for urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "urgency_level", rename_all = "lowercase")]
pub enum UrgencyDb {
    Low,
    Normal,
    High,
    Urgent,
}

impl From<Urgency> for UrgencyDb {
    fn from(urgency: Urgency) -> Self {
        match urgency {
            Urgency::Low => UrgencyDb::Low,
            Urgency::Normal => UrgencyDb::Normal,
            Urgency::High => UrgencyDb::High,
            Urgency::Urgent => UrgencyDb::Urgent,
        }
    }
}

impl From<UrgencyDb> for Urgency {
    fn from(urgency: UrgencyDb) -> Self {
        match urgency {
            UrgencyDb::Low => Urgency::Low,
            UrgencyDb::Normal => Urgency::Normal,
            UrgencyDb::High => Urgency::High,
            UrgencyDb::Urgent => Urgency::Urgent,
        }
    }
}

/// Database row mapping for the help_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct HelpRequestEntity {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub suburb: String,
    pub state: String,
    pub postcode: String,
    pub help_type: HelpTypeDb,
    pub urgency: UrgencyDb,
    pub description: String,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub status: HelpRequestStatusDb,
    pub created_by: Option<Uuid>,
    pub volunteer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
