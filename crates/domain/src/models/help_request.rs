//! Help request domain models and request/response DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_name, validate_phone};

/// Category of assistance being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpType {
    Transport,
    Shopping,
    Companionship,
    Household,
    Meals,
    Medical,
    Tech,
    Other,
}

impl std::fmt::Display for HelpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HelpType::Transport => write!(f, "transport"),
            HelpType::Shopping => write!(f, "shopping"),
            HelpType::Companionship => write!(f, "companionship"),
            HelpType::Household => write!(f, "household"),
            HelpType::Meals => write!(f, "meals"),
            HelpType::Medical => write!(f, "medical"),
            HelpType::Tech => write!(f, "tech"),
            HelpType::Other => write!(f, "other"),
        }
    }
}

/// How urgent the request is. Drives notification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Normal,
    High,
    Urgent,
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Normal
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Low => write!(f, "low"),
            Urgency::Normal => write!(f, "normal"),
            Urgency::High => write!(f, "high"),
            Urgency::Urgent => write!(f, "urgent"),
        }
    }
}

/// Lifecycle status of a help request.
///
/// Legal movements between states are owned by
/// [`crate::services::lifecycle`]; nothing else writes this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HelpRequestStatus {
    Pending,
    Approved,
    Rejected,
    Matched,
    InProgress,
    Completed,
    Cancelled,
}

impl HelpRequestStatus {
    /// All statuses, in lifecycle order. Useful for exhaustive checks.
    pub const ALL: [HelpRequestStatus; 7] = [
        HelpRequestStatus::Pending,
        HelpRequestStatus::Approved,
        HelpRequestStatus::Rejected,
        HelpRequestStatus::Matched,
        HelpRequestStatus::InProgress,
        HelpRequestStatus::Completed,
        HelpRequestStatus::Cancelled,
    ];
}

impl std::fmt::Display for HelpRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HelpRequestStatus::Pending => write!(f, "pending"),
            HelpRequestStatus::Approved => write!(f, "approved"),
            HelpRequestStatus::Rejected => write!(f, "rejected"),
            HelpRequestStatus::Matched => write!(f, "matched"),
            HelpRequestStatus::InProgress => write!(f, "in-progress"),
            HelpRequestStatus::Completed => write!(f, "completed"),
            HelpRequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for HelpRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(HelpRequestStatus::Pending),
            "approved" => Ok(HelpRequestStatus::Approved),
            "rejected" => Ok(HelpRequestStatus::Rejected),
            "matched" => Ok(HelpRequestStatus::Matched),
            "in-progress" => Ok(HelpRequestStatus::InProgress),
            "completed" => Ok(HelpRequestStatus::Completed),
            "cancelled" => Ok(HelpRequestStatus::Cancelled),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

/// Request to create a help request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHelpRequestRequest {
    #[validate(custom(function = "validate_name"))]
    pub full_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(length(min = 1, max = 200, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "Suburb is required"))]
    pub suburb: String,

    #[validate(length(min = 1, max = 50, message = "State is required"))]
    pub state: String,

    #[validate(length(min = 4, max = 4, message = "Postcode must be 4 digits"))]
    pub postcode: String,

    pub help_type: HelpType,

    #[serde(default)]
    pub urgency: Urgency,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,

    #[serde(default)]
    pub preferred_time: Option<String>,
}

/// Generic update for a help request.
///
/// Deliberately has no `status` field: status changes go through the
/// dedicated transition endpoint only.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHelpRequestRequest {
    /// Confirmation email, required for non-admin callers.
    #[serde(default)]
    pub confirm_email: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub full_name: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Address cannot be empty"))]
    pub address: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Suburb cannot be empty"))]
    pub suburb: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "State cannot be empty"))]
    pub state: Option<String>,

    #[serde(default)]
    #[validate(length(min = 4, max = 4, message = "Postcode must be 4 digits"))]
    pub postcode: Option<String>,

    #[serde(default)]
    pub help_type: Option<HelpType>,

    #[serde(default)]
    pub urgency: Option<Urgency>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,

    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,

    #[serde(default)]
    pub preferred_time: Option<String>,
}

/// Request body for deleting a help request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteHelpRequestRequest {
    /// Confirmation email, required for non-admin callers.
    #[serde(default)]
    pub confirm_email: Option<String>,
}

/// Request to transition a help request's status.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHelpRequestStatusRequest {
    pub status: HelpRequestStatus,

    /// Confirmation email, required when an anonymous owner cancels.
    #[serde(default)]
    pub confirm_email: Option<String>,

    /// Volunteer to assign when an admin matches a request on a
    /// volunteer's behalf. Ignored for every other transition; a
    /// volunteer claiming a request is always assigned themselves.
    #[serde(default)]
    pub volunteer_id: Option<Uuid>,
}

/// Full help request shape, visible to the owner and admins.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequestResponse {
    pub id: Uuid,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    pub status: HelpRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volunteer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reduced public projection for the community opportunities board.
///
/// Carries no contact fields: no phone, address or email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: Uuid,
    pub help_type: HelpType,
    pub urgency: Urgency,
    pub status: HelpRequestStatus,
    pub suburb: String,
    pub state: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for listing help requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListHelpRequestsQuery {
    #[serde(default)]
    pub status: Option<String>,
    /// `events` selects the reduced public projection.
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// Pagination info for list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// Response for listing help requests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListHelpRequestsResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
