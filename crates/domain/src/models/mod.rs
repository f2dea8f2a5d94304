//! Domain model definitions.

pub mod help_request;
pub mod notification;
pub mod user;

pub use help_request::{
    CreateHelpRequestRequest, DeleteHelpRequestRequest, EventSummary, HelpRequestResponse,
    HelpRequestStatus, HelpType, ListHelpRequestsQuery, ListHelpRequestsResponse, Pagination,
    UpdateHelpRequestRequest, UpdateHelpRequestStatusRequest, Urgency,
};
pub use notification::{
    CreateAnnouncementRequest, NotificationPriority, NotificationResponse, NotificationType,
    UnreadCountResponse,
};
pub use user::{LoginRequest, RegisterRequest, UserResponse, UserRole};
