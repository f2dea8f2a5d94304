//! Database entity definitions (row mappings).

pub mod help_request;
pub mod notification;
pub mod user;

pub use help_request::{HelpRequestEntity, HelpRequestStatusDb, HelpTypeDb, UrgencyDb};
pub use notification::{NotificationEntity, NotificationPriorityDb, NotificationTypeDb};
pub use user::{UserEntity, UserRoleDb};
