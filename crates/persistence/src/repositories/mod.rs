//! Repository implementations for database access.

pub mod help_request;
pub mod notification;
pub mod user;

pub use help_request::{HelpRequestChanges, HelpRequestRepository, NewHelpRequest};
pub use notification::NotificationRepository;
pub use user::{NewUser, UserRepository};
