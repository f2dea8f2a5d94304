//! Domain layer for the Local Aid backend.
//!
//! This crate contains:
//! - Domain models (HelpRequest, Notification, User)
//! - Business logic services (authorization gate, request lifecycle,
//!   notification fan-out)
//! - Domain error types

pub mod models;
pub mod services;
