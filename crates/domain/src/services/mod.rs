//! Business logic services.

pub mod authorization;
pub mod fanout;
pub mod lifecycle;
