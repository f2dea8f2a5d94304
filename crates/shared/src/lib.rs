//! Shared utilities and common types for the Local Aid backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Field-level validation rules (password, phone, name, role)
//! - Freeform text sanitization
//! - Password hashing with Argon2id
//! - JWT token utilities

pub mod jwt;
pub mod password;
pub mod sanitize;
pub mod validation;
