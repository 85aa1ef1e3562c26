//! Session identifier utilities.
//!
//! Every survey session is keyed by a *canonical* UUID: **32 lowercase hexadecimal characters**
//! (no hyphens). The identifier travels in URLs (`/survey/<id>`) and JSON bodies, so it must have
//! exactly one textual form.
//!
//! This crate provides [`SessionId`], a wrapper type that *guarantees* the canonical format once
//! constructed.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! Notes:
//! - This is the same value you would get from `Uuid::new_v4().simple().to_string()`.
//! - Canonical form is *required* for externally supplied identifiers (path segments, request
//!   bodies). Use [`SessionId::parse`] to validate an input string.
//! - Non-canonical values (uppercase, hyphenated, wrong length, non-hex) are rejected.

mod service;

pub use service::SessionId;

/// Error type for session identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for session identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
