//! # API Shared
//!
//! Shared definitions for the survey APIs.
//!
//! Contains:
//! - Wire types (`wire` module) for answer sets and session/submit/health responses
//! - Shared services like `HealthService`
//!
//! Used by `survey-core` (answer sets are the wizard's inputs) and `api-rest` (request and
//! response bodies, OpenAPI schemas).

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
