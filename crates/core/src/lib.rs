//! # Survey Core
//!
//! Core logic for the diabetes health survey.
//!
//! This crate contains pure data operations:
//! - The question schema and completed [`SurveyRecord`]s
//! - The two-page wizard state machine, kept per session in a [`SessionRegistry`]
//! - The CSV response store ([`CsvStore`])
//!
//! **No API concerns**: HTTP routing, HTML rendering and OpenAPI documents belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod questions;
pub mod record;
pub mod session;
pub mod store;
pub mod survey;
pub mod wizard;

// Wire types shared with the API crates.
pub use api_shared::wire;

pub use config::CoreConfig;
pub use constants::{DEFAULT_CSV_PATH, DEFAULT_SESSION_TTL_SECS, SUBMIT_SUCCESS_MESSAGE};
pub use error::{SurveyError, SurveyResult};
pub use questions::{AnswerSet, FieldSpec};
pub use record::SurveyRecord;
pub use session::SessionRegistry;
pub use store::{CsvStore, StoreReport, StoreTable};
pub use survey::SurveyService;
pub use survey_uuid::SessionId;
pub use wizard::WizardState;
