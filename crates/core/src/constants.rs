//! Constants used throughout the survey core crate.

/// Default store file, relative to the working directory.
pub const DEFAULT_CSV_PATH: &str = "diabetes_survey_responses.csv";

/// Default idle lifetime of a survey session, in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Acknowledgement shown after Section 2 has been stored.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "🎉 Thank you for completing the survey!";

/// Suffix of the sibling file the store is rewritten into before being renamed into place.
pub const STORE_TEMP_SUFFIX: &str = ".tmp";
