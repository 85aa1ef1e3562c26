#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("section 2 submitted before section 1 in session {0}")]
    NoStagedAnswers(String),
    #[error("session registry lock poisoned")]
    SessionLockPoisoned,

    #[error("failed to read survey store: {0}")]
    StoreRead(std::io::Error),
    #[error("failed to write survey store: {0}")]
    StoreWrite(std::io::Error),
    #[error("malformed survey store: {0}")]
    Csv(#[from] csv::Error),
    #[error("corrupt survey store: {0}")]
    StoreCorrupt(String),
    #[error("survey store lock poisoned")]
    StoreLockPoisoned,

    #[error("invalid session id: {0}")]
    Uuid(#[from] survey_uuid::UuidError),
}

pub type SurveyResult<T> = std::result::Result<T, SurveyError>;
