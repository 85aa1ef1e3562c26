//! Survey service: sessions plus the response store.

use crate::config::CoreConfig;
use crate::record::SurveyRecord;
use crate::session::SessionRegistry;
use crate::store::CsvStore;
use crate::wire::{Page, Section1Answers, Section2Answers};
use crate::SurveyResult;
use std::sync::Arc;
use survey_uuid::SessionId;

/// Pure survey operations - no API concerns
#[derive(Clone, Debug)]
pub struct SurveyService {
    sessions: SessionRegistry,
    store: CsvStore,
}

impl SurveyService {
    /// Creates a service with an empty session registry over the configured store.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            sessions: SessionRegistry::new(cfg.session_ttl()),
            store: CsvStore::new(cfg.csv_path()),
        }
    }

    pub fn store(&self) -> &CsvStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn start_session(&self) -> SurveyResult<SessionId> {
        self.sessions.create()
    }

    pub fn current_page(&self, id: &SessionId) -> SurveyResult<Page> {
        self.sessions.page(id)
    }

    /// Stages Section 1 answers; the session moves to Section 2.
    pub fn submit_section1(&self, id: &SessionId, answers: Section1Answers) -> SurveyResult<Page> {
        self.sessions.submit_section1(id, answers)
    }

    /// Completes the survey for a session.
    ///
    /// Merges the staged Section 1 answers with `answers`, appends the 21-field record to the
    /// store and leaves the session on Section 1.
    ///
    /// # Errors
    ///
    /// Returns a `SurveyError` if:
    /// - the session does not exist or has expired,
    /// - the session has no staged Section 1 answers,
    /// - the store cannot be written. The session then keeps its staged answers so that
    ///   Section 2 can be submitted again.
    pub fn submit_section2(
        &self,
        id: &SessionId,
        answers: Section2Answers,
    ) -> SurveyResult<SurveyRecord> {
        let (staged, record) = self.sessions.take_record(id, answers)?;

        if let Err(e) = self.store.append(&record) {
            tracing::error!(session_id = %id, error = %e, "failed to store survey response");
            if let Err(restore_err) = self.sessions.restore(id, staged) {
                tracing::error!(
                    session_id = %id,
                    error = %restore_err,
                    "failed to restore staged answers"
                );
            }
            return Err(e);
        }

        tracing::info!(session_id = %id, "survey completed");
        Ok(record)
    }

    pub fn end_session(&self, id: &SessionId) -> SurveyResult<()> {
        self.sessions.end(id)
    }
}
