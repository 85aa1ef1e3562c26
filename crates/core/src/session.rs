//! Per-session wizard state.
//!
//! Each respondent gets a [`SurveySession`] keyed by a [`SessionId`]. Sessions are only ever
//! reached through their own id, so answers staged in one session cannot be merged into another.
//!
//! There is no background sweeper: sessions idle for longer than the registry's TTL are dropped
//! whenever the registry is next accessed.

use crate::record::SurveyRecord;
use crate::wire::{Page, Section1Answers, Section2Answers};
use crate::wizard::WizardState;
use crate::{SurveyError, SurveyResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use survey_uuid::SessionId;

#[derive(Debug, Clone)]
pub struct SurveySession {
    pub id: SessionId,
    pub state: WizardState,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl SurveySession {
    fn new(id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            state: WizardState::default(),
            created_at: now,
            last_seen: now,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.last_seen > ttl
    }
}

/// Shared registry of live sessions.
///
/// Cloning is cheap; clones share the same sessions.
#[derive(Clone, Debug)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, SurveySession>>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Starts a new session on Section 1.
    pub fn create(&self) -> SurveyResult<SessionId> {
        let now = Utc::now();
        let mut sessions = self.lock_at(now)?;

        let mut id = SessionId::new();
        while sessions.contains_key(&id) {
            id = SessionId::new();
        }
        sessions.insert(id, SurveySession::new(id, now));

        tracing::info!(session_id = %id, live_sessions = sessions.len(), "session started");
        Ok(id)
    }

    /// Returns the page the session is on.
    pub fn page(&self, id: &SessionId) -> SurveyResult<Page> {
        self.with_session(id, |session| Ok(session.state.page()))
    }

    /// Stages Section 1 answers for the session.
    pub fn submit_section1(&self, id: &SessionId, answers: Section1Answers) -> SurveyResult<Page> {
        self.with_session(id, |session| Ok(session.state.submit_section1(answers)))
    }

    /// Takes the session's staged answers and merges them with `answers`.
    ///
    /// The session is left on Section 1. If the record cannot be stored, hand the staged
    /// answers back with [`SessionRegistry::restore`].
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::NoStagedAnswers`] if the session has not submitted Section 1.
    pub fn take_record(
        &self,
        id: &SessionId,
        answers: Section2Answers,
    ) -> SurveyResult<(Section1Answers, SurveyRecord)> {
        self.with_session(id, |session| {
            session.state.take_record(answers).ok_or_else(|| {
                tracing::warn!(session_id = %session.id, "section 2 submitted before section 1");
                SurveyError::NoStagedAnswers(session.id.to_string())
            })
        })
    }

    /// Returns the session to Section 2 with `staged` answers.
    ///
    /// No-op if the session has gone, or has staged newer Section 1 answers since
    /// [`SessionRegistry::take_record`].
    pub fn restore(&self, id: &SessionId, staged: Section1Answers) -> SurveyResult<()> {
        let mut sessions = self.lock_at(Utc::now())?;
        match sessions.get_mut(id) {
            Some(session) if matches!(session.state, WizardState::Section1) => {
                session.state.restore(staged);
            }
            Some(_) => {
                tracing::debug!(session_id = %id, "newer section 1 answers kept");
            }
            None => {}
        }
        Ok(())
    }

    /// Ends a session, discarding any staged answers.
    pub fn end(&self, id: &SessionId) -> SurveyResult<()> {
        let mut sessions = self.lock_at(Utc::now())?;
        match sessions.remove(id) {
            Some(_) => {
                tracing::info!(session_id = %id, "session ended");
                Ok(())
            }
            None => Err(SurveyError::SessionNotFound(id.to_string())),
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> SurveyResult<usize> {
        Ok(self.lock_at(Utc::now())?.len())
    }

    pub fn is_empty(&self) -> SurveyResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Drops sessions idle for longer than the TTL as of `now`.
    pub fn prune_expired(&self, now: DateTime<Utc>) -> SurveyResult<usize> {
        let mut sessions = self.sessions.lock().map_err(|_| SurveyError::SessionLockPoisoned)?;
        Ok(self.prune(&mut sessions, now))
    }

    fn with_session<T>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut SurveySession) -> SurveyResult<T>,
    ) -> SurveyResult<T> {
        let now = Utc::now();
        let mut sessions = self.lock_at(now)?;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| SurveyError::SessionNotFound(id.to_string()))?;
        session.last_seen = now;
        f(session)
    }

    fn lock_at(
        &self,
        now: DateTime<Utc>,
    ) -> SurveyResult<MutexGuard<'_, HashMap<SessionId, SurveySession>>> {
        let mut sessions = self.sessions.lock().map_err(|_| SurveyError::SessionLockPoisoned)?;
        self.prune(&mut sessions, now);
        Ok(sessions)
    }

    fn prune(&self, sessions: &mut HashMap<SessionId, SurveySession>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.ttl));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "expired sessions dropped");
        }
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Duration::hours(1))
    }

    fn section1(name: &str) -> Section1Answers {
        Section1Answers {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_starts_on_section1() {
        let registry = registry();
        let id = registry.create().unwrap();

        assert_eq!(registry.page(&id).unwrap(), Page::Section1);
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn test_unknown_session_is_not_found() {
        let registry = registry();
        let result = registry.page(&SessionId::new());

        assert!(matches!(result, Err(SurveyError::SessionNotFound(_))));
    }

    #[test]
    fn test_staged_answers_do_not_leak_between_sessions() {
        let registry = registry();
        let a = registry.create().unwrap();
        let b = registry.create().unwrap();

        registry.submit_section1(&a, section1("User A")).unwrap();
        registry.submit_section1(&b, section1("User B")).unwrap();

        let (_, record_b) = registry.take_record(&b, Section2Answers::default()).unwrap();
        assert_eq!(record_b.get("name"), Some("User B"));

        // A is untouched by B's completion.
        assert_eq!(registry.page(&a).unwrap(), Page::Section2);
        let (_, record_a) = registry.take_record(&a, Section2Answers::default()).unwrap();
        assert_eq!(record_a.get("name"), Some("User A"));
    }

    #[test]
    fn test_fresh_session_cannot_complete_with_other_sessions_answers() {
        let registry = registry();
        let a = registry.create().unwrap();
        registry.submit_section1(&a, section1("User A")).unwrap();

        let b = registry.create().unwrap();
        let result = registry.take_record(&b, Section2Answers::default());

        assert!(matches!(result, Err(SurveyError::NoStagedAnswers(_))));
        assert_eq!(registry.page(&b).unwrap(), Page::Section1);
        assert_eq!(registry.page(&a).unwrap(), Page::Section2);
    }

    #[test]
    fn test_restore_puts_session_back_on_section2() {
        let registry = registry();
        let id = registry.create().unwrap();
        registry.submit_section1(&id, section1("Meera")).unwrap();

        let (staged, _) = registry.take_record(&id, Section2Answers::default()).unwrap();
        assert_eq!(registry.page(&id).unwrap(), Page::Section1);

        registry.restore(&id, staged).unwrap();
        assert_eq!(registry.page(&id).unwrap(), Page::Section2);
    }

    #[test]
    fn test_restore_keeps_answers_staged_in_the_meantime() {
        let registry = registry();
        let id = registry.create().unwrap();
        registry.submit_section1(&id, section1("first")).unwrap();

        let (staged, _) = registry.take_record(&id, Section2Answers::default()).unwrap();
        registry.submit_section1(&id, section1("second")).unwrap();
        registry.restore(&id, staged).unwrap();

        let (_, record) = registry.take_record(&id, Section2Answers::default()).unwrap();
        assert_eq!(record.get("name"), Some("second"));
    }

    #[test]
    fn test_restore_after_end_is_a_no_op() {
        let registry = registry();
        let id = registry.create().unwrap();
        registry.submit_section1(&id, section1("Meera")).unwrap();
        let (staged, _) = registry.take_record(&id, Section2Answers::default()).unwrap();
        registry.end(&id).unwrap();

        registry.restore(&id, staged).unwrap();
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn test_end_removes_session() {
        let registry = registry();
        let id = registry.create().unwrap();

        registry.end(&id).unwrap();
        assert!(registry.is_empty().unwrap());
        assert!(matches!(
            registry.end(&id),
            Err(SurveyError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_idle_sessions_expire() {
        let registry = registry();
        let id = registry.create().unwrap();

        assert_eq!(registry.prune_expired(Utc::now()).unwrap(), 0);
        assert_eq!(
            registry
                .prune_expired(Utc::now() + Duration::hours(2))
                .unwrap(),
            1
        );
        assert!(matches!(
            registry.page(&id),
            Err(SurveyError::SessionNotFound(_))
        ));
    }
}
