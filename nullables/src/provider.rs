//! Nullable provider: scripted responses, no network.

use kyc_provider::{ProviderClient, ProviderError, SubmissionResult};
use kyc_types::{
    AccessCredential, ArtifactResult, ArtifactSet, Metadata, SessionId, VerificationSession,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

/// A call observed by [`NullProvider`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderCall {
    AcquireCredential,
    OpenSession { metadata: Metadata },
    SubmitArtifacts { session: SessionId, artifacts: ArtifactSet },
}

/// A provider that answers from a script and records every call.
///
/// By default every call succeeds and sessions are numbered `session-1`,
/// `session-2`, ... in the order they are opened. Failures are scripted by
/// the 1-based ordinal of the call to each operation.
#[derive(Default)]
pub struct NullProvider {
    auth_failures: HashSet<usize>,
    session_failures: HashSet<usize>,
    rejections: HashMap<usize, Vec<String>>,
    garbled: HashSet<usize>,
    fail_all: bool,
    credentials_issued: Cell<usize>,
    sessions_opened: Cell<usize>,
    submissions: Cell<usize>,
    calls: RefCell<Vec<ProviderCall>>,
}

impl NullProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `nth` credential exchange fails.
    pub fn fail_auth_on(mut self, nth: usize) -> Self {
        self.auth_failures.insert(nth);
        self
    }

    /// The `nth` session open returns no session identifier.
    pub fn fail_session_on(mut self, nth: usize) -> Self {
        self.session_failures.insert(nth);
        self
    }

    /// The `nth` submission rejects one artifact per code given.
    pub fn reject_artifacts_on(mut self, nth: usize, codes: &[&str]) -> Self {
        self.rejections
            .insert(nth, codes.iter().map(|c| c.to_string()).collect());
        self
    }

    /// The `nth` submission returns an unparseable body.
    pub fn garble_submission_on(mut self, nth: usize) -> Self {
        self.garbled.insert(nth);
        self
    }

    /// Every operation fails.
    pub fn fail_everything(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.borrow().clone()
    }

    /// Artifact sets submitted so far, in order.
    pub fn submitted_artifacts(&self) -> Vec<ArtifactSet> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                ProviderCall::SubmitArtifacts { artifacts, .. } => Some(artifacts.clone()),
                _ => None,
            })
            .collect()
    }

    fn bump(counter: &Cell<usize>) -> usize {
        let next = counter.get() + 1;
        counter.set(next);
        next
    }
}

impl ProviderClient for NullProvider {
    async fn acquire_credential(&self) -> Result<AccessCredential, ProviderError> {
        self.calls.borrow_mut().push(ProviderCall::AcquireCredential);
        let nth = Self::bump(&self.credentials_issued);
        if self.fail_all || self.auth_failures.contains(&nth) {
            return Err(ProviderError::Auth("HTTP status 401 Unauthorized".into()));
        }
        Ok(AccessCredential::new(format!("token-{nth}")))
    }

    async fn open_session(
        &self,
        _credential: &AccessCredential,
        metadata: &Metadata,
    ) -> Result<VerificationSession, ProviderError> {
        self.calls.borrow_mut().push(ProviderCall::OpenSession {
            metadata: metadata.clone(),
        });
        let nth = Self::bump(&self.sessions_opened);
        if self.fail_all || self.session_failures.contains(&nth) {
            return Err(ProviderError::SessionOpen(
                "response carries no session identifier".into(),
            ));
        }
        Ok(VerificationSession::new(SessionId::new(format!(
            "session-{nth}"
        ))))
    }

    async fn submit_artifacts(
        &self,
        _credential: &AccessCredential,
        session: &VerificationSession,
        artifacts: &ArtifactSet,
    ) -> Result<SubmissionResult, ProviderError> {
        self.calls.borrow_mut().push(ProviderCall::SubmitArtifacts {
            session: session.id.clone(),
            artifacts: artifacts.clone(),
        });
        let nth = Self::bump(&self.submissions);
        if self.fail_all || self.garbled.contains(&nth) {
            return Err(ProviderError::Transport("expected value at line 1 column 1".into()));
        }
        let mut results = vec![ArtifactResult::ok(); 3];
        if let Some(codes) = self.rejections.get(&nth) {
            for (slot, code) in results.iter_mut().zip(codes) {
                *slot = ArtifactResult::failed(code.clone());
            }
        }
        Ok(results)
    }
}
