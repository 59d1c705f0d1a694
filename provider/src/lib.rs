//! Client for the remote identity-verification provider.
//!
//! Three operations, each a single round trip:
//! - obtain an access credential (client-credentials grant),
//! - open a verification session for a record's metadata,
//! - submit the record's artifacts to that session.
//!
//! Failures come back typed; retry policy belongs to the caller.

pub mod artifact;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod http;
pub mod response;

pub use config::ProviderConfig;
pub use descriptor::{build_descriptors, DocumentProfile, InputDescriptor};
pub use error::ProviderError;
pub use http::HttpProviderClient;

use kyc_types::{AccessCredential, ArtifactResult, ArtifactSet, Metadata, VerificationSession};

/// Per-artifact results of one submission, in upload order.
pub type SubmissionResult = Vec<ArtifactResult>;

/// The provider operations the orchestrator drives.
///
/// Futures are awaited in place by a single sequential loop, so they are not
/// required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait ProviderClient {
    /// Exchange the static client credentials for a bearer token.
    async fn acquire_credential(&self) -> Result<AccessCredential, ProviderError>;

    /// Open a new verification session carrying the caller's metadata.
    async fn open_session(
        &self,
        credential: &AccessCredential,
        metadata: &Metadata,
    ) -> Result<VerificationSession, ProviderError>;

    /// Upload front, back (or fallback) and selfie to an open session.
    async fn submit_artifacts(
        &self,
        credential: &AccessCredential,
        session: &VerificationSession,
        artifacts: &ArtifactSet,
    ) -> Result<SubmissionResult, ProviderError>;
}
