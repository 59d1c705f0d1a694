//! Access credentials and verification sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An opaque bearer token issued by the provider.
///
/// Acquired fresh for every record and dropped once the record is done; the
/// token bytes are zeroized on drop. Does not implement `Clone` or
/// `Serialize`, and `Debug` redacts the value.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AccessCredential(String);

impl AccessCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw bearer token, for building the `Authorization` header.
    pub fn bearer(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessCredential(<redacted>)")
    }
}

/// Provider-assigned identifier of an opened verification session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One opened verification attempt, scoped to a single record.
///
/// Never reused: a new session is opened for every record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationSession {
    pub id: SessionId,
}

impl VerificationSession {
    pub fn new(id: SessionId) -> Self {
        Self { id }
    }
}
