//! Provider response bodies and how they map onto typed results.

use crate::error::ProviderError;
use kyc_types::{AccessCredential, ArtifactResult, ErrorCode, SessionId, VerificationSession};
use serde::Deserialize;

/// Raw body of the credential exchange.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Raw body of the session-open call. The session id is named `identity`.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    identity: Option<String>,
}

/// Raw per-artifact entry of the submission response.
#[derive(Debug, Deserialize)]
struct InputResult {
    #[serde(default)]
    result: bool,
    #[serde(default)]
    error: Option<InputError>,
}

#[derive(Debug, Deserialize)]
struct InputError {
    #[serde(default)]
    code: Option<String>,
}

/// Extract the bearer token from a credential exchange body.
pub fn parse_token(body: &str) -> Result<AccessCredential, ProviderError> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Auth(format!("unparseable token response: {e}")))?;
    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(AccessCredential::new(token)),
        _ => Err(ProviderError::Auth("response carries no access_token".into())),
    }
}

/// Extract the session identifier from a session-open body.
///
/// Validation failures, quota exhaustion and malformed metadata all surface
/// the same way: the body has no usable `identity`.
pub fn parse_session(body: &str) -> Result<VerificationSession, ProviderError> {
    let parsed: SessionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::SessionOpen(format!("unparseable session response: {e}")))?;
    match parsed.identity {
        Some(id) if !matches!(id.as_str(), "" | "." | "..") => {
            Ok(VerificationSession::new(SessionId::new(id)))
        }
        _ => Err(ProviderError::SessionOpen(format!(
            "response carries no session identifier: {}",
            truncate(body, 200)
        ))),
    }
}

/// Parse the per-artifact results of a submission.
///
/// Anything other than a JSON array of result objects is a transport error.
/// A failing entry without an error code keeps `error: None`.
pub fn parse_submission(body: &str) -> Result<Vec<ArtifactResult>, ProviderError> {
    let parsed: Vec<InputResult> = serde_json::from_str(body).map_err(|e| {
        ProviderError::Transport(format!("{e}: {}", truncate(body, 200)))
    })?;
    Ok(parsed
        .into_iter()
        .map(|item| ArtifactResult {
            success: item.result,
            error: if item.result {
                None
            } else {
                Some(
                    item.error
                        .and_then(|e| e.code)
                        .map(ErrorCode::new)
                        .unwrap_or_else(ErrorCode::unknown),
                )
            },
        })
        .collect())
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
