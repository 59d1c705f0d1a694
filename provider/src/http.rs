//! reqwest-backed provider client.

use crate::artifact::LoadedArtifact;
use crate::config::ProviderConfig;
use crate::descriptor::build_descriptors;
use crate::error::ProviderError;
use crate::response::{parse_session, parse_submission, parse_token};
use crate::{ProviderClient, SubmissionResult};
use kyc_types::{AccessCredential, ArtifactSet, Metadata, SessionId, VerificationSession};
use reqwest::multipart::Form;
use reqwest::Url;
use serde::Serialize;

/// Body of the session-open request.
#[derive(Serialize)]
struct OpenSessionRequest<'a> {
    #[serde(rename = "flowId")]
    flow_id: &'a str,
    metadata: &'a Metadata,
}

/// HTTP client for the verification provider.
///
/// Every operation is exactly one round trip. Nothing is retried here.
pub struct HttpProviderClient {
    /// HTTP client (reusable connection pool).
    http: reqwest::Client,
    config: ProviderConfig,
}

impl HttpProviderClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ProviderError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// `{base}/v2/identities/{id}/send-input`, with the session id escaped
    /// as a single path segment.
    fn input_url(&self, id: &SessionId) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.url("/v2/identities"))
            .map_err(|e| ProviderError::Config(format!("invalid base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Config("base_url cannot carry a path".into()))?
            .push(id.as_str())
            .push("send-input");
        Ok(url)
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}

impl ProviderClient for HttpProviderClient {
    async fn acquire_credential(&self) -> Result<AccessCredential, ProviderError> {
        let response = self
            .http
            .post(self.url("/oauth"))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ProviderError::Auth(describe(&e)))?;

        let status = response.status();
        tracing::debug!(%status, "credential exchange response");
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Auth(describe(&e)))?;

        if !status.is_success() {
            return Err(ProviderError::Auth(format!("HTTP status {status}")));
        }
        parse_token(&body)
    }

    async fn open_session(
        &self,
        credential: &AccessCredential,
        metadata: &Metadata,
    ) -> Result<VerificationSession, ProviderError> {
        let request = OpenSessionRequest {
            flow_id: &self.config.flow_id,
            metadata,
        };
        let response = self
            .http
            .post(self.url("/v2/verifications"))
            .bearer_auth(credential.bearer())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::SessionOpen(describe(&e)))?;

        let status = response.status();
        tracing::debug!(%status, "session open response");
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::SessionOpen(describe(&e)))?;

        parse_session(&body).map_err(|e| {
            if status.is_success() {
                e
            } else {
                ProviderError::SessionOpen(format!("HTTP status {status}: {e}"))
            }
        })
    }

    async fn submit_artifacts(
        &self,
        credential: &AccessCredential,
        session: &VerificationSession,
        artifacts: &ArtifactSet,
    ) -> Result<SubmissionResult, ProviderError> {
        let descriptors = build_descriptors(&self.config.document, artifacts);
        let inputs = serde_json::to_string(&descriptors)
            .map_err(|e| ProviderError::Transport(format!("failed to encode descriptors: {e}")))?;

        let front = LoadedArtifact::load(&artifacts.front).await?;
        let back = LoadedArtifact::load(&artifacts.back).await?;
        let selfie = LoadedArtifact::load(&artifacts.selfie).await?;

        let form = Form::new()
            .text("inputs", inputs)
            .part("document", front.into_part()?)
            .part("document", back.into_part()?)
            .part("selfie", selfie.into_part()?);

        let url = self.input_url(&session.id)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(credential.bearer())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(describe(&e)))?;

        let status = response.status();
        tracing::debug!(%status, session = %session.id, "artifact submission response");
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(describe(&e)))?;

        parse_submission(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpProviderClient {
        HttpProviderClient::new(ProviderConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn input_url_keeps_session_id_in_one_segment() {
        let url = client("http://provider.test/api/")
            .input_url(&SessionId::new("a/b?c#d"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://provider.test/api/v2/identities/a%2Fb%3Fc%23d/send-input"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn plain_session_id_is_unchanged() {
        let url = client("http://provider.test")
            .input_url(&SessionId::new("ident-42"))
            .unwrap();
        assert_eq!(url.as_str(), "http://provider.test/v2/identities/ident-42/send-input");
    }
}
