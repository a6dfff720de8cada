//! HTTP adapter for the game server's session endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use lobbyhero_shared::{
    CreateSessionRequest, CreateSessionResponse, ScoreEntry, SessionId, SessionStateResponse,
    StartGameRequest,
};

use crate::ports::outbound::{ApiError, SessionApiPort};

/// Default base URL of the game server.
pub const DEFAULT_SERVER_URL: &str = "https://localhost:7144";

/// Request timeout. Session reads happen on a 4 s cadence, so anything
/// slower than this is treated as a failed tick.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Session API client backed by reqwest.
#[derive(Clone)]
pub struct HttpSessionApi {
    client: Client,
    base_url: String,
}

impl HttpSessionApi {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the `LOBBYHERO_SERVER_URL` environment
    /// variable, falling back to [`DEFAULT_SERVER_URL`].
    pub fn from_env() -> Self {
        let base_url = std::env::var("LOBBYHERO_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for HttpSessionApi {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl SessionApiPort for HttpSessionApi {
    async fn create_session(&self, name: &str) -> Result<SessionId, ApiError> {
        let response = self
            .client
            .post(self.endpoint("/Session/CreateSession"))
            .json(&CreateSessionRequest::new(name))
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        check_status(&response)?;

        let body: CreateSessionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        SessionId::parse(body.session_id)
            .map_err(|_| ApiError::invalid_response("no sessionId in create response"))
    }

    async fn session_state(&self, id: &SessionId) -> Result<SessionStateResponse, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/Session/GetSessionById"))
            .query(&[("sessionId", id.as_str())])
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        check_status(&response)?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn start_game(&self, id: &SessionId) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("/Session/StartGame"))
            .json(&StartGameRequest::new(id.clone()))
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        check_status(&response)
    }

    async fn scores(&self) -> Result<Vec<ScoreEntry>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/Score"))
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        check_status(&response)?;

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_trimmed() {
        let api = HttpSessionApi::new("https://localhost:7144/");
        assert_eq!(api.base_url(), "https://localhost:7144");
        assert_eq!(
            api.endpoint("/Session/StartGame"),
            "https://localhost:7144/Session/StartGame"
        );
    }
}
