//! Server API transport for the session engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use telehub_core::error::AppError;
use telehub_entity::session::{SessionStatus, TeleworkSession};

/// A heartbeat report sent to the server.
///
/// `delta_seconds` is the active time elapsed since the previous report,
/// as measured by the client's reference clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatReport {
    /// The session the report belongs to.
    pub session_id: Uuid,
    /// Active seconds elapsed since the previous report.
    pub delta_seconds: i64,
    /// New presence status, if the user changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    /// Free-form activity note, if the user wrote one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_note: Option<String>,
}

/// Abstraction over the telework session API.
///
/// [`SessionClient`](crate::session::SessionClient) talks to the server
/// exclusively through this trait so tests can substitute a mock.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Fetches the caller's open session for today, if any.
    async fn load_today(&self) -> Result<Option<TeleworkSession>, AppError>;

    /// Opens a session for today.
    async fn check_in(&self, note: Option<String>) -> Result<TeleworkSession, AppError>;

    /// Closes an open session.
    async fn check_out(
        &self,
        session_id: Uuid,
        note: Option<String>,
    ) -> Result<TeleworkSession, AppError>;

    /// Delivers a heartbeat report.
    async fn heartbeat(&self, report: HeartbeatReport) -> Result<TeleworkSession, AppError>;
}

#[derive(Debug, Serialize)]
struct NoteBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckOutBody {
    session_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

/// HTTP implementation of [`SessionTransport`] against the TeleHub API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Creates a transport for the given API base URL and access token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T, B>(&self, request: reqwest::RequestBuilder, body: Option<&B>) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = request.bearer_auth(&self.token);
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| AppError::network(format!("Request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| AppError::network(format!("Malformed server response: {e}")));
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => format!("{}: {}", body.error, body.message),
            Err(_) => format!("HTTP {status}"),
        };
        Err(match status.as_u16() {
            401 => AppError::authentication(message),
            403 => AppError::authorization(message),
            404 => AppError::not_found(message),
            409 => AppError::conflict(message),
            400 | 422 => AppError::validation(message),
            503 => AppError::service_unavailable(message),
            _ => AppError::internal(message),
        })
    }
}

#[async_trait]
impl SessionTransport for HttpTransport {
    async fn load_today(&self) -> Result<Option<TeleworkSession>, AppError> {
        self.send::<Option<TeleworkSession>, ()>(
            self.client.get(self.url("/api/telework/today")),
            None,
        )
        .await
    }

    async fn check_in(&self, note: Option<String>) -> Result<TeleworkSession, AppError> {
        self.send(
            self.client.post(self.url("/api/telework/check-in")),
            Some(&NoteBody { note }),
        )
        .await
    }

    async fn check_out(
        &self,
        session_id: Uuid,
        note: Option<String>,
    ) -> Result<TeleworkSession, AppError> {
        self.send(
            self.client.post(self.url("/api/telework/check-out")),
            Some(&CheckOutBody { session_id, note }),
        )
        .await
    }

    async fn heartbeat(&self, report: HeartbeatReport) -> Result<TeleworkSession, AppError> {
        self.send(
            self.client.post(self.url("/api/telework/heartbeat")),
            Some(&report),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let transport = HttpTransport::new("http://localhost:8080/", "token");
        assert_eq!(
            transport.url("/api/telework/today"),
            "http://localhost:8080/api/telework/today"
        );
    }

    #[test]
    fn optional_fields_are_omitted_from_reports() {
        let report = HeartbeatReport {
            session_id: Uuid::nil(),
            delta_seconds: 60,
            status: None,
            activity_note: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("status").is_none());
        assert!(json.get("activity_note").is_none());
    }
}
