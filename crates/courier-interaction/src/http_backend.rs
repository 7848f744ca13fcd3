//! HttpBackend - reqwest implementation of the backend traits.
//!
//! All endpoints speak plain request/response HTTP with JSON bodies,
//! except upload, which uses multipart form encoding. No authentication,
//! retry, or backoff: a single failure is surfaced to the caller, who
//! decides whether it is fatal (chat, route, upload) or best-effort
//! (delete-file, clear-history).

use crate::config::BackendConfig;
use async_trait::async_trait;
use courier_core::backend::{BackendHealth, ChatBackend, ChatReply, RouteClassifier};
use courier_core::error::{CourierError, Result};
use courier_core::routing::Endpoint;
use courier_core::session::Provenance;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// HTTP client for the chat backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend client from connection settings.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| CourierError::internal(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Checks the status and decodes a JSON body, mapping non-success
    /// responses to transport errors carrying the server's `detail` when
    /// one was provided.
    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| CourierError::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            })
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body_text = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        Err(map_http_error(status, body_text))
    }
}

#[async_trait]
impl RouteClassifier for HttpBackend {
    async fn classify(&self, message: &str) -> Result<Endpoint> {
        let response = self
            .client
            .post(self.url("/chat/route"))
            .json(&RouteRequest { message })
            .send()
            .await?;

        let decoded: RouteResponse = Self::read_json(response).await?;
        tracing::debug!(target: "backend", endpoint = %decoded.endpoint, "route classified");
        Ok(Endpoint::parse(&decoded.endpoint))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(
        &self,
        endpoint: Endpoint,
        message: &str,
        session_id: &str,
    ) -> Result<ChatReply> {
        let path = format!("/chat/{}", endpoint.as_str());
        let response = self
            .client
            .post(self.url(&path))
            .json(&ChatRequest {
                message,
                session_id,
            })
            .send()
            .await?;

        let decoded: ChatResponse = Self::read_json(response).await?;
        Ok(ChatReply {
            response: decoded.response,
            generated_files: decoded.generated_files.unwrap_or_default(),
        })
    }

    async fn upload(&self, filename: &str, bytes: Vec<u8>, session_id: &str) -> Result<()> {
        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new()
            .part("file", part)
            .text("session_id", session_id.to_string());

        let response = self
            .client
            .post(self.url("/upload-file"))
            .multipart(form)
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::debug!(target: "backend", %filename, "file uploaded");
        Ok(())
    }

    async fn delete_file(
        &self,
        filename: &str,
        session_id: &str,
        provenance: Provenance,
    ) -> Result<()> {
        let response = self
            .client
            .delete(self.url("/delete-file"))
            .query(&[
                ("filename", filename),
                ("session_id", session_id),
                ("file_type", provenance.as_str()),
            ])
            .send()
            .await?;

        // Response body is ignored; only the status matters.
        Self::check_status(response).await?;
        Ok(())
    }

    async fn clear_history(&self, session_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/chat/history/{session_id}")))
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn health(&self) -> Result<BackendHealth> {
        let response = self.client.get(self.url("/health")).send().await?;
        Self::read_json(response).await
    }
}

fn map_http_error(status: StatusCode, body: String) -> CourierError {
    // FastAPI-style error bodies wrap the message in a `detail` field;
    // fall back to the raw body when the shape differs.
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.detail)
        .unwrap_or(body);

    CourierError::transport_status(status.as_u16(), message)
}

#[derive(Serialize)]
struct RouteRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct RouteResponse {
    endpoint: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    session_id: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
    #[serde(default)]
    generated_files: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_wire_shape() {
        let body = serde_json::to_value(&ChatRequest {
            message: "send an email to Ann",
            session_id: "abc-123",
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({ "message": "send an email to Ann", "session_id": "abc-123" })
        );
    }

    #[test]
    fn chat_response_tolerates_missing_generated_files() {
        let decoded: ChatResponse =
            serde_json::from_str(r#"{ "response": "Done." }"#).unwrap();
        assert_eq!(decoded.response, "Done.");
        assert!(decoded.generated_files.is_none());

        let decoded: ChatResponse = serde_json::from_str(
            r#"{ "response": "Done.", "generated_files": ["report.pdf"] }"#,
        )
        .unwrap();
        assert_eq!(decoded.generated_files.unwrap(), vec!["report.pdf"]);
    }

    #[test]
    fn error_body_detail_is_surfaced() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            r#"{ "detail": "File too large" }"#.to_string(),
        );
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("File too large"));
    }

    #[test]
    fn malformed_error_body_falls_back_to_raw_text() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream exploded".to_string());
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn endpoint_paths_follow_capability_names() {
        let backend =
            HttpBackend::new(BackendConfig::new("http://127.0.0.1:8000")).unwrap();
        assert_eq!(
            backend.url(&format!("/chat/{}", Endpoint::Employee.as_str())),
            "http://127.0.0.1:8000/chat/employee"
        );
        assert_eq!(
            backend.url(&format!("/chat/{}", Endpoint::Generic.as_str())),
            "http://127.0.0.1:8000/chat/generic"
        );
    }
}
