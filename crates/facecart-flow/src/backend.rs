//! HTTP client for the face-recognition backend.
//!
//! The backend is opaque: three JSON endpoints that check, register and
//! recognize a base64 face image.

use async_trait::async_trait;
use facecart_core::{Identity, RecognitionResult};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// The three operations the flow needs from the backend.
#[async_trait]
pub trait FaceBackend: Send + Sync {
    /// `POST /check-face` — is this face already registered?
    async fn check_face(&self, image: &str) -> Result<RecognitionResult, BackendError>;

    /// `POST /register-face` — permanently register `image` as `name`.
    async fn register_face(
        &self,
        image: &str,
        name: &Identity,
    ) -> Result<RecognitionResult, BackendError>;

    /// `POST /recognize-face` — who is this?
    async fn recognize_face(&self, image: &str) -> Result<RecognitionResult, BackendError>;
}

#[derive(Serialize)]
struct ImageBody<'a> {
    image: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    image: &'a str,
    name: &'a str,
    #[serde(rename = "userId")]
    user_id: &'a str,
}

/// reqwest-backed [`FaceBackend`]. No request timeout is set; a call runs
/// until the backend answers or the connection fails.
#[derive(Clone)]
pub struct HttpFaceBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFaceBackend {
    /// Create a client for `base_url` (e.g. `http://10.0.2.2:5000`).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("facecart/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RecognitionResult, BackendError> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%url, "backend request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "backend rejected request");
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

#[async_trait]
impl FaceBackend for HttpFaceBackend {
    async fn check_face(&self, image: &str) -> Result<RecognitionResult, BackendError> {
        let result = self.post("check-face", &ImageBody { image }).await?;
        tracing::info!(registered = result.registered, "check-face");
        Ok(result)
    }

    async fn register_face(
        &self,
        image: &str,
        name: &Identity,
    ) -> Result<RecognitionResult, BackendError> {
        let body = RegisterBody {
            image,
            name: name.as_str(),
            user_id: name.as_str(),
        };
        let result = self.post("register-face", &body).await?;
        tracing::info!(name = %name, message = ?result.message, "register-face");
        Ok(result)
    }

    async fn recognize_face(&self, image: &str) -> Result<RecognitionResult, BackendError> {
        let result = self.post("recognize-face", &ImageBody { image }).await?;
        tracing::info!(success = result.success, name = ?result.name, "recognize-face");
        Ok(result)
    }
}
