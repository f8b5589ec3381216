//! Captured photo — format sniffing, dimensions, base64 and data-URL encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageFormat;

/// A photo held in memory for one capture-and-submit cycle.
///
/// The raw bytes are only kept in their base64 form, which is what the
/// backend consumes.
#[derive(Clone)]
pub struct CapturedImage {
    base64: String,
    format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl CapturedImage {
    /// Validate and encode raw image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PhotoError> {
        if bytes.is_empty() {
            return Err(PhotoError::Empty);
        }
        let format =
            image::guess_format(bytes).map_err(|e| PhotoError::Unrecognized(e.to_string()))?;
        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| PhotoError::Decode(e.to_string()))?;

        tracing::debug!(
            format = ?format,
            width = decoded.width(),
            height = decoded.height(),
            bytes = bytes.len(),
            "photo decoded"
        );

        Ok(Self {
            base64: STANDARD.encode(bytes),
            format,
            width: decoded.width(),
            height: decoded.height(),
        })
    }

    /// Accept either bare base64 or a `data:<mime>;base64,<payload>` URL.
    pub fn from_base64(text: &str) -> Result<Self, PhotoError> {
        let payload = match text.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => text,
        };
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| PhotoError::Base64(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Base64 payload, without any data-URL prefix.
    pub fn base64(&self) -> &str {
        &self.base64
    }

    pub fn into_base64(self) -> String {
        self.base64
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Preview URL, e.g. `data:image/jpeg;base64,...`.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.base64)
    }
}

impl std::fmt::Debug for CapturedImage {
    // The payload can be megabytes; keep it out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedImage")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("base64_len", &self.base64.len())
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo is empty")]
    Empty,
    #[error("unrecognized image format: {0}")]
    Unrecognized(String),
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("invalid base64: {0}")]
    Base64(String),
}
