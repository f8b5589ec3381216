//! Camera abstraction: just-in-time permission plus single-shot capture.

use crate::photo::{CapturedImage, PhotoError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("bad photo: {0}")]
    Photo(#[from] PhotoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Source of face photos.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Ask for camera access. Called right before every capture.
    async fn request_permission(&self) -> Permission;

    /// Take one photo. `Ok(None)` means the user dismissed the camera.
    async fn capture(&self) -> Result<Option<CapturedImage>, CaptureError>;
}

/// Request permission, then capture. A denial becomes
/// [`CaptureError::PermissionDenied`] and no capture is attempted.
pub async fn acquire(camera: &dyn Camera) -> Result<Option<CapturedImage>, CaptureError> {
    if camera.request_permission().await == Permission::Denied {
        tracing::warn!("camera permission denied");
        return Err(CaptureError::PermissionDenied);
    }
    let photo = camera.capture().await?;
    match &photo {
        Some(p) => tracing::info!(width = p.width, height = p.height, "photo captured"),
        None => tracing::debug!("capture cancelled"),
    }
    Ok(photo)
}

/// Treats an image file on disk as the camera. Unreadable files map to a
/// denied permission, missing files to a missing device.
pub struct FileCamera {
    path: PathBuf,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn request_permission(&self) -> Permission {
        match tokio::fs::File::open(&self.path).await {
            Err(e) if e.kind() == ErrorKind::PermissionDenied => Permission::Denied,
            _ => Permission::Granted,
        }
    }

    async fn capture(&self) -> Result<Option<CapturedImage>, CaptureError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CaptureError::DeviceNotFound(self.path.display().to_string()),
            ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
            _ => CaptureError::CaptureFailed(format!("{}: {e}", self.path.display())),
        })?;
        Ok(Some(CapturedImage::from_bytes(&bytes)?))
    }
}
