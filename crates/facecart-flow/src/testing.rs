//! Scripted collaborators for flow tests.

use crate::backend::{BackendError, FaceBackend};
use crate::services::Services;
use async_trait::async_trait;
use facecart_capture::{Camera, CaptureError, CapturedImage, Permission};
use facecart_core::{Identity, MemoryOrderStore, RecognitionResult};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

pub(crate) fn jpeg_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 160, 140]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

/// A recorded backend call: endpoint, image, and the name for registrations.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub endpoint: &'static str,
    pub image: String,
    pub name: Option<String>,
}

/// Backend whose replies are set per endpoint. `Err(status)` replies become
/// [`BackendError::Api`].
pub(crate) struct FakeBackend {
    pub check: Mutex<Result<RecognitionResult, u16>>,
    pub register: Mutex<Result<RecognitionResult, u16>>,
    pub recognize: Mutex<Result<RecognitionResult, u16>>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            check: Mutex::new(Ok(RecognitionResult::default())),
            register: Mutex::new(Ok(RecognitionResult::default())),
            recognize: Mutex::new(Ok(RecognitionResult::default())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recognizes(self, name: &str) -> Self {
        *self.recognize.lock().unwrap() = Ok(RecognitionResult {
            success: true,
            name: Some(name.to_string()),
            ..Default::default()
        });
        self
    }

    pub fn already_registered(self) -> Self {
        *self.check.lock().unwrap() = Ok(RecognitionResult {
            registered: true,
            ..Default::default()
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }

    fn reply(
        &self,
        slot: &Mutex<Result<RecognitionResult, u16>>,
        call: Call,
    ) -> Result<RecognitionResult, BackendError> {
        self.calls.lock().unwrap().push(call);
        slot.lock().unwrap().clone().map_err(|status| BackendError::Api {
            status,
            message: "scripted failure".into(),
        })
    }
}

#[async_trait]
impl FaceBackend for FakeBackend {
    async fn check_face(&self, image: &str) -> Result<RecognitionResult, BackendError> {
        let call = Call {
            endpoint: "check-face",
            image: image.to_string(),
            name: None,
        };
        self.reply(&self.check, call)
    }

    async fn register_face(
        &self,
        image: &str,
        name: &Identity,
    ) -> Result<RecognitionResult, BackendError> {
        let call = Call {
            endpoint: "register-face",
            image: image.to_string(),
            name: Some(name.to_string()),
        };
        self.reply(&self.register, call)
    }

    async fn recognize_face(&self, image: &str) -> Result<RecognitionResult, BackendError> {
        let call = Call {
            endpoint: "recognize-face",
            image: image.to_string(),
            name: None,
        };
        self.reply(&self.recognize, call)
    }
}

/// Camera that always returns the same photo, or is cancelled/denied.
pub(crate) struct FakeCamera {
    pub permission: Permission,
    pub photo: Option<Vec<u8>>,
    pub shots: Mutex<usize>,
}

impl FakeCamera {
    pub fn with_photo() -> Self {
        Self {
            permission: Permission::Granted,
            photo: Some(jpeg_bytes()),
            shots: Mutex::new(0),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            photo: None,
            ..Self::with_photo()
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Permission::Denied,
            ..Self::with_photo()
        }
    }

    pub fn shots(&self) -> usize {
        *self.shots.lock().unwrap()
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn capture(&self) -> Result<Option<CapturedImage>, CaptureError> {
        *self.shots.lock().unwrap() += 1;
        match &self.photo {
            Some(bytes) => Ok(Some(CapturedImage::from_bytes(bytes)?)),
            None => Ok(None),
        }
    }
}

pub(crate) struct Harness {
    pub backend: Arc<FakeBackend>,
    pub store: Arc<MemoryOrderStore>,
    pub camera: Arc<FakeCamera>,
}

impl Harness {
    pub fn new(backend: FakeBackend, camera: FakeCamera) -> Self {
        Self {
            backend: Arc::new(backend),
            store: Arc::new(MemoryOrderStore::new()),
            camera: Arc::new(camera),
        }
    }

    pub fn services(&self) -> Services {
        Services::new(
            self.backend.clone(),
            self.store.clone(),
            self.camera.clone(),
            "demo",
        )
    }

    /// Base64 of the photo the fake camera produces.
    pub fn photo_base64(&self) -> String {
        CapturedImage::from_bytes(&jpeg_bytes())
            .unwrap()
            .into_base64()
    }
}
