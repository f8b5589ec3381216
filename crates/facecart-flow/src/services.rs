use crate::backend::FaceBackend;
use facecart_capture::Camera;
use facecart_core::{Identity, OrderStore};
use std::sync::Arc;

/// Collaborators shared by every screen of a session.
#[derive(Clone)]
pub struct Services {
    pub backend: Arc<dyn FaceBackend>,
    pub store: Arc<dyn OrderStore>,
    pub camera: Arc<dyn Camera>,
    /// Placeholder identity for captures that carry no name.
    pub default_name: String,
}

impl Services {
    pub fn new(
        backend: Arc<dyn FaceBackend>,
        store: Arc<dyn OrderStore>,
        camera: Arc<dyn Camera>,
        default_name: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            store,
            camera,
            default_name: default_name.into(),
        }
    }

    /// First non-blank candidate, else the placeholder.
    pub fn identity(&self, candidates: &[Option<&str>]) -> Identity {
        let chosen = candidates
            .iter()
            .flatten()
            .copied()
            .find(|n| !n.trim().is_empty());
        Identity::resolve(chosen, &self.default_name)
    }
}
