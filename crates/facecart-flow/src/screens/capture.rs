//! Capture screen: photograph the user, ask the backend who they are, and
//! route to the catalog or to their stored order.

use super::{Alert, Outcome};
use crate::services::Services;
use facecart_capture::{CaptureError, CapturedImage};
use facecart_core::{ActionGate, CatalogParams, Navigation, OrderViewParams, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureAction {
    Register,
    Recognize,
}

pub struct CaptureScreen {
    services: Services,
    gate: ActionGate<CaptureAction>,
    /// Name prompt; `Some` while open, holding the text typed so far.
    prompt: Option<String>,
    /// Last captured photo, replaced by each new capture.
    photo: Option<CapturedImage>,
}

impl CaptureScreen {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            gate: ActionGate::new(),
            prompt: None,
            photo: None,
        }
    }

    pub fn gate(&self) -> &ActionGate<CaptureAction> {
        &self.gate
    }

    #[cfg(test)]
    pub(crate) fn gate_mut(&mut self) -> &mut ActionGate<CaptureAction> {
        &mut self.gate
    }

    pub fn is_loading(&self, action: CaptureAction) -> bool {
        self.gate.is_running(action)
    }

    pub fn photo(&self) -> Option<&CapturedImage> {
        self.photo.as_ref()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Open the name prompt that precedes registration. Inert while busy.
    pub fn open_prompt(&mut self) -> bool {
        if self.gate.is_busy() {
            return false;
        }
        self.prompt.get_or_insert_with(String::new);
        true
    }

    pub fn set_name(&mut self, name: &str) {
        if let Some(text) = self.prompt.as_mut() {
            name.clone_into(text);
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Run registration with the typed name; the prompt closes and clears
    /// whatever the outcome.
    pub async fn confirm_prompt(&mut self) -> Outcome {
        let Some(name) = self.prompt.take() else {
            return Outcome::Cancelled;
        };
        self.register(Some(&name)).await
    }

    /// Check whether the face is already known; if not, continue to the
    /// catalog. Registration itself happens at checkout.
    pub async fn register(&mut self, name: Option<&str>) -> Outcome {
        if !self.gate.begin(CaptureAction::Register) {
            return Outcome::Ignored;
        }
        let outcome = self.run_register(name).await;
        self.gate.finish();
        outcome
    }

    /// Identify the face and route to the stored order or the catalog.
    pub async fn recognize(&mut self) -> Outcome {
        if !self.gate.begin(CaptureAction::Recognize) {
            return Outcome::Ignored;
        }
        let outcome = self.run_recognize().await;
        self.gate.finish();
        outcome
    }

    async fn run_register(&mut self, name: Option<&str>) -> Outcome {
        let image = match self.take_photo().await {
            Ok(Some(image)) => image,
            Ok(None) => return Outcome::Cancelled,
            Err(alert) => return Outcome::Alert(alert),
        };

        let result = match self.services.backend.check_face(&image).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "check-face failed");
                return Outcome::Alert(Alert::error(e.to_string()));
            }
        };

        if result.registered {
            return Outcome::Alert(Alert::new(
                "Face Registration",
                "Face Already Registered! Please use Recognize.",
            ));
        }

        let name = self.services.identity(&[result.name.as_deref(), name]);
        tracing::info!(name = %name, "face not registered; continuing to catalog");
        Outcome::navigate(Navigation::Push(Route::Catalog(CatalogParams {
            name,
            face_img: image,
        })))
    }

    async fn run_recognize(&mut self) -> Outcome {
        let image = match self.take_photo().await {
            Ok(Some(image)) => image,
            Ok(None) => return Outcome::Cancelled,
            Err(alert) => return Outcome::Alert(alert),
        };

        let result = match self.services.backend.recognize_face(&image).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "recognize-face failed");
                return Outcome::Alert(Alert::error(e.to_string()));
            }
        };

        if !result.success {
            return Outcome::Alert(Alert::error("Face not recognized!"));
        }

        let name = self.services.identity(&[result.name.as_deref()]);
        match self.services.store.load(&name) {
            Ok(Some(order)) => {
                tracing::info!(name = %name, order_id = %order.id, "stored order found");
                Outcome::navigate(Navigation::Push(Route::OrderView(OrderViewParams {
                    order,
                    name,
                })))
            }
            Ok(None) => {
                tracing::info!(name = %name, "no stored order; continuing to catalog");
                Outcome::navigate(Navigation::Push(Route::Catalog(CatalogParams {
                    name,
                    face_img: image,
                })))
            }
            Err(e) => {
                tracing::error!(name = %name, error = %e, "order lookup failed");
                Outcome::Alert(Alert::error(e.to_string()))
            }
        }
    }

    /// Acquire a photo and keep it as the current preview. Returns its
    /// base64 payload.
    async fn take_photo(&mut self) -> Result<Option<String>, Alert> {
        match facecart_capture::acquire(&*self.services.camera).await {
            Ok(Some(photo)) => {
                let image = photo.base64().to_string();
                self.photo = Some(photo);
                Ok(Some(image))
            }
            Ok(None) => Ok(None),
            Err(CaptureError::PermissionDenied) => Err(Alert::new(
                "Camera Permission",
                "We need access to your camera to take photos",
            )),
            Err(e) => {
                tracing::error!(error = %e, "camera error");
                Err(Alert::new("Camera Error", e.to_string()))
            }
        }
    }
}
