//! facecart-flow — The face-recognition ordering flow.
//!
//! Capture → (Catalog | Order View) → Order View, driven against an opaque
//! face-recognition HTTP backend and a local per-identity order store.

pub mod backend;
pub mod config;
pub mod navigator;
pub mod screens;
pub mod services;
pub mod session;
pub mod sync;

#[cfg(test)]
mod testing;

pub use backend::{BackendError, FaceBackend, HttpFaceBackend};
pub use config::Config;
pub use navigator::Navigator;
pub use screens::{Alert, CaptureAction, CaptureScreen, CatalogScreen, OrderRow, OrderView, Outcome};
pub use services::Services;
pub use session::{Screen, Session};
pub use sync::{sync_registrations, SyncReport};
