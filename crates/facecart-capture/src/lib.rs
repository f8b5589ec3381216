//! facecart-capture — Photo acquisition for the capture screen.
//!
//! Wraps camera permission and single-shot capture behind the [`Camera`]
//! trait, and turns raw photo bytes into the base64 payload the face
//! backend expects.

pub mod camera;
pub mod photo;

pub use camera::{acquire, Camera, CaptureError, FileCamera, Permission};
pub use photo::{CapturedImage, PhotoError};
