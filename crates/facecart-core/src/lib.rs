//! facecart-core — data model and local state for the face-recognition
//! ordering flow.
//!
//! Products, carts, orders, the typed navigation contract between screens,
//! the per-screen busy gate, and the per-identity order store.

pub mod cart;
pub mod catalog;
pub mod gate;
pub mod route;
pub mod store;
pub mod types;

pub use cart::{Cart, CartError};
pub use gate::{ActionGate, GateState};
pub use route::{CatalogParams, Navigation, OrderViewParams, Route};
pub use store::{MemoryOrderStore, OrderStore, SqliteOrderStore, StoreError};
pub use types::{
    Identity, Order, Product, RecognitionResult, UnsyncedRegistration, DEFAULT_IDENTITY,
};
