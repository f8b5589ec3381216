//! Typed navigation messages between screens.

use crate::types::{Identity, Order};

/// Capture → Catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogParams {
    pub name: Identity,
    /// Base64 face image, forwarded unchanged for registration at checkout.
    pub face_img: String,
}

/// Capture → Order View and Catalog → Order View.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderViewParams {
    pub order: Order,
    pub name: Identity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Capture,
    Catalog(CatalogParams),
    OrderView(OrderViewParams),
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Capture => "Face Recognition",
            Route::Catalog(_) => "Select Products",
            Route::OrderView(_) => "My Orders",
        }
    }
}

/// How a route enters the stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Push(Route),
    /// Swap out the current screen; there is no going back to it.
    Replace(Route),
}
