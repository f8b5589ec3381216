//! In-memory cart for the catalog screen.

use crate::catalog;
use crate::types::{Order, Product};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CartError {
    #[error("unknown product: {0}")]
    UnknownProduct(String),
    #[error("cart is empty")]
    Empty,
}

/// Ordered line items. Adding the same product twice yields two lines;
/// there is no quantity field.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalog product by id.
    pub fn add_by_id(&mut self, id: &str) -> Result<&'static Product, CartError> {
        let product = catalog::lookup(id).ok_or_else(|| CartError::UnknownProduct(id.to_string()))?;
        self.items.push(product.clone());
        Ok(product)
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|p| p.price).sum()
    }

    /// Snapshot the cart into an order. The cart itself is left untouched so
    /// a failed checkout keeps it intact.
    pub fn to_order(&self, created_at: DateTime<Utc>) -> Result<Order, CartError> {
        if self.items.is_empty() {
            return Err(CartError::Empty);
        }
        Ok(Order::new(self.items.clone(), created_at))
    }
}
