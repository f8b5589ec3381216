//! The fixed product catalog offered on the catalog screen.

use crate::types::Product;
use std::sync::OnceLock;

static CATALOG: OnceLock<Vec<Product>> = OnceLock::new();

/// All products, in display order.
pub fn products() -> &'static [Product] {
    CATALOG.get_or_init(|| {
        vec![
            Product::new("1", "iPhone 15", 1200.0),
            Product::new("2", "MacBook Pro", 2500.0),
            Product::new("3", "AirPods Pro", 250.0),
        ]
    })
}

/// Look up a product by id.
pub fn lookup(id: &str) -> Option<&'static Product> {
    products().iter().find(|p| p.id == id)
}
