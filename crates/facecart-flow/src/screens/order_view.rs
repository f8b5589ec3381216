//! Order view: read-only rendering of a stored order.

use facecart_core::{Identity, Order, OrderViewParams};

/// One rendered line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub name: String,
    pub price: String,
}

pub struct OrderView {
    params: OrderViewParams,
}

impl OrderView {
    pub fn new(params: OrderViewParams) -> Self {
        Self { params }
    }

    pub fn order(&self) -> &Order {
        &self.params.order
    }

    pub fn name(&self) -> &Identity {
        &self.params.name
    }

    pub fn title(&self) -> String {
        format!("Orders for {}", self.params.name)
    }

    pub fn rows(&self) -> Vec<OrderRow> {
        self.params
            .order
            .products
            .iter()
            .map(|p| OrderRow {
                name: p.name.clone(),
                price: p.price_label(),
            })
            .collect()
    }

    pub fn total_label(&self) -> String {
        format!("${}", self.params.order.total())
    }
}
