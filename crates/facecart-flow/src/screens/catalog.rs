//! Catalog screen: build a cart and check out an order for the identity
//! carried over from capture.

use super::{Alert, Outcome};
use crate::services::Services;
use chrono::{DateTime, Utc};
use facecart_core::{
    catalog, ActionGate, Cart, CartError, CatalogParams, Identity, Navigation, OrderViewParams,
    Product, Route, UnsyncedRegistration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    Checkout,
}

pub struct CatalogScreen {
    services: Services,
    params: CatalogParams,
    cart: Cart,
    gate: ActionGate<CatalogAction>,
}

impl CatalogScreen {
    pub fn new(services: Services, params: CatalogParams) -> Self {
        Self {
            services,
            params,
            cart: Cart::new(),
            gate: ActionGate::new(),
        }
    }

    pub fn name(&self) -> &Identity {
        &self.params.name
    }

    pub fn products(&self) -> &'static [Product] {
        catalog::products()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn gate(&self) -> &ActionGate<CatalogAction> {
        &self.gate
    }

    #[cfg(test)]
    pub(crate) fn gate_mut(&mut self) -> &mut ActionGate<CatalogAction> {
        &mut self.gate
    }

    /// Append a product to the cart. Returns the confirmation to show.
    pub fn add_to_cart(&mut self, product_id: &str) -> Result<Alert, CartError> {
        let product = self.cart.add_by_id(product_id)?;
        tracing::debug!(product = %product.name, lines = self.cart.len(), "added to cart");
        Ok(Alert::new("Added", format!("{} added to cart", product.name)))
    }

    pub async fn checkout(&mut self) -> Outcome {
        self.checkout_at(Utc::now()).await
    }

    /// Check out with an explicit order timestamp.
    pub async fn checkout_at(&mut self, now: DateTime<Utc>) -> Outcome {
        if !self.gate.begin(CatalogAction::Checkout) {
            return Outcome::Ignored;
        }
        let outcome = self.run_checkout(now).await;
        self.gate.finish();
        outcome
    }

    async fn run_checkout(&mut self, now: DateTime<Utc>) -> Outcome {
        let order = match self.cart.to_order(now) {
            Ok(order) => order,
            Err(_) => {
                return Outcome::Alert(Alert::new("Cart Empty", "Please select products first"))
            }
        };
        let name = self.params.name.clone();

        if let Err(e) = self.services.store.save(&name, &order) {
            tracing::error!(name = %name, error = %e, "failed to persist order");
            return Outcome::Alert(Alert::error("Something went wrong while creating order"));
        }
        tracing::info!(name = %name, order_id = %order.id, lines = order.products.len(), "order saved");

        let notice = match self
            .services
            .backend
            .register_face(&self.params.face_img, &name)
            .await
        {
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "face registration failed");
                let pending = UnsyncedRegistration {
                    name: name.clone(),
                    face_img: self.params.face_img.clone(),
                    order_id: order.id.clone(),
                    queued_at: now,
                };
                match self.services.store.queue_registration(&pending) {
                    Ok(()) => Some(Alert::new(
                        "Registration Pending",
                        "Your order was saved. Face registration will be retried on the next sync.",
                    )),
                    Err(e) => {
                        tracing::error!(name = %name, error = %e, "failed to queue registration");
                        Some(Alert::error(
                            "Order saved, but face registration failed and could not be queued",
                        ))
                    }
                }
            }
        };

        Outcome::Navigate {
            to: Navigation::Replace(Route::OrderView(OrderViewParams { order, name })),
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, FakeCamera, Harness};
    use chrono::TimeZone;
    use facecart_core::{MemoryOrderStore, Order, OrderStore};

    fn screen(h: &Harness, name: &str) -> CatalogScreen {
        CatalogScreen::new(
            h.services(),
            CatalogParams {
                name: Identity::new(name),
                face_img: h.photo_base64(),
            },
        )
    }

    fn at() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    #[tokio::test]
    async fn test_empty_cart_checkout_neither_persists_nor_navigates() {
        let h = Harness::new(FakeBackend::new(), FakeCamera::with_photo());
        let mut s = screen(&h, "alice");

        let outcome = s.checkout().await;

        assert_eq!(
            outcome,
            Outcome::Alert(Alert::new("Cart Empty", "Please select products first"))
        );
        assert!(h.store.is_empty());
        assert!(h.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_persists_order_registers_face_and_replaces_screen() {
        let h = Harness::new(FakeBackend::new(), FakeCamera::with_photo());
        let mut s = screen(&h, "alice");
        let added = s.add_to_cart("1").unwrap();
        assert_eq!(added, Alert::new("Added", "iPhone 15 added to cart"));

        let outcome = s.checkout_at(at()).await;

        let expected_order = Order {
            id: "1700000000000".into(),
            products: vec![Product::new("1", "iPhone 15", 1200.0)],
        };
        assert_eq!(
            outcome,
            Outcome::Navigate {
                to: Navigation::Replace(Route::OrderView(OrderViewParams {
                    order: expected_order.clone(),
                    name: Identity::new("alice"),
                })),
                notice: None,
            }
        );

        assert_eq!(h.store.len(), 1);
        let raw: serde_json::Value =
            serde_json::from_str(&h.store.raw("order_alice").unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "id": "1700000000000",
                "products": [{"id": "1", "name": "iPhone 15", "price": 1200}]
            })
        );

        let registrations = h.backend.calls_to("register-face");
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].image, h.photo_base64());
        assert_eq!(registrations[0].name.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_duplicate_adds_stay_separate_lines_in_order() {
        let h = Harness::new(FakeBackend::new(), FakeCamera::with_photo());
        let mut s = screen(&h, "bob");
        s.add_to_cart("3").unwrap();
        s.add_to_cart("3").unwrap();
        s.add_to_cart("2").unwrap();

        s.checkout_at(at()).await;

        let order = h.store.load(&Identity::new("bob")).unwrap().unwrap();
        let ids: Vec<_> = order.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "3", "2"]);
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected() {
        let h = Harness::new(FakeBackend::new(), FakeCamera::with_photo());
        let mut s = screen(&h, "bob");
        assert_eq!(s.add_to_cart("99"), Err(CartError::UnknownProduct("99".into())));
        assert!(s.cart().is_empty());
    }

    #[tokio::test]
    async fn test_registration_failure_queues_sync_and_still_navigates() {
        let backend = FakeBackend::new();
        *backend.register.lock().unwrap() = Err(502);
        let h = Harness::new(backend, FakeCamera::with_photo());
        let mut s = screen(&h, "carol");
        s.add_to_cart("2").unwrap();

        let outcome = s.checkout_at(at()).await;

        assert!(matches!(
            outcome.navigation(),
            Some(Navigation::Replace(Route::OrderView(_)))
        ));
        assert_eq!(outcome.alert().map(|a| a.title.as_str()), Some("Registration Pending"));
        assert!(h.store.load(&Identity::new("carol")).unwrap().is_some());

        let pending = h.store.unsynced().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name.as_str(), "carol");
        assert_eq!(pending[0].order_id, "1700000000000");
        assert_eq!(pending[0].face_img, h.photo_base64());
    }

    #[tokio::test]
    async fn test_checkout_while_busy_is_inert() {
        let h = Harness::new(FakeBackend::new(), FakeCamera::with_photo());
        let mut s = screen(&h, "dave");
        s.add_to_cart("1").unwrap();
        s.gate_mut().begin(CatalogAction::Checkout);

        assert_eq!(s.checkout().await, Outcome::Ignored);
        assert!(h.store.is_empty());
        assert_eq!(s.cart().len(), 1);
    }

    struct ReadOnlyStore;

    impl OrderStore for ReadOnlyStore {
        fn load(&self, _: &Identity) -> Result<Option<Order>, facecart_core::StoreError> {
            Ok(None)
        }
        fn save(&self, _: &Identity, _: &Order) -> Result<(), facecart_core::StoreError> {
            Err(facecart_core::StoreError::Poisoned)
        }
        fn queue_registration(
            &self,
            _: &UnsyncedRegistration,
        ) -> Result<(), facecart_core::StoreError> {
            Err(facecart_core::StoreError::Poisoned)
        }
        fn unsynced(&self) -> Result<Vec<UnsyncedRegistration>, facecart_core::StoreError> {
            Ok(Vec::new())
        }
        fn mark_synced(&self, _: &Identity) -> Result<(), facecart_core::StoreError> {
            Ok(())
        }
    }

    /// Persists orders but cannot queue registrations.
    struct NoQueueStore(MemoryOrderStore);

    impl OrderStore for NoQueueStore {
        fn load(&self, name: &Identity) -> Result<Option<Order>, facecart_core::StoreError> {
            self.0.load(name)
        }
        fn save(&self, name: &Identity, order: &Order) -> Result<(), facecart_core::StoreError> {
            self.0.save(name, order)
        }
        fn queue_registration(
            &self,
            _: &UnsyncedRegistration,
        ) -> Result<(), facecart_core::StoreError> {
            Err(facecart_core::StoreError::Poisoned)
        }
        fn unsynced(&self) -> Result<Vec<UnsyncedRegistration>, facecart_core::StoreError> {
            self.0.unsynced()
        }
        fn mark_synced(&self, name: &Identity) -> Result<(), facecart_core::StoreError> {
            self.0.mark_synced(name)
        }
    }

    #[tokio::test]
    async fn test_unqueued_registration_failure_reports_error() {
        let backend = FakeBackend::new();
        *backend.register.lock().unwrap() = Err(502);
        let h = Harness::new(backend, FakeCamera::with_photo());
        let store = std::sync::Arc::new(NoQueueStore(MemoryOrderStore::new()));
        let mut services = h.services();
        services.store = store.clone();
        let mut s = CatalogScreen::new(
            services,
            CatalogParams {
                name: Identity::new("frank"),
                face_img: h.photo_base64(),
            },
        );
        s.add_to_cart("3").unwrap();

        let outcome = s.checkout_at(at()).await;

        assert!(matches!(
            outcome.navigation(),
            Some(Navigation::Replace(Route::OrderView(_)))
        ));
        assert_eq!(
            outcome.alert(),
            Some(&Alert::error(
                "Order saved, but face registration failed and could not be queued"
            ))
        );
        assert!(store.load(&Identity::new("frank")).unwrap().is_some());
        assert!(store.unsynced().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_user_on_catalog_with_cart() {
        let h = Harness::new(FakeBackend::new(), FakeCamera::with_photo());
        let mut services = h.services();
        services.store = std::sync::Arc::new(ReadOnlyStore);
        let mut s = CatalogScreen::new(
            services,
            CatalogParams {
                name: Identity::new("erin"),
                face_img: h.photo_base64(),
            },
        );
        s.add_to_cart("1").unwrap();

        let outcome = s.checkout().await;

        assert_eq!(
            outcome,
            Outcome::Alert(Alert::error("Something went wrong while creating order"))
        );
        assert_eq!(s.cart().len(), 1);
        assert!(h.backend.calls().is_empty());
        assert!(!s.gate().is_busy());
    }
}
