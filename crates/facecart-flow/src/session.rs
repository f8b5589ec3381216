//! Session host: owns the navigator and the mounted screen.
//!
//! Mounting a route builds a fresh screen from its typed parameters and
//! drops the previous one, which discards its photo and cart.

use crate::navigator::Navigator;
use crate::screens::{CaptureScreen, CatalogScreen, OrderView, Outcome};
use crate::services::Services;
use facecart_core::Route;

pub enum Screen {
    Capture(CaptureScreen),
    Catalog(CatalogScreen),
    Orders(OrderView),
}

pub struct Session {
    services: Services,
    navigator: Navigator,
    screen: Screen,
}

impl Session {
    pub fn new(services: Services) -> Self {
        let screen = Screen::Capture(CaptureScreen::new(services.clone()));
        Self {
            services,
            navigator: Navigator::new(),
            screen,
        }
    }

    pub fn route(&self) -> &Route {
        self.navigator.current()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn capture_mut(&mut self) -> Option<&mut CaptureScreen> {
        match &mut self.screen {
            Screen::Capture(s) => Some(s),
            _ => None,
        }
    }

    pub fn catalog_mut(&mut self) -> Option<&mut CatalogScreen> {
        match &mut self.screen {
            Screen::Catalog(s) => Some(s),
            _ => None,
        }
    }

    pub fn orders(&self) -> Option<&OrderView> {
        match &self.screen {
            Screen::Orders(v) => Some(v),
            _ => None,
        }
    }

    /// Apply a screen outcome. Returns `true` when the mounted screen changed.
    pub fn apply(&mut self, outcome: &Outcome) -> bool {
        let Some(navigation) = outcome.navigation() else {
            return false;
        };
        self.navigator.apply(navigation.clone());
        self.mount();
        true
    }

    /// Go back one screen. The previous screen is rebuilt from its route.
    pub fn back(&mut self) -> bool {
        if !self.navigator.back() {
            return false;
        }
        self.mount();
        true
    }

    fn mount(&mut self) {
        let services = self.services.clone();
        self.screen = match self.navigator.current().clone() {
            Route::Capture => Screen::Capture(CaptureScreen::new(services)),
            Route::Catalog(params) => Screen::Catalog(CatalogScreen::new(services, params)),
            Route::OrderView(params) => Screen::Orders(OrderView::new(params)),
        };
    }
}
