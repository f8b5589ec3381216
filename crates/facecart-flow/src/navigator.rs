//! Stack navigator over typed routes.

use facecart_core::{Navigation, Route};

#[derive(Debug)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    /// Start on the capture screen.
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Capture],
        }
    }

    pub fn current(&self) -> &Route {
        // The stack is never emptied: `back` refuses to pop the root.
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn apply(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Push(route) => self.stack.push(route),
            Navigation::Replace(route) => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                    self.stack.push(route);
                } else {
                    self.stack[0] = route;
                }
            }
        }
        tracing::debug!(screen = self.current().title(), depth = self.depth(), "navigated");
    }

    /// Pop the current route. Returns `false` at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
