//! What the pages can ask of their host: show an alert, change route.

use std::sync::Mutex;

use vidinsight_core::Route;

pub trait Shell: Send + Sync {
    /// User-facing alert. Never fatal.
    fn alert(&self, message: &str);

    fn navigate(&self, route: Route);
}

/// Terminal host: alerts go to stderr, the last navigation is kept for the caller.
#[derive(Debug, Default)]
pub struct ConsoleShell {
    current: Mutex<Option<Route>>,
}

impl ConsoleShell {
    pub fn current_route(&self) -> Option<Route> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Shell for ConsoleShell {
    fn alert(&self, message: &str) {
        tracing::warn!(message, "Alert");
        eprintln!("{}", message);
    }

    fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "Navigating");
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(route);
    }
}
