//! Routes and the navigation seam used by containers

use std::sync::Mutex;

/// Pages known to the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    /// Admin landing page, served outside this crate
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "/employee/bills",
            Route::NewBill => "/employee/bill/new",
            Route::Dashboard => "/admin/dashboard",
        }
    }
}

/// Containers ask for a page; the host decides how to get there
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Keeps the last requested route
///
/// The HTTP shell turns it into a redirect once the container returns;
/// tests use it to assert on navigation.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    last: Mutex<Option<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last requested route, without consuming it
    pub fn last(&self) -> Option<Route> {
        self.last.lock().ok().and_then(|guard| *guard)
    }

    /// Take the last requested route
    pub fn take(&self) -> Option<Route> {
        self.last.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(path = route.path(), "navigate");
        if let Ok(mut guard) = self.last.lock() {
            *guard = Some(route);
        }
    }
}
