//! Client-side routes and the navigator publishing the active one.

use std::sync::Arc;
use tokio::sync::watch;

/// Views the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Plan,
    Venues,
    Courses,
    Timetable,
}

impl Route {
    /// Whether the route sits behind the route guard.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Home | Route::Login)
    }

    /// Browser-style path, used for logging and deep links.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/home-page",
            Route::Login => "/login",
            Route::Plan => "/plan",
            Route::Venues => "/venues",
            Route::Courses => "/courses",
            Route::Timetable => "/time-table",
        }
    }
}

/// Publishes the active route over a watch channel so views can react to
/// navigation without polling.
#[derive(Debug, Clone)]
pub struct Navigator {
    sender: Arc<watch::Sender<Route>>,
    receiver: watch::Receiver<Route>,
}

impl Navigator {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(Route::Login);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn current(&self) -> Route {
        *self.receiver.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.receiver.clone()
    }

    /// Switches the active route unconditionally. Navigation that must
    /// respect authentication goes through [`crate::session::RouteGuard`]
    /// instead.
    pub fn go(&self, route: Route) {
        log::debug!("navigating to {}", route.path());
        let _ = self.sender.send(route);
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
