//! Navigation gate for protected views.

use crate::routes::Route;

use super::store::SessionStore;

/// Decides whether a navigation attempt may reach its target.
///
/// The check is synchronous and consults the live session on every call;
/// an authorization decision is never cached across navigations.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: SessionStore,
}

impl RouteGuard {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Whether `route` may render right now.
    pub fn allows(&self, route: Route) -> bool {
        !route.requires_auth() || self.store.is_authenticated()
    }

    /// The route that should actually render for a navigation attempt:
    /// the requested one, or the login view for a protected route while
    /// unauthenticated.
    pub fn resolve(&self, requested: Route) -> Route {
        if self.allows(requested) {
            requested
        } else {
            log::debug!(
                "Unauthenticated access to {}, redirecting to {}",
                requested.path(),
                Route::Login.path()
            );
            Route::Login
        }
    }
}
