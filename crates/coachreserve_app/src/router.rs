//! Paths, routes and the session guard.

use coachreserve_common::models::Session;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Auth,
    Booking,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Auth => "/auth",
            Route::Booking => "/booking",
        }
    }

    /// Resolves a path. Query, fragment and trailing slashes are ignored;
    /// anything unknown is the landing page.
    pub fn from_path(path: &str) -> Route {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim()
            .trim_end_matches('/');
        match path {
            "/auth" | "auth" => Route::Auth,
            "/booking" | "booking" => Route::Booking,
            _ => Route::Landing,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of running the guard on a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow(Route),
    Redirect { from: Route, to: Route },
}

impl Guard {
    /// The route that ends up mounted.
    pub fn target(&self) -> Route {
        match *self {
            Guard::Allow(route) => route,
            Guard::Redirect { to, .. } => to,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Guard::Redirect { .. })
    }
}

/// Booking needs a session; the auth page is only for signed-out visitors.
pub fn guard(route: Route, session: Option<&Session>) -> Guard {
    match (route, session) {
        (Route::Booking, None) => Guard::Redirect {
            from: Route::Booking,
            to: Route::Auth,
        },
        (Route::Auth, Some(_)) => Guard::Redirect {
            from: Route::Auth,
            to: Route::Landing,
        },
        (route, _) => Guard::Allow(route),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::session_for;

    #[test]
    fn test_paths_round_trip() {
        for route in [Route::Landing, Route::Auth, Route::Booking] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_path_normalisation() {
        assert_eq!(Route::from_path("/booking/"), Route::Booking);
        assert_eq!(Route::from_path("/auth?tab=signup"), Route::Auth);
        assert_eq!(Route::from_path("/#access_token=x"), Route::Landing);
        assert_eq!(Route::from_path("/admin"), Route::Landing);
        assert_eq!(Route::from_path(""), Route::Landing);
    }

    #[test]
    fn test_booking_without_session_redirects_to_auth() {
        assert_eq!(
            guard(Route::Booking, None),
            Guard::Redirect {
                from: Route::Booking,
                to: Route::Auth
            }
        );
    }

    #[test]
    fn test_signed_in_visitor_skips_auth() {
        let session = session_for("a");
        assert_eq!(guard(Route::Auth, Some(&session)).target(), Route::Landing);
        assert_eq!(
            guard(Route::Booking, Some(&session)),
            Guard::Allow(Route::Booking)
        );
        assert!(!guard(Route::Landing, None).is_redirect());
    }
}
