//! Navigation gates conditioned on session presence
//!
//! Decisions are pure so both the browser router and tests can use them.
//! Every redirect keeps the query string of the original location, so a
//! destination can be restored after logging in.

use url::form_urlencoded;

/// Views the access-control contract covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    /// `/`, resolves to one of the other views
    Landing,
    Login,
    Register,
    Todos,
}

impl AppRoute {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Todos => "/todos",
        }
    }

    /// Which gate protects this view
    pub fn guard(&self) -> Guard {
        match self {
            Self::Landing => Guard::Landing,
            Self::Login | Self::Register => Guard::RequireAnonymous,
            Self::Todos => Guard::RequireAuth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Anonymous visitors go to the login view
    RequireAuth,
    /// Logged-in visitors go back home
    RequireAnonymous,
    /// Always redirects based on session presence
    Landing,
}

/// Outcome of evaluating a guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Redirect),
}

/// A replacing navigation to `route` with the original query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub route: AppRoute,
    pub query: String,
}

impl Redirect {
    fn to(route: AppRoute, query: &str) -> Self {
        Self {
            route,
            query: query.trim_start_matches('?').to_string(),
        }
    }

    /// Path plus query, without a dangling `?` when there is no query
    pub fn location(&self) -> String {
        if self.query.is_empty() {
            self.route.path().to_string()
        } else {
            format!("{}?{}", self.route.path(), self.query)
        }
    }

    /// Decoded query pairs, in order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }
}

impl Guard {
    pub fn evaluate(&self, authenticated: bool, query: &str) -> GuardDecision {
        match self {
            Self::RequireAuth => require_auth(authenticated, query),
            Self::RequireAnonymous => require_anonymous(authenticated, query),
            Self::Landing => GuardDecision::Redirect(resolve_landing(authenticated, query)),
        }
    }
}

pub fn require_auth(authenticated: bool, query: &str) -> GuardDecision {
    if authenticated {
        GuardDecision::Render
    } else {
        GuardDecision::Redirect(Redirect::to(AppRoute::Login, query))
    }
}

pub fn require_anonymous(authenticated: bool, query: &str) -> GuardDecision {
    if authenticated {
        GuardDecision::Redirect(Redirect::to(AppRoute::Landing, query))
    } else {
        GuardDecision::Render
    }
}

pub fn resolve_landing(authenticated: bool, query: &str) -> Redirect {
    if authenticated {
        Redirect::to(AppRoute::Todos, query)
    } else {
        Redirect::to(AppRoute::Login, query)
    }
}

/// Decision for visiting `route` in the given session state
pub fn evaluate(route: AppRoute, authenticated: bool, query: &str) -> GuardDecision {
    route.guard().evaluate(authenticated, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect_location(decision: GuardDecision) -> String {
        match decision {
            GuardDecision::Redirect(redirect) => redirect.location(),
            GuardDecision::Render => panic!("expected a redirect"),
        }
    }

    #[test]
    fn anonymous_visit_to_protected_view_keeps_query() {
        let decision = evaluate(AppRoute::Todos, false, "?foo=bar");
        assert_eq!(redirect_location(decision), "/login?foo=bar");
    }

    #[test]
    fn authenticated_visit_to_protected_view_renders() {
        assert_eq!(evaluate(AppRoute::Todos, true, "foo=bar"), GuardDecision::Render);
    }

    #[test]
    fn login_and_register_send_sessions_home() {
        for route in [AppRoute::Login, AppRoute::Register] {
            assert_eq!(redirect_location(evaluate(route, true, "page=2")), "/?page=2");
            assert_eq!(evaluate(route, false, "page=2"), GuardDecision::Render);
        }
    }

    #[test]
    fn landing_always_redirects() {
        assert_eq!(redirect_location(evaluate(AppRoute::Landing, true, "")), "/todos");
        assert_eq!(
            redirect_location(evaluate(AppRoute::Landing, false, "?a=1&b=2")),
            "/login?a=1&b=2"
        );
    }

    #[test]
    fn query_pairs_are_decoded() {
        let redirect = resolve_landing(false, "?search=buy%20milk&page=3");
        assert_eq!(
            redirect.query_pairs(),
            vec![
                ("search".to_string(), "buy milk".to_string()),
                ("page".to_string(), "3".to_string()),
            ]
        );
    }
}
