//! Route guard components
//!
//! Each gate evaluates the shared guard rules against the current session
//! and replaces the location when the rules say so, carrying the query
//! string along.

use crate::auth::use_session;
use crate::routes::Route;
use todo_core::{Guard, GuardDecision, Redirect};
use tracing::{debug, warn};
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct GuardProps {
    #[prop_or_default]
    pub children: Children,
}

#[derive(Properties, PartialEq)]
struct GateProps {
    guard: Guard,
    #[prop_or_default]
    children: Children,
}

#[function_component(Gate)]
fn gate(props: &GateProps) -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let query = use_location()
        .map(|location| location.query_str().to_string())
        .unwrap_or_default();

    // Nothing is decided until the startup probe settles
    let decision =
        (!session.restoring).then(|| props.guard.evaluate(session.is_authenticated(), &query));

    use_effect_with(decision.clone(), move |decision| {
        if let Some(GuardDecision::Redirect(redirect)) = decision
            && let Some(navigator) = &navigator
        {
            follow(navigator, redirect);
        }
    });

    match decision {
        None => html! {
            <div class="loading">
                <p>{"Checking session..."}</p>
            </div>
        },
        Some(GuardDecision::Render) => html! { <>{ props.children.clone() }</> },
        Some(GuardDecision::Redirect(_)) => html! {},
    }
}

fn follow(navigator: &Navigator, redirect: &Redirect) {
    let route = Route::from(redirect.route);
    debug!(to = %redirect.location(), "Guard redirect");

    if redirect.query.is_empty() {
        navigator.replace(&route);
    } else if let Err(error) = navigator.replace_with_query(&route, &redirect.query_pairs()) {
        warn!("Could not keep query on redirect: {error}");
        navigator.replace(&route);
    }
}

/// Renders its children only with a session, otherwise goes to the login view
#[function_component(RequireAuth)]
pub fn require_auth(props: &GuardProps) -> Html {
    html! { <Gate guard={Guard::RequireAuth}>{ props.children.clone() }</Gate> }
}

/// Renders its children only without a session, otherwise goes home
#[function_component(RequireAnonymous)]
pub fn require_anonymous(props: &GuardProps) -> Html {
    html! { <Gate guard={Guard::RequireAnonymous}>{ props.children.clone() }</Gate> }
}

/// Sends every visitor to the to-do list or the login view
#[function_component(Landing)]
pub fn landing() -> Html {
    html! { <Gate guard={Guard::Landing} /> }
}
