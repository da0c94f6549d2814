//! Browser routes

use crate::auth_guard::{Landing, RequireAnonymous, RequireAuth};
use crate::pages::{LoginPage, RegisterPage, TodosPage};
use todo_core::AppRoute;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub enum Route {
    #[at("/")]
    Landing,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/todos")]
    Todos,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl From<AppRoute> for Route {
    fn from(route: AppRoute) -> Self {
        match route {
            AppRoute::Landing => Self::Landing,
            AppRoute::Login => Self::Login,
            AppRoute::Register => Self::Register,
            AppRoute::Todos => Self::Todos,
        }
    }
}

pub fn switch(route: Route) -> Html {
    match route {
        Route::Landing => html! { <Landing /> },
        Route::Login => html! {
            <RequireAnonymous><LoginPage /></RequireAnonymous>
        },
        Route::Register => html! {
            <RequireAnonymous><RegisterPage /></RequireAnonymous>
        },
        Route::Todos => html! {
            <RequireAuth><TodosPage /></RequireAuth>
        },
        // Unknown paths resolve the same way as the landing page
        Route::NotFound => html! { <Landing /> },
    }
}
