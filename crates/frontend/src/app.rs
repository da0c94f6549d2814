//! Root component

use crate::auth::SessionProvider;
use crate::routes::{Route, switch};
use todo_http::client::DEFAULT_BASE_URL;
use yew::prelude::*;
use yew_router::prelude::*;

/// API server address: the page's own origin, since the API serves the app
fn api_base_url() -> AttrValue {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .filter(|origin| !origin.is_empty() && origin != "null")
        .map_or_else(|| AttrValue::Static(DEFAULT_BASE_URL), AttrValue::from)
}

#[function_component(App)]
pub fn app() -> Html {
    let base_url = use_memo((), |_| api_base_url());

    html! {
        <SessionProvider base_url={(*base_url).clone()}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </SessionProvider>
    }
}
