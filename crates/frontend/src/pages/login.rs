use super::{bind_input, error_banner};
use crate::auth::use_session;
use crate::error_messages::login_error;
use crate::routes::Route;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let session = use_session();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let onsubmit = {
        let controller = session.controller();
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let submitting = submitting.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if username.trim().is_empty() || password.is_empty() {
                error.set(Some("Enter your username and password.".to_string()));
                return;
            }

            let controller = controller.clone();
            let (user, pass) = (username.trim().to_string(), (*password).clone());
            let error = error.clone();
            let submitting = submitting.clone();
            submitting.set(true);
            spawn_local(async move {
                // On success the route guard moves on by itself
                if let Err(e) = controller.login(&user, &pass).await {
                    error.set(Some(login_error(&e)));
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <main class="auth-page">
            <h1>{"Sign in"}</h1>
            <form {onsubmit}>
                <label>
                    {"Username"}
                    <input type="text" autocomplete="username"
                        value={(*username).clone()} oninput={bind_input(&username)} />
                </label>
                <label>
                    {"Password"}
                    <input type="password" autocomplete="current-password"
                        value={(*password).clone()} oninput={bind_input(&password)} />
                </label>
                { error_banner((*error).as_ref()) }
                <button type="submit" disabled={*submitting}>
                    { if *submitting { "Signing in..." } else { "Sign in" } }
                </button>
            </form>
            <p>
                {"No account yet? "}
                <Link<Route> to={Route::Register}>{"Register"}</Link<Route>>
            </p>
        </main>
    }
}
