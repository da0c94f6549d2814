use super::{bind_input, error_banner};
use crate::auth::use_session;
use crate::error_messages::session_error;
use crate::routes::Route;
use todo_http::types::RegisterRequest;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(RegisterPage)]
pub fn register_page() -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let username = use_state(String::new);
    let email = use_state(String::new);
    let name = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let submitting = use_state(|| false);

    let onsubmit = {
        let controller = session.controller();
        let fields = (username.clone(), email.clone(), name.clone(), password.clone());
        let error = error.clone();
        let submitting = submitting.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let (username, email, name, password) = &fields;
            let account = RegisterRequest {
                username: username.trim().to_string(),
                email: email.trim().to_string(),
                name: name.trim().to_string(),
                password: (**password).clone(),
            };
            if account.username.is_empty()
                || account.email.is_empty()
                || account.name.is_empty()
                || account.password.is_empty()
            {
                error.set(Some("All fields are required.".to_string()));
                return;
            }

            let controller = controller.clone();
            let navigator = navigator.clone();
            let error = error.clone();
            let submitting = submitting.clone();
            submitting.set(true);
            spawn_local(async move {
                match controller.register(&account).await {
                    Ok(_) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Login);
                        }
                    }
                    Err(e) => {
                        error.set(Some(session_error(&e)));
                        submitting.set(false);
                    }
                }
            });
        })
    };

    html! {
        <main class="auth-page">
            <h1>{"Create an account"}</h1>
            <form {onsubmit}>
                <label>
                    {"Username"}
                    <input type="text" autocomplete="username"
                        value={(*username).clone()} oninput={bind_input(&username)} />
                </label>
                <label>
                    {"Email"}
                    <input type="email" autocomplete="email"
                        value={(*email).clone()} oninput={bind_input(&email)} />
                </label>
                <label>
                    {"Name"}
                    <input type="text" autocomplete="name"
                        value={(*name).clone()} oninput={bind_input(&name)} />
                </label>
                <label>
                    {"Password"}
                    <input type="password" autocomplete="new-password"
                        value={(*password).clone()} oninput={bind_input(&password)} />
                </label>
                { error_banner((*error).as_ref()) }
                <button type="submit" disabled={*submitting}>{"Register"}</button>
            </form>
            <p>
                {"Already registered? "}
                <Link<Route> to={Route::Login}>{"Sign in"}</Link<Route>>
            </p>
        </main>
    }
}
