mod login;
mod register;
mod todos;

pub use login::LoginPage;
pub use register::RegisterPage;
pub use todos::TodosPage;

use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Keep `state` in sync with a text input
fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |event: InputEvent| {
        state.set(event.target_unchecked_into::<HtmlInputElement>().value());
    })
}

fn error_banner(error: Option<&String>) -> Html {
    error.map_or_else(
        || html! {},
        |message| html! { <p class="error" role="alert">{ message.clone() }</p> },
    )
}
