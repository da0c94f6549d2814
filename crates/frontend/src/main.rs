mod app;
mod auth;
mod auth_guard;
mod error_messages;
mod pages;
mod routes;

use app::App;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
