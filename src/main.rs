mod api;
mod app;
mod auth;
mod config;
mod conversation;
mod destinations;
mod detail;
mod error;
mod filter;
mod geo;
mod home;
mod loading;
mod login;
mod map;
mod message;
mod multiselect;
mod nav;
mod route;
mod session;
mod sources;
mod state;
mod transcript;

use app::*;
use leptos::*;

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(|| {
        view! { <App /> }
    })
}
