use crate::api::Api;
use crate::auth::{Auth, Protected};
use crate::config::Config;
use crate::conversation::ChatPage;
use crate::destinations::Destinations;
use crate::detail::DestinationDetail;
use crate::home::Home;
use crate::loading::Failure;
use crate::login::Login;
use crate::map::MapPage;
use crate::nav::Navbar;
use crate::route::{Link, Navigator, Route};
use leptos::logging::error;
use leptos::*;

#[component]
pub fn App() -> impl IntoView {
    let config = Config::from_env();
    let navigator = Navigator::provide();
    let auth = Auth::provide(&config);
    auth.restore();

    let api = match Api::new(&config) {
        Ok(api) => api,
        Err(err) => {
            error!("Cannot reach backend at {}: {err}", config.backend_url);
            return view! { <Failure message=err.to_string() /> }.into_view();
        }
    };
    provide_context(api);

    let page = move || match navigator.route() {
        Route::Login => view! { <Login /> }.into_view(),
        Route::Home => view! {
            <Protected>
                <Home />
            </Protected>
        }
        .into_view(),
        Route::Destinations(filter) => view! {
            <Protected>
                <Destinations filter=filter.clone() />
            </Protected>
        }
        .into_view(),
        Route::Destination(id) => view! {
            <Protected>
                <DestinationDetail id=id.clone() />
            </Protected>
        }
        .into_view(),
        Route::Map => view! {
            <Protected>
                <MapPage />
            </Protected>
        }
        .into_view(),
        Route::Chat(chat_id) => view! {
            <Protected>
                <ChatPage initial=chat_id.clone() />
            </Protected>
        }
        .into_view(),
        Route::NotFound(path) => view! {
            <div class="p-6 dark:text-white">
                <h1 class="text-2xl font-bold mb-4">"Page not found"</h1>
                <p class="mb-4 text-gray-500">{path}</p>
                <Link href="/" class="text-blue-600 underline">
                    "Back home"
                </Link>
            </div>
        }
        .into_view(),
    };

    view! {
        <div class="flex flex-col min-h-dvh dark:bg-gray-900">
            <Navbar />
            <main class="grow flex flex-col">{page}</main>
        </div>
    }
    .into_view()
}
