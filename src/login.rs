use crate::api::Api;
use crate::auth::use_auth;
use crate::route::{use_navigator, Route};
use leptos::ev::SubmitEvent;
use leptos::logging::{error, log};
use leptos::*;

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    let navigator = use_navigator();
    let api = expect_context::<Api>();
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (clicked, set_clicked) = create_signal(false);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if clicked.get_untracked() {
            return;
        }
        set_clicked.set(true);
        let api = api.clone();
        spawn_local(async move {
            let username = username.get_untracked();
            let password = password.get_untracked();
            match auth.login(&api, &username, &password).await {
                Ok(session) => {
                    log!("Logged in as {}", session.username);
                    navigator.push(Route::Destinations(Default::default()));
                }
                Err(err) => error!("Login Failed: {err}"),
            }
            set_clicked.set(false);
        });
    };

    let input = "bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg focus:ring-blue-500 focus:border-blue-500 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white";
    view! {
        <div class="flex items-center justify-center border border-gray-200 bg-gray-50 dark:bg-gray-800 dark:border-gray-700 w-full grow">
            <form class="w-80 space-y-4" on:submit=submit>
                <h1 class="text-xl font-bold text-gray-900 dark:text-white">"Sign in"</h1>
                <div>
                    <label for="username" class="block mb-2 text-sm font-medium text-gray-900 dark:text-white">
                        "Username"
                    </label>
                    <input
                        id="username"
                        type="text"
                        class=input
                        required
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                        prop:value=username
                    />
                </div>
                <div>
                    <label for="password" class="block mb-2 text-sm font-medium text-gray-900 dark:text-white">
                        "Password"
                    </label>
                    <input
                        id="password"
                        type="password"
                        class=input
                        required
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                    />
                </div>
                <button
                    type="submit"
                    class="w-full text-white bg-blue-700 hover:bg-blue-800 focus:ring-4 focus:outline-none focus:ring-blue-300 font-medium rounded-lg text-sm px-5 py-2.5 text-center dark:bg-blue-600 dark:hover:bg-blue-700 dark:focus:ring-blue-800"
                    disabled=move || clicked.get()
                >
                    {move || if clicked.get() { "Logging in..." } else { "Login" }}
                </button>
            </form>
        </div>
    }
}
