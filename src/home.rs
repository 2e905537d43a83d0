use crate::api::Api;
use crate::auth::use_auth;
use crate::route::{use_navigator, Link, Route};
use crate::state::{Destination, NewDestination};
use leptos::ev::SubmitEvent;
use leptos::logging::{error, log};
use leptos::*;

#[component]
fn Field(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div class="mb-3">
            <label for=id class="block mb-1 text-sm font-medium text-gray-900 dark:text-white">
                {label}
            </label>
            <input
                id=id
                type="text"
                required
                class="bg-gray-50 border border-gray-300 text-gray-900 text-sm rounded-lg block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:text-white"
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
            />
        </div>
    }
}

#[component]
pub fn Home() -> impl IntoView {
    let auth = use_auth();
    let navigator = use_navigator();
    let api = expect_context::<Api>();

    let city = create_rw_signal(String::new());
    let country = create_rw_signal(String::new());
    let region = create_rw_signal(String::new());
    let longitude = create_rw_signal(String::new());
    let latitude = create_rw_signal(String::new());
    let created = create_rw_signal(Vec::<Destination>::new());
    let (saving, set_saving) = create_signal(false);

    let create_destination = move |ev: SubmitEvent| {
        ev.prevent_default();
        let new = NewDestination {
            city: city.get_untracked(),
            country: country.get_untracked(),
            region: region.get_untracked(),
            longitude: longitude.get_untracked(),
            latitude: latitude.get_untracked(),
        };
        if !new.is_complete() || saving.get_untracked() {
            return;
        }
        set_saving.set(true);
        let api = api.clone();
        let credentials = auth.credentials();
        spawn_local(async move {
            match api.create_destination(&credentials, &new).await {
                Ok(destination) => {
                    log!("Created destination {}", destination.id);
                    created.update(|created| created.push(destination));
                    for field in [city, country, region, longitude, latitude] {
                        field.set(String::new());
                    }
                }
                Err(err) => error!("Failed to create destinations: {err}"),
            }
            set_saving.set(false);
        });
    };

    let logout = move |_| {
        auth.logout();
        navigator.push(Route::Login);
    };

    view! {
        <div class="container mx-auto p-6 dark:text-white">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-bold">
                    "Welcome"
                    {move || auth.session().map(|session| format!(", {}", session.username))}
                    "!"
                </h1>
                <button
                    type="button"
                    class="text-white bg-red-700 hover:bg-red-800 font-medium rounded-lg text-sm px-5 py-2.5"
                    on:click=logout
                >
                    "Logout"
                </button>
            </div>

            <section class="border rounded-lg p-4 mb-6 dark:border-gray-700">
                <h2 class="text-xl font-semibold mb-4">"Create Destination"</h2>
                <form on:submit=create_destination>
                    <Field id="destinationCity" label="Destination City" value=city />
                    <Field id="destinationCountry" label="Destination Country" value=country />
                    <Field id="destinationRegion" label="Destination Region" value=region />
                    <Field id="destinationLongitude" label="Destination Longitude" value=longitude />
                    <Field id="destinationLatitude" label="Destination Latitude" value=latitude />
                    <button
                        type="submit"
                        class="text-white bg-blue-700 hover:bg-blue-800 font-medium rounded-lg text-sm px-5 py-2.5"
                        disabled=move || saving.get()
                    >
                        "Create Destination"
                    </button>
                </form>
            </section>

            <Show when=move || created.with(|created| !created.is_empty())>
                <section>
                    <h2 class="text-xl font-semibold mb-2">"Created this session"</h2>
                    <ul class="space-y-2">
                        <For
                            each=move || created.get()
                            key=|destination| destination.id.clone()
                            children=move |destination| {
                                view! {
                                    <li>
                                        <Link href=destination.href() class="text-blue-600 underline">
                                            {format!("{}, {}", destination.city, destination.country)}
                                        </Link>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </section>
            </Show>
        </div>
    }
}
