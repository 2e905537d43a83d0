use crate::api::Api;
use crate::auth::use_auth;
use crate::error::Result;
use crate::filter::{
    hint_for, options_from_destinations, options_from_possible_values, Filter, OptionSet,
    Selection,
};
use crate::loading::{Failure, Loading};
use crate::multiselect::MultiSelect;
use crate::route::{use_navigator, Link, Route};
use crate::session::Credentials;
use crate::state::{Destination, DynamicFilter, Score};
use leptos::logging::{error, warn};
use leptos::*;

#[derive(Debug, Clone)]
struct Catalog {
    destinations: Vec<Destination>,
    options: Vec<OptionSet>,
    hints: Vec<DynamicFilter>,
}

/// Listing and filter hints are independent, so both requests go out
/// together. Losing the hints only costs the questions next to each field.
async fn load_catalog(api: Api, credentials: Credentials, filter: Filter) -> Result<Catalog> {
    let (listing, hints) = futures::join!(
        api.destinations(&credentials, &filter),
        api.dynamic_filters(&credentials, &filter)
    );
    let (destinations, possible_values) = listing?.into_parts();
    let hints = hints.unwrap_or_else(|err| {
        warn!("Failed to fetch dynamic filters: {err}");
        Vec::new()
    });
    let options = match possible_values {
        Some(possible) if !possible.is_empty() => options_from_possible_values(&possible),
        _ => options_from_destinations(&destinations),
    };
    Ok(Catalog {
        destinations,
        options,
        hints,
    })
}

#[component]
fn DestinationRow(destination: Destination) -> impl IntoView {
    let trips = destination
        .trips()
        .into_iter()
        .map(|trip| trip.label())
        .collect::<Vec<_>>()
        .join(", ");
    let score = |score: Score| {
        destination
            .score(score)
            .map(|value| value.to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let scores = format!(
        "Scores: 🌍{} 🏖️{} 🎭{}",
        score(Score::Nature),
        score(Score::Beaches),
        score(Score::Culture)
    );
    let budget = destination.budget_level.clone().unwrap_or_else(|| "-".to_string());
    view! {
        <li class="border rounded p-4 flex justify-between items-center dark:border-gray-700">
            <div>
                <h2 class="text-xl font-semibold">
                    {format!("{}, {}", destination.city, destination.country)}
                </h2>
                <p class="text-gray-600 dark:text-gray-400">
                    {format!("Region: {} | Budget: {budget}", destination.region)}
                </p>
                <p class="text-gray-600 dark:text-gray-400">{scores}</p>
                <p class="text-gray-600 dark:text-gray-400">{format!("Trips: {trips}")}</p>
            </div>
            <Link href=destination.href() class="ml-4 px-3 py-1 bg-blue-600 text-white rounded">
                "View Details"
            </Link>
        </li>
    }
}

#[component]
pub fn Destinations(filter: Filter) -> impl IntoView {
    let auth = use_auth();
    let navigator = use_navigator();
    let api = expect_context::<Api>();

    let selection = create_rw_signal(Selection::from_filter(&filter));
    let applied = create_rw_signal(filter);

    let catalog = create_local_resource(
        move || applied.get(),
        move |filter| {
            let api = api.clone();
            let credentials = auth.credentials();
            async move {
                load_catalog(api, credentials, filter).await.map_err(|err| {
                    error!("Failed to fetch destinations: {err}");
                    err.to_string()
                })
            }
        },
    );

    let apply = move |_| {
        let filter = selection.with_untracked(Selection::to_filter);
        navigator.replace_address(&Route::Destinations(filter.clone()));
        applied.set(filter);
    };
    let reset = move |_| selection.update(Selection::clear);

    view! {
        <div class="p-6 dark:text-white">
            <h1 class="text-2xl font-bold mb-4">"Destinations"</h1>
            <Transition fallback=move || view! { <Loading label="Loading destinations..." /> }>
                {move || {
                    catalog
                        .get()
                        .map(|catalog| match catalog {
                            Err(err) => view! { <Failure message=err /> }.into_view(),
                            Ok(catalog) => {
                                let hints = catalog.hints.clone();
                                let panels = catalog
                                    .options
                                    .into_iter()
                                    .filter(|set| !set.options.is_empty())
                                    .map(|set| {
                                        let hint = hint_for(set.field, &hints).cloned();
                                        view! { <MultiSelect options=set hint=hint selection=selection /> }
                                    })
                                    .collect::<Vec<_>>();
                                let list = if catalog.destinations.is_empty() {
                                    view! { <p>"No destinations found."</p> }.into_view()
                                } else {
                                    view! {
                                        <ul class="space-y-4">
                                            {catalog
                                                .destinations
                                                .into_iter()
                                                .map(|destination| view! { <DestinationRow destination=destination /> })
                                                .collect::<Vec<_>>()}
                                        </ul>
                                    }
                                    .into_view()
                                };
                                view! {
                                    <div class="grid gap-2 md:grid-cols-3 mb-4">{panels}</div>
                                    <div class="flex gap-2 mb-6">
                                        <button
                                            type="button"
                                            class="px-4 py-2 bg-blue-600 text-white rounded"
                                            on:click=apply
                                        >
                                            "Apply filters"
                                        </button>
                                        <button
                                            type="button"
                                            class="px-4 py-2 border rounded disabled:opacity-50"
                                            disabled=move || selection.with(Selection::is_empty)
                                            on:click=reset
                                        >
                                            "Reset"
                                        </button>
                                    </div>
                                    {list}
                                }
                                .into_view()
                            }
                        })
                }}
            </Transition>
        </div>
    }
}
