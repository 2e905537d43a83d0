use crate::api::Api;
use crate::auth::use_auth;
use crate::filter::{Filter, FilterField, Predicate};
use crate::loading::{Failure, Loading};
use crate::route::{Link, Route};
use crate::state::{Destination, Score, TripType};
use leptos::logging::error;
use leptos::*;

#[component]
fn Facts(destination: Destination) -> impl IntoView {
    let scores = Score::ALL
        .into_iter()
        .map(|score| {
            let value = destination
                .score(score)
                .map(|value| value.to_string())
                .unwrap_or_else(|| "-".to_string());
            view! {
                <li>
                    <strong>{format!("{}:", score.name())}</strong>
                    " "
                    {value}
                </li>
            }
        })
        .collect::<Vec<_>>();
    let trips = TripType::ALL
        .into_iter()
        .map(|trip| {
            let answer = if destination.has_trip(trip) { "Yes" } else { "No" };
            view! {
                <li>
                    <strong>{format!("{}:", trip.label())}</strong>
                    " "
                    {answer}
                </li>
            }
        })
        .collect::<Vec<_>>();
    let same_country = Route::Destinations(Filter::new(vec![Predicate::Equals(
        FilterField::Country,
        destination.country.clone(),
    )]))
    .href();
    let coords = format!(
        "{}, {}",
        destination.latitude.as_deref().unwrap_or("?"),
        destination.longitude.as_deref().unwrap_or("?")
    );

    view! {
        <div class="p-6 dark:text-white">
            <h1 class="text-2xl font-bold mb-4">
                {format!("{}, {}", destination.city, destination.country)}
            </h1>
            {destination
                .short_description
                .clone()
                .map(|description| view! { <p class="mb-4 text-gray-600 dark:text-gray-400">{description}</p> })}
            <p>
                <strong>"Region:"</strong>
                " "
                {destination.region.clone()}
            </p>
            <p>
                <strong>"Budget:"</strong>
                " "
                {destination.budget_level.clone().unwrap_or_else(|| "-".to_string())}
            </p>
            <p>
                <strong>"Coords:"</strong>
                " "
                {coords}
            </p>

            <h2 class="mt-4 text-xl">"Scores"</h2>
            <ul class="list-disc ml-5">{scores}</ul>

            <h2 class="mt-4 text-xl">"Trip Options"</h2>
            <ul class="list-disc ml-5">{trips}</ul>

            <p class="mt-6">
                <Link href=same_country class="text-blue-600 underline">
                    {format!("More in {}", destination.country)}
                </Link>
            </p>
        </div>
    }
}

#[component]
pub fn DestinationDetail(id: String) -> impl IntoView {
    let auth = use_auth();
    let api = expect_context::<Api>();
    let destination = create_local_resource(
        move || id.clone(),
        move |id| {
            let api = api.clone();
            let credentials = auth.credentials();
            async move {
                api.destination(&credentials, &id).await.map_err(|err| {
                    error!("Failed to fetch destination {id}: {err}");
                    err.to_string()
                })
            }
        },
    );

    view! {
        <Suspense fallback=move || view! { <Loading /> }>
            {move || {
                destination
                    .get()
                    .map(|destination| match destination {
                        Ok(destination) => view! { <Facts destination=destination /> }.into_view(),
                        Err(err) => view! { <Failure message=err /> }.into_view(),
                    })
            }}
        </Suspense>
    }
}
