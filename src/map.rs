use crate::api::Api;
use crate::auth::use_auth;
use crate::filter::Filter;
use crate::geo::{markers, Marker, Viewport};
use crate::loading::{Failure, Loading};
use crate::route::{use_navigator, Link, Route};
use leptos::logging::{error, log};
use leptos::*;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 560.0;
const PADDING: f64 = 50.0;

#[component]
fn MarkerPin(marker: Marker, viewport: Viewport) -> impl IntoView {
    let navigator = use_navigator();
    let (x, y) = viewport.project(marker.lat, marker.lon);
    let (label_x, label_y) = (x + 9.0, y + 4.0);
    let id = marker.id.clone();
    let tooltip = marker.tooltip();
    view! {
        <g class="cursor-pointer" on:click=move |_| navigator.push(Route::Destination(id.clone()))>
            <title>{tooltip}</title>
            <circle cx=x cy=y r="6" fill="#2563eb" stroke="white" stroke-width="2" />
            <text x=label_x y=label_y font-size="11" fill="currentColor">
                {marker.title}
            </text>
        </g>
    }
}

#[component]
pub fn MapPage() -> impl IntoView {
    let auth = use_auth();
    let api = expect_context::<Api>();
    let destinations = create_local_resource(
        || (),
        move |_| {
            let api = api.clone();
            let credentials = auth.credentials();
            async move {
                match api.destinations(&credentials, &Filter::default()).await {
                    Ok(listing) => Ok(listing.into_parts().0),
                    Err(err) => {
                        error!("Failed to fetch destinations for the map: {err}");
                        Err(err.to_string())
                    }
                }
            }
        },
    );

    view! {
        <Suspense fallback=move || view! { <Loading /> }>
            {move || {
                destinations
                    .get()
                    .map(|destinations| match destinations {
                        Err(err) => view! { <Failure message=err /> }.into_view(),
                        Ok(destinations) => {
                            let markers = markers(&destinations);
                            log!("{} of {} destinations have coordinates", markers.len(), destinations.len());
                            let viewport = Viewport::fit(&markers, WIDTH, HEIGHT, PADDING);
                            let bounds = viewport.bounds();
                            log!(
                                "Map view: lat {:.2}..{:.2}, lon {:.2}..{:.2}",
                                bounds.south, bounds.north, bounds.west, bounds.east
                            );
                            let legend = markers
                                .iter()
                                .map(|marker| {
                                    let title = marker.title.clone();
                                    view! {
                                        <li>
                                            <Link href=marker.href.clone() class="text-blue-600 underline">
                                                {title.clone()}
                                            </Link>
                                            {format!(" · Region: {}", marker.region)}
                                        </li>
                                    }
                                })
                                .collect::<Vec<_>>();
                            let pins = markers
                                .into_iter()
                                .map(|marker| view! { <MarkerPin marker=marker viewport=viewport /> })
                                .collect::<Vec<_>>();
                            view! {
                                <div class="p-4 dark:text-white">
                                    <svg
                                        viewBox=format!("0 0 {WIDTH} {HEIGHT}")
                                        class="w-full h-[80vh] bg-sky-50 dark:bg-gray-800 rounded border dark:border-gray-700"
                                    >
                                        {pins}
                                    </svg>
                                    <ul class="mt-4 grid gap-1 md:grid-cols-3 text-sm">{legend}</ul>
                                </div>
                            }
                            .into_view()
                        }
                    })
            }}
        </Suspense>
    }
}
