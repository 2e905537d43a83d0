use crate::filter::Filter;
use crate::state::Id;
use leptos::ev::MouseEvent;
use leptos::logging::error;
use leptos::*;
use url::form_urlencoded;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Login,
    Destinations(Filter),
    Destination(String),
    Map,
    Chat(Option<Id>),
    NotFound(String),
}

/// Chat ids come back from the backend either as numbers or uuids; the
/// address bar only has text.
fn id_from_text(text: &str) -> Id {
    text.parse::<i64>()
        .map(Id::Num)
        .unwrap_or_else(|_| Id::Text(text.to_string()))
}

/// Path segments stay percent-encoded in a parsed url.
fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

impl Route {
    pub fn parse(location: &str) -> Self {
        let url = match url::Url::parse(&format!("http://someUrl.com{location}")) {
            Ok(url) => url,
            Err(err) => {
                error!("Unparsable location {location}: {err}");
                return Route::NotFound(location.to_string());
            }
        };
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["map"] => Route::Map,
            ["destinations"] => {
                let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
                Route::Destinations(Filter::from_query(
                    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                ))
            }
            ["destinations", id] => Route::Destination(decode_segment(id)),
            ["chat"] => Route::Chat(
                url.query_pairs()
                    .find(|(key, value)| key == "id" && !value.is_empty())
                    .map(|(_, value)| id_from_text(&value)),
            ),
            _ => Route::NotFound(url.path().to_string()),
        }
    }

    pub fn href(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Map => "/map".to_string(),
            Route::Destinations(filter) if filter.is_empty() => "/destinations".to_string(),
            Route::Destinations(filter) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(filter.to_query())
                    .finish();
                format!("/destinations?{query}")
            }
            Route::Destination(id) => format!("/destinations/{}", urlencoding::encode(id)),
            Route::Chat(None) => "/chat".to_string(),
            Route::Chat(Some(id)) => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("id", &id.to_string())
                    .finish();
                format!("/chat?{query}")
            }
            Route::NotFound(path) => path.clone(),
        }
    }
}

fn is_same_page(current: &Route, next: &Route) -> bool {
    current.href() == next.href()
}

fn current_location() -> String {
    let location = window().location();
    let path = location.pathname().unwrap_or_else(|_| "/".to_string());
    let search = location.search().unwrap_or_default();
    format!("{path}{search}")
}

/// The active page, kept in sync with the address bar.
#[derive(Clone, Copy)]
pub struct Navigator {
    route: RwSignal<Route>,
}

impl Navigator {
    pub fn provide() -> Self {
        let route = create_rw_signal(Route::parse(&current_location()));
        let _ = window_event_listener(ev::popstate, move |_| {
            route.set(Route::parse(&current_location()));
        });
        let navigator = Self { route };
        provide_context(navigator);
        navigator
    }

    pub fn route(&self) -> Route {
        self.route.get()
    }

    /// Moves to `route`. Going to the page already shown (a logout handler
    /// and the guard both heading for login) leaves no extra history entry.
    pub fn push(&self, route: Route) {
        let replace = self.route.with_untracked(|current| is_same_page(current, &route));
        self.write_history(&route, replace);
        self.route.set(route);
    }

    /// Updates the address without adding a history entry or re-rendering
    /// the page.
    pub fn replace_address(&self, route: &Route) {
        self.write_history(route, true);
        self.route.set_untracked(route.clone());
    }

    /// Like [`Navigator::replace_address`] but leaves a history entry, so
    /// back returns to the previous state.
    pub fn push_address(&self, route: &Route) {
        self.write_history(route, false);
        self.route.set_untracked(route.clone());
    }

    fn write_history(&self, route: &Route, replace: bool) {
        let href = route.href();
        let result = window().history().and_then(|history| {
            if replace {
                history.replace_state_with_url(&JsValue::NULL, "", Some(&href))
            } else {
                history.push_state_with_url(&JsValue::NULL, "", Some(&href))
            }
        });
        if let Err(err) = result {
            error!("Could not update history to {href}: {err:?}");
        }
    }
}

pub fn use_navigator() -> Navigator {
    expect_context::<Navigator>()
}

#[component]
pub fn Link(
    #[prop(into)] href: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let navigator = use_navigator();
    let target = href.clone();
    let onclick = move |ev: MouseEvent| {
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() {
            return;
        }
        ev.prevent_default();
        navigator.push(Route::parse(&target));
    };
    view! {
        <a href=href class=class on:click=onclick>
            {children()}
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterField, Predicate};

    #[test]
    fn parses_pages() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/map/"), Route::Map);
        assert_eq!(
            Route::parse("/destinations/9b1d-77"),
            Route::Destination("9b1d-77".into())
        );
        assert_eq!(Route::parse("/chat"), Route::Chat(None));
        assert_eq!(Route::parse("/chat?id="), Route::Chat(None));
        assert_eq!(Route::parse("/chat?id=42"), Route::Chat(Some(Id::Num(42))));
        assert_eq!(
            Route::parse("/chat?id=5f0c-aa"),
            Route::Chat(Some(Id::from("5f0c-aa")))
        );
        assert_eq!(
            Route::parse("/nowhere/else"),
            Route::NotFound("/nowhere/else".into())
        );
    }

    #[test]
    fn destinations_carry_their_filter() {
        let route = Route::parse("/destinations?country=New%20Zealand&weekend=true");
        let Route::Destinations(filter) = &route else {
            panic!("unexpected {route:?}");
        };
        assert_eq!(
            filter.predicates()[0],
            Predicate::Equals(FilterField::Country, "New Zealand".into())
        );
        assert_eq!(Route::parse(&route.href()), route);
        assert_eq!(Route::parse("/destinations"), Route::Destinations(Filter::default()));
        assert_eq!(Route::Destinations(Filter::default()).href(), "/destinations");
    }

    #[test]
    fn destination_ids_are_decoded_once() {
        let route = Route::parse("/destinations/S%C3%A3o%20Paulo");
        assert_eq!(route, Route::Destination("São Paulo".into()));
        assert_eq!(route.href(), "/destinations/S%C3%A3o%20Paulo");
        assert_eq!(Route::parse(&route.href()), route);
    }

    #[test]
    fn repeated_navigation_is_recognised() {
        assert!(is_same_page(&Route::Login, &Route::parse("/login")));
        assert!(is_same_page(
            &Route::Chat(Some(Id::Num(3))),
            &Route::parse("/chat?id=3")
        ));
        assert!(!is_same_page(&Route::Home, &Route::Login));
        assert!(!is_same_page(&Route::Chat(None), &Route::Chat(Some(Id::Num(3)))));
    }

    #[test]
    fn hrefs() {
        assert_eq!(Route::Chat(Some(Id::Num(3))).href(), "/chat?id=3");
        assert_eq!(Route::Chat(None).href(), "/chat");
        assert_eq!(Route::Destination("a-1".into()).href(), "/destinations/a-1");
        assert_eq!(Route::Home.href(), "/");
    }
}
