use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::session::Credentials;
use crate::state::{
    Chat, Destination, DestinationListing, DynamicFilter, History, Id, Message, NewChat,
    NewDestination, Prompt, Reply, TokenResponse,
};
use leptos::logging::log;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

/// Handle on the travel backend. Cheap to clone; every call takes the
/// credentials it should run with.
#[derive(Clone, Debug)]
pub struct Api {
    base: Url,
    client: Client,
}

impl Api {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.backend_url)?;
        if base.cannot_be_a_base() {
            return Err(Error::BaseUrl(config.backend_url.clone()));
        }
        Ok(Self {
            base,
            client: Client::new(),
        })
    }

    /// `segments` are appended to the base path and percent-encoded. The
    /// backend is picky about trailing slashes on some routes.
    fn endpoint(&self, segments: &[&str], trailing_slash: bool) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::BaseUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
            if trailing_slash {
                path.push("");
            }
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Exchanges a password for a bearer token.
    pub async fn token(&self, username: &str, password: &str) -> Result<String> {
        let url = self.endpoint(&["auth", "token"], false)?;
        let request = self.client.post(url).form(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ]);
        let token: TokenResponse = Self::send(request).await?;
        Ok(token.access_token)
    }

    pub async fn destinations(
        &self,
        credentials: &Credentials,
        filter: &Filter,
    ) -> Result<DestinationListing> {
        let url = self.endpoint(&["destinations"], false)?;
        log!("Fetching destinations with {:?}", filter.to_query());
        let request = credentials.apply(self.client.get(url).query(&filter.to_query()));
        Self::send(request).await
    }

    pub async fn destination(&self, credentials: &Credentials, id: &str) -> Result<Destination> {
        let url = self.endpoint(&["destinations", id], false)?;
        let request = credentials.apply(self.client.get(url));
        let destination: Option<Destination> = Self::send(request).await?;
        destination.ok_or_else(|| Error::MissingDestination(id.to_string()))
    }

    pub async fn create_destination(
        &self,
        credentials: &Credentials,
        destination: &NewDestination,
    ) -> Result<Destination> {
        let url = self.endpoint(&["destinations"], false)?;
        let request = credentials.apply(self.client.post(url).json(destination));
        Self::send(request).await
    }

    pub async fn dynamic_filters(
        &self,
        credentials: &Credentials,
        filter: &Filter,
    ) -> Result<Vec<DynamicFilter>> {
        let url = self.endpoint(&["dynamic_filters"], false)?;
        let request = credentials.apply(self.client.get(url).query(&filter.to_query()));
        Self::send(request).await
    }

    pub async fn chats(&self, credentials: &Credentials, user_id: &Id) -> Result<Vec<Chat>> {
        let user_id = user_id.to_string();
        let url = self.endpoint(&["chat", "users", &user_id, "chats"], true)?;
        Self::send(credentials.apply(self.client.get(url))).await
    }

    pub async fn create_chat(&self, credentials: &Credentials, user_id: &Id) -> Result<Chat> {
        let url = self.endpoint(&["chat", "chats"], true)?;
        let request = credentials.apply(self.client.post(url).json(&NewChat { user_id }));
        Self::send(request).await
    }

    pub async fn history(&self, credentials: &Credentials, chat_id: &Id) -> Result<Vec<Message>> {
        let chat_id = chat_id.to_string();
        let url = self.endpoint(&["chat", &chat_id], false)?;
        let history: History = Self::send(credentials.apply(self.client.get(url))).await?;
        Ok(history.history)
    }

    pub async fn send_prompt(
        &self,
        credentials: &Credentials,
        prompt: &str,
        chat_id: Option<&Id>,
        user_id: &Id,
    ) -> Result<Reply> {
        let url = self.endpoint(&["chat"], true)?;
        let body = Prompt {
            prompt,
            chat_id,
            user_id,
        };
        Self::send(credentials.apply(self.client.post(url).json(&body))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Route;

    fn api(base: &str) -> Api {
        Api::new(&Config {
            backend_url: base.to_string(),
            token_key: "token",
        })
        .unwrap()
    }

    #[test]
    fn endpoints_follow_backend_routes() {
        let api = api("http://localhost:8000");
        assert_eq!(
            api.endpoint(&["auth", "token"], false).unwrap().as_str(),
            "http://localhost:8000/auth/token"
        );
        assert_eq!(
            api.endpoint(&["chat", "users", "12", "chats"], true)
                .unwrap()
                .as_str(),
            "http://localhost:8000/chat/users/12/chats/"
        );
        assert_eq!(
            api.endpoint(&["chat"], true).unwrap().as_str(),
            "http://localhost:8000/chat/"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let slashed = api("https://travel.example.com/api/");
        assert_eq!(
            slashed.endpoint(&["destinations", "a b"], false).unwrap().as_str(),
            "https://travel.example.com/api/destinations/a%20b"
        );
        let bare = api("https://travel.example.com/api");
        assert_eq!(
            bare.endpoint(&["dynamic_filters"], false).unwrap().as_str(),
            "https://travel.example.com/api/dynamic_filters"
        );
    }

    #[test]
    fn linked_destination_is_encoded_once() {
        let Route::Destination(id) = Route::parse("/destinations/S%C3%A3o%20Paulo") else {
            panic!("not a destination route");
        };
        assert_eq!(
            api("http://localhost:8000")
                .endpoint(&["destinations", &id], false)
                .unwrap()
                .as_str(),
            "http://localhost:8000/destinations/S%C3%A3o%20Paulo"
        );
    }

    #[test]
    fn rejects_unusable_base() {
        let config = Config {
            backend_url: "mailto:someone@example.com".to_string(),
            token_key: "token",
        };
        assert!(matches!(Api::new(&config), Err(Error::BaseUrl(_))));
        let config = Config {
            backend_url: "not a url".to_string(),
            token_key: "token",
        };
        assert!(matches!(Api::new(&config), Err(Error::Url(_))));
    }

    #[test]
    fn prompt_body_shape() {
        let user = Id::Num(5);
        let body = serde_json::to_value(Prompt {
            prompt: "beaches?",
            chat_id: None,
            user_id: &user,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"prompt": "beaches?", "chat_id": null, "user_id": 5})
        );
    }
}
