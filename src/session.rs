use crate::error::{Error, Result};
use crate::state::Id;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use leptos::logging::{error, warn};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    id: Id,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: Id,
    pub username: String,
    pub token: String,
}

impl Session {
    /// Reads the identity claims of a JWT. The signature is the backend's
    /// business; we only need to know who we are.
    pub fn decode(token: &str) -> Result<Self> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(Error::MalformedToken),
        };
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        let claims: Claims = serde_json::from_slice(&bytes)?;
        Ok(Self {
            user_id: claims.id,
            username: claims.sub,
            token: token.to_string(),
        })
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::bearer(&self.token)
    }
}

/// What a backend call authenticates with. Captured by value when a request
/// is built, so signing out never rewrites requests already in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    bearer: Option<String>,
}

impl Credentials {
    pub fn anonymous() -> Self {
        Self { bearer: None }
    }

    pub fn bearer(token: &str) -> Self {
        Self {
            bearer: Some(token.to_string()),
        }
    }

    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

pub trait TokenStorage {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// `window.localStorage`, keyed by [`crate::config::TOKEN_KEY`].
pub struct BrowserStorage {
    key: &'static str,
}

impl BrowserStorage {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }

    fn storage(&self) -> Result<web_sys::Storage> {
        leptos::window()
            .local_storage()
            .ok()
            .flatten()
            .ok_or(Error::Storage)
    }
}

impl TokenStorage for BrowserStorage {
    fn load(&self) -> Option<String> {
        self.storage().ok()?.get_item(self.key).ok().flatten()
    }

    fn save(&self, token: &str) -> Result<()> {
        self.storage()?
            .set_item(self.key, token)
            .map_err(|_| Error::Storage)
    }

    fn clear(&self) -> Result<()> {
        self.storage()?
            .remove_item(self.key)
            .map_err(|_| Error::Storage)
    }
}

pub struct SessionStore<S> {
    storage: S,
    session: Option<Session>,
}

impl<S: TokenStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: None,
        }
    }

    /// Picks up a token left by a previous visit. Tokens that no longer
    /// decode are discarded.
    pub fn restore(&mut self) -> Option<Session> {
        let token = self.storage.load()?;
        match Session::decode(&token) {
            Ok(session) => {
                self.session = Some(session.clone());
                Some(session)
            }
            Err(err) => {
                warn!("Invalid token: {err}");
                if let Err(err) = self.storage.clear() {
                    error!("Could not drop stale token: {err}");
                }
                None
            }
        }
    }

    /// Second half of a login: the backend handed us `token`.
    pub fn establish(&mut self, token: &str) -> Result<Session> {
        let session = Session::decode(token)?;
        self.storage.save(token)?;
        self.session = Some(session.clone());
        Ok(session)
    }

    pub fn logout(&mut self) {
        self.session = None;
        if let Err(err) = self.storage.clear() {
            error!("Could not clear token: {err}");
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    pub(crate) struct MemoryStorage(RefCell<Option<String>>);

    impl TokenStorage for MemoryStorage {
        fn load(&self) -> Option<String> {
            self.0.borrow().clone()
        }

        fn save(&self, token: &str) -> Result<()> {
            *self.0.borrow_mut() = Some(token.to_string());
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            *self.0.borrow_mut() = None;
            Ok(())
        }
    }

    pub(crate) fn token(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn decodes_subject_and_id() {
        let session = Session::decode(&token(serde_json::json!({"sub": "ada", "id": 3, "exp": 1})))
            .unwrap();
        assert_eq!(session.username, "ada");
        assert_eq!(session.user_id, Id::Num(3));
        assert_eq!(session.credentials(), Credentials::bearer(&session.token));
    }

    #[test]
    fn rejects_garbage_tokens() {
        assert!(matches!(
            Session::decode("not-a-token"),
            Err(Error::MalformedToken)
        ));
        assert!(matches!(
            Session::decode("a.%%%.c"),
            Err(Error::TokenEncoding(_))
        ));
        let no_claims = format!("a.{}.c", URL_SAFE_NO_PAD.encode("{}"));
        assert!(matches!(Session::decode(&no_claims), Err(Error::Json(_))));
    }

    #[test]
    fn login_then_logout_restores_initial_state() {
        let mut store = SessionStore::new(MemoryStorage::default());
        assert_eq!(store.current(), None);

        let token = token(serde_json::json!({"sub": "ada", "id": 3}));
        let session = store.establish(&token).unwrap();
        assert_eq!(store.current(), Some(&session));
        assert_eq!(store.storage.load().as_deref(), Some(token.as_str()));
        assert_eq!(session.credentials(), Credentials::bearer(&token));

        store.logout();
        assert_eq!(store.current(), None);
        assert_eq!(store.storage.load(), None);
        assert_eq!(store.current().map(Session::credentials), None);
    }

    #[test]
    fn undecodable_token_is_not_stored() {
        let mut store = SessionStore::new(MemoryStorage::default());
        assert!(store.establish("garbage").is_err());
        assert_eq!(store.storage.load(), None);
        assert_eq!(store.current(), None);
    }

    #[test]
    fn restore_discards_stale_token() {
        let storage = MemoryStorage::default();
        storage.save("stale").unwrap();
        let mut store = SessionStore::new(storage);
        assert_eq!(store.restore(), None);
        assert_eq!(store.storage.load(), None);

        let token = token(serde_json::json!({"sub": "bob", "id": "u-1"}));
        store.storage.save(&token).unwrap();
        let session = store.restore().unwrap();
        assert_eq!(session.user_id, Id::from("u-1"));
        assert_eq!(store.current().map(|s| s.username.as_str()), Some("bob"));
    }
}
