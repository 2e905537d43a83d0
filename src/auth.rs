//! Signed-in state shared by every page, and the guard that keeps
//! anonymous visitors out of protected ones.

use crate::api::Api;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::loading::Loading;
use crate::route::{use_navigator, Route};
use crate::session::{BrowserStorage, Credentials, Session, SessionStore};
use leptos::logging::log;
use leptos::*;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Stored token not looked at yet.
    Loading,
    Present(Session),
    Absent,
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Present(session) => Some(session),
            _ => None,
        }
    }

    pub fn credentials(&self) -> Credentials {
        self.session()
            .map(Session::credentials)
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy)]
pub struct Auth {
    state: RwSignal<AuthState>,
    store: StoredValue<SessionStore<BrowserStorage>>,
}

impl Auth {
    pub fn provide(config: &Config) -> Self {
        let auth = Self {
            state: create_rw_signal(AuthState::Loading),
            store: store_value(SessionStore::new(BrowserStorage::new(config.token_key))),
        };
        provide_context(auth);
        auth
    }

    pub fn restore(&self) {
        let session = self.store.try_update_value(|store| store.restore()).flatten();
        if let Some(session) = &session {
            log!("Restored session for {}", session.username);
        }
        self.state.set(match session {
            Some(session) => AuthState::Present(session),
            None => AuthState::Absent,
        });
    }

    pub async fn login(&self, api: &Api, username: &str, password: &str) -> Result<Session> {
        let token = api.token(username, password).await?;
        let session = self
            .store
            .try_update_value(|store| store.establish(&token))
            .unwrap_or(Err(Error::Storage))?;
        self.state.set(AuthState::Present(session.clone()));
        Ok(session)
    }

    pub fn logout(&self) {
        self.store.update_value(|store| store.logout());
        self.state.set(AuthState::Absent);
    }

    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.with(|state| state.session().cloned())
    }

    /// Credentials as of now, for a request about to be built.
    pub fn credentials(&self) -> Credentials {
        self.state.with_untracked(AuthState::credentials)
    }
}

pub fn use_auth() -> Auth {
    expect_context::<Auth>()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Placeholder,
    Render,
    Redirect,
}

pub fn gate(state: &AuthState) -> Gate {
    match state {
        AuthState::Loading => Gate::Placeholder,
        AuthState::Present(_) => Gate::Render,
        AuthState::Absent => Gate::Redirect,
    }
}

/// Renders `children` only for signed-in users; everyone else is sent to
/// the login page.
#[component]
pub fn Protected(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let navigator = use_navigator();
    let decision = create_memo(move |_| gate(&auth.state()));

    create_effect(move |_| {
        if decision.get() == Gate::Redirect {
            navigator.push(Route::Login);
        }
    });

    move || match decision.get() {
        Gate::Placeholder => view! { <Loading /> }.into_view(),
        Gate::Render => children().into_view(),
        Gate::Redirect => ().into_view(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Id;

    fn session() -> Session {
        Session {
            user_id: Id::Num(1),
            username: "ada".into(),
            token: "t0k3n".into(),
        }
    }

    #[test]
    fn gate_follows_auth_state() {
        assert_eq!(gate(&AuthState::Loading), Gate::Placeholder);
        assert_eq!(gate(&AuthState::Present(session())), Gate::Render);
        assert_eq!(gate(&AuthState::Absent), Gate::Redirect);
    }

    #[test]
    fn only_present_sessions_carry_credentials() {
        assert_eq!(AuthState::Loading.credentials(), Credentials::anonymous());
        assert_eq!(AuthState::Absent.credentials(), Credentials::anonymous());
        assert_eq!(
            AuthState::Present(session()).credentials(),
            Credentials::bearer("t0k3n")
        );
    }
}
