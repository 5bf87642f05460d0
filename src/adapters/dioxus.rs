//! Dioxus hook adapter.
//!
//! Pure glue around [`AuthClient`] for Dioxus components: a hook that owns a
//! reactive session signal and keeps it in sync with the facade. No
//! rendering happens here.

use std::rc::Rc;

use dioxus::prelude::*;

use crate::auth::AuthClient;
use crate::errors::AuthError;
use crate::session::Session;

/// Reactive handle returned by [`use_auth`].
#[derive(Clone)]
pub struct UseAuth {
    session: Signal<Option<Session>>,
    client: Rc<AuthClient>,
}

/// Hook wiring an [`AuthClient`] into component state.
pub fn use_auth(client: Rc<AuthClient>) -> UseAuth {
    let session = use_signal({
        let client = client.clone();
        move || client.session()
    });
    UseAuth { session, client }
}

impl UseAuth {
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.read().is_some()
    }

    pub fn client(&self) -> &Rc<AuthClient> {
        &self.client
    }

    pub async fn login_with_wallet(&mut self) -> Result<Session, AuthError> {
        let result = self.client.login_with_wallet().await;
        self.session.set(self.client.session());
        result
    }

    pub async fn complete_oauth_login(&mut self) -> Result<Session, AuthError> {
        let result = self.client.complete_oauth_login().await;
        self.session.set(self.client.session());
        result
    }

    pub async fn logout(&mut self) {
        self.client.logout().await;
        self.session.set(None);
    }
}
