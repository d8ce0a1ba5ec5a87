//! Session wiring: API client, user store, and router.
//!
//! The store is restored before the router is built, so the first navigation
//! already sees the persisted user and the store stays the only source of
//! truth for who is signed in.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

use crate::net::api::{ApiClient, actor_headers};
use crate::net::types::{ApiError, CsvUpload, PageQuery, RecordQuery, User};
use crate::router::{Navigation, Router};
use crate::state::user::{RestoreOutcome, UserStore};
use crate::util::storage::Storage;

pub struct App<S> {
    api: ApiClient,
    store: UserStore<S>,
    router: Router,
    restore_outcome: RestoreOutcome,
}

impl<S: Storage> App<S> {
    pub fn new(api: ApiClient, storage: S) -> Self {
        let (store, restore_outcome) = UserStore::restored(storage);
        if restore_outcome != RestoreOutcome::Restored {
            tracing::debug!(?restore_outcome, "starting without a persisted user");
        }
        Self { api, store, router: Router::default(), restore_outcome }
    }

    /// How the persisted user was found at startup.
    pub fn restore_outcome(&self) -> RestoreOutcome {
        self.restore_outcome
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &UserStore<S> {
        &self.store
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn current_user(&self) -> Option<&User> {
        self.store.user()
    }

    /// Sign in and remember the returned user.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the login call; the stored user is left
    /// untouched on failure.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ApiError> {
        let response = self.api.login(email, password).await?;
        tracing::info!(user_id = response.user.id, role = response.user.role, "signed in");
        self.store.set_user(response.user.clone());
        Ok(response.user)
    }

    /// Create an account. Registration does not sign the new user in.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the register call.
    pub async fn register(&self, email: &str, password: &str, name: &str, role: i64) -> Result<Value, ApiError> {
        self.api.register(email, password, name, role).await
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.store.user() {
            tracing::info!(user_id = user.id, "signed out");
        }
        self.store.clear_user();
    }

    /// Run the guard for `path` against the signed-in user.
    pub fn navigate(&self, path: &str) -> Navigation {
        self.router.navigate(path, self.store.user())
    }

    /// Actor headers for the signed-in user; empty when nobody is signed in.
    ///
    /// # Errors
    ///
    /// See [`actor_headers`].
    pub fn actor_headers(&self) -> Result<HeaderMap, ApiError> {
        self.store.user().map_or_else(|| Ok(HeaderMap::new()), actor_headers)
    }

    // -------------------------------------------------------------------------
    // Admin endpoints, sent as the signed-in user
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn add_data<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Value, ApiError> {
        self.api.add_data(payload, self.actor_headers()?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn import_csv(&self, upload: CsvUpload) -> Result<Value, ApiError> {
        self.api.import_csv(upload, self.actor_headers()?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn get_records(&self, params: &RecordQuery) -> Result<Value, ApiError> {
        self.api.get_records(params, self.actor_headers()?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn list_data(&self, params: &PageQuery) -> Result<Value, ApiError> {
        self.api.list_data(params, self.actor_headers()?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn delete_data<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Value, ApiError> {
        self.api.delete_data(payload, self.actor_headers()?).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn update_data<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Value, ApiError> {
        self.api.update_data(payload, self.actor_headers()?).await
    }
}
