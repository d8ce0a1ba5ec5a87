//! REST API client for the dashboard backend.
//!
//! Every method forwards its parameter object as a query string or its
//! payload as the request body and hands the backend's JSON back unmodified.
//! There is no retry, caching, or response validation here.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and non-2xx statuses both surface as [`ApiError`];
//! the status body is kept verbatim so callers can show the backend's own
//! message.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use super::types::{
    ApiError, CsvUpload, LoginRequest, LoginResponse, OceanEnvironmentQuery, PageQuery, RecordQuery,
    RegisterRequest, User, VesselTrackQuery,
};
use crate::config::ClientConfig;

/// Path prefix every backend endpoint lives under.
pub const API_PREFIX: &str = "/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Header carrying the caller's role to admin endpoints.
pub const USER_ROLE_HEADER: &str = "user-role";
/// Header carrying the caller's id so the backend can attribute operation records.
pub const USER_ID_HEADER: &str = "user-id";

/// Multipart field name the import endpoint reads.
const IMPORT_FIELD: &str = "file";

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client bound to one backend base URL with a fixed request timeout.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// Build a client for `base_url` (scheme + host, without `/api`).
    ///
    /// A zero `timeout` falls back to [`DEFAULT_REQUEST_TIMEOUT_SECS`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot be set up.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let timeout = if timeout.is_zero() { Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS) } else { timeout };
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        let base = format!("{}{API_PREFIX}", base_url.trim_end_matches('/'));
        Ok(Self { http, base })
    }

    /// Build a client from typed configuration.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Resolved base, e.g. `http://127.0.0.1:5000/api`.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(method = method.as_str(), path, "backend request");
        self.http.request(method, format!("{}{path}", self.base))
    }

    // -------------------------------------------------------------------------
    // Public data
    // -------------------------------------------------------------------------

    /// `GET /data/ships`: distinct ship ids.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn get_ships(&self) -> Result<Value, ApiError> {
        send(self.request(Method::GET, "/data/ships")).await
    }

    /// `GET /data/vessel-tracks` filtered by ship and time window.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn get_vessel_tracks(&self, params: &VesselTrackQuery) -> Result<Value, ApiError> {
        send(self.request(Method::GET, "/data/vessel-tracks").query(params)).await
    }

    /// `GET /data/ocean-environment` filtered by bounding box and time window.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn get_ocean_environment(&self, params: &OceanEnvironmentQuery) -> Result<Value, ApiError> {
        send(self.request(Method::GET, "/data/ocean-environment").query(params)).await
    }

    // -------------------------------------------------------------------------
    // Admin data
    // -------------------------------------------------------------------------

    /// `POST /data/add` with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn add_data<P>(&self, payload: &P, headers: HeaderMap) -> Result<Value, ApiError>
    where
        P: Serialize + ?Sized,
    {
        send(self.request(Method::POST, "/data/add").headers(headers).json(payload)).await
    }

    /// `POST /data/import` with the CSV as multipart field `file`.
    ///
    /// The multipart boundary header is set by the form itself.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn import_csv(&self, upload: CsvUpload, headers: HeaderMap) -> Result<Value, ApiError> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("text/csv")?;
        let form = Form::new().part(IMPORT_FIELD, part);
        send(self.request(Method::POST, "/data/import").headers(headers).multipart(form)).await
    }

    /// `GET /record/operations`: the operation audit log.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn get_records(&self, params: &RecordQuery, headers: HeaderMap) -> Result<Value, ApiError> {
        send(self.request(Method::GET, "/record/operations").headers(headers).query(params)).await
    }

    /// `GET /data/list`: paginated raw rows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn list_data(&self, params: &PageQuery, headers: HeaderMap) -> Result<Value, ApiError> {
        send(self.request(Method::GET, "/data/list").headers(headers).query(params)).await
    }

    /// `POST /data/delete` with a JSON payload carrying `data_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn delete_data<P>(&self, payload: &P, headers: HeaderMap) -> Result<Value, ApiError>
    where
        P: Serialize + ?Sized,
    {
        send(self.request(Method::POST, "/data/delete").headers(headers).json(payload)).await
    }

    /// `POST /data/update` with `data_id` plus the columns to change.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn update_data<P>(&self, payload: &P, headers: HeaderMap) -> Result<Value, ApiError>
    where
        P: Serialize + ?Sized,
    {
        send(self.request(Method::POST, "/data/update").headers(headers).json(payload)).await
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    /// `POST /user/login`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with 401 for bad credentials, and
    /// [`ApiError::Decode`] if the body carries no usable user.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest { email, password };
        let value = send(self.request(Method::POST, "/user/login").json(&body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `POST /user/register`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx status.
    pub async fn register(&self, email: &str, password: &str, name: &str, role: i64) -> Result<Value, ApiError> {
        let body = RegisterRequest { email, password, name, role };
        send(self.request(Method::POST, "/user/register").json(&body)).await
    }
}

async fn send(request: RequestBuilder) -> Result<Value, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "backend returned error status");
        return Err(ApiError::Status { status: status.as_u16(), body: text });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Headers identifying `user` to admin endpoints.
///
/// # Errors
///
/// Never fails for integer ids and roles; the `Result` covers header encoding.
pub fn actor_headers(user: &User) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(USER_ROLE_HEADER),
        HeaderValue::from_str(&user.role.to_string())?,
    );
    headers.insert(
        HeaderName::from_static(USER_ID_HEADER),
        HeaderValue::from_str(&user.id.to_string())?,
    );
    Ok(headers)
}
