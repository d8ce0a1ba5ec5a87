//! Wire DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! Query objects mirror the backend's query-string parameters one to one and
//! skip absent fields, so an empty query sends no parameters at all. Response
//! bodies stay `serde_json::Value`; only the login response is typed because
//! the session needs the user out of it.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role value the backend assigns to administrators.
pub const ADMIN_ROLE: i64 = 1;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The request never produced a response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A success response whose body is not valid JSON.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request header value could not be encoded.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`], `None` for everything else.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// USER
// =============================================================================

/// The authenticated user as returned by the login endpoint.
///
/// The backend names the identifier `user_id`; `id` is accepted on input as
/// well, and when both appear `user_id` wins while `id` stays in `profile`.
/// The backend stores whatever role it is sent, so any non-integer `role`
/// (null, string, missing) reads as `0` and never grants admin. Profile
/// fields the client does not model are kept in `profile` so a
/// persist/restore cycle is lossless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: i64,
    /// Bare integer role; [`ADMIN_ROLE`] marks an administrator.
    pub role: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn new(id: i64, role: i64) -> Self {
        Self { id, role, email: None, name: None, profile: Map::new() }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Why a JSON object could not be read as a [`User`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UserShapeError {
    #[error("user object has no `user_id` or `id`")]
    MissingId,
    #[error("user id is not an integer: {0}")]
    InvalidId(Value),
}

impl TryFrom<Map<String, Value>> for User {
    type Error = UserShapeError;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let raw_id = match fields.remove("user_id") {
            Some(id) => id,
            None => fields.remove("id").ok_or(UserShapeError::MissingId)?,
        };
        let id = raw_id.as_i64().ok_or(UserShapeError::InvalidId(raw_id))?;
        let role = fields.remove("role").as_ref().and_then(Value::as_i64).unwrap_or(0);
        let email = take_string(&mut fields, "email");
        let name = take_string(&mut fields, "name");
        Ok(Self { id, role, email, name, profile: fields })
    }
}

/// Remove `key` when it holds a string or null; any other value stays in
/// `fields` so it still round-trips through `profile`.
fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => {
            fields.insert(key.to_owned(), other);
            None
        }
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub role: i64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

// =============================================================================
// QUERIES
// =============================================================================

/// Parameters for `GET /data/vessel-tracks`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VesselTrackQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_id: Option<i64>,
    /// Inclusive lower bound, `YYYY-MM-DD HH:MM:SS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD HH:MM:SS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Parameters for `GET /data/ocean-environment`.
///
/// The backend only applies a latitude (or longitude) filter when both of its
/// bounds are present.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OceanEnvironmentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Parameters for `GET /record/operations`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RecordQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// `INSERT`, `IMPORT`, `UPDATE` or `DELETE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Pagination parameters for `GET /data/list`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Swell direction accepted by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurgeDirection {
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "N")]
    North,
}

impl SurgeDirection {
    /// Parse the single-letter wire form.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "E" | "e" => Some(Self::East),
            "S" | "s" => Some(Self::South),
            "W" | "w" => Some(Self::West),
            "N" | "n" => Some(Self::North),
            _ => None,
        }
    }
}

/// One observation row for `POST /data/add`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataRecord {
    pub ship_id: i64,
    /// `YYYY-MM-DD HH:MM:SS`.
    pub datetime: String,
    pub lat: f64,
    pub long: f64,
    pub sea_temp: Option<f64>,
    pub wave_height: f64,
    pub wave_period: f64,
    pub surge_direction: SurgeDirection,
    pub surge_height: f64,
}

/// Body for `POST /data/delete`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DataIdPayload {
    pub data_id: i64,
}

/// A CSV file sent to `POST /data/import` as the multipart field `file`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CsvUpload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), bytes }
    }

    /// Read a CSV file from disk, keeping its file name for the upload.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload.csv".to_owned(), |name| name.to_string_lossy().into_owned());
        Ok(Self { file_name, bytes })
    }
}
