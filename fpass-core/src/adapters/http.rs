//! F-Pass backend HTTP client
//!
//! Two steps shared by every backend call:
//!
//! 1. **Request helper**: resolve the path against the base URL, always send
//!    `Content-Type: application/json`, and attach `Authorization: Bearer`
//!    when a token is persisted (never on login or register).
//! 2. **Normalizer**: decide JSON vs not from the `content-type` header, turn
//!    non-2xx JSON into [`Error::Api`], and tear the session down on a 401
//!    before returning [`Error::Unauthenticated`].
//!
//! Typed decoding happens afterwards in [`Payload::decode`], which accepts
//! `{ success, data }` envelopes, keyed wrappers and bare values.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::Config;
use crate::domain::result::{ApiError, Error, Result};
use crate::services::SessionManager;

/// Calls that start a session and so never carry a token
const ANONYMOUS_PATHS: [&str; 2] = ["auth/login", "auth/register"];

/// Query parameters for a request
pub type Query<'a> = &'a [(&'a str, String)];

/// A normalized backend response
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// 2xx response with a JSON body, returned unmodified
    Json { status: u16, body: JsonValue },
    /// 2xx response that was not JSON
    Raw { status: u16, body: String },
}

impl Payload {
    pub fn status(&self) -> u16 {
        match self {
            Self::Json { status, .. } | Self::Raw { status, .. } => *status,
        }
    }

    /// The JSON body; a raw response is a decode error
    pub fn into_json(self) -> Result<JsonValue> {
        match self {
            Self::Json { body, .. } => Ok(body),
            Self::Raw { status, .. } => Err(Error::decode(format!(
                "expected a JSON body, got a non-JSON response (HTTP {})",
                status
            ))),
        }
    }

    /// Unwrap the envelope and decode the payload
    ///
    /// `key` names the resource wrapper the backend may use (`"wallet"`,
    /// `"transactions"`, ...). `{ "success": false }` is a backend error even
    /// on a 2xx status.
    pub fn decode<T: DeserializeOwned>(self, key: &str) -> Result<T> {
        let status = self.status();
        let value = unwrap_envelope(status, self.into_json()?, key)?;
        serde_json::from_value(value)
            .map_err(|e| Error::decode(format!("could not read {}: {}", key, e)))
    }
}

impl Payload {
    /// Decode a body that is the resource itself or a `{ success, data }` envelope
    pub fn decode_body<T: DeserializeOwned>(self) -> Result<T> {
        self.decode("data")
    }

    /// Read an acknowledgement from a mutation that returns no resource
    pub fn ack(self) -> Result<Ack> {
        match self {
            Self::Raw { body, .. } => Ok(Ack {
                message: Some(body).filter(|b| !b.trim().is_empty()),
            }),
            Self::Json { status, body } => {
                if body.get("success").and_then(JsonValue::as_bool) == Some(false) {
                    return Err(Error::Api(ApiError::from_body(status, body)));
                }
                Ok(Ack {
                    message: body
                        .get("message")
                        .and_then(JsonValue::as_str)
                        .map(str::to_string),
                })
            }
        }
    }
}

/// Acknowledgement of a mutation, with the backend's message if it sent one
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ack {
    pub message: Option<String>,
}

impl Ack {
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

/// Strip `{ success, data }` or `{ <key>: ... }` wrappers
pub fn unwrap_envelope(status: u16, body: JsonValue, key: &str) -> Result<JsonValue> {
    let JsonValue::Object(mut map) = body else {
        return Ok(body);
    };

    if map.get("success").and_then(JsonValue::as_bool) == Some(false) {
        return Err(Error::Api(ApiError::from_body(
            status,
            JsonValue::Object(map),
        )));
    }
    if let Some(data) = map.remove("data") {
        if !data.is_null() {
            return Ok(data);
        }
    }
    if let Some(inner) = map.remove(key) {
        return Ok(inner);
    }
    Ok(JsonValue::Object(map))
}

/// Client for the F-Pass REST backend
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionManager>,
}

impl ApiClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &Config, session: Arc<SessionManager>) -> Result<Self> {
        Self::new_with_base_url(&config.api_url, config.request_timeout(), session)
    }

    /// Create a client against an explicit base URL
    pub fn new_with_base_url(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionManager>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build a request with the JSON content type and, when logged in, the
    /// bearer token
    pub fn build_request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let request = self
            .client
            .request(method, self.url(path))
            .header(CONTENT_TYPE, "application/json");

        let route = path.trim_matches('/');
        if ANONYMOUS_PATHS.contains(&route) {
            return Ok(request);
        }
        Ok(match self.session.token()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    /// Send one request and normalize the response
    #[tracing::instrument(name = "api", skip(self, query, body), fields(method = %method, path = %path))]
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> Result<Payload> {
        let mut request = self.build_request(method, path)?;
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await?;
        debug!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );
        self.normalize(response).await
    }

    /// Apply the normalization rules to a response
    pub async fn normalize(&self, response: Response) -> Result<Payload> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        if !is_json {
            if !status.is_success() {
                return Err(Error::Transport(format!(
                    "HTTP {} with a non-JSON body",
                    status.as_u16()
                )));
            }
            let body = response.text().await?;
            return Ok(Payload::Raw {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| Error::decode(format!("invalid JSON body: {}", e)))?
        };

        if status.is_success() {
            return Ok(Payload::Json {
                status: status.as_u16(),
                body,
            });
        }

        let error = ApiError::from_body(status.as_u16(), body);
        if status == StatusCode::UNAUTHORIZED {
            warn!("backend rejected the session token");
            self.session.expire()?;
            return Err(Error::Unauthenticated(error));
        }
        Err(Error::Api(error))
    }

    pub async fn get(&self, path: &str) -> Result<Payload> {
        self.call::<JsonValue>(Method::GET, path, &[], None).await
    }

    pub async fn get_with_query(&self, path: &str, query: Query<'_>) -> Result<Payload> {
        self.call::<JsonValue>(Method::GET, path, query, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Payload> {
        self.call(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Payload> {
        self.call(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Payload> {
        self.call::<JsonValue>(Method::DELETE, path, &[], None).await
    }
}
