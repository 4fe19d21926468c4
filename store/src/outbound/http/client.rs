//! Shared reqwest plumbing for the REST adapters.
//!
//! The base URL is resolved from the [`BackendSelector`] on every request so
//! the adapters follow configuration changes without being rebuilt. The
//! client owns transport details only: endpoint construction, JSON bodies,
//! timeout and HTTP status mapping.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::domain::BackendSelector;

/// Failure of a single REST round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(super) enum RemoteCallError {
    #[error("backend API URL is not configured")]
    Unconfigured,
    #[error("backend API URL {url:?} is not usable: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("request failed: {message}")]
    Transport { message: String },
    #[error("resource not found")]
    NotFound,
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid JSON payload: {message}")]
    Decode { message: String },
}

/// Thin JSON client over the configured backend.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: Client,
    selector: BackendSelector,
}

impl RemoteClient {
    /// Build a client with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(selector: BackendSelector, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, selector })
    }

    /// `GET` a JSON document.
    pub(super) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, RemoteCallError> {
        let mut url = self.endpoint(segments)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let body = self.execute(self.http.get(url)).await?;
        decode(&body)
    }

    /// Send a JSON body with `method` and decode the JSON reply.
    pub(super) async fn send<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        payload: &B,
    ) -> Result<T, RemoteCallError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let body = self
            .execute(self.http.request(method, url).json(payload))
            .await?;
        decode(&body)
    }

    /// `DELETE` a resource; any success status counts as removed.
    pub(super) async fn delete(&self, segments: &[&str]) -> Result<bool, RemoteCallError> {
        let url = self.endpoint(segments)?;
        self.execute(self.http.delete(url)).await?;
        Ok(true)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteCallError> {
        let base = self
            .selector
            .backend_api_url()
            .ok_or(RemoteCallError::Unconfigured)?;
        endpoint_url(&base, segments)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, RemoteCallError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "backend round trip");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

/// Join `segments` onto `base`, percent-encoding each one.
fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url, RemoteCallError> {
    let invalid = |message: String| RemoteCallError::InvalidBaseUrl {
        url: base.to_owned(),
        message,
    };
    let mut url = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot carry a path".to_owned()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteCallError> {
    serde_json::from_slice(body).map_err(|error| RemoteCallError::Decode {
        message: error.to_string(),
    })
}

fn map_transport_error(error: reqwest::Error) -> RemoteCallError {
    let message = if error.is_timeout() {
        format!("timed out: {error}")
    } else {
        error.to_string()
    };
    RemoteCallError::Transport { message }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteCallError {
    if status == StatusCode::NOT_FOUND {
        return RemoteCallError::NotFound;
    }
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        preview
    };
    RemoteCallError::Status {
        status: status.as_u16(),
        message,
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
