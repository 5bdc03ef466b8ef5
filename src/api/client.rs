//! HTTP client shim.
//!
//! Every backend call goes through [`ApiClient`] and resolves to an
//! [`Envelope`], never to an `Err`: transport failures map to a zero
//! status with a fixed message, HTTP errors keep their real status. URL
//! resolution deduplicates the base path prefix so call sites may pass
//! endpoints with or without it.

use crate::core::envelope::Envelope;
use reqwest::Method;
use serde_json::Value;
use std::sync::RwLock;
use tracing::{debug, instrument};

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    base_path: String,
    api_key: Option<String>,
    bearer: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base_path = base_path_of(&base_url);
        let http = reqwest::Client::builder()
            .user_agent("finboard/0.2")
            .build()
            .unwrap_or_default();

        ApiClient {
            http,
            base_url,
            base_path,
            api_key,
            bearer: RwLock::new(None),
        }
    }

    /// Installs (or clears) the bearer credential attached to subsequent
    /// requests. Called by the auth context on login, refresh and logout.
    pub fn set_bearer(&self, token: Option<String>) {
        *self.bearer.write().unwrap() = token;
    }

    pub async fn get(&self, endpoint: &str) -> Envelope {
        self.request(Method::GET, endpoint, None).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> Envelope {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put(&self, endpoint: &str, body: &Value) -> Envelope {
        self.request(Method::PUT, endpoint, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Envelope {
        self.request(Method::DELETE, endpoint, None).await
    }

    #[instrument(skip(self, body), fields(endpoint = %endpoint))]
    pub async fn request(&self, method: Method, endpoint: &str, body: Option<&Value>) -> Envelope {
        let url = self.resolve_url(endpoint);
        debug!("Requesting {url}");

        let mut request = self.http.request(method, &url);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }
        let bearer = self.bearer.read().unwrap().clone();
        if let Some(token) = &bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Transport failure for {url}: {e}");
                return Envelope::transport_error();
            }
        };

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let data = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::Null)
        };

        if status == 200 || status == 201 {
            Envelope::ok(status, data)
        } else {
            Envelope::http_error(status, error_message(status, &data))
        }
    }

    /// Resolves an endpoint against the base URL, keeping the base path
    /// prefix exactly once even when the endpoint already carries it.
    fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }

        let endpoint = if endpoint.starts_with('/') {
            endpoint.to_string()
        } else {
            format!("/{endpoint}")
        };

        if has_prefix_segment(&endpoint, &self.base_path) {
            let origin = &self.base_url[..self.base_url.len() - self.base_path.len()];
            format!("{origin}{endpoint}")
        } else {
            format!("{}{}", self.base_url, endpoint)
        }
    }
}

/// Extracts the path component of the base URL, e.g. `/services/api` out
/// of `https://host/services/api`. A schemeless base is all path.
fn base_path_of(base_url: &str) -> String {
    match base_url.split_once("://") {
        Some((_, rest)) => match rest.find('/') {
            Some(idx) => rest[idx..].to_string(),
            None => String::new(),
        },
        None => base_url.to_string(),
    }
}

// Prefix matches only on a path segment boundary, so a base path of
// `/services/api` does not swallow `/services/apiv2/...`.
fn has_prefix_segment(endpoint: &str, prefix: &str) -> bool {
    if prefix.is_empty() || !endpoint.starts_with(prefix) {
        return false;
    }
    matches!(endpoint.as_bytes().get(prefix.len()), None | Some(b'/'))
}

fn error_message(status: u16, data: &Value) -> String {
    data.get("message")
        .or_else(|| data.get("detail"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
