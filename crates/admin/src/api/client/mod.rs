//! HTTP client for the store API.
//!
//! Generic JSON verbs live here; endpoint families are implemented as
//! additional `impl ApiClient` blocks in the sibling modules.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::config::ApiConfig;

use super::ApiError;
use super::types::{PaymentMethod, StatusRecord};

mod cash;
mod credit;
mod domains;
mod entries;
mod garments;
mod parties;
mod trade;

/// Cached lookup tables.
#[derive(Debug, Clone)]
pub(crate) enum CacheValue {
    PaymentMethods(Vec<PaymentMethod>),
    Statuses(Vec<StatusRecord>),
}

/// Client for the jewelry store REST API.
///
/// Cheap to clone; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("joyeria-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(config.lookup_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// The normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Join the base URL and an endpoint path.
    ///
    /// Leading slashes on `path` and trailing slashes on the base are dropped
    /// so `api_url("/terceros/clientes/")` and `api_url("terceros/clientes/")`
    /// resolve to the same URL.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn cached(&self, key: &str) -> Option<CacheValue> {
        self.inner.cache.get(key).await
    }

    pub(crate) async fn cache_insert(&self, key: &str, value: CacheValue) {
        self.inner.cache.insert(key.to_string(), value).await;
    }

    /// Drop all cached lookup tables.
    pub async fn invalidate_lookups(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Generic verbs
    // =========================================================================

    /// Send a request and return the raw successful body.
    async fn send<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<(StatusCode, String), ApiError> {
        let url = self.api_url(path);
        let mut request = self.inner.client.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            debug!(%method, %url, %status, "API request succeeded");
            return Ok((status, text));
        }

        let message = super::error_message(status, &text);
        tracing::warn!(
            %method,
            %url,
            %status,
            body = %text.chars().take(500).collect::<String>(),
            "API returned non-success status"
        );
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        Err(ApiError::Status { status, message })
    }

    fn decode<T: DeserializeOwned>(path: &str, text: &str) -> Result<T, ApiError> {
        serde_json::from_str(text).map_err(|e| {
            tracing::error!(
                error = %e,
                path,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or bad JSON.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let (_, text) = self.send::<()>(Method::GET, path, query, None).await?;
        Self::decode(path, &text)
    }

    /// `GET` a JSON document, mapping 404 to `None`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, other non-2xx status, or bad JSON.
    #[instrument(skip(self))]
    pub async fn get_json_opt<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, ApiError> {
        match self.get_json(path, query).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or bad JSON.
    #[instrument(skip(self, body))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let (_, text) = self.send(Method::POST, path, &[], Some(body)).await?;
        Self::decode(path, &text)
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or bad JSON.
    #[instrument(skip(self, body))]
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let (_, text) = self.send(Method::PUT, path, &[], Some(body)).await?;
        Self::decode(path, &text)
    }

    /// `PATCH` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or bad JSON.
    #[instrument(skip(self, body))]
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let (_, text) = self.send(Method::PATCH, path, &[], Some(body)).await?;
        Self::decode(path, &text)
    }

    /// `POST` or `PATCH` without caring about the response body.
    ///
    /// Empty and non-JSON success bodies are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    #[instrument(skip(self, body))]
    pub async fn send_ignoring_body<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(method, path, &[], body).await.map(|_| ())
    }

    /// `POST` with no body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn post_empty(&self, path: &str) -> Result<String, ApiError> {
        let (_, text) = self.send::<()>(Method::POST, path, &[], None).await?;
        Ok(text)
    }

    /// Reachability check used by the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the API cannot be reached or answers 5xx.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = self.api_url("dominios_comunes/estados/");
        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(ApiError::Status {
                status,
                message: format!("Error {}", status.as_u16()),
            });
        }
        Ok(())
    }
}

/// Client pointed at a mock server's `/api` prefix.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) fn client_for_tests(server: &httpmock::MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: server.url("/api"),
        timeout: std::time::Duration::from_secs(5),
        lookup_ttl: std::time::Duration::from_secs(60),
    })
    .unwrap()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client_for(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
            lookup_ttl: Duration::from_secs(60),
        })
        .unwrap()
    }

    #[test]
    fn test_api_url_normalizes_slashes() {
        let client = client_for("http://127.0.0.1:8000/api/");
        assert_eq!(
            client.api_url("/terceros/clientes/"),
            "http://127.0.0.1:8000/api/terceros/clientes/"
        );
        assert_eq!(
            client.api_url("caja/cuentas/"),
            "http://127.0.0.1:8000/api/caja/cuentas/"
        );
    }

    #[tokio::test]
    async fn test_get_json_opt_maps_404_to_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/apartado_credito/creditos/99/");
            then.status(404).json_body(json!({"detail": "No encontrado."}));
        });

        let client = client_for(&server.url("/api"));
        let found: Option<serde_json::Value> = client
            .get_json_opt("apartado_credito/creditos/99/", &[])
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_non_success_carries_api_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/apartado_credito/cuotas/");
            then.status(400)
                .json_body(json!({"warning": "El monto excede el saldo pendiente"}));
        });

        let client = client_for(&server.url("/api"));
        let err = client
            .post_json::<_, serde_json::Value>("apartado_credito/cuotas/", &json!({"monto": 1}))
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "El monto excede el saldo pendiente");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_parse_error_on_unexpected_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/caja/cuentas/");
            then.status(200).body("<html>login</html>");
        });

        let client = client_for(&server.url("/api"));
        let err = client
            .get_json::<serde_json::Value>("caja/cuentas/", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
