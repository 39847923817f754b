//! HTTP client with bearer injection and silent token refresh.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument, trace};

use immortal_core::{AccessToken, ApiError, ApiUrl, Result, TokenStore};

use crate::endpoints::{self, RefreshResponse};
use crate::refresh::RefreshGate;

use futures_util::FutureExt;

/// An in-memory file for a multipart upload.
///
/// Parts hold owned bytes so the request can be rebuilt when an upload is
/// replayed after a token refresh; a streamed body could only be sent once.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    /// MIME type; the server sniffs the content when absent.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// The request body, in a form that can be replayed.
#[derive(Debug)]
pub(crate) enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Files(Vec<FilePart>),
}

/// HTTP client for the Immortal API.
///
/// The single choke point for every request to the backing service:
/// attaches the bearer token from the [`TokenStore`], carries the refresh
/// cookie via the transport cookie store, and recovers from expired access
/// tokens with a single coordinated refresh-and-retry.
///
/// Cloning is cheap and clones share the token store and refresh state.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base: ApiUrl,
    tokens: TokenStore,
    refresh: RefreshGate,
}

impl ApiClient {
    /// Create a new client with an in-process cookie jar.
    pub fn new(base: ApiUrl) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("immortal/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .build()
            .expect("failed to build HTTP client");

        Self::from_parts(http, base)
    }

    /// Create a new client backed by a caller-supplied cookie store.
    ///
    /// Lets a consumer persist the refresh cookie between processes. The
    /// client itself never reads or writes individual cookies; the store
    /// attaches them at the transport layer.
    pub fn with_cookie_provider<C>(base: ApiUrl, cookies: Arc<C>) -> Self
    where
        C: reqwest::cookie::CookieStore + 'static,
    {
        let http = reqwest::Client::builder()
            .user_agent(concat!("immortal/", env!("CARGO_PKG_VERSION")))
            .cookie_provider(cookies)
            .build()
            .expect("failed to build HTTP client");

        Self::from_parts(http, base)
    }

    fn from_parts(http: reqwest::Client, base: ApiUrl) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                base,
                tokens: TokenStore::new(),
                refresh: RefreshGate::default(),
            }),
        }
    }

    /// Returns the base origin this client is configured for.
    pub fn base(&self) -> &ApiUrl {
        &self.inner.base
    }

    /// Returns a handle to the access-token store.
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Make a GET request and decode the JSON response.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.execute(Method::GET, path, RequestBody::Empty).await?;
        Self::decode(response).await
    }

    /// Make a GET request, mapping a 404 to `None`.
    pub async fn get_optional<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>> {
        let response = self.execute(Method::GET, path, RequestBody::Empty).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::decode(response).await.map(Some)
    }

    /// Make a POST request with a JSON body and decode the JSON response.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.execute(Method::POST, path, body).await?;
        Self::decode(response).await
    }

    /// Make a POST request with a JSON body, discarding the response body.
    pub async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.execute(Method::POST, path, body).await?;
        Self::check(response).await.map(|_| ())
    }

    /// Make a POST request with no body, discarding the response body.
    /// Used for endpoints like logout that return 204 No Content.
    pub async fn post_no_body(&self, path: &str) -> Result<()> {
        let response = self.execute(Method::POST, path, RequestBody::Empty).await?;
        Self::check(response).await.map(|_| ())
    }

    /// Make a PUT request with a JSON body, discarding the response body.
    pub async fn put_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.execute(Method::PUT, path, body).await?;
        Self::check(response).await.map(|_| ())
    }

    /// POST files as a multipart form and decode the JSON response.
    pub async fn post_files<R: DeserializeOwned>(
        &self,
        path: &str,
        files: Vec<FilePart>,
    ) -> Result<R> {
        let response = self
            .execute(Method::POST, path, RequestBody::Files(files))
            .await?;
        Self::decode(response).await
    }

    /// Send a request, recovering once from an expired access token.
    ///
    /// On a 401 from anything but the refresh endpoint itself, awaits the
    /// coordinated refresh and, if it minted a new token, replays the
    /// request exactly once. The replay's response is final even if it is
    /// another 401; a failed refresh surfaces the original response.
    #[instrument(skip(self, body), fields(base = %self.inner.base))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<reqwest::Response> {
        debug!("API request");
        let response = self.inner.build_request(&method, path, &body)?.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED && path != endpoints::REFRESH {
            debug!("access token rejected, attempting silent refresh");
            if self.refresh().await {
                return Ok(self.inner.build_request(&method, path, &body)?.send().await?);
            }
        }

        Ok(response)
    }

    /// Exchange the ambient refresh cookie for a new access token.
    ///
    /// Concurrent callers coalesce onto one network call and all observe
    /// its outcome. Resolves `false` on any failure: refresh is a
    /// capability check, not an error source.
    pub async fn refresh(&self) -> bool {
        let inner = self.inner.clone();
        let fut = self.inner.refresh.join_or_start(move || {
            async move {
                let refreshed = inner.perform_refresh().await;
                // Empty the slot before any waiter sees the result, so the
                // next demand starts a fresh attempt instead of reusing a
                // settled one.
                inner.refresh.clear();
                refreshed
            }
            .boxed()
        });

        fut.await
    }

    /// Fail non-OK responses, preserving the server's error body.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        trace!(status = %status, "API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = match response.json::<serde_json::Value>().await {
            Ok(body) => body,
            // Not JSON; carry the status line as the detail instead
            Err(_) => json!({ "detail": status.canonical_reason().unwrap_or("") }),
        };

        Err(ApiError::new(status.as_u16(), body).into())
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let response = Self::check(response).await?;
        Ok(response.json::<R>().await?)
    }
}

impl ClientInner {
    fn build_request(
        &self,
        method: &Method,
        path: &str,
        body: &RequestBody,
    ) -> Result<reqwest::RequestBuilder> {
        let url = self.base.endpoint_url(path);
        let mut builder = self.http.request(method.clone(), &url);

        if let Some(token) = self.tokens.get() {
            builder = builder.bearer_auth(token.as_str());
        }

        match body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => builder = builder.json(value),
            RequestBody::Files(parts) => {
                // No explicit content-type here: the transport computes
                // the multipart boundary.
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    let mut file = reqwest::multipart::Part::bytes(part.bytes.clone())
                        .file_name(part.file_name.clone());
                    if let Some(mime) = &part.mime {
                        file = file.mime_str(mime)?;
                    }
                    form = form.part("files", file);
                }
                builder = builder.multipart(form);
            }
        }

        Ok(builder)
    }

    async fn perform_refresh(&self) -> bool {
        let url = self.base.endpoint_url(endpoints::REFRESH);
        debug!("refreshing access token");

        // No bearer header: the refresh endpoint authenticates with the
        // HTTP-only cookie the transport attaches on its own.
        let response = match self.http.post(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "refresh transport failure");
                return false;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "refresh rejected");
            return false;
        }

        match response.json::<RefreshResponse>().await {
            Ok(body) => {
                self.tokens.set(AccessToken::new(body.access_token));
                debug!("access token refreshed");
                true
            }
            Err(err) => {
                debug!(error = %err, "refresh response unreadable");
                false
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.inner.base)
            .field("tokens", &self.inner.tokens)
            .finish()
    }
}
