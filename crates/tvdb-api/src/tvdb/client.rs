//! `TvdbClient` - TheTVDB API client implementation.

use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::TvdbApi;
use super::config::{ClientConfig, DEFAULT_LANGUAGE};
use super::error::RequestError;
use super::params::{DEFAULT_SEARCH_KEY, QueryParams, join_keys, resolve_page};

/// Default base URL for TheTVDB API.
const DEFAULT_BASE_URL: &str = "https://api.thetvdb.com/";

/// Media type selecting API version 2.1.1.
const ACCEPT_VERSION: &str = "application/vnd.thetvdb.v2.1.1";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Empty query string.
const NO_QUERY: &[(&str, &str)] = &[];

/// Location of the payload inside a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    /// `data`
    Data,
    /// `data.params`
    DataParams,
    /// `token` (login and refresh responses)
    Token,
}

impl Envelope {
    /// JSON pointer to the payload.
    const fn pointer(self) -> &'static str {
        match self {
            Self::Data => "/data",
            Self::DataParams => "/data/params",
            Self::Token => "/token",
        }
    }
}

/// Body of `POST login`.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    apikey: &'a str,
}

/// TheTVDB API client.
///
/// Holds the preferred language and the bearer token. The token is written
/// only by `authenticate` and `refresh_token`; every other call reads it.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TvdbClient {
    /// HTTP client (Accept and User-Agent preset).
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Preferred response language (`Accept-Language`).
    language: RwLock<String>,
    /// Bearer token.
    token: RwLock<Option<String>>,
}

/// Builder for `TvdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TvdbClientBuilder {
    base_url: Option<String>,
    language: Option<String>,
    token: Option<String>,
    user_agent: Option<String>,
}

impl TvdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            language: None,
            token: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the preferred response language (default: `en`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets a pre-existing bearer token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the User-Agent (default: `tvdb-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Applies every option set in `config`.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.language = Some(config.language);
        if config.token.is_some() {
            self.token = config.token;
        }
        if config.base_url.is_some() {
            self.base_url = config.base_url;
        }
        if config.user_agent.is_some() {
            self.user_agent = config.user_agent;
        }
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - the base URL cannot be parsed.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TvdbClient> {
        let raw_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let mut base_url =
            Url::parse(raw_url).with_context(|| format!("invalid base URL: {raw_url}"))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VERSION));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TvdbClient {
            http_client,
            base_url,
            language: RwLock::new(
                self.language
                    .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            ),
            token: RwLock::new(self.token),
        })
    }
}

impl TvdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TvdbClientBuilder {
        TvdbClientBuilder::new()
    }

    /// Builds a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Returns the preferred response language.
    #[must_use]
    pub fn language(&self) -> String {
        self.language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Changes the preferred response language for subsequent calls.
    pub fn set_language(&self, language: impl Into<String>) {
        *self.language.write().unwrap_or_else(PoisonError::into_inner) = language.into();
    }

    /// Returns the current bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the bearer token wholesale.
    fn set_token(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Joins an endpoint path onto the base URL.
    fn endpoint_url(&self, path: &str) -> Result<Url, RequestError> {
        self.base_url
            .join(path)
            .map_err(|e| RequestError::invalid_url(e, path))
    }

    /// Attaches the bearer token, if one is held.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and unwraps the payload at `envelope`.
    async fn send(
        &self,
        request: RequestBuilder,
        envelope: Envelope,
    ) -> Result<Value, RequestError> {
        let request = request.build().map_err(RequestError::transport)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "TheTVDB API request");

        let response = self.http_client.execute(request).await.map_err(|e| {
            tracing::warn!(error = %e, "TheTVDB API request failed");
            RequestError::transport(e)
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::body(e, status.as_u16()))?;
        tracing::debug!(%status, body_len = body.len(), "Response body received");

        unwrap_response(status, &body, envelope)
    }

    /// Sends an authenticated GET with `Accept-Language` and a query string.
    async fn get_json<Q>(
        &self,
        path: &str,
        query: &Q,
        envelope: Envelope,
    ) -> Result<Value, RequestError>
    where
        Q: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint_url(path)?;
        let request = self
            .authorized(self.http_client.get(url))
            .header(ACCEPT_LANGUAGE, self.language())
            .query(query);
        self.send(request, envelope).await
    }

    /// Searches series with an explicit query key.
    async fn search(&self, key: &str, value: &str) -> Result<Value, RequestError> {
        let query = [(key, value)];
        self.get_json("search/series", &query, Envelope::Data).await
    }
}

/// Normalizes a response into its payload or a `RequestError`.
///
/// An `Error` field in the body wins over the status code. Any other
/// non-200 status fails with the status attached.
fn unwrap_response(
    status: StatusCode,
    body: &str,
    envelope: Envelope,
) -> Result<Value, RequestError> {
    let code = status.as_u16();
    let parsed = serde_json::from_str::<Value>(body);

    if let Ok(ref value) = parsed
        && let Some(message) = service_error(value)
    {
        tracing::warn!(status = code, %message, "TheTVDB API returned an error");
        return Err(RequestError::service(message, code));
    }

    if status != StatusCode::OK {
        tracing::warn!(status = code, "TheTVDB API returned unexpected status");
        return Err(RequestError::unexpected_status(code));
    }

    let mut value = parsed.map_err(|e| RequestError::decode(e, code))?;
    value
        .pointer_mut(envelope.pointer())
        .map(Value::take)
        .ok_or_else(|| RequestError::missing_field(envelope.pointer(), code))
}

/// Extracts the service's `Error` message, if present.
fn service_error(body: &Value) -> Option<String> {
    let error = body.get("Error").filter(|v| !v.is_null())?;
    Some(error.as_str().map_or_else(|| error.to_string(), String::from))
}

/// Extracts the token string from a login/refresh payload.
fn take_token(value: Value) -> Result<String, RequestError> {
    match value {
        Value::String(token) => Ok(token),
        _ => Err(RequestError::missing_field(
            Envelope::Token.pointer(),
            StatusCode::OK.as_u16(),
        )),
    }
}

impl TvdbApi for TvdbClient {
    #[instrument(skip_all)]
    async fn authenticate(&self, api_key: &str) -> Result<(), RequestError> {
        let url = self.endpoint_url("login")?;
        let request = self
            .http_client
            .post(url)
            .json(&LoginRequest { apikey: api_key });
        let token = take_token(self.send(request, Envelope::Token).await?)?;
        self.set_token(token);
        tracing::debug!("TheTVDB token issued");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn refresh_token(&self) -> Result<(), RequestError> {
        if self.token().is_none() {
            tracing::debug!("Refreshing without a token; the service will reject it");
        }
        let url = self.endpoint_url("refresh_token")?;
        let request = self.authorized(self.http_client.get(url));
        let token = take_token(self.send(request, Envelope::Token).await?)?;
        self.set_token(token);
        tracing::debug!("TheTVDB token refreshed");
        Ok(())
    }

    #[instrument(skip_all)]
    async fn get_languages(&self) -> Result<Value, RequestError> {
        self.get_json("languages", NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_language(&self, id: u64) -> Result<Value, RequestError> {
        let path = format!("languages/{id}");
        self.get_json(&path, NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn search_series(&self, value: &str) -> Result<Value, RequestError> {
        self.search(DEFAULT_SEARCH_KEY, value).await
    }

    #[instrument(skip(self))]
    async fn search_series_by(&self, key: &str, value: &str) -> Result<Value, RequestError> {
        self.search(key, value).await
    }

    #[instrument(skip_all)]
    async fn search_series_params(&self) -> Result<Value, RequestError> {
        self.get_json("search/series/params", NO_QUERY, Envelope::DataParams)
            .await
    }

    #[instrument(skip(self))]
    async fn get_series(&self, id: u64) -> Result<Value, RequestError> {
        let path = format!("series/{id}");
        self.get_json(&path, NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_series_episodes(
        &self,
        id: u64,
        page: Option<u32>,
    ) -> Result<Value, RequestError> {
        let path = format!("series/{id}/episodes");
        let query = [("page", resolve_page(page).to_string())];
        self.get_json(&path, &query, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_episode(&self, id: u64) -> Result<Value, RequestError> {
        let path = format!("episodes/{id}");
        self.get_json(&path, NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_episode_query(
        &self,
        id: u64,
        params: &QueryParams,
    ) -> Result<Value, RequestError> {
        let path = format!("series/{id}/episodes/query");
        self.get_json(&path, params, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_series_episodes_params(&self, id: u64) -> Result<Value, RequestError> {
        let path = format!("series/{id}/episodes/query/params");
        self.get_json(&path, NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_series_episode_summaries(&self, id: u64) -> Result<Value, RequestError> {
        let path = format!("series/{id}/episodes/summary");
        self.get_json(&path, NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_series_filter(&self, id: u64, keys: &[&str]) -> Result<Value, RequestError> {
        let path = format!("series/{id}/filter");
        let query = [("keys", join_keys(keys))];
        self.get_json(&path, &query, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_series_filter_params(&self, id: u64) -> Result<Value, RequestError> {
        let path = format!("series/{id}/filter/params");
        self.get_json(&path, NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_series_images(&self, id: u64) -> Result<Value, RequestError> {
        let path = format!("series/{id}/images");
        self.get_json(&path, NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_series_images_query(
        &self,
        id: u64,
        params: &QueryParams,
    ) -> Result<Value, RequestError> {
        let path = format!("series/{id}/images/query");
        self.get_json(&path, params, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_series_images_params(&self, id: u64) -> Result<Value, RequestError> {
        let path = format!("series/{id}/images/query/params");
        self.get_json(&path, NO_QUERY, Envelope::Data).await
    }

    #[instrument(skip(self))]
    async fn get_updates(
        &self,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Value, RequestError> {
        let mut query: Vec<(&str, String)> = vec![("fromTime", from.timestamp().to_string())];
        if let Some(to) = to {
            query.push(("toTime", to.timestamp().to_string()));
        }
        self.get_json("updated/query", &query, Envelope::Data).await
    }

    #[instrument(skip_all)]
    async fn get_updates_params(&self) -> Result<Value, RequestError> {
        self.get_json("updated/query/params", NO_QUERY, Envelope::Data)
            .await
    }
}
