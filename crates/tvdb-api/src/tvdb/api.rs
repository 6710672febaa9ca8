//! `TvdbApi` trait definition.
#![allow(clippy::future_not_send)]

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::RequestError;
use super::params::QueryParams;

/// TheTVDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
///
/// Endpoint methods return the payload found under the response's `data`
/// envelope, untyped.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TvdbApi: Send)]
pub trait LocalTvdbApi {
    /// Logs in with an API key and stores the issued token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-200 status, or a
    /// response without a `token` field.
    async fn authenticate(&self, api_key: &str) -> Result<(), RequestError>;

    /// Exchanges the stored token for a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is held (the service rejects the
    /// request), on transport failure, or on a non-200 status.
    async fn refresh_token(&self) -> Result<(), RequestError>;

    /// Lists all available languages.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_languages(&self) -> Result<Value, RequestError>;

    /// Fetches a single language.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_language(&self, id: u64) -> Result<Value, RequestError>;

    /// Searches series by name.
    ///
    /// Equivalent to `search_series_by("name", value)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn search_series(&self, value: &str) -> Result<Value, RequestError>;

    /// Searches series by the given key (`name`, `imdbId`, `zap2itId`, `slug`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn search_series_by(&self, key: &str, value: &str) -> Result<Value, RequestError>;

    /// Lists the keys accepted by series search (`data.params`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn search_series_params(&self) -> Result<Value, RequestError>;

    /// Fetches a series.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series(&self, id: u64) -> Result<Value, RequestError>;

    /// Fetches one page of a series' episodes (page 1 when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series_episodes(
        &self,
        id: u64,
        page: Option<u32>,
    ) -> Result<Value, RequestError>;

    /// Fetches an episode.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_episode(&self, id: u64) -> Result<Value, RequestError>;

    /// Queries a series' episodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_episode_query(
        &self,
        id: u64,
        params: &QueryParams,
    ) -> Result<Value, RequestError>;

    /// Lists the keys accepted by the episode query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series_episodes_params(&self, id: u64) -> Result<Value, RequestError>;

    /// Fetches the season/episode summary of a series.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series_episode_summaries(&self, id: u64) -> Result<Value, RequestError>;

    /// Fetches a series restricted to the given keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series_filter(&self, id: u64, keys: &[&str]) -> Result<Value, RequestError>;

    /// Lists the keys accepted by the series filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series_filter_params(&self, id: u64) -> Result<Value, RequestError>;

    /// Fetches image counts of a series.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series_images(&self, id: u64) -> Result<Value, RequestError>;

    /// Queries a series' images.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series_images_query(
        &self,
        id: u64,
        params: &QueryParams,
    ) -> Result<Value, RequestError>;

    /// Lists the keys accepted by the image query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_series_images_params(&self, id: u64) -> Result<Value, RequestError>;

    /// Lists series updated in the given window (`to` open-ended when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_updates(
        &self,
        from: DateTime<Utc>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Value, RequestError>;

    /// Lists the keys accepted by the updates query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    async fn get_updates_params(&self) -> Result<Value, RequestError>;
}
