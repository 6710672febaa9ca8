//! TheTVDB API client module.
//!
//! Handles authentication against the `login` endpoint and HTTP requests
//! to the JSON endpoints, unwrapping the `data` envelope of each response.

mod api;
mod client;
mod config;
mod error;
mod params;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTvdbApi, TvdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TvdbClient, TvdbClientBuilder};
pub use config::ClientConfig;
pub use error::RequestError;
pub use params::{DEFAULT_SEARCH_KEY, EpisodeQuery, ImagesQuery, QueryParams};
