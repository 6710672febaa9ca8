//! Client library for TheTVDB JSON API.
//!
//! Wraps authentication and the v2.1.1 read endpoints (languages, search,
//! series, episodes, images, updates) behind a single async client.

/// TheTVDB API client.
pub mod tvdb;
