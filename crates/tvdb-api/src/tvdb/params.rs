//! Query parameter types for TheTVDB endpoints.

use std::collections::BTreeMap;

/// String-keyed query parameters for the `*/query` endpoints.
pub type QueryParams = BTreeMap<String, String>;

/// Query key used by `search_series` when the caller does not name one.
pub const DEFAULT_SEARCH_KEY: &str = "name";

/// Page requested by `get_series_episodes` when none (or 0) is given.
pub(crate) const DEFAULT_PAGE: u32 = 1;

/// Resolves the page number for paged endpoints (pages start at 1).
pub(crate) fn resolve_page(page: Option<u32>) -> u32 {
    page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
}

/// Joins filter keys into the comma-separated form the API expects.
pub(crate) fn join_keys(keys: &[&str]) -> String {
    keys.iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parameters for `series/{id}/episodes/query`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeQuery {
    /// Absolute episode number.
    pub absolute_number: Option<u32>,
    /// Aired season number.
    pub aired_season: Option<u32>,
    /// Aired episode number.
    pub aired_episode: Option<u32>,
    /// DVD season number.
    pub dvd_season: Option<u32>,
    /// DVD episode number.
    pub dvd_episode: Option<u32>,
    /// IMDb ID (e.g. `tt3597774`).
    pub imdb_id: Option<String>,
    /// Result page.
    pub page: Option<u32>,
}

impl EpisodeQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the absolute episode number.
    #[must_use]
    pub const fn absolute_number(mut self, n: u32) -> Self {
        self.absolute_number = Some(n);
        self
    }

    /// Sets the aired season.
    #[must_use]
    pub const fn aired_season(mut self, n: u32) -> Self {
        self.aired_season = Some(n);
        self
    }

    /// Sets the aired episode.
    #[must_use]
    pub const fn aired_episode(mut self, n: u32) -> Self {
        self.aired_episode = Some(n);
        self
    }

    /// Sets the DVD season.
    #[must_use]
    pub const fn dvd_season(mut self, n: u32) -> Self {
        self.dvd_season = Some(n);
        self
    }

    /// Sets the DVD episode.
    #[must_use]
    pub const fn dvd_episode(mut self, n: u32) -> Self {
        self.dvd_episode = Some(n);
        self
    }

    /// Sets the IMDb ID.
    #[must_use]
    pub fn imdb_id(mut self, id: impl Into<String>) -> Self {
        self.imdb_id = Some(id.into());
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Converts into wire query parameters, omitting unset fields.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        let numbers = [
            ("absoluteNumber", self.absolute_number),
            ("airedSeason", self.aired_season),
            ("airedEpisode", self.aired_episode),
            ("dvdSeason", self.dvd_season),
            ("dvdEpisode", self.dvd_episode),
            ("page", self.page),
        ];
        for (key, value) in numbers {
            if let Some(v) = value {
                params.insert(String::from(key), v.to_string());
            }
        }
        if let Some(ref id) = self.imdb_id {
            params.insert(String::from("imdbId"), id.clone());
        }
        params
    }
}

/// Parameters for `series/{id}/images/query`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagesQuery {
    /// Image type (`fanart`, `poster`, `season`, `seasonwide`, `series`).
    pub key_type: Option<String>,
    /// Resolution (e.g. `1920x1080`).
    pub resolution: Option<String>,
    /// Sub key (e.g. a season number for `season` images).
    pub sub_key: Option<String>,
}

impl ImagesQuery {
    /// Creates a query for the given image type.
    #[must_use]
    pub fn key_type(key_type: impl Into<String>) -> Self {
        Self {
            key_type: Some(key_type.into()),
            ..Self::default()
        }
    }

    /// Sets the resolution.
    #[must_use]
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Sets the sub key.
    #[must_use]
    pub fn sub_key(mut self, sub_key: impl Into<String>) -> Self {
        self.sub_key = Some(sub_key.into());
        self
    }

    /// Converts into wire query parameters, omitting unset fields.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        [
            ("keyType", &self.key_type),
            ("resolution", &self.resolution),
            ("subKey", &self.sub_key),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (String::from(key), v.clone())))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_page_defaults_to_one() {
        // Arrange & Act & Assert
        assert_eq!(resolve_page(None), 1);
        assert_eq!(resolve_page(Some(0)), 1);
        assert_eq!(resolve_page(Some(3)), 3);
    }

    #[test]
    fn test_join_keys() {
        // Arrange
        let keys = ["seriesName", " network ", "", "firstAired"];

        // Act
        let joined = join_keys(&keys);

        // Assert
        assert_eq!(joined, "seriesName,network,firstAired");
    }

    #[test]
    fn test_episode_query_to_params() {
        // Arrange
        let query = EpisodeQuery::new().aired_season(2).aired_episode(5);

        // Act
        let params = query.to_params();

        // Assert
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("airedSeason").map(String::as_str), Some("2"));
        assert_eq!(params.get("airedEpisode").map(String::as_str), Some("5"));
    }

    #[test]
    fn test_episode_query_empty() {
        // Arrange & Act
        let params = EpisodeQuery::new().to_params();

        // Assert
        assert!(params.is_empty());
    }

    #[test]
    fn test_episode_query_imdb_id() {
        // Arrange & Act
        let params = EpisodeQuery::new().imdb_id("tt3597774").page(2).to_params();

        // Assert
        assert_eq!(params.get("imdbId").map(String::as_str), Some("tt3597774"));
        assert_eq!(params.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_images_query_to_params() {
        // Arrange
        let query = ImagesQuery::key_type("season").sub_key("1");

        // Act
        let params = query.to_params();

        // Assert
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("keyType").map(String::as_str), Some("season"));
        assert_eq!(params.get("subKey").map(String::as_str), Some("1"));
        assert!(!params.contains_key("resolution"));
    }
}
