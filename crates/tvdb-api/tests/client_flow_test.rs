#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::sync::Arc;

use serde_json::{Value, json};
use tvdb_api::tvdb::{RequestError, TvdbApi, TvdbClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Returns the air date of an episode through any `TvdbApi` implementation.
async fn first_aired<A: TvdbApi>(api: &A, id: u64) -> Result<Option<String>, RequestError> {
    let episode = api.get_episode(id).await?;
    Ok(episode["firstAired"].as_str().map(String::from))
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_authenticate_then_fetch_episode() {
    // Arrange
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "flow-token").await;

    Mock::given(method("GET"))
        .and(path("/episodes/4768125"))
        .and(header("Authorization", "Bearer flow-token"))
        .and(header("Accept-Language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tvdb/episode_4768125.json"
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TvdbClient::builder()
        .base_url(mock_server.uri().parse().unwrap())
        .build()
        .unwrap();

    // Act
    client.authenticate("api-key").await.unwrap();
    let aired = first_aired(&client, 4_768_125).await.unwrap();

    // Assert
    assert_eq!(aired.as_deref(), Some("2014-03-30"));
}

#[tokio::test]
async fn test_client_is_shareable_across_tasks() {
    // Arrange
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, "shared-token").await;

    Mock::given(method("GET"))
        .and(path("/languages/7"))
        .and(header("Authorization", "Bearer shared-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/tvdb/language_7.json"
        )))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = Arc::new(
        TvdbClient::builder()
            .base_url(mock_server.uri().parse().unwrap())
            .build()
            .unwrap(),
    );
    client.authenticate("api-key").await.unwrap();

    // Act
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.get_language(7).await })
        })
        .collect();

    let mut languages: Vec<Value> = Vec::new();
    for handle in handles {
        languages.push(handle.await.unwrap().unwrap());
    }

    // Assert
    for language in languages {
        assert_eq!(language["abbreviation"], "en");
        assert_eq!(language["englishName"], "English");
    }
}

#[tokio::test]
async fn test_language_change_applies_to_next_request() {
    // Arrange
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/series/121361"))
        .and(header("Accept-Language", "pt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "seriesName": "A Guerra dos Tronos" } })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TvdbClient::builder()
        .base_url(mock_server.uri().parse().unwrap())
        .token("preset")
        .build()
        .unwrap();

    // Act
    client.set_language("pt");
    let series = client.get_series(121_361).await.unwrap();

    // Assert
    assert_eq!(series["seriesName"], "A Guerra dos Tronos");
}

#[tokio::test]
async fn test_expired_token_surfaces_status() {
    // Arrange
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/languages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "Error": "Not Authorized" })))
        .mount(&mock_server)
        .await;

    let client = TvdbClient::builder()
        .base_url(mock_server.uri().parse().unwrap())
        .token("expired")
        .build()
        .unwrap();

    // Act
    let err = client.get_languages().await.unwrap_err();

    // Assert
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Not Authorized");
}
