//! Wire-level tests for the Firebase REST client against a stub HTTP server.

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agrisense_backend::firebase::{FirebaseClient, RemoteDb};

// ---

#[tokio::test]
async fn get_sensor_data_reads_the_field_path_verbatim() {
    // ---
    let server = MockServer::start().await;
    let snapshot = json!({
        "moisture": 28.0,
        "temperature": 26.1,
        "humidity": 58.0,
        "soil_ph": 6.9,
        "n_level": 35.0,
        "p_level": 18.0,
        "k_level": 14.0,
    });

    Mock::given(method("GET"))
        .and(path("/fields/7/sensor_data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = FirebaseClient::new(server.uri(), None);
    let data = client.get_sensor_data(7).await.unwrap();

    assert_eq!(data, Some(snapshot));
}

#[tokio::test]
async fn null_body_means_no_data() {
    // ---
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fields/11/sensor_data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let client = FirebaseClient::new(server.uri(), None);
    let data = client.get_sensor_data(11).await.unwrap();

    assert_eq!(data, None);
}

#[tokio::test]
async fn auth_token_is_sent_as_query_parameter() {
    // ---
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fields/3/sensor_data.json"))
        .and(query_param("auth", "sekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let client = FirebaseClient::new(server.uri(), Some("sekrit".to_string()));
    client.get_sensor_data(3).await.unwrap();
}

#[tokio::test]
async fn push_prediction_posts_under_the_history_path() {
    // ---
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fields/7/predictions.json"))
        .and(body_partial_json(json!({
            "predictions": { "yield_kg_per_ha": 2500.0 },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "-NxPushKey" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = FirebaseClient::new(server.uri(), None);
    let entry = json!({
        "timestamp": 1754553600000i64,
        "predictions": { "yield_kg_per_ha": 2500.0 },
    });

    client.push_prediction(7, entry).await.unwrap();
}

#[tokio::test]
async fn http_error_status_surfaces_as_error() {
    // ---
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fields/1/sensor_data.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = FirebaseClient::new(server.uri(), None);
    assert!(client.get_sensor_data(1).await.is_err());
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    // ---
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fields/2/sensor_data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let client = FirebaseClient::new(format!("{}/", server.uri()), None);
    client.get_sensor_data(2).await.unwrap();
}
