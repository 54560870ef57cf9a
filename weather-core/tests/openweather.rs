//! OpenWeather client against a mock HTTP server.

use weather_core::{OpenWeatherClient, ProviderError, WeatherClient};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn london_body() -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -0.12, "lat": 51.5},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 15.2, "feels_like": 14.6, "pressure": 1012, "humidity": 70},
        "wind": {"speed": 5, "deg": 240},
        "sys": {"country": "GB", "sunrise": 1700000000, "sunset": 1700030000},
        "name": "London",
        "cod": 200
    })
}

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(server.uri(), "TEST_KEY", None).expect("client should build")
}

#[tokio::test]
async fn fetch_by_coordinates_sends_metric_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server).fetch_by_coordinates(51.5, -0.12).await.unwrap();

    assert_eq!(snapshot.location_name, "London");
    assert_eq!(snapshot.country_code, "GB");
    assert_eq!(snapshot.condition_main, "Clouds");
    assert_eq!(snapshot.temperature_celsius, 15.2);
    assert_eq!(snapshot.humidity_percent, 70);
    assert_eq!(snapshot.wind_speed, 5.0);
}

#[tokio::test]
async fn fetch_by_city_name_queries_q() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "São Paulo"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "weather": [{"main": "Rain"}],
            "main": {"temp": 22.4, "humidity": 88},
            "wind": {"speed": 2.1},
            "sys": {"country": "BR"},
            "name": "São Paulo"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server).fetch_by_city_name("São Paulo").await.unwrap();
    assert_eq!(snapshot.country_code, "BR");
    assert_eq!(snapshot.condition_main, "Rain");
}

#[tokio::test]
async fn not_found_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).fetch_by_city_name("Atlantis").await.unwrap_err();
    match err {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn partial_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "London",
            "weather": [{"main": "Clouds"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server).fetch_by_city_name("London").await.unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = OpenWeatherClient::new(uri, "TEST_KEY", None).expect("client should build");
    let err = client.fetch_by_coordinates(0.0, 0.0).await.unwrap_err();
    assert!(matches!(err, ProviderError::Request(_)));
}
