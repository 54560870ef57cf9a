//! End-to-end controller scenarios over a mocked provider.

use std::{sync::Arc, time::Duration};

use weather_core::{
    ConditionIcon, Coordinates, FixedLocation, IpLocation, LocationError, LocationProvider,
    OpenWeatherClient, Phase, Screen, WeatherViewController,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn body(
    name: &str,
    country: &str,
    main: &str,
    temp: f64,
    humidity: u8,
    wind: f64,
) -> serde_json::Value {
    serde_json::json!({
        "weather": [{"main": main}],
        "main": {"temp": temp, "humidity": humidity},
        "wind": {"speed": wind},
        "sys": {"country": country},
        "name": name
    })
}

async fn mount_coords(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(body("London", "GB", "Clouds", 15.2, 70, 5.0)),
        )
        .mount(server)
        .await;
}

async fn mount_city(server: &MockServer, city: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", city))
        .respond_with(response)
        .mount(server)
        .await;
}

fn controller(base_url: String) -> WeatherViewController {
    let client = OpenWeatherClient::new(base_url, "TEST_KEY", None).expect("client should build");
    WeatherViewController::new(
        Arc::new(client),
        Arc::new(FixedLocation(Coordinates::new(51.5, -0.12))),
    )
}

#[tokio::test]
async fn geolocated_session_shows_london() {
    let server = MockServer::start().await;
    mount_coords(&server).await;
    let ctrl = controller(server.uri());

    ctrl.start_session().await;

    let Screen::Weather(card) = ctrl.view().screen else {
        panic!("expected the weather card");
    };
    assert_eq!(card.location_name, "London");
    assert_eq!(card.country_code, "GB");
    assert_eq!(card.icon, ConditionIcon::Cloud);
    assert_eq!(card.temperature, "15.2");
    assert_eq!(card.condition, "Clouds");
    assert_eq!(card.humidity, "70%");
    assert_eq!(card.wind, "5 Km/Hr");
}

#[tokio::test]
async fn search_for_paris_switches_to_sun() {
    let server = MockServer::start().await;
    mount_coords(&server).await;
    mount_city(
        &server,
        "Paris",
        ResponseTemplate::new(200).set_body_json(body("Paris", "FR", "Clear", 24.0, 40, 2.5)),
    )
    .await;
    let ctrl = controller(server.uri());
    ctrl.start_session().await;

    ctrl.set_search_text("Paris");
    ctrl.search().await;

    let snapshot = ctrl.state().snapshot.unwrap();
    assert_eq!(snapshot.location_name, "Paris");
    assert_eq!(snapshot.country_code, "FR");
    assert_eq!(snapshot.humidity_percent, 40);
    let Screen::Weather(card) = ctrl.view().screen else {
        panic!("expected the weather card");
    };
    assert_eq!(card.icon, ConditionIcon::Sun);
    assert_eq!(card.wind, "2.5 Km/Hr");
}

#[tokio::test]
async fn search_network_failure_keeps_view_state() {
    let server = MockServer::start().await;
    mount_coords(&server).await;
    let ctrl = controller(server.uri());
    ctrl.start_session().await;
    ctrl.set_search_text("Paris");
    let before = ctrl.state();

    // Same state, but the provider is gone.
    let dead = MockServer::start().await;
    let dead_uri = dead.uri();
    drop(dead);
    let offline = controller(dead_uri);
    offline.start_session().await;
    offline.set_search_text("Paris");
    let offline_before = offline.state();
    offline.search().await;
    assert_eq!(offline.state(), offline_before);
    assert_eq!(offline.phase(), Phase::AwaitingLocation);

    mount_city(&server, "Paris", ResponseTemplate::new(500)).await;
    ctrl.search().await;
    assert_eq!(ctrl.state(), before);
}

#[tokio::test]
async fn slow_session_response_loses_to_later_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "51.5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body("London", "GB", "Clouds", 15.2, 70, 5.0))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_city(
        &server,
        "Paris",
        ResponseTemplate::new(200).set_body_json(body("Paris", "FR", "Clear", 24.0, 40, 2.5)),
    )
    .await;
    let ctrl = controller(server.uri());
    ctrl.set_search_text("Paris");

    let search_later = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        ctrl.search().await;
    };
    tokio::join!(ctrl.start_session(), search_later);

    assert_eq!(ctrl.state().snapshot.map(|s| s.location_name).as_deref(), Some("Paris"));
}

#[tokio::test]
async fn ip_location_resolves_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success", "country": "United Kingdom", "lat": 51.5, "lon": -0.12
        })))
        .mount(&server)
        .await;

    let loc = IpLocation::new(format!("{}/json", server.uri()));
    assert_eq!(loc.current_position().await, Ok(Coordinates::new(51.5, -0.12)));
}

#[tokio::test]
async fn ip_location_failure_status_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail", "message": "reserved range"
        })))
        .mount(&server)
        .await;

    let loc = IpLocation::new(format!("{}/json", server.uri()));
    assert_eq!(
        loc.current_position().await,
        Err(LocationError::Unavailable("reserved range".into()))
    );
}
