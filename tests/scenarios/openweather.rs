use airmap_engine::domain::Coordinate;
use airmap_engine::sensors::{
    EstimateSource, ErrorKind, OpenWeatherClient, ProbeError, ResolverSettings, SensorLookup,
    SensorResolver,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(server.uri(), Some("test-key".into()), Duration::from_secs(5)).unwrap()
}

fn payload(lat: f64, lon: f64, aqi: u8) -> serde_json::Value {
    json!({
        "coord": {"lat": lat, "lon": lon},
        "list": [{
            "main": {"aqi": aqi},
            "components": {"co": 201.9, "no2": 0.77, "o3": 68.66, "so2": 0.64,
                           "pm2_5": 0.5, "pm10": 0.54, "nh3": 0.12},
            "dt": 1606147200
        }]
    })
}

#[tokio::test]
async fn test_primary_reading_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/air_pollution"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload(50.0, 50.0, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = SensorResolver::new(Arc::new(client(&server)), ResolverSettings::default());
    let estimate = resolver.resolve(Coordinate::new(50.0, 50.0)).await;

    assert_eq!(estimate.source, EstimateSource::Primary);
    assert_eq!(estimate.aqi, Some(1));
    assert_eq!(estimate.components.co, Some(201.9));
}

#[tokio::test]
async fn test_status_codes_map_to_probe_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server)
        .probe(Coordinate::new(1.0, 1.0))
        .await
        .unwrap_err();
    assert_eq!(err, ProbeError::Status(401));
    assert_eq!(err.kind(), ErrorKind::ApiKey);
}

#[tokio::test]
async fn test_rate_limited_everywhere_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let resolver = SensorResolver::new(Arc::new(client(&server)), ResolverSettings::default());
    let estimate = resolver.resolve(Coordinate::new(1.0, 1.0)).await;

    assert_eq!(estimate.source, EstimateSource::Unavailable);
    assert_eq!(estimate.error.unwrap().kind, ErrorKind::RateLimit);
}

#[tokio::test]
async fn test_malformed_body_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .probe(Coordinate::new(1.0, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Malformed(_)));
    assert_eq!(err.kind(), ErrorKind::Unknown);
}
