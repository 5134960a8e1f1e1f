use airmap_engine::domain::Coordinate;
use airmap_engine::sensors::{EstimateSource, ErrorKind, ResolverSettings, SensorResolver};
use std::sync::Arc;

use super::support::{km_north, FixedStations};

fn resolver(lookup: Arc<FixedStations>) -> SensorResolver {
    SensorResolver::new(lookup, ResolverSettings::default())
}

#[tokio::test]
async fn test_single_sensor_two_km_away_is_nearest() {
    let origin = Coordinate::new(0.0, 0.0);
    let lookup = Arc::new(
        FixedStations::new(0.1)
            .with_station(Coordinate::new(km_north(2.0), 0.0), 3, 20.0)
            .blind_at(origin),
    );

    let estimate = resolver(lookup.clone()).resolve(origin).await;

    assert_eq!(estimate.source, EstimateSource::Nearest);
    assert_eq!(estimate.aqi, Some(3));
    assert_eq!(estimate.components.pm2_5, Some(20.0));
    let distance = estimate.distance_km.unwrap();
    assert!((distance - 2.0).abs() < 0.01, "distance {distance}");
    assert_eq!(estimate.error.unwrap().kind, ErrorKind::NotFound);
    // every ring answered by the same station counts once, so all rings run
    assert_eq!(lookup.calls(), 41);
}

#[tokio::test]
async fn test_primary_answer_short_circuits() {
    let origin = Coordinate::new(0.0, 0.0);
    let lookup = Arc::new(
        FixedStations::new(0.1).with_station(Coordinate::new(km_north(2.0), 0.0), 2, 8.0),
    );

    let estimate = resolver(lookup.clone()).resolve(origin).await;

    assert_eq!(estimate.source, EstimateSource::Primary);
    assert_eq!(estimate.aqi, Some(2));
    assert!(estimate.error.is_none());
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_two_equidistant_sensors_interpolate() {
    let lookup = Arc::new(
        FixedStations::new(0.01)
            .with_station(Coordinate::new(0.1, 0.0), 2, 10.0)
            .with_station(Coordinate::new(-0.1, 0.0), 4, 30.0),
    );

    let estimate = resolver(lookup.clone())
        .resolve(Coordinate::new(0.0, 0.0))
        .await;

    assert_eq!(estimate.source, EstimateSource::Interpolated);
    assert_eq!(estimate.aqi, Some(3));
    assert_eq!(estimate.sensor_count, Some(2));
    let pm = estimate.components.pm2_5.unwrap();
    assert!((pm - 20.0).abs() < 1e-9, "pm2_5 {pm}");
    // primary plus the first ring only
    assert_eq!(lookup.calls(), 9);
}

#[tokio::test]
async fn test_no_sensors_anywhere() {
    let lookup = Arc::new(FixedStations::new(0.01));
    let estimate = resolver(lookup.clone())
        .resolve(Coordinate::new(10.0, 10.0))
        .await;

    assert_eq!(estimate.source, EstimateSource::Unavailable);
    assert!(estimate.aqi.is_none());
    assert!(estimate.components.is_empty());
    assert_eq!(estimate.error.unwrap().kind, ErrorKind::NotFound);
    assert_eq!(lookup.calls(), 41);
}
