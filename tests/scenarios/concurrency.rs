//! Many simultaneous resolutions and simulations sharing one set of services

use airmap_engine::domain::Coordinate;
use airmap_engine::emissions::{
    simulate, GridBounds, ItemKind, PlanePoint, SimulationItem, WindConfig,
};
use airmap_engine::sensors::{EstimateSource, ResolverSettings, SensorResolver};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use super::support::FixedStations;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_resolutions_share_one_resolver() {
    let lookup = Arc::new(
        FixedStations::new(0.05)
            .with_station(Coordinate::new(10.0, 10.0), 2, 12.0)
            .with_station(Coordinate::new(20.0, 20.0), 4, 40.0),
    );
    let resolver = Arc::new(SensorResolver::new(lookup, ResolverSettings::default()));

    let start = Instant::now();
    let mut set = JoinSet::new();
    for i in 0..200 {
        let resolver = resolver.clone();
        set.spawn(async move {
            let at = if i % 2 == 0 {
                Coordinate::new(10.0, 10.0)
            } else {
                Coordinate::new(20.0, 20.0)
            };
            resolver.resolve(at).await
        });
    }

    let mut primary = 0;
    while let Some(res) = set.join_next().await {
        if res.unwrap().source == EstimateSource::Primary {
            primary += 1;
        }
    }
    assert_eq!(primary, 200);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_parallel_simulations_are_identical() {
    let items: Vec<SimulationItem> = (0..50)
        .map(|i| {
            SimulationItem::new(
                i.to_string(),
                ItemKind::NonRenewable,
                PlanePoint::new(10.0, 10.0),
            )
        })
        .collect();
    let items = Arc::new(items);
    let wind = WindConfig {
        speed_kmh: 1000.0,
        direction_degrees: 45.0,
        enabled: true,
    };
    let bounds = GridBounds::new(0.0, 0.0, 40.0, 40.0);

    let mut set = JoinSet::new();
    for _ in 0..16 {
        let items = items.clone();
        set.spawn_blocking(move || simulate(&items, &wind, &bounds, 1.0));
    }

    let mut outputs = Vec::new();
    while let Some(res) = set.join_next().await {
        outputs.push(res.unwrap());
    }
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    assert!(outputs[0]
        .grid
        .cells
        .iter()
        .all(|c| (0.0..=500.0).contains(&c.aqi)));
}
