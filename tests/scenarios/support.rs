use airmap_engine::domain::{AirComponents, Coordinate};
use airmap_engine::sensors::{ProbeError, SensorLookup, SensorReading};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed stations answering any probe within `reach_deg` of them
pub struct FixedStations {
    pub stations: Vec<(Coordinate, SensorReading)>,
    pub reach_deg: f64,
    /// Probes exactly here fail with 404
    pub blind_spot: Option<Coordinate>,
    pub calls: AtomicUsize,
}

impl FixedStations {
    pub fn new(reach_deg: f64) -> Self {
        Self {
            stations: Vec::new(),
            reach_deg,
            blind_spot: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_station(mut self, at: Coordinate, aqi: u8, pm2_5: f64) -> Self {
        let reading = SensorReading {
            aqi: Some(aqi),
            components: AirComponents {
                pm2_5: Some(pm2_5),
                ..Default::default()
            },
            observed_at: None,
            station: Some(at),
        };
        self.stations.push((at, reading));
        self
    }

    pub fn blind_at(mut self, at: Coordinate) -> Self {
        self.blind_spot = Some(at);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SensorLookup for FixedStations {
    async fn probe(&self, at: Coordinate) -> Result<SensorReading, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.blind_spot == Some(at) {
            return Err(ProbeError::Status(404));
        }
        self.stations
            .iter()
            .filter(|(s, _)| (s.lat - at.lat).abs().max((s.lon - at.lon).abs()) <= self.reach_deg)
            .min_by(|(a, _), (b, _)| {
                a.distance_km(&at)
                    .partial_cmp(&b.distance_km(&at))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(_, r)| r.clone())
            .ok_or(ProbeError::Empty)
    }
}

/// Kilometres to degrees of latitude
pub fn km_north(km: f64) -> f64 {
    km / 111.195
}
