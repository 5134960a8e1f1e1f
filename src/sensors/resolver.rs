//! Air-quality resolution for an arbitrary coordinate.
//!
//! A direct probe is tried first. When it fails, rings of probe points at
//! growing radii are queried until enough samples exist to interpolate.
//! Probes within a ring run concurrently, bounded by
//! `max_concurrent_probes`, but their results are consumed in ring order and
//! the ring stream is dropped as soon as that ring has added its cap of
//! samples. Dropping
//! the stream cancels whatever probes are still in flight, and the collected
//! set is the same one a sequential walk of the ring would produce.

use futures::{stream, StreamExt};
use ordered_float::OrderedFloat;
use std::{collections::HashSet, f64::consts::PI, sync::Arc, time::Duration};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{AqiEstimate, EstimateError, ErrorKind, ProbeError, SensorLookup, SensorSample};
use crate::domain::Coordinate;

/// Ring radii in degrees, searched in order
pub const SEARCH_RADII_DEG: [f64; 5] = [0.1, 0.5, 1.0, 2.0, 5.0];
pub const PROBES_PER_RING: usize = 8;
/// Probing within one ring stops once it has added this many samples
pub const MAX_SAMPLES_PER_RING: usize = 4;
/// Ring expansion stops once this many samples are held
pub const MIN_INTERPOLATION_SAMPLES: usize = 2;

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub primary_timeout: Duration,
    pub probe_timeout: Duration,
    pub max_concurrent_probes: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            primary_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(4),
            max_concurrent_probes: 4,
        }
    }
}

/// Evenly spaced probe points around `origin` at `radius_deg`
pub fn ring_points(origin: Coordinate, radius_deg: f64, count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            let angle = i as f64 * 2.0 * PI / count as f64;
            origin.offset(radius_deg * angle.cos(), radius_deg * angle.sin())
        })
        .collect()
}

pub struct SensorResolver {
    lookup: Arc<dyn SensorLookup>,
    settings: ResolverSettings,
}

impl SensorResolver {
    pub fn new(lookup: Arc<dyn SensorLookup>, settings: ResolverSettings) -> Self {
        Self { lookup, settings }
    }

    pub fn has_credential(&self) -> bool {
        self.lookup.has_credential()
    }

    /// Best-effort estimate for `at`; never fails
    pub async fn resolve(&self, at: Coordinate) -> AqiEstimate {
        if !self.lookup.has_credential() {
            warn!(lat = at.lat, lon = at.lon, "sensor credential missing, skipping probes");
            return AqiEstimate::unavailable(Some(EstimateError::new(
                ErrorKind::ApiKey,
                ProbeError::MissingCredential.to_string(),
            )));
        }

        let primary_err = match timeout(self.settings.primary_timeout, self.lookup.probe(at)).await
        {
            Ok(Ok(reading)) if reading.is_usable() => {
                debug!(lat = at.lat, lon = at.lon, "primary probe succeeded");
                return AqiEstimate::primary(reading);
            }
            Ok(Ok(_)) => ProbeError::Empty,
            Ok(Err(e)) => e,
            Err(_) => ProbeError::Timeout,
        };
        let error = EstimateError::from(&primary_err);
        warn!(
            lat = at.lat,
            lon = at.lon,
            kind = %error.kind,
            error = %primary_err,
            "primary probe failed, expanding search"
        );

        let samples = self.search(at).await;
        let estimate = AqiEstimate::from_samples(&samples).with_error(Some(error));
        info!(
            lat = at.lat,
            lon = at.lon,
            samples = samples.len(),
            source = ?estimate.source,
            "resolved from nearby sensors"
        );
        estimate
    }

    /// Expanding-ring search around `origin`
    pub async fn search(&self, origin: Coordinate) -> Vec<SensorSample> {
        let mut samples: Vec<SensorSample> = Vec::new();
        let mut stations: HashSet<(OrderedFloat<f64>, OrderedFloat<f64>)> = HashSet::new();

        for radius in SEARCH_RADII_DEG {
            if samples.len() >= MIN_INTERPOLATION_SAMPLES {
                break;
            }

            let ring_start = samples.len();
            let points = ring_points(origin, radius, PROBES_PER_RING);
            let mut probes = stream::iter(points)
                .map(|p| self.probe_point(p))
                .buffered(self.settings.max_concurrent_probes.max(1));

            while let Some(found) = probes.next().await {
                let Some(sample) = found.map(|(point, reading)| {
                    let location = reading.station.unwrap_or(point);
                    SensorSample::new(origin, location, reading)
                }) else {
                    continue;
                };
                let key = (
                    OrderedFloat(sample.coordinate.lat),
                    OrderedFloat(sample.coordinate.lon),
                );
                // a station already sampled adds nothing to this ring's count
                if !stations.insert(key) {
                    continue;
                }
                samples.push(sample);
                if samples.len() - ring_start >= MAX_SAMPLES_PER_RING {
                    break;
                }
            }
            debug!(radius_deg = radius, samples = samples.len(), "ring searched");
        }

        samples
    }

    /// Single ring probe; failures and timeouts are skipped, never retried
    async fn probe_point(
        &self,
        point: Coordinate,
    ) -> Option<(Coordinate, super::SensorReading)> {
        match timeout(self.settings.probe_timeout, self.lookup.probe(point)).await {
            Ok(Ok(reading)) if reading.is_usable() => Some((point, reading)),
            Ok(Ok(_)) => None,
            Ok(Err(e)) => {
                debug!(lat = point.lat, lon = point.lon, error = %e, "ring probe failed");
                None
            }
            Err(_) => {
                debug!(lat = point.lat, lon = point.lon, "ring probe timed out");
                None
            }
        }
    }
}
