//! Resolution of collected sensor samples into a single estimate.
//!
//! Two or more samples are combined by inverse-distance weighting (power 2).
//! A field is averaged only over the samples that reported it, so a station
//! without an SO2 channel neither drags SO2 towards zero nor dilutes it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::{EstimateError, SensorReading};
use crate::domain::{round_eu_aqi, AirComponents, Coordinate, Pollutant};

/// IDW exponent
pub const IDW_POWER: i32 = 2;

/// Distances below this (km) are treated as this value when weighting
pub const MIN_WEIGHT_DISTANCE_KM: f64 = 0.1;

/// A reading located relative to the resolution origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSample {
    pub coordinate: Coordinate,
    pub aqi: Option<u8>,
    pub components: AirComponents,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl SensorSample {
    pub fn new(origin: Coordinate, coordinate: Coordinate, reading: SensorReading) -> Self {
        let reading = reading.sanitized();
        Self {
            coordinate,
            aqi: reading.aqi,
            components: reading.components,
            distance_km: origin.distance_km(&coordinate),
            observed_at: reading.observed_at,
        }
    }

    pub fn weight(&self) -> f64 {
        1.0 / self.distance_km.max(MIN_WEIGHT_DISTANCE_KM).powi(IDW_POWER)
    }
}

/// How an estimate was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSource {
    Primary,
    Nearest,
    Interpolated,
    Unavailable,
}

/// Air-quality estimate for a coordinate
///
/// Constructed only through the associated functions so the field-presence
/// rules hold: `Unavailable` carries no numbers, `Interpolated` always has a
/// sample count of two or more and an average distance, `Nearest` carries the
/// distance to its single sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AqiEstimate {
    pub aqi: Option<u8>,
    pub components: AirComponents,
    pub source: EstimateSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_count: Option<usize>,
    #[serde(rename = "avgDistance", skip_serializing_if = "Option::is_none")]
    pub avg_distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EstimateError>,
    /// When the underlying observation was taken; the newest sample's time
    /// for an interpolated estimate. Reported as the response `timestamp`.
    #[serde(skip)]
    pub observed_at: Option<DateTime<Utc>>,
}

impl AqiEstimate {
    pub fn primary(reading: SensorReading) -> Self {
        let reading = reading.sanitized();
        Self {
            aqi: reading.aqi,
            components: reading.components,
            source: EstimateSource::Primary,
            sensor_count: None,
            avg_distance_km: None,
            distance_km: None,
            error: None,
            observed_at: reading.observed_at,
        }
    }

    pub fn unavailable(error: Option<EstimateError>) -> Self {
        Self {
            aqi: None,
            components: AirComponents::default(),
            source: EstimateSource::Unavailable,
            sensor_count: None,
            avg_distance_km: None,
            distance_km: None,
            error,
            observed_at: None,
        }
    }

    pub fn nearest(sample: &SensorSample) -> Self {
        Self {
            aqi: sample.aqi,
            components: sample.components,
            source: EstimateSource::Nearest,
            sensor_count: None,
            avg_distance_km: None,
            distance_km: Some(sample.distance_km),
            error: None,
            observed_at: sample.observed_at,
        }
    }

    /// IDW blend of two or more samples; falls back to `nearest`/`unavailable`
    /// for smaller inputs
    pub fn interpolated(samples: &[SensorSample]) -> Self {
        match samples {
            [] => return Self::unavailable(None),
            [single] => return Self::nearest(single),
            _ => {}
        }

        let aqi = weighted_mean(samples, |s| s.aqi.map(f64::from)).and_then(round_eu_aqi);
        let mut components = AirComponents::default();
        for p in Pollutant::iter() {
            components.set(p, weighted_mean(samples, |s| s.components.get(p)));
        }
        let avg_distance =
            samples.iter().map(|s| s.distance_km).sum::<f64>() / samples.len() as f64;

        Self {
            aqi,
            components,
            source: EstimateSource::Interpolated,
            sensor_count: Some(samples.len()),
            avg_distance_km: Some(avg_distance),
            distance_km: None,
            error: None,
            observed_at: samples.iter().filter_map(|s| s.observed_at).max(),
        }
    }

    /// Picks the resolution rule by sample count
    pub fn from_samples(samples: &[SensorSample]) -> Self {
        Self::interpolated(samples)
    }

    pub fn with_error(mut self, error: Option<EstimateError>) -> Self {
        if error.is_some() {
            self.error = error;
        }
        self
    }
}

/// Σ(vᵢ·wᵢ)/Σwᵢ over the samples where `field` is present
fn weighted_mean<F>(samples: &[SensorSample], field: F) -> Option<f64>
where
    F: Fn(&SensorSample) -> Option<f64>,
{
    let (num, den) = samples
        .iter()
        .filter_map(|s| field(s).map(|v| (v, s.weight())))
        .fold((0.0, 0.0), |(num, den), (v, w)| (num + v * w, den + w));
    (den > 0.0).then(|| num / den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(aqi: Option<u8>, pm2_5: Option<f64>, distance_km: f64) -> SensorSample {
        SensorSample {
            coordinate: Coordinate::new(0.0, 0.0),
            aqi,
            components: AirComponents {
                pm2_5,
                ..Default::default()
            },
            distance_km,
            observed_at: None,
        }
    }

    #[test]
    fn test_no_samples_is_unavailable() {
        let e = AqiEstimate::from_samples(&[]);
        assert_eq!(e.source, EstimateSource::Unavailable);
        assert_eq!(e.aqi, None);
        assert!(e.components.is_empty());
        assert!(e.sensor_count.is_none() && e.avg_distance_km.is_none());
    }

    #[test]
    fn test_single_sample_is_nearest() {
        let e = AqiEstimate::from_samples(&[sample(Some(3), Some(20.0), 2.0)]);
        assert_eq!(e.source, EstimateSource::Nearest);
        assert_eq!(e.aqi, Some(3));
        assert_eq!(e.components.pm2_5, Some(20.0));
        assert_eq!(e.distance_km, Some(2.0));
        assert!(e.sensor_count.is_none());
    }

    #[test]
    fn test_equidistant_samples_average() {
        let e = AqiEstimate::from_samples(&[
            sample(Some(2), Some(10.0), 5.0),
            sample(Some(5), Some(30.0), 5.0),
        ]);
        assert_eq!(e.source, EstimateSource::Interpolated);
        // (2+5)/2 = 3.5 rounds half away from zero
        assert_eq!(e.aqi, Some(4));
        assert!((e.components.pm2_5.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(e.sensor_count, Some(2));
        assert_eq!(e.avg_distance_km, Some(5.0));
    }

    #[test]
    fn test_closer_sample_dominates() {
        let e = AqiEstimate::from_samples(&[
            sample(Some(1), Some(0.0), 1.0),
            sample(Some(5), Some(100.0), 10.0),
        ]);
        // weights 1 and 0.01
        let expected = 100.0 * 0.01 / 1.01;
        assert!((e.components.pm2_5.unwrap() - expected).abs() < 1e-9);
        assert_eq!(e.aqi, Some(1));
        assert_eq!(e.avg_distance_km, Some(5.5));
    }

    #[test]
    fn test_weight_floor_for_colocated_samples() {
        assert_eq!(sample(None, None, 0.0).weight(), sample(None, None, 0.1).weight());
        assert!((sample(None, None, 0.0).weight() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_component_uses_reporting_weight_only() {
        let e = AqiEstimate::from_samples(&[
            sample(Some(2), Some(40.0), 1.0),
            sample(Some(2), None, 1.0),
        ]);
        assert_eq!(e.aqi, Some(2));
        assert_eq!(e.components.pm2_5, Some(40.0));
        assert_eq!(e.components.no2, None);
    }

    #[test]
    fn test_aqi_only_samples_still_contribute() {
        let e = AqiEstimate::from_samples(&[
            sample(Some(4), None, 2.0),
            sample(None, Some(12.0), 2.0),
        ]);
        assert_eq!(e.aqi, Some(4));
        assert_eq!(e.components.pm2_5, Some(12.0));
        assert_eq!(e.sensor_count, Some(2));
    }

    #[test]
    fn test_with_error_keeps_source() {
        let err = EstimateError::new(super::super::ErrorKind::Timeout, "probe timed out");
        let e = AqiEstimate::from_samples(&[sample(Some(3), None, 1.0)]).with_error(Some(err));
        assert_eq!(e.source, EstimateSource::Nearest);
        assert!(e.error.is_some());
    }

    #[test]
    fn test_observation_time_carried_through() {
        let at = |h: i64| DateTime::<Utc>::from_timestamp(1_606_147_200 + h * 3600, 0);
        let primary = AqiEstimate::primary(SensorReading {
            aqi: Some(2),
            components: AirComponents::default(),
            observed_at: at(0),
            station: None,
        });
        assert_eq!(primary.observed_at, at(0));

        let mut older = sample(Some(2), None, 1.0);
        older.observed_at = at(0);
        let mut newer = sample(Some(4), None, 2.0);
        newer.observed_at = at(2);
        assert_eq!(AqiEstimate::nearest(&older).observed_at, at(0));
        assert_eq!(
            AqiEstimate::from_samples(&[older, newer, sample(Some(3), None, 3.0)]).observed_at,
            at(2)
        );
        assert_eq!(AqiEstimate::unavailable(None).observed_at, None);
    }

    #[test]
    fn test_serialized_field_presence() {
        let v = serde_json::to_value(AqiEstimate::unavailable(None)).unwrap();
        assert!(v["aqi"].is_null());
        assert_eq!(v["source"], "unavailable");
        assert!(v.get("sensorCount").is_none());

        let v = serde_json::to_value(AqiEstimate::from_samples(&[
            sample(Some(2), None, 1.0),
            sample(Some(2), None, 3.0),
        ]))
        .unwrap();
        assert_eq!(v["sensorCount"], 2);
        assert_eq!(v["avgDistance"], 2.0);
    }

    proptest! {
        #[test]
        fn prop_closer_sample_never_loses_influence(
            a in 0.0f64..100.0,
            b in 0.0f64..100.0,
            far in 0.1f64..50.0,
            d_other in 0.1f64..50.0,
            shrink in 0.0f64..1.0,
        ) {
            let near = far * shrink;
            let at = |d: f64| {
                AqiEstimate::from_samples(&[sample(None, Some(a), d), sample(None, Some(b), d_other)])
                    .components
                    .pm2_5
                    .unwrap()
            };
            // moving sample `a` closer pulls the estimate towards `a`
            let before = (at(far) - a).abs();
            let after = (at(near) - a).abs();
            prop_assert!(after <= before + 1e-9);
        }

        #[test]
        fn prop_interpolated_stays_within_sample_range(
            values in prop::collection::vec((0.0f64..500.0, 0.0f64..100.0), 2..8)
        ) {
            let samples: Vec<_> = values.iter().map(|(v, d)| sample(Some(3), Some(*v), *d)).collect();
            let e = AqiEstimate::from_samples(&samples);
            let lo = values.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
            let hi = values.iter().map(|(v, _)| *v).fold(f64::NEG_INFINITY, f64::max);
            let got = e.components.pm2_5.unwrap();
            prop_assert!(got >= lo - 1e-9 && got <= hi + 1e-9);
            prop_assert_eq!(e.sensor_count, Some(samples.len()));
        }
    }
}
