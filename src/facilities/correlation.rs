//! Proximity-weighted association between nearby facilities and local air

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::domain::{Coordinate, Facility, FacilityType};

pub const DEFAULT_CORRELATION_RADIUS_KM: f64 = 20.0;
pub const MAX_CORRELATION: f64 = 0.95;
/// Correlations at or below this fraction are not reported
pub const MIN_CORRELATION: f64 = 0.10;
pub const MAX_CORRELATIONS: usize = 5;

pub fn base_correlation(kind: FacilityType) -> f64 {
    match kind {
        FacilityType::Industrial => 0.8,
        FacilityType::Mining => 0.75,
        FacilityType::Urban => 0.6,
        FacilityType::Agriculture => 0.3,
        FacilityType::Mixed => 0.5,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub industry: String,
    #[serde(rename = "type")]
    pub kind: FacilityType,
    /// Fraction in `[0, 0.95]`
    pub correlation: f64,
    pub percent: u8,
    pub distance_km: f64,
    pub impact: &'static str,
}

/// Strongest facility correlations around `at`, at most five, descending
pub fn correlate(at: Coordinate, facilities: &[Facility], radius_km: f64) -> Vec<Correlation> {
    let radius_km = if radius_km.is_finite() && radius_km > 0.0 {
        radius_km
    } else {
        DEFAULT_CORRELATION_RADIUS_KM
    };

    let mut out: Vec<Correlation> = facilities
        .iter()
        .filter_map(|f| {
            let distance_km = at.distance_km(&f.coordinate);
            let proximity = (1.0 - distance_km / radius_km).max(0.0);
            let correlation = (base_correlation(f.kind) * proximity).min(MAX_CORRELATION);
            (correlation > MIN_CORRELATION).then(|| Correlation {
                industry: f.name.clone(),
                kind: f.kind,
                correlation,
                percent: (correlation * 100.0).round() as u8,
                distance_km,
                impact: f.kind.emissions_label(),
            })
        })
        .collect();

    // stable sort keeps input order among equal correlations
    out.sort_by_key(|c| std::cmp::Reverse(OrderedFloat(c.correlation)));
    out.truncate(MAX_CORRELATIONS);
    out
}
