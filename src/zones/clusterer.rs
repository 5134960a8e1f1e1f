//! Zoom-aware facility clustering.
//!
//! Facilities are partitioned by type, then clustered greedily in input
//! order. Each cluster is anchored on its seed: a facility joins when it is
//! within the clustering distance of the seed, regardless of its distance to
//! other members, and a facility near a non-seed member only does not join.

use tracing::debug;

use super::Zone;
use crate::domain::{Facility, FacilityType};

/// Base clustering distance in metres for a facility type
pub fn base_distance_m(kind: FacilityType) -> f64 {
    match kind {
        FacilityType::Urban => 8000.0,
        FacilityType::Industrial => 5000.0,
        FacilityType::Agriculture => 4000.0,
        FacilityType::Mining => 2000.0,
        FacilityType::Mixed => 3000.0,
    }
}

/// Generalisation factor for a map zoom level
pub fn zoom_multiplier(zoom: f64) -> f64 {
    if zoom <= 5.0 {
        4.0
    } else if zoom <= 8.0 {
        2.0
    } else if zoom <= 12.0 {
        1.0
    } else {
        0.5
    }
}

pub fn clustering_distance_m(kind: FacilityType, zoom: f64) -> f64 {
    base_distance_m(kind) * zoom_multiplier(zoom)
}

/// Pure, total clustering of `facilities` at `zoom`
pub fn cluster(facilities: &[Facility], zoom: f64) -> Vec<Zone> {
    let mut zones = Vec::new();
    for (kind, group) in partition_by_type(facilities) {
        let max_distance = clustering_distance_m(kind, zoom);
        let before = zones.len();
        zones.extend(
            seed_clusters(&group, max_distance)
                .into_iter()
                .filter_map(Zone::from_members),
        );
        debug!(
            kind = %kind,
            facilities = group.len(),
            zones = zones.len() - before,
            max_distance_m = max_distance,
            "clustered facility type"
        );
    }
    zones
}

/// Groups by type, keeping types in first-encounter order
fn partition_by_type(facilities: &[Facility]) -> Vec<(FacilityType, Vec<&Facility>)> {
    let mut groups: Vec<(FacilityType, Vec<&Facility>)> = Vec::new();
    for f in facilities {
        match groups.iter_mut().find(|(k, _)| *k == f.kind) {
            Some((_, members)) => members.push(f),
            None => groups.push((f.kind, vec![f])),
        }
    }
    groups
}

fn seed_clusters(group: &[&Facility], max_distance_m: f64) -> Vec<Vec<Facility>> {
    let mut assigned = vec![false; group.len()];
    let mut clusters = Vec::new();

    for (i, seed) in group.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut members = vec![(*seed).clone()];

        for (j, other) in group.iter().enumerate() {
            if assigned[j] {
                continue;
            }
            if seed.coordinate.distance_m(&other.coordinate) <= max_distance_m {
                assigned[j] = true;
                members.push((*other).clone());
            }
        }
        clusters.push(members);
    }
    clusters
}

/// Stateless clusterer handle for callers that inject services
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneClusterer;

impl ZoneClusterer {
    pub fn cluster(&self, facilities: &[Facility], zoom: f64) -> Vec<Zone> {
        cluster(facilities, zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use proptest::prelude::*;
    use rstest::rstest;

    fn fac(id: &str, lat: f64, lon: f64, kind: FacilityType) -> Facility {
        Facility::new(id, Coordinate::new(lat, lon), kind, id)
    }

    #[rstest]
    #[case(1.0, 4.0)]
    #[case(5.0, 4.0)]
    #[case(6.0, 2.0)]
    #[case(8.0, 2.0)]
    #[case(9.0, 1.0)]
    #[case(12.0, 1.0)]
    #[case(13.0, 0.5)]
    #[case(18.0, 0.5)]
    fn test_zoom_tiers(#[case] zoom: f64, #[case] factor: f64) {
        assert_eq!(zoom_multiplier(zoom), factor);
    }

    #[test]
    fn test_clustering_distance() {
        assert_eq!(clustering_distance_m(FacilityType::Industrial, 10.0), 5000.0);
        assert_eq!(clustering_distance_m(FacilityType::Industrial, 15.0), 2500.0);
        assert_eq!(clustering_distance_m(FacilityType::Urban, 3.0), 32000.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster(&[], 10.0).is_empty());
    }

    #[test]
    fn test_three_industrial_sites_form_one_zone() {
        let zones = cluster(
            &[
                fac("a", 0.0, 0.0, FacilityType::Industrial),
                fac("b", 0.0, 0.01, FacilityType::Industrial),
                fac("c", 0.0, 0.02, FacilityType::Industrial),
            ],
            10.0,
        );
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].member_count, 3);
        assert_eq!(zones[0].zone_type, FacilityType::Industrial);
    }

    #[test]
    fn test_zoom_controls_merging() {
        // ~3.3 km apart: inside 5 km at zoom 10, outside 2.5 km at zoom 15
        let sites = [
            fac("a", 0.0, 0.0, FacilityType::Industrial),
            fac("b", 0.0, 0.03, FacilityType::Industrial),
        ];
        assert_eq!(cluster(&sites, 10.0).len(), 1);
        assert_eq!(cluster(&sites, 15.0).len(), 2);

        let close = [
            fac("a", 0.0, 0.0, FacilityType::Industrial),
            fac("b", 0.0, 0.009, FacilityType::Industrial),
        ];
        assert_eq!(cluster(&close, 10.0).len(), 1);
    }

    #[test]
    fn test_types_never_mix() {
        let zones = cluster(
            &[
                fac("a", 0.0, 0.0, FacilityType::Industrial),
                fac("b", 0.0, 0.0, FacilityType::Urban),
            ],
            1.0,
        );
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].zone_type, FacilityType::Industrial);
        assert_eq!(zones[1].zone_type, FacilityType::Urban);
    }

    #[test]
    fn test_seed_anchored_not_transitive() {
        // mining at zoom 10: 2 km. b is 1.67 km from seed a, c is 1.67 km from b
        // but 3.3 km from a, so c starts its own zone.
        let zones = cluster(
            &[
                fac("a", 0.0, 0.0, FacilityType::Mining),
                fac("b", 0.0, 0.015, FacilityType::Mining),
                fac("c", 0.0, 0.03, FacilityType::Mining),
            ],
            10.0,
        );
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].member_count, 2);
        assert_eq!(zones[1].member_count, 1);
        assert_eq!(zones[1].members[0].id, "c");
    }

    #[test]
    fn test_ids_stable_across_input_order() {
        let mut sites = vec![
            fac("a", 1.0, 1.0, FacilityType::Agriculture),
            fac("b", 1.0, 1.01, FacilityType::Agriculture),
        ];
        let first = cluster(&sites, 10.0);
        sites.reverse();
        let second = cluster(&sites, 10.0);
        assert_eq!(first[0].id, second[0].id);
    }

    fn arb_facility() -> impl Strategy<Value = Facility> {
        (
            -1.0f64..1.0,
            -1.0f64..1.0,
            prop::sample::select(FacilityType::ALL.to_vec()),
        )
            .prop_map(|(lat, lon, kind)| fac("p", lat, lon, kind))
    }

    proptest! {
        #[test]
        fn prop_every_facility_lands_in_exactly_one_zone(
            sites in prop::collection::vec(arb_facility(), 0..40),
            zoom in 0.0f64..20.0,
        ) {
            let zones = cluster(&sites, zoom);
            prop_assert!(zones.iter().all(|z| z.member_count >= 1));
            prop_assert_eq!(zones.iter().map(|z| z.member_count).sum::<usize>(), sites.len());
            for z in &zones {
                prop_assert!(z.members.iter().all(|m| m.kind == z.zone_type));
            }
        }
    }
}
