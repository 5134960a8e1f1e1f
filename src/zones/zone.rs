use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::{BoundingBox, Coordinate, Facility, FacilityType};

/// Padding added around a cluster's member box, in degrees
pub const ZONE_PADDING_DEG: f64 = 0.005;

/// Renderable aggregate of one or more same-type facilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub zone_type: FacilityType,
    pub bounding_box: BoundingBox,
    pub center: Coordinate,
    pub area_km2: f64,
    pub member_count: usize,
    pub emissions: String,
    pub members: Vec<Facility>,
}

impl Zone {
    /// Builds a zone from a non-empty member list; `None` when empty
    pub fn from_members(members: Vec<Facility>) -> Option<Self> {
        let bounds = BoundingBox::enclosing(members.iter().map(|f| &f.coordinate))?;
        let zone_type = dominant_type(&members)?;
        Some(Self {
            id: zone_id(zone_type, &members),
            zone_type,
            bounding_box: bounds.padded(ZONE_PADDING_DEG),
            center: bounds.center(),
            area_km2: bounds.area_km2(),
            member_count: members.len(),
            emissions: zone_type.emissions_label().to_string(),
            members,
        })
    }
}

/// Most frequent member type; equal counts resolve to the lexicographically
/// smallest type name
pub fn dominant_type(members: &[Facility]) -> Option<FacilityType> {
    FacilityType::ALL
        .iter()
        .map(|t| (*t, members.iter().filter(|f| f.kind == *t).count()))
        .filter(|(_, n)| *n > 0)
        .max_by(|(ta, na), (tb, nb)| na.cmp(nb).then_with(|| tb.as_str().cmp(ta.as_str())))
        .map(|(t, _)| t)
}

/// `zone_<type>_<hash>` over the sorted `"lat_lon"` member keys, so the same
/// member set always yields the same id
pub fn zone_id(zone_type: FacilityType, members: &[Facility]) -> String {
    let keys = members.iter().map(|f| f.coordinate.key()).sorted().join("|");
    format!("zone_{}_{}", zone_type, to_base36(string_hash(&keys)))
}

/// 32-bit `h * 31 + c` rolling hash over UTF-16 code units, absolute value
fn string_hash(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0i32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32))
        .unsigned_abs()
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fac(id: &str, lat: f64, lon: f64, kind: FacilityType) -> Facility {
        Facility::new(id, Coordinate::new(lat, lon), kind, id)
    }

    #[test]
    fn test_string_hash_matches_reference_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        // overflows i32 and wraps
        assert_eq!(string_hash("hello world"), 1_794_106_052);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_zone_id_ignores_member_order() {
        let a = vec![
            fac("1", 0.0, 0.0, FacilityType::Mining),
            fac("2", 0.01, 0.02, FacilityType::Mining),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(zone_id(FacilityType::Mining, &a), zone_id(FacilityType::Mining, &b));
        assert!(zone_id(FacilityType::Mining, &a).starts_with("zone_mining_"));
    }

    #[test]
    fn test_dominant_type_tie_is_lexicographic() {
        let members = vec![
            fac("1", 0.0, 0.0, FacilityType::Urban),
            fac("2", 0.0, 0.0, FacilityType::Industrial),
        ];
        assert_eq!(dominant_type(&members), Some(FacilityType::Industrial));

        let members = vec![
            fac("1", 0.0, 0.0, FacilityType::Urban),
            fac("2", 0.0, 0.0, FacilityType::Urban),
            fac("3", 0.0, 0.0, FacilityType::Agriculture),
        ];
        assert_eq!(dominant_type(&members), Some(FacilityType::Urban));
        assert_eq!(dominant_type(&[]), None);
    }

    #[test]
    fn test_zone_geometry() {
        let zone = Zone::from_members(vec![
            fac("1", 0.0, 0.0, FacilityType::Industrial),
            fac("2", 0.02, 0.01, FacilityType::Industrial),
        ])
        .unwrap();
        assert_eq!(zone.member_count, 2);
        assert_eq!(zone.center, Coordinate::new(0.01, 0.005));
        assert!((zone.bounding_box.south_west.lat + 0.005).abs() < 1e-12);
        assert!((zone.bounding_box.north_east.lat - 0.025).abs() < 1e-12);
        // unpadded box: ~1.11 km x ~2.22 km
        assert!((zone.area_km2 - 2.47).abs() < 0.01, "area {}", zone.area_km2);
        assert_eq!(zone.emissions, "Mixed Industrial Emissions");
    }

    #[test]
    fn test_single_member_zone_has_zero_area() {
        let zone = Zone::from_members(vec![fac("1", 5.0, 5.0, FacilityType::Urban)]).unwrap();
        assert_eq!(zone.area_km2, 0.0);
        assert_eq!(zone.member_count, 1);
        assert!(Zone::from_members(Vec::new()).is_none());
    }
}
