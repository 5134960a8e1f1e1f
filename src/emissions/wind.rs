//! Wind shaping of an item's influence footprint.
//!
//! Wind elongates the footprint downwind and narrows it crosswind. The
//! direction is the one the wind blows toward, in compass degrees (0 is
//! north). Grid `y` grows southward, so north maps to `-π/2` in grid angles.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Wind speed at which shaping reaches unit strength
pub const REFERENCE_WIND_KMH: f64 = 30.0;

/// Lower bound on the crosswind narrowing factor
pub const MIN_CROSSWIND_FACTOR: f64 = 0.05;

/// Footprints are extended downwind once alignment exceeds this
const EXTENSION_ALIGNMENT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindConfig {
    pub speed_kmh: f64,
    pub direction_degrees: f64,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 10.0,
            direction_degrees: 90.0,
            enabled: true,
        }
    }
}

impl WindConfig {
    pub fn calm() -> Self {
        Self {
            speed_kmh: 0.0,
            direction_degrees: 0.0,
            enabled: false,
        }
    }

    /// Non-finite or negative speeds become calm; directions wrap into
    /// `[0, 360)`
    pub fn sanitized(self) -> Self {
        let speed_kmh = if self.speed_kmh.is_finite() {
            self.speed_kmh.max(0.0)
        } else {
            0.0
        };
        let direction_degrees = if self.direction_degrees.is_finite() {
            self.direction_degrees.rem_euclid(360.0)
        } else {
            0.0
        };
        Self {
            speed_kmh,
            direction_degrees,
            enabled: self.enabled,
        }
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.speed_kmh > 0.0
    }

    pub fn strength(&self) -> f64 {
        self.speed_kmh / REFERENCE_WIND_KMH
    }

    /// Grid-space angle the wind blows toward
    fn grid_angle(&self) -> f64 {
        self.direction_degrees.to_radians() - PI / 2.0
    }

    /// 1 for a cell straight downwind of the source, 0 straight upwind
    pub fn alignment(&self, dx: f64, dy: f64) -> f64 {
        let diff = (dy.atan2(dx) - self.grid_angle()).rem_euclid(2.0 * PI);
        let diff = if diff > PI { 2.0 * PI - diff } else { diff };
        1.0 - diff / PI
    }

    /// Influence at offset `(dx, dy)` cells from a source of `radius` cells.
    /// May exceed 1 under strong turbulence; never negative.
    pub fn shaped_influence(&self, dx: f64, dy: f64, distance: f64, radius: f64) -> f64 {
        let strength = self.strength();
        let alignment = self.alignment(dx, dy);

        let along = 1.0 + alignment * strength * 2.0;
        let across = (1.0 - alignment * strength * 0.3).max(MIN_CROSSWIND_FACTOR);
        let distorted = distance / (along * across).sqrt();
        let mut influence = (1.0 - distorted / radius).max(0.0);

        if alignment > EXTENSION_ALIGNMENT {
            let extended_radius = radius * (1.0 + alignment * strength * 1.5);
            let extended = (1.0 - distance / extended_radius).max(0.0);
            influence = influence.max(extended * 0.7);
        }

        let turbulence = (dx * 0.1).sin() * (dy * 0.1).cos() * strength * 0.1;
        (influence * (1.0 + turbulence)).max(0.0)
    }
}
