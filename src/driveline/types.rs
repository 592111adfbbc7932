//! Core shared types for `driveline` (engine-agnostic).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================
// Differential mode
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiffMode {
    Open,
    Locked,
    Adaptive,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown differential mode: {0:?} (expected OPEN, LOCKED or ADAPTIVE)")]
pub struct ParseDiffModeError(pub String);

impl FromStr for DiffMode {
    type Err = ParseDiffModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(DiffMode::Open),
            "LOCKED" => Ok(DiffMode::Locked),
            "ADAPTIVE" => Ok(DiffMode::Adaptive),
            other => Err(ParseDiffModeError(other.to_string())),
        }
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiffMode::Open => "OPEN",
            DiffMode::Locked => "LOCKED",
            DiffMode::Adaptive => "ADAPTIVE",
        };
        write!(f, "{s}")
    }
}

// ============================================
// Surface presets
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Surface {
    Dry,
    Wet,
    Snow,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown surface: {0:?} (expected DRY, WET or SNOW)")]
pub struct ParseSurfaceError(pub String);

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Dry, Surface::Wet, Surface::Snow];

    /// Friction coefficient for this surface.
    pub fn mu(&self) -> f64 {
        match self {
            Surface::Dry => 1.0,
            Surface::Wet => 0.6,
            Surface::Snow => 0.3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Surface::Dry => "Dry Tarmac",
            Surface::Wet => "Wet Asphalt",
            Surface::Snow => "Snow/Ice",
        }
    }
}

impl FromStr for Surface {
    type Err = ParseSurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRY" => Ok(Surface::Dry),
            "WET" => Ok(Surface::Wet),
            "SNOW" => Ok(Surface::Snow),
            other => Err(ParseSurfaceError(other.to_string())),
        }
    }
}

// ============================================
// ----- configs / inputs ---------------------
// ============================================

/// Fixed physical parameters of the modeled vehicle.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsConstants {
    pub mass: f64,           // kg
    pub wheelbase: f64,      // meters (front axle to rear axle)
    pub track_width: f64,    // meters (left to right)
    pub max_torque: f64,     // Nm (total at the axle)
    pub dt: f64,             // s (fixed tick)
    pub air_resistance: f64, // drag coefficient lump
    pub tire_radius: f64,    // meters
    pub gravity: f64,        // m/s^2
    pub visual_scale: f64,   // visual units per meter travelled
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self {
            mass: 1500.0,
            wheelbase: 2.7,
            track_width: 1.6,
            max_torque: 600.0,
            dt: 0.016,
            air_resistance: 0.3,
            tire_radius: 0.3,
            gravity: 9.81,
            visual_scale: 10.0,
        }
    }
}

/// Live control values, rebuilt by the driver every tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlInput {
    pub steering_angle: f64,   // degrees, -45..45, positive = right turn
    pub throttle: f64,         // 0..1
    pub surface_friction: f64, // mu, > 0
    pub diff_mode: DiffMode,
    pub target_speed: f64, // km/h, cruise target
}

impl Default for ControlInput {
    fn default() -> Self {
        Self {
            steering_angle: 0.0,
            throttle: 0.0,
            surface_friction: Surface::Dry.mu(),
            diff_mode: DiffMode::Open,
            target_speed: 50.0,
        }
    }
}

// ============================================
// ----- vehicle state ------------------------
// ============================================

/// One tick's worth of vehicle state. Replaced wholesale by
/// [`crate::driveline::step`]; never mutated in place.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    pub x: f64, // visual units
    pub y: f64, // visual units
    pub heading: f64, // radians, unbounded
    pub speed: f64,   // m/s, >= 0
    pub yaw_rate: f64, // rad/s, signed

    // Wheel specific
    pub slip_left: f64,  // 0..1 (1 is full spin)
    pub slip_right: f64, // 0..1
    pub torque_left: f64,  // Nm, >= 0
    pub torque_right: f64, // Nm, >= 0
    pub rpm_left: f64,
    pub rpm_right: f64,

    // E-diff internal
    pub locking_ratio: f64, // 0..1
    pub lateral_g: f64,     // g, magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_mode_round_trips_through_str() {
        for (s, m) in [
            ("OPEN", DiffMode::Open),
            ("LOCKED", DiffMode::Locked),
            ("ADAPTIVE", DiffMode::Adaptive),
        ] {
            assert_eq!(s.parse::<DiffMode>().unwrap(), m);
            assert_eq!(m.to_string(), s);
        }
    }

    #[test]
    fn unknown_diff_mode_is_rejected() {
        let err = "TORSEN".parse::<DiffMode>().unwrap_err();
        assert_eq!(err, ParseDiffModeError("TORSEN".to_string()));
        // lowercase is not accepted either; the wire contract is uppercase
        assert!("open".parse::<DiffMode>().is_err());
    }

    #[test]
    fn surface_presets_match_table() {
        assert_eq!("DRY".parse::<Surface>().unwrap().mu(), 1.0);
        assert_eq!("WET".parse::<Surface>().unwrap().mu(), 0.6);
        assert_eq!("SNOW".parse::<Surface>().unwrap().mu(), 0.3);
        assert_eq!(Surface::Snow.label(), "Snow/Ice");
        assert!("GRAVEL".parse::<Surface>().is_err());
    }

    #[test]
    fn state_serializes_camel_case() {
        let json = serde_json::to_string(&VehicleState::default()).unwrap();
        assert!(json.contains("\"yawRate\""));
        assert!(json.contains("\"slipLeft\""));
        assert!(json.contains("\"lockingRatio\""));
    }
}
