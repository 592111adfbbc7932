// ==============================================================================
// diff.rs — DIFFERENTIAL TORQUE DISTRIBUTION (OPEN / LOCKED / ADAPTIVE)
// ==============================================================================
// Splits the requested axle torque between the two driven wheels:
//
// - OPEN:     equal split, capped by the weaker wheel's traction limit
//             with a 1.5x overspeed allowance (a wheel may spin past
//             its limit instead of being hard-clamped).
// - LOCKED:   split proportional to vertical load. Fixed-ratio policy,
//             not true speed-locking kinematics.
// - ADAPTIVE: e-diff. A lock heuristic from steering/throttle/speed
//             blends the even split toward the load-proportional one.
//
// The tuning constants (1.5x allowance, 0.1 preload, the lock law,
// the 0.5 low-mu clamp) are behavioral, not derived; they are kept
// exactly as tuned.
// ==============================================================================

use crate::driveline::load::AxleLoads;
use crate::driveline::types::DiffMode;

/// Per-wheel torque allocation plus the lock fraction that produced it.
#[derive(Debug, Clone, Copy)]
pub struct TorqueSplit {
    pub left: f64,  // Nm, >= 0
    pub right: f64, // Nm, >= 0
    pub locking_ratio: f64, // 0..1
}

/// Fraction of the total load carried by the left wheel.
///
/// Loads are non-negative by construction, so the fraction stays in
/// [0, 1]; the tiny denominator offset only matters if both wheels are
/// fully airborne.
fn load_share_left(loads: &AxleLoads) -> f64 {
    loads.load_left / (loads.load_left + loads.load_right).max(1e-9)
}

/// ADAPTIVE lock heuristic.
///
/// Base preload 0.1. Turning (> 5 deg) under throttle raises the lock
/// with steering angle and speed; slippery surfaces cap it at 0.5 to
/// keep the tail in line.
fn adaptive_target_lock(steering_deg: f64, throttle: f64, speed: f64, mu: f64) -> f64 {
    let mut target_lock = 0.1;

    if steering_deg.abs() > 5.0 && throttle > 0.1 {
        let speed_factor = (speed / 10.0).min(1.0);
        let steer_factor = steering_deg.abs() / 45.0;
        target_lock = 0.3 + steer_factor * 0.4 * speed_factor;

        if mu < 0.5 {
            target_lock = target_lock.min(0.5);
        }
    }

    target_lock
}

/// Distribute the requested axle torque between the wheels.
pub fn distribute_torque(
    mode: DiffMode,
    total_torque: f64,
    loads: &AxleLoads,
    steering_deg: f64,
    throttle: f64,
    speed: f64,
    mu: f64,
) -> TorqueSplit {
    match mode {
        DiffMode::Open => {
            // Limited by the weakest tire; excess shows up as spin.
            let limit = loads.max_traction_left.min(loads.max_traction_right);
            let per_wheel = (total_torque / 2.0).min(limit * 1.5);
            TorqueSplit {
                left: per_wheel,
                right: per_wheel,
                locking_ratio: 0.0,
            }
        }
        DiffMode::Locked => {
            let share_left = load_share_left(loads);
            TorqueSplit {
                left: total_torque * share_left,
                right: total_torque * (1.0 - share_left),
                locking_ratio: 1.0,
            }
        }
        DiffMode::Adaptive => {
            let locking_ratio = adaptive_target_lock(steering_deg, throttle, speed, mu);

            // L=0 -> 50/50, L=1 -> load-based distribution
            let open_split = 0.5;
            let locked_split_left = load_share_left(loads);
            let split_left =
                (1.0 - locking_ratio) * open_split + locking_ratio * locked_split_left;

            TorqueSplit {
                left: total_torque * split_left,
                right: total_torque * (1.0 - split_left),
                locking_ratio,
            }
        }
    }
}
