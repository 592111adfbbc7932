// ==============================================================================
// load.rs — TURN RADIUS, LATERAL LOAD TRANSFER, TRACTION LIMITS
// ==============================================================================
// Single-moment-arm weight transfer across the driven axle:
// - Bicycle-model turn radius from wheelbase / tan(steer)
// - Centrifugal force at the current speed
// - Transfer = F_c * (track/2) / wheelbase, shifted to the outer wheel
// - Per-wheel traction limit = mu * load (Coulomb), clamped at zero
//
// No roll stiffness, no longitudinal transfer; this is deliberately the
// simplest model that makes the differential modes diverge under cornering.
// ==============================================================================

use crate::driveline::types::PhysicsConstants;

// Keeps tan() finite at zero steering without disturbing the
// straight-line case.
const STEER_EPSILON: f64 = 0.001;

/// Per-wheel vertical loads and traction limits on the driven axle.
#[derive(Debug, Clone, Copy)]
pub struct AxleLoads {
    pub turn_radius: f64,  // meters, magnitude
    pub load_left: f64,    // N, >= 0
    pub load_right: f64,   // N, >= 0
    pub max_traction_left: f64,  // N
    pub max_traction_right: f64, // N
}

/// Bicycle-model turn radius magnitude for a steering angle in degrees.
pub fn turn_radius(steering_deg: f64, c: &PhysicsConstants) -> f64 {
    let steer_rad = steering_deg.to_radians();
    (c.wheelbase / (steer_rad + STEER_EPSILON).tan()).abs()
}

/// Resolve per-wheel loads and traction limits for the current
/// steering/speed/surface.
///
/// Positive steering (right turn) shifts load onto the left (outer)
/// wheel; negative shifts right. Exactly zero steering applies no
/// transfer, so the axle stays symmetric at any speed.
pub fn resolve_axle_loads(
    steering_deg: f64,
    speed: f64,
    mu: f64,
    c: &PhysicsConstants,
) -> AxleLoads {
    let radius = turn_radius(steering_deg, c);
    let centrifugal = c.mass * speed * speed / radius;
    let transfer = centrifugal * (c.track_width / 2.0) / c.wheelbase;

    let static_load = c.mass * c.gravity / 4.0; // per wheel, roughly

    let (load_left, load_right) = if steering_deg > 0.0 {
        (static_load + transfer, static_load - transfer)
    } else if steering_deg < 0.0 {
        (static_load - transfer, static_load + transfer)
    } else {
        (static_load, static_load)
    };

    // Extreme transfer can unload a wheel past zero; a wheel cannot
    // push up on the car, so both loads floor at zero.
    let load_left = load_left.max(0.0);
    let load_right = load_right.max(0.0);

    AxleLoads {
        turn_radius: radius,
        load_left,
        load_right,
        max_traction_left: (load_left * mu).max(0.0),
        max_traction_right: (load_right * mu).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn consts() -> PhysicsConstants {
        PhysicsConstants::default()
    }

    #[test]
    fn zero_steering_keeps_axle_symmetric_at_any_speed() {
        let c = consts();
        for speed in [0.0, 5.0, 20.0, 60.0] {
            let loads = resolve_axle_loads(0.0, speed, 1.0, &c);
            assert_eq!(loads.load_left, loads.load_right);
            assert_relative_eq!(loads.load_left, 1500.0 * 9.81 / 4.0);
        }
    }

    #[test]
    fn right_turn_loads_the_left_wheel() {
        let c = consts();
        let loads = resolve_axle_loads(20.0, 15.0, 1.0, &c);
        assert!(loads.load_left > loads.load_right);

        // Near-mirror for a left turn: the steering epsilon bias is
        // additive, so the two directions differ by a fraction of a
        // percent rather than matching exactly.
        let mirrored = resolve_axle_loads(-20.0, 15.0, 1.0, &c);
        assert!(mirrored.load_right > mirrored.load_left);
        assert_relative_eq!(mirrored.load_right, loads.load_left, max_relative = 0.01);
        assert_relative_eq!(mirrored.load_left, loads.load_right, max_relative = 0.05);
    }

    #[test]
    fn turn_radius_tightens_with_steering() {
        let c = consts();
        let straight = turn_radius(0.0, &c);
        let gentle = turn_radius(10.0, &c);
        let hard = turn_radius(45.0, &c);
        assert!(straight > gentle && gentle > hard);
        // epsilon bias keeps the straight-line radius finite
        assert!(straight.is_finite());
        assert_relative_eq!(hard, 2.7 / (45f64.to_radians() + 0.001).tan(), epsilon = 1e-12);
    }

    #[test]
    fn extreme_transfer_floors_the_inner_wheel_at_zero() {
        let c = consts();
        // 30 degrees at 80 km/h massively unloads the inner (right) wheel
        let loads = resolve_axle_loads(30.0, 80.0 / 3.6, 1.0, &c);
        assert_eq!(loads.load_right, 0.0);
        assert_eq!(loads.max_traction_right, 0.0);
        assert!(loads.load_left > 0.0);
    }

    #[test]
    fn traction_scales_with_mu() {
        let c = consts();
        let dry = resolve_axle_loads(0.0, 10.0, 1.0, &c);
        let snow = resolve_axle_loads(0.0, 10.0, 0.3, &c);
        assert_relative_eq!(snow.max_traction_left, dry.max_traction_left * 0.3);
    }
}
