// ==============================================================================
// solve.rs — VEHICLE DYNAMICS STEPPER (ONE FIXED TICK)
// ==============================================================================
// Pure state-transition function for the rear-axle differential model:
//
//   step(previous state, controls, constants) -> next state
//
// Pipeline per tick:
// 1) Turn radius + lateral load transfer        (load.rs)
// 2) Per-wheel Coulomb traction limits          (load.rs)
// 3) Differential torque distribution           (diff.rs)
// 4) Slip ratios + traction-capped drive forces
// 5) Longitudinal integration (drag, coasting, cruise clamp)
// 6) Yaw from the bicycle model, with mode-specific steering correction
// 7) Pose integration + display outputs (rpm, lateral g)
//
// The function is total for finite inputs: the turn-radius tan() is
// epsilon-biased and every ratio denominator is offset or clamped, so
// no input with mu > 0 produces NaN or infinity. No I/O, no shared
// state; safe to call from any thread.
// ==============================================================================

use crate::driveline::diff::distribute_torque;
use crate::driveline::load::resolve_axle_loads;
use crate::driveline::types::{ControlInput, DiffMode, PhysicsConstants, VehicleState};

// Coasting rolloff per tick with the throttle fully lifted.
const COAST_DECAY: f64 = 0.98;

/// Advance the vehicle by one fixed time-step.
pub fn step(state: &VehicleState, input: &ControlInput, c: &PhysicsConstants) -> VehicleState {
    // km/h -> m/s
    let target_speed_ms = input.target_speed / 3.6;

    // 1-2. Load transfer + traction limits
    let loads = resolve_axle_loads(input.steering_angle, state.speed, input.surface_friction, c);

    // 3. Differential torque distribution
    let total_torque = input.throttle * c.max_torque;
    let split = distribute_torque(
        input.diff_mode,
        total_torque,
        &loads,
        input.steering_angle,
        input.throttle,
        state.speed,
        input.surface_friction,
    );

    // 4. Slip and traction-capped drive force.
    // The +1 in the denominator bounds slip near 1 for large excess and
    // keeps the zero-traction case finite.
    let excess_left = (split.left - loads.max_traction_left).max(0.0);
    let excess_right = (split.right - loads.max_traction_right).max(0.0);
    let slip_left = (excess_left / (loads.max_traction_left + 1.0)).min(1.0);
    let slip_right = (excess_right / (loads.max_traction_right + 1.0)).min(1.0);

    // A spinning wheel pushes no harder than its traction limit.
    let force_left = split.left.min(loads.max_traction_left);
    let force_right = split.right.min(loads.max_traction_right);

    // 5. Longitudinal integration
    let drag = c.air_resistance * state.speed * state.speed;
    let net_force = force_left + force_right - drag;
    let acceleration = net_force / c.mass;

    let mut new_speed = state.speed + acceleration * c.dt;
    if input.throttle == 0.0 {
        new_speed *= COAST_DECAY;
    }
    // Cruise clamp: throttle never overshoots the target, but coasting
    // and drag may still pull below it.
    if input.throttle > 0.0 && new_speed > target_speed_ms {
        new_speed = target_speed_ms;
    }
    new_speed = new_speed.max(0.0);

    // 6. Yaw dynamics with understeer/oversteer correction
    let mut effective_steering = input.steering_angle.to_radians();
    match input.diff_mode {
        DiffMode::Locked if input.steering_angle.abs() > 10.0 => {
            // locked axle fights the turn
            effective_steering *= 0.7;
        }
        DiffMode::Open if slip_left > 0.5 || slip_right > 0.5 => {
            // loss of drive on one side reduces turn-in
            effective_steering *= 0.8;
        }
        DiffMode::Adaptive => {
            // torque-vectoring: extra torque on the outer wheel helps rotate
            let outer_bias = if input.steering_angle > 0.0 {
                split.left - split.right
            } else {
                split.right - split.left
            };
            if outer_bias > 0.0 {
                effective_steering *= 1.1;
            }
        }
        _ => {}
    }

    let new_yaw_rate = new_speed * effective_steering.tan() / c.wheelbase;

    // 7. Pose integration + display outputs
    let new_heading = state.heading + new_yaw_rate * c.dt;
    let new_x = state.x + new_heading.cos() * new_speed * c.dt * c.visual_scale;
    let new_y = state.y + new_heading.sin() * new_speed * c.dt * c.visual_scale;

    // Slip inflates displayed wheel speed relative to ground speed.
    let rpm_base = (new_speed / c.tire_radius) * 60.0 / (2.0 * std::f64::consts::PI);

    VehicleState {
        x: new_x,
        y: new_y,
        heading: new_heading,
        speed: new_speed,
        yaw_rate: new_yaw_rate,
        slip_left,
        slip_right,
        torque_left: split.left,
        torque_right: split.right,
        rpm_left: rpm_base * (1.0 + slip_left),
        rpm_right: rpm_base * (1.0 + slip_right),
        locking_ratio: split.locking_ratio,
        lateral_g: new_speed * new_speed / loads.turn_radius.max(1.0) / c.gravity,
    }
}
