mod driveline;
mod net;
mod state;
mod telemetry;

use crate::driveline::PhysicsConstants;
use crate::net::start_websocket_server;
use crate::state::SharedSimState;
use crate::telemetry::TelemetryPoint;

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{interval, Duration};

#[tokio::main]
async fn main() {
    println!("🚀 Starting Differential Simulation Server...");

    let state = Arc::new(Mutex::new(SharedSimState::new()));
    let constants = PhysicsConstants::default();

    // Start WebSocket server
    tokio::spawn(start_websocket_server(Arc::clone(&state)));

    // Fixed timestep: ~60 Hz
    let mut ticker = interval(Duration::from_millis(16));

    loop {
        ticker.tick().await;

        let mut sim = state.lock().await;

        // Advance the vehicle one tick from the live controls
        let controls = sim.controls;
        sim.vehicle = driveline::step(&sim.vehicle, &controls, &constants);

        // Record telemetry for the trailing chart window
        sim.tick += 1;
        let time = sim.tick as f64 * constants.dt;
        let point = TelemetryPoint::sample(time, &sim.vehicle);
        sim.telemetry.push(point);

        // Broadcast snapshot
        sim.broadcast_snapshot();
    }
}
