use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::driveline::{ControlInput, VehicleState};
use crate::telemetry::{TelemetryLog, TelemetryPoint};

/// Per-tick broadcast payload: the full vehicle state plus the latest
/// telemetry sample. Clients keep their own trailing chart windows.
#[derive(Serialize)]
pub struct Snapshot<'a> {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub tick: u64,
    pub vehicle: &'a VehicleState,
    pub controls: &'a ControlInput,
    pub telemetry: Option<&'a TelemetryPoint>,
}

pub struct SharedSimState {
    pub tick: u64,
    pub clients: Vec<UnboundedSender<String>>,
    pub controls: ControlInput,
    pub vehicle: VehicleState,
    pub telemetry: TelemetryLog,
}

impl SharedSimState {
    pub fn new() -> Self {
        Self {
            tick: 0,
            clients: Vec::new(),
            controls: ControlInput::default(),
            vehicle: VehicleState::default(),
            telemetry: TelemetryLog::default(),
        }
    }

    pub fn register_client(&mut self, tx: UnboundedSender<String>) {
        self.clients.push(tx);
    }

    /// Zero the vehicle and drop the telemetry window; controls are
    /// left as the user set them.
    pub fn reset(&mut self) {
        self.vehicle = VehicleState::default();
        self.telemetry.clear();
    }

    /// Serialize the current tick and send it to every client,
    /// dropping senders whose receive side has gone away.
    pub fn broadcast_snapshot(&mut self) {
        let json = serde_json::to_string(&Snapshot {
            msg_type: "snapshot",
            tick: self.tick,
            vehicle: &self.vehicle,
            controls: &self.controls,
            telemetry: self.telemetry.latest(),
        })
        .unwrap();

        self.clients.retain(|tx| tx.send(json.clone()).is_ok());
    }
}
