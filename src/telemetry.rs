//! Bounded trailing telemetry window for the chart collaborators.

use serde::Serialize;
use std::collections::VecDeque;

use crate::driveline::VehicleState;

/// One sampled tick of the signals the charts care about.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryPoint {
    pub time: f64, // seconds since simulation start
    pub yaw_rate: f64,
    pub slip_left: f64,
    pub slip_right: f64,
    pub locking_ratio: f64,
}

impl TelemetryPoint {
    pub fn sample(time: f64, state: &VehicleState) -> Self {
        Self {
            time,
            yaw_rate: state.yaw_rate,
            slip_left: state.slip_left,
            slip_right: state.slip_right,
            locking_ratio: state.locking_ratio,
        }
    }
}

/// Fixed-capacity trailing window, oldest-first eviction.
#[derive(Debug)]
pub struct TelemetryLog {
    points: VecDeque<TelemetryPoint>,
    capacity: usize,
}

pub const TELEMETRY_CAPACITY: usize = 50;

impl TelemetryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: TelemetryPoint) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&TelemetryPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelemetryPoint> {
        self.points.iter()
    }
}

impl Default for TelemetryLog {
    fn default() -> Self {
        Self::new(TELEMETRY_CAPACITY)
    }
}
