use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use uuid::Uuid;

use crate::driveline::{DiffMode, Surface};
use crate::state::SharedSimState;

#[derive(Debug)]
struct ClientMessage {
    msg_type: String,
    steering_angle: f64,
    throttle: f64,
    surface: Option<String>,
    diff_mode: Option<String>,
    target_speed: f64,
}

impl ClientMessage {
    fn from_json(txt: &str) -> Option<Self> {
        let v = serde_json::from_str::<serde_json::Value>(txt).ok()?;

        Some(ClientMessage {
            msg_type: v.get("type")?.as_str()?.to_string(),
            steering_angle: v.get("steeringAngle").and_then(|x| x.as_f64()).unwrap_or(0.0),
            throttle: v.get("throttle").and_then(|x| x.as_f64()).unwrap_or(0.0),
            surface: v.get("surface").and_then(|x| x.as_str()).map(str::to_string),
            diff_mode: v.get("diffMode").and_then(|x| x.as_str()).map(str::to_string),
            target_speed: v.get("targetSpeed").and_then(|x| x.as_f64()).unwrap_or(50.0),
        })
    }
}

/// Surface preset table sent to each client on connect.
fn welcome_json(client_id: &Uuid) -> String {
    let surfaces: Vec<serde_json::Value> = Surface::ALL
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s,
                "label": s.label(),
                "mu": s.mu(),
            })
        })
        .collect();

    serde_json::json!({
        "type": "welcome",
        "clientId": client_id.to_string(),
        "surfaces": surfaces,
    })
    .to_string()
}

/// Apply an input message to the live controls, clamping every value
/// to its slider domain. Unknown mode/surface strings reject the whole
/// message; the simulation never runs on a defaulted mode.
fn apply_input(sim: &mut SharedSimState, msg: &ClientMessage) -> bool {
    let diff_mode = match &msg.diff_mode {
        Some(s) => match s.parse::<DiffMode>() {
            Ok(mode) => Some(mode),
            Err(err) => {
                println!("⚠️  Rejected input: {err}");
                return false;
            }
        },
        None => None,
    };

    let surface = match &msg.surface {
        Some(s) => match s.parse::<Surface>() {
            Ok(surface) => Some(surface),
            Err(err) => {
                println!("⚠️  Rejected input: {err}");
                return false;
            }
        },
        None => None,
    };

    sim.controls.steering_angle = msg.steering_angle.clamp(-45.0, 45.0);
    sim.controls.throttle = msg.throttle.clamp(0.0, 1.0);
    sim.controls.target_speed = msg.target_speed.max(0.0);
    if let Some(mode) = diff_mode {
        sim.controls.diff_mode = mode;
    }
    if let Some(surface) = surface {
        sim.controls.surface_friction = surface.mu();
    }
    true
}

pub async fn start_websocket_server(state: Arc<Mutex<SharedSimState>>) {
    let listener = TcpListener::bind("0.0.0.0:9001")
        .await
        .expect("Failed to bind WebSocket port");

    println!("🌐 WebSocket listening on ws://localhost:9001");

    loop {
        let (raw, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(_) => continue,
        };
        let state_clone = Arc::clone(&state);

        tokio::spawn(async move {
            let ws = match accept_async(raw).await {
                Ok(ws) => ws,
                Err(_) => return,
            };
            let (mut write, mut read) = ws.split();

            // -------------------------------
            // 1) Create outgoing message channel
            // -------------------------------
            let (tx, mut rx) = mpsc::unbounded_channel::<String>();

            {
                let mut sim = state_clone.lock().await;
                sim.register_client(tx.clone());
            }

            // -------------------------------
            // 2) Spawn send-loop task
            // -------------------------------
            tokio::spawn(async move {
                while let Some(msg) = rx.recv().await {
                    let _ = write.send(Message::Text(msg)).await;
                }
            });

            let client_id = Uuid::new_v4();
            println!("🟢 Client connected: {}", client_id);

            // Welcome with the surface preset table
            let _ = tx.send(welcome_json(&client_id));

            // -------------------------------
            // 3) Main receive loop
            // -------------------------------
            while let Some(msg) = read.next().await {
                let msg = match msg {
                    Ok(m) => m,
                    Err(_) => break,
                };

                if !msg.is_text() {
                    continue;
                }
                let text = match msg.to_text() {
                    Ok(t) => t,
                    Err(_) => continue,
                };

                let parsed = match ClientMessage::from_json(text) {
                    Some(v) => v,
                    None => continue,
                };

                match parsed.msg_type.as_str() {
                    "ping" => {
                        let _ = tx.send("{\"type\":\"pong\"}".into());
                    }
                    "input" => {
                        let mut sim = state_clone.lock().await;
                        apply_input(&mut sim, &parsed);
                    }
                    "reset" => {
                        let mut sim = state_clone.lock().await;
                        sim.reset();
                        println!("↩️  Simulation reset by {}", client_id);
                    }
                    _ => {}
                }
            }

            println!("🔴 Client disconnected: {}", client_id);
        });
    }
}
