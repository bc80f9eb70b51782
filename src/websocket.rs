use chrono::Utc;
use log::{error, info};
use serde::Serialize;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tungstenite::{accept, Message};

use crate::state::LinkState;

#[derive(Serialize)]
struct StateMessage {
    #[serde(rename = "type")]
    msg_type: String,
    timestamp: i64,
    #[serde(flatten)]
    state: LinkState,
}

/// Broadcasts the latest link snapshot to every connected client at the
/// frame cadence. Observability fan-out only; it never writes channels.
pub fn websocket_thread(
    listen_addr: String,
    state_mutex: Arc<Mutex<Option<LinkState>>>,
    period: Duration,
) {
    let server = match TcpListener::bind(&listen_addr) {
        Ok(s) => s,
        Err(e) => {
            error!("[ws] bind {} failed: {}", listen_addr, e);
            return;
        }
    };
    info!("[ws] listening on {}", listen_addr);

    for stream in server.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                error!("[ws] connection error: {}", e);
                continue;
            }
        };

        let state_mutex = Arc::clone(&state_mutex);
        thread::spawn(move || {
            let mut websocket = match accept(stream) {
                Ok(ws) => ws,
                Err(e) => {
                    error!("[ws] handshake error: {}", e);
                    return;
                }
            };

            info!("[ws] client connected");

            loop {
                let state = {
                    let locked_state = state_mutex.lock().unwrap();
                    locked_state.clone()
                };

                if let Some(state) = state {
                    let message = StateMessage {
                        msg_type: String::from("state"),
                        timestamp: Utc::now().timestamp_millis(),
                        state,
                    };
                    match serde_json::to_string(&message) {
                        Ok(json) => {
                            if websocket.send(Message::Text(json)).is_err() {
                                info!("[ws] client disconnected");
                                break;
                            }
                        }
                        Err(e) => error!("[ws] serialization error: {}", e),
                    }
                }

                thread::sleep(period);
            }
        });
    }
}
