use ppm_link::config::Config;
use ppm_link::host::LinkHost;
use ppm_link::input::input_thread;
use ppm_link::state::LinkState;
use ppm_link::websocket::websocket_thread;

use anyhow::Result;
use log::{info, warn};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

const CONFIG_FILE: &str = "config.json";

fn main() -> Result<()> {
    env_logger::init();
    info!("starting PPM link");

    let cfg = match Config::load(CONFIG_FILE) {
        Ok(cfg) => {
            info!("config loaded from {}", CONFIG_FILE);
            cfg
        }
        Err(e) => {
            warn!("config load failed ({:#}), using defaults", e);
            Config::default()
        }
    };

    let (tx_input, rx_input) = mpsc::channel();
    thread::spawn(move || {
        input_thread(tx_input);
    });

    let frame_period = Duration::from_secs_f64(1.0 / cfg.host.send_hz.max(1) as f64);
    let state_mutex: Arc<Mutex<Option<LinkState>>> = Arc::new(Mutex::new(None));
    let state_mutex_clone = Arc::clone(&state_mutex);
    let listen_addr = cfg.host.listen_addr.clone();
    thread::spawn(move || {
        websocket_thread(listen_addr, state_mutex_clone, frame_period);
    });

    let mut host = LinkHost::new(cfg);
    let started = Instant::now();
    let mut frame: u64 = 0;

    while host.is_running() {
        let now = started.elapsed().as_secs_f64();

        for event in rx_input.try_iter() {
            host.handle_event(event, now);
        }
        host.finish_frame(now);

        {
            let mut locked_state = state_mutex.lock().unwrap();
            *locked_state = Some(host.snapshot(frame));
        }

        frame += 1;
        thread::sleep(frame_period);
    }

    info!("exiting");
    Ok(())
}
