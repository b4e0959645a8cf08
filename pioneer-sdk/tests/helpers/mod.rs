//! A fake receiver listening on a real TCP port
//!
//! Handles one connection at a time, answers status queries from its state
//! and applies commands to it, the way a receiver on the LAN would.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FakeState {
    pub power: bool,
    pub volume: u32,
    pub muted: bool,
    pub source: String,
    pub sound_mode: String,
    /// Slot code -> name reported by `?RGBnn`
    pub names: BTreeMap<String, String>,
    /// Lines pushed ahead of every reply
    pub noise: Vec<String>,
    /// Stay silent for these commands
    pub ignore: Vec<String>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            power: true,
            volume: 50,
            muted: false,
            source: "05".to_string(),
            sound_mode: "0001".to_string(),
            names: BTreeMap::new(),
            noise: Vec::new(),
            ignore: Vec::new(),
        }
    }
}

impl FakeState {
    fn answer(&mut self, command: &str) -> Option<String> {
        match command {
            "?P" => Some(if self.power { "PWR0" } else { "PWR1" }.to_string()),
            "?V" => Some(format!("VOL{:03}", self.volume)),
            "?M" => Some(if self.muted { "MUT0" } else { "MUT1" }.to_string()),
            "?S" => Some(format!("SR{}", self.sound_mode)),
            "?F" => Some(format!("FN{}", self.source)),
            "PO" => {
                self.power = true;
                Some("PWR0".to_string())
            }
            "PF" => {
                self.power = false;
                Some("PWR1".to_string())
            }
            "VU" => {
                self.volume = (self.volume + 2).min(185);
                Some(format!("VOL{:03}", self.volume))
            }
            "VD" => {
                self.volume = self.volume.saturating_sub(2);
                Some(format!("VOL{:03}", self.volume))
            }
            "MO" => {
                self.muted = true;
                Some("MUT0".to_string())
            }
            "MF" => {
                self.muted = false;
                Some("MUT1".to_string())
            }
            _ if command.starts_with("?RGB") => {
                let slot = &command[4..];
                let name = self.names.get(slot).cloned().unwrap_or_default();
                Some(format!("RGB{}1{}", slot, name))
            }
            _ if command.ends_with("VL") => {
                self.volume = command[..command.len() - 2].parse().ok()?;
                Some(format!("VOL{:03}", self.volume))
            }
            _ if command.ends_with("FN") => {
                self.source = command[..command.len() - 2].to_string();
                Some(format!("FN{}", self.source))
            }
            _ if command.ends_with("SR") => {
                self.sound_mode = command[..command.len() - 2].to_string();
                Some(format!("SR{}", self.sound_mode))
            }
            _ => Some("E04".to_string()),
        }
    }
}

pub struct FakeReceiver {
    addr: SocketAddr,
    state: Arc<Mutex<FakeState>>,
    received: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FakeReceiver {
    pub fn start(state: FakeState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(Mutex::new(state));
        let received = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let state = state.clone();
            let received = received.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    match listener.accept() {
                        Ok((stream, _)) => serve(stream, &state, &received),
                        Err(e) if e.kind() == ErrorKind::WouldBlock => {
                            thread::sleep(Duration::from_millis(5))
                        }
                        Err(_) => break,
                    }
                }
            })
        };

        Self {
            addr,
            state,
            received,
            stop,
            handle: Some(handle),
        }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn update(&self, f: impl FnOnce(&mut FakeState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn state(&self) -> FakeState {
        self.state.lock().unwrap().clone()
    }

    /// Every command received so far, in order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// Wait until `predicate` holds for the received commands
    pub fn wait_for(&self, predicate: impl Fn(&[String]) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if predicate(&self.received.lock().unwrap()) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }
}

impl Drop for FakeReceiver {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(stream: TcpStream, state: &Mutex<FakeState>, received: &Mutex<Vec<String>>) {
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut writer = match stream.try_clone() {
        Ok(writer) => writer,
        Err(_) => return,
    };
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\r', &mut buf) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        let command = String::from_utf8_lossy(&buf).trim().to_string();
        if command.is_empty() {
            continue;
        }
        received.lock().unwrap().push(command.clone());

        let (noise, reply) = {
            let mut state = state.lock().unwrap();
            if state.ignore.contains(&command) {
                continue;
            }
            (state.noise.clone(), state.answer(&command))
        };
        let mut out = String::new();
        for line in noise.iter().chain(reply.iter()) {
            out.push_str(line);
            out.push_str("\r\n");
        }
        let _ = writer.write_all(out.as_bytes());
    }
}

/// A port with nothing listening on it
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
