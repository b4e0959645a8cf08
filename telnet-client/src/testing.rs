//! Scripted in-memory receiver for tests
//!
//! [`ScriptedDevice`] implements [`Connect`] and hands out streams that answer
//! commands from a fixed script instead of a socket. Reads never block: a read
//! with nothing queued behaves like a timeout.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::{Connect, LineStream, Result, TelnetError};

#[derive(Debug, Default)]
struct Script {
    replies: HashMap<String, Vec<String>>,
    unsolicited: VecDeque<String>,
    pending: VecDeque<String>,
    written: Vec<String>,
    reads: usize,
    connections: usize,
    closed: usize,
    refuse: Option<TelnetError>,
    write_error: Option<TelnetError>,
}

/// A fake receiver shared between a test and the streams it hands out
#[derive(Debug, Clone, Default)]
pub struct ScriptedDevice {
    script: Arc<Mutex<Script>>,
}

impl ScriptedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Answer `command` with `lines`, replacing any earlier answer
    pub fn reply<I, L>(&self, command: &str, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.lock()
            .replies
            .insert(command.to_string(), lines.into_iter().map(Into::into).collect());
    }

    /// Stop answering `command`
    pub fn forget(&self, command: &str) {
        self.lock().replies.remove(command);
    }

    /// Queue a status push delivered ahead of the next reply
    pub fn push_unsolicited(&self, line: impl Into<String>) {
        self.lock().unsolicited.push_back(line.into());
    }

    /// Make every connect attempt fail with `error`
    pub fn refuse(&self, error: TelnetError) {
        self.lock().refuse = Some(error);
    }

    /// Accept connections again
    pub fn accept(&self) {
        self.lock().refuse = None;
    }

    /// Make every write fail with `error`
    pub fn fail_writes(&self, error: TelnetError) {
        self.lock().write_error = Some(error);
    }

    /// Commands written so far, without terminators
    pub fn written(&self) -> Vec<String> {
        self.lock().written.clone()
    }

    pub fn clear_written(&self) {
        self.lock().written.clear();
    }

    /// Number of reads attempted across all streams
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    /// Number of successful connects
    pub fn connections(&self) -> usize {
        self.lock().connections
    }

    /// Number of streams that have been closed
    pub fn closed(&self) -> usize {
        self.lock().closed
    }
}

impl Connect for ScriptedDevice {
    type Stream = ScriptedStream;

    fn connect(&self) -> Result<ScriptedStream> {
        let mut script = self.lock();
        if let Some(error) = script.refuse.clone() {
            return Err(error);
        }
        script.connections += 1;
        script.pending.clear();
        drop(script);

        Ok(ScriptedStream {
            device: self.clone(),
            closed: false,
        })
    }
}

/// Stream handed out by [`ScriptedDevice`]
#[derive(Debug)]
pub struct ScriptedStream {
    device: ScriptedDevice,
    closed: bool,
}

impl LineStream for ScriptedStream {
    fn write_line(&mut self, command: &str) -> Result<()> {
        if self.closed {
            return Err(TelnetError::Closed);
        }
        let mut script = self.device.lock();
        if let Some(error) = script.write_error.clone() {
            return Err(error);
        }
        script.written.push(command.to_string());

        let unsolicited: Vec<String> = script.unsolicited.drain(..).collect();
        script.pending.extend(unsolicited);
        if let Some(lines) = script.replies.get(command).cloned() {
            script.pending.extend(lines);
        }
        Ok(())
    }

    fn read_line(&mut self, _timeout: Duration) -> Result<Option<String>> {
        if self.closed {
            return Err(TelnetError::Closed);
        }
        let mut script = self.device.lock();
        script.reads += 1;
        Ok(script.pending.pop_front())
    }

    fn drain(&mut self) {
        self.device.lock().pending.clear();
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.device.lock().closed += 1;
        }
    }
}

impl Drop for ScriptedStream {
    fn drop(&mut self) {
        self.close();
    }
}
