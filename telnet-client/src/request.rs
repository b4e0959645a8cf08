//! Correlating a query with its reply amid unsolicited status pushes

use std::time::Duration;

use tracing::{debug, trace};

use crate::{LineStream, Result};

/// Number of lines read while waiting for a matching reply
pub const MAX_READ_ATTEMPTS: usize = 3;

/// How long each of those reads may wait
pub const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// Send `command` and wait for a line starting with `expected_prefix`
///
/// The receiver randomly interleaves state-change pushes with replies, so up
/// to [`MAX_READ_ATTEMPTS`] lines are read and anything not starting with the
/// prefix is discarded. Returns `None` if the write fails, a read fails, or no
/// matching line turns up. Never returns a line without the prefix.
pub fn request<S: LineStream + ?Sized>(
    stream: &mut S,
    command: &str,
    expected_prefix: &str,
) -> Option<String> {
    if let Err(e) = stream.write_line(command) {
        debug!("command {} failed: {}", command, e);
        return None;
    }

    for _ in 0..MAX_READ_ATTEMPTS {
        match stream.read_line(READ_TIMEOUT) {
            Ok(Some(line)) if line.starts_with(expected_prefix) => return Some(line),
            Ok(Some(line)) => {
                trace!("skipping {:?} while waiting for {} reply", line, expected_prefix);
            }
            Ok(None) => {}
            Err(e) => {
                debug!("reading reply to {} failed: {}", command, e);
                return None;
            }
        }
    }

    debug!("no {} reply to {}", expected_prefix, command);
    None
}

/// Send a command whose reply is not needed, then discard the backlog
pub fn send<S: LineStream + ?Sized>(stream: &mut S, command: &str) -> Result<()> {
    stream.write_line(command)?;
    stream.drain();
    Ok(())
}
