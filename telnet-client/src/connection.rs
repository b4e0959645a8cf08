//! TCP transport for the receiver's line protocol

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::{Connect, LineStream, Result, TelnetError};

/// Terminator appended to every outgoing command
pub const COMMAND_TERMINATOR: &[u8] = b"\r";

/// Delimiter ending every incoming line
pub const LINE_DELIMITER: &[u8] = b"\r\n";

const READ_CHUNK: usize = 512;

/// Accumulates raw bytes and splits them into CRLF-delimited lines
///
/// Bytes after the last delimiter are kept until the rest of the line arrives.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Remove and return the next complete line, trimmed of surrounding whitespace
    pub fn take_line(&mut self) -> Option<String> {
        let end = self
            .bytes
            .windows(LINE_DELIMITER.len())
            .position(|window| window == LINE_DELIMITER)?;
        let raw: Vec<u8> = self.bytes.drain(..end + LINE_DELIMITER.len()).collect();
        Some(String::from_utf8_lossy(&raw).trim().to_string())
    }

    pub fn pending(&self) -> usize {
        self.bytes.len()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

/// A single open connection to a receiver
///
/// The socket is shut down when the connection is closed or dropped, so every
/// exit path releases it.
#[derive(Debug)]
pub struct TelnetConnection {
    stream: Option<TcpStream>,
    buffer: LineBuffer,
    peer: String,
}

impl TelnetConnection {
    /// Connect to `host:port`, trying each resolved address within `timeout`
    ///
    /// `timeout` also bounds every subsequent write.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(TelnetError::Io("timeout must be non-zero".to_string()));
        }

        let peer = format!("{}:{}", host, port);
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| TelnetError::Connection(format!("Failed to resolve {}: {}", peer, e)))?;

        let mut last_error = TelnetError::Connection(format!("No addresses found for {}", peer));
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_write_timeout(Some(timeout)).map_err(TelnetError::from_io)?;
                    stream.set_nodelay(true).map_err(TelnetError::from_io)?;
                    debug!("connected to {} ({})", peer, addr);
                    return Ok(Self {
                        stream: Some(stream),
                        buffer: LineBuffer::new(),
                        peer,
                    });
                }
                Err(e) => {
                    trace!("connect to {} failed: {}", addr, e);
                    last_error = TelnetError::from_io(e);
                }
            }
        }

        Err(last_error)
    }

    /// The `host:port` this connection was opened to
    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// Read until a full line is buffered or `timeout` elapses
    ///
    /// A timeout is reported as `Ok(None)`, as is the peer closing the socket.
    pub fn read_line(&mut self, timeout: Duration) -> Result<Option<String>> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(line) = self.buffer.take_line() {
                trace!("<- {:?}", line);
                return Ok(Some(line));
            }

            let stream = self.stream.as_mut().ok_or(TelnetError::Closed)?;
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            stream
                .set_read_timeout(Some(deadline - now))
                .map_err(TelnetError::from_io)?;

            let mut chunk = [0u8; READ_CHUNK];
            match stream.read(&mut chunk) {
                Ok(0) => {
                    debug!("{} closed the connection", self.peer);
                    return Ok(None);
                }
                Ok(n) => self.buffer.extend(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(None);
                }
                Err(e) => return Err(TelnetError::from_io(e)),
            }
        }
    }

    /// Write `command` terminated by CR
    pub fn write_line(&mut self, command: &str) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(TelnetError::Closed)?;

        let mut payload = Vec::with_capacity(command.len() + COMMAND_TERMINATOR.len());
        payload.extend_from_slice(command.as_bytes());
        payload.extend_from_slice(COMMAND_TERMINATOR);

        trace!("-> {:?}", command);
        stream.write_all(&payload).map_err(TelnetError::from_io)?;
        stream.flush().map_err(TelnetError::from_io)
    }

    /// Discard buffered lines and whatever bytes are already waiting on the socket
    pub fn drain(&mut self) {
        self.buffer.clear();

        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        if stream.set_nonblocking(true).is_err() {
            return;
        }

        let mut chunk = [0u8; READ_CHUNK];
        let mut discarded = 0usize;
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => discarded += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        let _ = stream.set_nonblocking(false);

        if discarded > 0 {
            trace!("drained {} bytes from {}", discarded, self.peer);
        }
    }

    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            debug!("closed connection to {}", self.peer);
        }
    }
}

impl Drop for TelnetConnection {
    fn drop(&mut self) {
        self.close();
    }
}

impl LineStream for TelnetConnection {
    fn write_line(&mut self, command: &str) -> Result<()> {
        TelnetConnection::write_line(self, command)
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Option<String>> {
        TelnetConnection::read_line(self, timeout)
    }

    fn drain(&mut self) {
        TelnetConnection::drain(self)
    }

    fn close(&mut self) {
        TelnetConnection::close(self)
    }
}

/// Opens [`TelnetConnection`]s to a fixed receiver address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelnetConnector {
    pub host: String,
    pub port: u16,
    /// Connect and write timeout
    pub timeout: Duration,
}

impl TelnetConnector {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }
}

impl Connect for TelnetConnector {
    type Stream = TelnetConnection;

    fn connect(&self) -> Result<TelnetConnection> {
        TelnetConnection::connect(&self.host, self.port, self.timeout)
    }
}
