//! Error types for the telnet client

use thiserror::Error;

/// Errors that can occur while talking to a receiver
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TelnetError {
    /// The receiver refused the connection or could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// A connect, read or write did not complete in time
    #[error("Operation timed out")]
    Timeout,

    /// The connection has already been closed
    #[error("Connection closed")]
    Closed,

    /// Any other socket failure
    #[error("I/O error: {0}")]
    Io(String),
}

impl TelnetError {
    /// Classify a socket error, folding the platform's timeout kinds into `Timeout`
    pub(crate) fn from_io(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => TelnetError::Timeout,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected
            | std::io::ErrorKind::AddrNotAvailable => TelnetError::Connection(error.to_string()),
            _ => TelnetError::Io(error.to_string()),
        }
    }
}
