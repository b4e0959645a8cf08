//! Private line-oriented TCP client for Pioneer receivers
//!
//! Pioneer network receivers expose an ASCII control protocol on a plain TCP
//! socket (usually port 23, sometimes 8102). Commands are single lines
//! terminated by CR and replies are terminated by CRLF. The receiver also
//! pushes unsolicited status lines whenever its state changes, so a reply to
//! a query may arrive behind unrelated traffic.
//!
//! This crate provides the socket plumbing ([`TelnetConnection`]) and the
//! correlation of a query with its reply ([`request`]). No telnet option
//! negotiation is performed.

mod connection;
mod error;
mod request;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use connection::{LineBuffer, TelnetConnection, TelnetConnector, COMMAND_TERMINATOR, LINE_DELIMITER};
pub use error::TelnetError;
pub use request::{request, send, MAX_READ_ATTEMPTS, READ_TIMEOUT};

use std::time::Duration;

/// Result type for telnet operations
pub type Result<T> = std::result::Result<T, TelnetError>;

/// A bidirectional stream of protocol lines
///
/// Implemented by [`TelnetConnection`] for real sockets. Everything above the
/// transport is written against this trait so it can be driven by a scripted
/// receiver in tests.
pub trait LineStream {
    /// Write `command` followed by the protocol's command terminator
    fn write_line(&mut self, command: &str) -> Result<()>;

    /// Read the next complete line, or `Ok(None)` if none arrives within `timeout`
    fn read_line(&mut self, timeout: Duration) -> Result<Option<String>>;

    /// Discard anything the receiver has already sent
    fn drain(&mut self);

    /// Close the stream. Calling this more than once is harmless.
    fn close(&mut self);
}

/// Something that can open a [`LineStream`] to a receiver
pub trait Connect {
    /// The stream type produced by a successful connect
    type Stream: LineStream;

    /// Open a new stream
    fn connect(&self) -> Result<Self::Stream>;
}
