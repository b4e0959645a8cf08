use std::time::Duration;

use telnet_client::{request, Connect, LineStream, TelnetConnector};
use tracing::debug;

use crate::{Command, Query, Result};

/// A client for executing Pioneer operations against a receiver
///
/// The client holds no connection. Each [`send`](PioneerClient::send) opens a
/// connection, writes one command and closes it again; queries run inside a
/// [`Session`] that lives for one refresh cycle.
#[derive(Debug, Clone)]
pub struct PioneerClient<C = TelnetConnector> {
    connector: C,
}

impl PioneerClient<TelnetConnector> {
    /// Create a client for the receiver at `host:port`
    ///
    /// `timeout` bounds connecting and every write.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            connector: TelnetConnector::new(host, port, timeout),
        }
    }
}

impl<C: Connect> PioneerClient<C> {
    /// Create a client over a custom connector (scripted receivers, proxies)
    pub fn with_connector(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Open a session for a sequence of queries
    pub fn open(&self) -> Result<Session<C::Stream>> {
        let stream = self.connector.connect()?;
        Ok(Session { stream })
    }

    /// Send a command without waiting for confirmation
    ///
    /// Opens a connection, writes the encoded command, discards whatever the
    /// receiver echoes back and closes the connection.
    pub fn send(&self, command: &Command) -> Result<()> {
        command.validate()?;

        let mut stream = self.connector.connect()?;
        let encoded = command.encode();
        debug!("sending {}", encoded);
        let result = telnet_client::send(&mut stream, &encoded);
        stream.close();
        result.map_err(Into::into)
    }
}

/// An open connection used for a run of queries
///
/// Closed by [`Session::close`] or when dropped.
pub struct Session<S: LineStream> {
    stream: S,
}

impl<S: LineStream> Session<S> {
    /// Issue `query` and decode its reply
    ///
    /// `None` means the receiver did not answer in time or the answer could
    /// not be decoded.
    pub fn query<Q: Query>(&mut self, query: &Q) -> Option<Q::Output> {
        let reply = request(&mut self.stream, &query.command(), Q::PREFIX)?;
        query.parse(&reply)
    }

    /// Issue `query` and return the undecoded reply line
    pub fn query_raw<Q: Query>(&mut self, query: &Q) -> Option<String> {
        request(&mut self.stream, &query.command(), Q::PREFIX)
    }

    pub fn close(mut self) {
        self.stream.close();
    }
}

impl<S: LineStream> Drop for Session<S> {
    fn drop(&mut self) {
        self.stream.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApiError, MuteQuery, PowerQuery, PowerState, VolumeQuery};
    use telnet_client::testing::ScriptedDevice;
    use telnet_client::TelnetError;

    #[test]
    fn test_send_opens_writes_and_closes() {
        let device = ScriptedDevice::new();
        let client = PioneerClient::with_connector(device.clone());

        client.send(&Command::SetVolume(0.27)).unwrap();

        assert_eq!(device.written(), vec!["050VL".to_string()]);
        assert_eq!(device.connections(), 1);
        assert_eq!(device.closed(), 1);
    }

    #[test]
    fn test_send_refused_is_network_error() {
        let device = ScriptedDevice::new();
        device.refuse(TelnetError::Connection("refused".to_string()));
        let client = PioneerClient::with_connector(device.clone());

        let error = client.send(&Command::PowerOn).unwrap_err();
        assert!(matches!(error, ApiError::NetworkError(_)));
        assert!(device.written().is_empty());
    }

    #[test]
    fn test_send_write_timeout_still_closes() {
        let device = ScriptedDevice::new();
        device.fail_writes(TelnetError::Timeout);
        let client = PioneerClient::with_connector(device.clone());

        assert_eq!(client.send(&Command::PowerOff), Err(ApiError::Timeout));
        assert_eq!(device.closed(), 1);
    }

    #[test]
    fn test_send_invalid_command_never_connects() {
        let device = ScriptedDevice::new();
        let client = PioneerClient::with_connector(device.clone());

        let result = client.send(&Command::SelectSource("None".to_string()));
        assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
        assert_eq!(device.connections(), 0);
    }

    #[test]
    fn test_session_queries() {
        let device = ScriptedDevice::new();
        device.reply("?P", ["PWR0"]);
        device.reply("?V", ["VOL050"]);
        device.reply("?M", ["MUT1"]);
        let client = PioneerClient::with_connector(device.clone());

        let mut session = client.open().unwrap();
        assert_eq!(session.query(&PowerQuery), Some(PowerState::On));
        let volume = session.query(&VolumeQuery).unwrap();
        assert!((volume - 0.27).abs() < 0.01);
        assert_eq!(session.query(&MuteQuery), Some(false));
        session.close();

        assert_eq!(device.closed(), 1);
    }

    #[test]
    fn test_dropped_session_closes() {
        let device = ScriptedDevice::new();
        let client = PioneerClient::with_connector(device.clone());
        {
            let _session = client.open().unwrap();
        }
        assert_eq!(device.closed(), 1);
    }
}
