//! Raw TCP/IP printer connection
//!
//! Most network label printers accept raw jobs on port 9100.

use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info, instrument};

use super::Connection;
use crate::error::{PrintError, PrintResult};

/// Default raw printing port
pub const DEFAULT_PORT: u16 = 9100;

/// Printer connection over TCP/IP
///
/// The host may be a resolvable name or a literal IPv4/IPv6 address. It is
/// resolved on every `open`; each resolved address is tried in turn.
#[derive(Debug)]
pub struct TcpConnection {
    host: String,
    port: u16,
    timeout: Option<Duration>,
    stream: Option<TcpStream>,
}

impl TcpConnection {
    /// Create a closed connection to `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: None,
            stream: None,
        }
    }

    /// Create from an address string (e.g. "192.168.1.100:9100", "[::1]:9100")
    ///
    /// The port defaults to 9100 if not specified.
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let (host, port) = split_host_port(addr)?;
        Ok(Self::new(host, port))
    }

    /// Set connect timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Local address of the open socket
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref().and_then(|s| s.local_addr().ok())
    }

    /// Remote address of the open socket
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.stream.as_ref().and_then(|s| s.peer_addr().ok())
    }

    fn target(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    fn connect(&self) -> PrintResult<TcpStream> {
        let target = self.target();
        let addrs = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| PrintError::connection(&target, e))?;

        let mut last_error = None;
        for addr in addrs {
            let attempt = match self.timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!(%addr, error = %e, "Connect attempt failed");
                    last_error = Some(e);
                }
            }
        }

        let error = last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
        });
        Err(PrintError::connection(target, error))
    }
}

impl Connection for TcpConnection {
    #[instrument(skip(self), fields(addr = %self.target()))]
    fn open(&mut self) -> PrintResult<()> {
        if self.stream.is_some() {
            debug!("Already connected");
            return Ok(());
        }

        info!("Connecting to printer");
        let stream = self.connect()?;
        self.stream = Some(stream);
        info!("Connected");
        Ok(())
    }

    #[instrument(skip(self), fields(addr = %self.target()))]
    fn close(&mut self) -> PrintResult<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };

        // The socket is released when `stream` drops, even if shutdown fails
        stream.shutdown(Shutdown::Both)?;

        info!("Disconnected");
        Ok(())
    }

    #[instrument(skip(self, data), fields(addr = %self.target(), data_len = data.len()))]
    fn send(&mut self, data: &[u8]) -> PrintResult<()> {
        let stream = self.stream.as_mut().ok_or(PrintError::NotOpen)?;
        stream.write_all(data)?;
        stream.flush()?;
        debug!("Sent {} bytes", data.len());
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

/// Split "host:port", "[v6]:port", "host" or a bare IPv6 literal
pub(crate) fn split_host_port(addr: &str) -> PrintResult<(String, u16)> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(PrintError::InvalidConfig("Empty address".to_string()));
    }

    if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;
        let port = match tail {
            "" => DEFAULT_PORT,
            tail => match tail.strip_prefix(':') {
                Some(port) => parse_port(addr, port)?,
                None => {
                    return Err(PrintError::InvalidConfig(format!(
                        "Invalid address: {}",
                        addr
                    )));
                }
            },
        };
        if host.is_empty() {
            return Err(PrintError::InvalidConfig(format!("Invalid address: {}", addr)));
        }
        return Ok((host.to_string(), port));
    }

    // More than one colon without brackets: a bare IPv6 literal
    if addr.matches(':').count() > 1 {
        return Ok((addr.to_string(), DEFAULT_PORT));
    }

    match addr.split_once(':') {
        Some((host, port)) if !host.is_empty() => Ok((host.to_string(), parse_port(addr, port)?)),
        Some(_) => Err(PrintError::InvalidConfig(format!("Invalid address: {}", addr))),
        None => Ok((addr.to_string(), DEFAULT_PORT)),
    }
}

fn parse_port(addr: &str, port: &str) -> PrintResult<u16> {
    port.parse()
        .map_err(|_| PrintError::InvalidConfig(format!("Invalid port in address: {}", addr)))
}
