//! HAProxy admin-socket access.
//!
//! [`CommandClient`] is the request/response primitive the query core
//! depends on: send one command to one endpoint, get the raw text back.
//! [`SocketClient`] implements it over Unix and TCP stream sockets.
//!
//! Connections are not reused. HAProxy closes a non-interactive CLI
//! session after answering, so every command opens a fresh socket.

pub mod commands;

use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, UnixStream};

use crate::error::OpsQueryError;

// async_trait keeps CommandClient object-safe; the table catalogue holds it as Arc<dyn _>.
#[async_trait]
pub trait CommandClient: Send + Sync {
    async fn run_command(&self, endpoint: &str, command: &str) -> io::Result<String>;
}

/// Where an admin socket listens.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SocketAddress {
    Unix(PathBuf),
    Tcp(String),
}

impl FromStr for SocketAddress {
    type Err = OpsQueryError;

    /// Accepts `unix:///path`, `tcp://host:port`, `host:port`, or an
    /// absolute path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| OpsQueryError::InvalidEndpoint {
            endpoint: s.to_string(),
            reason: reason.to_string(),
        };

        if let Some(path) = s.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(invalid("missing socket path"));
            }
            return Ok(Self::Unix(PathBuf::from(path)));
        }
        if s.starts_with('/') {
            return Ok(Self::Unix(PathBuf::from(s)));
        }

        let hostport = s.strip_prefix("tcp://").unwrap_or(s);
        match hostport.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => {
                port.parse::<u16>()
                    .map_err(|_| invalid("port must be a number between 0 and 65535"))?;
                Ok(Self::Tcp(hostport.to_string()))
            }
            _ => Err(invalid(
                "expected unix:///path, tcp://host:port or host:port",
            )),
        }
    }
}

/// Talks to HAProxy admin sockets, one connection per command.
#[derive(Clone, Debug)]
pub struct SocketClient {
    timeout: Duration,
}

impl SocketClient {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SocketClient {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}

#[async_trait]
impl CommandClient for SocketClient {
    async fn run_command(&self, endpoint: &str, command: &str) -> io::Result<String> {
        let address = SocketAddress::from_str(endpoint)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        tokio::time::timeout(self.timeout, connect_and_exchange(&address, command))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no response within {}ms", self.timeout.as_millis()),
                )
            })?
    }
}

async fn connect_and_exchange(address: &SocketAddress, command: &str) -> io::Result<String> {
    match address {
        SocketAddress::Unix(path) => exchange(UnixStream::connect(path).await?, command).await,
        SocketAddress::Tcp(hostport) => {
            exchange(TcpStream::connect(hostport.as_str()).await?, command).await
        }
    }
}

async fn exchange<S>(mut stream: S, command: &str) -> io::Result<String>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(&commands::framed(command)).await?;
    stream.flush().await?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
