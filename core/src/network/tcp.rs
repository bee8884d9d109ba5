use std::net::SocketAddrV4;
use std::time::Duration;

use async_trait::async_trait;
use portcheck_common::error::ProbeError;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Opens the byte stream a session talks over.
///
/// Sessions only see this trait, so they can be driven over in-memory pipes.
#[async_trait]
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Failures are already mapped: refused, timed out, or plain I/O.
    async fn connect(&self, addr: SocketAddrV4) -> Result<Self::Stream, ProbeError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector {
    connect_timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, addr: SocketAddrV4) -> Result<TcpStream, ProbeError> {
        let connecting = TcpStream::connect(addr);
        let result = match self.connect_timeout {
            Some(limit) => timeout(limit, connecting)
                .await
                .map_err(|_elapsed| ProbeError::ConnectTimeout)?,
            None => connecting.await,
        };
        result.map_err(ProbeError::from_connect)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
