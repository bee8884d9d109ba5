#![cfg(test)]
//! Loopback MLLP peers with scripted behaviour.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use portcheck_core::{message, mllp};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    /// Rejects the garbage segment as a validating receiver should.
    Reject { delay: Duration },
    /// Accepts everything under another application name.
    AcceptAsOther,
    /// Reads forever and never answers.
    Silent,
}

/// Starts a peer on an ephemeral loopback port and returns its address.
pub async fn spawn_peer(behaviour: Behaviour) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(serve(socket, behaviour));
        }
    });
    Ok(addr)
}

/// An address nothing listens on.
pub async fn closed_port() -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

async fn serve(mut socket: TcpStream, behaviour: Behaviour) {
    let mut received = Vec::new();
    let mut chunk = [0u8; 512];
    while mllp::find_terminator(&received).is_none() {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => received.extend_from_slice(&chunk[..n]),
        }
    }

    let request = mllp::decode_latin1(&received);
    let source = request
        .split(message::FIELD_SEPARATOR)
        .nth(2)
        .unwrap_or_default()
        .to_string();

    let reply = match behaviour {
        Behaviour::Reject { delay } => {
            tokio::time::sleep(delay).await;
            Some(format!(
                "MSH|^~\\&|{source}|Epic|Test|Testing|20230101000001||ACK|0|P|2.5\rMSA|AR|0|Incorrect Processing ID\r"
            ))
        }
        Behaviour::AcceptAsOther => Some(
            "MSH|^~\\&|SOMEONE_ELSE|Epic|Test|Testing|20230101000001||ACK|0|P|2.5\rMSA|AA|0|\r".to_string(),
        ),
        Behaviour::Silent => None,
    };

    if let Some(reply) = reply {
        let _ = socket.write_all(&mllp::frame(&reply)).await;
    }

    // Drain fillers until the prober hangs up.
    while let Ok(n) = socket.read(&mut chunk).await {
        if n == 0 {
            break;
        }
    }
}
