#![cfg(test)]
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use portcheck_common::config::ProbeSettings;
use portcheck_common::network::result::{Annotation, Classification, ProbeResult};
use portcheck_common::network::target::Target;
use portcheck_core::coordinator::ProbeCoordinator;
use portcheck_core::loader::{self, DnsResolver};
use portcheck_core::network::tcp::TcpConnector;

use super::peer::{Behaviour, closed_port, spawn_peer};

fn settings() -> ProbeSettings {
    ProbeSettings {
        read_timeout: Duration::from_millis(30),
        max_timeout_rounds: 10,
        connect_timeout: Some(Duration::from_secs(2)),
        ..ProbeSettings::default()
    }
}

fn coordinator() -> ProbeCoordinator<TcpConnector> {
    let settings = settings();
    ProbeCoordinator::new(TcpConnector::new(settings.connect_timeout), settings)
}

fn classes(results: &[ProbeResult]) -> Vec<Classification> {
    results.iter().map(|r| r.classification).collect()
}

/// Every kind of peer in one batch, each reported in its own slot.
#[tokio::test]
async fn mixed_batch_is_classified_per_target() -> anyhow::Result<()> {
    let healthy = spawn_peer(Behaviour::Reject { delay: Duration::ZERO }).await?;
    let refused = closed_port().await?;
    let misrouted = spawn_peer(Behaviour::AcceptAsOther).await?;
    let silent = spawn_peer(Behaviour::Silent).await?;

    let targets = vec![
        Target::new("LAB", healthy, "healthy"),
        Target::new("LAB", refused, "refused"),
        Target::new("LAB", misrouted, "misrouted"),
        Target::new("LAB", silent, "silent"),
    ];

    let results = coordinator().run(targets).await;

    assert_eq!(
        classes(&results),
        vec![
            Classification::ConnectedAcknowledged,
            Classification::ClosedOrRefused,
            Classification::ConnectedRejected,
            Classification::TimedOut,
        ]
    );
    assert_eq!(results[0].status(), "connected ok");
    assert_eq!(results[1].status(), "closed");
    assert_eq!(
        results[2].annotations,
        vec![Annotation::ApplicationMismatch {
            sent: "LAB".to_string(),
            received: "SOMEONE_ELSE".to_string(),
        }]
    );
    assert!(results[3].connected);
    Ok(())
}

#[tokio::test]
async fn slow_peers_keep_their_position() -> anyhow::Result<()> {
    let mut targets = Vec::new();
    for (idx, delay_ms) in [150u64, 75, 0].into_iter().enumerate() {
        let addr = spawn_peer(Behaviour::Reject {
            delay: Duration::from_millis(delay_ms),
        })
        .await?;
        targets.push(Target::new(format!("APP{idx}"), addr, format!("{delay_ms} ms")));
    }

    let results = coordinator().run(targets.clone()).await;

    assert_eq!(results.len(), 3);
    for (result, target) in results.iter().zip(&targets) {
        assert_eq!(result.target.as_ref(), target);
        assert_eq!(result.classification, Classification::ConnectedAcknowledged);
    }
    Ok(())
}

#[tokio::test]
async fn target_file_drives_a_full_run() -> anyhow::Result<()> {
    let healthy: SocketAddr = spawn_peer(Behaviour::Reject { delay: Duration::ZERO }).await?;
    let refused: SocketAddr = closed_port().await?;

    let path = std::env::temp_dir().join(format!("portcheck-e2e-{}.txt", std::process::id()));
    let list = format!(
        "# bridges\nHEALTHY {} {} healthy bridge\nDOWN 127.0.0.1 {}\nexit\nNEVER 127.0.0.1 1\n",
        healthy.ip(),
        healthy.port(),
        refused.port()
    );
    tokio::fs::write(&path, list).await?;

    let targets = loader::load_targets(&[PathBuf::from(&path)], &DnsResolver).await;
    let _ = tokio::fs::remove_file(&path).await;
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].description, "healthy bridge");

    let results = coordinator().run(targets).await;
    assert_eq!(
        classes(&results),
        vec![Classification::ConnectedAcknowledged, Classification::ClosedOrRefused]
    );
    Ok(())
}
