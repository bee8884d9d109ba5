//! Fan-out / fan-in over a target list.
//!
//! Every target gets its own task running one [`session::probe`]. Results are
//! written into one slot per input position, so the returned list lines up
//! with the input no matter which probe finishes first.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use portcheck_common::config::ProbeSettings;
use portcheck_common::error::ProbeError;
use portcheck_common::network::result::ProbeResult;
use portcheck_common::network::target::Target;
use tracing::error;

use crate::network::tcp::Connector;
use crate::session;

/// Called with `(finished, total)` each time a probe ends.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

pub struct ProbeCoordinator<C> {
    connector: Arc<C>,
    settings: ProbeSettings,
    on_probe_done: Option<ProgressCallback>,
}

impl<C> ProbeCoordinator<C>
where
    C: Connector + 'static,
{
    pub fn new(connector: C, settings: ProbeSettings) -> Self {
        Self {
            connector: Arc::new(connector),
            settings,
            on_probe_done: None,
        }
    }

    pub fn with_progress(mut self, callback: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.on_probe_done = Some(Arc::new(callback));
        self
    }

    /// Probes all targets concurrently and waits for every one of them.
    ///
    /// Returns exactly one result per target, in input order.
    pub async fn run(&self, targets: Vec<Target>) -> Vec<ProbeResult> {
        if targets.is_empty() {
            return Vec::new();
        }

        let total = targets.len();
        let finished = Arc::new(AtomicUsize::new(0));
        let targets: Vec<Arc<Target>> = targets.into_iter().map(Arc::new).collect();

        let mut handles = Vec::with_capacity(total);
        for (idx, target) in targets.iter().enumerate() {
            let connector = Arc::clone(&self.connector);
            let target = Arc::clone(target);
            let settings = self.settings;
            let finished = Arc::clone(&finished);
            let callback = self.on_probe_done.clone();

            let handle = tokio::spawn(async move {
                let result = session::probe(connector.as_ref(), target, &settings).await;
                let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = callback {
                    cb(done, total);
                }
                result
            });
            handles.push((idx, handle));
        }

        let mut slots: Vec<Option<ProbeResult>> = (0..total).map(|_| None).collect();
        for (idx, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("probe of {} did not finish: {e}", targets[idx].endpoint);
                    let err = ProbeError::Task(e.to_string());
                    ProbeResult::from_error(Arc::clone(&targets[idx]), false, &err)
                }
            };
            slots[idx] = Some(result);
        }

        slots.into_iter().flatten().collect()
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

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portcheck_common::network::result::Classification;
    use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::io::DuplexStream;

    /// Refuses every connect after sleeping as many milliseconds as the port
    /// number, and records the order in which ports finished.
    #[derive(Default)]
    struct DelayedRefusal {
        attempts: AtomicUsize,
        finished: Mutex<Vec<u16>>,
    }

    #[async_trait]
    impl Connector for DelayedRefusal {
        type Stream = DuplexStream;

        async fn connect(&self, addr: SocketAddrV4) -> Result<DuplexStream, ProbeError> {
            self.attempts.fetch_add(1, Ordering::Relaxed);
            tokio::time::sleep(Duration::from_millis(u64::from(addr.port()))).await;
            self.finished.lock().unwrap().push(addr.port());
            Err(ProbeError::Refused)
        }
    }

    fn target(source: &str, port: u16) -> Target {
        let endpoint = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port));
        Target::new(source, endpoint, "")
    }

    #[tokio::test]
    async fn results_follow_input_order_not_completion_order() {
        let targets = vec![
            target("A", 120),
            target("B", 80),
            target("C", 40),
            target("D", 0),
        ];
        let coordinator = ProbeCoordinator::new(DelayedRefusal::default(), ProbeSettings::default());
        let results = coordinator.run(targets.clone()).await;

        assert_eq!(results.len(), targets.len());
        for (result, target) in results.iter().zip(&targets) {
            assert_eq!(result.target.as_ref(), target);
            assert_eq!(result.classification, Classification::ClosedOrRefused);
        }
        assert_eq!(*coordinator.connector.finished.lock().unwrap(), vec![0, 40, 80, 120]);
    }

    #[tokio::test]
    async fn zero_targets_start_no_session() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_ref = Arc::clone(&calls);
        let coordinator = ProbeCoordinator::new(DelayedRefusal::default(), ProbeSettings::default())
            .with_progress(move |_, _| {
                calls_ref.fetch_add(1, Ordering::Relaxed);
            });

        let results = coordinator.run(Vec::new()).await;
        assert!(results.is_empty());
        assert_eq!(coordinator.connector.attempts.load(Ordering::Relaxed), 0);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn progress_is_reported_once_per_probe() {
        let seen: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_ref = Arc::clone(&seen);
        let coordinator = ProbeCoordinator::new(DelayedRefusal::default(), ProbeSettings::default())
            .with_progress(move |done, total| seen_ref.lock().unwrap().push((done, total)));

        let results = coordinator
            .run(vec![target("A", 10), target("B", 0), target("C", 5)])
            .await;
        assert_eq!(results.len(), 3);

        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn bad_target_does_not_stop_the_batch() {
        let v6 = Target::new(
            "V6",
            SocketAddr::V6(SocketAddrV6::new(Ipv6Addr::LOCALHOST, 2575, 0, 0)),
            "",
        );
        let coordinator = ProbeCoordinator::new(DelayedRefusal::default(), ProbeSettings::default());
        let results = coordinator.run(vec![target("A", 0), v6, target("C", 0)]).await;

        let classes: Vec<Classification> = results.iter().map(|r| r.classification).collect();
        assert_eq!(
            classes,
            vec![
                Classification::ClosedOrRefused,
                Classification::Error,
                Classification::ClosedOrRefused,
            ]
        );
        assert_eq!(coordinator.connector.attempts.load(Ordering::Relaxed), 2);
    }
}
