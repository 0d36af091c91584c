//! Periodic refresh of server-backed views.
//!
//! Each poller is a task ticking on a `tokio::time::interval` until its
//! shutdown channel flips or the message channel closes. Failures are
//! reported as [`Message::PollFailed`] and the next tick retries.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use shakedeck_client::user_message;
use shakedeck_core::prelude::*;

use super::{PollKind, SharedGateway, TaskRegistry};
use crate::message::Message;

/// Lower bound for any polling interval.
pub const POLL_MIN_MS: u64 = 500;

#[derive(Debug)]
pub(crate) struct Poller {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Poller {
    fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        self.handle.abort();
    }
}

/// Start `kind`, replacing any poller of the same kind. The first tick is
/// one interval from now; callers load data immediately themselves.
pub(crate) fn start<G: SharedGateway>(
    kind: PollKind,
    interval: Duration,
    gateway: G,
    msg_tx: mpsc::Sender<Message>,
    registry: &mut TaskRegistry,
) {
    stop(&kind, registry);

    let period = interval.max(Duration::from_millis(POLL_MIN_MS));
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    debug!("Starting {:?} poller every {}ms", kind, period.as_millis());

    let poll_kind = kind.clone();
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let msg = poll_once(&poll_kind, &gateway).await;
                    if msg_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        trace!("{:?} poller finished", poll_kind);
    });

    registry.pollers.insert(kind, Poller { shutdown_tx, handle });
}

async fn poll_once<G: SharedGateway>(kind: &PollKind, gateway: &G) -> Message {
    let result = match kind {
        PollKind::TaskList => gateway
            .list_tasks()
            .await
            .map(|tasks| Message::TasksLoaded { tasks }),
        PollKind::Statistics => gateway
            .statistics()
            .await
            .map(|statistics| Message::StatisticsLoaded { statistics }),
        PollKind::RealtimeStatus(task_id) => {
            gateway
                .realtime_status(task_id)
                .await
                .map(|status| Message::RealtimeStatusLoaded {
                    task_id: task_id.clone(),
                    status,
                })
        }
    };
    result.unwrap_or_else(|e| Message::PollFailed {
        kind: kind.clone(),
        message: user_message(&e),
    })
}

pub(crate) fn stop(kind: &PollKind, registry: &mut TaskRegistry) {
    if let Some(poller) = registry.pollers.remove(kind) {
        debug!("Stopping {:?} poller", kind);
        poller.stop();
    }
}

pub(crate) fn stop_all(registry: &mut TaskRegistry) {
    for (_, poller) in registry.pollers.drain() {
        poller.stop();
    }
}
