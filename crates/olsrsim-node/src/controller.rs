//! The controller fabric.
//!
//! Owns the topology oracle, one task per node, the router task, and the
//! run lifetime. The controller is the stand-in for the wireless medium:
//! a real ad-hoc network has no central broker, the simulation needs one
//! to apply the time-indexed link states.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use olsrsim_core::{Message, NetworkTopology, NodeId, Tick};
use olsrsim_protocol::NodeEngine;

use crate::config::NodeConfig;
use crate::error::SimError;
use crate::node_task::NodeTask;
use crate::sinks::NodeSinks;

/// Capacity of the shared outbound channel and of each per-node inbox.
const CHANNEL_CAPACITY: usize = 1024;

/// Cancels a running simulation early.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<watch::Sender<bool>>);

impl ShutdownHandle {
    /// Signal every task to stop at its next tick boundary. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.0.send(true);
    }
}

/// Owns all nodes and links and delivers transmissions over links that
/// are currently up.
pub struct Controller {
    topology: Arc<NetworkTopology>,
    tick_duration: Duration,
    nodes: Vec<NodeTask>,
    inboxes: Vec<(NodeId, mpsc::Sender<Message>)>,
    shared_tx: mpsc::Sender<Message>,
    shared_rx: mpsc::Receiver<Message>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Controller {
    /// Construct one node per config, each with a dedicated inbound
    /// channel, all publishing into the shared outbound channel. Log
    /// sinks are created under `log_dir`.
    pub fn initialize(
        topology: NetworkTopology,
        configs: Vec<NodeConfig>,
        tick_duration: Duration,
        log_dir: &Path,
    ) -> Result<Self, SimError> {
        let (shared_tx, shared_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut nodes = Vec::with_capacity(configs.len());
        let mut inboxes = Vec::with_capacity(configs.len());
        for config in configs {
            let (in_tx, in_rx) = mpsc::channel(CHANNEL_CAPACITY);
            let sinks = NodeSinks::create_in(log_dir, config.id)?;
            let engine = NodeEngine::new(config.id, Some(config.message));
            nodes.push(NodeTask::new(
                engine,
                sinks,
                in_rx,
                shared_tx.clone(),
                tick_duration,
                shutdown_rx.clone(),
            ));
            inboxes.push((config.id, in_tx));
        }

        Ok(Self {
            topology: Arc::new(topology),
            tick_duration,
            nodes,
            inboxes,
            shared_tx,
            shared_rx,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        })
    }

    /// A handle that cancels the run early (e.g. from a SIGINT handler).
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown_tx))
    }

    /// Start every node and the router, then stop everything after
    /// `total_ticks` tick intervals (or on an early shutdown signal).
    pub async fn run(self, total_ticks: Tick) {
        let Self {
            topology,
            tick_duration,
            nodes,
            inboxes,
            shared_tx,
            shared_rx,
            shutdown_tx,
            shutdown_rx,
        } = self;

        let epoch = Instant::now();

        let node_count = nodes.len();
        let mut node_handles: Vec<JoinHandle<()>> = Vec::with_capacity(node_count);
        for node in nodes {
            node_handles.push(tokio::spawn(node.run()));
        }
        // The router must see the channel close once all nodes exit.
        drop(shared_tx);

        let router = tokio::spawn(route(
            shared_rx,
            Arc::clone(&topology),
            inboxes,
            epoch,
            tick_duration,
            shutdown_rx.clone(),
        ));
        tracing::info!(nodes = node_count, "simulation started");

        let mut shutdown_watch = shutdown_rx;
        tokio::select! {
            _ = tokio::time::sleep(tick_duration.saturating_mul(total_ticks as u32)) => {
                tracing::info!("run complete after {total_ticks} ticks");
                let _ = shutdown_tx.send(true);
            }
            _ = shutdown_watch.changed() => {
                tracing::info!("early shutdown requested");
            }
        }

        for handle in node_handles {
            let _ = handle.await;
        }
        let _ = router.await;
        tracing::info!("simulation stopped");
    }
}

/// The router task: dequeues from the shared channel and dispatches
/// each transmission in its own helper, so one slow inbox never stalls
/// the medium. After shutdown it drains and discards what remains, so
/// no node blocks on a full shared channel while exiting.
async fn route(
    mut shared_rx: mpsc::Receiver<Message>,
    topology: Arc<NetworkTopology>,
    inboxes: Vec<(NodeId, mpsc::Sender<Message>)>,
    epoch: Instant,
    tick_duration: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => break,

            msg = shared_rx.recv() => {
                let Some(msg) = msg else { return };
                let tick = current_tick(epoch, tick_duration);
                tokio::spawn(deliver(
                    msg,
                    Arc::clone(&topology),
                    inboxes.clone(),
                    tick,
                ));
            }
        }
    }

    // Drain and discard what remains, so no node blocks on a full
    // shared channel while exiting.
    while shared_rx.recv().await.is_some() {}
    tracing::debug!("router drained and stopped");
}

/// The tick the router stamps on a dispatch: elapsed wall time over the
/// tick duration, by integer division.
fn current_tick(epoch: Instant, tick_duration: Duration) -> Tick {
    (epoch.elapsed().as_nanos() / tick_duration.as_nanos().max(1)) as Tick
}

/// Deliver one transmission to every reachable recipient.
///
/// Broadcast variants fan out to each node other than the transmitter
/// whose inbound link is up at this tick; DATA goes only to its next
/// hop, and silently dies if that link is down. A closed inbox means
/// the recipient already stopped.
async fn deliver(
    msg: Message,
    topology: Arc<NetworkTopology>,
    inboxes: Vec<(NodeId, mpsc::Sender<Message>)>,
    tick: Tick,
) {
    match &msg {
        Message::Hello(_) | Message::Tc(_) => {
            let from = msg.transmitter();
            for (recipient, tx) in &inboxes {
                if *recipient == from {
                    continue;
                }
                if topology.is_up(from, *recipient, tick) {
                    let _ = tx.send(msg.clone()).await;
                }
            }
        }
        Message::Data(data) => {
            if !topology.is_up(data.from_neighbor, data.next_hop, tick) {
                tracing::debug!(tick, "link down, dropping: {msg}");
                return;
            }
            if let Some((_, tx)) = inboxes.iter().find(|(id, _)| *id == data.next_hop) {
                let _ = tx.send(msg.clone()).await;
            }
        }
    }
}
