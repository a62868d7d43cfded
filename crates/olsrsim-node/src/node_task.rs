//! Async shell around the per-node protocol engine.
//!
//! All protocol rules live in [`NodeEngine`]; this task only supplies
//! the tick cadence, the channels, and the log sinks.

use std::io;
use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};

use olsrsim_core::Message;
use olsrsim_protocol::{NodeEngine, TickOutput};

use crate::sinks::NodeSinks;

/// Drives one [`NodeEngine`] at the tick cadence until cancelled.
pub struct NodeTask {
    engine: NodeEngine,
    sinks: NodeSinks,
    inbound: mpsc::Receiver<Message>,
    outbound: mpsc::Sender<Message>,
    tick_duration: Duration,
    shutdown: watch::Receiver<bool>,
}

impl NodeTask {
    pub fn new(
        engine: NodeEngine,
        sinks: NodeSinks,
        inbound: mpsc::Receiver<Message>,
        outbound: mpsc::Sender<Message>,
        tick_duration: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            engine,
            sinks,
            inbound,
            outbound,
            tick_duration,
            shutdown,
        }
    }

    /// Run until the shutdown signal fires.
    ///
    /// A failed log write is fatal to this node only: the task reports
    /// it and exits, leaving the rest of the simulation running.
    pub async fn run(mut self) {
        if let Err(e) = self.tick_loop().await {
            tracing::error!(node = %self.engine.id(), "node task aborted: {e}");
        }
        let _ = self.sinks.flush();
    }

    async fn tick_loop(&mut self) -> io::Result<()> {
        let mut ticker = tokio::time::interval(self.tick_duration);

        loop {
            ticker.tick().await;
            if *self.shutdown.borrow() {
                tracing::info!(node = %self.engine.id(), "node stopping");
                return Ok(());
            }

            // At most one pending message per tick; emitters also run at
            // the tick cadence, so the inbox drains cooperatively.
            let inbound = match self.inbound.try_recv() {
                Ok(msg) => {
                    self.sinks.log_input(&msg)?;
                    tracing::info!(node = %self.engine.id(), "received: {msg}");
                    Some(msg)
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
            };

            let TickOutput { sent, delivered } = self.engine.step(inbound);

            for payload in delivered {
                self.sinks.log_received(&payload)?;
                tracing::info!(node = %self.engine.id(), "delivered: {payload}");
            }
            for msg in sent {
                self.sinks.log_output(&msg)?;
                tracing::info!(node = %self.engine.id(), "sent: {msg}");
                if self.outbound.send(msg).await.is_err() {
                    // The router is gone; nothing left to talk to.
                    return Ok(());
                }
            }
        }
    }
}
