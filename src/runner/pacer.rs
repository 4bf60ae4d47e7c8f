//! Wall-clock pacing for the simulation loops.
//!
//! Drivers never sleep directly; they ask a [`Pacer`], so tests can run any
//! number of ticks without real delay.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{oneshot, watch};
use tracing::debug;

use crate::error::{Error, Result};

/// How a pause ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    Elapsed,
    Interrupted,
}

pub trait Pacer {
    fn now(&self) -> DateTime<Local>;

    /// Time since the pacer was created.
    fn elapsed(&self) -> Duration;

    fn pause(&mut self, duration: Duration) -> Pause;
}

/// Sleeps the thread; only process termination can stop it.
#[derive(Debug)]
pub struct BlockingPacer {
    started: Instant,
}

impl BlockingPacer {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for BlockingPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for BlockingPacer {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn pause(&mut self, duration: Duration) -> Pause {
        std::thread::sleep(duration);
        Pause::Elapsed
    }
}

/// Sleeps until the interval passes or Ctrl-C arrives.
///
/// The listener is registered on construction and stays armed between pauses,
/// so an interrupt delivered mid-tick ends the next pause immediately.
pub struct InterruptiblePacer {
    runtime: Runtime,
    interrupted: watch::Receiver<bool>,
    started: Instant,
}

impl InterruptiblePacer {
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::io("building signal runtime", e))?;

        let (tx, rx) = watch::channel(false);
        let (installed_tx, installed_rx) = oneshot::channel();
        runtime.spawn(async move {
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            // the first poll registers the handler
            let early = tokio::select! {
                biased;
                res = &mut ctrl_c => Some(res),
                _ = std::future::ready(()) => None,
            };
            let _ = installed_tx.send(());
            let res = match early {
                Some(res) => res,
                None => ctrl_c.await,
            };
            if res.is_ok() {
                let _ = tx.send(true);
            }
        });
        runtime
            .block_on(installed_rx)
            .map_err(|_| Error::Runtime {
                message: "interrupt listener exited before it was installed".into(),
            })?;

        Ok(Self {
            runtime,
            interrupted: rx,
            started: Instant::now(),
        })
    }
}

impl Pacer for InterruptiblePacer {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn pause(&mut self, duration: Duration) -> Pause {
        let rx = &mut self.interrupted;
        self.runtime.block_on(async {
            if *rx.borrow() {
                return Pause::Interrupted;
            }
            tokio::select! {
                _ = tokio::time::sleep(duration) => Pause::Elapsed,
                changed = rx.changed() => {
                    if changed.is_ok() && *rx.borrow() {
                        debug!("interrupt received during pause");
                        Pause::Interrupted
                    } else {
                        // listener gone; fall back to a plain sleep
                        tokio::time::sleep(duration).await;
                        Pause::Elapsed
                    }
                }
            }
        })
    }
}
