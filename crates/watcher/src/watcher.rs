// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The watcher's public surface: `run(cancel)` drives scans on a fixed
//! interval into an unbounded channel; `next_event()` dequeues them (spec
//! §4.1 Operations).

use crate::scanner::{Scanner, ScannerConfig};
use std::time::Duration;
use tailer_core::FsEvent;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct Watcher {
    receiver: mpsc::UnboundedReceiver<FsEvent>,
}

impl Watcher {
    /// Spawns the scan loop as a background task and returns a handle whose
    /// `next_event` drains it. `run` itself is the loop body — exposed
    /// separately so callers needing the raw future (e.g. for structured
    /// concurrency in tests) can drive it themselves instead of spawning.
    pub fn spawn(config: ScannerConfig, check_interval: Duration, cancel: CancellationToken) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run(config, check_interval, cancel, sender));
        Self { receiver }
    }

    /// Blocking dequeue of the next event. Returns `None` once the watcher
    /// has shut down and every buffered event has been drained.
    pub async fn next_event(&mut self) -> Option<FsEvent> {
        self.receiver.recv().await
    }
}

/// The scan loop body: ticks every `check_interval`, pushing synthesized
/// events into `sender`, until `cancel` fires — at which point it pushes
/// `FsEvent::Done` and returns.
pub async fn run(
    config: ScannerConfig,
    check_interval: Duration,
    cancel: CancellationToken,
    sender: mpsc::UnboundedSender<FsEvent>,
) {
    let mut scanner = Scanner::new(config);
    let mut ticker = tokio::time::interval(check_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match scanner.scan_once() {
                    Ok(events) => {
                        for event in events {
                            if sender.send(event).is_err() {
                                return;
                            }
                        }
                    }
                    Err(err) => error!(error = %err, "scan tick failed, will retry next interval"),
                }
            }
        }
    }

    info!("watcher cancelled, draining");
    let _ = sender.send(FsEvent::Done);
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
