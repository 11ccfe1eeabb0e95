// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `taild`: minimal entry point running the engine against a config file.
//! A real deployment supplies its own [`Publisher`]; this binary ships a
//! logging one so the engine is runnable standalone.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tailer_config::TailerConfig;
use tailer_core::{CursorUpdate, PublishError, Publisher, TailEvent};
use tailer_engine::{init_tracing, TailEngine};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "taild", about = "Continuous log-tailing daemon")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "tailer.toml")]
    config: PathBuf,

    /// Path to the state store's durable journal.
    #[arg(long, default_value = "tailer.state")]
    state: PathBuf,
}

struct LoggingPublisher;

#[async_trait::async_trait]
impl Publisher for LoggingPublisher {
    async fn publish(&self, event: TailEvent, _cursor: CursorUpdate) -> Result<(), PublishError> {
        info!(path = %event.path.display(), offset = event.offset_before, message = %event.message, "tailed line");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = TailerConfig::load(&args.config).context("loading configuration")?;
    let engine = TailEngine::new(config, &args.state, Arc::new(LoggingPublisher)).context("starting engine")?;

    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        cancel.cancel();
    });

    engine.run().await.context("engine run loop exited with an error")?;
    Ok(())
}
