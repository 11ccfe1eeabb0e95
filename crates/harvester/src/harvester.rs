// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single harvester's lifecycle: open, seek, read loop, decode, publish,
//! and the three closure conditions (spec §4.4 "Harvester").
//!
//! The EOF/inactivity/timeout closure monitors are folded into one
//! `tokio::select!` loop rather than run as separate sibling tasks: the
//! loop already wakes on every read and on cancellation, so a computed
//! "next deadline" sleep covers both the inactivity and hard-timeout cases
//! without a second task to coordinate shutdown with. The same deadline
//! also folds in an open multiline group's own timeout (spec §4.4 item 5);
//! waking for that one force-flushes the group and loops, it does not
//! close the harvester.

use crate::backoff::Backoff;
use crate::decode::DecodePipeline;
use crate::error::HarvesterError;
use std::sync::Arc;
use std::time::SystemTime;
use tailer_config::TailerConfig;
use tailer_core::{CursorUpdate, FileInfo, Publisher, Source, TailEvent};
use tailer_state::{ResourceHandle, StateStore};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct HarvesterHandle {
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl HarvesterHandle {
    /// Requests a graceful stop; the harvester flushes its decode pipeline
    /// and exits on its own.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// True once the harvester task has returned on its own (EOF-close,
    /// inactivity-close, hard-timeout-close, identity mismatch, any I/O
    /// error) — not just when `stop()` was called. The harvester group
    /// uses this to tell a stale registry entry from a live one.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) {
        if let Err(err) = self.task.await {
            warn!(error = %err, "harvester task panicked");
        }
    }
}

/// Spawns a harvester for `source`, holding `resource` for its lifetime
/// (the lock releases when the harvester exits, via `ResourceHandle`'s
/// `Drop`).
pub fn spawn(
    source: Source,
    resource: ResourceHandle,
    state: Arc<StateStore>,
    publisher: Arc<dyn Publisher>,
    config: Arc<TailerConfig>,
    cancel: CancellationToken,
) -> HarvesterHandle {
    let harvester_cancel = cancel.child_token();
    let task = tokio::spawn(run(source, resource, state, publisher, config, harvester_cancel.clone()));
    HarvesterHandle { cancel: harvester_cancel, task }
}

async fn run(
    source: Source,
    resource: ResourceHandle,
    state: Arc<StateStore>,
    publisher: Arc<dyn Publisher>,
    config: Arc<TailerConfig>,
    cancel: CancellationToken,
) {
    if let Err(err) = run_inner(&source, &resource, &state, publisher.as_ref(), &config, &cancel).await {
        warn!(path = %source.current_path.display(), error = %err, "harvester exiting with error");
    }
}

async fn run_inner(
    source: &Source,
    resource: &ResourceHandle,
    state: &Arc<StateStore>,
    publisher: &dyn Publisher,
    config: &TailerConfig,
    cancel: &CancellationToken,
) -> Result<(), HarvesterError> {
    let path = &source.current_path;
    let record = state
        .find_meta(resource.key())
        .ok_or_else(|| HarvesterError::MissingRecord { path: path.clone() })?;

    let metadata = tokio::fs::metadata(path).await.map_err(|source_err| HarvesterError::Io {
        path: path.clone(),
        source: source_err,
    })?;
    if !metadata.is_file() {
        return Err(HarvesterError::NotRegularFile { path: path.clone() });
    }
    let observed = FileInfo::from_metadata(&metadata).map_err(|source_err| HarvesterError::Io {
        path: path.clone(),
        source: source_err,
    })?;
    if observed.os_identity != record.cursor.os_identity {
        return Err(HarvesterError::IdentityMismatch {
            path: path.clone(),
            expected: record.cursor.os_identity,
            found: observed.os_identity,
        });
    }

    let mut file = File::open(path).await.map_err(|source_err| HarvesterError::Io {
        path: path.clone(),
        source: source_err,
    })?;

    let mut offset = record.cursor.offset;
    if metadata.len() < offset {
        info!(path = %path.display(), "file shrank before harvester start, reopening from 0");
        offset = 0;
        state.update_cursor(resource, 0)?;
    }
    file.seek(std::io::SeekFrom::Start(offset))
        .await
        .map_err(|source_err| HarvesterError::Io { path: path.clone(), source: source_err })?;

    let mut pipeline = DecodePipeline::new(config)?;

    let mut backoff = Backoff::new(config.reader.backoff.init, config.reader.backoff.max);
    let mut buf = vec![0u8; config.reader.buffer_size];
    let started_at = tokio::time::Instant::now();
    let mut last_activity = started_at;

    loop {
        let deadline = next_deadline(started_at, last_activity, config, &pipeline);

        tokio::select! {
            _ = cancel.cancelled() => {
                flush_remainder(&mut pipeline, source, &mut offset, resource, state, publisher).await?;
                debug!(path = %path.display(), "harvester cancelled");
                return Ok(());
            }
            _ = sleep_until_opt(deadline) => {
                if pipeline.multiline_timed_out(std::time::Instant::now()) {
                    let decoded = pipeline.flush(SystemTime::now());
                    publish_all(decoded, source, &mut offset, resource, state, publisher).await?;
                    debug!(path = %path.display(), "multiline group force-flushed on timeout");
                    continue;
                }
                flush_remainder(&mut pipeline, source, &mut offset, resource, state, publisher).await?;
                info!(path = %path.display(), "harvester closing on inactivity/timeout");
                return Ok(());
            }
            result = file.read(&mut buf) => {
                let n = result.map_err(|source_err| HarvesterError::Io { path: path.clone(), source: source_err })?;
                if n == 0 {
                    if config.close.reader.on_eof {
                        flush_remainder(&mut pipeline, source, &mut offset, resource, state, publisher).await?;
                        debug!(path = %path.display(), "harvester closing on eof");
                        return Ok(());
                    }
                    if let Some(new_offset) = detect_truncation(path, offset).await? {
                        file.seek(std::io::SeekFrom::Start(new_offset)).await.map_err(|source_err| {
                            HarvesterError::Io { path: path.clone(), source: source_err }
                        })?;
                        offset = new_offset;
                        state.update_cursor(resource, offset)?;
                        backoff.reset();
                        continue;
                    }
                    tokio::time::sleep(backoff.next()).await;
                    continue;
                }

                last_activity = tokio::time::Instant::now();
                backoff.reset();
                let now = SystemTime::now();
                let decoded = pipeline.feed(&buf[..n], now);
                publish_all(decoded, source, &mut offset, resource, state, publisher).await?;
            }
        }
    }
}

async fn detect_truncation(path: &std::path::Path, offset: u64) -> Result<Option<u64>, HarvesterError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source_err| HarvesterError::Io { path: path.to_path_buf(), source: source_err })?;
    if metadata.len() < offset {
        return Ok(Some(0));
    }
    Ok(None)
}

async fn sleep_until_opt(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

fn next_deadline(
    started_at: tokio::time::Instant,
    last_activity: tokio::time::Instant,
    config: &TailerConfig,
    pipeline: &DecodePipeline,
) -> Option<tokio::time::Instant> {
    let inactivity_deadline = config
        .close
        .on_state_change
        .inactive
        .then(|| last_activity + config.close.on_state_change.check_interval);
    let hard_deadline = config.close.reader.after_interval.map(|d| started_at + d);
    let multiline_deadline = pipeline.multiline_deadline().map(tokio::time::Instant::from_std);

    [inactivity_deadline, hard_deadline, multiline_deadline].into_iter().flatten().min()
}

async fn publish_all(
    decoded: Vec<crate::decode::Decoded>,
    source: &Source,
    offset: &mut u64,
    resource: &ResourceHandle,
    state: &Arc<StateStore>,
    publisher: &dyn Publisher,
) -> Result<(), HarvesterError> {
    for item in decoded {
        let new_offset = *offset + item.message.byte_length as u64;
        let event = TailEvent {
            timestamp: item.message.timestamp,
            path: source.current_path.clone(),
            offset_before: *offset,
            message: item.message.text(),
            fields: item.message.decoded_fields,
            doc_id: item.doc_id,
        };
        publisher
            .publish(event, CursorUpdate { new_offset })
            .await
            .map_err(|err| HarvesterError::Publish {
                path: source.current_path.clone(),
                message: err.to_string(),
            })?;
        state.update_cursor(resource, new_offset)?;
        *offset = new_offset;
    }
    Ok(())
}

async fn flush_remainder(
    pipeline: &mut DecodePipeline,
    source: &Source,
    offset: &mut u64,
    resource: &ResourceHandle,
    state: &Arc<StateStore>,
    publisher: &dyn Publisher,
) -> Result<(), HarvesterError> {
    let decoded = pipeline.flush(SystemTime::now());
    publish_all(decoded, source, offset, resource, state, publisher).await
}

#[cfg(test)]
#[path = "harvester_tests.rs"]
mod tests;
