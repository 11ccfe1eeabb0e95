// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The downstream collaborator every harvester publishes through (spec §3
//! "Publisher", §6 "Outputs").

use crate::cursor::CursorUpdate;
use crate::message::TailEvent;
use async_trait::async_trait;
use thiserror::Error;

/// Raised when a publish attempt fails. Harvesters treat this as
/// transient: the read position does not advance and the line is retried
/// on the next read-loop iteration (spec §4.4 "Publish contract").
#[derive(Debug, Error)]
#[error("publish failed: {message}")]
pub struct PublishError {
    pub message: String,
}

impl PublishError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Implemented by whatever forwards published events onward (a queue
/// client, a test recorder, ...). A harvester only advances its persisted
/// cursor once `publish` returns `Ok`.
#[async_trait]
pub trait Publisher: Send + Sync + 'static {
    async fn publish(&self, event: TailEvent, cursor: CursorUpdate) -> Result<(), PublishError>;
}
