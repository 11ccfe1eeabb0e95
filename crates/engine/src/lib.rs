// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tailer-engine: top-level orchestration, the `Publisher` downstream
//! contract, and the `taild` binary entry point.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod engine;
pub mod error;
pub mod logging;

pub use engine::TailEngine;
pub use error::EngineError;
pub use logging::init_tracing;

pub use tailer_core::{CursorUpdate, PublishError, Publisher, TailEvent};
