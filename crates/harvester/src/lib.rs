// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tailer-harvester: the per-file harvester — incremental reads, the
//! decoding pipeline, and the publish/ACK contract (spec §4.4).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod backoff;
pub mod decode;
pub mod error;
pub mod harvester;

pub use backoff::Backoff;
pub use decode::{Decoded, DecodePipeline};
pub use error::HarvesterError;
pub use harvester::{spawn, HarvesterHandle};
