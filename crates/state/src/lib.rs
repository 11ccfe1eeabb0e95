// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tailer-state: the keyed, TTL-aware, WAL-backed state store (spec §4.6).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod error;
pub mod record;
pub mod store;
pub mod wal;

pub use error::StateError;
pub use record::StateRecord;
pub use store::{ResourceHandle, StateStore};
pub use wal::{Wal, WalEntry, WalError, WalOp};
