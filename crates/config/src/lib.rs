// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tailer-config: configuration schema, defaults, and loading (spec §6
//! Inputs, SPEC_FULL §4.7).

pub mod ignore_older;
pub mod load;
pub mod schema;

pub use ignore_older::is_ignored_older;
pub use load::{ConfigError, TailerConfig};
pub use schema::*;
