// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tailer-core: data model and primitives shared by every crate in the
//! log-tailing engine.

pub mod clock;
pub mod cursor;
pub mod error;
pub mod event;
pub mod file_info;
pub mod identity;
pub mod message;
pub mod publisher;
pub mod rfc3339;

pub use clock::{Clock, FakeClock, SystemClock};
pub use cursor::{CursorRecord, CursorUpdate};
pub use error::CoreError;
pub use event::FsEvent;
pub use file_info::{FileInfo, OsIdentity};
pub use identity::{Identifier, IdentifierKind, Source};
pub use message::{Message, TailEvent};
pub use publisher::{PublishError, Publisher};
