// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only write-ahead log backing the state store. One JSON object per
//! line; `open` replays the file to rebuild in-memory state and rotates any
//! trailing corruption out of the way rather than refusing to start.

use crate::record::StateRecord;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tailer_core::identity::IdentityKey;
use thiserror::Error;

const FLUSH_THRESHOLD: usize = 100;
const MAX_BACKUPS: u8 = 3;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("i/o error on wal: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WalOp {
    Put { key: IdentityKey, record: StateRecord },
    Remove { key: IdentityKey },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalEntry {
    pub seq: u64,
    pub op: WalOp,
}

/// Append-only log of [`WalOp`]s, one JSON line per entry.
pub struct Wal {
    file: File,
    path: PathBuf,
    write_seq: u64,
    unflushed: usize,
}

impl Wal {
    /// Open (creating if absent) and replay the log, rotating any trailing
    /// corrupt bytes into a `.bak` file so a damaged tail never blocks
    /// startup.
    pub fn open(path: &Path) -> Result<(Self, Vec<WalEntry>), WalError> {
        let (entries, trailing_garbage) = read_valid_entries(path)?;
        if trailing_garbage {
            rotate_backups(path)?;
            rewrite_clean(path, &entries)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);
        Ok((
            Self {
                file,
                path: path.to_path_buf(),
                write_seq,
                unflushed: 0,
            },
            entries,
        ))
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one operation, returning its sequence number. Does not flush;
    /// callers decide the flush cadence (see [`Wal::needs_flush`]).
    pub fn append(&mut self, op: WalOp) -> Result<u64, WalError> {
        self.write_seq += 1;
        let entry = WalEntry {
            seq: self.write_seq,
            op,
        };
        let line = serde_json::to_string(&entry).map_err(io::Error::other)?;
        writeln!(self.file, "{line}")?;
        self.unflushed += 1;
        Ok(entry.seq)
    }

    pub fn needs_flush(&self) -> bool {
        self.unflushed >= FLUSH_THRESHOLD
    }

    pub fn flush(&mut self) -> Result<(), WalError> {
        self.file.flush()?;
        self.unflushed = 0;
        Ok(())
    }
}

/// Reads every syntactically valid line as a [`WalEntry`], stopping at the
/// first line that fails to parse (or isn't valid UTF-8). Returns the valid
/// prefix plus whether anything was discarded after it.
fn read_valid_entries(path: &Path) -> Result<(Vec<WalEntry>, bool), WalError> {
    if !path.exists() {
        return Ok((Vec::new(), false));
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for raw_line in reader.split(b'\n') {
        let raw_line = raw_line?;
        if raw_line.is_empty() {
            continue;
        }
        let Ok(line) = std::str::from_utf8(&raw_line) else {
            return Ok((entries, true));
        };
        match serde_json::from_str::<WalEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(_) => return Ok((entries, true)),
        }
    }
    Ok((entries, false))
}

fn rotate_backups(path: &Path) -> io::Result<()> {
    for generation in (1..MAX_BACKUPS).rev() {
        let src = backup_path(path, generation);
        let dst = backup_path(path, generation + 1);
        if src.exists() {
            fs::rename(&src, &dst)?;
        }
    }
    fs::rename(path, backup_path(path, 1))
}

fn backup_path(path: &Path, generation: u8) -> PathBuf {
    if generation <= 1 {
        path.with_extension("bak")
    } else {
        path.with_extension(format!("bak.{generation}"))
    }
}

fn rewrite_clean(path: &Path, entries: &[WalEntry]) -> io::Result<()> {
    let mut file = File::create(path)?;
    for entry in entries {
        let line = serde_json::to_string(entry).map_err(io::Error::other)?;
        writeln!(file, "{line}")?;
    }
    file.flush()
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
