//! Best-solution sinks.
//!
//! A sink owns the best assignment found so far and accepts candidates
//! under a strict-improvement gate: a candidate is kept only when its score
//! is strictly below the stored best. The gate and the store sit behind one
//! mutex, so concurrent rollouts can share a sink by reference without a
//! worse solution ever overwriting a better one.
//!
//! # Key Components
//!
//! - **Trait**: [`SolutionSink`] — gate, store, read-back
//! - **Stores**: [`MemorySink`] (in-process), [`FileSink`] (persisted as
//!   whitespace-separated machine ids)

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

use crate::model::MachineId;

/// Failure to persist an accepted solution. The in-memory best is left
/// untouched when this is returned, so a later retry can succeed.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the solution file failed.
    #[error("failed to write solution file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Shared store for the best solution found so far.
///
/// `Send + Sync` so one sink can be passed by reference to concurrent
/// rollouts.
pub trait SolutionSink: Send + Sync {
    /// Offers a candidate. Returns `Ok(true)` when it strictly improved the
    /// stored best and was kept, `Ok(false)` when the gate rejected it.
    fn write_solution(&self, assignment: &[MachineId], score: u64) -> Result<bool, SinkError>;

    /// Best score seen so far; `u64::MAX` when empty.
    fn best_score(&self) -> u64;

    /// Best assignment seen so far.
    fn best_solution(&self) -> Option<Vec<MachineId>>;
}

#[derive(Debug)]
struct SinkState {
    best_score: u64,
    best: Option<Vec<MachineId>>,
}

impl Default for SinkState {
    fn default() -> Self {
        Self {
            best_score: u64::MAX,
            best: None,
        }
    }
}

/// In-process sink with no persistence.
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<SinkState>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SolutionSink for MemorySink {
    fn write_solution(&self, assignment: &[MachineId], score: u64) -> Result<bool, SinkError> {
        let mut state = self.state.lock();
        if score >= state.best_score {
            return Ok(false);
        }
        state.best_score = score;
        state.best = Some(assignment.to_vec());
        Ok(true)
    }

    fn best_score(&self) -> u64 {
        self.state.lock().best_score
    }

    fn best_solution(&self) -> Option<Vec<MachineId>> {
        self.state.lock().best.clone()
    }
}

/// Sink that persists each accepted solution by rewriting one file with
/// the whitespace-separated machine id of every process, in process order.
///
/// The file is only touched by candidates that pass the gate, and the
/// in-memory best is only advanced after the file write succeeds.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    state: Mutex<SinkState>,
}

impl FileSink {
    /// Creates a sink writing to `path`. The file is created on the first
    /// accepted solution, not here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(SinkState::default()),
        }
    }

    /// Target path of the solution file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(assignment: &[MachineId]) -> String {
        let mut out = String::new();
        for (i, machine) in assignment.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // Writing to a String cannot fail.
            let _ = write!(out, "{machine}");
        }
        out.push('\n');
        out
    }
}

impl SolutionSink for FileSink {
    fn write_solution(&self, assignment: &[MachineId], score: u64) -> Result<bool, SinkError> {
        let mut state = self.state.lock();
        if score >= state.best_score {
            return Ok(false);
        }
        fs::write(&self.path, Self::render(assignment)).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })?;
        state.best_score = score;
        state.best = Some(assignment.to_vec());
        Ok(true)
    }

    fn best_score(&self) -> u64 {
        self.state.lock().best_score
    }

    fn best_solution(&self) -> Option<Vec<MachineId>> {
        self.state.lock().best.clone()
    }
}
