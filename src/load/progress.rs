//! Load progress shared between the loading task and any number of readers

use serde::Serialize;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    Reading,
    Done,
    Failed,
}

/// Full progress state, cloned out as one consistent value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub message: String,
    pub current: u64,
    pub total: u64,
    pub phase: Phase,
}

/// What the presentation layer polls for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub message: String,
    /// 0.0 to 100.0
    pub percent: f64,
    pub done: bool,
}

impl ProgressState {
    pub fn snapshot(&self) -> ProgressSnapshot {
        let percent = match self.phase {
            Phase::Done => 100.0,
            _ if self.total == 0 => 0.0,
            _ => (self.current as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0),
        };
        ProgressSnapshot {
            message: self.message.clone(),
            percent,
            done: self.phase == Phase::Done,
        }
    }
}

/// Single writer, many readers. `current` never moves backwards within one
/// load.
#[derive(Debug, Default)]
pub struct Progress {
    state: RwLock<ProgressState>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking writer leaves plain data behind; keep serving it
    fn read(&self) -> RwLockReadGuard<'_, ProgressState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProgressState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Reset for a new load of `total` bytes
    pub fn start(&self, message: impl Into<String>, total: u64) {
        let mut state = self.write();
        *state = ProgressState {
            message: message.into(),
            current: 0,
            total,
            phase: Phase::Reading,
        };
    }

    /// Report bytes consumed so far; smaller values than the last one are
    /// ignored
    pub fn advance(&self, current: u64) {
        let mut state = self.write();
        if current > state.current {
            state.current = current;
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.write().message = message.into();
    }

    /// Mark the load as published
    pub fn finish(&self, message: impl Into<String>) {
        let mut state = self.write();
        state.message = message.into();
        state.current = state.current.max(state.total);
        state.phase = Phase::Done;
    }

    /// Mark the load as failed. A failure before [`start`](Self::start)
    /// (the file could not be opened) also clears the previous load's byte
    /// counts.
    pub fn fail(&self, message: impl Into<String>) {
        let mut state = self.write();
        if state.phase != Phase::Reading {
            state.current = 0;
            state.total = 0;
        }
        state.message = message.into();
        state.phase = Phase::Failed;
    }

    pub fn is_reading(&self) -> bool {
        self.read().phase == Phase::Reading
    }

    pub fn state(&self) -> ProgressState {
        self.read().clone()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.read().snapshot()
    }
}
