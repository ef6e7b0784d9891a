// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::{Mutex, PoisonError};

use crate::poolstate::PoolState;

#[derive(Debug, Default)]
struct Protected {
    state: PoolState,
    valid: bool,
}

/// The process-wide snapshot behind a mutex.
///
/// Lock scope is a single `get` or `set`; there are no multi-step
/// transactions, so no await ever happens under the lock.
#[derive(Debug, Default)]
pub struct PoolStateStore {
    protected: Mutex<Protected>,
}

impl PoolStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out the current snapshot; `valid` is false until the first
    /// `set` after boot.
    pub fn get(&self) -> (PoolState, bool) {
        let guard = self.protected.lock().unwrap_or_else(PoisonError::into_inner);
        (guard.state.clone(), guard.valid)
    }

    /// Replaces the snapshot and marks it valid.
    pub fn set(&self, state: &PoolState) {
        let mut guard = self.protected.lock().unwrap_or_else(PoisonError::into_inner);
        guard.valid = true;
        guard.state.clone_from(state);
    }
}
