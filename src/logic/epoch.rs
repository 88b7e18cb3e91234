// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Edge-triggered reset signal handling.

use serde::Serialize;

/// Changes exactly once per reset; the host keys its file input on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EpochToken(u64);

impl EpochToken {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Waiting for a rising edge (`Armed`) or a falling edge (`Released`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResetState {
    #[default]
    Armed,
    Released,
}

/// What observing the signal level did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetTransition {
    /// No edge.
    Steady,
    /// Rising edge: the caller must clear state. Carries the new token.
    Fired(EpochToken),
    /// Falling edge: no data change.
    Rearmed,
}

#[derive(Clone, Debug, Default)]
pub struct ResetController {
    state: ResetState,
    token: EpochToken,
}

impl ResetController {
    pub fn state(&self) -> ResetState {
        self.state
    }

    pub fn token(&self) -> EpochToken {
        self.token
    }

    /// Sample the host's reset level once per update cycle.
    pub fn observe(&mut self, signal: bool) -> ResetTransition {
        match (self.state, signal) {
            (ResetState::Armed, true) => {
                self.state = ResetState::Released;
                self.token = self.token.next();
                ResetTransition::Fired(self.token)
            }
            (ResetState::Released, false) => {
                self.state = ResetState::Armed;
                ResetTransition::Rearmed
            }
            _ => ResetTransition::Steady,
        }
    }
}
