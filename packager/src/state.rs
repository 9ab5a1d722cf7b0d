//! Lifecycle of a single validate or package run.
//!
//! A run starts in [`PackageState::Idle`] and moves forward only:
//!
//! ```text
//! Idle -> Validating -> Valid -> Archiving -> Done
//!                    \-> Invalid -> Failed
//! ```
//!
//! Any non-terminal state may also move to [`PackageState::Failed`] when an
//! I/O error ends the run.

use log::debug;
use std::fmt;
use thiserror::Error;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageState {
    /// Nothing has happened yet.
    Idle,
    /// The manifest is being read, parsed, and checked.
    Validating,
    /// Validation found no problems.
    Valid,
    /// Validation found structural or schema problems.
    Invalid,
    /// The archive is being written.
    Archiving,
    /// The archive is in place.
    Done,
    /// The run ended without an archive.
    Failed,
}

impl PackageState {
    /// Return true for states that admit no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Return true when moving from `self` to `next` is permitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillpack_packager::state::PackageState;
    ///
    /// assert!(PackageState::Valid.can_transition_to(PackageState::Archiving));
    /// assert!(!PackageState::Invalid.can_transition_to(PackageState::Archiving));
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Idle, Self::Validating)
            | (Self::Validating, Self::Valid | Self::Invalid)
            | (Self::Valid, Self::Archiving)
            | (Self::Archiving, Self::Done) => true,
            (current, Self::Failed) => !current.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for PackageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Archiving => "archiving",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A transition the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move from {from} to {to}")]
pub struct TransitionError {
    /// State the run was in.
    pub from: PackageState,
    /// State that was requested.
    pub to: PackageState,
}

/// Tracks the state of one run and rejects illegal transitions.
#[derive(Debug, Clone)]
pub struct PackageRun {
    skill: String,
    state: PackageState,
}

impl PackageRun {
    /// Start tracking a run for the named skill directory.
    #[must_use]
    pub fn new(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            state: PackageState::Idle,
        }
    }

    /// Return the current state.
    #[must_use]
    pub const fn state(&self) -> PackageState {
        self.state
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] and leaves the state unchanged when the
    /// move is not permitted.
    pub fn advance(&mut self, next: PackageState) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(next) {
            return Err(TransitionError {
                from: self.state,
                to: next,
            });
        }
        debug!("{}: {} -> {}", self.skill, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Record that the run ended without an archive.
    ///
    /// Calling this on a finished run has no effect.
    pub fn fail(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        debug!("{}: {} -> {}", self.skill, self.state, PackageState::Failed);
        self.state = PackageState::Failed;
    }
}
