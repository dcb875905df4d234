//! Unified error type for the ledmirror-lib crate.
//!
//! [`LedMirrorError`] wraps the module-specific errors (`LeaderError`,
//! `GroupError`). `From` impls allow `?` to propagate across module
//! boundaries seamlessly.

use std::fmt;

use crate::follower::GroupError;
use crate::leader::LeaderError;

/// Unified error type for ledmirror-lib operations.
#[derive(Debug)]
pub enum LedMirrorError {
    /// Leader device error (control path open, registration).
    Leader(LeaderError),
    /// Follower group error (capacity, attribute open).
    Group(GroupError),
}

impl fmt::Display for LedMirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedMirrorError::Leader(e) => write!(f, "{e}"),
            LedMirrorError::Group(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for LedMirrorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedMirrorError::Leader(e) => Some(e),
            LedMirrorError::Group(e) => Some(e),
        }
    }
}

impl From<LeaderError> for LedMirrorError {
    fn from(e: LeaderError) -> Self {
        LedMirrorError::Leader(e)
    }
}

impl From<GroupError> for LedMirrorError {
    fn from(e: GroupError) -> Self {
        LedMirrorError::Group(e)
    }
}

/// Crate-level Result alias using [`LedMirrorError`].
pub type Result<T> = std::result::Result<T, LedMirrorError>;
