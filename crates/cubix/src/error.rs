//! # Client Error Types
//!
//! Every error distinguishes between "terminate the process" and "reset to a
//! safe, continuable state". Only startup failure and surface loss are fatal.

use cubix_core::{ConfigError, LifecycleError};
use thiserror::Error;

use crate::game_loop::LoopState;

/// Failures reported by the surface and texture collaborators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GfxError {
    /// A graphics allocation failed for lack of video memory.
    #[error("out of video memory")]
    OutOfVideoMemory,

    /// The window or rendering surface is gone and cannot be recreated.
    #[error("rendering surface lost: {0}")]
    SurfaceLost(String),

    /// Any other graphics failure.
    #[error("graphics error: {0}")]
    Other(String),
}

impl GfxError {
    /// Returns true if the client cannot continue.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::SurfaceLost(_))
    }
}

/// Top-level client error.
#[derive(Error, Debug)]
pub enum GameError {
    /// Invalid input rejected at the call site.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Component hooks failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Surface or texture failure.
    #[error(transparent)]
    Gfx(#[from] GfxError),

    /// Operation not allowed in the current loop state.
    #[error("invalid loop state: expected {expected:?}, was {actual:?}")]
    InvalidState {
        /// State the operation requires.
        expected: LoopState,
        /// State the game was in.
        actual: LoopState,
    },
}

impl GameError {
    /// Returns true if the process must terminate.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Lifecycle(err) => err.is_fatal(),
            Self::Gfx(err) => err.is_fatal(),
            Self::Config(_) | Self::InvalidState { .. } => false,
        }
    }
}

/// Result type for client operations.
pub type GameResult<T> = Result<T, GameError>;
