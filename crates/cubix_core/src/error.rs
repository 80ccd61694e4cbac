//! # Core Error Types
//!
//! Two families of errors leave the kernel:
//!
//! - [`ConfigError`]: a caller passed something invalid. Rejected at the call
//!   site, never coerced (view distance and dimension clamping are the only
//!   documented exceptions).
//! - [`LifecycleError`]: one or more component hooks failed during a phase.

use std::fmt;

use cubix_shared::ParseFpsLimitError;
use thiserror::Error;

/// Invalid input rejected synchronously.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Scheduled task interval was zero, negative or not finite.
    #[error("invalid scheduled task interval: {0} (must be > 0 seconds)")]
    InvalidInterval(f64),

    /// FPS limit method name or index was not one of the known methods.
    #[error("invalid fps limit method: {0}")]
    InvalidFpsLimit(String),

    /// Block coordinates outside the loaded world.
    #[error("block coordinates ({x}, {y}, {z}) are outside the loaded world")]
    OutOfBounds {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Z coordinate.
        z: i32,
    },

    /// The scheduled task table is full.
    #[error("scheduled task table full: capacity {capacity}")]
    SchedulerFull {
        /// Table capacity.
        capacity: usize,
    },

    /// Configured protocol version is not in the version table.
    #[error("unknown protocol version: {0}")]
    UnknownProtocolVersion(u8),

    /// Config file could not be read.
    #[error("failed to read config {path}: {message}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// Config file could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ParseFpsLimitError> for ConfigError {
    fn from(err: ParseFpsLimitError) -> Self {
        Self::InvalidFpsLimit(err.0)
    }
}

/// Failure reported by a single component hook.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ComponentError {
    /// What went wrong.
    pub message: String,
}

impl ComponentError {
    /// Creates a component error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Lifecycle phase dispatched by the component registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Startup, before the main loop.
    Init,
    /// Shutdown.
    Free,
    /// Disconnect or reconnect.
    Reset,
    /// A new map started loading.
    NewMap,
    /// A new map finished loading.
    NewMapLoaded,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "init",
            Self::Free => "free",
            Self::Reset => "reset",
            Self::NewMap => "new map",
            Self::NewMapLoaded => "new map loaded",
        })
    }
}

/// A hook failure tagged with the component that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    /// Name of the failing component.
    pub component: &'static str,
    /// The error it returned.
    pub error: ComponentError,
}

impl fmt::Display for HookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.component, self.error)
    }
}

/// One or more hooks of a lifecycle phase failed.
///
/// Every hook of the phase has still been run when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// Init failed. Startup must be aborted.
    #[error("component init failed: {}", join(.failures))]
    InitFailed {
        /// Failures in dispatch order.
        failures: Vec<HookFailure>,
    },

    /// A non-init phase failed. The caller may log and continue.
    #[error("component {phase} failed: {}", join(.failures))]
    PhaseFailed {
        /// Phase that failed.
        phase: Phase,
        /// Failures in dispatch order.
        failures: Vec<HookFailure>,
    },
}

impl LifecycleError {
    /// Returns true if this error must terminate the process.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InitFailed { .. })
    }

    /// Returns the individual hook failures.
    #[must_use]
    pub fn failures(&self) -> &[HookFailure] {
        match self {
            Self::InitFailed { failures } | Self::PhaseFailed { failures, .. } => failures,
        }
    }
}

fn join(failures: &[HookFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for configuration-checked operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
