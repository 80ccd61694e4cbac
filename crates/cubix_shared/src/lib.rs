//! # Cubix Shared
//!
//! Common types used by the orchestration core and by every collaborator
//! subsystem (world, network, renderer, UI).
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `cubix_core` or `cubix`
//! - Any window, GPU or socket crate
//!
//! If you need collaborator types, put them in `cubix`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod block;
pub mod constants;
pub mod fps;
pub mod version;

pub use block::{BlockId, BlockKind, BlockPos, ChunkCoord};
pub use constants::{
    CHUNK_SHIFT, CHUNK_SIZE, DEFAULT_MAX_VIEWDIST, DEFAULT_VIEW_DISTANCE, MAX_SCHEDULED_TASKS,
    MIN_VIEW_DISTANCE, VIEW_DISTANCE_STEPS, VRAM_VIEW_DISTANCE_FLOOR,
};
pub use fps::{FpsLimitMethod, ParseFpsLimitError};
pub use version::{GameVersion, VersionId};
