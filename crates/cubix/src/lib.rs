//! # Cubix
//!
//! The client crate: binds the orchestration kernel to its collaborators.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                              Game                                │
//! │                                                                  │
//! │  GameData ── Scheduler ── ComponentRegistry ── FramePacer        │
//! │      │                                                           │
//! │      ├── BlockGateway ──> WorldStorage ──> NetworkPeer / Physics │
//! │      ├── Surface (window, present, vsync, screenshots)           │
//! │      ├── TextureUploader (VRAM pressure -> view distance)        │
//! │      └── Ui (disconnect screen, notices)                         │
//! │                                                                  │
//! │  EventBus <──── other threads (network, window, input)           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `game_loop`: the frame orchestrator and its state machine
//! - `blocks`: local-only vs. local-plus-notify block mutation
//! - `collaborators`: the traits the orchestrator consumes
//! - `events`: cross-thread hand-off into the main loop
//! - `pacing`: fps limiting and frame statistics
//! - `textures`: bitmap validation
//! - `headless`: in-memory collaborators

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod blocks;
pub mod collaborators;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod headless;
pub mod pacing;
pub mod textures;

pub use cubix_core as core;
pub use cubix_shared as shared;

pub use blocks::{can_pick, BlockGateway};
pub use collaborators::{
    Collaborators, NetworkPeer, PhysicsSim, Session, Surface, TextureUploader, Ui, WorldStorage,
};
pub use error::{GameError, GameResult, GfxError};
pub use events::{ClientEvent, EventBus, EventSender};
pub use game_loop::{Game, LoopState, OUT_OF_VRAM_NOTICE};
pub use pacing::{FramePacer, FrameStats, FrameStatsAccumulator};
pub use textures::{validate_bitmap, Bitmap, BitmapError, TextureId};
