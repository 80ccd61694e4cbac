//! # Cubix Core
//!
//! The orchestration kernel of the client:
//!
//! - [`GameData`]: the single shared mutable record, passed explicitly
//! - [`ComponentRegistry`]: startup / teardown / reset / map-change hooks
//! - [`Scheduler`]: periodic work driven by accumulated frame time
//! - [`ClientConfig`]: startup configuration loaded from TOML
//!
//! ## Threading
//!
//! Everything in here runs on the one orchestration thread. Nothing is
//! `Send`-bound and nothing takes a lock. Collaborators running elsewhere
//! hand their results back through a queue drained once per frame.
//!
//! ## Example
//!
//! ```rust
//! use cubix_core::{GameData, Scheduler};
//!
//! let mut game = GameData::default();
//! let mut scheduler = Scheduler::new();
//! scheduler.add(0.05, |_, game| game.vertices = 0).unwrap();
//! scheduler.tick(1.0 / 60.0, &mut game);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod component;
pub mod config;
pub mod error;
pub mod game_data;
pub mod scheduler;
pub mod view;

pub use component::{ComponentId, ComponentRegistry, GameComponent, HookResult};
pub use config::ClientConfig;
pub use error::{ComponentError, ConfigError, ConfigResult, HookFailure, LifecycleError, Phase};
pub use game_data::GameData;
pub use scheduler::{ScheduledTask, Scheduler, TaskCallback, TaskHandle, TaskTick};
pub use view::ViewDistance;
