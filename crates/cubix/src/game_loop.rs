//! # Frame Orchestrator
//!
//! Owns the game state, the collaborators and the main loop.
//!
//! ```text
//! Uninitialized ──startup──> Running ──should_close──> Closing ──> Terminated
//!       │                                                             ^
//!       └──────────────── surface or init failure ───────────────────┘
//! ```
//!
//! Frame N:
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │ 1. TIME        advance GameData.time, reset chunk_updates on a    │
//! │                whole second                                       │
//! │ 2. SCHEDULER   fire due tasks                                     │
//! │ 3. EVENTS      pump the surface, drain the event bus, then push   │
//! │                fps limit and view distance changes outward        │
//! │ 4. RENDER      draw and present (out of VRAM -> reduce distance)  │
//! │ 5. SCREENSHOT  capture if requested, clear the flag               │
//! │ 6. PACE        sleep out the fps budget (vsync: nothing here)     │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use cubix_core::{
    ClientConfig, ComponentId, ComponentRegistry, ConfigResult, GameComponent, GameData,
    Scheduler, TaskHandle, TaskTick,
};
use cubix_shared::{BlockId, BlockPos, FpsLimitMethod, GameVersion};
use tracing::{debug, error, info, warn};

use crate::blocks::{self, BlockGateway};
use crate::collaborators::Collaborators;
use crate::error::{GameError, GameResult, GfxError};
use crate::events::{ClientEvent, EventBus, EventSender};
use crate::pacing::{FramePacer, FrameStats, FrameStatsAccumulator};
use crate::textures::{self, Bitmap, TextureId};

/// Notice shown once the view distance cannot shrink any further.
pub const OUT_OF_VRAM_NOTICE: &str = "Out of video memory! View distance is already at its minimum.";

/// Title of the screen shown when startup fails.
const STARTUP_FAILED_TITLE: &str = "Failed to start";

/// Where the orchestrator is in its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Created, nothing started.
    Uninitialized,
    /// Surface up, components initialized, frames running.
    Running,
    /// Tearing down.
    Closing,
    /// Everything released.
    Terminated,
}

/// The frame orchestrator.
pub struct Game {
    data: GameData,
    title: String,
    version: &'static GameVersion,
    state: LoopState,
    components: ComponentRegistry,
    scheduler: Scheduler,
    collab: Collaborators,
    events: EventBus,
    sender: EventSender,
    pacer: FramePacer,
    applied_view: Option<i32>,
    stats: FrameStatsAccumulator,
    frame: u64,
    quit_requested: bool,
}

impl Game {
    /// Creates a game from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Config`] if the configuration is invalid or
    /// names an unknown protocol version.
    pub fn new(config: &ClientConfig, collab: Collaborators) -> GameResult<Self> {
        config.validate()?;
        let version = config.load_version()?;
        let data = GameData::from_config(config);
        let events = EventBus::default();
        let sender = events.sender();

        Ok(Self {
            pacer: FramePacer::new(data.fps_limit()),
            applied_view: None,
            data,
            title: config.title.clone(),
            version,
            state: LoopState::Uninitialized,
            components: ComponentRegistry::new(),
            scheduler: Scheduler::new(),
            collab,
            events,
            sender,
            stats: FrameStatsAccumulator::new(),
            frame: 0,
            quit_requested: false,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Shared game state.
    #[inline]
    #[must_use]
    pub const fn data(&self) -> &GameData {
        &self.data
    }

    /// Mutable game state.
    #[inline]
    pub fn data_mut(&mut self) -> &mut GameData {
        &mut self.data
    }

    /// Current loop state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// The protocol version in use.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> &'static GameVersion {
        self.version
    }

    /// Frames run so far.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Frame timing statistics.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }

    /// A sender for handing work back to the main loop from any thread.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a lifecycle component.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] once startup has begun.
    pub fn add_component<C>(&mut self, component: C) -> GameResult<ComponentId>
    where
        C: GameComponent + 'static,
    {
        self.expect_state(LoopState::Uninitialized)?;
        Ok(self.components.register(component))
    }

    /// Registers a periodic task.
    ///
    /// # Errors
    ///
    /// Returns [`cubix_core::ConfigError`] for a non-positive interval or a
    /// full task table.
    pub fn add_scheduled_task<F>(&mut self, interval: f64, callback: F) -> ConfigResult<TaskHandle>
    where
        F: FnMut(&TaskTick, &mut GameData) + 'static,
    {
        self.scheduler.add(interval, callback)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Creates the surface and initializes every component.
    ///
    /// On failure the surface is released, the disconnect screen shows the
    /// reason and the game ends up `Terminated`. Free hooks do not run.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Gfx`] if no surface could be created and
    /// [`GameError::Lifecycle`] if any init hook failed.
    pub fn startup(&mut self) -> GameResult<()> {
        self.expect_state(LoopState::Uninitialized)?;

        if let Err(err) = self
            .collab
            .surface
            .create(&self.title, self.data.width(), self.data.height())
        {
            error!(error = %err, "failed to create surface");
            self.state = LoopState::Terminated;
            return Err(err.into());
        }
        self.update_dimensions();
        self.collab
            .surface
            .set_vsync(self.data.fps_limit().uses_vsync());
        self.apply_view_distance();

        if let Err(err) = self.components.run_init(&mut self.data) {
            error!(error = %err, "startup aborted");
            self.collab
                .ui
                .show_disconnect(STARTUP_FAILED_TITLE, &err.to_string());
            self.collab.surface.destroy();
            self.state = LoopState::Terminated;
            return Err(err.into());
        }
        self.sync_derived_state();

        info!(
            version = self.version.name,
            protocol = self.version.protocol,
            components = self.components.len(),
            tasks = self.scheduler.len(),
            "game started"
        );
        self.state = LoopState::Running;
        Ok(())
    }

    /// Runs until the game should close.
    ///
    /// # Errors
    ///
    /// See [`Game::run_with_limit`].
    pub fn run(&mut self) -> GameResult<()> {
        self.run_with_limit(None)
    }

    /// Runs at most `max_frames` frames, or until the game should close,
    /// then shuts down.
    ///
    /// Starts the game first if needed. Non-fatal frame errors are logged
    /// and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns startup errors, the first fatal frame error, or a free-phase
    /// failure.
    pub fn run_with_limit(&mut self, max_frames: Option<u64>) -> GameResult<()> {
        if self.state == LoopState::Uninitialized {
            self.startup()?;
        }
        self.expect_state(LoopState::Running)?;

        let mut frames = 0;
        let mut last = Instant::now();
        let result = loop {
            if self.should_close() || max_frames.is_some_and(|max| frames >= max) {
                break Ok(());
            }
            let now = Instant::now();
            let delta = now.duration_since(last).as_secs_f64();
            last = now;

            match self.run_frame(delta) {
                Ok(()) => {}
                Err(err) if err.is_fatal() => break Err(err),
                Err(err) => warn!(error = %err, "frame error"),
            }
            frames += 1;
        };

        let shutdown = self.shutdown();
        result.and(shutdown)
    }

    /// Runs a single frame with the given elapsed time in seconds.
    ///
    /// Fps limit and view distance changes made directly on [`GameData`],
    /// by hooks, tasks or between frames, reach the pacer, the surface and
    /// the world before anything is drawn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] unless running, and
    /// [`GameError::Gfx`] when the surface is lost.
    pub fn run_frame(&mut self, delta: f64) -> GameResult<()> {
        self.expect_state(LoopState::Running)?;
        self.sync_derived_state();

        let frame_start = Instant::now();
        self.data.frame_start = frame_start;
        let delta = self.data.advance_time(delta);
        let tasks_fired = self.scheduler.tick(delta, &mut self.data);

        self.collab.surface.poll_events(&self.sender);
        let events = self.events.drain();
        let events_processed = u32::try_from(events.len()).unwrap_or(u32::MAX);
        for event in events {
            self.handle_event(event);
        }
        if !self.collab.surface.exists() {
            self.quit_requested = true;
        }
        self.sync_derived_state();

        let render_start = Instant::now();
        let drawn = self
            .collab
            .surface
            .render_frame(&self.data, delta)
            .and_then(|()| self.collab.surface.present());
        match drawn {
            Ok(()) => {}
            Err(GfxError::OutOfVideoMemory) => {
                self.reduce_vram();
            }
            Err(err) if err.is_fatal() => {
                error!(error = %err, "surface lost");
                self.quit_requested = true;
                return Err(err.into());
            }
            Err(err) => warn!(error = %err, "frame not drawn"),
        }
        let render_us = elapsed_us(render_start);

        if self.data.screenshot_requested {
            match self.collab.surface.take_screenshot() {
                Ok(path) => info!(%path, "screenshot saved"),
                Err(err) => warn!(error = %err, "screenshot failed"),
            }
            self.data.screenshot_requested = false;
        }

        let work_us = elapsed_us(frame_start);
        let paced = self.pacer.pace(frame_start);
        self.stats.record(
            FrameStats {
                frame: self.frame,
                work_us,
                render_us,
                paced_us: u64::try_from(paced.as_micros()).unwrap_or(u64::MAX),
                events_processed,
                tasks_fired: u32::try_from(tasks_fired).unwrap_or(u32::MAX),
            },
            self.pacer.budget(),
        );
        self.frame += 1;
        Ok(())
    }

    /// Returns true once the loop should stop.
    #[must_use]
    pub fn should_close(&self) -> bool {
        self.quit_requested
            || self.state != LoopState::Running
            || !self.collab.surface.exists()
    }

    /// Asks the loop to stop after the current frame.
    pub fn request_quit(&mut self) {
        if !self.quit_requested {
            info!("quit requested");
        }
        self.quit_requested = true;
    }

    /// Runs every free hook and releases the surface.
    ///
    /// Does nothing when already terminated. A game that never started
    /// terminates without running free hooks.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Lifecycle`] if a free hook failed. Teardown
    /// completes regardless.
    pub fn shutdown(&mut self) -> GameResult<()> {
        match self.state {
            LoopState::Terminated => return Ok(()),
            LoopState::Uninitialized => {
                self.state = LoopState::Terminated;
                return Ok(());
            }
            LoopState::Running | LoopState::Closing => {}
        }

        self.state = LoopState::Closing;
        info!(frames = self.frame, "shutting down");
        let freed = self.components.run_free(&mut self.data);
        self.collab.surface.destroy();
        self.stats.log_summary();
        self.state = LoopState::Terminated;
        freed.map_err(Into::into)
    }

    // =========================================================================
    // Window
    // =========================================================================

    /// Re-reads the window client area into the game state.
    pub fn update_dimensions(&mut self) {
        let (width, height) = self.collab.surface.client_size();
        if self.data.set_dimensions(width, height) {
            debug!(
                width = self.data.width(),
                height = self.data.height(),
                "dimensions updated"
            );
        }
    }

    /// Switches between windowed and fullscreen.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Gfx`] if the surface refused.
    pub fn toggle_fullscreen(&mut self) -> GameResult<()> {
        self.collab.surface.toggle_fullscreen()?;
        self.update_dimensions();
        Ok(())
    }

    /// Changes the frame pacing strategy.
    pub fn set_fps_limit(&mut self, method: FpsLimitMethod) {
        self.data.set_fps_limit(method);
        self.sync_fps_limit();
    }

    /// Makes the pacer and vsync follow the stored strategy.
    fn sync_fps_limit(&mut self) {
        let method = self.data.fps_limit();
        if self.pacer.method() == method {
            return;
        }
        self.pacer.set_method(method);
        self.collab.surface.set_vsync(method.uses_vsync());
        info!(%method, "fps limit changed");
    }

    /// Changes the frame pacing strategy by display name.
    ///
    /// # Errors
    ///
    /// Returns [`cubix_core::ConfigError::InvalidFpsLimit`] for unknown names.
    pub fn set_fps_limit_by_name(&mut self, name: &str) -> ConfigResult<()> {
        let method = name.parse::<FpsLimitMethod>()?;
        self.set_fps_limit(method);
        Ok(())
    }

    /// Changes the frame pacing strategy by index.
    ///
    /// # Errors
    ///
    /// Returns [`cubix_core::ConfigError::InvalidFpsLimit`] for out of range
    /// indices.
    pub fn set_fps_limit_by_index(&mut self, index: u8) -> ConfigResult<()> {
        let method = FpsLimitMethod::try_from(index)?;
        self.set_fps_limit(method);
        Ok(())
    }

    // =========================================================================
    // View distance
    // =========================================================================

    /// Applies a view distance, clamped into `[MIN_VIEW_DISTANCE, max]`.
    pub fn set_view_distance(&mut self, distance: i32) {
        self.data.view.set(distance);
        self.sync_view_distance();
    }

    /// Applies a view distance and records it as the player's preference.
    pub fn user_set_view_distance(&mut self, distance: i32) {
        self.data.view.user_set(distance);
        self.sync_view_distance();
    }

    /// Changes the upper bound for the view distance.
    pub fn set_max_view_distance(&mut self, max: i32) {
        self.data.view.set_max(max);
        self.sync_view_distance();
    }

    /// Moves the player's preference to the next preset step.
    pub fn cycle_view_distance(&mut self, reverse: bool) {
        let next = self.data.view.next_step(reverse);
        self.user_set_view_distance(next);
    }

    /// Goes back to the player's preferred distance.
    pub fn restore_view_distance(&mut self) {
        if self.data.view.restore() {
            info!(distance = self.data.view.current(), "view distance restored");
        }
        self.sync_view_distance();
    }

    /// Halves the view distance to free video memory.
    ///
    /// Returns false once the distance is at its floor; the player is told
    /// that memory pressure cannot be relieved further.
    pub fn reduce_vram(&mut self) -> bool {
        if !self.data.view.reduce_for_vram() {
            warn!("out of video memory at minimum view distance");
            self.collab.ui.show_notice(OUT_OF_VRAM_NOTICE);
            return false;
        }
        warn!(
            distance = self.data.view.current(),
            "out of video memory, halving view distance"
        );
        self.apply_view_distance();
        true
    }

    /// Tells the world about the current distance if it has not seen it.
    fn sync_view_distance(&mut self) {
        if self.applied_view != Some(self.data.view.current()) {
            self.apply_view_distance();
        }
    }

    fn apply_view_distance(&mut self) {
        let distance = self.data.view.current();
        self.collab.world.apply_view_distance(distance);
        self.applied_view = Some(distance);
        debug!(distance, "view distance applied");
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Applies a block locally only.
    ///
    /// # Errors
    ///
    /// Returns [`cubix_core::ConfigError::OutOfBounds`] outside the world.
    pub fn update_block(&mut self, pos: impl Into<BlockPos>, block: BlockId) -> ConfigResult<()> {
        self.gateway().update_block(pos.into(), block).map(|_| ())
    }

    /// Applies a block locally, then notifies the peer or runs physics.
    ///
    /// # Errors
    ///
    /// Returns [`cubix_core::ConfigError::OutOfBounds`] outside the world.
    pub fn change_block(&mut self, pos: impl Into<BlockPos>, block: BlockId) -> ConfigResult<()> {
        self.gateway().change_block(pos.into(), block)
    }

    /// Returns true if the player may target `block`.
    #[must_use]
    pub fn can_pick(&self, block: BlockId) -> bool {
        blocks::can_pick(block, &self.data)
    }

    fn gateway(&mut self) -> BlockGateway<'_> {
        BlockGateway::new(
            &mut *self.collab.world,
            &mut self.collab.session,
            &mut self.data,
        )
    }

    // =========================================================================
    // Maps and sessions
    // =========================================================================

    /// A new map began loading: drops the world and per-world state.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Lifecycle`] if a hook failed. All hooks ran.
    pub fn begin_new_map(&mut self) -> GameResult<()> {
        info!("loading new map");
        self.collab.world.reset();
        self.components.run_on_new_map(&mut self.data)?;
        Ok(())
    }

    /// The new map finished loading.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Lifecycle`] if a hook failed. All hooks ran.
    pub fn finish_new_map(&mut self) -> GameResult<()> {
        self.apply_view_distance();
        self.components.run_on_new_map_loaded(&mut self.data)?;
        info!("map loaded");
        Ok(())
    }

    /// Shows the disconnect screen, then resets to a pre-game state.
    ///
    /// # Errors
    ///
    /// See [`Game::reset`].
    pub fn disconnect(&mut self, title: &str, reason: &str) -> GameResult<()> {
        info!(title, reason, "disconnected");
        self.collab.ui.show_disconnect(title, reason);
        self.reset()
    }

    /// Clears the world, every component and transient game state without
    /// restarting.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Lifecycle`] if a reset hook failed. All hooks ran
    /// and the state is cleared regardless.
    pub fn reset(&mut self) -> GameResult<()> {
        self.collab.world.reset();
        let result = self.components.run_reset(&mut self.data);
        self.data.clear_transient();
        debug!("game reset");
        result.map_err(Into::into)
    }

    // =========================================================================
    // Textures
    // =========================================================================

    /// Returns true if `bitmap` can be uploaded, logging why not otherwise.
    #[must_use]
    pub fn validate_bitmap(&self, file: &str, bitmap: &Bitmap) -> bool {
        match textures::validate_bitmap(bitmap, self.collab.textures.max_size()) {
            Ok(()) => true,
            Err(err) => {
                warn!(file, reason = %err, "unusable texture");
                false
            }
        }
    }

    /// Replaces the texture in `slot` with `bitmap`.
    ///
    /// Returns false, leaving `slot` untouched, for an unusable bitmap.
    /// Otherwise the old texture is freed before uploading. When an upload
    /// runs out of video memory the view distance is reduced and the upload
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns [`GfxError::OutOfVideoMemory`] once the view distance cannot
    /// shrink further, or any other upload error as is. The old texture is
    /// already freed and `slot` is empty on every error.
    pub fn update_texture(
        &mut self,
        slot: &mut Option<TextureId>,
        file: &str,
        bitmap: &Bitmap,
    ) -> GameResult<bool> {
        if !self.validate_bitmap(file, bitmap) {
            return Ok(false);
        }
        if let Some(old) = slot.take() {
            self.collab.textures.delete(old);
        }

        loop {
            match self.collab.textures.upload(bitmap) {
                Ok(texture) => {
                    debug!(file, ?texture, "texture uploaded");
                    *slot = Some(texture);
                    return Ok(true);
                }
                Err(GfxError::OutOfVideoMemory) => {
                    if !self.reduce_vram() {
                        return Err(GfxError::OutOfVideoMemory.into());
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn sync_derived_state(&mut self) {
        self.sync_fps_limit();
        self.sync_view_distance();
    }

    fn handle_event(&mut self, event: ClientEvent) {
        let result = match event {
            ClientEvent::Resized => {
                self.update_dimensions();
                Ok(())
            }
            ClientEvent::CloseRequested | ClientEvent::Quit => {
                self.request_quit();
                Ok(())
            }
            ClientEvent::ScreenshotRequested => {
                self.data.screenshot_requested = true;
                Ok(())
            }
            ClientEvent::SetFpsLimit(method) => {
                self.set_fps_limit(method);
                Ok(())
            }
            ClientEvent::BlockReceived { x, y, z, block } => self
                .update_block((x, y, z), block)
                .map_err(GameError::from),
            ClientEvent::MapLoading => self.begin_new_map(),
            ClientEvent::MapLoaded => self.finish_new_map(),
            ClientEvent::Disconnected { title, reason } => self.disconnect(&title, &reason),
        };
        if let Err(err) = result {
            warn!(error = %err, "event not fully applied");
        }
    }

    fn expect_state(&self, expected: LoopState) -> GameResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(GameError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("frame", &self.frame)
            .field("version", &self.version.name)
            .field("components", &self.components.len())
            .field("tasks", &self.scheduler.len())
            .field("session", &self.collab.session)
            .finish_non_exhaustive()
    }
}

fn elapsed_us(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_micros()).unwrap_or(u64::MAX)
}
