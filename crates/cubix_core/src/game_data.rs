//! # Game Data
//!
//! The single shared mutable record of the client. It is an explicit context
//! object: the orchestrator owns it and lends `&mut GameData` to components,
//! scheduled tasks and the block gateway. Only the orchestration thread ever
//! touches it, so it carries no locks.

use std::time::Instant;

use cubix_shared::FpsLimitMethod;

use crate::config::ClientConfig;
use crate::view::ViewDistance;

/// Process-wide game state.
#[derive(Clone, Debug)]
pub struct GameData {
    width: i32,
    height: i32,
    time: f64,
    /// Chunks updated within the current second.
    pub chunk_updates: u32,
    /// Vertices submitted last frame.
    pub vertices: u32,
    /// When the current frame started.
    pub frame_start: Instant,
    /// View distance state.
    pub view: ViewDistance,
    fps_limit: FpsLimitMethod,

    /// Player name.
    pub username: String,
    /// Server verification key.
    pub mppass: String,

    /// Behave like the classic 0.30 client.
    pub classic_mode: bool,
    /// Allow hacks while in classic mode.
    pub classic_hacks: bool,
    /// Allow custom block definitions.
    pub allow_custom_blocks: bool,
    /// Protocol extensions enabled.
    pub use_cpe: bool,
    /// Server negotiated the custom blocks extension.
    pub use_cpe_blocks: bool,
    /// Allow servers to change textures.
    pub allow_server_textures: bool,
    /// Bob the camera while walking.
    pub view_bobbing: bool,
    /// Liquids can be broken and picked.
    pub breakable_liquids: bool,
    /// Use the simple arm animation.
    pub simple_arms_anim: bool,
    /// Take a screenshot at the end of this frame.
    pub screenshot_requested: bool,
    /// Hide the HUD.
    pub hide_gui: bool,
    /// The default texture pack could not be found.
    pub default_archive_missing: bool,
}

impl GameData {
    /// Builds game state from a configuration, clamping dimensions and view
    /// distances into range.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            width: config.width.max(1),
            height: config.height.max(1),
            time: 0.0,
            chunk_updates: 0,
            vertices: 0,
            frame_start: Instant::now(),
            view: ViewDistance::new(config.view_distance, config.max_view_distance),
            fps_limit: config.fps_limit,
            username: config.username.clone(),
            mppass: config.mppass.clone(),
            classic_mode: config.classic_mode,
            classic_hacks: config.classic_hacks,
            allow_custom_blocks: config.allow_custom_blocks,
            use_cpe: config.use_cpe,
            use_cpe_blocks: false,
            allow_server_textures: config.allow_server_textures,
            view_bobbing: config.view_bobbing,
            breakable_liquids: config.breakable_liquids,
            simple_arms_anim: config.simple_arms_anim,
            screenshot_requested: false,
            hide_gui: false,
            default_archive_missing: false,
        }
    }

    /// Window client area width, at least 1.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Window client area height, at least 1.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Records the window client area, clamping each side to at least 1.
    ///
    /// Returns true if either side changed.
    pub fn set_dimensions(&mut self, width: i32, height: i32) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        let changed = width != self.width || height != self.height;
        self.width = width;
        self.height = height;
        changed
    }

    /// Seconds accumulated since the loop started.
    #[inline]
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Advances game time by one frame.
    ///
    /// Negative or NaN deltas count as zero so time never goes backwards.
    /// Crossing a whole-second boundary resets `chunk_updates`. Returns the
    /// delta actually applied.
    pub fn advance_time(&mut self, delta: f64) -> f64 {
        let delta = delta.max(0.0);
        let before = self.time;
        self.time += delta;
        if self.time.floor() > before.floor() {
            self.chunk_updates = 0;
        }
        delta
    }

    /// Active frame pacing strategy.
    #[inline]
    #[must_use]
    pub const fn fps_limit(&self) -> FpsLimitMethod {
        self.fps_limit
    }

    /// Stores the frame pacing strategy. The game loop picks it up before
    /// the next frame is drawn.
    pub fn set_fps_limit(&mut self, method: FpsLimitMethod) {
        self.fps_limit = method;
    }

    /// Classic mode with no hacks allowed.
    #[inline]
    #[must_use]
    pub const fn pure_classic(&self) -> bool {
        self.classic_mode && !self.classic_hacks
    }

    /// Clears per-session transient state.
    pub fn clear_transient(&mut self) {
        self.chunk_updates = 0;
        self.vertices = 0;
        self.screenshot_requested = false;
        self.use_cpe_blocks = false;
    }
}

impl Default for GameData {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_classic_truth_table() {
        let mut game = GameData::default();
        for (mode, hacks, expected) in [
            (false, false, false),
            (false, true, false),
            (true, false, true),
            (true, true, false),
        ] {
            game.classic_mode = mode;
            game.classic_hacks = hacks;
            assert_eq!(game.pure_classic(), expected, "mode={mode} hacks={hacks}");
        }
    }

    #[test]
    fn test_dimensions_at_least_one() {
        let mut game = GameData::default();
        assert!(game.set_dimensions(0, -20));
        assert_eq!((game.width(), game.height()), (1, 1));
        assert!(!game.set_dimensions(1, 1));
    }

    #[test]
    fn test_chunk_updates_reset_on_second_boundary() {
        let mut game = GameData::default();
        game.chunk_updates = 5;
        game.advance_time(0.4);
        assert_eq!(game.chunk_updates, 5);
        game.advance_time(0.4);
        assert_eq!(game.chunk_updates, 5);
        game.advance_time(0.4);
        assert_eq!(game.chunk_updates, 0);
    }

    #[test]
    fn test_time_never_decreases() {
        let mut game = GameData::default();
        game.advance_time(1.5);
        assert_eq!(game.advance_time(-3.0), 0.0);
        assert_eq!(game.advance_time(f64::NAN), 0.0);
        assert!((game.time() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_config_clamps() {
        let config = ClientConfig {
            width: 0,
            view_distance: 1_000_000,
            max_view_distance: 2048,
            ..ClientConfig::default()
        };
        let game = GameData::from_config(&config);
        assert_eq!(game.width(), 1);
        assert_eq!(game.view.current(), 2048);
    }
}
