//! # Collaborator Boundary
//!
//! The narrow interfaces the orchestrator consumes. World storage, the
//! network peer, physics, the window surface, texture upload and UI screens
//! live behind these traits and are swappable leaves.
//!
//! All methods are called from the orchestration thread. A collaborator
//! doing work on other threads hands results back through an
//! [`EventSender`].

use cubix_core::GameData;
use cubix_shared::{BlockId, BlockPos, ChunkCoord};

use crate::error::GfxError;
use crate::events::EventSender;
use crate::textures::{Bitmap, TextureId};

/// Block storage for the loaded world.
pub trait WorldStorage {
    /// Returns true if `pos` is inside the loaded world.
    fn contains(&self, pos: BlockPos) -> bool;

    /// Reads a block. Positions outside the world read as air.
    fn get_block(&self, pos: BlockPos) -> BlockId;

    /// Writes a block. Only called for positions inside the world.
    fn set_block(&mut self, pos: BlockPos, block: BlockId);

    /// Recomputes lighting around a changed block.
    fn recalculate_lighting(&mut self, pos: BlockPos, old: BlockId, new: BlockId);

    /// Flags a chunk for redraw.
    fn mark_chunk_dirty(&mut self, chunk: ChunkCoord);

    /// Updates chunk loading for a new view distance.
    fn apply_view_distance(&mut self, distance: i32) {
        let _ = distance;
    }

    /// Drops every block (disconnect, new map).
    fn reset(&mut self);
}

/// The multiplayer connection.
pub trait NetworkPeer {
    /// Tells the server a block changed locally.
    fn notify_block_change(&mut self, pos: BlockPos, block: BlockId);
}

/// Local simulation for single-player worlds.
pub trait PhysicsSim {
    /// Runs physics triggered by a local block change.
    fn trigger_local_physics(&mut self, pos: BlockPos, old: BlockId, new: BlockId);
}

/// Window and presentation.
pub trait Surface {
    /// Creates the window.
    ///
    /// # Errors
    ///
    /// Returns [`GfxError`] if no surface can be created.
    fn create(&mut self, title: &str, width: i32, height: i32) -> Result<(), GfxError>;

    /// Destroys the window.
    fn destroy(&mut self);

    /// Returns false once the window has been closed or destroyed.
    fn exists(&self) -> bool;

    /// Current client area size.
    fn client_size(&self) -> (i32, i32);

    /// Pumps pending window and input messages onto the event bus.
    fn poll_events(&mut self, events: &EventSender);

    /// Turns presentation-side vsync on or off.
    fn set_vsync(&mut self, enabled: bool);

    /// Switches between windowed and fullscreen.
    ///
    /// # Errors
    ///
    /// Returns [`GfxError`] if the mode switch failed.
    fn toggle_fullscreen(&mut self) -> Result<(), GfxError>;

    /// Draws one frame from the current game state.
    ///
    /// # Errors
    ///
    /// [`GfxError::OutOfVideoMemory`] makes the caller reduce the view
    /// distance. [`GfxError::SurfaceLost`] is fatal.
    fn render_frame(&mut self, game: &GameData, delta: f64) -> Result<(), GfxError>;

    /// Presents the drawn frame. Blocks on vsync when it is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`GfxError::SurfaceLost`] if the surface went away.
    fn present(&mut self) -> Result<(), GfxError>;

    /// Captures the last presented frame and returns where it was saved.
    ///
    /// # Errors
    ///
    /// Returns [`GfxError`] if the capture failed.
    fn take_screenshot(&mut self) -> Result<String, GfxError>;
}

/// Creates and frees GPU textures.
pub trait TextureUploader {
    /// Largest texture side supported.
    fn max_size(&self) -> u32;

    /// Uploads a validated bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`GfxError::OutOfVideoMemory`] when the allocation failed.
    fn upload(&mut self, bitmap: &Bitmap) -> Result<TextureId, GfxError>;

    /// Frees a texture.
    fn delete(&mut self, texture: TextureId);
}

/// User-visible screens.
pub trait Ui {
    /// Shows the disconnect screen.
    fn show_disconnect(&mut self, title: &str, reason: &str);

    /// Shows a short notice over the game.
    fn show_notice(&mut self, message: &str);
}

/// Where local block changes go after being applied.
pub enum Session {
    /// Connected to a server.
    Multiplayer(Box<dyn NetworkPeer>),
    /// Local world with its own physics.
    Singleplayer(Box<dyn PhysicsSim>),
}

impl Session {
    /// Returns true when connected to a server.
    #[inline]
    #[must_use]
    pub const fn is_multiplayer(&self) -> bool {
        matches!(self, Self::Multiplayer(_))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Multiplayer(_) => "Multiplayer",
            Self::Singleplayer(_) => "Singleplayer",
        })
    }
}

/// Every collaborator the orchestrator drives.
pub struct Collaborators {
    /// Block storage.
    pub world: Box<dyn WorldStorage>,
    /// Network peer or local physics.
    pub session: Session,
    /// Window and presentation.
    pub surface: Box<dyn Surface>,
    /// GPU texture allocation.
    pub textures: Box<dyn TextureUploader>,
    /// User-visible screens.
    pub ui: Box<dyn Ui>,
}
