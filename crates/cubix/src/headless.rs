//! # Headless Collaborators
//!
//! In-memory stand-ins for every collaborator. They let the full lifecycle
//! run without a window or GPU (the `cubix_client` binary, smoke tests).

use std::collections::HashSet;

use cubix_core::GameData;
use cubix_shared::{block::ids, BlockId, BlockPos, ChunkCoord};
use tracing::{debug, info, warn};

use crate::collaborators::{Collaborators, PhysicsSim, Session, Surface, TextureUploader, Ui, WorldStorage};
use crate::error::GfxError;
use crate::events::EventSender;
use crate::textures::{Bitmap, TextureId};

// =============================================================================
// World
// =============================================================================

/// Fixed-size block array.
#[derive(Clone, Debug)]
pub struct MemoryWorld {
    width: i32,
    height: i32,
    length: i32,
    blocks: Vec<BlockId>,
    dirty: HashSet<ChunkCoord>,
    view_distance: i32,
}

impl MemoryWorld {
    /// Creates an all-air world. Non-positive sizes give an empty world.
    #[must_use]
    pub fn new(width: i32, height: i32, length: i32) -> Self {
        let (width, height, length) = (width.max(0), height.max(0), length.max(0));
        let volume = [width, height, length]
            .iter()
            .map(|side| usize::try_from(*side).unwrap_or(0))
            .product();
        Self {
            width,
            height,
            length,
            blocks: vec![ids::AIR; volume],
            dirty: HashSet::new(),
            view_distance: 0,
        }
    }

    /// Chunks flagged for redraw and not yet taken.
    #[must_use]
    pub fn dirty_chunks(&self) -> &HashSet<ChunkCoord> {
        &self.dirty
    }

    /// Takes every flagged chunk.
    pub fn take_dirty(&mut self) -> HashSet<ChunkCoord> {
        std::mem::take(&mut self.dirty)
    }

    /// Last applied view distance.
    #[must_use]
    pub const fn view_distance(&self) -> i32 {
        self.view_distance
    }

    fn index(&self, pos: BlockPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some(linear_index(pos, self.width, self.length))
    }
}

/// Y-major offset of an in-bounds position, computed in `usize`.
fn linear_index(pos: BlockPos, width: i32, length: i32) -> usize {
    let [x, y, z, width, length] =
        [pos.x, pos.y, pos.z, width, length].map(|v| usize::try_from(v).unwrap_or(0));
    (y * length + z) * width + x
}

impl WorldStorage for MemoryWorld {
    fn contains(&self, pos: BlockPos) -> bool {
        (0..self.width).contains(&pos.x)
            && (0..self.height).contains(&pos.y)
            && (0..self.length).contains(&pos.z)
    }

    fn get_block(&self, pos: BlockPos) -> BlockId {
        self.index(pos)
            .and_then(|i| self.blocks.get(i).copied())
            .unwrap_or(ids::AIR)
    }

    fn set_block(&mut self, pos: BlockPos, block: BlockId) {
        if let Some(slot) = self.index(pos).and_then(|i| self.blocks.get_mut(i)) {
            *slot = block;
        }
    }

    fn recalculate_lighting(&mut self, _pos: BlockPos, _old: BlockId, _new: BlockId) {}

    fn mark_chunk_dirty(&mut self, chunk: ChunkCoord) {
        self.dirty.insert(chunk);
    }

    fn apply_view_distance(&mut self, distance: i32) {
        self.view_distance = distance;
    }

    fn reset(&mut self) {
        self.blocks.fill(ids::AIR);
        self.dirty.clear();
    }
}

// =============================================================================
// Surface
// =============================================================================

/// A window that is never shown.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    alive: bool,
    width: i32,
    height: i32,
    vsync: bool,
    fullscreen: bool,
    frames_presented: u64,
    screenshots: u32,
}

impl HeadlessSurface {
    /// Creates a surface reporting the given client area.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            alive: false,
            width,
            height,
            vsync: false,
            fullscreen: false,
            frames_presented: 0,
            screenshots: 0,
        }
    }

    /// Frames presented so far.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for HeadlessSurface {
    fn create(&mut self, title: &str, width: i32, height: i32) -> Result<(), GfxError> {
        info!(title, width, height, "headless surface created");
        self.alive = true;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn destroy(&mut self) {
        self.alive = false;
    }

    fn exists(&self) -> bool {
        self.alive
    }

    fn client_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn poll_events(&mut self, _events: &EventSender) {}

    fn set_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
    }

    fn toggle_fullscreen(&mut self) -> Result<(), GfxError> {
        self.fullscreen = !self.fullscreen;
        Ok(())
    }

    fn render_frame(&mut self, _game: &GameData, _delta: f64) -> Result<(), GfxError> {
        if self.alive {
            Ok(())
        } else {
            Err(GfxError::SurfaceLost("headless surface destroyed".into()))
        }
    }

    fn present(&mut self) -> Result<(), GfxError> {
        self.frames_presented += 1;
        Ok(())
    }

    fn take_screenshot(&mut self) -> Result<String, GfxError> {
        self.screenshots += 1;
        Ok(format!("screenshot_{}.png", self.screenshots))
    }
}

// =============================================================================
// Textures, UI, physics
// =============================================================================

/// Hands out texture ids without allocating anything.
#[derive(Clone, Debug)]
pub struct NullTextures {
    max_size: u32,
    next: u32,
    live: HashSet<TextureId>,
}

impl NullTextures {
    /// Creates an uploader accepting sides up to `max_size`.
    #[must_use]
    pub fn new(max_size: u32) -> Self {
        Self {
            max_size,
            next: 1,
            live: HashSet::new(),
        }
    }

    /// Textures uploaded and not yet deleted.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl TextureUploader for NullTextures {
    fn max_size(&self) -> u32 {
        self.max_size
    }

    fn upload(&mut self, _bitmap: &Bitmap) -> Result<TextureId, GfxError> {
        let id = TextureId(self.next);
        self.next += 1;
        self.live.insert(id);
        Ok(id)
    }

    fn delete(&mut self, texture: TextureId) {
        self.live.remove(&texture);
    }
}

/// Writes screens to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogUi;

impl Ui for LogUi {
    fn show_disconnect(&mut self, title: &str, reason: &str) {
        warn!(title, reason, "disconnect screen");
    }

    fn show_notice(&mut self, message: &str) {
        info!(message, "notice");
    }
}

/// Single-player physics that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalPhysics;

impl PhysicsSim for LocalPhysics {
    fn trigger_local_physics(&mut self, pos: BlockPos, old: BlockId, new: BlockId) {
        debug!(x = pos.x, y = pos.y, z = pos.z, old, new, "physics triggered");
    }
}

/// A single-player set of headless collaborators.
#[must_use]
pub fn collaborators(width: i32, height: i32, world: MemoryWorld) -> Collaborators {
    Collaborators {
        world: Box::new(world),
        session: Session::Singleplayer(Box::new(LocalPhysics)),
        surface: Box::new(HeadlessSurface::new(width, height)),
        textures: Box::new(NullTextures::new(4096)),
        ui: Box::new(LogUi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_world_bounds() {
        let mut world = MemoryWorld::new(16, 8, 16);
        let inside = BlockPos::new(15, 7, 15);
        assert!(world.contains(inside));
        assert!(!world.contains(BlockPos::new(16, 0, 0)));
        assert!(!world.contains(BlockPos::new(0, -1, 0)));

        world.set_block(inside, ids::STONE);
        assert_eq!(world.get_block(inside), ids::STONE);
        assert_eq!(world.get_block(BlockPos::new(99, 0, 0)), ids::AIR);

        world.reset();
        assert_eq!(world.get_block(inside), ids::AIR);
    }

    #[test]
    fn test_linear_index_past_i32() {
        assert_eq!(linear_index(BlockPos::new(1, 2, 3), 16, 16), (2 * 16 + 3) * 16 + 1);
        let far = linear_index(BlockPos::new(1299, 1299, 1299), 1300, 1300);
        assert_eq!(far, 1300 * 1300 * 1300 - 1);
        assert!(far > usize::try_from(i32::MAX).unwrap());
    }

    #[test]
    fn test_null_textures_track_live() {
        let mut textures = NullTextures::new(256);
        let bitmap = Bitmap::filled(16, 16, 0);
        let a = textures.upload(&bitmap).unwrap();
        let b = textures.upload(&bitmap).unwrap();
        assert_ne!(a, b);
        textures.delete(a);
        assert_eq!(textures.live_count(), 1);
    }

    #[test]
    fn test_headless_surface_lifecycle() {
        let mut surface = HeadlessSurface::new(640, 480);
        assert!(!surface.exists());
        surface.create("test", 800, 600).unwrap();
        assert_eq!(surface.client_size(), (800, 600));
        surface.present().unwrap();
        assert_eq!(surface.frames_presented(), 1);
        surface.destroy();
        assert!(surface.render_frame(&GameData::default(), 0.0).is_err());
    }
}
