//! # Block Mutation Gateway
//!
//! Every subsystem that changes world blocks goes through here.
//!
//! ```text
//! update_block:  bounds ─> set ─> lighting ─> redraw ─> chunk_updates += 1
//! change_block:  update_block ─> notify peer   (multiplayer)
//!                             └> run physics   (single-player)
//! ```
//!
//! `update_block` never talks to the network: it is for changes the server
//! already knows about and for predictive local state. The local update is
//! always complete before the peer or physics hears about a change.

use cubix_core::{ConfigError, ConfigResult, GameData};
use cubix_shared::{BlockId, BlockKind, BlockPos, ChunkCoord, CHUNK_SIZE};
use tracing::debug;

use crate::collaborators::{Session, WorldStorage};

/// Borrowed view over the pieces a block mutation touches.
pub struct BlockGateway<'a> {
    world: &'a mut dyn WorldStorage,
    session: &'a mut Session,
    game: &'a mut GameData,
}

impl<'a> BlockGateway<'a> {
    /// Creates a gateway for one or more mutations.
    pub fn new(
        world: &'a mut dyn WorldStorage,
        session: &'a mut Session,
        game: &'a mut GameData,
    ) -> Self {
        Self {
            world,
            session,
            game,
        }
    }

    /// Applies a block locally without notifying anyone.
    ///
    /// Returns the block that was there before.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfBounds`] if `pos` is outside the loaded
    /// world. Nothing is changed in that case.
    pub fn update_block(&mut self, pos: BlockPos, block: BlockId) -> ConfigResult<BlockId> {
        if !self.world.contains(pos) {
            return Err(ConfigError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                z: pos.z,
            });
        }

        let old = self.world.get_block(pos);
        self.world.set_block(pos, block);
        self.world.recalculate_lighting(pos, old, block);
        for chunk in affected_chunks(pos) {
            self.world.mark_chunk_dirty(chunk);
        }
        self.game.chunk_updates = self.game.chunk_updates.saturating_add(1);
        Ok(old)
    }

    /// Applies a block locally, then tells the peer or runs physics.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfBounds`] if `pos` is outside the loaded
    /// world. Neither the world nor the peer is touched in that case.
    pub fn change_block(&mut self, pos: BlockPos, block: BlockId) -> ConfigResult<()> {
        let old = self.update_block(pos, block)?;
        match &mut *self.session {
            Session::Multiplayer(peer) => peer.notify_block_change(pos, block),
            Session::Singleplayer(physics) => physics.trigger_local_physics(pos, old, block),
        }
        debug!(x = pos.x, y = pos.y, z = pos.z, old, block, "block changed");
        Ok(())
    }
}

/// Returns true if the player may target `block`.
#[must_use]
pub fn can_pick(block: BlockId, game: &GameData) -> bool {
    match BlockKind::classify(block) {
        BlockKind::Gas => false,
        BlockKind::Sprite | BlockKind::Solid => true,
        BlockKind::Liquid => game.breakable_liquids,
    }
}

/// The chunk holding `pos`, plus neighbours sharing the face `pos` sits on.
fn affected_chunks(pos: BlockPos) -> impl Iterator<Item = ChunkCoord> {
    let home = pos.chunk();
    let edge = |v: i32| match v.rem_euclid(CHUNK_SIZE) {
        0 => -1,
        r if r == CHUNK_SIZE - 1 => 1,
        _ => 0,
    };
    let (dx, dy, dz) = (edge(pos.x), edge(pos.y), edge(pos.z));

    let neighbours = [
        (dx != 0).then(|| ChunkCoord::new(home.x + dx, home.y, home.z)),
        (dy != 0).then(|| ChunkCoord::new(home.x, home.y + dy, home.z)),
        (dz != 0).then(|| ChunkCoord::new(home.x, home.y, home.z + dz)),
    ];
    std::iter::once(home).chain(neighbours.into_iter().flatten())
}
