//! Block mutation ordering against instrumented collaborators.

#![allow(missing_docs)]

mod common;

use common::{multiplayer_game, singleplayer_game, Call, Shared};
use cubix::core::ConfigError;
use cubix::shared::{block::ids, BlockPos, ChunkCoord};
use cubix::ClientEvent;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_change_block_applies_locally_before_notifying() {
    let shared = Shared::new(32);
    let mut game = multiplayer_game(&shared);
    let pos = BlockPos::new(3, 4, 5);

    game.change_block(pos, ids::STONE).unwrap();

    let set = shared
        .position(|c| *c == Call::SetBlock(pos, ids::STONE))
        .unwrap();
    let notify = shared
        .position(|c| matches!(c, Call::Notify { .. }))
        .unwrap();
    assert!(set < notify, "notification preceded the local write");
    assert_eq!(
        shared.calls()[notify],
        Call::Notify {
            pos,
            block: ids::STONE,
            applied_locally: true
        }
    );
    // Lighting and redraw also happen before the peer hears about it.
    assert!(shared.position(|c| matches!(c, Call::Lighting(_))).unwrap() < notify);
    assert!(shared.position(|c| matches!(c, Call::MarkDirty(_))).unwrap() < notify);
}

#[test]
fn test_singleplayer_change_runs_physics_not_network() {
    let shared = Shared::new(32);
    let mut game = singleplayer_game(&shared);
    let pos = BlockPos::new(1, 1, 1);

    game.update_block(pos, ids::DIRT).unwrap();
    game.change_block(pos, ids::SAND).unwrap();

    assert_eq!(shared.count(|c| matches!(c, Call::Notify { .. })), 0);
    let physics: Vec<_> = shared
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Physics { .. }))
        .collect();
    assert_eq!(
        physics,
        [Call::Physics {
            pos,
            old: ids::DIRT,
            new: ids::SAND
        }]
    );
    assert_eq!(shared.block(pos), Some(ids::SAND));
}

#[test]
fn test_update_block_never_notifies() {
    let shared = Shared::new(32);
    let mut game = multiplayer_game(&shared);
    let mut rng = StdRng::seed_from_u64(0x00C0_FFEE);

    let mut applied = 0;
    for _ in 0..1000 {
        let pos = BlockPos::new(
            rng.gen_range(-4..36),
            rng.gen_range(-4..36),
            rng.gen_range(-4..36),
        );
        let block = rng.gen_range(0..=ids::OBSIDIAN);
        if game.update_block(pos, block).is_ok() {
            applied += 1;
        }
    }

    assert!(applied > 0);
    assert_eq!(shared.count(|c| matches!(c, Call::Notify { .. })), 0);
    assert_eq!(shared.count(|c| matches!(c, Call::Physics { .. })), 0);
    assert_eq!(shared.count(|c| matches!(c, Call::SetBlock(..))), applied);
}

#[test]
fn test_out_of_bounds_is_rejected_untouched() {
    let shared = Shared::new(16);
    let mut game = multiplayer_game(&shared);

    assert_eq!(
        game.change_block((-1, 0, 0), ids::STONE),
        Err(ConfigError::OutOfBounds { x: -1, y: 0, z: 0 })
    );
    assert_eq!(
        game.update_block((0, 16, 0), ids::STONE),
        Err(ConfigError::OutOfBounds { x: 0, y: 16, z: 0 })
    );
    assert!(shared.calls().is_empty());
    assert_eq!(game.data().chunk_updates, 0);
}

#[test]
fn test_chunk_edge_marks_neighbour() {
    let shared = Shared::new(64);
    let mut game = multiplayer_game(&shared);

    game.update_block((16, 5, 5), ids::GLASS).unwrap();

    let dirty: Vec<_> = shared
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::MarkDirty(chunk) => Some(chunk),
            _ => None,
        })
        .collect();
    assert_eq!(dirty, [ChunkCoord::new(1, 0, 0), ChunkCoord::new(0, 0, 0)]);
}

#[test]
fn test_chunk_updates_count_and_reset_each_second() {
    let shared = Shared::new(32);
    let mut game = multiplayer_game(&shared);
    game.startup().unwrap();

    game.update_block((1, 1, 1), ids::STONE).unwrap();
    game.change_block((2, 1, 1), ids::STONE).unwrap();
    assert_eq!(game.data().chunk_updates, 2);

    game.run_frame(0.5).unwrap();
    assert_eq!(game.data().chunk_updates, 2);
    game.run_frame(0.6).unwrap();
    assert_eq!(game.data().chunk_updates, 0);
}

#[test]
fn test_block_from_network_is_applied_without_echo() {
    let shared = Shared::new(32);
    let mut game = multiplayer_game(&shared);
    game.startup().unwrap();

    let sender = game.event_sender();
    let handle = std::thread::spawn(move || {
        sender.send(ClientEvent::BlockReceived {
            x: 7,
            y: 8,
            z: 9,
            block: ids::GOLD,
        })
    });
    assert!(handle.join().unwrap());

    game.run_frame(0.016).unwrap();
    assert_eq!(shared.block(BlockPos::new(7, 8, 9)), Some(ids::GOLD));
    assert_eq!(shared.count(|c| matches!(c, Call::Notify { .. })), 0);
}

#[test]
fn test_can_pick_follows_breakable_liquids() {
    let shared = Shared::new(8);
    let mut game = multiplayer_game(&shared);
    assert!(!game.can_pick(ids::AIR));
    assert!(!game.can_pick(ids::STILL_WATER));
    game.data_mut().breakable_liquids = true;
    assert!(game.can_pick(ids::STILL_WATER));
    assert!(game.can_pick(ids::ROSE));
}
