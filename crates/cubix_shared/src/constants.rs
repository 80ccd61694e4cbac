//! # Client Constants
//!
//! **CRITICAL:** These values are baked into the client binary.
//! Changes require a client rebuild.

// =============================================================================
// VIEW DISTANCE
// =============================================================================

/// Hard upper bound for any view distance, in blocks.
pub const DEFAULT_MAX_VIEWDIST: i32 = 32768;

/// Smallest view distance any setter will store.
pub const MIN_VIEW_DISTANCE: i32 = 8;

/// View distance below which VRAM pressure can no longer be relieved.
pub const VRAM_VIEW_DISTANCE_FLOOR: i32 = 16;

/// View distance used when nothing else is configured.
pub const DEFAULT_VIEW_DISTANCE: i32 = 512;

/// Distances visited when the user cycles through view distances.
pub const VIEW_DISTANCE_STEPS: [i32; 10] = [8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

// =============================================================================
// WORLD
// =============================================================================

/// Log2 of the chunk edge length.
pub const CHUNK_SHIFT: u32 = 4;

/// Chunk edge length in blocks.
pub const CHUNK_SIZE: i32 = 1 << CHUNK_SHIFT;

// =============================================================================
// SCHEDULER
// =============================================================================

/// Capacity of the scheduled task table.
pub const MAX_SCHEDULED_TASKS: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_distance_bounds_are_ordered() {
        assert!(MIN_VIEW_DISTANCE > 0);
        assert!(MIN_VIEW_DISTANCE <= VRAM_VIEW_DISTANCE_FLOOR);
        assert!(DEFAULT_VIEW_DISTANCE <= DEFAULT_MAX_VIEWDIST);
        assert!(VIEW_DISTANCE_STEPS.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(VIEW_DISTANCE_STEPS[0], MIN_VIEW_DISTANCE);
    }

    #[test]
    fn test_chunk_size() {
        assert_eq!(CHUNK_SIZE, 16);
    }
}
