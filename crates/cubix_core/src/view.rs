//! # View Distance
//!
//! The main lever for trading graphics memory against visual range.
//!
//! Invariant, held by every method:
//! `MIN_VIEW_DISTANCE <= current <= max <= DEFAULT_MAX_VIEWDIST`, and
//! `user <= max`. `user` is the player's preference and survives temporary
//! reductions made under VRAM pressure.

use cubix_shared::{DEFAULT_MAX_VIEWDIST, MIN_VIEW_DISTANCE, VIEW_DISTANCE_STEPS, VRAM_VIEW_DISTANCE_FLOOR};

/// View distance state with clamping and pressure reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewDistance {
    current: i32,
    max: i32,
    user: i32,
}

impl ViewDistance {
    /// Creates view distance state, clamping both values into range.
    #[must_use]
    pub fn new(user: i32, max: i32) -> Self {
        let max = max.clamp(MIN_VIEW_DISTANCE, DEFAULT_MAX_VIEWDIST);
        let user = user.clamp(MIN_VIEW_DISTANCE, max);
        Self {
            current: user,
            max,
            user,
        }
    }

    /// Distance currently in effect.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> i32 {
        self.current
    }

    /// Upper bound for every distance.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// The player's preferred distance.
    #[inline]
    #[must_use]
    pub const fn user(&self) -> i32 {
        self.user
    }

    /// Returns true while the current distance is below the preference.
    #[inline]
    #[must_use]
    pub const fn is_reduced(&self) -> bool {
        self.current < self.user
    }

    /// Clamps `distance` into `[MIN_VIEW_DISTANCE, max]` and applies it.
    ///
    /// Returns true if the effective distance changed.
    pub fn set(&mut self, distance: i32) -> bool {
        let distance = distance.clamp(MIN_VIEW_DISTANCE, self.max);
        let changed = distance != self.current;
        self.current = distance;
        changed
    }

    /// Records a new preference and applies it.
    ///
    /// Returns true if the effective distance changed.
    pub fn user_set(&mut self, distance: i32) -> bool {
        self.user = distance.clamp(MIN_VIEW_DISTANCE, self.max);
        self.set(self.user)
    }

    /// Changes the upper bound, pulling the other values down if needed.
    ///
    /// Returns true if the effective distance changed.
    pub fn set_max(&mut self, max: i32) -> bool {
        self.max = max.clamp(MIN_VIEW_DISTANCE, DEFAULT_MAX_VIEWDIST);
        self.user = self.user.min(self.max);
        self.set(self.current)
    }

    /// Halves the current distance, never going below
    /// `VRAM_VIEW_DISTANCE_FLOOR`.
    ///
    /// Returns false, leaving the state untouched, once the floor is reached.
    pub fn reduce_for_vram(&mut self) -> bool {
        if self.current <= VRAM_VIEW_DISTANCE_FLOOR {
            return false;
        }
        self.current = (self.current / 2).max(VRAM_VIEW_DISTANCE_FLOOR);
        true
    }

    /// Goes back to the preferred distance after pressure subsided.
    ///
    /// Returns true if the effective distance changed.
    pub fn restore(&mut self) -> bool {
        self.set(self.user)
    }

    /// Next distance when the player cycles through the preset steps.
    ///
    /// Forward picks the first step above the preference and wraps to the
    /// smallest; reverse picks the last step below it and wraps to the
    /// largest step allowed by `max`.
    #[must_use]
    pub fn next_step(&self, reverse: bool) -> i32 {
        let mut allowed = VIEW_DISTANCE_STEPS.iter().copied().filter(|d| *d <= self.max);
        if reverse {
            let steps: Vec<i32> = allowed.collect();
            steps
                .iter()
                .rev()
                .copied()
                .find(|d| *d < self.user)
                .or_else(|| steps.last().copied())
                .unwrap_or(MIN_VIEW_DISTANCE)
        } else {
            allowed
                .find(|d| *d > self.user)
                .unwrap_or(VIEW_DISTANCE_STEPS[0])
        }
    }
}

impl Default for ViewDistance {
    fn default() -> Self {
        Self::new(cubix_shared::DEFAULT_VIEW_DISTANCE, DEFAULT_MAX_VIEWDIST)
    }
}
