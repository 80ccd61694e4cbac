//! # Frame Pacing
//!
//! Applies the active [`FpsLimitMethod`] at the end of each frame and keeps
//! frame timing statistics.
//!
//! - `LimitVSync`: no sleep here, the surface blocks in `present`.
//! - `Limit30FPS` .. `Limit144FPS`: sleep until `1 / target` seconds after
//!   the frame started, finishing with a short spin for accuracy.
//! - `LimitNone`: no pacing.

use std::time::{Duration, Instant};

use cubix_shared::FpsLimitMethod;
use tracing::info;

/// Below this much remaining time the pacer spins instead of sleeping.
const SPIN_THRESHOLD: Duration = Duration::from_micros(1000);

/// Time left for the spin after sleeping.
const SPIN_MARGIN: Duration = Duration::from_micros(500);

/// Frame-rate limiter.
#[derive(Clone, Copy, Debug)]
pub struct FramePacer {
    method: FpsLimitMethod,
    budget: Option<Duration>,
}

impl FramePacer {
    /// Creates a pacer for a strategy.
    #[must_use]
    pub fn new(method: FpsLimitMethod) -> Self {
        Self {
            method,
            budget: method.min_frame_time(),
        }
    }

    /// Active strategy.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> FpsLimitMethod {
        self.method
    }

    /// Minimum time between frame starts, if the strategy has one.
    #[inline]
    #[must_use]
    pub const fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Switches strategy.
    pub fn set_method(&mut self, method: FpsLimitMethod) {
        *self = Self::new(method);
    }

    /// Waits until the frame that started at `frame_start` has used its
    /// budget.
    ///
    /// Returns how long it waited.
    pub fn pace(&self, frame_start: Instant) -> Duration {
        let Some(budget) = self.budget else {
            return Duration::ZERO;
        };
        let deadline = frame_start + budget;
        let now = Instant::now();
        if now >= deadline {
            return Duration::ZERO;
        }

        let remaining = deadline - now;
        if remaining > SPIN_THRESHOLD {
            std::thread::sleep(remaining - SPIN_MARGIN);
        }
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
        now.elapsed()
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(FpsLimitMethod::default())
    }
}

/// Timing of one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Work time in microseconds, pacing excluded.
    pub work_us: u64,
    /// Time spent rendering and presenting, in microseconds.
    pub render_us: u64,
    /// Time spent waiting for the pacing budget, in microseconds.
    pub paced_us: u64,
    /// Events drained this frame.
    pub events_processed: u32,
    /// Scheduled tasks fired this frame.
    pub tasks_fired: u32,
}

/// Running frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Frames recorded.
    pub frames_recorded: u64,
    /// Sum of work times.
    pub work_us_sum: u64,
    /// Sum of render times.
    pub render_us_sum: u64,
    /// Shortest work time.
    pub min_work_us: u64,
    /// Longest work time.
    pub max_work_us: u64,
    /// Frames whose work alone exceeded the pacing budget.
    pub frames_over_budget: u64,
}

impl FrameStatsAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_recorded: 0,
            work_us_sum: 0,
            render_us_sum: 0,
            min_work_us: u64::MAX,
            max_work_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Records a frame. `budget` is the pacer's budget, if any.
    pub fn record(&mut self, stats: FrameStats, budget: Option<Duration>) {
        self.frames_recorded += 1;
        self.work_us_sum = self.work_us_sum.saturating_add(stats.work_us);
        self.render_us_sum = self.render_us_sum.saturating_add(stats.render_us);
        self.min_work_us = self.min_work_us.min(stats.work_us);
        self.max_work_us = self.max_work_us.max(stats.work_us);

        if budget.is_some_and(|b| u128::from(stats.work_us) > b.as_micros()) {
            self.frames_over_budget += 1;
        }
    }

    /// Average work time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_work_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.work_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Fraction of frames over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a one-line summary.
    #[allow(clippy::cast_precision_loss)]
    pub fn log_summary(&self) {
        if self.frames_recorded == 0 {
            return;
        }
        info!(
            frames = self.frames_recorded,
            avg_ms = format_args!("{:.3}", self.avg_work_ms()),
            min_ms = format_args!("{:.3}", self.min_work_us as f64 / 1000.0),
            max_ms = format_args!("{:.3}", self.max_work_us as f64 / 1000.0),
            over_budget = self.frames_over_budget,
            "frame statistics"
        );
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
