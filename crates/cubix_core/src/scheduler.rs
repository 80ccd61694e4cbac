//! # Scheduled Tasks
//!
//! Periodic low-frequency work driven by accumulated frame time instead of a
//! timer thread.
//!
//! ## Firing policy
//!
//! Each tick adds the frame delta to every task's accumulator. A task whose
//! accumulator reached its interval fires once and the interval is
//! subtracted, so fractional overshoot carries into the next period and the
//! average frequency matches `1 / interval` under frame jitter.
//!
//! After a long stall a task still fires only once per tick, and the
//! accumulator is clamped to one interval. The task then fires again on the
//! next tick and settles back into its period instead of replaying every
//! missed invocation.

use cubix_shared::MAX_SCHEDULED_TASKS;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::game_data::GameData;

/// Opaque handle to a registered task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(usize);

impl TaskHandle {
    /// Index of the task in registration order.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a callback learns about the invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaskTick {
    /// The firing task.
    pub handle: TaskHandle,
    /// The task's fixed interval in seconds.
    pub interval: f64,
}

/// Callback invoked when a task fires.
pub type TaskCallback = Box<dyn FnMut(&TaskTick, &mut GameData)>;

/// A periodically invoked callback.
pub struct ScheduledTask {
    accumulator: f64,
    interval: f64,
    callback: TaskCallback,
}

impl ScheduledTask {
    /// Seconds elapsed since the callback last fired.
    #[inline]
    #[must_use]
    pub const fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Seconds between invocations.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> f64 {
        self.interval
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("accumulator", &self.accumulator)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Bounded table of scheduled tasks.
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    capacity: usize,
}

impl Scheduler {
    /// Creates a scheduler holding up to `MAX_SCHEDULED_TASKS` tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_SCHEDULED_TASKS)
    }

    /// Creates a scheduler with a custom table size.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Registers a task firing every `interval` seconds.
    ///
    /// Identical intervals and callbacks are independent tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidInterval`] if `interval` is not a
    /// finite number greater than zero, and [`ConfigError::SchedulerFull`]
    /// if the table is full.
    pub fn add<F>(&mut self, interval: f64, callback: F) -> ConfigResult<TaskHandle>
    where
        F: FnMut(&TaskTick, &mut GameData) + 'static,
    {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(ConfigError::InvalidInterval(interval));
        }
        if self.tasks.len() >= self.capacity {
            return Err(ConfigError::SchedulerFull {
                capacity: self.capacity,
            });
        }

        let handle = TaskHandle(self.tasks.len());
        self.tasks.push(ScheduledTask {
            accumulator: 0.0,
            interval,
            callback: Box::new(callback),
        });
        debug!(task = handle.0, interval, "scheduled task registered");
        Ok(handle)
    }

    /// Advances every task by one frame.
    ///
    /// Negative or NaN deltas count as zero. Returns how many callbacks fired.
    pub fn tick(&mut self, delta: f64, game: &mut GameData) -> usize {
        let delta = delta.max(0.0);
        let mut fired = 0;

        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.accumulator += delta;
            if task.accumulator < task.interval {
                continue;
            }

            let tick = TaskTick {
                handle: TaskHandle(index),
                interval: task.interval,
            };
            (task.callback)(&tick, game);
            fired += 1;

            task.accumulator = (task.accumulator - task.interval).min(task.interval);
        }
        fired
    }

    /// Returns a registered task.
    #[must_use]
    pub fn get(&self, handle: TaskHandle) -> Option<&ScheduledTask> {
        self.tasks.get(handle.0)
    }

    /// Number of registered tasks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if no task is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
