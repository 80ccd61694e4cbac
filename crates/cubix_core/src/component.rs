//! # Component Lifecycle Registry
//!
//! Subsystems taking part in the shared startup / teardown / reset /
//! map-change lifecycle implement [`GameComponent`] and are appended to a
//! [`ComponentRegistry`]. Every hook has a no-op default, so a component only
//! overrides what it needs.
//!
//! ## Dispatch order
//!
//! ```text
//! register(A); register(B); register(C);
//!
//! init / on_new_map / on_new_map_loaded:  A → B → C
//! reset / free:                           C → B → A
//! ```
//!
//! A failing hook never stops the rest of the phase. Failures are collected
//! and returned once the phase has finished.

use tracing::{debug, error};

use crate::error::{ComponentError, HookFailure, LifecycleError, Phase};
use crate::game_data::GameData;

/// Result returned by a lifecycle hook.
pub type HookResult = Result<(), ComponentError>;

/// A subsystem participating in the game lifecycle.
pub trait GameComponent {
    /// Name used in logs and failure reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Sets up state when the game is starting.
    fn init(&mut self, _game: &mut GameData) -> HookResult {
        Ok(())
    }

    /// Releases state when the game is closing.
    fn free(&mut self, _game: &mut GameData) -> HookResult {
        Ok(())
    }

    /// Clears state without restarting the process (e.g. reconnecting).
    fn reset(&mut self, _game: &mut GameData) -> HookResult {
        Ok(())
    }

    /// A new map began loading; drop per-world state.
    fn on_new_map(&mut self, _game: &mut GameData) -> HookResult {
        Ok(())
    }

    /// A new map finished loading; rebuild per-world derived state.
    fn on_new_map_loaded(&mut self, _game: &mut GameData) -> HookResult {
        Ok(())
    }
}

/// Stable handle to a registered component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    /// Position in registration order.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Append-only ordered collection of components.
#[derive(Default)]
pub struct ComponentRegistry {
    components: Vec<Box<dyn GameComponent>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a component. Registration order is dispatch order.
    pub fn register<C>(&mut self, component: C) -> ComponentId
    where
        C: GameComponent + 'static,
    {
        self.register_boxed(Box::new(component))
    }

    /// Appends an already boxed component.
    pub fn register_boxed(&mut self, component: Box<dyn GameComponent>) -> ComponentId {
        let id = ComponentId(self.components.len());
        debug!(component = component.name(), index = id.0, "component registered");
        self.components.push(component);
        id
    }

    /// Returns a registered component.
    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&dyn GameComponent> {
        self.components.get(id.0).map(|c| &**c)
    }

    /// Number of registered components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Names of all components, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.components.iter().map(|c| c.name())
    }

    /// Runs every init hook in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InitFailed`] if any hook failed.
    pub fn run_init(&mut self, game: &mut GameData) -> Result<(), LifecycleError> {
        self.dispatch(Phase::Init, game)
    }

    /// Runs every free hook in reverse registration order.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::PhaseFailed`] if any hook failed.
    pub fn run_free(&mut self, game: &mut GameData) -> Result<(), LifecycleError> {
        self.dispatch(Phase::Free, game)
    }

    /// Runs every reset hook in reverse registration order.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::PhaseFailed`] if any hook failed.
    pub fn run_reset(&mut self, game: &mut GameData) -> Result<(), LifecycleError> {
        self.dispatch(Phase::Reset, game)
    }

    /// Runs every new-map hook in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::PhaseFailed`] if any hook failed.
    pub fn run_on_new_map(&mut self, game: &mut GameData) -> Result<(), LifecycleError> {
        self.dispatch(Phase::NewMap, game)
    }

    /// Runs every new-map-loaded hook in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::PhaseFailed`] if any hook failed.
    pub fn run_on_new_map_loaded(&mut self, game: &mut GameData) -> Result<(), LifecycleError> {
        self.dispatch(Phase::NewMapLoaded, game)
    }

    fn dispatch(&mut self, phase: Phase, game: &mut GameData) -> Result<(), LifecycleError> {
        let mut failures = Vec::new();
        let mut run = |component: &mut Box<dyn GameComponent>| {
            let result = match phase {
                Phase::Init => component.init(game),
                Phase::Free => component.free(game),
                Phase::Reset => component.reset(game),
                Phase::NewMap => component.on_new_map(game),
                Phase::NewMapLoaded => component.on_new_map_loaded(game),
            };
            if let Err(err) = result {
                error!(component = component.name(), %phase, error = %err, "component hook failed");
                failures.push(HookFailure {
                    component: component.name(),
                    error: err,
                });
            }
        };

        match phase {
            Phase::Free | Phase::Reset => self.components.iter_mut().rev().for_each(&mut run),
            Phase::Init | Phase::NewMap | Phase::NewMapLoaded => {
                self.components.iter_mut().for_each(&mut run);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else if phase == Phase::Init {
            Err(LifecycleError::InitFailed { failures })
        } else {
            Err(LifecycleError::PhaseFailed { phase, failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        fail_on: Option<Phase>,
    }

    impl Recorder {
        fn record(&self, phase: Phase) -> HookResult {
            self.log.borrow_mut().push(format!("{}:{phase}", self.name));
            if self.fail_on == Some(phase) {
                return Err(ComponentError::new("boom"));
            }
            Ok(())
        }
    }

    impl GameComponent for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }
        fn init(&mut self, _game: &mut GameData) -> HookResult {
            self.record(Phase::Init)
        }
        fn free(&mut self, _game: &mut GameData) -> HookResult {
            self.record(Phase::Free)
        }
        fn reset(&mut self, _game: &mut GameData) -> HookResult {
            self.record(Phase::Reset)
        }
        fn on_new_map(&mut self, _game: &mut GameData) -> HookResult {
            self.record(Phase::NewMap)
        }
        fn on_new_map_loaded(&mut self, _game: &mut GameData) -> HookResult {
            self.record(Phase::NewMapLoaded)
        }
    }

    /// Implements nothing: every hook is the default no-op.
    struct Silent;
    impl GameComponent for Silent {}

    fn registry(log: &Log, fail: Option<(&'static str, Phase)>) -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        for name in ["A", "B", "C"] {
            registry.register(Recorder {
                name,
                log: Rc::clone(log),
                fail_on: fail.filter(|(n, _)| *n == name).map(|(_, p)| p),
            });
        }
        registry
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn test_forward_phases_run_in_registration_order() {
        let log = Log::default();
        let mut registry = registry(&log, None);
        let mut game = GameData::default();

        registry.run_init(&mut game).unwrap();
        assert_eq!(take(&log), ["A:init", "B:init", "C:init"]);
        registry.run_on_new_map(&mut game).unwrap();
        assert_eq!(take(&log), ["A:new map", "B:new map", "C:new map"]);
        registry.run_on_new_map_loaded(&mut game).unwrap();
        assert_eq!(
            take(&log),
            ["A:new map loaded", "B:new map loaded", "C:new map loaded"]
        );
    }

    #[test]
    fn test_teardown_phases_run_in_reverse() {
        let log = Log::default();
        let mut registry = registry(&log, None);
        let mut game = GameData::default();

        registry.run_reset(&mut game).unwrap();
        assert_eq!(take(&log), ["C:reset", "B:reset", "A:reset"]);
        registry.run_free(&mut game).unwrap();
        assert_eq!(take(&log), ["C:free", "B:free", "A:free"]);
    }

    #[test]
    fn test_failure_does_not_stop_dispatch() {
        let log = Log::default();
        let mut registry = registry(&log, Some(("A", Phase::Init)));
        let mut game = GameData::default();

        let err = registry.run_init(&mut game).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.failures()[0].component, "A");
        assert_eq!(take(&log), ["A:init", "B:init", "C:init"]);
    }

    #[test]
    fn test_non_init_failure_is_not_fatal() {
        let log = Log::default();
        let mut registry = registry(&log, Some(("B", Phase::Reset)));
        let mut game = GameData::default();

        let err = registry.run_reset(&mut game).unwrap_err();
        assert!(!err.is_fatal());
        assert_eq!(take(&log), ["C:reset", "B:reset", "A:reset"]);
    }

    #[test]
    fn test_default_hooks_are_noops() {
        let mut registry = ComponentRegistry::new();
        let id = registry.register(Silent);
        let mut game = GameData::default();
        registry.run_init(&mut game).unwrap();
        registry.run_reset(&mut game).unwrap();
        registry.run_free(&mut game).unwrap();
        assert!(registry.get(id).is_some());
        assert!(registry.names().next().unwrap().ends_with("Silent"));
    }
}
