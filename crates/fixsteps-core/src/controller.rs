//! Transition controller: resolves targets, asks step hooks, owns the
//! single-flight transition lock and commits the current step.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::behavior::{BehaviorTable, Direction, StepBehavior, TraversalContext};
use crate::config::NavigatorConfig;
use crate::engine::ScrollEngine;
use crate::step::{Step, StepRef, StepRegistry, StepSource};

/// Options for a single [`TransitionController::go_to_step`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOptions {
    /// Animate the scroll; when false the transition completes synchronously
    pub animate: bool,
    /// Passed through to traversal hooks
    pub force: bool,
    /// Land on the step's bottom edge instead of its top
    pub to_bottom: bool,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            animate: true,
            force: false,
            to_bottom: false,
        }
    }
}

impl TransitionOptions {
    pub fn snap() -> Self {
        Self {
            animate: false,
            ..Self::default()
        }
    }

    pub fn forced(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn to_bottom(mut self) -> Self {
        self.to_bottom = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlightKind {
    /// A step transition; the target's `on_enter` runs on completion
    Transition,
    /// Start-up scroll back to the first step; no hooks
    Reposition,
}

/// The one transition allowed to be running. The landing offset is
/// derived from the registry again on commit, so a relayout mid-flight
/// lands on the new geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    target: usize,
    /// Land on the viewport bottom instead of the top
    to_bottom: bool,
    kind: InFlightKind,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    current: Option<usize>,
    in_flight: Option<InFlight>,
    last_scroll: u16,
}

impl NavigationState {
    /// Index of the current step, `None` before initialization
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// True while a transition is in flight
    pub fn is_locked(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Scroll position observed at the end of the last cycle or transition
    pub fn last_scroll(&self) -> u16 {
        self.last_scroll
    }

    /// Destination step of the running transition
    pub fn pending_target(&self) -> Option<usize> {
        self.in_flight.map(|f| f.target)
    }
}

pub struct TransitionController {
    registry: StepRegistry,
    behaviors: BehaviorTable,
    state: NavigationState,
    transition_duration: Duration,
    reposition_duration: Duration,
}

impl TransitionController {
    pub fn new(registry: StepRegistry, behaviors: BehaviorTable, config: &NavigatorConfig) -> Self {
        for id in behaviors.step_ids() {
            if registry.resolve(&StepRef::Id(id.to_string())).is_none() {
                warn!("Behavior configured for unknown step '{}'", id);
            }
        }

        Self {
            registry,
            behaviors,
            state: NavigationState::default(),
            transition_duration: Duration::from_millis(config.transition_ms),
            reposition_duration: Duration::from_millis(config.reposition_ms),
        }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.state.current.and_then(|i| self.registry.get(i))
    }

    pub fn is_transitioning(&self) -> bool {
        self.state.is_locked()
    }

    pub fn record_scroll(&mut self, position: u16) {
        self.state.last_scroll = position;
    }

    /// Refresh step geometry from the layout source
    pub fn remeasure(&mut self, source: &dyn StepSource) -> crate::Result<()> {
        self.registry.remeasure(source)
    }

    /// Make the first step current. If the view does not start at the top,
    /// scroll back to it while holding the lock.
    pub fn initialize(&mut self, engine: &mut dyn ScrollEngine) {
        if self.state.current.is_some() {
            return;
        }

        self.state.current = Some(0);
        let top = self.registry.first().top();
        if engine.current_scroll_position() > 0 {
            debug!("Repositioning to first step from {}", engine.current_scroll_position());
            self.state.in_flight = Some(InFlight {
                target: 0,
                to_bottom: false,
                kind: InFlightKind::Reposition,
            });
            engine.animate_scroll_to(top, self.reposition_duration);
        }
        self.state.last_scroll = engine.current_scroll_position();
    }

    /// Start a transition to `target`.
    ///
    /// Returns false without side effects when the target does not resolve,
    /// a transition is already running, or the governing hook vetoes.
    /// Hooks that ran before a veto keep their side effects.
    pub fn go_to_step(
        &mut self,
        engine: &mut dyn ScrollEngine,
        target: &StepRef,
        options: TransitionOptions,
    ) -> bool {
        let Some(current) = self.state.current else {
            debug!("Ignoring transition to {}: not initialized", target);
            return false;
        };
        let Some(target_index) = self.registry.resolve(target) else {
            debug!("Ignoring transition to {}: no such step", target);
            return false;
        };
        if self.state.is_locked() {
            debug!("Ignoring transition to {}: transition in progress", target);
            return false;
        }

        let delta = target_index as isize - current as isize;
        let direction = if delta < 0 {
            Direction::Backward
        } else {
            Direction::Forward
        };
        let adjacent = delta.abs() == 1;

        if !self.traversal_allowed(current, target_index, direction, adjacent, options.force) {
            debug!("Transition to {} vetoed by step hook", target);
            return false;
        }

        self.begin(engine, current, target_index, direction, options);
        true
    }

    pub fn go_next_step(&mut self, engine: &mut dyn ScrollEngine, options: TransitionOptions) -> bool {
        let Some(current) = self.state.current else {
            return false;
        };
        self.go_to_step(engine, &StepRef::Index(current + 1), options)
    }

    /// At the first step this re-targets the first step itself
    pub fn go_prev_step(&mut self, engine: &mut dyn ScrollEngine, options: TransitionOptions) -> bool {
        let Some(current) = self.state.current else {
            return false;
        };
        self.go_to_step(engine, &StepRef::Index(current.saturating_sub(1)), options)
    }

    /// Completion notification: commits the in-flight transition once the
    /// engine has stopped animating.
    pub fn poll_completion(&mut self, engine: &mut dyn ScrollEngine) -> bool {
        let Some(in_flight) = self.state.in_flight else {
            return false;
        };
        if engine.is_animating() {
            return false;
        }
        self.commit(engine, in_flight);
        true
    }

    /// Walk from `current` to `target` asking directional hooks. The last
    /// hook that answered decides.
    ///
    /// Adjacent moves only ask the step being left. Moving forward the
    /// destination is never asked; moving backward it is.
    fn traversal_allowed(
        &self,
        current: usize,
        target: usize,
        direction: Direction,
        adjacent: bool,
        force: bool,
    ) -> bool {
        let path: Vec<usize> = match direction {
            Direction::Forward => (current..=target).collect(),
            Direction::Backward => (target..=current).rev().collect(),
        };
        let target_id = self.registry.get(target).map(Step::id).unwrap_or_default();

        let mut last_should_continue = true;
        for index in path {
            if adjacent && index != current {
                continue;
            }
            if index == target && direction == Direction::Forward {
                continue;
            }
            let Some(step) = self.registry.get(index) else {
                continue;
            };
            let Some(behavior) = self.behaviors.get(step.id()) else {
                continue;
            };
            let ctx = TraversalContext {
                step_id: step.id(),
                target_id,
                direction,
                force,
            };
            if let Some(should_continue) = behavior.traverse(&ctx) {
                last_should_continue = should_continue;
            }
        }
        last_should_continue
    }

    fn begin(
        &mut self,
        engine: &mut dyn ScrollEngine,
        current: usize,
        target: usize,
        direction: Direction,
        options: TransitionOptions,
    ) {
        let Some(step) = self.registry.get(target) else {
            return;
        };
        let front_end = direction == Direction::Backward
            && self
                .behavior_at(target)
                .is_some_and(StepBehavior::enters_front_end);
        let to_bottom = options.to_bottom || front_end;
        let offset = self.landing_offset(step, to_bottom);

        info!(
            "Step transition {} -> {} (offset {}, {:?})",
            self.registry.get(current).map(Step::id).unwrap_or_default(),
            step.id(),
            offset,
            direction
        );

        self.state.in_flight = Some(InFlight {
            target,
            to_bottom,
            kind: InFlightKind::Transition,
        });
        if let Some(behavior) = self.behavior_at(current) {
            behavior.exit();
        }

        if options.animate {
            engine.animate_scroll_to(offset, self.transition_duration);
        } else {
            engine.snap_scroll_to(offset);
            if let Some(in_flight) = self.state.in_flight {
                self.commit(engine, in_flight);
            }
        }
    }

    fn commit(&mut self, engine: &mut dyn ScrollEngine, in_flight: InFlight) {
        if let Some(step) = self.registry.get(in_flight.target) {
            engine.snap_scroll_to(self.landing_offset(step, in_flight.to_bottom));
        }
        self.state.last_scroll = engine.current_scroll_position();
        self.state.current = Some(in_flight.target);
        self.state.in_flight = None;
        info!(
            "Current step is now '{}' at {}",
            self.registry.get(in_flight.target).map(Step::id).unwrap_or_default(),
            self.state.last_scroll
        );

        if in_flight.kind == InFlightKind::Transition {
            if let Some(behavior) = self.behavior_at(in_flight.target) {
                behavior.enter();
            }
        }
    }

    fn landing_offset(&self, step: &Step, to_bottom: bool) -> u16 {
        if to_bottom {
            step.viewport_bottom(self.registry.viewport_height())
        } else {
            step.top()
        }
    }

    fn behavior_at(&self, index: usize) -> Option<&StepBehavior> {
        let step = self.registry.get(index)?;
        self.behaviors.get(step.id())
    }
}
