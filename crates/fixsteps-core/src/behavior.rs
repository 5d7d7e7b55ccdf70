//! Per-step lifecycle hooks supplied by the caller.
//!
//! A [`StepBehavior`] carries a fixed set of optional capabilities. The
//! controller only ever reads the table; hooks that need to record state
//! do so through their own captured handles.

use std::collections::HashMap;
use std::fmt;

/// Direction of travel for a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Passed to `go_next` / `go_prev` hooks for every step they are asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalContext<'a> {
    /// Step whose hook is running
    pub step_id: &'a str,
    /// Destination of the transition
    pub target_id: &'a str,
    pub direction: Direction,
    /// Caller asked to push through holds
    pub force: bool,
}

pub type TraversalHook = Box<dyn Fn(&TraversalContext<'_>) -> bool>;
pub type LifecycleHook = Box<dyn Fn()>;

#[derive(Default)]
pub struct StepBehavior {
    on_enter: Option<LifecycleHook>,
    on_exit: Option<LifecycleHook>,
    go_next: Option<TraversalHook>,
    go_prev: Option<TraversalHook>,
    enter_front_end: bool,
}

impl StepBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after the step is committed as current
    pub fn on_enter(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_enter = Some(Box::new(hook));
        self
    }

    /// Called before the step stops being current
    pub fn on_exit(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_exit = Some(Box::new(hook));
        self
    }

    /// Asked when the step is traversed moving forward; `false` halts
    pub fn go_next(mut self, hook: impl Fn(&TraversalContext<'_>) -> bool + 'static) -> Self {
        self.go_next = Some(Box::new(hook));
        self
    }

    /// Asked when the step is traversed moving backward; `false` halts
    pub fn go_prev(mut self, hook: impl Fn(&TraversalContext<'_>) -> bool + 'static) -> Self {
        self.go_prev = Some(Box::new(hook));
        self
    }

    /// Land on the bottom edge when entered moving backward
    pub fn enter_front_end(mut self, enabled: bool) -> Self {
        self.enter_front_end = enabled;
        self
    }

    /// Run the directional hook, `None` when the step has none
    pub fn traverse(&self, ctx: &TraversalContext<'_>) -> Option<bool> {
        let hook = match ctx.direction {
            Direction::Forward => self.go_next.as_ref(),
            Direction::Backward => self.go_prev.as_ref(),
        }?;
        Some(hook(ctx))
    }

    pub fn enter(&self) {
        if let Some(hook) = &self.on_enter {
            hook();
        }
    }

    pub fn exit(&self) {
        if let Some(hook) = &self.on_exit {
            hook();
        }
    }

    pub fn enters_front_end(&self) -> bool {
        self.enter_front_end
    }
}

impl fmt::Debug for StepBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepBehavior")
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("go_next", &self.go_next.is_some())
            .field("go_prev", &self.go_prev.is_some())
            .field("enter_front_end", &self.enter_front_end)
            .finish()
    }
}

/// Behaviors keyed by step id. Steps without an entry behave plainly.
#[derive(Debug, Default)]
pub struct BehaviorTable {
    behaviors: HashMap<String, StepBehavior>,
}

impl BehaviorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, step_id: impl Into<String>, behavior: StepBehavior) -> Self {
        self.insert(step_id, behavior);
        self
    }

    pub fn insert(&mut self, step_id: impl Into<String>, behavior: StepBehavior) {
        self.behaviors.insert(step_id.into(), behavior);
    }

    pub fn get(&self, step_id: &str) -> Option<&StepBehavior> {
        self.behaviors.get(step_id)
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &str> {
        self.behaviors.keys().map(String::as_str)
    }
}
