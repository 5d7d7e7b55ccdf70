//! Builds step hooks from the `[steps.<id>]` config tables.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use fixsteps_core::{BehaviorTable, Direction, StepBehavior, StepBehaviorConfig, TraversalContext};
use tracing::debug;

/// Messages produced by step hooks, drained by the app each frame
#[derive(Debug, Clone, Default)]
pub struct Notices(Rc<RefCell<VecDeque<String>>>);

impl Notices {
    pub fn push(&self, message: impl Into<String>) {
        self.0.borrow_mut().push_back(message.into());
    }

    pub fn drain(&self) -> Vec<String> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

pub fn behavior_table(steps: &BTreeMap<String, StepBehaviorConfig>, notices: &Notices) -> BehaviorTable {
    let mut table = BehaviorTable::new();
    for (id, config) in steps {
        table.insert(id.clone(), step_behavior(config, notices));
    }
    table
}

fn step_behavior(config: &StepBehaviorConfig, notices: &Notices) -> StepBehavior {
    let mut behavior = StepBehavior::new().enter_front_end(config.enter_front_end);

    if let Some(message) = config.enter_message.clone() {
        let notices = notices.clone();
        behavior = behavior.on_enter(move || notices.push(message.clone()));
    }
    if let Some(message) = config.exit_message.clone() {
        let notices = notices.clone();
        behavior = behavior.on_exit(move || notices.push(message.clone()));
    }
    if config.hold_forward {
        let notices = notices.clone();
        behavior = behavior.go_next(move |ctx| hold(ctx, &notices));
    }
    if config.hold_backward {
        let notices = notices.clone();
        behavior = behavior.go_prev(move |ctx| hold(ctx, &notices));
    }
    behavior
}

fn hold(ctx: &TraversalContext<'_>, notices: &Notices) -> bool {
    if ctx.force {
        return true;
    }
    debug!("Step '{}' holds {:?} travel to '{}'", ctx.step_id, ctx.direction, ctx.target_id);
    let way = match ctx.direction {
        Direction::Forward => "forward",
        Direction::Backward => "backward",
    };
    notices.push(format!("'{}' holds {} travel (ctrl+click a step to force)", ctx.step_id, way));
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(direction: Direction, force: bool) -> TraversalContext<'static> {
        TraversalContext {
            step_id: "quiz",
            target_id: "answers",
            direction,
            force,
        }
    }

    #[test]
    fn test_hold_vetoes_unless_forced() {
        let notices = Notices::default();
        let mut steps = BTreeMap::new();
        steps.insert(
            "quiz".to_string(),
            StepBehaviorConfig {
                hold_forward: true,
                ..Default::default()
            },
        );
        let table = behavior_table(&steps, &notices);
        let quiz = table.get("quiz").unwrap();

        assert_eq!(quiz.traverse(&ctx(Direction::Forward, false)), Some(false));
        assert_eq!(notices.drain().len(), 1);
        assert_eq!(quiz.traverse(&ctx(Direction::Forward, true)), Some(true));
        assert!(notices.is_empty());
        assert_eq!(quiz.traverse(&ctx(Direction::Backward, false)), None);
    }

    #[test]
    fn test_messages_and_front_end() {
        let notices = Notices::default();
        let mut steps = BTreeMap::new();
        steps.insert(
            "end".to_string(),
            StepBehaviorConfig {
                enter_front_end: true,
                enter_message: Some("hello".into()),
                exit_message: Some("bye".into()),
                ..Default::default()
            },
        );
        let table = behavior_table(&steps, &notices);
        let end = table.get("end").unwrap();

        assert!(end.enters_front_end());
        end.enter();
        end.exit();
        assert_eq!(notices.drain(), vec!["hello".to_string(), "bye".to_string()]);
    }
}
