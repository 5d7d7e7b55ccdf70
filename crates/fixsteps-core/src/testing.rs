//! Fakes shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::behavior::StepBehavior;
use crate::engine::ScrollEngine;
use crate::step::{MeasuredStep, StepLayout, StepRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EngineCall {
    Animate(u16, Duration),
    Snap(u16),
}

/// Scroll engine whose animations only finish when told to
#[derive(Debug, Default)]
pub(crate) struct RecordingEngine {
    pub position: u16,
    pub calls: Vec<EngineCall>,
    pub(crate) target: Option<u16>,
}

impl RecordingEngine {
    pub fn finish_animation(&mut self) {
        if let Some(target) = self.target.take() {
            self.position = target;
        }
    }

    pub fn animations(&self) -> Vec<(u16, Duration)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Animate(offset, duration) => Some((*offset, *duration)),
                EngineCall::Snap(_) => None,
            })
            .collect()
    }
}

impl ScrollEngine for RecordingEngine {
    fn animate_scroll_to(&mut self, offset: u16, duration: Duration) {
        self.calls.push(EngineCall::Animate(offset, duration));
        self.target = Some(offset);
    }

    fn snap_scroll_to(&mut self, offset: u16) {
        self.calls.push(EngineCall::Snap(offset));
        self.target = None;
        self.position = offset;
    }

    fn current_scroll_position(&self) -> u16 {
        self.position
    }

    fn is_animating(&self) -> bool {
        self.target.is_some()
    }
}

/// s0..s3 with tops 0, 100, 200, 450 in a 100-row viewport; s2 is tall
pub(crate) fn fixture_layout() -> StepLayout {
    let geometry: [(&str, u16, u16); 4] = [("s0", 0, 100), ("s1", 100, 100), ("s2", 200, 250), ("s3", 450, 100)];
    StepLayout {
        viewport_height: 100,
        steps: geometry
            .iter()
            .map(|(id, top, height)| MeasuredStep {
                id: id.to_string(),
                top: *top,
                height: *height,
            })
            .collect(),
    }
}

pub(crate) fn fixture_registry() -> StepRegistry {
    StepRegistry::discover(&fixture_layout()).expect("fixture layout is valid")
}

/// Ordered record of hook invocations
#[derive(Debug, Clone, Default)]
pub(crate) struct HookLog(Rc<RefCell<Vec<String>>>);

impl HookLog {
    pub fn push(&self, entry: String) {
        self.0.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn lifecycle(&self, id: &str) -> StepBehavior {
        let (enter_log, exit_log) = (self.clone(), self.clone());
        let (enter_id, exit_id) = (id.to_string(), id.to_string());
        StepBehavior::new()
            .on_enter(move || enter_log.push(format!("enter {}", enter_id)))
            .on_exit(move || exit_log.push(format!("exit {}", exit_id)))
    }

    pub fn next_gate(&self, id: &str, answer: bool) -> StepBehavior {
        let log = self.clone();
        let id = id.to_string();
        StepBehavior::new().go_next(move |_| {
            log.push(format!("next {}", id));
            answer
        })
    }

    pub fn prev_gate(&self, id: &str, answer: bool) -> StepBehavior {
        let log = self.clone();
        let id = id.to_string();
        StepBehavior::new().go_prev(move |_| {
            log.push(format!("prev {}", id));
            answer
        })
    }
}
