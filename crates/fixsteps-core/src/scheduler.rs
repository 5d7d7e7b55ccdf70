//! Reconciliation: one decision per frame from the aggregated signals.

use tracing::debug;

use crate::controller::{TransitionController, TransitionOptions};
use crate::engine::ScrollEngine;
use crate::events::{EventAggregator, SignalSender};
use crate::step::StepRef;

/// What a resize cycle did to keep the current step framed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeCorrection {
    /// View was above the step; snapped to its top
    Top,
    /// View was below the step's bottom; snapped to its bottom
    Bottom,
    /// View was inside the step
    None,
}

/// Outcome of one reconciliation cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Scheduler is detached
    Stopped,
    /// Controller has not been initialized yet
    NoCurrentStep,
    /// `started` is false when the correction was refused, e.g. while locked
    Resize { correction: ResizeCorrection, started: bool },
    GoTo { target: StepRef, started: bool },
    Next { started: bool },
    Prev { started: bool },
    /// View drifted past the current step's bottom
    PassiveNext { started: bool },
    /// View drifted above the current step's top
    PassivePrev { started: bool },
    Idle,
}

#[derive(Debug, Default)]
pub struct ReconciliationScheduler {
    aggregator: EventAggregator,
    running: bool,
}

impl ReconciliationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> SignalSender {
        self.aggregator.sender()
    }

    /// Attach to the frame loop. Signals queued while detached are dropped.
    pub fn start(&mut self) {
        self.aggregator.clear();
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one cycle. First match wins: resize, explicit target, forward,
    /// backward, then passive boundary checks when nothing is in flight.
    pub fn run_cycle(
        &mut self,
        controller: &mut TransitionController,
        engine: &mut dyn ScrollEngine,
    ) -> Decision {
        if !self.running {
            return Decision::Stopped;
        }
        let Some(step) = controller.current_step().cloned() else {
            return Decision::NoCurrentStep;
        };

        let snapshot = self.aggregator.take_snapshot();
        let viewport = controller.registry().viewport_height();
        let scroll = engine.current_scroll_position();

        let decision = if snapshot.resize {
            let current = StepRef::Index(step.index());
            if scroll < step.top() {
                Decision::Resize {
                    correction: ResizeCorrection::Top,
                    started: controller.go_to_step(engine, &current, TransitionOptions::snap()),
                }
            } else if scroll > step.viewport_bottom(viewport) {
                Decision::Resize {
                    correction: ResizeCorrection::Bottom,
                    started: controller.go_to_step(
                        engine,
                        &current,
                        TransitionOptions::snap().to_bottom(),
                    ),
                }
            } else {
                Decision::Resize {
                    correction: ResizeCorrection::None,
                    started: false,
                }
            }
        } else if let Some(go_to) = snapshot.go_to {
            let options = TransitionOptions::default().forced(go_to.force);
            let started = controller.go_to_step(engine, &go_to.target, options);
            Decision::GoTo {
                target: go_to.target,
                started,
            }
        } else if snapshot.wants_forward() {
            Decision::Next {
                started: controller.go_next_step(engine, TransitionOptions::default()),
            }
        } else if snapshot.wants_backward() {
            Decision::Prev {
                started: controller.go_prev_step(engine, TransitionOptions::default()),
            }
        } else if !controller.is_transitioning() {
            if scroll > step.viewport_bottom(viewport) {
                Decision::PassiveNext {
                    started: controller.go_next_step(engine, TransitionOptions::default()),
                }
            } else if scroll.saturating_add(1) < step.top() {
                // One row of slack for rounding drift
                Decision::PassivePrev {
                    started: controller.go_prev_step(engine, TransitionOptions::default()),
                }
            } else {
                Decision::Idle
            }
        } else {
            Decision::Idle
        };

        controller.record_scroll(engine.current_scroll_position());
        if decision != Decision::Idle {
            debug!("Reconciled at {}: {:?}", scroll, decision);
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BehaviorTable;
    use crate::config::NavigatorConfig;
    use crate::testing::{fixture_registry, HookLog, RecordingEngine};
    use std::time::Duration;

    fn setup(behaviors: BehaviorTable) -> (ReconciliationScheduler, TransitionController, RecordingEngine) {
        let mut engine = RecordingEngine::default();
        let mut controller =
            TransitionController::new(fixture_registry(), behaviors, &NavigatorConfig::default());
        controller.initialize(&mut engine);
        let mut scheduler = ReconciliationScheduler::new();
        scheduler.start();
        (scheduler, controller, engine)
    }

    fn move_to(
        index: usize,
        controller: &mut TransitionController,
        engine: &mut RecordingEngine,
    ) {
        assert!(controller.go_to_step(engine, &StepRef::Index(index), TransitionOptions::snap()));
        engine.calls.clear();
    }

    #[test]
    fn test_forward_key_scenario() {
        let log = HookLog::default();
        let behaviors = BehaviorTable::new()
            .with("s1", log.lifecycle("s1"))
            .with("s2", log.lifecycle("s2"));
        let (mut scheduler, mut controller, mut engine) = setup(behaviors);
        move_to(1, &mut controller, &mut engine);
        log.clear();

        scheduler.sender().forward_key();
        let decision = scheduler.run_cycle(&mut controller, &mut engine);
        assert_eq!(decision, Decision::Next { started: true });
        assert_eq!(log.entries(), vec!["exit s1"]);

        engine.finish_animation();
        controller.poll_completion(&mut engine);
        assert_eq!(controller.current_step().map(|s| s.id()), Some("s2"));
        assert_eq!(log.entries(), vec!["exit s1", "enter s2"]);
    }

    #[test]
    fn test_go_to_scenario() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        scheduler.sender().go_to("s3", false);

        let decision = scheduler.run_cycle(&mut controller, &mut engine);
        assert_eq!(
            decision,
            Decision::GoTo {
                target: "s3".into(),
                started: true
            }
        );
        assert_eq!(engine.animations(), vec![(450, Duration::from_millis(500))]);

        engine.finish_animation();
        controller.poll_completion(&mut engine);
        assert_eq!(controller.current_step().map(|s| s.id()), Some("s3"));
    }

    #[test]
    fn test_go_to_force_reaches_hooks() {
        let behaviors = BehaviorTable::new().with(
            "s0",
            crate::behavior::StepBehavior::new().go_next(|ctx| ctx.force),
        );
        let (mut scheduler, mut controller, mut engine) = setup(behaviors);

        scheduler.sender().go_to("s2", false);
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::GoTo {
                target: "s2".into(),
                started: false
            }
        );

        scheduler.sender().go_to("s2", true);
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::GoTo {
                target: "s2".into(),
                started: true
            }
        );
    }

    #[test]
    fn test_resize_wins_over_forward() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        move_to(1, &mut controller, &mut engine);
        engine.position = 60;

        let sender = scheduler.sender();
        sender.forward_key();
        sender.resize();
        let decision = scheduler.run_cycle(&mut controller, &mut engine);

        assert_eq!(
            decision,
            Decision::Resize {
                correction: ResizeCorrection::Top,
                started: true
            }
        );
        assert_eq!(engine.position, 100);
        assert!(engine.animations().is_empty());
        assert_eq!(controller.state().current(), Some(1));
        assert!(!controller.is_transitioning());

        // The forward signal was consumed with the snapshot
        assert_eq!(scheduler.run_cycle(&mut controller, &mut engine), Decision::Idle);
    }

    #[test]
    fn test_resize_below_snaps_to_bottom() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        move_to(2, &mut controller, &mut engine);
        engine.position = 380;

        scheduler.sender().resize();
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::Resize {
                correction: ResizeCorrection::Bottom,
                started: true
            }
        );
        assert_eq!(engine.position, 350);
        assert_eq!(controller.state().current(), Some(2));
    }

    #[test]
    fn test_resize_inside_step_does_nothing() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        move_to(2, &mut controller, &mut engine);
        engine.position = 300;

        scheduler.sender().resize();
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::Resize {
                correction: ResizeCorrection::None,
                started: false
            }
        );
        assert!(engine.calls.is_empty());
    }

    #[test]
    fn test_go_to_wins_over_direction_signals() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        let sender = scheduler.sender();
        sender.backward_key();
        sender.forward_key();
        sender.go_to("s2", false);

        assert!(matches!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::GoTo { started: true, .. }
        ));
        assert_eq!(engine.animations(), vec![(200, Duration::from_millis(500))]);
    }

    #[test]
    fn test_forward_wins_over_backward() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        move_to(1, &mut controller, &mut engine);
        let sender = scheduler.sender();
        sender.swipe_down();
        sender.wheel(2);

        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::Next { started: true }
        );
    }

    #[test]
    fn test_backward_signal_goes_prev() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        move_to(2, &mut controller, &mut engine);

        scheduler.sender().next_trigger();
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::Prev { started: true }
        );
        assert_eq!(engine.animations(), vec![(100, Duration::from_millis(500))]);
    }

    #[test]
    fn test_signals_while_locked_are_lost() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        let sender = scheduler.sender();

        sender.forward_key();
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::Next { started: true }
        );

        sender.forward_key();
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::Next { started: false }
        );
        assert_eq!(engine.animations().len(), 1);

        engine.finish_animation();
        controller.poll_completion(&mut engine);
        assert_eq!(scheduler.run_cycle(&mut controller, &mut engine), Decision::Idle);
        assert_eq!(controller.state().current(), Some(1));
    }

    #[test]
    fn test_passive_boundaries() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        move_to(2, &mut controller, &mut engine);

        // Inside s2 (200..=350) nothing happens
        engine.position = 350;
        assert_eq!(scheduler.run_cycle(&mut controller, &mut engine), Decision::Idle);

        // One row above the top is tolerated
        engine.position = 199;
        assert_eq!(scheduler.run_cycle(&mut controller, &mut engine), Decision::Idle);

        engine.position = 198;
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::PassivePrev { started: true }
        );
        engine.finish_animation();
        controller.poll_completion(&mut engine);
        assert_eq!(controller.state().current(), Some(1));

        engine.position = 101;
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::PassiveNext { started: true }
        );
    }

    #[test]
    fn test_passive_skipped_while_transitioning() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        assert!(controller.go_to_step(&mut engine, &"s3".into(), TransitionOptions::default()));
        engine.position = 250;

        assert_eq!(scheduler.run_cycle(&mut controller, &mut engine), Decision::Idle);
        assert_eq!(controller.state().last_scroll(), 250);
    }

    #[test]
    fn test_stopped_scheduler_does_nothing() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        scheduler.stop();
        scheduler.sender().forward_key();
        assert_eq!(scheduler.run_cycle(&mut controller, &mut engine), Decision::Stopped);

        // Restarting drops what queued up while detached
        scheduler.start();
        assert_eq!(scheduler.run_cycle(&mut controller, &mut engine), Decision::Idle);
    }

    #[test]
    fn test_no_current_step_keeps_signals() {
        let mut engine = RecordingEngine::default();
        let mut controller = TransitionController::new(
            fixture_registry(),
            BehaviorTable::new(),
            &NavigatorConfig::default(),
        );
        let mut scheduler = ReconciliationScheduler::new();
        scheduler.start();
        scheduler.sender().forward_key();

        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::NoCurrentStep
        );

        controller.initialize(&mut engine);
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::Next { started: true }
        );
    }

    #[test]
    fn test_resize_while_locked_reports_refusal() {
        let (mut scheduler, mut controller, mut engine) = setup(BehaviorTable::new());
        let sender = scheduler.sender();
        sender.forward_key();
        scheduler.run_cycle(&mut controller, &mut engine);
        assert!(controller.is_transitioning());

        // Current is still s0 while the view animates toward s1
        engine.position = 150;
        sender.resize();
        assert_eq!(
            scheduler.run_cycle(&mut controller, &mut engine),
            Decision::Resize {
                correction: ResizeCorrection::Bottom,
                started: false
            }
        );
        assert!(controller.is_transitioning());
        assert_eq!(engine.animations().len(), 1);
    }
}
