//! Navigator: wires the controller and the reconciliation scheduler into
//! a single object driven by frame ticks.

use tracing::info;

use crate::behavior::BehaviorTable;
use crate::config::NavigatorConfig;
use crate::controller::{NavigationState, TransitionController};
use crate::engine::ScrollEngine;
use crate::events::SignalSender;
use crate::scheduler::{Decision, ReconciliationScheduler};
use crate::step::{Step, StepRegistry, StepSource};

pub struct Navigator {
    controller: TransitionController,
    scheduler: ReconciliationScheduler,
}

impl Navigator {
    pub fn new(registry: StepRegistry, behaviors: BehaviorTable, config: &NavigatorConfig) -> Self {
        Self {
            controller: TransitionController::new(registry, behaviors, config),
            scheduler: ReconciliationScheduler::new(),
        }
    }

    /// Discover steps from `source` and build a navigator over them
    pub fn discover(
        source: &dyn StepSource,
        behaviors: BehaviorTable,
        config: &NavigatorConfig,
    ) -> crate::Result<Self> {
        let registry = StepRegistry::discover(source)?;
        Ok(Self::new(registry, behaviors, config))
    }

    /// Handle for input producers
    pub fn sender(&self) -> SignalSender {
        self.scheduler.sender()
    }

    /// Attach to the frame loop. The first start makes the first step current.
    pub fn start(&mut self, engine: &mut dyn ScrollEngine) {
        self.controller.initialize(engine);
        self.scheduler.start();
        info!("Navigator started with {} steps", self.controller.registry().len());
    }

    /// Detach from the frame loop. A transition already in flight still
    /// completes on later ticks.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        info!("Navigator stopped");
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// One frame: deliver the completion notification if the engine is
    /// done, then reconcile pending input.
    pub fn tick(&mut self, engine: &mut dyn ScrollEngine) -> Decision {
        self.controller.poll_completion(engine);
        self.scheduler.run_cycle(&mut self.controller, engine)
    }

    /// Re-measure step geometry, e.g. before signalling a resize
    pub fn relayout(&mut self, source: &dyn StepSource) -> crate::Result<()> {
        self.controller.remeasure(source)
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    /// Direct access for programmatic jumps outside the signal path
    pub fn controller_mut(&mut self) -> &mut TransitionController {
        &mut self.controller
    }

    pub fn registry(&self) -> &StepRegistry {
        self.controller.registry()
    }

    pub fn state(&self) -> &NavigationState {
        self.controller.state()
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.controller.current_step()
    }

    pub fn is_transitioning(&self) -> bool {
        self.controller.is_transitioning()
    }
}
