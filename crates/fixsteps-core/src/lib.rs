pub mod behavior;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod events;
pub mod navigator;
pub mod scheduler;
pub mod step;

#[cfg(test)]
mod testing;

pub use behavior::{BehaviorTable, Direction, StepBehavior, TraversalContext};
pub use config::{AppConfig, EasingType, ScrollConfig, StepBehaviorConfig};
pub use controller::{NavigationState, TransitionController, TransitionOptions};
pub use engine::ScrollEngine;
pub use error::{Error, Result};
pub use events::{EventAggregator, EventSnapshot, InputSignal, SignalSender};
pub use navigator::Navigator;
pub use scheduler::{Decision, ReconciliationScheduler, ResizeCorrection};
pub use step::{MeasuredStep, Step, StepLayout, StepRef, StepRegistry, StepSource};
