//! Event aggregation: input producers push signals, the scheduler drains
//! them into one snapshot per cycle.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use crate::step::StepRef;

/// Discrete input occurrence, already classified by the input source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSignal {
    ForwardKey,
    BackwardKey,
    /// Wheel movement; only the sign of `delta` matters
    Wheel { delta: i32 },
    /// Upward swipe gesture (moves forward)
    SwipeUp,
    /// Downward swipe gesture (moves backward)
    SwipeDown,
    NextTrigger,
    PrevTrigger,
    /// Explicit jump request
    GoTo { target: StepRef, force: bool },
    Resize,
}

/// Explicit target recorded in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoToRequest {
    pub target: StepRef,
    pub force: bool,
}

/// Everything requested since the last reconciliation cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSnapshot {
    pub forward_key: bool,
    pub backward_key: bool,
    pub wheel_forward: bool,
    pub wheel_backward: bool,
    pub swipe_up: bool,
    pub swipe_down: bool,
    pub next_trigger: bool,
    pub prev_trigger: bool,
    pub resize: bool,
    pub go_to: Option<GoToRequest>,
}

impl EventSnapshot {
    pub fn record(&mut self, signal: InputSignal) {
        match signal {
            InputSignal::ForwardKey => self.forward_key = true,
            InputSignal::BackwardKey => self.backward_key = true,
            InputSignal::Wheel { delta } if delta > 0 => self.wheel_forward = true,
            InputSignal::Wheel { .. } => self.wheel_backward = true,
            InputSignal::SwipeUp => self.swipe_up = true,
            InputSignal::SwipeDown => self.swipe_down = true,
            InputSignal::NextTrigger => self.next_trigger = true,
            InputSignal::PrevTrigger => self.prev_trigger = true,
            // Latest request wins
            InputSignal::GoTo { target, force } => self.go_to = Some(GoToRequest { target, force }),
            InputSignal::Resize => self.resize = true,
        }
    }

    /// Signals that move to the next step. An upward swipe and the
    /// prev-trigger count as forward.
    pub fn wants_forward(&self) -> bool {
        self.forward_key || self.wheel_forward || self.swipe_up || self.prev_trigger
    }

    /// Signals that move to the previous step. A downward swipe and the
    /// next-trigger count as backward.
    pub fn wants_backward(&self) -> bool {
        self.backward_key || self.wheel_backward || self.swipe_down || self.next_trigger
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Producer handle. Cheap to clone; never reads or resets the snapshot.
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: UnboundedSender<InputSignal>,
}

impl SignalSender {
    pub fn send(&self, signal: InputSignal) {
        if self.tx.send(signal).is_err() {
            trace!("Signal dropped, aggregator is gone");
        }
    }

    pub fn forward_key(&self) {
        self.send(InputSignal::ForwardKey);
    }

    pub fn backward_key(&self) {
        self.send(InputSignal::BackwardKey);
    }

    pub fn wheel(&self, delta: i32) {
        self.send(InputSignal::Wheel { delta });
    }

    pub fn swipe_up(&self) {
        self.send(InputSignal::SwipeUp);
    }

    pub fn swipe_down(&self) {
        self.send(InputSignal::SwipeDown);
    }

    pub fn next_trigger(&self) {
        self.send(InputSignal::NextTrigger);
    }

    pub fn prev_trigger(&self) {
        self.send(InputSignal::PrevTrigger);
    }

    pub fn go_to(&self, target: impl Into<StepRef>, force: bool) {
        self.send(InputSignal::GoTo {
            target: target.into(),
            force,
        });
    }

    pub fn resize(&self) {
        self.send(InputSignal::Resize);
    }
}

/// Owns the receiving side of the signal channel
#[derive(Debug)]
pub struct EventAggregator {
    tx: UnboundedSender<InputSignal>,
    rx: UnboundedReceiver<InputSignal>,
}

impl Default for EventAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventAggregator {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> SignalSender {
        SignalSender {
            tx: self.tx.clone(),
        }
    }

    /// Fold every queued signal into a fresh snapshot. Signals pushed after
    /// this call belong to the next cycle.
    pub fn take_snapshot(&mut self) -> EventSnapshot {
        let mut snapshot = EventSnapshot::default();
        while let Ok(signal) = self.rx.try_recv() {
            snapshot.record(signal);
        }
        snapshot
    }

    /// Drop everything queued so far
    pub fn clear(&mut self) {
        let _ = self.take_snapshot();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_fold_into_snapshot() {
        let mut aggregator = EventAggregator::new();
        let sender = aggregator.sender();
        sender.forward_key();
        sender.forward_key();
        sender.wheel(-3);
        sender.resize();

        let snapshot = aggregator.take_snapshot();
        assert!(snapshot.forward_key);
        assert!(snapshot.wheel_backward);
        assert!(!snapshot.wheel_forward);
        assert!(snapshot.resize);

        // Taking resets
        assert!(aggregator.take_snapshot().is_empty());
    }

    #[test]
    fn test_wheel_sign() {
        let mut snapshot = EventSnapshot::default();
        snapshot.record(InputSignal::Wheel { delta: 1 });
        assert!(snapshot.wheel_forward && !snapshot.wheel_backward);

        let mut snapshot = EventSnapshot::default();
        snapshot.record(InputSignal::Wheel { delta: 0 });
        assert!(snapshot.wheel_backward && !snapshot.wheel_forward);
    }

    #[test]
    fn test_latest_go_to_wins() {
        let mut aggregator = EventAggregator::new();
        let sender = aggregator.sender();
        sender.go_to("s2", false);
        sender.go_to("s3", true);

        let snapshot = aggregator.take_snapshot();
        assert_eq!(
            snapshot.go_to,
            Some(GoToRequest {
                target: StepRef::Id("s3".into()),
                force: true
            })
        );
    }

    #[test]
    fn test_gesture_and_trigger_mapping() {
        let forward = [
            InputSignal::ForwardKey,
            InputSignal::Wheel { delta: 4 },
            InputSignal::SwipeUp,
            InputSignal::PrevTrigger,
        ];
        for signal in forward {
            let mut snapshot = EventSnapshot::default();
            snapshot.record(signal.clone());
            assert!(snapshot.wants_forward(), "{:?}", signal);
            assert!(!snapshot.wants_backward(), "{:?}", signal);
        }

        let backward = [
            InputSignal::BackwardKey,
            InputSignal::Wheel { delta: -4 },
            InputSignal::SwipeDown,
            InputSignal::NextTrigger,
        ];
        for signal in backward {
            let mut snapshot = EventSnapshot::default();
            snapshot.record(signal.clone());
            assert!(snapshot.wants_backward(), "{:?}", signal);
            assert!(!snapshot.wants_forward(), "{:?}", signal);
        }
    }

    #[test]
    fn test_clear_discards_pending() {
        let mut aggregator = EventAggregator::new();
        aggregator.sender().swipe_up();
        aggregator.clear();
        assert!(aggregator.take_snapshot().is_empty());
    }
}
