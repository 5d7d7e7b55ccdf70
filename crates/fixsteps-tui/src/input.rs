use crossterm::event::{KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use fixsteps_core::{InputSignal, StepRef};
use ratatui::layout::{Position, Rect};

use crate::keymap::{KeyAction, Keymap};

/// Clickable element drawn by the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    NextTrigger,
    PrevTrigger,
    /// Chip carrying an explicit target step
    Step(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitArea {
    pub area: Rect,
    pub target: HitTarget,
}

/// What the app should do with one terminal event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Hand a signal to the navigator
    Signal(InputSignal),
    HalfPageDown,
    HalfPageUp,
    Quit,
    None,
}

/// Turns crossterm key and mouse events into navigator signals
#[derive(Debug, Clone)]
pub struct InputMapper {
    keymap: Keymap,
    /// Row where the left button went down outside any hit area
    drag_origin: Option<u16>,
    swipe_threshold: u16,
}

impl InputMapper {
    /// Rows a drag must travel before it counts as a swipe
    pub const DEFAULT_SWIPE_THRESHOLD: u16 = 3;

    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            drag_origin: None,
            swipe_threshold: Self::DEFAULT_SWIPE_THRESHOLD,
        }
    }

    pub fn map_key(&self, key: &KeyEvent) -> UiAction {
        match self.keymap.lookup(key) {
            Some(KeyAction::Forward) => UiAction::Signal(InputSignal::ForwardKey),
            Some(KeyAction::Backward) => UiAction::Signal(InputSignal::BackwardKey),
            Some(KeyAction::NextTrigger) => UiAction::Signal(InputSignal::NextTrigger),
            Some(KeyAction::PrevTrigger) => UiAction::Signal(InputSignal::PrevTrigger),
            Some(KeyAction::GoTo(index)) => UiAction::Signal(InputSignal::GoTo {
                target: StepRef::Index(index),
                force: false,
            }),
            Some(KeyAction::HalfPageDown) => UiAction::HalfPageDown,
            Some(KeyAction::HalfPageUp) => UiAction::HalfPageUp,
            Some(KeyAction::Quit) => UiAction::Quit,
            None => UiAction::None,
        }
    }

    pub fn map_mouse(&mut self, mouse: &MouseEvent, hit_areas: &[HitArea]) -> UiAction {
        match mouse.kind {
            MouseEventKind::ScrollDown => UiAction::Signal(InputSignal::Wheel { delta: 1 }),
            MouseEventKind::ScrollUp => UiAction::Signal(InputSignal::Wheel { delta: -1 }),
            MouseEventKind::Down(MouseButton::Left) => {
                let position = Position::new(mouse.column, mouse.row);
                match hit_areas.iter().find(|hit| hit.area.contains(position)) {
                    Some(hit) => {
                        self.drag_origin = None;
                        let force = mouse.modifiers.contains(KeyModifiers::CONTROL);
                        UiAction::Signal(click_signal(hit.target, force))
                    }
                    None => {
                        self.drag_origin = Some(mouse.row);
                        UiAction::None
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(origin) = self.drag_origin.take() else {
                    return UiAction::None;
                };
                if origin.saturating_sub(mouse.row) >= self.swipe_threshold {
                    UiAction::Signal(InputSignal::SwipeUp)
                } else if mouse.row.saturating_sub(origin) >= self.swipe_threshold {
                    UiAction::Signal(InputSignal::SwipeDown)
                } else {
                    UiAction::None
                }
            }
            _ => UiAction::None,
        }
    }
}

fn click_signal(target: HitTarget, force: bool) -> InputSignal {
    match target {
        HitTarget::NextTrigger => InputSignal::NextTrigger,
        HitTarget::PrevTrigger => InputSignal::PrevTrigger,
        HitTarget::Step(index) => InputSignal::GoTo {
            target: StepRef::Index(index),
            force,
        },
    }
}
