use fixsteps_core::{AppConfig, Decision, Navigator, SignalSender, Step};
use tracing::debug;

use crate::behaviors::{behavior_table, Notices};
use crate::document::Document;
use crate::event::AppEvent;
use crate::input::{HitArea, InputMapper, UiAction};
use crate::keymap::Keymap;
use crate::layout::DocumentLayout;
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

/// Rows reserved below the document for the status bar
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Terminal application state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    document: Document,
    layout: DocumentLayout,
    navigator: Navigator,
    animator: ScrollAnimator,
    signals: SignalSender,
    notices: Notices,
    input: InputMapper,
    /// Last message raised by a step hook
    pub status_message: Option<String>,
    /// Clickable areas from the last drawn status bar
    pub hit_areas: Vec<HitArea>,
    pub should_quit: bool,
}

impl App {
    /// Lay the document out for a `width` x `height` terminal and discover
    /// its steps.
    pub fn new(config: AppConfig, document: Document, width: u16, height: u16) -> anyhow::Result<Self> {
        let layout = DocumentLayout::compute(&document, width, viewport_for(height))?;
        let notices = Notices::default();
        let behaviors = behavior_table(&config.steps, &notices);
        let navigator = Navigator::discover(&layout, behaviors, &config.navigator)?;

        let mut animator = ScrollAnimator::new(config.scroll.clone());
        animator.set_max_scroll(layout.max_scroll());

        let signals = navigator.sender();
        let input = InputMapper::new(Keymap::from_config(&config.keymap));

        Ok(Self {
            config,
            theme: Theme::default(),
            document,
            layout,
            navigator,
            animator,
            signals,
            notices,
            input,
            status_message: None,
            hit_areas: Vec::new(),
            should_quit: false,
        })
    }

    /// Settle on the first step and begin reconciling input
    pub fn start(&mut self) {
        self.navigator.start(&mut self.animator);
    }

    pub fn stop(&mut self) {
        self.navigator.stop();
    }

    pub fn handle_event(&mut self, event: AppEvent) -> anyhow::Result<()> {
        match event {
            AppEvent::Key(key) => {
                let action = self.input.map_key(&key);
                self.apply(action);
            }
            AppEvent::Mouse(mouse) => {
                let action = self.input.map_mouse(&mouse, &self.hit_areas);
                self.apply(action);
            }
            AppEvent::Resize(width, height) => self.resize(width, height)?,
            AppEvent::Tick => {}
        }
        Ok(())
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Signal(signal) => self.signals.send(signal),
            // Free scrolling would fight a running transition
            UiAction::HalfPageDown if !self.navigator.is_transitioning() => {
                self.animator.scroll_half_page_down(self.viewport_height());
            }
            UiAction::HalfPageUp if !self.navigator.is_transitioning() => {
                self.animator.scroll_half_page_up(self.viewport_height());
            }
            UiAction::Quit => self.should_quit = true,
            UiAction::HalfPageDown | UiAction::HalfPageUp | UiAction::None => {}
        }
    }

    /// Advance the scroll animation and run one reconciliation cycle
    pub fn frame(&mut self) -> Decision {
        self.animator.update();
        let decision = self.navigator.tick(&mut self.animator);
        if let Some(message) = self.notices.drain().pop() {
            self.status_message = Some(message);
        }
        decision
    }

    /// Re-wrap the document for the new terminal size, then let the
    /// navigator re-frame the current step.
    pub fn resize(&mut self, width: u16, height: u16) -> anyhow::Result<()> {
        debug!("Resize to {}x{}", width, height);
        self.layout = DocumentLayout::compute(&self.document, width, viewport_for(height))?;
        self.navigator.relayout(&self.layout)?;
        self.animator.set_max_scroll(self.layout.max_scroll());
        self.signals.resize();
        Ok(())
    }

    /// True while the loop should run at frame rate
    pub fn needs_fast_tick(&self) -> bool {
        self.animator.needs_update() || self.navigator.is_transitioning()
    }

    pub fn scroll(&self) -> u16 {
        self.animator.current_scroll()
    }

    pub fn viewport_height(&self) -> u16 {
        self.layout.viewport_height()
    }

    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.navigator.current_step()
    }
}

fn viewport_for(terminal_height: u16) -> u16 {
    terminal_height.saturating_sub(STATUS_BAR_HEIGHT).max(1)
}
