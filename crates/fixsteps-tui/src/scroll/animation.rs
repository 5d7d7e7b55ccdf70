//! Scroll animation controller and the navigator's scroll engine.

use std::time::{Duration, Instant};

use fixsteps_core::{ScrollConfig, ScrollEngine};

use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp_u16, progress};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u16,
    to: u16,
    duration: Duration,
    easing: EasingType,
}

/// Scroll animation controller
///
/// Step transitions arrive through [`ScrollEngine`]; free scrolling inside a
/// tall step goes through `scroll_by`. Call `update()` every frame to
/// advance whichever animation is running.
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current_scroll: u16,
    /// Free-scroll delta batched until the next frame
    pending_delta: i32,
    /// Transition duration for free scrolling
    free_scroll_duration: Duration,
    max_scroll: u16,
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl ScrollAnimator {
    const FREE_SCROLL_MS: u64 = 150;

    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current_scroll: 0,
            pending_delta: 0,
            free_scroll_duration: Duration::from_millis(Self::FREE_SCROLL_MS),
            max_scroll: u16::MAX,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Upper bound for free scrolling; step transitions are not clamped
    pub fn set_max_scroll(&mut self, max_scroll: u16) {
        self.max_scroll = max_scroll;
    }

    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.config.smooth_enabled
    }

    /// Check if there's pending work (animation or pending delta)
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Final position once the running animation ends
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current_scroll
    }

    /// Free scroll by a delta (positive = down). Batched until the next frame.
    pub fn scroll_by(&mut self, delta: i32) {
        if !self.is_smooth() {
            self.current_scroll = (self.current_scroll as i32 + delta)
                .clamp(0, self.max_scroll as i32) as u16;
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    pub fn scroll_half_page_down(&mut self, viewport_height: u16) {
        self.scroll_by((viewport_height / 2).max(1) as i32);
    }

    pub fn scroll_half_page_up(&mut self, viewport_height: u16) {
        self.scroll_by(-((viewport_height / 2).max(1) as i32));
    }

    /// Advance to the current wall-clock time
    pub fn update(&mut self) -> u16 {
        self.update_at(Instant::now())
    }

    /// Advance the animation to `now` and return the visible scroll offset
    pub fn update_at(&mut self, now: Instant) -> u16 {
        if self.pending_delta != 0 {
            let target = (self.target_scroll() as i32 + self.pending_delta)
                .clamp(0, self.max_scroll as i32) as u16;
            self.pending_delta = 0;
            self.start_animation(target, self.free_scroll_duration, now);
        }

        if let Some(anim) = &self.animation {
            if is_complete(anim.start, anim.duration, now) {
                self.current_scroll = anim.to;
                self.animation = None;
            } else {
                let t = anim.easing.apply(progress(anim.start, anim.duration, now));
                self.current_scroll = lerp_u16(anim.from, anim.to, t);
            }
        }

        self.current_scroll
    }

    fn start_animation(&mut self, target: u16, duration: Duration, now: Instant) {
        if !self.is_smooth() || duration.is_zero() || target == self.current_scroll {
            self.current_scroll = target;
            self.animation = None;
            return;
        }
        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.current_scroll,
            to: target,
            duration,
            easing: self.config.easing,
        });
    }
}

impl ScrollEngine for ScrollAnimator {
    fn animate_scroll_to(&mut self, offset: u16, duration: Duration) {
        self.pending_delta = 0;
        self.start_animation(offset, duration, Instant::now());
    }

    fn snap_scroll_to(&mut self, offset: u16) {
        self.animation = None;
        self.pending_delta = 0;
        self.current_scroll = offset;
    }

    fn current_scroll_position(&self) -> u16 {
        self.current_scroll
    }

    fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}
