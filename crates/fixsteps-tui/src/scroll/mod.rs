//! Smooth scrolling for the step document.
//!
//! - `easing` - easing curves (swing, cubic, quintic)
//! - `timing` - progress and interpolation helpers
//! - `animation` - the [`ScrollAnimator`], which is the navigator's scroll engine
//!
//! # Usage
//!
//! ```ignore
//! use fixsteps_tui::scroll::ScrollAnimator;
//!
//! let mut animator = ScrollAnimator::new(config.scroll.clone());
//! animator.set_max_scroll(layout.max_scroll());
//!
//! // The navigator starts animations through the ScrollEngine trait;
//! // advance them once per frame
//! let scroll = animator.update();
//! ```

pub mod easing;
pub mod timing;

pub mod animation;

pub use animation::ScrollAnimator;
pub use easing::{EasingType, EasingTypeExt};
