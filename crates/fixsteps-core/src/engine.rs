use std::time::Duration;

/// The scroll primitive the controller drives.
///
/// Completion of an animation is observed by the controller polling
/// [`ScrollEngine::is_animating`] once per frame.
pub trait ScrollEngine {
    /// Start animating toward `offset` over `duration`
    fn animate_scroll_to(&mut self, offset: u16, duration: Duration);

    /// Jump to `offset`, cancelling any running animation
    fn snap_scroll_to(&mut self, offset: u16);

    fn current_scroll_position(&self) -> u16;

    fn is_animating(&self) -> bool;
}
