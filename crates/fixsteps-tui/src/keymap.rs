use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fixsteps_core::config::KeymapConfig;
use tracing::warn;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Raise the forward-key signal
    Forward,
    /// Raise the backward-key signal
    Backward,
    /// Same as clicking the status-bar trigger buttons
    NextTrigger,
    PrevTrigger,
    /// Free scroll within the current step
    HalfPageDown,
    HalfPageUp,
    /// Jump to the step at this index
    GoTo(usize),
    Quit,
}

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

impl From<&KeyEvent> for KeyBinding {
    fn from(key: &KeyEvent) -> Self {
        // Terminals disagree on whether uppercase letters carry SHIFT
        let modifiers = match key.code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => key.modifiers | KeyModifiers::SHIFT,
            _ => key.modifiers,
        };
        Self::new(key.code, modifiers)
    }
}

/// Runtime keymap for key-to-action lookup
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyBinding, KeyAction>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();

        let mut add_binding = |key_str: &str, action: KeyAction| {
            let Some(binding) = parse_key_binding(key_str) else {
                warn!("Invalid key binding: '{}', ignoring", key_str);
                return;
            };
            if let Some(existing) = bindings.get(&binding) {
                warn!(
                    "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                    key_str, existing, action
                );
            } else {
                bindings.insert(binding, action);
            }
        };

        add_binding(&config.quit, KeyAction::Quit);
        for key in &config.forward {
            add_binding(key, KeyAction::Forward);
        }
        for key in &config.backward {
            add_binding(key, KeyAction::Backward);
        }
        for key in &config.next_trigger {
            add_binding(key, KeyAction::NextTrigger);
        }
        for key in &config.prev_trigger {
            add_binding(key, KeyAction::PrevTrigger);
        }
        add_binding(&config.half_page_down, KeyAction::HalfPageDown);
        add_binding(&config.half_page_up, KeyAction::HalfPageUp);

        // Ctrl+C always quits; digits jump to steps unless rebound
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), KeyAction::Quit);
        for (index, digit) in ('1'..='9').enumerate() {
            bindings
                .entry(KeyBinding::simple(KeyCode::Char(digit)))
                .or_insert(KeyAction::GoTo(index));
        }

        Self { bindings }
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<KeyAction> {
        self.bindings.get(binding).copied()
    }

    pub fn lookup(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.get(&KeyBinding::from(key))
    }
}

/// Parse Vim-style key notation into KeyBinding
/// Supported formats:
/// - Single char: "j", "k", "q"; uppercase means Shift: "G"
/// - Ctrl / Shift / Alt: "<C-d>", "<S-Tab>", "<A-j>"
/// - Named keys: "<CR>", "<Esc>", "<Tab>", "<Space>", "<Up>", "<Down>", "<PageDown>", ...
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        return parse_special_key(inner);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if c.is_ascii_uppercase() {
        Some(KeyBinding::shift(KeyCode::Char(c)))
    } else {
        Some(KeyBinding::simple(KeyCode::Char(c)))
    }
}

/// Parse the content inside <...>
fn parse_special_key(inner: &str) -> Option<KeyBinding> {
    let prefixes = [
        ("C-", KeyModifiers::CONTROL),
        ("S-", KeyModifiers::SHIFT),
        ("A-", KeyModifiers::ALT),
        ("M-", KeyModifiers::ALT),
    ];
    for (prefix, modifiers) in prefixes {
        if let Some(rest) = inner.strip_prefix(prefix) {
            let code = parse_key_name(rest)?;
            // Shift+Tab arrives as BackTab
            let code = if code == KeyCode::Tab && modifiers == KeyModifiers::SHIFT {
                KeyCode::BackTab
            } else {
                code
            };
            return Some(KeyBinding::new(code, modifiers));
        }
    }
    parse_key_name(inner).map(KeyBinding::simple)
}

fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" => Some(KeyCode::BackTab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        other => {
            if let Some(n) = other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                return (1..=12).contains(&n).then_some(KeyCode::F(n));
            }
            let mut chars = name.chars();
            let c = chars.next()?;
            chars
                .next()
                .is_none()
                .then(|| KeyCode::Char(c.to_ascii_lowercase()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_and_uppercase() {
        assert_eq!(parse_key_binding("j"), Some(KeyBinding::simple(KeyCode::Char('j'))));
        assert_eq!(parse_key_binding("G"), Some(KeyBinding::shift(KeyCode::Char('G'))));
        assert_eq!(parse_key_binding("jj"), None);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_key_binding("<Space>"), Some(KeyBinding::simple(KeyCode::Char(' '))));
        assert_eq!(parse_key_binding("<Down>"), Some(KeyBinding::simple(KeyCode::Down)));
        assert_eq!(parse_key_binding("<C-d>"), Some(KeyBinding::ctrl(KeyCode::Char('d'))));
        assert_eq!(parse_key_binding("<S-Tab>"), Some(KeyBinding::shift(KeyCode::BackTab)));
        assert_eq!(parse_key_binding("<F5>"), Some(KeyBinding::simple(KeyCode::F(5))));
        assert_eq!(parse_key_binding("<F13>"), None);
        assert_eq!(parse_key_binding("<Nope>"), None);
    }

    #[test]
    fn test_default_keymap() {
        let keymap = Keymap::default();
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Char(' '))), Some(KeyAction::Forward));
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Down)), Some(KeyAction::Forward));
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Up)), Some(KeyAction::Backward));
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::PageUp)), Some(KeyAction::NextTrigger));
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::PageDown)), Some(KeyAction::PrevTrigger));
        assert_eq!(keymap.get(&KeyBinding::ctrl(KeyCode::Char('d'))), Some(KeyAction::HalfPageDown));
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Char('3'))), Some(KeyAction::GoTo(2)));
        assert_eq!(keymap.get(&KeyBinding::ctrl(KeyCode::Char('c'))), Some(KeyAction::Quit));
    }

    #[test]
    fn test_conflicts_keep_first_binding() {
        let config = KeymapConfig {
            forward: vec!["x".into()],
            backward: vec!["x".into(), "<Up>".into()],
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Char('x'))), Some(KeyAction::Forward));
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Up)), Some(KeyAction::Backward));
    }

    #[test]
    fn test_lookup_normalizes_uppercase() {
        let config = KeymapConfig {
            quit: "Q".into(),
            ..Default::default()
        };
        let keymap = Keymap::from_config(&config);
        let key = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::NONE);
        assert_eq!(keymap.lookup(&key), Some(KeyAction::Quit));
    }
}
