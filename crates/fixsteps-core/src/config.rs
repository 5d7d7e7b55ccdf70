use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub navigator: NavigatorConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
    /// Declarative per-step behavior, keyed by step id
    #[serde(default)]
    pub steps: BTreeMap<String, StepBehaviorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Timing of step transitions and the frame loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Duration of an animated step transition
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    /// Duration of the start-up reposition to the first step
    #[serde(default = "default_reposition_ms")]
    pub reposition_ms: u64,
    /// Reconciliation cycles per second while something is moving
    #[serde(default = "default_frame_fps")]
    pub frame_fps: u32,
    /// Input poll timeout while idle
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
            reposition_ms: default_reposition_ms(),
            frame_fps: default_frame_fps(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

/// Easing curve applied to scroll animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// Jump at the end of the duration
    None,
    Linear,
    /// Half-cosine ease-in-out
    #[default]
    Swing,
    Cubic,
    Quintic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate transitions; when false every scroll snaps
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: true,
            easing: EasingType::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Draw the clickable trigger buttons in the status bar
    #[serde(default = "default_true")]
    pub show_trigger_buttons: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_trigger_buttons: default_true(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "<C-d>" (Ctrl+d), "<S-Tab>" (Shift+Tab), "<Space>", "<Down>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Keys raising the forward-key signal
    #[serde(default = "default_keys_forward")]
    pub forward: Vec<String>,
    /// Keys raising the backward-key signal
    #[serde(default = "default_keys_backward")]
    pub backward: Vec<String>,
    /// Keys pressing the next trigger (moves toward earlier steps)
    #[serde(default = "default_keys_next_trigger")]
    pub next_trigger: Vec<String>,
    /// Keys pressing the prev trigger (moves toward later steps)
    #[serde(default = "default_keys_prev_trigger")]
    pub prev_trigger: Vec<String>,
    /// Free scroll half a page down (not a step signal)
    #[serde(default = "default_key_half_page_down")]
    pub half_page_down: String,
    #[serde(default = "default_key_half_page_up")]
    pub half_page_up: String,
    #[serde(default = "default_key_quit")]
    pub quit: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            forward: default_keys_forward(),
            backward: default_keys_backward(),
            next_trigger: default_keys_next_trigger(),
            prev_trigger: default_keys_prev_trigger(),
            half_page_down: default_key_half_page_down(),
            half_page_up: default_key_half_page_up(),
            quit: default_key_quit(),
        }
    }
}

/// Per-step behavior that can be expressed without code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepBehaviorConfig {
    /// Land on the step's bottom edge when entered moving backward
    #[serde(default)]
    pub enter_front_end: bool,
    /// Refuse forward traversal unless forced
    #[serde(default)]
    pub hold_forward: bool,
    /// Refuse backward traversal unless forced
    #[serde(default)]
    pub hold_backward: bool,
    /// Status message shown when the step is entered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter_message: Option<String>,
    /// Status message shown when the step is left
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_message: Option<String>,
}

fn default_keys_forward() -> Vec<String> {
    vec!["<Space>".to_string(), "<Down>".to_string(), "j".to_string()]
}
fn default_keys_backward() -> Vec<String> {
    vec!["<Up>".to_string(), "k".to_string()]
}
fn default_keys_next_trigger() -> Vec<String> {
    vec!["<PageUp>".to_string()]
}
fn default_keys_prev_trigger() -> Vec<String> {
    vec!["<PageDown>".to_string()]
}
fn default_key_half_page_down() -> String { "<C-d>".to_string() }
fn default_key_half_page_up() -> String { "<C-u>".to_string() }
fn default_key_quit() -> String { "q".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fixsteps")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_transition_ms() -> u64 {
    500
}

fn default_reposition_ms() -> u64 {
    400
}

fn default_frame_fps() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    250
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file or return defaults if it is missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/fixsteps/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("fixsteps")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("fixsteps.log")
    }
}
