//! Configuration management with hot-reload support

use crate::geometry::Placement;
use crate::keys::ModifierKey;
use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// Configuration for all popups
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Lifecycle tuning shared by every popup
    #[serde(default)]
    pub popup: PopupConfig,

    #[serde(default)]
    pub launcher: LauncherConfig,

    #[serde(default)]
    pub power: PowerConfig,

    /// Key chords that toggle the popups
    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PopupConfig {
    /// Delay between the off-screen layout pass and final placement (ms)
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Delay before re-reading the widget under the pointer after a rebuild (ms)
    #[serde(default = "default_hover_resync")]
    pub hover_resync_ms: u64,

    /// Dim the screen behind the popup
    #[serde(default)]
    pub overlay: bool,

    /// Take focus away from the active client while the popup is open
    #[serde(default = "default_true")]
    pub clear_focus_on_show: bool,
}

fn default_settle_delay() -> u64 {
    20
}

fn default_hover_resync() -> u64 {
    50
}

fn default_true() -> bool {
    true
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay(),
            hover_resync_ms: default_hover_resync(),
            overlay: false,
            clear_focus_on_show: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default = "default_launcher_width")]
    pub width: f32,

    #[serde(default = "default_launcher_height")]
    pub height: f32,

    /// Height of one catalog row
    #[serde(default = "default_item_height")]
    pub item_height: f32,

    /// Height taken by the search box and pinned row
    #[serde(default = "default_fixed_chrome")]
    pub fixed_chrome: f32,

    /// Maximum number of pinned entries
    #[serde(default = "default_max_pinned")]
    pub max_pinned: usize,

    /// Horizontal pointer travel that swaps a dragged pinned icon with its neighbor
    #[serde(default = "default_icon_cell_width")]
    pub icon_cell_width: f32,

    /// Rows scrolled per wheel notch
    #[serde(default = "default_scroll_step")]
    pub scroll_step: usize,

    /// Wrap from the last catalog row to the first and back
    #[serde(default)]
    pub wrap_list: bool,

    /// Program prefixed to commands launched in secondary mode
    #[serde(default = "default_elevate_command")]
    pub elevate_command: String,

    /// Held with Left/Right in the pinned row to reorder
    #[serde(default = "default_reorder_modifier")]
    pub reorder_modifier: ModifierKey,

    /// Held to switch items to their secondary (elevated) action
    #[serde(default = "default_secondary_modifier")]
    pub secondary_modifier: ModifierKey,

    #[serde(default)]
    pub placement: Placement,
}

fn default_launcher_width() -> f32 {
    460.0
}

fn default_launcher_height() -> f32 {
    560.0
}

fn default_item_height() -> f32 {
    36.0
}

fn default_fixed_chrome() -> f32 {
    128.0
}

fn default_max_pinned() -> usize {
    8
}

fn default_icon_cell_width() -> f32 {
    52.0
}

fn default_scroll_step() -> usize {
    3
}

fn default_elevate_command() -> String {
    "pkexec".to_string()
}

fn default_reorder_modifier() -> ModifierKey {
    ModifierKey::Control
}

fn default_secondary_modifier() -> ModifierKey {
    ModifierKey::Shift
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            width: default_launcher_width(),
            height: default_launcher_height(),
            item_height: default_item_height(),
            fixed_chrome: default_fixed_chrome(),
            max_pinned: default_max_pinned(),
            icon_cell_width: default_icon_cell_width(),
            scroll_step: default_scroll_step(),
            wrap_list: false,
            elevate_command: default_elevate_command(),
            reorder_modifier: default_reorder_modifier(),
            secondary_modifier: default_secondary_modifier(),
            placement: Placement::default(),
        }
    }
}

/// One button of the power menu
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerAction {
    pub label: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl PowerAction {
    fn new(label: &str, command: &str, args: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerConfig {
    #[serde(default = "default_power_actions")]
    pub actions: Vec<PowerAction>,

    #[serde(default = "default_button_width")]
    pub button_width: f32,

    #[serde(default)]
    pub placement: Placement,
}

fn default_power_actions() -> Vec<PowerAction> {
    if cfg!(target_os = "macos") {
        vec![
            PowerAction::new("Lock", "pmset", &["displaysleepnow"]),
            PowerAction::new("Sleep", "pmset", &["sleepnow"]),
            PowerAction::new(
                "Restart",
                "osascript",
                &["-e", "tell app \"System Events\" to restart"],
            ),
            PowerAction::new(
                "Shut Down",
                "osascript",
                &["-e", "tell app \"System Events\" to shut down"],
            ),
        ]
    } else {
        vec![
            PowerAction::new("Lock", "loginctl", &["lock-session"]),
            PowerAction::new("Suspend", "systemctl", &["suspend"]),
            PowerAction::new("Reboot", "systemctl", &["reboot"]),
            PowerAction::new("Power Off", "systemctl", &["poweroff"]),
        ]
    }
}

fn default_button_width() -> f32 {
    96.0
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            actions: default_power_actions(),
            button_width: default_button_width(),
            placement: Placement::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// evdev key codes held together to toggle the launcher (Super+Space)
    #[serde(default = "default_launcher_chord")]
    pub launcher_chord: Vec<u16>,

    /// evdev key codes held together to toggle the power menu (Super+Escape)
    #[serde(default = "default_power_chord")]
    pub power_chord: Vec<u16>,

    /// Debounce time to prevent accidental triggers (ms)
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,
}

fn default_launcher_chord() -> Vec<u16> {
    // KEY_LEFTMETA, KEY_SPACE
    vec![125, 57]
}

fn default_power_chord() -> Vec<u16> {
    // KEY_LEFTMETA, KEY_ESC
    vec![125, 1]
}

fn default_debounce() -> u64 {
    300
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            launcher_chord: default_launcher_chord(),
            power_chord: default_power_chord(),
            debounce_ms: default_debounce(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Inner margin of popup windows
    #[serde(default = "default_margin")]
    pub margin: f32,

    /// Dark mode (always true for now)
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

fn default_margin() -> f32 {
    8.0
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            dark_mode: true,
        }
    }
}

/// Project directories shared by config and pinned data
pub fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "popshell", "popshell")
        .context("Failed to determine config directory")
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        let config_dir = dirs.config_dir();
        fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        Ok(config_dir.join("config.json"))
    }

    /// Load config, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", path))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }
}

/// Configuration manager with hot-reload support
pub struct ConfigManager {
    config: Arc<RwLock<Config>>,
    _watcher: Option<RecommendedWatcher>,
    reloaded: Arc<AtomicBool>,
}

impl ConfigManager {
    /// Create a new config manager with file watching
    pub fn new() -> Result<Self> {
        let config_path = Config::config_path()?;
        let config = Arc::new(RwLock::new(Config::load_from(&config_path)?));
        let reloaded = Arc::new(AtomicBool::new(false));

        let watcher_config = config.clone();
        let watcher_reloaded = reloaded.clone();
        let watched_path = config_path.clone();
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
            if let Ok(event) = res {
                if (event.kind.is_modify() || event.kind.is_create())
                    && event.paths.iter().any(|p| p == &watched_path)
                {
                    match Config::load_from(&watched_path) {
                        Ok(new_config) => {
                            if let Ok(mut cfg) = watcher_config.write() {
                                *cfg = new_config;
                                watcher_reloaded.store(true, Ordering::SeqCst);
                                log::info!("Config hot-reloaded");
                            }
                        }
                        Err(e) => log::warn!("Ignoring config change: {:#}", e),
                    }
                }
            }
        })?;

        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?;
        watcher.watch(config_dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            config,
            _watcher: Some(watcher),
            reloaded,
        })
    }

    /// Get a read lock on the config
    pub fn get(&self) -> RwLockReadGuard<'_, Config> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if config was reloaded (non-blocking)
    pub fn check_reload(&self) -> bool {
        self.reloaded.swap(false, Ordering::SeqCst)
    }
}
