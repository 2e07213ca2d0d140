use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub navigator: NavigatorConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub embed: EmbedConfig,
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub ui: UiConfig,
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

/// How the navigator decides which section is current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigatorMode {
    /// Index is tracked explicitly; every move goes through `go_to`
    #[default]
    Chapter,
    /// Index is derived from the scroll offset with a reference-line scan
    Scan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatorConfig {
    #[serde(default)]
    pub mode: NavigatorMode,
    /// Section transition duration in milliseconds
    #[serde(default = "default_nav_duration")]
    pub duration_ms: u64,
    /// Window that absorbs trackpad momentum, refreshed by every wheel event
    #[serde(default = "default_wheel_cooldown")]
    pub wheel_cooldown_ms: u64,
    /// A wheel event this recent keeps the lock held after the animation ends
    #[serde(default = "default_settle_window")]
    pub settle_window_ms: u64,
    /// How often the settle check runs while the lock is held
    #[serde(default = "default_settle_recheck")]
    pub settle_recheck_ms: u64,
    /// Minimum vertical swipe distance that changes section
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold_px: f64,
    /// Content movement per pixel of finger movement (unset: 0.3 chapter, 1.0 scan)
    #[serde(default)]
    pub drag_factor: Option<f64>,
    /// Reference line for the scan mode, as a fraction of the viewport
    #[serde(default = "default_current_ratio")]
    pub current_ratio: f64,
    /// Scroll offset past which the header is compacted outside animations
    #[serde(default = "default_compact_scroll")]
    pub compact_scroll_px: f64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            mode: NavigatorMode::default(),
            duration_ms: default_nav_duration(),
            wheel_cooldown_ms: default_wheel_cooldown(),
            settle_window_ms: default_settle_window(),
            settle_recheck_ms: default_settle_recheck(),
            swipe_threshold_px: default_swipe_threshold(),
            drag_factor: None,
            current_ratio: default_current_ratio(),
            compact_scroll_px: default_compact_scroll(),
        }
    }
}

impl NavigatorConfig {
    /// Drag factor, falling back to the mode's default
    pub fn effective_drag_factor(&self) -> f64 {
        self.drag_factor.unwrap_or(match self.mode {
            NavigatorMode::Chapter => 0.3,
            NavigatorMode::Scan => 1.0,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Visible fraction required to reveal
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,
    /// Bottom root margin in pixels (negative shrinks the viewport)
    #[serde(default = "default_reveal_margin")]
    pub bottom_margin_px: f64,
    /// Whether intersection observation is available; false reveals everything at once
    #[serde(default = "default_true")]
    pub supported: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_reveal_threshold(),
            bottom_margin_px: default_reveal_margin(),
            supported: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(default = "default_counter_duration")]
    pub duration_ms: u64,
    #[serde(default = "default_counter_threshold")]
    pub threshold: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_counter_duration(),
            threshold: default_counter_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_carousel_threshold")]
    pub threshold: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            threshold: default_carousel_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Origins allowed to send resize messages (scheme://host[:port])
    #[serde(default = "default_trusted_origins")]
    pub trusted_origins: Vec<String>,
    /// Heights below this are ignored
    #[serde(default = "default_min_height")]
    pub min_height_px: f64,
    /// Maximum finger movement that still counts as a tap
    #[serde(default = "default_tap_slop")]
    pub tap_slop_px: f64,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            trusted_origins: default_trusted_origins(),
            min_height_px: default_min_height(),
            tap_slop_px: default_tap_slop(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Link target that triggers the transition
    #[serde(default = "default_trigger_href")]
    pub trigger_href: String,
    /// Where to go once the transition finishes
    #[serde(default = "default_trigger_href")]
    pub destination: String,
    /// Session flag written before navigating
    #[serde(default = "default_session_key")]
    pub session_key: String,
    #[serde(default = "default_title_start")]
    pub title_start: u32,
    #[serde(default = "default_title_full")]
    pub title_full: u32,
    #[serde(default = "default_break_frame")]
    pub break_frame: u32,
    #[serde(default = "default_nav_frame")]
    pub nav_frame: u32,
    /// Probability that a grid cell gets a background particle
    #[serde(default = "default_density")]
    pub density: f64,
    /// Fixed RNG seed (random when unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Title art lines
    #[serde(default = "default_title_art")]
    pub title_art: Vec<String>,
    /// Generate the departure sound
    #[serde(default = "default_true")]
    pub audio: bool,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            trigger_href: default_trigger_href(),
            destination: default_trigger_href(),
            session_key: default_session_key(),
            title_start: default_title_start(),
            title_full: default_title_full(),
            break_frame: default_break_frame(),
            nav_frame: default_nav_frame(),
            density: default_density(),
            seed: None,
            title_art: default_title_art(),
            audio: default_true(),
            sample_rate: default_sample_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Frame rate while something is animating
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Page pixels represented by one terminal row
    #[serde(default = "default_px_per_row")]
    pub px_per_row: f64,
    #[serde(default = "default_header_rows")]
    pub header_rows: u16,
    #[serde(default = "default_compact_header_rows")]
    pub compact_header_rows: u16,
    #[serde(default)]
    pub theme: ThemeColorOverrides,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            tick_rate_ms: default_tick_rate(),
            px_per_row: default_px_per_row(),
            header_rows: default_header_rows(),
            compact_header_rows: default_compact_header_rows(),
            theme: ThemeColorOverrides::default(),
        }
    }
}

/// Optional color overrides, hex strings ("#d4a850" or "d4a850")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub muted: Option<String>,
    pub accent: Option<String>,
    pub header: Option<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrollstop")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_nav_duration() -> u64 {
    600
}

fn default_wheel_cooldown() -> u64 {
    350
}

fn default_settle_window() -> u64 {
    200
}

fn default_settle_recheck() -> u64 {
    120
}

fn default_swipe_threshold() -> f64 {
    40.0
}

fn default_current_ratio() -> f64 {
    0.35
}

fn default_compact_scroll() -> f64 {
    50.0
}

fn default_reveal_threshold() -> f64 {
    0.08
}

fn default_reveal_margin() -> f64 {
    -40.0
}

fn default_counter_duration() -> u64 {
    1500
}

fn default_counter_threshold() -> f64 {
    0.5
}

fn default_carousel_threshold() -> f64 {
    0.15
}

fn default_trusted_origins() -> Vec<String> {
    vec![
        "https://www.instagram.com".to_string(),
        "https://instagram.com".to_string(),
    ]
}

fn default_min_height() -> f64 {
    100.0
}

fn default_tap_slop() -> f64 {
    12.0
}

fn default_trigger_href() -> String {
    "game.html".to_string()
}

fn default_session_key() -> String {
    "aq-play-intro".to_string()
}

fn default_title_start() -> u32 {
    20
}

fn default_title_full() -> u32 {
    36
}

fn default_break_frame() -> u32 {
    42
}

fn default_nav_frame() -> u32 {
    86
}

fn default_density() -> f64 {
    0.42
}

fn default_title_art() -> Vec<String> {
    vec![
        "╔══════════════════════════════╗".to_string(),
        "║   S C R O L L                ║".to_string(),
        "║         S T O P P E R        ║".to_string(),
        "╚══════════════════════════════╝".to_string(),
    ]
}

fn default_sample_rate() -> u32 {
    44_100
}

fn default_fps() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    100
}

fn default_px_per_row() -> f64 {
    16.0
}

fn default_header_rows() -> u16 {
    3
}

fn default_compact_header_rows() -> u16 {
    1
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
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
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults when it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
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

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollstop/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollstop")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scrollstop.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.navigator.mode, NavigatorMode::Chapter);
        assert_eq!(config.navigator.duration_ms, 600);
        assert_eq!(config.navigator.wheel_cooldown_ms, 350);
        assert_eq!(config.navigator.swipe_threshold_px, 40.0);
        assert_eq!(config.counter.duration_ms, 1500);
        assert_eq!(config.embed.min_height_px, 100.0);
        assert_eq!(config.transition.nav_frame, 86);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [navigator]
            mode = "scan"
            duration_ms = 400

            [embed]
            trusted_origins = ["https://example.com"]
            "#,
        )
        .unwrap();
        assert_eq!(config.navigator.mode, NavigatorMode::Scan);
        assert_eq!(config.navigator.duration_ms, 400);
        assert_eq!(config.navigator.wheel_cooldown_ms, 350);
        assert_eq!(config.embed.trusted_origins, vec!["https://example.com"]);
        assert_eq!(config.embed.tap_slop_px, 12.0);
    }

    #[test]
    fn test_drag_factor_follows_mode() {
        let mut nav = NavigatorConfig::default();
        assert_eq!(nav.effective_drag_factor(), 0.3);
        nav.mode = NavigatorMode::Scan;
        assert_eq!(nav.effective_drag_factor(), 1.0);
        nav.drag_factor = Some(0.5);
        assert_eq!(nav.effective_drag_factor(), 0.5);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[navigator]\nmode = 3").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.transition.session_key, "aq-play-intro");
    }
}
