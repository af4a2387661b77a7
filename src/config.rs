use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::pathfinding::Heuristic;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Workspace size in continuous pixels
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// Block factor K between the danger map and the coarse grid
    #[serde(default = "default_downsample_factor")]
    pub downsample_factor: i32,
    #[serde(default)]
    pub heuristic: Heuristic,
}

/// Agent footprint and kinematics. The danger-zone padding is derived from
/// `width` and `height` and cannot be set on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_width")]
    pub width: f32,
    #[serde(default = "default_agent_height")]
    pub height: f32,
    /// Pixels per second
    #[serde(default = "default_linear_speed")]
    pub linear_speed: f32,
    /// Degrees per second
    #[serde(default = "default_rotation_speed_deg")]
    pub rotation_speed_deg: f32,
    #[serde(default = "default_arrival_tolerance")]
    pub arrival_tolerance: f32,
    #[serde(default = "default_heading_tolerance_deg")]
    pub heading_tolerance_deg: f32,
    /// Start position; the workspace centre when unset
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default)]
    pub show_grid: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_event_log")]
    pub enable_event_log: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

/// Largest workspace the full-resolution danger map may cover, in pixels
pub const MAX_WORKSPACE_PIXELS: i32 = 1 << 24;

// Default values
fn default_width() -> i32 { 900 }
fn default_height() -> i32 { 500 }
fn default_downsample_factor() -> i32 { 10 }
fn default_agent_width() -> f32 { 50.0 }
fn default_agent_height() -> f32 { 75.0 }
fn default_linear_speed() -> f32 { 180.0 }
fn default_rotation_speed_deg() -> f32 { 60.0 }
fn default_arrival_tolerance() -> f32 { 5.0 }
fn default_heading_tolerance_deg() -> f32 { 1.0 }
fn default_window_title() -> String { "AMR simulation".to_string() }
fn default_bg_r() -> u8 { 255 }
fn default_bg_g() -> u8 { 255 }
fn default_bg_b() -> u8 { 255 }
fn default_enable_event_log() -> bool { true }
fn default_event_log_path() -> String { "event_log.json".to_string() }

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            downsample_factor: default_downsample_factor(),
            heuristic: Heuristic::default(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            width: default_agent_width(),
            height: default_agent_height(),
            linear_speed: default_linear_speed(),
            rotation_speed_deg: default_rotation_speed_deg(),
            arrival_tolerance: default_arrival_tolerance(),
            heading_tolerance_deg: default_heading_tolerance_deg(),
            x: None,
            y: None,
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_grid: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_event_log: default_enable_event_log(),
            event_log_path: default_event_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: WorkspaceConfig::default(),
            planner: PlannerConfig::default(),
            agent: AgentConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Collision radius: half the footprint diagonal
    pub fn half_diagonal(&self) -> f32 {
        (self.width / 2.0).hypot(self.height / 2.0)
    }
}

impl Config {
    /// Load configuration from `config.toml`, or use defaults if it is missing or invalid
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    warn!("Using default configuration");
                    Config::default()
                }
            },
            Err(_) => {
                info!("No {} found, using default configuration", path.display());
                Config::default()
            }
        }
    }

    /// Parse a TOML document, rejecting unusable values
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        use crate::error::NavError;

        if self.workspace.width <= 0 || self.workspace.height <= 0 {
            return Err(NavError::Config(format!(
                "workspace must have positive size, got {}x{}",
                self.workspace.width, self.workspace.height
            )));
        }
        match self.workspace.width.checked_mul(self.workspace.height) {
            Some(pixels) if pixels <= MAX_WORKSPACE_PIXELS => {}
            _ => {
                return Err(NavError::Config(format!(
                    "workspace {}x{} exceeds the {} pixel limit",
                    self.workspace.width, self.workspace.height, MAX_WORKSPACE_PIXELS
                )))
            }
        }
        if self.planner.downsample_factor < 1 {
            return Err(NavError::Config(format!(
                "downsample_factor must be at least 1, got {}",
                self.planner.downsample_factor
            )));
        }
        if self.agent.width <= 0.0 || self.agent.height <= 0.0 {
            return Err(NavError::Config("agent footprint must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavError;

    #[test]
    fn test_defaults_match_reference_workspace() {
        let config = Config::default();
        assert_eq!((config.workspace.width, config.workspace.height), (900, 500));
        assert_eq!(config.planner.downsample_factor, 10);
        assert_eq!(config.planner.heuristic, Heuristic::SquaredEuclidean);
        assert!((config.agent.half_diagonal() - 45.069).abs() < 0.01);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [planner]
            heuristic = "chebyshev"

            [agent]
            width = 30.0
            height = 40.0
            "#,
        )
        .unwrap();

        assert_eq!(config.planner.heuristic, Heuristic::Chebyshev);
        assert_eq!(config.planner.downsample_factor, 10);
        assert_eq!(config.agent.half_diagonal(), 25.0);
        assert_eq!(config.workspace.width, 900);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_factor = Config::from_toml_str("[planner]\ndownsample_factor = 0\n");
        assert!(matches!(bad_factor, Err(NavError::Config(_))));

        let bad_syntax = Config::from_toml_str("[workspace\nwidth = 3");
        assert!(matches!(bad_syntax, Err(NavError::Config(_))));
    }

    #[test]
    fn test_oversized_workspace_rejected() {
        let overflowing = Config::from_toml_str("[workspace]\nwidth = 50000\nheight = 50000\n");
        assert!(matches!(overflowing, Err(NavError::Config(_))));

        let too_large = Config::from_toml_str("[workspace]\nwidth = 8192\nheight = 4096\n");
        assert!(matches!(too_large, Err(NavError::Config(_))));

        let at_limit = Config::from_toml_str("[workspace]\nwidth = 4096\nheight = 4096\n").unwrap();
        assert_eq!(at_limit.workspace.width, 4096);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load_from("does/not/exist.toml");
        assert_eq!(config.workspace.height, 500);
    }
}
