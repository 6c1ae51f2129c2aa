// src/config.rs - Settings with documented defaults, loaded from TOML
use crate::error::{JumpError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Longest accepted "T-pose accepted" notice
pub const MAX_CONFIRMATION_SECS: f64 = 3600.0;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Detection thresholds, all in normalized image units (0 = top, 1 = bottom).
///
/// These scale with how far the subject stands from the camera, so the same
/// values are more sensitive for a distant subject than for a close one.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    /// Landmarks must score strictly above this to count as visible
    #[serde(default = "default_visibility")]
    pub visibility: f64,
    /// Max shoulder/elbow height gap for an arm to count as horizontal
    #[serde(default = "default_tolerance")]
    pub arm_tolerance: f64,
    /// Hip rise above the baseline that starts a jump
    #[serde(default = "default_tolerance")]
    pub takeoff: f64,
    /// Distance from the baseline that ends a jump
    #[serde(default = "default_tolerance")]
    pub landing: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Real height of the user, used for calibration
    #[serde(default = "default_known_height_cm")]
    pub known_height_cm: f64,
    /// Append every completed jump to `jump_log_path`
    #[serde(default = "default_true")]
    pub save_heights: bool,
    #[serde(default = "default_jump_log_path")]
    pub jump_log_path: PathBuf,
    /// Draw the detected skeleton over the camera feed
    #[serde(default = "default_true")]
    pub show_pose: bool,
    /// How long the "T-pose accepted" notice stays up
    #[serde(default = "default_confirmation_secs")]
    pub confirmation_secs: f64,
    /// Number of best jumps shown
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Only feed the jump tracker frames where the whole body is visible
    #[serde(default = "default_true")]
    pub require_full_body_for_jumps: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub index: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

/// External pose estimator process
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bridge_command")]
    pub command: String,
    #[serde(default = "default_bridge_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_visibility() -> f64 {
    0.5
}

fn default_tolerance() -> f64 {
    0.05
}

fn default_known_height_cm() -> f64 {
    183.0
}

fn default_true() -> bool {
    true
}

fn default_jump_log_path() -> PathBuf {
    PathBuf::from("jump_heights.txt")
}

fn default_confirmation_secs() -> f64 {
    2.0
}

fn default_top_n() -> usize {
    3
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_fps() -> u32 {
    30
}

fn default_bridge_command() -> String {
    "python3".to_string()
}

fn default_bridge_args() -> Vec<String> {
    vec!["pose_bridge.py".to_string()]
}

fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("JumpTracker")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            visibility: default_visibility(),
            arm_tolerance: default_tolerance(),
            takeoff: default_tolerance(),
            landing: default_tolerance(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            known_height_cm: default_known_height_cm(),
            save_heights: true,
            jump_log_path: default_jump_log_path(),
            show_pose: true,
            confirmation_secs: default_confirmation_secs(),
            top_n: default_top_n(),
            require_full_body_for_jumps: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            command: default_bridge_command(),
            args: default_bridge_args(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output_dir: default_output_dir() }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|source| JumpError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file is missing or broken
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(JumpError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let session = &self.session;
        if !(session.known_height_cm.is_finite() && session.known_height_cm > 0.0) {
            return Err(JumpError::InvalidConfig(format!(
                "known_height_cm must be positive, got {}",
                session.known_height_cm
            )));
        }
        if session.top_n == 0 {
            return Err(JumpError::InvalidConfig("top_n must be at least 1".to_string()));
        }
        let secs = session.confirmation_secs;
        if !(0.0..=MAX_CONFIRMATION_SECS).contains(&secs) {
            return Err(JumpError::InvalidConfig(format!(
                "confirmation_secs must be between 0 and {}, got {}",
                MAX_CONFIRMATION_SECS, secs
            )));
        }

        let t = &self.thresholds;
        for (name, value) in [
            ("visibility", t.visibility),
            ("arm_tolerance", t.arm_tolerance),
            ("takeoff", t.takeoff),
            ("landing", t.landing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(JumpError::InvalidConfig(format!(
                    "threshold {} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
