//! TOML configuration for the initial view and the front-ends.
//!
//! Every section is optional; missing fields fall back to their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::interaction::{angle_from_slider, ViewState};
use crate::raster::FillRule;

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wire3dConfig {
    pub view: ViewConfig,
    pub raster: RasterConfig,
    pub terminal: TerminalConfig,
}

/// Initial interaction state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Radians; wrapped into [-pi, pi) when applied
    pub rotation_x: f32,
    pub rotation_y: f32,
    pub scale: u32,
    pub occlusion: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rotation_x: angle_from_slider(160),
            rotation_y: angle_from_slider(160),
            scale: 15,
            occlusion: false,
        }
    }
}

impl ViewConfig {
    pub fn to_view_state(&self) -> ViewState {
        let mut view = ViewState::new(self.rotation_x, self.rotation_y, self.scale);
        view.set_occlusion(self.occlusion);
        view
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub fill_rule: FillRule,
}

/// Terminal front-end settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Replaces `view.scale`; a terminal cell is far larger than a pixel
    pub scale: u32,
    /// Radians per key press
    pub rotation_step: f32,
    /// Pixels per pan key press
    pub pan_step: u32,
    /// Input polling rate
    pub frame_rate: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            scale: 2,
            rotation_step: 0.1,
            pan_step: 4,
            frame_rate: 30,
        }
    }
}

/// Check every range constraint, collecting all violations
pub fn validate(config: &Wire3dConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.view.scale == 0 {
        errors.push("view.scale must be at least 1".to_string());
    }
    if !config.view.rotation_x.is_finite() {
        errors.push("view.rotation_x must be finite".to_string());
    }
    if !config.view.rotation_y.is_finite() {
        errors.push("view.rotation_y must be finite".to_string());
    }
    if config.terminal.scale == 0 {
        errors.push("terminal.scale must be at least 1".to_string());
    }
    if !(config.terminal.rotation_step.is_finite() && config.terminal.rotation_step > 0.0) {
        errors.push("terminal.rotation_step must be a positive number".to_string());
    }
    if config.terminal.pan_step == 0 {
        errors.push("terminal.pan_step must be at least 1".to_string());
    }
    if !(1..=120).contains(&config.terminal.frame_rate) {
        errors.push(format!(
            "terminal.frame_rate must be 1-120, got {}",
            config.terminal.frame_rate
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}

/// Parse and validate config text
pub fn parse(content: &str) -> Result<Wire3dConfig, ConfigError> {
    let config: Wire3dConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Load config from a specific TOML file path
pub fn load_from_path(path: &Path) -> Result<Wire3dConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&content)?;
    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Platform config location, e.g. `~/.config/wire3d/config.toml` on Linux
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wire3d").join("config.toml"))
}

/// Load an explicit path, else the platform file if present, else defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Wire3dConfig, ConfigError> {
    if let Some(path) = path {
        return load_from_path(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load_from_path(&path),
        _ => {
            info!("no config file found, using defaults");
            Ok(Wire3dConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Wire3dConfig::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.view.scale, 15);
        assert_eq!(config.raster.fill_rule, FillRule::NonZero);
        assert!((config.view.rotation_x + 20f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(parse("").unwrap(), Wire3dConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse(
            r#"
[view]
scale = 4
occlusion = true

[raster]
fill_rule = "convex"
"#,
        )
        .unwrap();
        assert_eq!(config.view.scale, 4);
        assert!(config.view.occlusion);
        assert_eq!(config.raster.fill_rule, FillRule::Convex);
        assert_eq!(config.terminal, TerminalConfig::default());

        let view = config.view.to_view_state();
        assert!(view.occlusion);
        assert_eq!(view.scale, 4);
    }

    #[test]
    fn test_validation_collects_errors() {
        let err = parse("[view]\nscale = 0\n[terminal]\nframe_rate = 0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_fill_rule_is_parse_error() {
        assert!(matches!(
            parse("[raster]\nfill_rule = \"evenodd\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[terminal]\nscale = 3").unwrap();
        let config = load_from_path(file.path()).unwrap();
        assert_eq!(config.terminal.scale, 3);
        assert_eq!(load_or_default(Some(file.path())).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            load_or_default(Some(&path)),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
