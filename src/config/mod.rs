//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::overlay::{Alignment, GraphicStyle};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Viewport the image is fitted into
    pub viewport: ViewportSettings,
    /// Overlay settings
    pub overlay: OverlaySettings,
    /// Recognition settings
    pub recognition: RecognitionSettings,
    /// Output rendering settings
    pub render: RenderSettings,
}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Overlay-related settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Placement of the scaled image inside the viewport
    pub alignment: Alignment,
    /// Style applied to every text graphic
    pub style: GraphicStyle,
}

/// Which bitmap is handed to the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionInput {
    /// The scaled bitmap currently on screen
    #[default]
    Displayed,
    /// The original, full-resolution bitmap
    Source,
}

/// Recognition-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionSettings {
    /// Bitmap the recognizer runs on
    pub input: RecognitionInput,
    /// How long to wait for a result before giving up, in milliseconds
    pub timeout_ms: u64,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            input: RecognitionInput::Displayed,
            timeout_ms: 10_000,
        }
    }
}

/// Output rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Background color (RGBA) for the area not covered by the image
    pub background: [u8; 4],
    /// Font used to rasterize labels; without one labels only reach the report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_font: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            background: [32, 32, 32, 255],
            label_font: None,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "textoverlay", "TextOverlay")
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}
