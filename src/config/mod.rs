// SPDX-License-Identifier: MPL-2.0
//! This module handles the gallery configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[gallery]` - Page size, initial display mode and thumbnail size
//! - `[pagination]` - Loading reconciliation interval and edge proximity threshold
//! - `[stage]` - Render timeout, activation debounce and decoded image cache bounds
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` on the command line
//! 3. Set `ICED_GALLERY_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_gallery::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.gallery.page_size = Some(24);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::domain::DisplayMode;
use crate::error::{Error, Result};
use crate::pagination::{EdgeThreshold, ReconcileInterval};
use crate::stage::{CacheLimits, RenderTimeout};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Collection and layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    /// Items per page requested from the host.
    #[serde(default = "default_page_size", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    /// Layout shown when the gallery opens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<DisplayMode>,

    /// Thumbnail edge length in the thumbnails layout.
    #[serde(
        default = "default_thumbnail_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_size: Option<u32>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            display_mode: Some(DisplayMode::default()),
            thumbnail_size: default_thumbnail_size(),
        }
    }
}

/// Pagination bookkeeping settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationConfig {
    /// Delay between loading reconciliation checks.
    #[serde(
        default = "default_reconcile_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub reconcile_interval_ms: Option<u64>,

    /// Fraction of the scroll range treated as being at an edge.
    #[serde(
        default = "default_edge_threshold",
        skip_serializing_if = "Option::is_none"
    )]
    pub edge_threshold: Option<f32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_ms: default_reconcile_interval_ms(),
            edge_threshold: default_edge_threshold(),
        }
    }
}

/// Slide stage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageConfig {
    /// Seconds a stage load may stay pending before the placeholder is shown.
    #[serde(
        default = "default_render_timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub render_timeout_secs: Option<u64>,

    /// Delay before a switch into slide mode activates the selection.
    #[serde(default = "default_debounce_ms", skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,

    /// Maximum number of decoded images kept for the stage.
    #[serde(
        default = "default_cache_max_images",
        skip_serializing_if = "Option::is_none"
    )]
    pub cache_max_images: Option<usize>,

    /// Byte budget for decoded stage images.
    #[serde(
        default = "default_cache_max_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub cache_max_bytes: Option<usize>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            render_timeout_secs: default_render_timeout_secs(),
            debounce_ms: default_debounce_ms(),
            cache_max_images: default_cache_max_images(),
            cache_max_bytes: default_cache_max_bytes(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Gallery configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub stage: StageConfig,
}

impl Config {
    /// Page size clamped to the supported range.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.gallery
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    #[must_use]
    pub fn display_mode(&self) -> DisplayMode {
        self.gallery.display_mode.unwrap_or_default()
    }

    #[must_use]
    pub fn thumbnail_size(&self) -> u32 {
        self.gallery
            .thumbnail_size
            .unwrap_or(DEFAULT_THUMBNAIL_SIZE)
            .clamp(MIN_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE)
    }

    #[must_use]
    pub fn reconcile_interval(&self) -> ReconcileInterval {
        self.pagination
            .reconcile_interval_ms
            .map(ReconcileInterval::from_millis)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn edge_threshold(&self) -> EdgeThreshold {
        self.pagination
            .edge_threshold
            .map(EdgeThreshold::new)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn render_timeout(&self) -> RenderTimeout {
        self.stage
            .render_timeout_secs
            .map(RenderTimeout::from_secs)
            .unwrap_or_default()
    }

    /// Debounce applied before synthesized slide activations.
    #[must_use]
    pub fn activation_debounce(&self) -> Duration {
        let millis = self
            .stage
            .debounce_ms
            .unwrap_or(DEFAULT_ACTIVATION_DEBOUNCE_MS)
            .min(MAX_ACTIVATION_DEBOUNCE_MS);
        Duration::from_millis(millis)
    }

    #[must_use]
    pub fn cache_limits(&self) -> CacheLimits {
        CacheLimits::new(
            self.stage
                .cache_max_bytes
                .unwrap_or(DEFAULT_STAGE_CACHE_BYTES),
            self.stage
                .cache_max_images
                .unwrap_or(DEFAULT_STAGE_CACHE_IMAGES),
        )
    }
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_page_size() -> Option<usize> {
    Some(DEFAULT_PAGE_SIZE)
}

fn default_thumbnail_size() -> Option<u32> {
    Some(DEFAULT_THUMBNAIL_SIZE)
}

fn default_reconcile_interval_ms() -> Option<u64> {
    Some(DEFAULT_RECONCILE_INTERVAL_MS)
}

fn default_edge_threshold() -> Option<f32> {
    Some(DEFAULT_EDGE_THRESHOLD)
}

fn default_render_timeout_secs() -> Option<u64> {
    Some(DEFAULT_RENDER_TIMEOUT_SECS)
}

fn default_debounce_ms() -> Option<u64> {
    Some(DEFAULT_ACTIVATION_DEBOUNCE_MS)
}

fn default_cache_max_images() -> Option<usize> {
    Some(DEFAULT_STAGE_CACHE_IMAGES)
}

fn default_cache_max_bytes() -> Option<usize> {
    Some(DEFAULT_STAGE_CACHE_BYTES)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!("{}: {err}", path.display())),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            gallery: GalleryConfig {
                page_size: Some(24),
                display_mode: Some(DisplayMode::Thumbnails),
                thumbnail_size: Some(200),
            },
            pagination: PaginationConfig {
                reconcile_interval_ms: Some(500),
                edge_threshold: Some(0.1),
            },
            stage: StageConfig {
                render_timeout_secs: Some(5),
                debounce_ms: Some(50),
                cache_max_images: Some(4),
                cache_max_bytes: Some(MIN_STAGE_CACHE_BYTES),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_warns_and_falls_back_on_invalid_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[gallery\npage_size = ")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_some());
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("[stage]\nrender_timeout_secs = 3\n")
            .expect("partial config should parse");
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.render_timeout().value(), 3);
        assert_eq!(
            config.reconcile_interval().as_duration(),
            Duration::from_millis(DEFAULT_RECONCILE_INTERVAL_MS)
        );
    }

    #[test]
    fn accessors_clamp_out_of_range_values() {
        let mut config = Config::default();
        config.gallery.page_size = Some(0);
        config.gallery.thumbnail_size = Some(10_000);
        config.stage.debounce_ms = Some(60_000);

        assert_eq!(config.page_size(), MIN_PAGE_SIZE);
        assert_eq!(config.thumbnail_size(), MAX_THUMBNAIL_SIZE);
        assert_eq!(
            config.activation_debounce(),
            Duration::from_millis(MAX_ACTIVATION_DEBOUNCE_MS)
        );
    }

    #[test]
    fn display_mode_serializes_kebab_case() {
        let mut config = Config::default();
        config.gallery.display_mode = Some(DisplayMode::Slide);
        let content = toml::to_string_pretty(&config).expect("serialize");
        assert!(content.contains("display_mode = \"slide\""));
    }
}
