//! Viewer configuration

use crate::discovery::{default_executable_names, default_search_path};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Overrides the grayscale view command template
pub const ENV_COMMAND: &str = "IMGSHOW_COMMAND";
/// Overrides the color view command template
pub const ENV_COLOR_COMMAND: &str = "IMGSHOW_COLOR_COMMAND";
/// Overrides the temporary file extension
pub const ENV_EXTENSION: &str = "IMGSHOW_EXTENSION";

/// ImageJ macro that opens the file and names its window
pub const IMAGEJ_OPEN_MACRO: &str = r#"open("%f"); rename("%t");"#;
/// ImageJ macro suffix that shows multi-channel images as a composite
pub const COMPOSITE_COLOR_MACRO: &str = r#" run("Make Composite", "display=Composite");"#;

/// Viewer configuration
///
/// Built once during setup and passed to every viewer; nothing here is
/// changed behind the caller's back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Template for grayscale images
    pub view_command: String,
    /// Template for color (multi-channel) images
    pub view_color_command: String,
    /// Template used whenever the application is Fiji
    pub fiji_command: String,
    /// Extension of the temporary image file, including the dot
    pub file_extension: String,
    /// Directories searched for the viewer, in order
    pub search_path: Vec<PathBuf>,
    /// Viewer executable names relative to the search directories
    pub executable_names: Vec<String>,
    /// Explicit viewer path; skips discovery when set
    pub application: Option<PathBuf>,
    /// Verbose logging of command resolution
    pub debug: bool,
    /// Block until the viewer exits
    pub wait_for_exit: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            view_command: default_view_command(IMAGEJ_OPEN_MACRO),
            view_color_command: default_view_command(&color_macro()),
            fiji_command: default_fiji_command(),
            file_extension: ".png".to_string(),
            search_path: default_search_path(),
            executable_names: default_executable_names(),
            application: None,
            debug: false,
            wait_for_exit: false,
        }
    }
}

fn color_macro() -> String {
    format!("{}{}", IMAGEJ_OPEN_MACRO, COMPOSITE_COLOR_MACRO)
}

#[cfg(target_os = "windows")]
fn default_view_command(macro_text: &str) -> String {
    format!("%a -eval '{}'", macro_text)
}

#[cfg(target_os = "macos")]
fn default_view_command(macro_text: &str) -> String {
    format!("open -a %a -n --args -eval '{}'", macro_text)
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_view_command(macro_text: &str) -> String {
    format!("%a -e '{}'", macro_text)
}

// Fiji takes -eval on every platform and shows color images without the composite step
fn default_fiji_command() -> String {
    if cfg!(target_os = "macos") {
        format!("open -a %a -n --args -eval '{}'", IMAGEJ_OPEN_MACRO)
    } else {
        format!("%a -eval '{}'", IMAGEJ_OPEN_MACRO)
    }
}

impl ViewerConfig {
    /// Load configuration from file, then apply environment overrides.
    ///
    /// An unreadable file falls back to defaults; environment overrides
    /// still apply and the load error is handed back for reporting.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        Self::load_layered(&Self::config_path(), |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an explicit file and override lookup
    pub fn load_layered<F>(config_path: &Path, lookup: F) -> (Self, Option<anyhow::Error>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, error) = match Self::load_from(config_path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        config.apply_overrides(lookup);
        (config, error)
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", config_path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        tracing::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "ImageShow", "ImageShow")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    /// Apply `IMGSHOW_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(cmd) = get(ENV_COMMAND) {
            tracing::debug!("{} overrides view command: {}", ENV_COMMAND, cmd);
            self.view_command = cmd;
        }
        if let Some(cmd) = get(ENV_COLOR_COMMAND) {
            tracing::debug!("{} overrides color command: {}", ENV_COLOR_COMMAND, cmd);
            self.view_color_command = cmd;
        }
        if let Some(ext) = get(ENV_EXTENSION) {
            self.file_extension = ext;
        }
    }
}
