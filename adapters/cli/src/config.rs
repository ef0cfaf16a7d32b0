use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use quadcaster_system_movement::MovementSettings;
use quadcaster_system_raycaster::CasterSettings;
use serde::Deserialize;

/// File looked up in the working directory when no `--config` is given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "quadcaster.toml";

/// Runtime tunables read from `quadcaster.toml`. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Ray caster tunables.
    pub caster: CasterSettings,
    /// Movement speeds.
    pub movement: MovementSettings,
    /// Window and presentation options.
    pub window: WindowSettings,
    /// Project store options.
    pub store: StoreSettings,
}

/// Window and presentation options.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct WindowSettings {
    pub width: i32,
    pub height: i32,
    pub vsync: bool,
    /// Height of the first-person virtual screen; its width is the ray count.
    pub view_height: u32,
    /// Draw walls with the procedural brick texture instead of flat shading.
    pub bricks: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 960,
            height: 720,
            vsync: true,
            view_height: 200,
            bricks: false,
        }
    }
}

/// Project store options.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct StoreSettings {
    /// Directory holding one JSON file per project.
    pub directory: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("projects"),
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid settings")
    }

    /// Loads settings from `path`, or from the default file when `path` is `None`.
    ///
    /// A missing default file yields the defaults; an explicitly named file must exist.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            log::debug!("no {} found, using default settings", path.display());
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::from_toml(&text)
            .with_context(|| format!("failed to parse settings in {}", path.display()))?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = Settings::from_toml("").expect("empty settings parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.caster.num_rays, 320);
        assert_eq!(settings.movement.move_speed, 0.21);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let settings = Settings::from_toml(
            r#"
            [caster]
            num_rays = 160
            step_size = 0.05

            [window]
            bricks = true

            [store]
            directory = "levels"
            "#,
        )
        .expect("partial settings parse");

        assert_eq!(settings.caster.num_rays, 160);
        assert_eq!(settings.caster.step_size, 0.05);
        assert_eq!(settings.caster.max_depth, 20.0);
        assert!(settings.window.bricks);
        assert_eq!(settings.window.view_height, 200);
        assert_eq!(settings.store.directory, PathBuf::from("levels"));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(Settings::from_toml("[audio]\nvolume = 3").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let missing = dir.path().join("absent.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[movement]\nmove_speed = 0.5\n").expect("write settings");

        let settings = Settings::load(Some(&path)).expect("settings load");
        assert_eq!(settings.movement.move_speed, 0.5);
        assert_eq!(settings.movement.turn_speed, 0.069);
    }
}
