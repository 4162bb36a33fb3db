use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::coord::Datum;
use crate::picker::Coordinate;

pub const DEFAULT_LOCATE_ZOOM: f64 = 15.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Datum of coordinates shown on the map and typed by the user.
    pub datum: Datum,
    /// Descend into subdirectories when a directory is added.
    pub recursive: bool,
    /// Glob patterns of files never added.
    pub exclude: Vec<String>,
    /// Where the map is centered on start-up.
    pub home: Coordinate,
    pub home_zoom: f64,
    /// Zoom used when jumping to an image's stored position.
    pub locate_zoom: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            datum: Datum::Wgs84,
            recursive: false,
            exclude: Vec::new(),
            home: Coordinate::new(0.0, 20.0),
            home_zoom: 2.0,
            locate_zoom: DEFAULT_LOCATE_ZOOM,
        }
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("", "", "geostamp") {
        dirs.config_dir().to_path_buf()
    } else {
        PathBuf::from("./.config/geostamp")
    }
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Missing file yields defaults; a file that fails to parse is an error.
pub fn load_settings(path: &Path) -> Result<Settings> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_settings(&text)
            .with_context(|| format!("Invalid settings file {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no settings at {}, using defaults", path.display());
            Ok(Settings::default())
        }
        Err(err) => {
            Err(err).with_context(|| format!("Unable to read settings file {}", path.display()))
        }
    }
}

pub fn parse_settings(text: &str) -> Result<Settings> {
    Ok(toml::from_str(text)?)
}
