use crate::bubble::EngineLimits;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(super) struct AppSettings {
    pub svg_path: String,
    pub font_directory: Option<String>,
    pub min_bubble_width_px: f32,
    pub min_bubble_height_px: f32,
    pub handle_size: f32,
    pub font_size_step: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        let limits = EngineLimits::default();
        Self {
            svg_path: "panel.svg".to_string(),
            font_directory: None,
            min_bubble_width_px: limits.min_width_px,
            min_bubble_height_px: limits.min_height_px,
            handle_size: 10.0,
            font_size_step: 0.1,
        }
    }
}

impl AppSettings {
    pub fn engine_limits(&self) -> EngineLimits {
        EngineLimits {
            min_width_px: self.min_bubble_width_px.max(1.0),
            min_height_px: self.min_bubble_height_px.max(1.0),
        }
    }
}

fn parse_settings(path: &str, s: &str) -> Result<AppSettings, AppError> {
    if path.ends_with(".toml") {
        match toml::from_str::<AppSettings>(s) {
            Ok(settings) => Ok(settings),
            Err(e) => serde_json::from_str::<AppSettings>(s).map_err(|_| e.into()),
        }
    } else {
        match serde_json::from_str::<AppSettings>(s) {
            Ok(settings) => Ok(settings),
            Err(e) => toml::from_str::<AppSettings>(s).map_err(|_| e.into()),
        }
    }
}

pub(super) fn load_settings(path: &str) -> Option<AppSettings> {
    let s = std::fs::read_to_string(path).ok()?;
    match parse_settings(path, &s) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!(path, error = %e, "ignoring unreadable settings");
            None
        }
    }
}

pub(super) fn save_settings(path: &str, settings: &AppSettings) -> Result<(), AppError> {
    let out = if path.ends_with(".toml") {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    std::fs::write(path, out)?;
    Ok(())
}
