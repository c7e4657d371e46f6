use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::modules::image_export::DEFAULT_JPEG_QUALITY;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub enum ThemePreference { System, Light, Dark }

/// UI preferences. Editor state (image, history, selection) is never stored here.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct AppSettings {
    pub theme_preference: ThemePreference,
    pub jpeg_quality: u8,
    pub last_directory: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_preference: ThemePreference::System,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            last_directory: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self { Self::load_from(&Self::get_config_path()) }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else { return Self::default(); };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring unreadable settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let path: PathBuf = Self::get_config_path();
        if let Err(e) = self.save_to(&path) {
            warn!("could not write settings to {}: {e}", path.display());
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() { fs::create_dir_all(parent)?; }
        let json: String = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)
    }

    fn get_config_path() -> PathBuf {
        let mut path: PathBuf = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("simple_photo_editor");
        path.push("settings.json");
        path
    }

    /// Remembers the folder of `file` for the next file dialog.
    pub fn remember_directory(&mut self, file: &Path) {
        let Some(parent) = file.parent() else { return; };
        if self.last_directory.as_deref() != Some(parent) {
            self.last_directory = Some(parent.to_path_buf());
            self.save();
        }
    }
}
