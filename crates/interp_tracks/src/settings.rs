// SPDX-License-Identifier: MIT OR Apache-2.0
//! Defaults applied to newly created tracks.

use crate::move_track::MoveFrame;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Errors from loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid settings RON
    #[error("Invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer version
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Track creation defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Format version
    pub version: u32,
    /// Auto-tangent tension of move track translation
    pub lin_curve_tension: f32,
    /// Auto-tangent tension of move track rotation
    pub ang_curve_tension: f32,
    /// Auto-tangent tension of float and vector tracks
    pub curve_tension: f32,
    /// Expose move track translation on the curve editor
    pub show_translation_on_curve_ed: bool,
    /// Expose move track rotation on the curve editor
    pub show_rotation_on_curve_ed: bool,
    /// Interpolate move track rotation as quaternions
    pub use_quat_interpolation: bool,
    /// Frame of new move tracks
    pub move_frame: MoveFrame,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            lin_curve_tension: 0.0,
            ang_curve_tension: 0.0,
            curve_tension: 0.0,
            show_translation_on_curve_ed: true,
            show_rotation_on_curve_ed: false,
            use_quat_interpolation: false,
            move_frame: MoveFrame::RelativeToInitial,
        }
    }
}

impl TrackSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron_str(&content)?;
        tracing::debug!("Loaded track settings from {:?}", path);
        Ok(settings)
    }

    /// Parse settings from RON text
    pub fn from_ron_str(content: &str) -> Result<Self, SettingsError> {
        let settings: TrackSettings = ron::from_str(content)?;

        // Version check
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved track settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = TrackSettings::from_ron_str("(curve_tension: 0.25)").unwrap();
        assert_eq!(settings.curve_tension, 0.25);
        assert!(settings.show_translation_on_curve_ed);
        assert_eq!(settings.move_frame, MoveFrame::RelativeToInitial);
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = TrackSettings::from_ron_str("(version: 99)");
        assert!(matches!(
            result,
            Err(SettingsError::UnsupportedVersion { found: 99, supported: SETTINGS_FORMAT_VERSION })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("interp_tracks_settings_{}.ron", std::process::id()));
        let settings = TrackSettings {
            lin_curve_tension: 0.5,
            show_rotation_on_curve_ed: true,
            move_frame: MoveFrame::World,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = TrackSettings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file() {
        let result = TrackSettings::load(Path::new("/nonexistent/interp_tracks.ron"));
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }
}
