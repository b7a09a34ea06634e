// SPDX-License-Identifier: MIT OR Apache-2.0
//! Group of tracks animating one object.

use crate::track::{Track, TrackId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Unique identifier for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub Uuid);

impl GroupId {
    /// Create a new random group ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from reading or writing groups
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// File could not be read or written
    #[error("Group I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Text is not a valid group document
    #[error("Invalid group document: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Group could not be serialized
    #[error("Failed to serialize group: {0}")]
    Serialize(#[from] ron::Error),
}

/// An ordered set of tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpGroup {
    /// Unique group ID
    pub id: GroupId,
    /// Group name, referenced by move track lookup keys
    pub name: String,
    /// Tracks in display order
    tracks: IndexMap<TrackId, Track>,
}

impl InterpGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            tracks: IndexMap::new(),
        }
    }

    /// Add a track
    pub fn add_track(&mut self, track: Track) -> TrackId {
        let id = track.id;
        self.tracks.insert(id, track);
        id
    }

    /// Remove a track, keeping the order of the others
    pub fn remove_track(&mut self, track_id: TrackId) -> Option<Track> {
        self.tracks.shift_remove(&track_id)
    }

    /// Get a track
    pub fn track(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    /// Get a mutable track
    pub fn track_mut(&mut self, track_id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(&track_id)
    }

    /// Get all tracks
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Get the duration based on track content
    pub fn content_duration(&self) -> f32 {
        self.tracks.values().map(Track::duration).fold(0.0, f32::max)
    }

    /// Number of tracks still on a legacy interp method
    pub fn legacy_track_count(&self) -> usize {
        self.tracks
            .values()
            .filter(|track| track.data.curve_ed().using_legacy_interp_method())
            .count()
    }

    /// Upgrade every legacy track; returns how many were upgraded
    pub fn upgrade_legacy_tracks(&mut self) -> usize {
        let mut upgraded = 0;
        for track in self.tracks.values_mut() {
            let curve_ed = track.data.curve_ed_mut();
            if curve_ed.using_legacy_interp_method() {
                curve_ed.upgrade_interp_method();
                upgraded += 1;
                tracing::info!("Upgraded interp method of track '{}'", track.name);
            }
        }
        upgraded
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, GroupError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Parse from RON
    pub fn from_ron_str(content: &str) -> Result<Self, GroupError> {
        Ok(ron::from_str(content)?)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), GroupError> {
        std::fs::write(path, self.to_ron_string()?)?;
        tracing::info!("Saved group '{}' to {:?}", self.name, path);
        Ok(())
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, GroupError> {
        let group = Self::from_ron_str(&std::fs::read_to_string(path)?)?;
        tracing::debug!("Loaded group '{}' with {} tracks", group.name, group.track_count());
        Ok(group)
    }
}

impl Default for InterpGroup {
    fn default() -> Self {
        Self::new("Group")
    }
}
