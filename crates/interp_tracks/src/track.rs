// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions shared by every track kind.

use crate::curve_ed::{CurveEdInterface, KeyColor};
use crate::error::TrackError;
use crate::float_track::FloatTrack;
use crate::move_track::MoveTrack;
use crate::vector_track::VectorTrack;
use interp_curve::{CurveValue, InterpCurve};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackType {
    /// Translation and rotation
    Move,
    /// Single float property
    Float,
    /// Three-component vector property
    Vector,
}

impl TrackType {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move => "Movement",
            Self::Float => "Float Property",
            Self::Vector => "Vector Property",
        }
    }

    /// Get the track color
    pub fn color(&self) -> KeyColor {
        match self {
            Self::Move => [100, 150, 255],
            Self::Float => [150, 255, 100],
            Self::Vector => [255, 200, 100],
        }
    }
}

/// Keyframe operations a track offers outside the curve editor
pub trait KeyframeTrack {
    /// Number of keyframes
    fn num_keyframes(&self) -> usize;

    /// Time of a keyframe
    fn keyframe_time(&self, index: usize) -> Option<f32>;

    /// Time of the first and last keyframe, `(0, 0)` when empty
    fn time_range(&self) -> (f32, f32) {
        match self.num_keyframes() {
            0 => (0.0, 0.0),
            count => (
                self.keyframe_time(0).unwrap_or(0.0),
                self.keyframe_time(count - 1).unwrap_or(0.0),
            ),
        }
    }

    /// Change the time of a keyframe and return its index afterwards.
    ///
    /// With `update_order` the keyframe is moved to keep the track sorted;
    /// otherwise only the time is written. An out of range index is returned
    /// unchanged.
    fn set_keyframe_time(&mut self, index: usize, new_time: f32, update_order: bool) -> usize;

    /// Remove a keyframe
    fn remove_keyframe(&mut self, index: usize) -> Result<(), TrackError>;

    /// Copy a keyframe to `new_time`; returns the index of the copy
    fn duplicate_keyframe(&mut self, index: usize, new_time: f32) -> Result<usize, TrackError>;

    /// Keyframe time nearest to `position`, skipping `ignore_keys`
    fn closest_snap_position(&self, position: f32, ignore_keys: &[usize]) -> Option<f32> {
        (0..self.num_keyframes())
            .filter(|index| !ignore_keys.contains(index))
            .filter_map(|index| self.keyframe_time(index))
            .min_by(|a, b| (a - position).abs().total_cmp(&(b - position).abs()))
    }
}

/// Keyframe time change on a single-curve track
pub(crate) fn set_curve_keyframe_time<T: CurveValue>(
    curve: &mut InterpCurve<T>,
    index: usize,
    new_time: f32,
    update_order: bool,
) -> usize {
    if update_order {
        return curve.move_point(index, new_time);
    }
    if let Some(point) = curve.point_mut(index) {
        point.in_val = new_time;
    }
    index
}

/// Keyframe copy on a single-curve track; tangents are left to the caller
pub(crate) fn duplicate_curve_keyframe<T: CurveValue>(
    curve: &mut InterpCurve<T>,
    index: usize,
    new_time: f32,
) -> Result<usize, TrackError> {
    let Some(source) = curve.point(index).copied() else {
        return Err(TrackError::KeyOutOfRange { index, count: curve.len() });
    };
    let new_index = curve.add_point(new_time, source.out_val);
    if let Some(point) = curve.point_mut(new_index) {
        *point = source;
        point.in_val = new_time;
    }
    Ok(new_index)
}

/// Track payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackData {
    /// Translation and rotation
    Move(MoveTrack),
    /// Float property
    Float(FloatTrack),
    /// Vector property
    Vector(VectorTrack),
}

impl TrackData {
    /// Type of the payload
    pub fn track_type(&self) -> TrackType {
        match self {
            Self::Move(_) => TrackType::Move,
            Self::Float(_) => TrackType::Float,
            Self::Vector(_) => TrackType::Vector,
        }
    }

    /// Curve editor view of the track
    pub fn curve_ed(&self) -> &dyn CurveEdInterface {
        match self {
            Self::Move(track) => track,
            Self::Float(track) => track,
            Self::Vector(track) => track,
        }
    }

    /// Mutable curve editor view of the track
    pub fn curve_ed_mut(&mut self) -> &mut dyn CurveEdInterface {
        match self {
            Self::Move(track) => track,
            Self::Float(track) => track,
            Self::Vector(track) => track,
        }
    }

    /// Keyframe view of the track
    pub fn keyframes(&self) -> &dyn KeyframeTrack {
        match self {
            Self::Move(track) => track,
            Self::Float(track) => track,
            Self::Vector(track) => track,
        }
    }

    /// Mutable keyframe view of the track
    pub fn keyframes_mut(&mut self) -> &mut dyn KeyframeTrack {
        match self {
            Self::Move(track) => track,
            Self::Float(track) => track,
            Self::Vector(track) => track,
        }
    }
}

/// A named track in a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: TrackId,
    /// Track name
    pub name: String,
    /// Track payload
    pub data: TrackData,
    /// Whether the track is disabled
    pub disabled: bool,
    /// Curve color override
    pub color: Option<KeyColor>,
}

impl Track {
    /// Create a new track
    pub fn new(name: impl Into<String>, data: TrackData) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            data,
            disabled: false,
            color: None,
        }
    }

    /// Get the track type
    pub fn track_type(&self) -> TrackType {
        self.data.track_type()
    }

    /// Get the effective curve color (override or type default)
    pub fn effective_color(&self) -> KeyColor {
        self.color.unwrap_or_else(|| self.track_type().color())
    }

    /// Color of a key as drawn on the curve editor
    ///
    /// # Panics
    ///
    /// Panics when either index is out of range for the track.
    pub fn key_color(&self, sub_index: usize, key_index: usize) -> KeyColor {
        self.data.curve_ed().key_color(sub_index, key_index, self.effective_color())
    }

    /// Get the duration (time of last keyframe)
    pub fn duration(&self) -> f32 {
        self.data.keyframes().time_range().1
    }
}
