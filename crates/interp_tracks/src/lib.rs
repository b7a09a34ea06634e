// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation tracks for a multi sub-curve editor.
//!
//! This crate provides the tracks an interpolation editor works on:
//! - Move tracks (translation, Euler rotation and lookup keys in lockstep)
//! - Float property tracks
//! - Vector property tracks
//! - Groups of tracks with RON persistence
//!
//! ## Architecture
//!
//! Each track implements two traits:
//! - [`CurveEdInterface`]: keys and flattened scalar sub-curves as seen by a
//!   curve editor, addressed by `(sub_index, key_index)`
//! - [`KeyframeTrack`]: whole-keyframe operations used by a timeline
//!
//! Curve math comes from the `interp_curve` crate.

pub mod error;
pub mod curve_ed;
pub mod settings;
pub mod track;
pub mod move_track;
pub mod float_track;
pub mod vector_track;
pub mod group;

pub use error::TrackError;
pub use curve_ed::{CurveEdInterface, KeyColor};
pub use settings::{SettingsError, TrackSettings};
pub use track::{KeyframeTrack, Track, TrackData, TrackId, TrackType};
pub use move_track::{
    Axis, ChannelKey, LookupPoint, MoveChannel, MoveFrame, MoveKey, MoveSubCurve, MoveTrack,
};
pub use float_track::FloatTrack;
pub use vector_track::VectorTrack;
pub use group::{GroupError, GroupId, InterpGroup};
