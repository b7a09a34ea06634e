// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe interpolation curves.
//!
//! This crate provides the curve model that animation tracks are built on:
//! - Ordered keys with per-key interpolation modes and tangents
//! - Linear, constant and cubic Hermite evaluation
//! - Automatic (optionally clamped) tangent computation
//! - Output bounds including curve overshoot
//! - Detection and upgrade of legacy tangent algorithms
//!
//! ## Architecture
//!
//! The algorithms live in [`keys`] and run over the [`KeyTrack`] view traits,
//! so any key storage can be evaluated like a curve. [`InterpCurve`] is the
//! plain storage most tracks use.

pub mod value;
pub mod point;
pub mod tangent;
pub mod bounds;
pub mod keys;
pub mod curve;

pub use value::{CurveValue, Vec3};
pub use point::{CurvePoint, InterpCurveMode, Interpolation};
pub use keys::{KeyTrack, KeyTrackMut};
pub use curve::{InterpCurve, InterpMethod};
