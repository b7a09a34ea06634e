// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve keys and interpolation primitives.

use crate::value::CurveValue;
use serde::{Deserialize, Serialize};

/// Interpolation mode between a key and the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum InterpCurveMode {
    /// Straight line to the next key
    #[default]
    Linear,
    /// Cubic Hermite, tangents recomputed automatically (unclamped)
    CurveAuto,
    /// Hold the value until the next key
    Constant,
    /// Cubic Hermite with tangents edited by hand
    CurveUser,
    /// Like `CurveUser`, but arrive and leave tangents may differ
    CurveBreak,
    /// Cubic Hermite, tangents recomputed automatically and clamped
    CurveAutoClamped,
}

impl InterpCurveMode {
    /// Whether the segment after a key in this mode is a cubic curve
    pub fn is_curve(self) -> bool {
        matches!(
            self,
            Self::CurveAuto | Self::CurveAutoClamped | Self::CurveUser | Self::CurveBreak
        )
    }

    /// Whether tangents of a key in this mode are owned by the auto-tangent pass
    pub fn is_auto(self) -> bool {
        matches!(self, Self::CurveAuto | Self::CurveAutoClamped)
    }

    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::CurveAuto => "Curve (Auto)",
            Self::Constant => "Constant",
            Self::CurveUser => "Curve (User)",
            Self::CurveBreak => "Curve (Break)",
            Self::CurveAutoClamped => "Curve (Auto/Clamped)",
        }
    }
}

/// A key in a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint<T> {
    /// Input value (usually time)
    pub in_val: f32,
    /// Output value at `in_val`
    pub out_val: T,
    /// Tangent arriving at this key
    pub arrive_tangent: T,
    /// Tangent leaving this key
    pub leave_tangent: T,
    /// Interpolation mode to the next key
    pub interp_mode: InterpCurveMode,
}

impl<T: CurveValue> CurvePoint<T> {
    /// Create a linear key with zero tangents
    pub fn new(in_val: f32, out_val: T) -> Self {
        Self {
            in_val,
            out_val,
            arrive_tangent: T::zero(),
            leave_tangent: T::zero(),
            interp_mode: InterpCurveMode::Linear,
        }
    }

    /// Set interpolation mode
    pub fn with_interp_mode(mut self, mode: InterpCurveMode) -> Self {
        self.interp_mode = mode;
        self
    }

    /// Set tangents
    pub fn with_tangents(mut self, arrive: T, leave: T) -> Self {
        self.arrive_tangent = arrive;
        self.leave_tangent = leave;
        self
    }

    /// Whether the segment after this key is a cubic curve
    pub fn is_curve_key(&self) -> bool {
        self.interp_mode.is_curve()
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Cubic Hermite interpolation
    pub fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, t: f32) -> f32 {
        let t2 = t * t;
        let t3 = t2 * t;

        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
    }

    /// Channel-wise linear interpolation
    pub fn lerp_value<T: CurveValue>(a: T, b: T, t: f32) -> T {
        a.zip_map(b, |a, b| Self::lerp(a, b, t))
    }

    /// Channel-wise cubic Hermite interpolation
    pub fn hermite_value<T: CurveValue>(p0: T, m0: T, p1: T, m1: T, t: f32) -> T {
        let mut out = p0;
        for i in 0..T::CHANNELS {
            *out.channel_mut(i) =
                Self::hermite(p0.channel(i), m0.channel(i), p1.channel(i), m1.channel(i), t);
        }
        out
    }
}
