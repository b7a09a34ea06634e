// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe curve storage.

use crate::keys::{self, KeyTrack, KeyTrackMut};
use crate::point::{CurvePoint, InterpCurveMode};
use crate::value::CurveValue;
use serde::{Deserialize, Serialize};

/// Tangent/evaluation algorithm of a curve, kept for data authored with older
/// versions of the algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum InterpMethod {
    /// Tangents scaled by segment length, time-normalized auto tangents
    #[default]
    FixedTangentEvalAndNewAutoTangents,
    /// Tangents scaled by segment length, legacy auto tangents
    FixedTangentEval,
    /// Tangents not scaled by segment length, legacy auto tangents
    BrokenTangentEval,
}

impl InterpMethod {
    /// Whether this is anything but the current algorithm
    pub fn is_legacy(self) -> bool {
        self != Self::FixedTangentEvalAndNewAutoTangents
    }
}

/// An ordered list of keys that can be evaluated at any input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpCurve<T> {
    /// Keys, ascending by input value
    points: Vec<CurvePoint<T>>,
    /// Algorithm used for evaluation and auto tangents
    #[serde(default)]
    interp_method: InterpMethod,
}

impl<T: CurveValue> InterpCurve<T> {
    /// Create an empty curve using the current algorithms
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            interp_method: InterpMethod::default(),
        }
    }

    /// Create an empty curve using a specific algorithm
    pub fn with_interp_method(interp_method: InterpMethod) -> Self {
        Self {
            points: Vec::new(),
            interp_method,
        }
    }

    /// Build a curve from points, sorting them by input value
    pub fn from_points(points: impl IntoIterator<Item = CurvePoint<T>>) -> Self {
        let mut points: Vec<_> = points.into_iter().collect();
        points.sort_by(|a, b| a.in_val.total_cmp(&b.in_val));
        Self {
            points,
            interp_method: InterpMethod::default(),
        }
    }

    /// Add a linear key and return its index
    pub fn add_point(&mut self, in_val: f32, out_val: T) -> usize {
        let index = keys::insertion_index::<T, _>(&*self, in_val);
        self.points.insert(index, CurvePoint::new(in_val, out_val));
        index
    }

    /// Move a key to a new input value, keeping its output, mode and tangents.
    ///
    /// The key may change position; the new index is returned. An out of
    /// range index is returned unchanged.
    pub fn move_point(&mut self, index: usize, new_in_val: f32) -> usize {
        if index >= self.points.len() {
            return index;
        }

        let mut point = self.points.remove(index);
        point.in_val = new_in_val;
        let new_index = keys::insertion_index::<T, _>(&*self, new_in_val);
        self.points.insert(new_index, point);
        new_index
    }

    /// Remove a key
    pub fn remove_point(&mut self, index: usize) -> Option<CurvePoint<T>> {
        (index < self.points.len()).then(|| self.points.remove(index))
    }

    /// Remove all keys
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Get all keys
    pub fn points(&self) -> &[CurvePoint<T>] {
        &self.points
    }

    /// Get a key
    pub fn point(&self, index: usize) -> Option<&CurvePoint<T>> {
        self.points.get(index)
    }

    /// Get a mutable key.
    ///
    /// Changing `in_val` through this reference can break the ordering; use
    /// [`move_point`](Self::move_point) for that.
    pub fn point_mut(&mut self, index: usize) -> Option<&mut CurvePoint<T>> {
        self.points.get_mut(index)
    }

    /// Get key count
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no keys
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Algorithm in use
    pub fn interp_method(&self) -> InterpMethod {
        self.interp_method
    }

    /// Change the algorithm without touching any key
    pub fn set_interp_method(&mut self, interp_method: InterpMethod) {
        self.interp_method = interp_method;
    }

    /// Input values of the first and last key, `(0, 0)` when empty
    pub fn in_range(&self) -> (f32, f32) {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first.in_val, last.in_val),
            _ => (0.0, 0.0),
        }
    }

    /// Evaluate the curve; `default` is returned when there are no keys
    pub fn eval(&self, in_val: f32, default: T) -> T {
        keys::eval(self, in_val, default)
    }

    /// Recompute the tangents of all auto keys
    pub fn auto_set_tangents(&mut self, tension: f32) {
        keys::auto_set_tangents::<T, _>(self, tension);
    }

    /// Min and max output the curve can produce; `default` for both when empty
    pub fn calc_bounds(&self, default: T) -> (T, T) {
        keys::calc_bounds(self, default)
    }

    /// Whether the curve uses a legacy algorithm and may be upgraded
    pub fn using_legacy_interp_method(&self) -> bool {
        self.interp_method.is_legacy()
    }

    /// Switch to the current algorithm, baking auto tangents into user
    /// tangents so the curve keeps its shape
    pub fn upgrade_interp_method(&mut self) {
        if self.using_legacy_interp_method() {
            let baked = keys::bake_auto_tangents::<T, _>(self);
            self.interp_method = InterpMethod::FixedTangentEvalAndNewAutoTangents;
            tracing::debug!("Upgraded curve interp method, baked {baked} auto keys");
        }
    }
}

impl<T: CurveValue> Default for InterpCurve<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CurveValue> KeyTrack<T> for InterpCurve<T> {
    fn key_count(&self) -> usize {
        self.points.len()
    }

    fn key_in(&self, index: usize) -> f32 {
        self.points[index].in_val
    }

    fn key_mode(&self, index: usize) -> InterpCurveMode {
        self.points[index].interp_mode
    }

    fn key_out(&self, index: usize) -> T {
        self.points[index].out_val
    }

    fn key_arrive_tangent(&self, index: usize) -> T {
        self.points[index].arrive_tangent
    }

    fn key_leave_tangent(&self, index: usize) -> T {
        self.points[index].leave_tangent
    }

    fn interp_method(&self) -> InterpMethod {
        self.interp_method
    }
}

impl<T: CurveValue> KeyTrackMut<T> for InterpCurve<T> {
    fn set_key_tangents(&mut self, index: usize, arrive: T, leave: T) {
        let point = &mut self.points[index];
        point.arrive_tangent = arrive;
        point.leave_tangent = leave;
    }

    fn set_key_mode(&mut self, index: usize, mode: InterpCurveMode) {
        self.points[index].interp_mode = mode;
    }
}
