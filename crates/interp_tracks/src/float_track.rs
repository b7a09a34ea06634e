// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single float property track.

use crate::curve_ed::CurveEdInterface;
use crate::error::{precondition, TrackError};
use crate::settings::TrackSettings;
use crate::track::{duplicate_curve_keyframe, set_curve_keyframe_time, KeyframeTrack};
use interp_curve::{InterpCurve, InterpCurveMode};
use serde::{Deserialize, Serialize};

/// Track animating one float value; exposes a single sub-curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatTrack {
    curve: InterpCurve<f32>,
    /// Auto-tangent tension
    pub curve_tension: f32,
}

impl FloatTrack {
    /// Create an empty track with default settings
    pub fn new() -> Self {
        Self::from_settings(&TrackSettings::default())
    }

    /// Create an empty track using the configured tension
    pub fn from_settings(settings: &TrackSettings) -> Self {
        Self {
            curve: InterpCurve::new(),
            curve_tension: settings.curve_tension,
        }
    }

    /// Wrap an existing curve
    pub fn from_curve(curve: InterpCurve<f32>, curve_tension: f32) -> Self {
        Self { curve, curve_tension }
    }

    /// Get the underlying curve
    pub fn curve(&self) -> &InterpCurve<f32> {
        &self.curve
    }

    /// Add a key with an explicit value and mode; returns its index
    pub fn add_keyframe(&mut self, time: f32, value: f32, mode: InterpCurveMode) -> usize {
        let index = self.curve.add_point(time, value);
        if let Some(point) = self.curve.point_mut(index) {
            point.interp_mode = mode;
        }
        self.recompute_tangents();
        index
    }

    /// Evaluate the track, `0.0` when empty
    pub fn eval(&self, time: f32) -> f32 {
        self.curve.eval(time, 0.0)
    }

    fn recompute_tangents(&mut self) {
        self.curve.auto_set_tangents(self.curve_tension);
    }

    fn check_sub(sub_index: usize) {
        precondition(TrackError::check_sub_curve(sub_index, 1));
    }

    fn check_key(&self, key_index: usize) {
        precondition(TrackError::check_key(key_index, self.curve.len()));
    }
}

impl Default for FloatTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveEdInterface for FloatTrack {
    fn num_keys(&self) -> usize {
        self.curve.len()
    }

    fn num_sub_curves(&self) -> usize {
        1
    }

    fn key_in(&self, key_index: usize) -> f32 {
        self.check_key(key_index);
        self.curve.points()[key_index].in_val
    }

    fn key_out(&self, sub_index: usize, key_index: usize) -> f32 {
        Self::check_sub(sub_index);
        self.check_key(key_index);
        self.curve.points()[key_index].out_val
    }

    fn in_range(&self) -> (f32, f32) {
        self.curve.in_range()
    }

    fn out_range(&self) -> (f32, f32) {
        self.curve.calc_bounds(0.0)
    }

    fn key_interp_mode(&self, key_index: usize) -> InterpCurveMode {
        self.check_key(key_index);
        self.curve.points()[key_index].interp_mode
    }

    fn tangents(&self, sub_index: usize, key_index: usize) -> (f32, f32) {
        Self::check_sub(sub_index);
        self.check_key(key_index);
        let point = &self.curve.points()[key_index];
        (point.arrive_tangent, point.leave_tangent)
    }

    fn eval_sub(&self, sub_index: usize, in_val: f32) -> f32 {
        Self::check_sub(sub_index);
        self.eval(in_val)
    }

    fn create_new_key(&mut self, key_in: f32) -> usize {
        let value = self.eval(key_in);
        let index = self.curve.add_point(key_in, value);
        self.recompute_tangents();
        tracing::trace!("Created float key {index} at {key_in}");
        index
    }

    fn delete_key(&mut self, key_index: usize) {
        self.check_key(key_index);
        self.curve.remove_point(key_index);
        self.recompute_tangents();
    }

    fn set_key_in(&mut self, key_index: usize, new_in_val: f32) -> usize {
        self.check_key(key_index);
        let new_index = self.curve.move_point(key_index, new_in_val);
        self.recompute_tangents();
        new_index
    }

    fn set_key_out(&mut self, sub_index: usize, key_index: usize, new_out_val: f32) {
        Self::check_sub(sub_index);
        self.check_key(key_index);
        if let Some(point) = self.curve.point_mut(key_index) {
            point.out_val = new_out_val;
        }
        self.recompute_tangents();
    }

    fn set_key_interp_mode(&mut self, key_index: usize, new_mode: InterpCurveMode) {
        self.check_key(key_index);
        if let Some(point) = self.curve.point_mut(key_index) {
            point.interp_mode = new_mode;
        }
        self.recompute_tangents();
    }

    fn set_tangents(&mut self, sub_index: usize, key_index: usize, arrive: f32, leave: f32) {
        Self::check_sub(sub_index);
        self.check_key(key_index);
        if let Some(point) = self.curve.point_mut(key_index) {
            point.arrive_tangent = arrive;
            point.leave_tangent = leave;
        }
    }

    fn using_legacy_interp_method(&self) -> bool {
        self.curve.using_legacy_interp_method()
    }

    fn upgrade_interp_method(&mut self) {
        self.curve.upgrade_interp_method();
    }
}

impl KeyframeTrack for FloatTrack {
    fn num_keyframes(&self) -> usize {
        self.curve.len()
    }

    fn keyframe_time(&self, index: usize) -> Option<f32> {
        self.curve.point(index).map(|point| point.in_val)
    }

    fn set_keyframe_time(&mut self, index: usize, new_time: f32, update_order: bool) -> usize {
        let new_index = set_curve_keyframe_time(&mut self.curve, index, new_time, update_order);
        self.recompute_tangents();
        new_index
    }

    fn remove_keyframe(&mut self, index: usize) -> Result<(), TrackError> {
        TrackError::check_key(index, self.curve.len())?;
        self.curve.remove_point(index);
        self.recompute_tangents();
        Ok(())
    }

    fn duplicate_keyframe(&mut self, index: usize, new_time: f32) -> Result<usize, TrackError> {
        let new_index = duplicate_curve_keyframe(&mut self.curve, index, new_time)?;
        self.recompute_tangents();
        Ok(new_index)
    }
}
