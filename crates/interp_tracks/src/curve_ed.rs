// SPDX-License-Identifier: MIT OR Apache-2.0
//! The contract between tracks and a multi sub-curve editor.
//!
//! A track exposes its keys as a shared key-index space and its channels as
//! scalar sub-curves. Every sub-curve has a value at every key, so the editor
//! addresses a value with `(sub_index, key_index)` and a key time with
//! `key_index` alone.
//!
//! Indices are preconditions: passing a key index `>= num_keys()` or a
//! sub-curve index `>= num_sub_curves()` panics. Nothing is clamped.

use interp_curve::InterpCurveMode;

/// RGB color of a key as drawn by the editor
pub type KeyColor = [u8; 3];

/// Pure red
pub const RED: KeyColor = [255, 0, 0];
/// Pure green
pub const GREEN: KeyColor = [0, 255, 0];
/// Pure blue
pub const BLUE: KeyColor = [0, 0, 255];

/// Generic multi sub-curve editing surface
pub trait CurveEdInterface {
    /// Number of keys shared by every sub-curve
    fn num_keys(&self) -> usize;

    /// Number of scalar sub-curves currently exposed
    fn num_sub_curves(&self) -> usize;

    /// Input value (time) of a key
    fn key_in(&self, key_index: usize) -> f32;

    /// Output value of one sub-curve at a key
    fn key_out(&self, sub_index: usize, key_index: usize) -> f32;

    /// Input values of the first and last key, `(0, 0)` when empty
    fn in_range(&self) -> (f32, f32);

    /// Min and max output over the visible sub-curves, `(0, 0)` when empty
    fn out_range(&self) -> (f32, f32);

    /// Color used to draw a key; `curve_color` unless the track overrides it
    fn key_color(&self, sub_index: usize, key_index: usize, curve_color: KeyColor) -> KeyColor {
        let _ = (sub_index, key_index);
        curve_color
    }

    /// Interpolation mode of a key
    fn key_interp_mode(&self, key_index: usize) -> InterpCurveMode;

    /// Arrive and leave tangent of one sub-curve at a key
    fn tangents(&self, sub_index: usize, key_index: usize) -> (f32, f32);

    /// Evaluate one sub-curve
    fn eval_sub(&self, sub_index: usize, in_val: f32) -> f32;

    /// Insert a key at `key_in` holding the current evaluated values.
    ///
    /// Returns the index of the new key.
    fn create_new_key(&mut self, key_in: f32) -> usize;

    /// Remove a key from every sub-curve
    fn delete_key(&mut self, key_index: usize);

    /// Move a key in time; returns its new index
    fn set_key_in(&mut self, key_index: usize, new_in_val: f32) -> usize;

    /// Overwrite the value of one sub-curve at a key
    fn set_key_out(&mut self, sub_index: usize, key_index: usize, new_out_val: f32);

    /// Overwrite the interpolation mode of a key
    fn set_key_interp_mode(&mut self, key_index: usize, new_mode: InterpCurveMode);

    /// Overwrite the tangents of one sub-curve at a key
    fn set_tangents(&mut self, sub_index: usize, key_index: usize, arrive: f32, leave: f32);

    /// Whether any underlying curve uses a legacy interp method
    fn using_legacy_interp_method(&self) -> bool {
        false
    }

    /// Move every underlying curve to the current interp method
    fn upgrade_interp_method(&mut self) {}
}
