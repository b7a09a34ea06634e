// SPDX-License-Identifier: MIT OR Apache-2.0
//! Curve algorithms over any ordered key storage.
//!
//! Tracks that keep several channels inside one composite key expose each
//! channel through these traits and share the exact evaluation, tangent and
//! bounds code used by [`InterpCurve`](crate::InterpCurve).

use crate::bounds::{interval_bounds, SegmentEnd};
use crate::curve::InterpMethod;
use crate::point::{InterpCurveMode, Interpolation};
use crate::tangent::{compute_curve_tangent, legacy_auto_calc_tangent};
use crate::value::CurveValue;

/// Read access to keys sorted ascending by input value
pub trait KeyTrack<T: CurveValue> {
    /// Number of keys
    fn key_count(&self) -> usize;

    /// Input value of a key
    fn key_in(&self, index: usize) -> f32;

    /// Interpolation mode of a key
    fn key_mode(&self, index: usize) -> InterpCurveMode;

    /// Output value of a key
    fn key_out(&self, index: usize) -> T;

    /// Arrive tangent of a key
    fn key_arrive_tangent(&self, index: usize) -> T;

    /// Leave tangent of a key
    fn key_leave_tangent(&self, index: usize) -> T;

    /// Tangent/evaluation algorithm in use
    fn interp_method(&self) -> InterpMethod;
}

/// Write access needed by the tangent and upgrade passes
pub trait KeyTrackMut<T: CurveValue>: KeyTrack<T> {
    /// Overwrite both tangents of a key
    fn set_key_tangents(&mut self, index: usize, arrive: T, leave: T);

    /// Overwrite the interpolation mode of a key
    fn set_key_mode(&mut self, index: usize, mode: InterpCurveMode);
}

/// Evaluate the keys at `in_val`.
///
/// Outside the key range the first/last value is held; with no keys
/// `default` is returned.
pub fn eval<T, K>(keys: &K, in_val: f32, default: T) -> T
where
    T: CurveValue,
    K: KeyTrack<T> + ?Sized,
{
    let count = keys.key_count();
    if count == 0 {
        return default;
    }

    if count < 2 || in_val <= keys.key_in(0) {
        return keys.key_out(0);
    }

    if in_val >= keys.key_in(count - 1) {
        return keys.key_out(count - 1);
    }

    for i in 1..count {
        if in_val < keys.key_in(i) {
            let prev = i - 1;
            let diff = keys.key_in(i) - keys.key_in(prev);
            let mode = keys.key_mode(prev);

            if diff > 0.0 && mode != InterpCurveMode::Constant {
                let alpha = (in_val - keys.key_in(prev)) / diff;

                if mode == InterpCurveMode::Linear {
                    return Interpolation::lerp_value(keys.key_out(prev), keys.key_out(i), alpha);
                }

                let tangent_scale = match keys.interp_method() {
                    InterpMethod::BrokenTangentEval => 1.0,
                    _ => diff,
                };
                return Interpolation::hermite_value(
                    keys.key_out(prev),
                    keys.key_leave_tangent(prev).scale(tangent_scale),
                    keys.key_out(i),
                    keys.key_arrive_tangent(i).scale(tangent_scale),
                    alpha,
                );
            }

            return keys.key_out(prev);
        }
    }

    keys.key_out(count - 1)
}

/// Recompute the tangents of every auto key.
///
/// End keys get a flat outer tangent; inner auto keys between curve keys get a
/// smooth tangent with equal arrive and leave; auto keys next to a constant
/// segment are flattened. Tangents of non-auto keys are left alone.
pub fn auto_set_tangents<T, K>(keys: &mut K, tension: f32)
where
    T: CurveValue,
    K: KeyTrackMut<T> + ?Sized,
{
    let count = keys.key_count();
    let method = keys.interp_method();

    for index in 0..count {
        let mut arrive = keys.key_arrive_tangent(index);
        let mut leave = keys.key_leave_tangent(index);
        let mode = keys.key_mode(index);

        if index == 0 {
            if count == 1 || mode.is_auto() {
                leave = T::zero();
            }
        } else if index < count - 1 {
            if mode.is_auto() {
                let prev_mode = keys.key_mode(index - 1);
                if prev_mode.is_curve() && mode.is_curve() {
                    arrive = if method.is_legacy() {
                        legacy_auto_calc_tangent(
                            keys.key_out(index - 1),
                            keys.key_out(index),
                            keys.key_out(index + 1),
                            tension,
                        )
                    } else {
                        compute_curve_tangent(
                            keys.key_in(index - 1),
                            keys.key_out(index - 1),
                            keys.key_in(index),
                            keys.key_out(index),
                            keys.key_in(index + 1),
                            keys.key_out(index + 1),
                            tension,
                            mode == InterpCurveMode::CurveAutoClamped,
                        )
                    };
                    leave = arrive;
                } else if prev_mode == InterpCurveMode::Constant {
                    arrive = T::zero();
                    leave = T::zero();
                }
            }
        } else if mode.is_auto() {
            arrive = T::zero();
        }

        keys.set_key_tangents(index, arrive, leave);
    }
}

/// Channel-wise min/max output over all keys, including curve overshoot
pub fn calc_bounds<T, K>(keys: &K, default: T) -> (T, T)
where
    T: CurveValue,
    K: KeyTrack<T> + ?Sized,
{
    let count = keys.key_count();
    if count == 0 {
        return (default, default);
    }

    let mut min = keys.key_out(0);
    let mut max = min;

    for i in 1..count {
        let start = SegmentEnd {
            in_val: keys.key_in(i - 1),
            out_val: keys.key_out(i - 1),
            tangent: keys.key_leave_tangent(i - 1),
        };
        let end = SegmentEnd {
            in_val: keys.key_in(i),
            out_val: keys.key_out(i),
            tangent: keys.key_arrive_tangent(i),
        };
        interval_bounds(start, end, keys.key_mode(i - 1).is_curve(), &mut min, &mut max);
    }

    (min, max)
}

/// Turn every auto key into a user key so its current tangents are kept
pub fn bake_auto_tangents<T, K>(keys: &mut K) -> usize
where
    T: CurveValue,
    K: KeyTrackMut<T> + ?Sized,
{
    let mut baked = 0;
    for index in 0..keys.key_count() {
        if keys.key_mode(index).is_auto() {
            keys.set_key_mode(index, InterpCurveMode::CurveUser);
            baked += 1;
        }
    }
    baked
}

/// Insertion index for a new key at `in_val`: before the first key whose
/// input is not smaller.
pub fn insertion_index<T, K>(keys: &K, in_val: f32) -> usize
where
    T: CurveValue,
    K: KeyTrack<T> + ?Sized,
{
    (0..keys.key_count())
        .find(|&i| keys.key_in(i) >= in_val)
        .unwrap_or(keys.key_count())
}
