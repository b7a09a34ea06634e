// SPDX-License-Identifier: MIT OR Apache-2.0
//! Automatic tangent computation.

use crate::point::Interpolation;
use crate::value::CurveValue;

/// Smallest time span used when normalizing tangents
pub const KINDA_SMALL_NUMBER: f32 = 1.0e-4;

/// Fraction of the prev-to-next height below/above which clamping kicks in
const CLAMP_THRESHOLD: f32 = 0.333;

/// Tangent used by curves still on a legacy interp method (not time-normalized)
pub fn legacy_auto_calc_tangent<T: CurveValue>(prev: T, cur: T, next: T, tension: f32) -> T {
    cur.sub(prev).add(next.sub(cur)).scale(0.5 * (1.0 - tension))
}

/// Catmull-Rom style tangent, before time normalization
pub fn auto_calc_tangent<T: CurveValue>(prev: T, cur: T, next: T, tension: f32) -> T {
    cur.sub(prev).add(next.sub(cur)).scale(1.0 - tension)
}

/// Clamp a float tangent so the curve does not overshoot its neighbours.
///
/// Returns zero at local extrema, otherwise the prev-to-next slope pulled
/// towards the flatter adjacent slope when the key sits close to one of its
/// neighbours in height.
pub fn clamp_float_tangent(
    prev_val: f32,
    prev_time: f32,
    cur_val: f32,
    cur_time: f32,
    next_val: f32,
    next_time: f32,
) -> f32 {
    let prev_to_next_time = (next_time - prev_time).max(KINDA_SMALL_NUMBER);
    let prev_to_cur_time = (cur_time - prev_time).max(KINDA_SMALL_NUMBER);
    let cur_to_next_time = (next_time - cur_time).max(KINDA_SMALL_NUMBER);

    let prev_to_next_height = next_val - prev_val;
    let prev_to_cur_height = cur_val - prev_val;
    let cur_to_next_height = next_val - cur_val;

    // Crest or trough
    if (prev_to_cur_height >= 0.0 && cur_to_next_height <= 0.0)
        || (prev_to_cur_height <= 0.0 && cur_to_next_height >= 0.0)
    {
        return 0.0;
    }

    let cur_to_next_tangent = cur_to_next_height / cur_to_next_time;
    let prev_to_cur_tangent = prev_to_cur_height / prev_to_cur_time;
    let prev_to_next_tangent = prev_to_next_height / prev_to_next_time;

    let mut clamped = prev_to_next_tangent;

    let lower = CLAMP_THRESHOLD;
    let upper = 1.0 - CLAMP_THRESHOLD;
    let cur_height_alpha = prev_to_cur_height / prev_to_next_height;

    if cur_height_alpha < lower {
        // 1.0 is fully flat, 0.0 leaves the tangent alone
        let clamp_alpha = 1.0 - cur_height_alpha / CLAMP_THRESHOLD;
        let lower_clamp =
            Interpolation::lerp(prev_to_next_tangent, prev_to_cur_tangent, clamp_alpha);
        clamped = if prev_to_next_height > 0.0 {
            clamped.min(lower_clamp)
        } else {
            clamped.max(lower_clamp)
        };
    }

    if cur_height_alpha > upper {
        let clamp_alpha = (cur_height_alpha - upper) / CLAMP_THRESHOLD;
        let upper_clamp =
            Interpolation::lerp(prev_to_next_tangent, cur_to_next_tangent, clamp_alpha);
        clamped = if prev_to_next_height > 0.0 {
            clamped.min(upper_clamp)
        } else {
            clamped.max(upper_clamp)
        };
    }

    clamped
}

/// Compute the auto tangent of an inner key from its neighbours.
///
/// With `want_clamping` every channel is clamped independently and the
/// tension applied afterwards; otherwise the tangent is normalized by the
/// prev-to-next time span.
pub fn compute_curve_tangent<T: CurveValue>(
    prev_time: f32,
    prev: T,
    cur_time: f32,
    cur: T,
    next_time: f32,
    next: T,
    tension: f32,
    want_clamping: bool,
) -> T {
    if want_clamping {
        let mut out = T::zero();
        for i in 0..T::CHANNELS {
            let clamped = clamp_float_tangent(
                prev.channel(i),
                prev_time,
                cur.channel(i),
                cur_time,
                next.channel(i),
                next_time,
            );
            *out.channel_mut(i) = (1.0 - tension) * clamped;
        }
        out
    } else {
        let prev_to_next_time = (next_time - prev_time).max(KINDA_SMALL_NUMBER);
        auto_calc_tangent(prev, cur, next, tension).scale(1.0 / prev_to_next_time)
    }
}
