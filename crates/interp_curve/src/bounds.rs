// SPDX-License-Identifier: MIT OR Apache-2.0
//! Output bounds of curve segments.

use crate::point::Interpolation;
use crate::value::CurveValue;

const SMALL_NUMBER: f32 = 1.0e-8;

/// One end of a segment as seen by the bounds search
#[derive(Debug, Clone, Copy)]
pub struct SegmentEnd<T> {
    /// Input value of the key
    pub in_val: f32,
    /// Output value of the key
    pub out_val: T,
    /// Leave tangent for the start key, arrive tangent for the end key
    pub tangent: T,
}

/// Min and max of a single scalar segment.
///
/// For curve segments the interior extrema are found from the roots of the
/// Hermite derivative, with tangents scaled by the segment length the same way
/// evaluation scales them.
pub fn find_bounds(
    start: f32,
    start_leave_tangent: f32,
    start_in: f32,
    end: f32,
    end_arrive_tangent: f32,
    end_in: f32,
    is_curve: bool,
) -> (f32, f32) {
    let mut min = start.min(end);
    let mut max = start.max(end);

    if !is_curve {
        return (min, max);
    }

    let diff = end_in - start_in;
    let m0 = start_leave_tangent * diff;
    let m1 = end_arrive_tangent * diff;

    // d/dt of the Hermite basis: a*t^2 + b*t + c
    let a = 6.0 * start + 3.0 * m0 + 3.0 * m1 - 6.0 * end;
    let b = -6.0 * start - 4.0 * m0 - 2.0 * m1 + 6.0 * end;
    let c = m0;

    let discriminant = b * b - 4.0 * a * c;
    // A zero `a` means coincident ends with zero tangents
    if discriminant > 0.0 && a.abs() > SMALL_NUMBER {
        let sqrt_disc = discriminant.sqrt();
        for alpha in [(-b + sqrt_disc) / (2.0 * a), (-b - sqrt_disc) / (2.0 * a)] {
            let t = start_in + alpha * diff;
            if t > start_in && t < end_in {
                let value = Interpolation::hermite(start, m0, end, m1, alpha);
                min = min.min(value);
                max = max.max(value);
            }
        }
    }

    (min, max)
}

/// Grow `current_min`/`current_max` channel-wise by the bounds of one segment
pub fn interval_bounds<T: CurveValue>(
    start: SegmentEnd<T>,
    end: SegmentEnd<T>,
    is_curve: bool,
    current_min: &mut T,
    current_max: &mut T,
) {
    for i in 0..T::CHANNELS {
        let (min, max) = find_bounds(
            start.out_val.channel(i),
            start.tangent.channel(i),
            start.in_val,
            end.out_val.channel(i),
            end.tangent.channel(i),
            end.in_val,
            is_curve,
        );
        let cur_min = current_min.channel_mut(i);
        *cur_min = cur_min.min(min);
        let cur_max = current_max.channel_mut(i);
        *cur_max = cur_max.max(max);
    }
}
