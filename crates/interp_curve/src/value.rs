// SPDX-License-Identifier: MIT OR Apache-2.0
//! Values that can be stored in a curve.

use std::fmt::Debug;

/// Three component vector (x, y, z)
pub type Vec3 = [f32; 3];

/// A value made of one or more scalar channels that a curve can interpolate.
///
/// All curve math is done channel by channel, so an implementation only has to
/// expose its channels; the arithmetic helpers are provided.
pub trait CurveValue: Copy + Default + PartialEq + Debug {
    /// Number of scalar channels
    const CHANNELS: usize;

    /// Read a channel
    fn channel(&self, index: usize) -> f32;

    /// Mutable access to a channel
    fn channel_mut(&mut self, index: usize) -> &mut f32;

    /// The all-zero value
    fn zero() -> Self {
        Self::default()
    }

    /// Apply `f` to every channel
    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        let mut out = self;
        for i in 0..Self::CHANNELS {
            *out.channel_mut(i) = f(self.channel(i));
        }
        out
    }

    /// Combine two values channel by channel
    fn zip_map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut out = self;
        for i in 0..Self::CHANNELS {
            *out.channel_mut(i) = f(self.channel(i), other.channel(i));
        }
        out
    }

    /// Channel-wise sum
    fn add(self, other: Self) -> Self {
        self.zip_map(other, |a, b| a + b)
    }

    /// Channel-wise difference
    fn sub(self, other: Self) -> Self {
        self.zip_map(other, |a, b| a - b)
    }

    /// Multiply every channel by `factor`
    fn scale(self, factor: f32) -> Self {
        self.map(|v| v * factor)
    }

    /// Smallest channel
    fn min_channel(&self) -> f32 {
        (1..Self::CHANNELS).fold(self.channel(0), |acc, i| acc.min(self.channel(i)))
    }

    /// Largest channel
    fn max_channel(&self) -> f32 {
        (1..Self::CHANNELS).fold(self.channel(0), |acc, i| acc.max(self.channel(i)))
    }
}

impl CurveValue for f32 {
    const CHANNELS: usize = 1;

    fn channel(&self, index: usize) -> f32 {
        debug_assert_eq!(index, 0, "f32 has a single channel");
        *self
    }

    fn channel_mut(&mut self, index: usize) -> &mut f32 {
        debug_assert_eq!(index, 0, "f32 has a single channel");
        self
    }
}

impl CurveValue for Vec3 {
    const CHANNELS: usize = 3;

    fn channel(&self, index: usize) -> f32 {
        self[index]
    }

    fn channel_mut(&mut self, index: usize) -> &mut f32 {
        &mut self[index]
    }
}
