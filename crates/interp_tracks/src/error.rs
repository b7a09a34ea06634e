// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track errors.

/// Errors from track-level keyframe operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    /// Key index past the end of the track
    #[error("Key index {index} out of range (track has {count} keys)")]
    KeyOutOfRange {
        /// Requested index
        index: usize,
        /// Number of keys in the track
        count: usize,
    },

    /// Sub-curve index that maps to no visible channel
    #[error("Sub-curve index {index} out of range (track exposes {count} sub-curves)")]
    SubCurveOutOfRange {
        /// Requested index
        index: usize,
        /// Number of sub-curves currently exposed
        count: usize,
    },

    /// The first key of a relative-to-initial move track is fixed
    #[error("The first key of a relative-to-initial move track cannot be removed")]
    PinnedFirstKey,

    /// Parallel curves do not share key count, times or modes
    #[error("Misaligned curves: {0}")]
    MisalignedCurves(String),
}

impl TrackError {
    /// Check a key index against a key count
    pub fn check_key(index: usize, count: usize) -> Result<(), Self> {
        if index < count {
            Ok(())
        } else {
            Err(Self::KeyOutOfRange { index, count })
        }
    }

    /// Check a sub-curve index against a sub-curve count
    pub fn check_sub_curve(index: usize, count: usize) -> Result<(), Self> {
        if index < count {
            Ok(())
        } else {
            Err(Self::SubCurveOutOfRange { index, count })
        }
    }
}

/// Turn a broken curve-editor precondition into a panic carrying the error text
pub(crate) fn precondition<T>(result: Result<T, TrackError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}
