// Copyright 2025 the gyre authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Orientation keyframe sequences with the boundary padding that spline
//! evaluation requires.
//!
//! Evaluating a spline segment needs the two keyframes it connects plus one
//! flanking neighbor on each side. A sequence of N keyframes therefore only
//! supports spline evaluation on its interior. Rather than making every
//! caller special-case the first and last segment, a [`KeyframeSequence`]
//! stores the table with one repeated copy of the first and last orientation
//! at each end, so every segment always has its four control points. This
//! padding is an invariant of the data, not an optional convenience.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::Quaternion;

/// An error produced while constructing a [`KeyframeSequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyframeError {
    /// Not enough keyframes were supplied to form a single evaluable segment.
    TooFewKeyframes {
        /// The number of keyframes supplied.
        supplied: usize,
        /// The minimum number required by the constructor used.
        required: usize,
    },
}

impl fmt::Display for KeyframeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyframeError::TooFewKeyframes { supplied, required } => {
                write!(
                    f,
                    "Keyframe sequence needs at least {required} entries, got {supplied}"
                )
            }
        }
    }
}

impl std::error::Error for KeyframeError {}

/// An ordered, read-only sequence of unit-quaternion keyframes, padded at
/// both ends so that every segment can be spline-evaluated.
///
/// Segment `s` interpolates between the `s+1`-th and `s+2`-th stored
/// orientation; its spline control points are the stored entries
/// `s, s+1, s+2, s+3`. All keyframes must be unit quaternions; this is the
/// same unchecked precondition as everywhere else in the math core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeSequence {
    keys: Vec<Quaternion>,
}

impl KeyframeSequence {
    /// Creates a sequence from unpadded keyframes, duplicating the first and
    /// last entry to pad the boundary.
    ///
    /// At least 2 keyframes are required (one segment after padding).
    pub fn new(keys: Vec<Quaternion>) -> Result<Self, KeyframeError> {
        if keys.len() < 2 {
            return Err(KeyframeError::TooFewKeyframes {
                supplied: keys.len(),
                required: 2,
            });
        }
        let mut padded = Vec::with_capacity(keys.len() + 2);
        padded.push(keys[0]);
        padded.extend_from_slice(&keys);
        padded.push(keys[keys.len() - 1]);
        Ok(Self { keys: padded })
    }

    /// Creates a sequence from a table that already carries its own flanking
    /// entries (one duplicated orientation at each end).
    ///
    /// At least 4 keyframes are required (one segment).
    pub fn from_padded(keys: Vec<Quaternion>) -> Result<Self, KeyframeError> {
        if keys.len() < 4 {
            return Err(KeyframeError::TooFewKeyframes {
                supplied: keys.len(),
                required: 4,
            });
        }
        Ok(Self { keys })
    }

    /// Returns the number of stored keyframes, padding included.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`: a sequence cannot be constructed empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the number of evaluable segments.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.keys.len() - 3
    }

    /// Returns the four spline control points of a segment: flanking
    /// neighbor, segment start, segment end, flanking neighbor.
    ///
    /// # Panics
    /// Panics if `segment >= segment_count()`.
    #[inline]
    pub fn control_points(&self, segment: usize) -> [Quaternion; 4] {
        assert!(
            segment < self.segment_count(),
            "segment {segment} out of range for {} segments",
            self.segment_count()
        );
        [
            self.keys[segment],
            self.keys[segment + 1],
            self.keys[segment + 2],
            self.keys[segment + 3],
        ]
    }

    /// Returns the orientations a segment starts and ends at.
    ///
    /// # Panics
    /// Panics if `segment >= segment_count()`.
    #[inline]
    pub fn endpoints(&self, segment: usize) -> (Quaternion, Quaternion) {
        let [_, from, to, _] = self.control_points(segment);
        (from, to)
    }

    /// Evaluates the spline curve of a segment at parameter `t` in `[0, 1]`.
    ///
    /// # Panics
    /// Panics if `segment >= segment_count()`.
    pub fn sample_spline(&self, segment: usize, t: f32) -> Quaternion {
        let [before, from, to, after] = self.control_points(segment);
        Quaternion::spline(before, from, to, after, t)
    }

    /// Interpolates a segment's endpoints along the shortest arc at
    /// parameter `t`. Values past 1 extrapolate, as with
    /// [`Quaternion::slerp`].
    ///
    /// # Panics
    /// Panics if `segment >= segment_count()`.
    pub fn sample_slerp(&self, segment: usize, t: f32) -> Quaternion {
        let (from, to) = self.endpoints(segment);
        Quaternion::slerp(from, to, t)
    }

    /// Returns the orientation the final segment ends at.
    #[inline]
    pub fn final_orientation(&self) -> Quaternion {
        self.keys[self.keys.len() - 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec3, EPSILON};

    fn spin(angle: f32) -> Quaternion {
        Quaternion::from_axis_angle(Vec3::Y, angle)
    }

    #[test]
    fn test_new_pads_both_ends() {
        let seq = KeyframeSequence::new(vec![spin(0.1), spin(0.2), spin(0.3)]).unwrap();
        assert_eq!(seq.len(), 5);
        assert_eq!(seq.segment_count(), 2);

        // First segment's before-neighbor is the duplicated first key.
        let [before, from, _, _] = seq.control_points(0);
        assert_eq!(before, from);

        // Last segment's after-neighbor is the duplicated last key.
        let last = seq.segment_count() - 1;
        let [_, _, to, after] = seq.control_points(last);
        assert_eq!(to, after);
    }

    #[test]
    fn test_minimum_sizes() {
        assert!(matches!(
            KeyframeSequence::new(vec![spin(0.0)]),
            Err(KeyframeError::TooFewKeyframes {
                supplied: 1,
                required: 2
            })
        ));
        assert!(KeyframeSequence::new(vec![spin(0.0), spin(1.0)]).is_ok());

        assert!(matches!(
            KeyframeSequence::from_padded(vec![spin(0.0), spin(1.0), spin(2.0)]),
            Err(KeyframeError::TooFewKeyframes {
                supplied: 3,
                required: 4
            })
        ));
        let padded =
            KeyframeSequence::from_padded(vec![spin(0.0), spin(0.0), spin(1.0), spin(1.0)])
                .unwrap();
        assert_eq!(padded.segment_count(), 1);
    }

    #[test]
    fn test_error_message() {
        let err = KeyframeSequence::new(Vec::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Keyframe sequence needs at least 2 entries, got 0"
        );
    }

    #[test]
    fn test_every_segment_is_evaluable() {
        let keys: Vec<Quaternion> = (0..6).map(|i| spin(i as f32 * 0.3)).collect();
        let seq = KeyframeSequence::new(keys).unwrap();
        for s in 0..seq.segment_count() {
            let q = seq.sample_spline(s, 0.5);
            assert!((q.magnitude() - 1.0).abs() < EPSILON * 10.0);
        }
    }

    #[test]
    fn test_sampling_hits_segment_endpoints() {
        let seq = KeyframeSequence::new(vec![spin(0.0), spin(0.4), spin(0.9)]).unwrap();
        let (from, to) = seq.endpoints(1);

        let s0 = seq.sample_spline(1, 0.0);
        let s1 = seq.sample_spline(1, 1.0);
        assert!(s0.dot(from).abs() > 1.0 - EPSILON * 10.0);
        assert!(s1.dot(to).abs() > 1.0 - EPSILON * 10.0);

        let l0 = seq.sample_slerp(1, 0.0);
        assert!(l0.dot(from).abs() > 1.0 - EPSILON * 10.0);
    }

    #[test]
    fn test_final_orientation() {
        let seq = KeyframeSequence::new(vec![spin(0.0), spin(0.4), spin(0.9)]).unwrap();
        assert_eq!(seq.final_orientation(), spin(0.9));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_control_points_out_of_range_panics() {
        let seq = KeyframeSequence::new(vec![spin(0.0), spin(0.4)]).unwrap();
        let _ = seq.control_points(1);
    }
}
