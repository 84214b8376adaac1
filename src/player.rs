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

//! Headless stepping drivers for the interpolation core.
//!
//! Each driver exposes a single `advance(delta)` entry point and owns nothing
//! but its accumulator state, replacing any per-platform frame-callback
//! mechanism: a front end calls `advance` once per rendered frame with a
//! monotonically non-negative increment and draws whatever comes back. The
//! drivers never block, never schedule, and stopping one is simply ceasing
//! to call it.

use crate::keyframe::KeyframeSequence;
use crate::math::{Quaternion, Vec3};
use serde::{Deserialize, Serialize};

/// Selects how an [`OrientationPlayer`] interpolates within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Shortest-arc spherical interpolation between segment endpoints.
    Slerp,
    /// Spline evaluation through the segment's four control points.
    Spline,
}

/// The result of advancing an [`OrientationPlayer`] by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStep {
    /// The interpolated orientation for this frame.
    pub orientation: Quaternion,
    /// Whether this step crossed a segment boundary.
    pub segment_completed: bool,
    /// Whether playback has run out of segments.
    pub finished: bool,
}

/// Plays a [`KeyframeSequence`] from start to finish, one segment at a time.
///
/// The time accumulator runs over `[0, 1]` per segment. When it reaches 1 it
/// resets to 0 and the segment index advances; playback finishes when the
/// index runs out of segments. The sample taken on a crossing frame uses the
/// accumulated value as-is (slightly past 1), matching the unclamped slerp
/// contract.
#[derive(Debug, Clone)]
pub struct OrientationPlayer {
    keys: KeyframeSequence,
    mode: InterpolationMode,
    segment: usize,
    time: f32,
    finished: bool,
}

impl OrientationPlayer {
    /// Creates a player positioned at the start of the sequence.
    pub fn new(keys: KeyframeSequence, mode: InterpolationMode) -> Self {
        Self {
            keys,
            mode,
            segment: 0,
            time: 0.0,
            finished: false,
        }
    }

    /// Returns the interpolation mode this player was built with.
    #[inline]
    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    /// Returns the index of the segment currently being played.
    #[inline]
    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Returns `true` once playback has consumed every segment.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the keyframe sequence being played.
    #[inline]
    pub fn keyframes(&self) -> &KeyframeSequence {
        &self.keys
    }

    /// Rewinds playback to the start of the first segment.
    pub fn reset(&mut self) {
        self.segment = 0;
        self.time = 0.0;
        self.finished = false;
    }

    /// Advances the accumulator by `delta` (in segment-normalized time) and
    /// returns the orientation for this frame.
    ///
    /// `delta` must be non-negative; the caller supplies monotonically
    /// increasing time. Once finished, further calls keep returning the final
    /// orientation.
    pub fn advance(&mut self, delta: f32) -> PlayerStep {
        if self.finished {
            return PlayerStep {
                orientation: self.keys.final_orientation(),
                segment_completed: false,
                finished: true,
            };
        }

        self.time += delta;
        let orientation = match self.mode {
            InterpolationMode::Slerp => self.keys.sample_slerp(self.segment, self.time),
            InterpolationMode::Spline => self.keys.sample_spline(self.segment, self.time),
        };

        let mut segment_completed = false;
        if self.time >= 1.0 {
            segment_completed = true;
            self.time = 0.0;
            self.segment += 1;
            if self.segment >= self.keys.segment_count() {
                self.finished = true;
                log::debug!(
                    "playback finished after {} segments",
                    self.keys.segment_count()
                );
            } else {
                log::trace!("segment complete, advancing to {}", self.segment);
            }
        }

        PlayerStep {
            orientation,
            segment_completed,
            finished: self.finished,
        }
    }
}

/// The result of advancing a [`SpinPlayer`] by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinStep {
    /// The origin point rotated by the (composed) rotation.
    pub position: Vec3,
    /// The origin point rotated by each component rotation separately, when
    /// the player composes two axes.
    pub component_positions: Option<(Vec3, Vec3)>,
    /// Whether the sweep limit has been reached.
    pub finished: bool,
}

/// Sweeps a marker point around one axis, or around the composition of two.
///
/// Every frame the accumulated angle grows by the caller's increment and the
/// rotation is rebuilt from axis/angle, so the marker traces a circle (one
/// axis) or a Lissajous-like closed path (two axes composed). The sweep
/// finishes when the accumulated angle's magnitude reaches the configured
/// limit.
///
/// Axes must be unit length, as everywhere in the math core.
#[derive(Debug, Clone)]
pub struct SpinPlayer {
    primary_axis: Vec3,
    secondary_axis: Option<Vec3>,
    origin: Vec3,
    angle: f32,
    sweep_limit: f32,
    finished: bool,
}

impl SpinPlayer {
    /// Creates a single-axis sweep of `origin` about `axis`, stopping once
    /// the accumulated angle reaches `sweep_limit` in magnitude.
    pub fn new(axis: Vec3, origin: Vec3, sweep_limit: f32) -> Self {
        Self {
            primary_axis: axis,
            secondary_axis: None,
            origin,
            angle: 0.0,
            sweep_limit,
            finished: false,
        }
    }

    /// Creates a sweep that rotates `origin` by the composition of two
    /// rotations sharing one accumulated angle: the secondary rotation is
    /// applied first, then the primary.
    pub fn composite(primary_axis: Vec3, secondary_axis: Vec3, origin: Vec3, sweep_limit: f32) -> Self {
        Self {
            primary_axis,
            secondary_axis: Some(secondary_axis),
            origin,
            angle: 0.0,
            sweep_limit,
            finished: false,
        }
    }

    /// Returns the accumulated sweep angle in radians.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Returns `true` once the sweep limit has been reached.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances the sweep by `delta_angle` radians (negative to sweep the
    /// other way) and returns the rotated marker position(s).
    pub fn advance(&mut self, delta_angle: f32) -> SpinStep {
        if !self.finished {
            self.angle += delta_angle;
            if self.angle.abs() >= self.sweep_limit.abs() {
                self.finished = true;
                log::debug!("sweep finished at {} rad", self.angle);
            }
        }

        let primary = Quaternion::from_axis_angle(self.primary_axis, self.angle);
        match self.secondary_axis {
            None => SpinStep {
                position: primary.rotate_vec3(self.origin),
                component_positions: None,
                finished: self.finished,
            },
            Some(axis) => {
                let secondary = Quaternion::from_axis_angle(axis, self.angle);
                let composed = primary * secondary;
                SpinStep {
                    position: composed.rotate_vec3(self.origin),
                    component_positions: Some((
                        primary.rotate_vec3(self.origin),
                        secondary.rotate_vec3(self.origin),
                    )),
                    finished: self.finished,
                }
            }
        }
    }
}

/// The result of advancing an [`ArcTracer`] by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStep {
    /// Point on the shortest arc between the first orientation pair.
    pub shortest: Vec3,
    /// Point on the longest arc between the second orientation pair.
    pub longest: Vec3,
    /// Whether the trace parameter has reached 1.
    pub finished: bool,
}

/// Traces the shortest arc `from → via` and the longest arc `via → to` in
/// lockstep, reporting where each interpolated rotation carries a fixed
/// origin point.
///
/// This is the side-by-side comparison of the two complementary great-circle
/// paths: one parameter drives both interpolations, and the trace completes
/// when it reaches 1.
#[derive(Debug, Clone)]
pub struct ArcTracer {
    from: Quaternion,
    via: Quaternion,
    to: Quaternion,
    origin: Vec3,
    time: f32,
    finished: bool,
}

impl ArcTracer {
    /// Creates a tracer over the three orientations, carrying `origin`.
    pub fn new(from: Quaternion, via: Quaternion, to: Quaternion, origin: Vec3) -> Self {
        Self {
            from,
            via,
            to,
            origin,
            time: 0.0,
            finished: false,
        }
    }

    /// Returns where each of the three orientations carries the origin point.
    /// Front ends typically mark these as the fixed endpoints of the traces.
    pub fn anchors(&self) -> [Vec3; 3] {
        [
            self.from.rotate_vec3(self.origin),
            self.via.rotate_vec3(self.origin),
            self.to.rotate_vec3(self.origin),
        ]
    }

    /// Returns `true` once the trace parameter has reached 1.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances the trace parameter by `delta` and returns the current point
    /// on each arc.
    pub fn advance(&mut self, delta: f32) -> ArcStep {
        self.time += delta;
        if self.time >= 1.0 && !self.finished {
            self.finished = true;
            log::debug!("arc trace finished");
        }

        let q_short = Quaternion::slerp(self.from, self.via, self.time);
        let q_long = Quaternion::slerp_longest(self.via, self.to, self.time);
        ArcStep {
            shortest: q_short.rotate_vec3(self.origin),
            longest: q_long.rotate_vec3(self.origin),
            finished: self.finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{degrees_to_radians, EPSILON, FRAC_PI_2, PI};
    use approx::assert_relative_eq;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx::relative_eq!(a.x, b.x, epsilon = EPSILON * 10.0)
            && approx::relative_eq!(a.y, b.y, epsilon = EPSILON * 10.0)
            && approx::relative_eq!(a.z, b.z, epsilon = EPSILON * 10.0)
    }

    #[test]
    fn test_player_slerp_single_segment() {
        let keys = KeyframeSequence::new(vec![
            Quaternion::IDENTITY,
            Quaternion::from_axis_angle(Vec3::X, PI),
        ])
        .unwrap();
        let mut player = OrientationPlayer::new(keys, InterpolationMode::Slerp);
        assert_eq!(player.keyframes().segment_count(), 1);

        let step = player.advance(0.5);
        assert!(!step.segment_completed);
        assert!(!step.finished);
        let expected_half = Quaternion::from_axis_angle(Vec3::X, FRAC_PI_2);
        assert!(step.orientation.dot(expected_half).abs() > 1.0 - EPSILON * 10.0);

        let step = player.advance(0.5);
        assert!(step.segment_completed);
        assert!(step.finished);
        let expected_full = Quaternion::from_axis_angle(Vec3::X, PI);
        assert!(step.orientation.dot(expected_full).abs() > 1.0 - EPSILON * 10.0);
    }

    #[test]
    fn test_player_advances_segments_and_finishes() {
        let keys = KeyframeSequence::new(vec![
            Quaternion::from_axis_angle(Vec3::Y, 0.0),
            Quaternion::from_axis_angle(Vec3::Y, 0.4),
            Quaternion::from_axis_angle(Vec3::Y, 0.8),
        ])
        .unwrap();
        let mut player = OrientationPlayer::new(keys, InterpolationMode::Spline);
        assert_eq!(player.keyframes().segment_count(), 2);

        // Four 0.5 steps walk both segments to completion.
        assert_eq!(player.segment(), 0);
        player.advance(0.5);
        let step = player.advance(0.5);
        assert!(step.segment_completed);
        assert!(!step.finished);
        assert_eq!(player.segment(), 1);

        player.advance(0.5);
        let step = player.advance(0.5);
        assert!(step.segment_completed);
        assert!(step.finished);
        assert!(player.is_finished());
    }

    #[test]
    fn test_finished_player_holds_final_orientation() {
        let last = Quaternion::from_axis_angle(Vec3::Z, 1.0);
        let keys = KeyframeSequence::new(vec![Quaternion::IDENTITY, last]).unwrap();
        let mut player = OrientationPlayer::new(keys, InterpolationMode::Slerp);

        player.advance(1.5);
        assert!(player.is_finished());

        let step = player.advance(0.5);
        assert!(step.finished);
        assert!(!step.segment_completed);
        assert!(step.orientation.dot(last).abs() > 1.0 - EPSILON * 10.0);
    }

    #[test]
    fn test_player_reset() {
        let keys = KeyframeSequence::new(vec![
            Quaternion::IDENTITY,
            Quaternion::from_axis_angle(Vec3::X, 1.0),
        ])
        .unwrap();
        let mut player = OrientationPlayer::new(keys, InterpolationMode::Slerp);
        player.advance(2.0);
        assert!(player.is_finished());

        player.reset();
        assert!(!player.is_finished());
        assert_eq!(player.segment(), 0);
        let step = player.advance(0.0);
        assert!(step.orientation.dot(Quaternion::IDENTITY).abs() > 1.0 - EPSILON * 10.0);
    }

    #[test]
    fn test_spin_player_single_axis() {
        let step_angle = degrees_to_radians(-1.0);
        let mut spin = SpinPlayer::new(Vec3::X, Vec3::Z, degrees_to_radians(60.0));

        let step = spin.advance(step_angle);
        assert!(!step.finished);
        assert!(step.component_positions.is_none());
        let expected = Quaternion::from_axis_angle(Vec3::X, step_angle).rotate_vec3(Vec3::Z);
        assert!(vec_approx_eq(step.position, expected));
        assert_relative_eq!(step.position.length(), 1.0, epsilon = EPSILON * 10.0);
    }

    #[test]
    fn test_spin_player_reaches_limit() {
        let mut spin = SpinPlayer::new(Vec3::X, Vec3::Z, degrees_to_radians(2.0));
        let step_angle = degrees_to_radians(-1.0);
        assert!(!spin.advance(step_angle).finished);
        assert!(spin.advance(step_angle).finished);
        assert!(spin.is_finished());
    }

    #[test]
    fn test_spin_player_composite_matches_manual_composition() {
        let secondary = Vec3::new(0.0, -0.75, -0.5).normalize();
        let mut spin = SpinPlayer::composite(Vec3::X, secondary, Vec3::Z, std::f32::consts::TAU);

        let delta = degrees_to_radians(-10.0);
        let step = spin.advance(delta);

        let qa = Quaternion::from_axis_angle(Vec3::X, delta);
        let qb = Quaternion::from_axis_angle(secondary, delta);
        let expected = (qa * qb).rotate_vec3(Vec3::Z);
        assert!(vec_approx_eq(step.position, expected));

        let (pa, pb) = step.component_positions.unwrap();
        assert!(vec_approx_eq(pa, qa.rotate_vec3(Vec3::Z)));
        assert!(vec_approx_eq(pb, qb.rotate_vec3(Vec3::Z)));
    }

    #[test]
    fn test_arc_tracer_traces_both_arcs() {
        let from = Quaternion::from_axis_angle(Vec3::new(0.0, -1.0, 0.0), PI / 6.0);
        let via = Quaternion::from_axis_angle(Vec3::new(-1.0, 1.0, 0.0).normalize(), PI / 6.0);
        let to = Quaternion::from_axis_angle(Vec3::new(1.0, 0.0, -1.0).normalize(), PI / 20.0);

        let mut tracer = ArcTracer::new(from, via, to, Vec3::Z);
        let anchors = tracer.anchors();
        assert!(vec_approx_eq(anchors[0], from.rotate_vec3(Vec3::Z)));

        let step = tracer.advance(0.25);
        assert!(!step.finished);
        let expected_short = Quaternion::slerp(from, via, 0.25).rotate_vec3(Vec3::Z);
        let expected_long = Quaternion::slerp_longest(via, to, 0.25).rotate_vec3(Vec3::Z);
        assert!(vec_approx_eq(step.shortest, expected_short));
        assert!(vec_approx_eq(step.longest, expected_long));

        // Interpolated rotations keep the marker on the unit sphere.
        assert_relative_eq!(step.shortest.length(), 1.0, epsilon = EPSILON * 10.0);
        assert_relative_eq!(step.longest.length(), 1.0, epsilon = EPSILON * 10.0);
    }

    #[test]
    fn test_arc_tracer_finishes_at_one() {
        let via = Quaternion::from_axis_angle(Vec3::Y, 0.5);
        let mut tracer = ArcTracer::new(Quaternion::IDENTITY, via, Quaternion::IDENTITY, Vec3::Z);
        for _ in 0..4 {
            assert!(!tracer.advance(0.2).finished);
        }
        assert!(tracer.advance(0.2).finished);
        assert!(tracer.is_finished());
    }
}
