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

//! Canonical demo content, kept headless.
//!
//! This module carries the data sets the classic rotation demos animate: the
//! unit-cube corner vertices, the fixed cube keyframe table, the jittered
//! marker ring for spline playback, and the mode enumeration a front end
//! offers in its UI. Everything here is plain data plus constructors; the
//! corresponding motion comes from the [`player`](crate::player) drivers.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::keyframe::{KeyframeError, KeyframeSequence};
use crate::math::{Quaternion, Vec3, DEG_TO_RAD, FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI, TAU};

/// The demo scenarios a front end can offer. Which driver to construct for
/// each mode is the front end's decision; this is plain selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemoMode {
    /// A marker swept around a single fixed axis.
    SimpleRotation,
    /// A marker driven by the composition of two axis rotations.
    CompositeRotation,
    /// Shortest- and longest-arc slerp traced side by side.
    SphericalInterpolate,
    /// Spline playback around the jittered marker ring.
    SplineInterpolate,
    /// Cube vertices rotated through the keyframe table by slerp.
    CubeSlerp,
    /// Cube vertices rotated through the keyframe table by spline.
    CubeSpline,
}

impl DemoMode {
    /// Every mode, in presentation order.
    pub const ALL: [DemoMode; 6] = [
        DemoMode::SimpleRotation,
        DemoMode::CompositeRotation,
        DemoMode::SphericalInterpolate,
        DemoMode::SplineInterpolate,
        DemoMode::CubeSlerp,
        DemoMode::CubeSpline,
    ];

    /// Short display label for toolbar segments.
    pub fn label(&self) -> &'static str {
        match self {
            DemoMode::SimpleRotation => "Simple",
            DemoMode::CompositeRotation => "Composite",
            DemoMode::SphericalInterpolate => "Spherical",
            DemoMode::SplineInterpolate => "Spline",
            DemoMode::CubeSlerp => "Cube: slerp",
            DemoMode::CubeSpline => "Cube: spline",
        }
    }
}

/// Unit vector from the origin to the demo sphere's surface along `+z`; the
/// point every sphere demo sweeps around.
pub const MARKER_ORIGIN: Vec3 = Vec3::Z;

/// Per-frame angle increment of the simple and composite sweeps (1 degree,
/// negative direction).
pub const SWEEP_STEP: f32 = -DEG_TO_RAD;
/// Sweep limit of the simple-rotation demo (60 degrees).
pub const SIMPLE_SWEEP_LIMIT: f32 = 60.0 * DEG_TO_RAD;
/// Sweep limit of the composite-rotation demo (one full turn).
pub const COMPOSITE_SWEEP_LIMIT: f32 = TAU;
/// Per-frame parameter increment of the arc-tracing demo.
pub const ARC_INCREMENT: f32 = 0.005;
/// Per-frame parameter increment of the marker-ring spline demo.
pub const RING_INCREMENT: f32 = 0.04;
/// Per-frame parameter increment of the cube demos.
pub const CUBE_INCREMENT: f32 = 0.02;

/// Initial position vectors of the 8 corners of a unit cube.
pub const CUBE_VERTEX_ORIGINS: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(-0.5, 0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
];

/// Triangle indices into [`CUBE_VERTEX_ORIGINS`], two triangles per face,
/// for front ends that upload the cube as raw geometry.
pub const CUBE_TRIANGLE_INDICES: [u8; 36] = [
    0, 2, 1, 1, 2, 3, // bottom
    2, 6, 3, 3, 6, 7, // back
    0, 4, 2, 2, 4, 6, // left
    1, 3, 5, 3, 7, 5, // right
    0, 1, 4, 1, 5, 4, // front
    4, 5, 6, 5, 7, 6, // top
];

/// The primary and secondary rotation axes of the composite-rotation demo.
pub fn composite_axes() -> (Vec3, Vec3) {
    (Vec3::X, Vec3::new(0.0, -0.75, -0.5).normalize())
}

/// The three orientations of the arc-tracing demo: the shortest arc is
/// traced between the first two, the longest arc between the last two.
pub fn arc_rotations() -> (Quaternion, Quaternion, Quaternion) {
    let q0 = Quaternion::from_axis_angle(Vec3::new(0.0, -1.0, 0.0), FRAC_PI_6);
    let q1 = Quaternion::from_axis_angle(Vec3::new(-1.0, 1.0, 0.0).normalize(), FRAC_PI_6);
    let q2 = Quaternion::from_axis_angle(Vec3::new(1.0, 0.0, -1.0).normalize(), PI / 20.0);
    (q0, q1, q2)
}

/// The fixed keyframe table of the cube demos: a gentle wobble out through
/// mixed axes and back to rest, already padded with its flanking entries.
pub fn cube_keyframes() -> Result<KeyframeSequence, KeyframeError> {
    let diag = Vec3::new(1.0, 0.0, -1.0).normalize();
    KeyframeSequence::from_padded(vec![
        Quaternion::from_axis_angle(Vec3::Z, 0.0), // before
        Quaternion::from_axis_angle(Vec3::Z, 0.0),
        Quaternion::from_axis_angle(Vec3::Y, PI * 0.05),
        Quaternion::from_axis_angle(diag, PI * 0.1),
        Quaternion::from_axis_angle(Vec3::Y, PI * 0.15),
        Quaternion::from_axis_angle(-diag, PI * 0.2),
        Quaternion::from_axis_angle(-Vec3::Y, PI * 0.15),
        Quaternion::from_axis_angle(diag, PI * 0.1),
        Quaternion::from_axis_angle(Vec3::Y, PI * 0.05),
        Quaternion::from_axis_angle(Vec3::Z, 0.0),
        Quaternion::from_axis_angle(Vec3::Z, 0.0), // after
    ])
}

/// A ring of marker orientations for spline playback, plus the sphere-surface
/// points where the markers sit.
#[derive(Debug, Clone)]
pub struct MarkerRing {
    /// The padded keyframe sequence the spline player walks.
    pub sequence: KeyframeSequence,
    /// Where each marker orientation carries [`MARKER_ORIGIN`].
    pub markers: Vec<Vec3>,
}

/// Number of markers on the ring.
pub const MARKER_COUNT: usize = 12;

/// Builds the marker ring: one orientation per clock position, each the
/// composition of a latitude rotation about `+y` and a small random
/// longitude rotation about `+x` whose direction alternates per marker.
///
/// The ring closes on itself (the final orientation repeats the starting
/// latitude), and the table carries its own flanking entries, so every
/// segment is spline-evaluable.
pub fn marker_ring<R: Rng + ?Sized>(rng: &mut R) -> Result<MarkerRing, KeyframeError> {
    let mut rotations = Vec::with_capacity(MARKER_COUNT + 2);
    rotations.push(Quaternion::from_axis_angle(Vec3::X, 0.0));

    let mut markers = Vec::with_capacity(MARKER_COUNT);
    for i in 0..=MARKER_COUNT {
        let angle = TAU / MARKER_COUNT as f32 * i as f32;
        let latitude = Quaternion::from_axis_angle(Vec3::Y, (angle - FRAC_PI_2) * 0.3);

        let dir = if i % 2 == 0 { -1.0 } else { 1.0 };
        let jitter: f32 = rng.random_range(0.0..0.25);
        let longitude = Quaternion::from_axis_angle(Vec3::X, FRAC_PI_4 * jitter * dir);

        let q = latitude * longitude;
        rotations.push(q);

        // The closing orientation repeats the ring start and only serves as
        // the final flanking entry; it gets no marker.
        if i != MARKER_COUNT {
            markers.push(q.rotate_vec3(MARKER_ORIGIN));
        }
    }

    log::debug!("built marker ring with {} orientations", rotations.len());
    let sequence = KeyframeSequence::from_padded(rotations)?;
    Ok(MarkerRing { sequence, markers })
}

/// Rotates every vertex of a shape by one orientation, always from the
/// original positions (the rotation is absolute, not cumulative).
pub fn rotate_vertices<const N: usize>(q: Quaternion, origins: &[Vec3; N]) -> [Vec3; N] {
    origins.map(|v| q.rotate_vec3(v))
}
