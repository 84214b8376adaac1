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

//! # Gyre
//!
//! Quaternion rotation and interpolation core with headless keyframe playback.
//!
//! The crate is a pure computation library: every function takes orientations,
//! vectors, and time parameters by value and returns the interpolated result
//! by value. Nothing here renders, schedules frames, or touches a window; a
//! front end drives the [`player`] types once per frame and draws whatever
//! positions and orientations come back.
//!
//! The mathematical core lives in [`math`]: unit-quaternion construction from
//! axis/angle, Hamilton composition, vector rotation, shortest- and
//! longest-arc slerp, and 4-point spline evaluation. [`keyframe`] wraps
//! orientation sequences with the boundary-padding invariant spline
//! evaluation relies on, and [`demo`] carries the canonical data sets
//! (unit-cube vertices, keyframe tables, the jittered marker ring) that
//! front ends can animate.

#![warn(missing_docs)]

pub mod demo;
pub mod keyframe;
pub mod math;
pub mod player;

pub use keyframe::{KeyframeError, KeyframeSequence};
pub use math::{Quaternion, Vec3};
pub use player::{
    ArcStep, ArcTracer, InterpolationMode, OrientationPlayer, PlayerStep, SpinPlayer, SpinStep,
};
