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

//! Provides a Quaternion type for representing and interpolating 3D rotations.

use serde::{Deserialize, Serialize};

use super::{Vec3, EPSILON};
use std::ops::{Add, Mul, MulAssign, Neg, Sub};

/// Represents a rotation as a quaternion.
///
/// A quaternion is stored as `(x, y, z, w)`, where `[x, y, z]` is the vector
/// part and `w` is the scalar part. Every operation that treats the value as a
/// rotation (vector rotation, slerp, spline) assumes a **unit quaternion**
/// where `x² + y² + z² + w² = 1`; feeding a non-unit value into those
/// operations is a caller error, and the result is unspecified. Values are
/// never renormalized behind the caller's back, since that would mask the bug
/// and quietly change numerically sensitive output.
///
/// A unit quaternion and its negation represent the same rotation. The
/// interpolation functions exploit this: [`slerp`](Self::slerp) flips the sign
/// of one endpoint to travel the shorter of the two great-circle arcs, and
/// [`slerp_longest`](Self::slerp_longest) flips the other way.
///
/// The rotation convention is active and right-handed: rotating `+z` by
/// `+π/2` about `+x` yields `-y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    ///
    /// Note: This does not guarantee a unit quaternion. For creating
    /// rotations, prefer [`from_axis_angle`](Self::from_axis_angle).
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion representing a rotation around a given axis by a
    /// given angle.
    ///
    /// `axis` must already be unit length; this is a precondition, not a
    /// checked error. A non-unit axis produces a non-unit quaternion
    /// (garbage in, garbage out). Debug builds assert the precondition.
    /// `angle_radians` may be any real value; callers wrap it if they care.
    ///
    /// If `axis` is unit length the result has unit norm within
    /// floating-point tolerance.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        debug_assert!(
            (axis.length_squared() - 1.0).abs() < 10.0 * EPSILON,
            "rotation axis must be unit length"
        );
        let half_angle = angle_radians * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: c,
        }
    }

    /// Calculates the squared length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    /// Calculates the length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Returns a normalized version of the quaternion with a length of 1.
    /// If the quaternion has a near-zero magnitude, it returns the identity.
    pub fn normalize(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            let inv_mag = 1.0 / mag_sq.sqrt();
            Self {
                x: self.x * inv_mag,
                y: self.y * inv_mag,
                z: self.z * inv_mag,
                w: self.w * inv_mag,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the conjugate of the quaternion, which negates the vector part.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Computes the inverse of the quaternion.
    /// For a unit quaternion, the inverse is equal to its conjugate.
    #[inline]
    pub fn inverse(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            self.conjugate() * (1.0 / mag_sq)
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the dot product of two quaternions.
    ///
    /// For unit quaternions the sign of the dot product tells which
    /// great-circle arc between the two is shorter.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Rotates a 3D vector by this quaternion.
    ///
    /// Evaluates the sandwich product `q·v·q⁻¹` in the expanded form that
    /// assumes `q⁻¹` equals the conjugate, i.e. `self` must be unit norm.
    /// Rotations are active and right-handed: `from_axis_angle(Vec3::X, π/2)`
    /// maps `(0, 0, 1)` to `(0, -1, 0)`.
    pub fn rotate_vec3(&self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let s = self.w;
        2.0 * u.dot(v) * u + (s * s - u.dot(u)) * v + 2.0 * s * u.cross(v)
    }

    /// Performs a spherical linear interpolation along the **shortest** arc
    /// between two unit quaternions.
    ///
    /// When the endpoints' dot product is negative, `end` is negated before
    /// interpolating; `q` and `-q` are the same rotation, and interpolating
    /// toward the antipodal representative would take the long way around.
    ///
    /// `t` is **not clamped**. Values outside `[0, 1]` extrapolate past the
    /// endpoints along the same great circle; drivers that step `t` past 1
    /// and detect completion themselves rely on this.
    pub fn slerp(start: Self, end: Self, t: f32) -> Self {
        let mut cos_theta = start.dot(end);
        let mut end_adjusted = end;
        if cos_theta < 0.0 {
            cos_theta = -cos_theta;
            end_adjusted = -end;
        }
        Self::slerp_aligned(start, end_adjusted, cos_theta, t)
    }

    /// Performs a spherical linear interpolation along the **longest** arc
    /// between two unit quaternions.
    ///
    /// The branch selection of [`slerp`](Self::slerp) is inverted: `end` is
    /// negated when the dot product is positive, forcing the interpolation to
    /// travel the far way around the hypersphere. Useful where a caller wants
    /// the sweeping "far" rotation path for visual effect.
    ///
    /// `t` is not clamped, as with [`slerp`](Self::slerp).
    pub fn slerp_longest(start: Self, end: Self, t: f32) -> Self {
        let mut cos_theta = start.dot(end);
        let mut end_adjusted = end;
        if cos_theta > 0.0 {
            cos_theta = -cos_theta;
            end_adjusted = -end;
        }
        Self::slerp_aligned(start, end_adjusted, cos_theta, t)
    }

    /// Evaluates a smooth quaternion curve segment between `from` and `to` at
    /// parameter `t` in `[0, 1]`, with `before` and `after` as the flanking
    /// control points shaping tangent continuity at the segment boundaries.
    ///
    /// The neighborhood is first hemisphere-aligned with the same sign
    /// convention as [`slerp`](Self::slerp) (an inconsistent sign would
    /// visibly kink the curve), then the two inner control quaternions are
    /// derived from the flanking keys via quaternion log/exp tangents, and
    /// the result is blended from nested slerp evaluations.
    ///
    /// Callers must supply four consecutive keyframes. At a sequence boundary
    /// where no neighbor exists, duplicate the boundary keyframe as its own
    /// flanking control point; [`KeyframeSequence`] enforces exactly that
    /// padding convention.
    ///
    /// With four identical control points the curve is constant:
    /// `spline(q, q, q, q, t) == q` for all `t`.
    ///
    /// [`KeyframeSequence`]: crate::keyframe::KeyframeSequence
    pub fn spline(before: Self, from: Self, to: Self, after: Self, t: f32) -> Self {
        // Align the whole neighborhood into one hemisphere, anchored on the
        // active segment.
        let before = if before.dot(from) < 0.0 {
            -before
        } else {
            before
        };
        let to = if to.dot(from) < 0.0 { -to } else { to };
        let after = if after.dot(to) < 0.0 { -after } else { after };

        let inner_from = Self::inner_control(before, from, to);
        let inner_to = Self::inner_control(from, to, after);

        // Nested-slerp blend (Shoemake's quadrangle construction). The outer
        // weight 2t(1-t) vanishes at both endpoints, so the curve passes
        // through `from` and `to` exactly.
        let edge = Self::slerp(from, to, t);
        let inner = Self::slerp(inner_from, inner_to, t);
        Self::slerp(edge, inner, 2.0 * t * (1.0 - t))
    }

    /// Shared slerp kernel. `end` must already be sign-adjusted for the
    /// desired arc and `cos_theta` must equal `start.dot(end)`.
    ///
    /// Centralizing the near-singularity fallback here keeps both slerp
    /// variants and the spline blending on identical numerics.
    fn slerp_aligned(start: Self, end: Self, cos_theta: f32, t: f32) -> Self {
        if cos_theta.abs() > 1.0 - EPSILON {
            // Near-parallel (or near-antipodal) pair: the trigonometric form
            // divides by sin(theta) ~ 0 and produces NaN/Inf. Blend the
            // components linearly and renormalize instead.
            let result = start * (1.0 - t) + end * t;
            return result.normalize();
        }
        let theta = cos_theta.acos();
        let sin_theta_inv = 1.0 / theta.sin();
        let scale_start = ((1.0 - t) * theta).sin() * sin_theta_inv;
        let scale_end = (t * theta).sin() * sin_theta_inv;
        start * scale_start + end * scale_end
    }

    /// Computes the inner control quaternion at `curr` from its two
    /// neighbors: `curr * exp(-(log(curr⁻¹·prev) + log(curr⁻¹·next)) / 4)`.
    ///
    /// Inputs must be hemisphere-aligned by the caller.
    fn inner_control(prev: Self, curr: Self, next: Self) -> Self {
        let inv = curr.conjugate();
        let tangent = ((inv * prev).log_unit() + (inv * next).log_unit()) * -0.25;
        curr * Self::exp_pure(tangent)
    }

    /// Logarithm of a unit quaternion, returned as the vector part of the
    /// (pure) result.
    fn log_unit(self) -> Vec3 {
        let v = Vec3::new(self.x, self.y, self.z);
        let v_len = v.length();
        if v_len < EPSILON {
            return Vec3::ZERO;
        }
        v * (v_len.atan2(self.w) / v_len)
    }

    /// Exponential of a pure quaternion given by its vector part. Always
    /// yields a unit quaternion.
    fn exp_pure(v: Vec3) -> Self {
        let angle = v.length();
        if angle < EPSILON {
            return Self::new(v.x, v.y, v.z, 1.0).normalize();
        }
        let s = angle.sin() / angle;
        Self::new(v.x * s, v.y * s, v.z * s, angle.cos())
    }
}

// --- Operator Overloads ---

impl Default for Quaternion {
    /// Returns the identity quaternion, representing no rotation.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Combines two rotations using the Hamilton product: `a * b` applies
    /// `b` first, then `a`. Quaternion multiplication is not commutative.
    ///
    /// The product of two unit quaternions is a unit quaternion up to
    /// floating-point drift; long chains of composition should be
    /// renormalized by the caller to bound the drift.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl MulAssign<Quaternion> for Quaternion {
    /// Combines this rotation with another.
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quaternion {
    type Output = Vec3;
    /// Rotates a `Vec3` by this quaternion. `self` must be unit norm; see
    /// [`Quaternion::rotate_vec3`].
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.rotate_vec3(rhs)
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Self;
    /// Adds two quaternions component-wise.
    /// Note: This is not a rotation operation; it exists for interpolation
    /// arithmetic.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w + rhs.w,
        }
    }
}

impl Sub<Quaternion> for Quaternion {
    type Output = Self;
    /// Subtracts two quaternions component-wise.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
            w: self.w - rhs.w,
        }
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales all components of the quaternion by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
            w: self.w * scalar,
        }
    }
}

impl Neg for Quaternion {
    type Output = Self;
    /// Negates all components of the quaternion. The negation represents the
    /// same rotation.
    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}
