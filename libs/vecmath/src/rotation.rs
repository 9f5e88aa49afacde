// This file is part of Whirl.
//
// Whirl is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Whirl is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Whirl.  If not, see <http://www.gnu.org/licenses/>.
use crate::matrix::Matrix4;
use crate::vector::Vector3;
use approx::AbsDiffEq;
use std::ops::Mul;

/// A rotation of `angle` radians about a unit `axis`. The identity is angle 0;
/// the axis is arbitrary at angle 0 and defaults to x.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAngle {
    pub angle: f32,
    pub axis: Vector3,
}

impl AxisAngle {
    pub const fn new(angle: f32, axis: Vector3) -> Self {
        Self { angle, axis }
    }

    pub fn to_matrix(self) -> Matrix4 {
        Matrix4::rotation(self.angle, self.axis.x, self.axis.y, self.axis.z)
    }

    /// Recovers angle and axis from a rotation matrix. The axis comes from the
    /// skew-symmetric part and is normalized on the way out, which divides by
    /// ~sin(angle): near angle 0 or pi the axis is numerically meaningless,
    /// though the angle itself stays valid.
    pub fn from_matrix(m: &Matrix4) -> Self {
        let cosine = ((m[0] + m[5] + m[10] - 1f32) / 2f32).clamp(-1f32, 1f32);
        let angle = cosine.acos();
        let axis = Vector3::new(m[6] - m[9], m[8] - m[2], m[1] - m[4]);
        Self {
            angle,
            axis: axis.normalized(),
        }
    }
}

impl Default for AxisAngle {
    fn default() -> Self {
        Self::new(0f32, Vector3::UNIT_X)
    }
}

/// Composition through rotation matrices: `self` applied first, then `rhs`.
/// The extracted axis is renormalized so repeated composition cannot drift
/// off unit length.
impl Mul for AxisAngle {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::from_matrix(&(self.to_matrix() * rhs.to_matrix()));
        out.axis = out.axis.normalized();
        out
    }
}

impl AbsDiffEq for AxisAngle {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.angle.abs_diff_eq(&other.angle, epsilon) && self.axis.abs_diff_eq(&other.axis, epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn matrix_round_trip_preserves_angle_and_axis() {
        let r = AxisAngle::new(FRAC_PI_2, Vector3::UNIT_Y);
        let back = AxisAngle::from_matrix(&r.to_matrix());
        assert_abs_diff_eq!(back, r, epsilon = 1e-5);
    }

    #[test]
    fn composition_about_a_shared_axis_sums_angles() {
        let quarter = AxisAngle::new(FRAC_PI_4, Vector3::UNIT_Z);
        let half = quarter * quarter;
        assert_abs_diff_eq!(half.angle, FRAC_PI_2, epsilon = 1e-5);
        assert_abs_diff_eq!(half.axis, Vector3::UNIT_Z, epsilon = 1e-5);
    }

    #[test]
    fn composition_keeps_the_axis_unit_length() {
        let mut r = AxisAngle::new(0.3f32, Vector3::UNIT_X);
        let step = AxisAngle::new(0.17f32, Vector3::new(0.6f32, 0.8f32, 0f32));
        for _ in 0..50 {
            r = r * step;
            assert_abs_diff_eq!(r.axis.length(), 1f32, epsilon = 1e-4);
        }
    }

    #[test]
    fn composed_rotations_act_like_sequential_matrix_application() {
        // Quarter turn about z then quarter turn about x sends +x to +z.
        let r = AxisAngle::new(FRAC_PI_2, Vector3::UNIT_Z)
            * AxisAngle::new(FRAC_PI_2, Vector3::UNIT_X);
        let p = Vector3::UNIT_X * r.to_matrix();
        assert_abs_diff_eq!(p, Vector3::UNIT_Z, epsilon = 1e-5);
    }

    #[test]
    fn extraction_clamps_cosine_overshoot() {
        // A trace fractionally above 3 from accumulated error must not NaN the angle.
        let mut m = Matrix4::IDENTITY;
        m[0] = 1.0000002f32;
        let r = AxisAngle::from_matrix(&m);
        assert!(r.angle.is_finite());
        assert_abs_diff_eq!(r.angle, 0f32, epsilon = 1e-3);
    }
}
