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
use crate::vector::{Vector3, Vector4};
use approx::{AbsDiffEq, RelativeEq};
use std::ops::{Index, IndexMut, Mul};
use thiserror::Error;

/// Determinants below this magnitude are treated as singular by `inverse`.
pub const SINGULAR_EPSILON: f32 = 1e-5;

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
#[error("matrix is singular")]
pub struct SingularMatrix;

/// A 4x4 transform in column-major GL storage. Transforms use the row-vector
/// convention: `v * m`, and `a * b` applies `a` first, then `b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4 {
    m: [f32; 16],
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        m: [
            1f32, 0f32, 0f32, 0f32, //
            0f32, 1f32, 0f32, 0f32, //
            0f32, 0f32, 1f32, 0f32, //
            0f32, 0f32, 0f32, 1f32,
        ],
    };

    pub const fn from_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn as_array(&self) -> &[f32; 16] {
        &self.m
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[12] = x;
        out.m[13] = y;
        out.m[14] = z;
        out
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0] = x;
        out.m[5] = y;
        out.m[10] = z;
        out
    }

    pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -2f32 * far * near / (far - near);

        let mut out = Self::IDENTITY;
        out.m[0] = 2f32 * near / (right - left);
        out.m[5] = 2f32 * near / (top - bottom);
        out.m[2] = a;
        out.m[6] = b;
        out.m[10] = c;
        out.m[14] = d;
        out.m[11] = -1f32;
        out.m[15] = 0f32;
        out
    }

    /// Rodrigues' rotation about a unit axis, `angle` in radians.
    pub fn rotation(angle: f32, x: f32, y: f32, z: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        let t = 1f32 - c;

        Self {
            m: [
                t * x * x + c,
                t * x * y + s * z,
                t * x * z - s * y,
                0f32,
                t * x * y - s * z,
                t * y * y + c,
                t * y * z + s * x,
                0f32,
                t * x * z + s * y,
                t * y * z - s * x,
                t * z * z + c,
                0f32,
                0f32,
                0f32,
                0f32,
                1f32,
            ],
        }
    }

    pub fn transposed(&self) -> Self {
        let mut out = Self::IDENTITY;
        for i in 0..4 {
            for j in 0..4 {
                out.m[i + j * 4] = self.m[j + i * 4];
            }
        }
        out
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        (m[0] * m[5] - m[1] * m[4]) * (m[10] * m[15] - m[11] * m[14])
            + (m[2] * m[4] - m[0] * m[6]) * (m[9] * m[15] - m[11] * m[13])
            + (m[0] * m[7] - m[3] * m[4]) * (m[9] * m[14] - m[10] * m[13])
            + (m[1] * m[6] - m[2] * m[5]) * (m[8] * m[15] - m[11] * m[12])
            + (m[3] * m[5] - m[1] * m[7]) * (m[8] * m[14] - m[10] * m[12])
            + (m[2] * m[7] - m[3] * m[6]) * (m[8] * m[13] - m[9] * m[12])
    }

    /// Gauss-Jordan elimination with row swaps. With `singular_fail` set, a
    /// determinant below `SINGULAR_EPSILON` in magnitude is rejected and the
    /// receiver is returned untouched in the error case; without it, the caller
    /// gets whatever elimination produced, non-finite entries included.
    pub fn inverse(&self, singular_fail: bool) -> Result<Self, SingularMatrix> {
        if singular_fail && self.determinant().abs() < SINGULAR_EPSILON {
            return Err(SingularMatrix);
        }

        // Element (row r, col c) lives at m[c * 4 + r].
        let mut hold = self.m;
        let mut out = Self::IDENTITY.m;
        for p in 0..4 {
            if hold[p * 4 + p].abs() < SINGULAR_EPSILON {
                if let Some(r) = (p + 1..4).find(|&r| hold[p * 4 + r].abs() > SINGULAR_EPSILON) {
                    for j in 0..4 {
                        hold.swap(j * 4 + p, j * 4 + r);
                        out.swap(j * 4 + p, j * 4 + r);
                    }
                }
            }

            let div = hold[p * 4 + p];
            for j in 0..4 {
                hold[j * 4 + p] /= div;
                out[j * 4 + p] /= div;
            }

            for r in 0..4 {
                if r == p {
                    continue;
                }
                let factor = hold[p * 4 + r];
                for j in 0..4 {
                    hold[j * 4 + r] -= factor * hold[j * 4 + p];
                    out[j * 4 + r] -= factor * out[j * 4 + p];
                }
            }
        }

        Ok(Self { m: out })
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Matrix4 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        &self.m[i]
    }
}

impl IndexMut<usize> for Matrix4 {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.m[i]
    }
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = [0f32; 16];
        for i in 0..4 {
            for j in 0..4 {
                let mut sum = 0f32;
                for k in 0..4 {
                    sum += self.m[i * 4 + k] * rhs.m[k * 4 + j];
                }
                out[i * 4 + j] = sum;
            }
        }
        Self { m: out }
    }
}

// Affine point transform: w = 1 on input, no perspective divide on output.
impl Mul<Matrix4> for Vector3 {
    type Output = Vector3;

    fn mul(self, m: Matrix4) -> Vector3 {
        let mut out = [0f32; 3];
        for (i, o) in out.iter_mut().enumerate() {
            *o = m.m[i] * self.x + m.m[4 + i] * self.y + m.m[8 + i] * self.z + m.m[12 + i];
        }
        Vector3::new(out[0], out[1], out[2])
    }
}

impl Mul<Matrix4> for Vector4 {
    type Output = Vector4;

    fn mul(self, m: Matrix4) -> Vector4 {
        let mut out = [0f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = m.m[i] * self.x
                + m.m[4 + i] * self.y
                + m.m[8 + i] * self.z
                + m.m[12 + i] * self.w;
        }
        Vector4::new(out[0], out[1], out[2], out[3])
    }
}

impl AbsDiffEq for Matrix4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Matrix4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    #[test]
    fn multiplication_applies_left_operand_first() {
        let m = Matrix4::translation(1f32, 0f32, 0f32) * Matrix4::scale(2f32, 2f32, 2f32);
        let p = Vector3::new(1f32, 2f32, 3f32) * m;
        assert_abs_diff_eq!(p, Vector3::new(4f32, 4f32, 6f32));
    }

    #[test]
    fn translation_moves_points_but_identity_does_not() {
        let p = Vector3::new(1f32, 2f32, 3f32);
        assert_abs_diff_eq!(p * Matrix4::IDENTITY, p);
        assert_abs_diff_eq!(
            p * Matrix4::translation(-1f32, -2f32, -3f32),
            Vector3::ZERO
        );
    }

    #[test]
    fn rotation_about_z_turns_x_into_y() {
        let r = Matrix4::rotation(FRAC_PI_2, 0f32, 0f32, 1f32);
        assert_abs_diff_eq!(Vector3::UNIT_X * r, Vector3::UNIT_Y, epsilon = 1e-6);
        assert_abs_diff_eq!(Vector3::UNIT_Y * r, -Vector3::UNIT_X, epsilon = 1e-6);
    }

    #[test]
    fn determinant_of_scale_is_the_product_of_factors() {
        assert_abs_diff_eq!(Matrix4::IDENTITY.determinant(), 1f32);
        assert_abs_diff_eq!(Matrix4::scale(2f32, 3f32, 4f32).determinant(), 24f32);
        assert_abs_diff_eq!(Matrix4::scale(1f32, 1f32, 0f32).determinant(), 0f32);
    }

    #[test]
    fn inverse_round_trips_to_identity() -> Result<(), SingularMatrix> {
        let m = Matrix4::translation(1f32, 2f32, 3f32)
            * Matrix4::rotation(FRAC_PI_3, 0f32, 1f32, 0f32);
        assert_abs_diff_eq!(m * m.inverse(true)?, Matrix4::IDENTITY, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn inverse_pivots_around_a_zero_leading_element() -> Result<(), SingularMatrix> {
        // cos(pi/2) rounds to ~0 in the top-left slot, forcing a row swap.
        let m = Matrix4::rotation(FRAC_PI_2, 0f32, 0f32, 1f32);
        assert_abs_diff_eq!(m * m.inverse(true)?, Matrix4::IDENTITY, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn inverse_rejects_singular_matrices() {
        let flat = Matrix4::scale(1f32, 1f32, 0f32);
        assert_eq!(flat.inverse(true), Err(SingularMatrix));
        // With the check disabled the caller gets elimination output as-is.
        assert!(flat.inverse(false).is_ok());
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let t = Matrix4::translation(1f32, 2f32, 3f32).transposed();
        assert_abs_diff_eq!(t[3], 1f32);
        assert_abs_diff_eq!(t[7], 2f32);
        assert_abs_diff_eq!(t[11], 3f32);
        assert_abs_diff_eq!(t[12], 0f32);
    }

    #[test]
    fn frustum_maps_the_near_and_far_planes_to_clip_bounds() {
        let f = Matrix4::frustum(-1f32, 1f32, -1f32, 1f32, 1f32, 10f32);

        let near = Vector4::new(0f32, 0f32, -1f32, 1f32) * f;
        assert_abs_diff_eq!(near.z / near.w, -1f32, epsilon = 1e-6);

        let far = Vector4::new(0f32, 0f32, -10f32, 1f32) * f;
        assert_abs_diff_eq!(far.z / far.w, 1f32, epsilon = 1e-6);
    }
}
