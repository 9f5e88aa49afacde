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
use vecmath::Vector3;

/// An axis-aligned bounding box. The empty box is min = +inf, max = -inf per
/// component, so min > max distinguishes "never extended" from a degenerate
/// point box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    min: Vector3,
    max: Vector3,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vector3::splat(f32::INFINITY),
            max: Vector3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_bounds(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> Vector3 {
        self.min
    }

    pub fn max(&self) -> Vector3 {
        self.max
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, p: Vector3) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn extend_sphere(&mut self, center: Vector3, radius: f32) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(center[i] - radius);
            self.max[i] = self.max[i].max(center[i] + radius);
        }
    }

    pub fn extend_aabb(&mut self, other: &Aabb) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    pub fn span(&self, axis: usize) -> f32 {
        self.max[axis] - self.min[axis]
    }

    /// The largest per-axis extent; callers use this as a reference scale when
    /// framing the box in view.
    pub fn largest_side(&self) -> f32 {
        self.span(0).max(self.span(1)).max(self.span(2))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
