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
mod matrix;
mod rotation;
mod vector;

pub use matrix::{Matrix4, SingularMatrix, SINGULAR_EPSILON};
pub use rotation::AxisAngle;
pub use vector::{Vector2, Vector3, Vector4};
