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
use vecmath::Matrix4;

mod manipulator;
mod rig;

pub use crate::manipulator::{DragMode, Manipulator};
pub use crate::rig::{ActiveTarget, ViewerRig};

/// The renderer-facing contract: a world (or model-view) transform to apply to
/// draw calls, stable between mutations of whatever produced it.
pub trait WorldTransform {
    fn world_matrix(&self) -> Matrix4;
}

impl WorldTransform for Manipulator {
    fn world_matrix(&self) -> Matrix4 {
        self.matrix()
    }
}

impl WorldTransform for ViewerRig {
    fn world_matrix(&self) -> Matrix4 {
        self.model_view()
    }
}
