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
use crate::manipulator::{DragMode, Manipulator};
use geometry::Aabb;
use log::warn;
use vecmath::Matrix4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActiveTarget {
    Scene,
    Object,
}

/// A viewer's pair of manipulators: one for the scene (the camera) and one for
/// the object under inspection. The object's drag axes are anchored to the
/// scene transform, so object drags stay screen-aligned no matter how the
/// camera has been turned.
#[derive(Clone, Copy, Debug)]
pub struct ViewerRig {
    scene: Manipulator,
    object: Manipulator,
    active: ActiveTarget,
}

impl ViewerRig {
    pub fn new(bounds: &Aabb, fov_y: f32) -> Self {
        let mut out = Self {
            scene: Manipulator::framing(bounds, fov_y),
            object: Manipulator::new(),
            active: ActiveTarget::Scene,
        };
        out.reframe_object();
        out
    }

    pub fn on_mousemove(&mut self, dx: f32, dy: f32) {
        match self.active {
            ActiveTarget::Scene => {
                self.scene.on_mousemove(dx, dy);
                self.reframe_object();
            }
            ActiveTarget::Object => self.object.on_mousemove(dx, dy),
        }
    }

    pub fn activate(&mut self, target: ActiveTarget) {
        self.active = target;
    }

    pub fn active(&self) -> ActiveTarget {
        self.active
    }

    /// Sets the drag mode of whichever manipulator is active.
    pub fn set_mode(&mut self, mode: DragMode) {
        match self.active {
            ActiveTarget::Scene => self.scene.set_mode(mode),
            ActiveTarget::Object => self.object.set_mode(mode),
        }
    }

    /// Object transform first, then the scene (camera) transform.
    pub fn model_view(&self) -> Matrix4 {
        self.object.matrix() * self.scene.matrix()
    }

    pub fn clip_range(&self) -> (f32, f32) {
        self.scene.clip_range()
    }

    pub fn scene(&self) -> &Manipulator {
        &self.scene
    }

    pub fn object(&self) -> &Manipulator {
        &self.object
    }

    // A drag cannot be allowed to abort a frame: if the scene transform has
    // gone singular, keep the object's previous frame and complain.
    fn reframe_object(&mut self) {
        if let Err(err) = self.object.set_frame(&self.scene.matrix()) {
            warn!("scene transform is not invertible, keeping object frame: {}", err);
        }
    }
}
