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
use geometry::Aabb;
use std::f32::consts::PI;
use vecmath::{AxisAngle, Matrix4, SingularMatrix, Vector3};

/// How a 2D pointer-drag delta is interpreted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DragMode {
    /// Trackball rotation in the direction of pointer motion.
    Rotate,
    /// Rotation around the local z axis; only the vertical delta matters.
    Roll,
    /// Translation in the local x-y plane. Dragging the pointer down moves the
    /// target down (the vertical delta is negated).
    Scroll,
    /// Translation along the local z axis.
    Dolly,
}

/// Accumulates pointer drags into an orientation and position, exposed as a
/// 4x4 world transform. Drag deltas are expected normalized by the window
/// dimensions, so a full-window drag is about 1.0.
#[derive(Clone, Copy, Debug)]
pub struct Manipulator {
    mode: DragMode,

    matrix: Matrix4,

    // The coordinate frame this transform lives in, and the world axes
    // expressed in that frame. Recomputed by set_frame only.
    frame: Matrix4,
    world_x: Vector3,
    world_y: Vector3,
    world_z: Vector3,

    reference_size: f32,
    motion_scale: f32,

    rotation: AxisAngle,
    translation: Vector3,
    scale: Vector3,
    center: Vector3,
}

// Angular speed is proportional to drag distance across the window: a
// corner-to-corner drag is roughly a half turn.
fn drag_to_rotation(dx: f32, dy: f32) -> AxisAngle {
    let dist = dx.hypot(dy);
    AxisAngle::new(PI * dist, Vector3::new(dy / dist, dx / dist, 0f32))
}

impl Manipulator {
    pub fn new() -> Self {
        // Reference size of the diagonal of a 2-high cube.
        let mut out = Self {
            mode: DragMode::Rotate,
            matrix: Matrix4::IDENTITY,
            frame: Matrix4::IDENTITY,
            world_x: Vector3::UNIT_X,
            world_y: Vector3::UNIT_Y,
            world_z: Vector3::UNIT_Z,
            reference_size: 3.465f32,
            motion_scale: 1f32,
            rotation: AxisAngle::default(),
            translation: Vector3::ZERO,
            scale: Vector3::ONE,
            center: Vector3::ZERO,
        };
        out.update_matrix();
        out
    }

    /// Places the viewpoint back along z far enough that a box of the given
    /// size roughly fills a view with the given vertical field (radians).
    pub fn framing(bounds: &Aabb, fov_y: f32) -> Self {
        let mut out = Self::new();
        out.reference_size = bounds.largest_side();
        out.translation = Vector3::new(
            0f32,
            0f32,
            -out.reference_size / (fov_y / 2f32).cos(),
        );
        out.update_matrix();
        out
    }

    pub fn on_mousemove(&mut self, dx: f32, dy: f32) {
        match self.mode {
            DragMode::Rotate => {
                // A zero-length drag has no axis; skip rather than divide by it.
                if dx != 0f32 || dy != 0f32 {
                    let world = drag_to_rotation(dx, dy);
                    let axis = self.world_x * world.axis.x + self.world_y * world.axis.y;
                    self.rotation = self.rotation * AxisAngle::new(world.angle, axis);
                }
            }
            DragMode::Roll => {
                self.rotation = self.rotation * AxisAngle::new(2f32 * PI * -dy, Vector3::UNIT_Z);
            }
            DragMode::Scroll => {
                self.translation += self.world_x * (dx * self.reference_size * self.motion_scale)
                    + self.world_y * (-dy * self.reference_size * self.motion_scale);
            }
            DragMode::Dolly => {
                self.translation += self.world_z * (dy * self.reference_size * self.motion_scale);
            }
        }

        self.update_matrix();
    }

    /// Re-anchors the manipulator in a parent coordinate frame so subsequent
    /// drags move along that frame's axes. A non-invertible frame is a caller
    /// bug; it is reported without touching any state.
    pub fn set_frame(&mut self, frame: &Matrix4) -> Result<(), SingularMatrix> {
        let inverse = frame.inverse(true)?;
        self.frame = *frame;

        let origin = Vector3::ZERO * inverse;
        self.world_x = Vector3::UNIT_X * inverse - origin;
        self.world_y = Vector3::UNIT_Y * inverse - origin;
        self.world_z = Vector3::UNIT_Z * inverse - origin;
        Ok(())
    }

    /// Near and far clip distances for a viewer whose scene transform is this
    /// manipulator, bracketing the reference size around the viewpoint.
    pub fn clip_range(&self) -> (f32, f32) {
        let near = (-self.translation.z - self.reference_size).max(0.1f32 * self.reference_size);
        let far = (-self.translation.z + self.reference_size).max(0.2f32 * self.reference_size);
        (near, far)
    }

    pub fn matrix(&self) -> Matrix4 {
        self.matrix
    }

    pub fn frame(&self) -> Matrix4 {
        self.frame
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DragMode) {
        self.mode = mode;
    }

    pub fn rotation(&self) -> AxisAngle {
        self.rotation
    }

    pub fn translation(&self) -> Vector3 {
        self.translation
    }

    pub fn reference_size(&self) -> f32 {
        self.reference_size
    }

    pub fn set_reference_size(&mut self, reference_size: f32) {
        self.reference_size = reference_size;
    }

    pub fn motion_scale(&self) -> f32 {
        self.motion_scale
    }

    pub fn set_motion_scale(&mut self, motion_scale: f32) {
        self.motion_scale = motion_scale;
    }

    /// The pivot that scale is applied around; the origin disables it.
    pub fn set_center(&mut self, center: Vector3) {
        self.center = center;
        self.update_matrix();
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.scale = scale;
        self.update_matrix();
    }

    pub fn world_x(&self) -> Vector3 {
        self.world_x
    }

    pub fn world_y(&self) -> Vector3 {
        self.world_y
    }

    pub fn world_z(&self) -> Vector3 {
        self.world_z
    }

    // Center offset first, then scale, then rotate, then place.
    fn update_matrix(&mut self) {
        let mut m = Matrix4::translation(self.translation.x, self.translation.y, self.translation.z);
        m = self.rotation.to_matrix() * m;
        m = Matrix4::scale(self.scale.x, self.scale.y, self.scale.z) * m;
        m = Matrix4::translation(-self.center.x, -self.center.y, -self.center.z) * m;
        self.matrix = m;
    }
}

impl Default for Manipulator {
    fn default() -> Self {
        Self::new()
    }
}
