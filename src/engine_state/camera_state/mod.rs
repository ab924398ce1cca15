//! # Camera State Management
//!
//! Owns the first-person camera, its input controller, and the shared
//! position handle the terrain workers observe. The camera is the only
//! writer of that handle; it republishes the position whenever input moves
//! the viewpoint.

use std::time::Duration;

use cgmath::{Deg, Point3};

use crate::core::MtResource;

use super::PlayerAction;

pub mod camera;

pub use camera::{Camera, CameraController, Projection};

/// Where the player starts, a few units off the origin so the cube is in view.
pub const START_POSITION: Point3<f32> = Point3::new(3.0, 3.0, 3.0);
/// Movement speed in world units per second.
pub const MOVE_SPEED: f32 = 10.0;
/// Mouse-look sensitivity multiplier.
pub const LOOK_SENSITIVITY: f32 = 2.0;
/// Vertical field of view.
pub const FOV_Y: Deg<f32> = Deg(45.0);
/// Near clipping plane distance.
pub const Z_NEAR: f32 = 0.1;
/// Far clipping plane distance; generous so the whole chunk window is visible.
pub const Z_FAR: f32 = 10000.0;

/// The complete camera system: state, controller, and the published position.
pub struct CameraState {
    /// Current position and orientation.
    pub camera: Camera,
    camera_controller: CameraController,
    position_handle: MtResource<Point3<f32>>,
}

impl CameraState {
    /// Creates the camera at the start position, looking back toward the
    /// origin.
    pub fn new() -> Self {
        let camera = Camera::new(START_POSITION, Deg(-135.0), Deg(-30.0));
        let camera_controller = CameraController::new(MOVE_SPEED, LOOK_SENSITIVITY);
        let position_handle = MtResource::new(camera.position);
        Self {
            camera,
            camera_controller,
            position_handle,
        }
    }

    /// A clone of the shared position handle, for the terrain workers.
    pub fn position_handle(&self) -> MtResource<Point3<f32>> {
        self.position_handle.clone()
    }

    /// Feeds one frame of player actions into the controller.
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.camera_controller.intake_actions(actions);
    }

    /// Moves the camera by the accumulated input and republishes its
    /// position. No-op when no input is pending.
    ///
    /// Returns `true` if the camera changed this frame.
    pub fn update(&mut self, dt: Duration) -> bool {
        if !self.camera_controller.has_updates() {
            return false;
        }
        self.camera
            .apply_controller_and_reset(&mut self.camera_controller, dt);
        *self.position_handle.get_mut() = self.camera.position;
        true
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_publishes_position_to_shared_handle() {
        let mut state = CameraState::new();
        let handle = state.position_handle();
        assert_eq!(handle.read_copy(), START_POSITION);

        state.intake_actions(&PlayerAction {
            move_up: true,
            ..Default::default()
        });
        assert!(state.update(Duration::from_secs(1)));

        let published = handle.read_copy();
        assert!((published.y - (START_POSITION.y + MOVE_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn update_without_input_is_a_noop() {
        let mut state = CameraState::new();
        assert!(!state.update(Duration::from_secs(1)));
        assert_eq!(state.position_handle().read_copy(), START_POSITION);
    }
}
