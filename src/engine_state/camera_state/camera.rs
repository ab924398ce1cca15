//! First-person camera: orientation state, perspective projection and the
//! controller that turns player actions into movement.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use cgmath::{perspective, Matrix4, Point3, Rad, Vector3};

use crate::engine_state::PlayerAction;

/// Transformation matrix converting OpenGL clip space to WGPU clip space.
///
/// `cgmath::perspective` produces OpenGL-convention matrices with a Z range of
/// [-1, 1]; WGPU expects [0, 1]. This matrix rescales and shifts Z.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch limit just shy of straight up/down, preventing gimbal lock.
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Position and orientation of the player's viewpoint.
#[derive(Debug)]
pub struct Camera {
    /// World-space position.
    pub position: Point3<f32>,
    /// Horizontal rotation around the Y axis.
    pub yaw: Rad<f32>,
    /// Vertical rotation; clamped to avoid gimbal lock.
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a camera at the given position and orientation.
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// The view matrix transforming world space into camera space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        use cgmath::InnerSpace;
        Matrix4::look_to_rh(
            self.position,
            Vector3::new(
                self.yaw.0.cos() * self.pitch.0.cos(),
                self.pitch.0.sin(),
                self.yaw.0.sin() * self.pitch.0.cos(),
            )
            .normalize(),
            Vector3::unit_y(),
        )
    }

    /// Applies the controller's accumulated movement and rotation, scaled by
    /// the frame delta, then resets the controller for the next frame.
    pub fn apply_controller_and_reset(&mut self, controller: &mut CameraController, dt: Duration) {
        use cgmath::InnerSpace;
        let dt = dt.as_secs_f32();

        // Planar movement follows the yaw only; looking down does not slow
        // forward motion.
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        self.position += forward
            * (controller.amount_forward - controller.amount_backward)
            * controller.speed
            * dt;
        self.position +=
            right * (controller.amount_right - controller.amount_left) * controller.speed * dt;
        self.position.y += (controller.amount_up - controller.amount_down) * controller.speed * dt;

        self.yaw += Rad(controller.rotate_horizontal) * controller.sensitivity * dt;
        self.pitch += Rad(-controller.rotate_vertical) * controller.sensitivity * dt;

        controller.reset();

        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// Perspective projection parameters.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    /// Creates a projection for the given viewport size.
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the aspect ratio after a viewport resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// The projection matrix, in WGPU clip-space conventions.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Accumulates one frame's worth of movement and look input.
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// Creates a controller with the given movement speed (units per second)
    /// and mouse-look sensitivity.
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Folds one frame of player actions into the accumulated state.
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        if actions.move_forward {
            self.amount_forward = 1.0;
        }
        if actions.move_backward {
            self.amount_backward = 1.0;
        }
        if actions.move_left {
            self.amount_left = 1.0;
        }
        if actions.move_right {
            self.amount_right = 1.0;
        }
        if actions.move_up {
            self.amount_up = 1.0;
        }
        if actions.move_down {
            self.amount_down = 1.0;
        }
        if let Some((delta_x, delta_y)) = actions.rotate_view {
            self.rotate_horizontal = delta_x as f32;
            self.rotate_vertical = delta_y as f32;
        }
    }

    /// Whether any accumulated input would move or turn the camera.
    pub fn has_updates(&self) -> bool {
        self.amount_forward > 0.0
            || self.amount_backward > 0.0
            || self.amount_left > 0.0
            || self.amount_right > 0.0
            || self.amount_up > 0.0
            || self.amount_down > 0.0
            || self.rotate_horizontal != 0.0
            || self.rotate_vertical != 0.0
    }

    fn reset(&mut self) {
        self.amount_left = 0.0;
        self.amount_right = 0.0;
        self.amount_forward = 0.0;
        self.amount_backward = 0.0;
        self.amount_up = 0.0;
        self.amount_down = 0.0;
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    #[test]
    fn forward_movement_follows_yaw() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let mut controller = CameraController::new(10.0, 1.0);
        controller.intake_actions(&PlayerAction {
            move_forward: true,
            ..Default::default()
        });

        camera.apply_controller_and_reset(&mut controller, Duration::from_secs(1));
        // Yaw zero looks along +X; one second at speed 10 covers 10 units.
        assert!((camera.position.x - 10.0).abs() < 1e-4);
        assert!(camera.position.y.abs() < 1e-4);
        assert!(camera.position.z.abs() < 1e-4);
        assert!(!controller.has_updates());
    }

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let mut controller = CameraController::new(10.0, 1.0);
        controller.intake_actions(&PlayerAction {
            rotate_view: Some((0.0, -10000.0)),
            ..Default::default()
        });

        camera.apply_controller_and_reset(&mut controller, Duration::from_secs(1));
        assert!(camera.pitch.0 <= SAFE_FRAC_PI_2);
        assert!(camera.pitch.0 > 0.0);
    }

    #[test]
    fn vertical_movement_ignores_orientation() {
        let mut camera = Camera::new(Point3::new(3.0, 3.0, 3.0), Deg(90.0), Deg(-45.0));
        let mut controller = CameraController::new(10.0, 1.0);
        controller.intake_actions(&PlayerAction {
            move_up: true,
            ..Default::default()
        });

        camera.apply_controller_and_reset(&mut controller, Duration::from_millis(500));
        assert!((camera.position.y - 8.0).abs() < 1e-4);
        assert!((camera.position.x - 3.0).abs() < 1e-4);
    }
}
