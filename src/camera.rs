//! Perspective orbit camera with damped controls.
//!
//! Dragging and scrolling don't move the camera directly; they feed angular
//! and zoom velocity that [`Camera::update`] bleeds off a little every frame,
//! so the view keeps gliding after the pointer is released.

use glam::{Mat4, Vec3};

/// Fraction of pending motion applied (and removed) per update.
pub const DAMPING_FACTOR: f32 = 0.05;

const ROTATE_SPEED: f32 = 0.005;
const ZOOM_SPEED: f32 = 0.3;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 99.0;
const PITCH_LIMIT: f32 = 1.5;

/// Orbit camera for viewing the galaxy.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
}

impl Camera {
    /// Camera at `(0, 1, 5)` looking at the origin, 75 degree field of view.
    pub fn new(aspect: f32) -> Self {
        Self::looking_from(Vec3::new(0.0, 1.0, 5.0), aspect)
    }

    /// Place the camera at `eye`, orbiting the origin.
    pub fn looking_from(eye: Vec3, aspect: f32) -> Self {
        let distance = eye.length();
        let pitch = (eye.y / distance).asin();
        let yaw = eye.x.atan2(eye.z);
        Self {
            yaw,
            pitch,
            distance,
            target: Vec3::ZERO,
            fov_y_degrees: 75.0,
            aspect,
            near: 0.1,
            far: 100.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Feed a pointer drag, in logical pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * ROTATE_SPEED;
        self.pitch_velocity += dy * ROTATE_SPEED;
    }

    /// Feed a scroll amount in lines; positive zooms in.
    pub fn zoom(&mut self, lines: f32) {
        self.zoom_velocity -= lines * ZOOM_SPEED;
    }

    /// Apply a damped step of the pending motion. Call once per frame.
    pub fn update(&mut self) {
        self.yaw += self.yaw_velocity * DAMPING_FACTOR;
        self.pitch = (self.pitch + self.pitch_velocity * DAMPING_FACTOR).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance =
            (self.distance + self.zoom_velocity * DAMPING_FACTOR).clamp(MIN_DISTANCE, MAX_DISTANCE);

        let keep = 1.0 - DAMPING_FACTOR;
        self.yaw_velocity *= keep;
        self.pitch_velocity *= keep;
        self.zoom_velocity *= keep;
    }

    /// Whether any damped motion is still pending.
    pub fn is_moving(&self) -> bool {
        const EPSILON: f32 = 1e-5;
        self.yaw_velocity.abs() > EPSILON
            || self.pitch_velocity.abs() > EPSILON
            || self.zoom_velocity.abs() > EPSILON
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let camera = Camera::new(1.0);
        let pos = camera.position();
        assert!((pos - Vec3::new(0.0, 1.0, 5.0)).length() < 1e-5);
        assert_eq!(camera.fov_y_degrees, 75.0);
    }

    #[test]
    fn test_update_without_input_is_still() {
        let mut camera = Camera::new(1.0);
        let before = camera.position();
        camera.update();
        assert_eq!(camera.position(), before);
        assert!(!camera.is_moving());
    }

    #[test]
    fn test_drag_glides_and_settles() {
        let mut camera = Camera::new(1.0);
        camera.rotate(100.0, 0.0);

        camera.update();
        let first_step = camera.yaw;
        assert!(first_step < 0.0);

        for _ in 0..500 {
            camera.update();
        }
        // The full drag is eventually applied: 100 px * 0.005 rad/px
        assert!((camera.yaw + 0.5).abs() < 1e-3);
        assert!(!camera.is_moving());
    }

    #[test]
    fn test_pitch_and_distance_clamped() {
        let mut camera = Camera::new(1.0);
        camera.rotate(0.0, 100_000.0);
        camera.zoom(-100_000.0);
        for _ in 0..100 {
            camera.update();
        }
        assert!(camera.pitch <= PITCH_LIMIT);
        assert!(camera.distance <= MAX_DISTANCE);
        assert!(camera.distance < camera.far);
    }
}
