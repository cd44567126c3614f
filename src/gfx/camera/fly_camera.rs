use cgmath::*;

use crate::config::CameraConfig;

/// Pitch stays strictly inside ±90° so the view never flips over the pole.
pub const PITCH_LIMIT: f32 = 89.0;

/// Direction of a held movement key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Outcome of a sensitivity adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensitivityChange {
    Changed(f32),
    ReachedMax,
    ReachedMin,
}

/// Free-fly camera.
///
/// Yaw and pitch are kept in degrees. The same sensitivity scales mouse
/// look and movement speed.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vector3<f32>,
    pub up: Vector3<f32>,
    front: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    sensitivity: f32,
    sensitivity_step: f32,
    sensitivity_min: f32,
    sensitivity_max: f32,
}

impl FlyCamera {
    /// Builds the camera from `config`. Swapped sensitivity bounds are
    /// reordered and a zero `up` falls back to +Y.
    pub fn new(config: &CameraConfig) -> Self {
        let (sensitivity_min, sensitivity_max) = if config.sensitivity_min <= config.sensitivity_max {
            (config.sensitivity_min, config.sensitivity_max)
        } else {
            log::warn!(
                "sensitivity bounds reversed ({} > {}), swapping",
                config.sensitivity_min,
                config.sensitivity_max
            );
            (config.sensitivity_max, config.sensitivity_min)
        };
        let up = if config.up.magnitude2() > f32::EPSILON {
            config.up.normalize()
        } else {
            log::warn!("camera up vector is zero, using +Y");
            Vector3::unit_y()
        };

        let mut camera = Self {
            position: config.position,
            up,
            front: -Vector3::unit_z(),
            yaw: config.yaw.0,
            pitch: config.pitch.0.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            sensitivity: config.sensitivity.clamp(sensitivity_min, sensitivity_max),
            sensitivity_step: config.sensitivity_step,
            sensitivity_min,
            sensitivity_max,
        };
        camera.update_front();
        camera
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Applies a mouse-look delta. `dy` is positive when the cursor moves up.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_front();
    }

    /// Steps sensitivity by `lines * step`, saturating at the bounds.
    pub fn adjust_sensitivity(&mut self, lines: f32) -> SensitivityChange {
        let wanted = self.sensitivity + lines * self.sensitivity_step;

        if wanted >= self.sensitivity_max {
            self.sensitivity = self.sensitivity_max;
            log::info!("sensitivity reached max ({})", self.sensitivity_max);
            SensitivityChange::ReachedMax
        } else if wanted <= self.sensitivity_min {
            self.sensitivity = self.sensitivity_min;
            log::info!("sensitivity reached min ({})", self.sensitivity_min);
            SensitivityChange::ReachedMin
        } else {
            self.sensitivity = wanted;
            log::info!("sensitivity is {:.2}", self.sensitivity);
            SensitivityChange::Changed(wanted)
        }
    }

    /// Moves `sensitivity * dt` units in the given direction.
    pub fn translate(&mut self, movement: Movement, dt: f32) {
        let speed = self.sensitivity * dt;
        let offset = match movement {
            Movement::Forward => self.front * speed,
            Movement::Backward => -self.front * speed,
            Movement::Right => self.right() * speed,
            Movement::Left => -self.right() * speed,
            Movement::Up => self.up * speed,
            Movement::Down => -self.up * speed,
        };
        self.position += offset;
    }

    pub fn right(&self) -> Vector3<f32> {
        self.front.cross(self.up).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.position);
        Matrix4::look_at_rh(eye, eye + self.front, self.up)
    }

    fn update_front(&mut self) {
        let (yaw, pitch) = (Deg(self.yaw), Deg(self.pitch));
        self.front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn camera() -> FlyCamera {
        FlyCamera::new(&CameraConfig::default())
    }

    #[test]
    fn test_new_repairs_bad_config() {
        let config = CameraConfig {
            up: Vector3::zero(),
            sensitivity: 5.0,
            sensitivity_min: 2.0,
            sensitivity_max: 0.1,
            ..CameraConfig::default()
        };
        let mut cam = FlyCamera::new(&config);
        assert_eq!(cam.up, Vector3::unit_y());
        assert_eq!(cam.sensitivity(), 2.0);
        assert_eq!(cam.adjust_sensitivity(-100.0), SensitivityChange::ReachedMin);
        assert_eq!(cam.sensitivity(), 0.1);
        assert!(cam.right().x.is_finite());
    }

    #[test]
    fn test_initial_front_looks_down_negative_z() {
        let cam = camera();
        assert!((cam.front() - Vector3::new(0.0, 0.0, -1.0)).magnitude() < EPS);
        assert_eq!(cam.position, Vector3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = camera();
        cam.rotate(0.0, 10000.0);
        assert_eq!(cam.pitch(), PITCH_LIMIT);
        cam.rotate(0.0, -10000.0);
        assert_eq!(cam.pitch(), -PITCH_LIMIT);

        for dy in [3.0, -200.0, 47.5, 1e6, -1e6, 0.25] {
            cam.rotate(1.0, dy);
            assert!(cam.pitch().abs() <= PITCH_LIMIT);
            assert!((cam.front().magnitude() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_sensitivity_saturates() {
        let mut cam = camera();
        let mut outcomes = Vec::new();
        for _ in 0..50 {
            outcomes.push(cam.adjust_sensitivity(1.0));
            assert!(cam.sensitivity() <= 2.0);
        }
        assert_eq!(outcomes.last(), Some(&SensitivityChange::ReachedMax));
        assert_eq!(cam.sensitivity(), 2.0);

        outcomes.clear();
        for _ in 0..50 {
            outcomes.push(cam.adjust_sensitivity(-1.0));
            assert!(cam.sensitivity() >= 0.1);
        }
        assert_eq!(outcomes.last(), Some(&SensitivityChange::ReachedMin));
        assert_eq!(cam.sensitivity(), 0.1);
    }

    #[test]
    fn test_single_scroll_step() {
        let mut cam = camera();
        match cam.adjust_sensitivity(1.0) {
            SensitivityChange::Changed(s) => assert!((s - 1.1).abs() < EPS),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_forward_displacement_is_speed_times_dt() {
        let mut cam = camera();
        let start = cam.position;
        cam.translate(Movement::Forward, 0.5);
        let moved = cam.position - start;
        assert!((moved - cam.front() * 0.5).magnitude() < EPS);
    }

    #[test]
    fn test_movement_is_frame_rate_independent() {
        let mut fast = camera();
        let mut slow = camera();
        for _ in 0..120 {
            fast.translate(Movement::Forward, 1.0 / 120.0);
        }
        for _ in 0..30 {
            slow.translate(Movement::Forward, 1.0 / 30.0);
        }
        assert!((fast.position - slow.position).magnitude() < 1e-4);
        assert!((fast.position - Vector3::new(0.0, 0.0, 2.0)).magnitude() < 1e-4);
    }

    #[test]
    fn test_strafe_and_vertical() {
        let mut cam = camera();
        cam.translate(Movement::Right, 1.0);
        assert!((cam.position - Vector3::new(1.0, 0.0, 3.0)).magnitude() < EPS);
        cam.translate(Movement::Left, 1.0);
        cam.translate(Movement::Up, 2.0);
        assert!((cam.position - Vector3::new(0.0, 2.0, 3.0)).magnitude() < EPS);
        cam.translate(Movement::Down, 2.0);
        cam.translate(Movement::Backward, 1.0);
        assert!((cam.position - Vector3::new(0.0, 0.0, 4.0)).magnitude() < EPS);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let cam = camera();
        let eye = cam.view_matrix() * cam.position.extend(1.0);
        assert!(eye.truncate().magnitude() < EPS);
    }
}
