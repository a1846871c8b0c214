//! First-person camera, controller and uniforms for view/projection.
//!
//! The camera stores its orientation as yaw/pitch in degrees and derives the
//! look direction via the usual spherical-to-Cartesian conversion. Mouse and
//! keyboard input is collected by [`CameraController`] and applied once per
//! frame, so no input state leaks into globals.

use cgmath::{
    Angle, Deg, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, perspective,
};
use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// wgpu clip space has z in 0..1 while cgmath's `perspective` produces the
/// OpenGL convention of -1..1, so the projection is corrected with this.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Pitch is clamped short of straight up/down to avoid gimbal flip.
pub const PITCH_LIMIT: Deg<f32> = Deg(89.0);

/// Eye position plus yaw/pitch orientation in degrees.
///
/// Yaw is unbounded and wraps naturally through the trigonometric functions;
/// pitch is kept within `[-PITCH_LIMIT, PITCH_LIMIT]` by the controller.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Deg<f32>,
    pub pitch: Deg<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, yaw: Deg<f32>, pitch: Deg<f32>) -> Self {
        Self {
            position: position.into(),
            yaw,
            pitch,
        }
    }

    /// Unit look direction derived from yaw/pitch.
    ///
    /// A yaw of 0 points along +x, so cameras conventionally start at -90 to
    /// face -z.
    pub fn look_dir(&self) -> Vector3<f32> {
        Vector3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Right-facing vector relative to the camera, on the ground plane side.
    pub fn right(&self) -> Vector3<f32> {
        self.look_dir().cross(Vector3::unit_y())
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.look_dir(), Vector3::unit_y())
    }
}

/// Perspective projection parameters; aspect follows the window size.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Deg<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: Deg<f32>, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy,
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Collects mouse and key input and applies it to a [`Camera`] once per
/// frame.
///
/// Rotation is fed from raw mouse deltas, which keep arriving even while
/// the cursor is grabbed and its reported position is pinned. Deltas are
/// scaled by `sensitivity` (degrees per pixel) and accumulated until
/// [`update`] drains them into yaw/pitch. WASD movement is scaled by
/// `speed` and the frame delta time.
///
/// [`update`]: Self::update
#[derive(Debug)]
pub struct CameraController {
    speed: f32,
    sensitivity: f32,
    last_cursor: Option<(f64, f64)>,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_left: f32,
    amount_right: f32,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            last_cursor: None,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_left: 0.0,
            amount_right: 0.0,
        }
    }

    /// Feed a raw mouse motion delta (screen convention, y down).
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.rotate_horizontal += dx as f32 * self.sensitivity;
        // Screen y grows downwards but pitch grows upwards.
        self.rotate_vertical -= dy as f32 * self.sensitivity;
    }

    /// Feed an absolute cursor position (window coordinates, y down) when
    /// raw deltas are not available. The first call only seeds the
    /// reference position.
    pub fn handle_cursor(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.last_cursor {
            self.handle_mouse(x - last_x, y - last_y);
        }
        self.last_cursor = Some((x, y));
    }

    /// Feed a movement key state change.
    pub fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        let amount = if pressed { 1.0 } else { 0.0 };
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => self.amount_forward = amount,
            KeyCode::KeyS | KeyCode::ArrowDown => self.amount_backward = amount,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.amount_left = amount,
            KeyCode::KeyD | KeyCode::ArrowRight => self.amount_right = amount,
            _ => (),
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                self.handle_key(*code, *state == ElementState::Pressed);
            }
            _ => (),
        }
    }

    /// Apply accumulated rotation and held movement keys to the camera.
    ///
    /// Rotation deltas were already scaled at event time and are applied
    /// as-is; only movement uses `dt`. Pitch is clamped to
    /// `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        camera.yaw += Deg(self.rotate_horizontal);
        camera.pitch += Deg(self.rotate_vertical);
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;

        if camera.pitch > PITCH_LIMIT {
            camera.pitch = PITCH_LIMIT;
        } else if camera.pitch < -PITCH_LIMIT {
            camera.pitch = -PITCH_LIMIT;
        }

        let forward = camera.look_dir();
        let right = camera.right();
        camera.position += forward * (self.amount_forward - self.amount_backward) * self.speed * dt;
        camera.position += right * (self.amount_right - self.amount_left) * self.speed * dt;
    }
}

/// Shader-visible camera state. The view and projection matrices are kept
/// separate because the fragment stage only needs the eye position while the
/// vertex stage composes them with the per-object model matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0, 0.0, 0.0, 1.0],
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view = camera.calc_matrix().into();
        self.proj = projection.calc_matrix().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera state bundled with its GPU resources, owned by the context.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_vec3_near(actual: Vector3<f32>, expected: (f32, f32, f32)) {
        assert!(
            (actual.x - expected.0).abs() < EPS
                && (actual.y - expected.1).abs() < EPS
                && (actual.z - expected.2).abs() < EPS,
            "got {actual:?}, expected {expected:?}"
        );
    }

    #[test]
    fn look_dir_faces_negative_z_at_default_orientation() {
        let camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
        assert_vec3_near(camera.look_dir(), (0.0, 0.0, -1.0));
    }

    #[test]
    fn look_dir_is_unit_length_for_arbitrary_orientations() {
        for yaw in [-720.0, -90.0, 0.0, 37.5, 180.0, 1234.0] {
            for pitch in [-89.0, -45.0, 0.0, 30.0, 89.0] {
                let camera = Camera::new((0.0, 0.0, 0.0), Deg(yaw), Deg(pitch));
                assert!((camera.look_dir().magnitude() - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn cursor_delta_scales_into_yaw_by_sensitivity() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(10.0, 0.2);
        // First event only seeds the reference position.
        controller.handle_cursor(320.0, 240.0);
        controller.handle_cursor(330.0, 240.0);
        controller.update(&mut camera, Duration::from_millis(16));
        assert!((camera.yaw.0 - -88.0).abs() < EPS);
        assert!(camera.pitch.0.abs() < EPS);
    }

    #[test]
    fn raw_mouse_deltas_rotate_without_cursor_positions() {
        // Under a cursor grab the reported position is pinned, so rotation
        // must work from motion deltas alone.
        let mut camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(10.0, 0.2);
        controller.handle_mouse(10.0, 0.0);
        controller.handle_mouse(0.0, -10.0);
        controller.update(&mut camera, Duration::from_millis(16));
        assert!((camera.yaw.0 - -88.0).abs() < EPS);
        assert!((camera.pitch.0 - 2.0).abs() < EPS);
    }

    #[test]
    fn first_cursor_event_produces_no_rotation() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(10.0, 0.2);
        controller.handle_cursor(500.0, 17.0);
        controller.update(&mut camera, Duration::from_millis(16));
        assert!((camera.yaw.0 - -90.0).abs() < EPS);
        assert!(camera.pitch.0.abs() < EPS);
    }

    #[test]
    fn pitch_stays_clamped_under_any_cursor_sequence() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(10.0, 0.2);
        controller.handle_cursor(0.0, 0.0);
        // Sweep far past the limit in both directions.
        for i in 1..100 {
            controller.handle_cursor(0.0, -50.0 * i as f64);
            controller.update(&mut camera, Duration::from_millis(16));
            assert!(camera.pitch <= PITCH_LIMIT && camera.pitch >= -PITCH_LIMIT);
        }
        assert!((camera.pitch.0 - 89.0).abs() < EPS);
        for i in 1..200 {
            controller.handle_cursor(0.0, 50.0 * i as f64);
            controller.update(&mut camera, Duration::from_millis(16));
            assert!(camera.pitch <= PITCH_LIMIT && camera.pitch >= -PITCH_LIMIT);
        }
        assert!((camera.pitch.0 - -89.0).abs() < EPS);
    }

    #[test]
    fn upward_cursor_motion_raises_pitch() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0));
        let mut controller = CameraController::new(10.0, 0.2);
        controller.handle_cursor(100.0, 100.0);
        controller.handle_cursor(100.0, 90.0);
        controller.update(&mut camera, Duration::from_millis(16));
        assert!((camera.pitch.0 - 2.0).abs() < EPS);
    }
}
