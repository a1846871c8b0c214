//! GPU-free integration tests for the per-frame update logic: camera
//! motion from input, the flashlight following the camera and the fixed
//! cube transforms.

use cgmath::{Angle, Deg, InnerSpace, Matrix4, Point3, Rad, Transform, Vector3};
use instant::Duration;
use lumicube::camera::{Camera, CameraController, PITCH_LIMIT};
use lumicube::data_structures::mesh::{compute_tangents, cube_indices, cube_vertices};
use lumicube::lights::LightRig;
use lumicube::scene::{CUBE_POSITIONS, model_matrix};
use winit::keyboard::KeyCode;

const EPS: f32 = 1e-4;

fn demo_camera() -> Camera {
    Camera::new((0.0, 0.0, 10.0), Deg(-90.0), Deg(0.0))
}

#[test]
fn mouse_look_then_flashlight_follows() {
    let mut camera = demo_camera();
    let mut controller = CameraController::new(10.0, 0.2);
    let mut rig = LightRig::demo_rig();

    // Seed the cursor, then move 50 px right and 25 px up.
    controller.handle_cursor(320.0, 240.0);
    controller.handle_cursor(370.0, 215.0);
    controller.update(&mut camera, Duration::from_millis(16));

    assert!((camera.yaw.0 - -80.0).abs() < EPS);
    assert!((camera.pitch.0 - 5.0).abs() < EPS);

    rig.follow_camera(&camera);
    assert_eq!(rig.spot.position, camera.position);
    assert!((rig.spot.direction - camera.look_dir()).magnitude() < EPS);
    // The directional and point lights never move.
    assert_eq!(rig.directional.direction, Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(rig.point.position, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn forward_key_moves_along_the_look_direction() {
    let mut camera = demo_camera();
    let mut controller = CameraController::new(10.0, 0.2);

    controller.handle_key(KeyCode::KeyW, true);
    controller.update(&mut camera, Duration::from_millis(100));

    // Facing -z at speed 10 for 0.1 s moves one unit towards the scene.
    assert!((camera.position.x - 0.0).abs() < EPS);
    assert!((camera.position.y - 0.0).abs() < EPS);
    assert!((camera.position.z - 9.0).abs() < EPS);

    controller.handle_key(KeyCode::KeyW, false);
    controller.update(&mut camera, Duration::from_millis(100));
    assert!((camera.position.z - 9.0).abs() < EPS);
}

#[test]
fn strafe_keys_move_on_the_right_axis() {
    let mut camera = demo_camera();
    let mut controller = CameraController::new(10.0, 0.2);

    controller.handle_key(KeyCode::KeyD, true);
    controller.update(&mut camera, Duration::from_millis(100));

    // Facing -z, right is +x.
    assert!((camera.position.x - 1.0).abs() < EPS);
    assert!((camera.position.z - 10.0).abs() < EPS);
}

#[test]
fn pitch_never_exceeds_the_clamp_under_wild_input() {
    let mut camera = demo_camera();
    let mut controller = CameraController::new(10.0, 0.2);

    controller.handle_cursor(0.0, 0.0);
    for step in 0..500 {
        let y = if step % 3 == 0 { -10_000.0 } else { 10_000.0 };
        controller.handle_cursor(step as f64, y);
        controller.update(&mut camera, Duration::from_millis(16));
        assert!(camera.pitch <= PITCH_LIMIT);
        assert!(camera.pitch >= -PITCH_LIMIT);
        // The look direction stays well defined everywhere in the range.
        assert!((camera.look_dir().magnitude() - 1.0).abs() < EPS);
    }
}

#[test]
fn cube_transforms_rotate_twenty_degrees_per_index() {
    let axis = Vector3::new(1.0, 1.0, 1.0).normalize();
    let scale = 0.5;

    for i in 0..CUBE_POSITIONS.len() {
        let m = model_matrix(i);

        // trace(R) = 1 + 2 cos(angle); the uniform scale factors out.
        let trace = (m.x.x + m.y.y + m.z.z) / scale;
        let expected = Rad::from(Deg(20.0 * i as f32));
        assert!((trace - (1.0 + 2.0 * expected.cos())).abs() < EPS);

        // The rotation axis is fixed by the transform.
        let rotated = m.transform_vector(axis) / scale;
        assert!((rotated - axis).magnitude() < EPS);
    }
}

#[test]
fn first_cube_transform_is_translate_and_scale_only() {
    let m = model_matrix(0);
    let expected = Matrix4::from_scale(0.5);
    for (col, exp) in [
        (m.x, expected.x),
        (m.y, expected.y),
        (m.z, expected.z),
        (m.w, expected.w),
    ] {
        assert!((col - exp).magnitude() < EPS);
    }
}

#[test]
fn cube_tangent_basis_is_complete_and_right_handed() {
    let mut vertices = cube_vertices();
    let indices = cube_indices();
    compute_tangents(&mut vertices, &indices);

    for v in &vertices {
        let n = Vector3::from(v.normal);
        let t = Vector3::from(v.tangent);
        let b = Vector3::from(v.bitangent);
        assert!(t.magnitude() > 0.0 && b.magnitude() > 0.0);
        // T x B reproduces the face normal for the cube's UV layout.
        assert!((t.cross(b) - n).magnitude() < EPS);
    }
}
