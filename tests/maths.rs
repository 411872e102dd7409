//! Tests for the maths module
//!
//! The vector, matrix and quaternion types are hand rolled, so wherever a
//! glm equivalent exists the results are checked against `nalgebra_glm` as
//! an independent reference. Conversions go through the `[[f32; 4]; 4]`
//! array form that both sides support.

use kalmia::camera::{Camera, CameraProperties};
use kalmia::maths::{Mat4, Quat, Vec3, Vec4};
use kalmia::types::CameraTrait;
use log::info;
use nalgebra_glm as glm;
use std::sync::Once;

const EPSILON: f32 = 0.0005f32; // Small value for float comparisons
static INIT: Once = Once::new();

/// Initializes logging in a "once per test run" manner. Call at the start of
/// each test that needs logging.
fn init_tests() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

fn to_glm(m: Mat4) -> glm::Mat4 {
    let arr: [[f32; 4]; 4] = m.into();
    arr.into()
}

fn to_glm_quat(q: Quat) -> glm::Quat {
    glm::quat(q.v.x, q.v.y, q.v.z, q.w)
}

/// Compare a matrix against a glm reference
fn compare(m: Mat4, reference: &glm::Mat4) {
    let c = glm::equal_columns_eps(&to_glm(m), reference, EPSILON);
    assert!(c.x && c.y && c.z && c.w);
}

fn apply(m: Mat4, p: Vec3) -> Vec3 {
    (m * Vec4::from_parts(p, 1.0)).xyz()
}

/// Tests the unit length property of `normalized`
#[test]
fn normalized_has_unit_length() {
    let samples = [
        Vec3::new(3.0, 4.0, 0.0),
        Vec3::new(-0.02, 17.5, 0.3),
        Vec3::new(1000.0, -2000.0, 500.0),
    ];
    for v in samples {
        assert!((v.normalized().length() - 1.0).abs() < EPSILON);
    }

    // The zero vector is the documented degenerate case and comes back
    // unchanged instead of as NaN
    assert_eq!(Vec3::default().normalized(), Vec3::default());
}

#[test]
fn dot_and_cross_match_glm() {
    let a = Vec3::new(1.5, -2.0, 0.25);
    let b = Vec3::new(-3.0, 0.5, 4.0);
    let ga = glm::vec3(a.x, a.y, a.z);
    let gb = glm::vec3(b.x, b.y, b.z);

    assert!((a.dot(b) - glm::dot(&ga, &gb)).abs() < EPSILON);

    let c = a.cross(b);
    let gc = glm::cross(&ga, &gb);
    assert!((c.x - gc.x).abs() < EPSILON);
    assert!((c.y - gc.y).abs() < EPSILON);
    assert!((c.z - gc.z).abs() < EPSILON);
}

#[test]
fn lerp_hits_both_endpoints() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-5.0, 0.0, 9.0);
    assert_eq!(Vec3::lerp(a, b, 0.0), a);
    assert_eq!(Vec3::lerp(a, b, 1.0), b);
    let mid = Vec3::lerp(a, b, 0.5);
    assert!((mid.x + 2.0).abs() < EPSILON);
}

/// Tests `Mat4::translation` against the defining identity: translating the
/// origin lands on the translation vector
#[test]
fn translation_factory() {
    let t = Vec3::new(4.0, -2.5, 11.0);
    let p = apply(Mat4::translation(t), Vec3::default());
    assert!((p.x - t.x).abs() < EPSILON);
    assert!((p.y - t.y).abs() < EPSILON);
    assert!((p.z - t.z).abs() < EPSILON);
}

#[test]
fn multiply_matches_glm() {
    init_tests();

    let a = Mat4::translation(Vec3::new(1.0, 2.0, 3.0))
        * Mat4::rotation_y(0.752);
    let b = Mat4::rotation_x(-0.314) * Mat4::scale(Vec3::new(2.0, 2.0, 0.5));
    let ga = to_glm(a);
    let gb = to_glm(b);

    info!("multiply a*b = {:?}", to_glm(a * b));
    compare(a * b, &(ga * gb));

    let v = Vec4::new(0.3, -1.2, 7.0, 1.0);
    let gv = ga * glm::vec4(v.x, v.y, v.z, v.w);
    let r = a * v;
    assert!((r.x - gv.x).abs() < EPSILON);
    assert!((r.y - gv.y).abs() < EPSILON);
    assert!((r.z - gv.z).abs() < EPSILON);
    assert!((r.w - gv.w).abs() < EPSILON);
}

#[test]
fn transpose_matches_glm() {
    let m = Mat4::rotation_z(1.1) * Mat4::translation(Vec3::new(5.0, 6.0, 7.0));
    compare(m.transpose(), &glm::transpose(&to_glm(m)));
}

/// Tests `Mat4::inverse` both against glm and against the algebraic
/// property `M * M.inverse() == identity`
#[test]
fn inverse_roundtrip() {
    let m = Mat4::translation(Vec3::new(-4.0, 0.5, 2.0))
        * Mat4::rotation_y(0.61)
        * Mat4::scale(Vec3::new(1.5, 1.5, 1.5));
    assert!(m.determinant().abs() > EPSILON);

    compare(m.inverse(), &glm::inverse(&to_glm(m)));
    compare(m * m.inverse(), &glm::Mat4::identity());

    // A singular matrix falls back to the identity by contract
    let singular = Mat4::scale(Vec3::new(0.0, 1.0, 1.0));
    assert_eq!(singular.inverse(), Mat4::identity());
}

/// Tests that `Mat4::transform` composes in the documented order
/// `T * Ry * Rx * Rz * S`
#[test]
fn transform_composition_order() {
    let position = Vec3::new(1.0, -2.0, 3.0);
    let rotation = Vec3::new(0.3, -1.2, 0.8);
    let scale = Vec3::new(2.0, 1.0, 0.5);

    let m = Mat4::transform(position, rotation, scale);

    let reference = glm::translation(&glm::vec3(1.0, -2.0, 3.0))
        * glm::rotation(rotation.y, &glm::vec3(0.0, 1.0, 0.0))
        * glm::rotation(rotation.x, &glm::vec3(1.0, 0.0, 0.0))
        * glm::rotation(rotation.z, &glm::vec3(0.0, 0.0, 1.0))
        * glm::scaling(&glm::vec3(2.0, 1.0, 0.5));
    compare(m, &reference);
}

#[test]
fn look_at_matches_glm() {
    let eye = Vec3::new(-1.0, 2.0, 16.0);
    let centre = Vec3::new(0.0, 1.0, 0.0);
    let up = Vec3::new(0.0, 1.0, 0.0);

    let m = Mat4::look_at(eye, centre, up);
    let reference = glm::look_at(
        &glm::vec3(eye.x, eye.y, eye.z),
        &glm::vec3(centre.x, centre.y, centre.z),
        &glm::vec3(up.x, up.y, up.z),
    );
    compare(m, &reference);
}

#[test]
fn perspective_matches_glm() {
    let fovy = 0.785f32;
    let aspect = 16.0f32 / 9.0f32;

    let m = Mat4::perspective(fovy, aspect, 0.1, 500.0);
    let reference = glm::perspective_rh_no(aspect, fovy, 0.1, 500.0);
    compare(m, &reference);
}

#[test]
fn part_extraction() {
    let m = Mat4::transform(
        Vec3::new(7.0, 8.0, 9.0),
        Vec3::new(0.4, 0.9, -0.2),
        Vec3::new(2.0, 3.0, 4.0),
    );
    let t = m.translation_part();
    assert!((t.x - 7.0).abs() < EPSILON);
    assert!((t.y - 8.0).abs() < EPSILON);
    assert!((t.z - 9.0).abs() < EPSILON);

    // Rotation does not change the basis column lengths
    let s = m.scale_part();
    assert!((s.x - 2.0).abs() < EPSILON);
    assert!((s.y - 3.0).abs() < EPSILON);
    assert!((s.z - 4.0).abs() < EPSILON);
}

/// Tests `Quat::to_mat4` against glm for rotations about each axis and an
/// arbitrary one
#[test]
fn quat_to_mat4_matches_glm() {
    init_tests();

    let axes = [
        glm::vec3(1.0f32, 0.0, 0.0),
        glm::vec3(0.0f32, 1.0, 0.0),
        glm::vec3(0.0f32, 0.0, 1.0),
        glm::vec3(0.620174f32, -0.248069, 0.744208),
    ];
    for axis in axes {
        let gq = glm::quat_angle_axis(-1.491f32, &axis);
        let q = Quat::new(gq.w, gq.i, gq.j, gq.k);
        info!("axis {:?} quat {:?}", axis, q);
        compare(q.to_mat4(), &glm::quat_to_mat4(&gq));
    }
}

/// Tests that `to_mat4` never trusts the caller to pass a normalized
/// quaternion
#[test]
fn to_mat4_normalizes_internally() {
    let q = Quat::new(2.0, 0.0, 1.2, 0.0);
    compare(q.to_mat4(), &glm::quat_to_mat4(&to_glm_quat(q.normalized())));
}

/// Round trip through the matrix form. Each rotation is chosen to hit a
/// different branch of `from_mat4`: small angles keep the trace positive,
/// near half turns about an axis make that diagonal element dominant.
#[test]
fn quat_matrix_roundtrip() {
    let samples = [
        Quat::new(0.996, 0.05, 0.05, 0.05).normalized(),
        Quat::new(0.05, 0.996, 0.02, 0.02).normalized(),
        Quat::new(0.05, 0.02, 0.996, 0.02).normalized(),
        Quat::new(0.05, 0.02, 0.02, 0.996).normalized(),
    ];
    for q in samples {
        let back = Quat::from_mat4(&q.to_mat4());
        // q and -q are the same rotation, so compare through the dot
        assert!((back.dot(q).abs() - 1.0).abs() < EPSILON);
        assert!((back.norm() - 1.0).abs() < EPSILON);
    }
}

/// Tests the slerp boundary property and a midpoint against glm
#[test]
fn slerp_boundaries_and_midpoint() {
    let ga = glm::quat_angle_axis(0.4f32, &glm::vec3(0.0, 1.0, 0.0));
    let gb = glm::quat_angle_axis(1.3f32, &glm::vec3(1.0, 0.0, 0.0));
    let a = Quat::new(ga.w, ga.i, ga.j, ga.k);
    let b = Quat::new(gb.w, gb.i, gb.j, gb.k);

    let start = Quat::slerp(a, b, 0.0);
    assert!((start.dot(a).abs() - 1.0).abs() < EPSILON);
    let end = Quat::slerp(a, b, 1.0);
    assert!((end.dot(b).abs() - 1.0).abs() < EPSILON);

    let mid = Quat::slerp(a, b, 0.35);
    let gmid = glm::quat_slerp(&ga, &gb, 0.35f32);
    let c = glm::quat_equal_eps(&to_glm_quat(mid), &gmid, EPSILON);
    assert!(c.x && c.y && c.z && c.w);
}

/// Nearly identical endpoints exercise the linear fallback
#[test]
fn slerp_degenerate_endpoints() {
    let a = Quat::new(0.924, 0.0, 0.383, 0.0).normalized();
    let r = Quat::slerp(a, a, 0.5);
    assert!((r.dot(a).abs() - 1.0).abs() < EPSILON);
    assert!((r.norm() - 1.0).abs() < EPSILON);
}

/// Tests that the camera builds its matrices from the maths factories and
/// flips Y for Vulkan clip space
#[test]
fn camera_matrices() {
    let properties = CameraProperties {
        aspect_ratio: 16.0 / 9.0,
        fovy: 0.471,
        position: Vec3::new(-1.0, 2.0, 16.0),
        target: Vec3::new(0.0, 1.0, 0.0),
    };
    let camera = Camera::new(properties);

    let view = Mat4::look_at(
        properties.position,
        properties.target,
        Vec3::new(0.0, 1.0, 0.0),
    );
    assert_eq!(camera.view_matrix(), view);

    let gl_proj = Mat4::perspective(0.471, 16.0 / 9.0, 0.1, 500.0);
    let proj = camera.proj_matrix();
    assert!((proj[1].y + gl_proj[1].y).abs() < EPSILON);
    assert!((proj[0].x - gl_proj[0].x).abs() < EPSILON);
}
