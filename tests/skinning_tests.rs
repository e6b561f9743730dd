//! Skinning and Mesh Buffer Tests
//!
//! Tests for:
//! - MeshBuffers validation and restore discipline
//! - Software skinning of positions and normals
//! - Identity skinning at the bind pose
//! - Two-bone 45 degree end-to-end scenario
//! - Bounding boxes of the deformed buffer

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

use glam::{Mat4, Quat, Vec3};

use rig::animation::BoneTrack;
use rig::errors::RigError;
use rig::mesh::MeshBuffers;
use rig::skeleton::{BoneDesc, Skeleton};
use rig::skinning::skin_vertices;

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn two_bone_skeleton() -> Skeleton {
    Skeleton::new(vec![
        BoneDesc::new("root", None),
        BoneDesc::new("child", Some(0)).with_translation(Vec3::new(0.0, 1.0, 0.0)),
    ])
    .unwrap()
}

/// One vertex at (1, 1, 0), rigidly bound to the child bone.
fn child_bound_mesh() -> MeshBuffers {
    MeshBuffers::new("tip", vec![Vec3::new(1.0, 1.0, 0.0)], vec![Vec3::X])
        .unwrap()
        .with_skin_influences(vec![1, 0], vec![1.0, 0.0], 2)
        .unwrap()
}

// ============================================================================
// MeshBuffers
// ============================================================================

#[test]
fn normals_must_match_positions() {
    let err = MeshBuffers::new("m", vec![Vec3::ZERO; 3], vec![Vec3::Y; 2]).unwrap_err();
    assert_eq!(
        err,
        RigError::BufferLengthMismatch {
            buffer: "normals",
            expected: 3,
            actual: 2
        }
    );
}

#[test]
fn influences_must_cover_every_vertex() {
    let mesh = MeshBuffers::new("m", vec![Vec3::ZERO; 2], Vec::new()).unwrap();
    let err = mesh
        .with_skin_influences(vec![0; 4], vec![1.0; 3], 2)
        .unwrap_err();
    assert!(matches!(
        err,
        RigError::BufferLengthMismatch {
            buffer: "bone_weights",
            ..
        }
    ));

    let mesh = MeshBuffers::new("m", vec![Vec3::ZERO; 2], Vec::new()).unwrap();
    assert_eq!(
        mesh.with_skin_influences(Vec::new(), Vec::new(), 0).unwrap_err(),
        RigError::InvalidWeightsPerVertex
    );
}

#[test]
fn restore_copies_bind_pose_back() {
    let mut mesh = child_bound_mesh();
    mesh.vertices_mut().positions[0] = Vec3::splat(9.0);
    assert_eq!(mesh.positions()[0], Vec3::splat(9.0));

    let seen = mesh.version();
    assert!(!mesh.changed_since(seen));
    mesh.restore_bind_pose();
    assert_eq!(mesh.positions(), mesh.bind_positions());
    assert!(mesh.changed_since(seen));
}

#[test]
fn skinning_twice_without_restore_compounds() {
    let mut skeleton = two_bone_skeleton();
    skeleton
        .set_anim_transforms(1, Vec3::ZERO, Quat::from_rotation_z(FRAC_PI_4))
        .unwrap();
    let matrices = skeleton.compute_skinning_matrices().to_vec();

    let mut mesh = child_bound_mesh();
    mesh.apply_skinning(&matrices);
    let once = mesh.positions()[0];
    mesh.apply_skinning(&matrices);
    assert!(!vec3_approx(mesh.positions()[0], once));

    mesh.restore_bind_pose();
    mesh.apply_skinning(&matrices);
    assert!(vec3_approx(mesh.positions()[0], once));
}

#[test]
fn unskinned_mesh_ignores_skinning_pass() {
    let mut mesh = MeshBuffers::new("static", vec![Vec3::ONE], Vec::new()).unwrap();
    let before = mesh.version();
    assert!(!mesh.apply_skinning(&[Mat4::from_translation(Vec3::X)]));
    assert_eq!(mesh.positions()[0], Vec3::ONE);
    assert_eq!(mesh.version(), before);
}

// ============================================================================
// skin_vertices
// ============================================================================

#[test]
fn identity_matrices_leave_vertices_unchanged() {
    let mut skeleton = two_bone_skeleton();
    let matrices = skeleton.compute_skinning_matrices();

    let mut positions = vec![Vec3::new(1.0, 1.0, 0.0), Vec3::new(-2.0, 0.5, 3.0)];
    let mut normals = vec![Vec3::X, Vec3::Z];
    let indices = [0u16, 1, 1, 0];
    let weights = [0.5f32, 0.5, 1.0, 0.0];

    skin_vertices(&mut positions, &mut normals, &indices, &weights, 2, matrices);

    assert!(vec3_approx(positions[0], Vec3::new(1.0, 1.0, 0.0)));
    assert!(vec3_approx(positions[1], Vec3::new(-2.0, 0.5, 3.0)));
    assert!(vec3_approx(normals[0], Vec3::X));
    assert!(vec3_approx(normals[1], Vec3::Z));
}

#[test]
fn weighted_sum_blends_two_bones() {
    let matrices = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(0.0, 4.0, 0.0))];
    let mut positions = vec![Vec3::ZERO];
    let mut normals = vec![Vec3::Y];

    skin_vertices(&mut positions, &mut normals, &[0, 1], &[0.75, 0.25], 2, &matrices);

    assert!(vec3_approx(positions[0], Vec3::new(0.0, 1.0, 0.0)));
    // Translation does not reach the normal.
    assert!(vec3_approx(normals[0], Vec3::Y));
}

#[test]
fn normals_rotate_with_the_bone() {
    let matrices = [Mat4::from_quat(Quat::from_rotation_z(FRAC_PI_2))];
    let mut positions = vec![Vec3::X];
    let mut normals = vec![Vec3::X];

    skin_vertices(&mut positions, &mut normals, &[0], &[1.0], 1, &matrices);

    assert!(vec3_approx(positions[0], Vec3::Y));
    assert!(vec3_approx(normals[0], Vec3::Y));
}

// ============================================================================
// End-to-End
// ============================================================================

#[test]
fn child_rotated_45_degrees_moves_bound_vertex() {
    let mut skeleton = two_bone_skeleton();
    let track = BoneTrack::from_rotations(
        1,
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_z(FRAC_PI_2)],
    )
    .unwrap();

    let (_, rotation) = track.sample(0.5);
    assert!(rotation.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_4), EPSILON));

    track.set_time(0.5, &mut skeleton).unwrap();
    let matrices = skeleton.compute_skinning_matrices().to_vec();

    let mut mesh = child_bound_mesh();
    assert!(mesh.apply_skinning(&matrices));

    // Offset (1, 0, 0) from the child at (0, 1, 0), turned 45 degrees.
    let expected = Vec3::new(FRAC_1_SQRT_2, 1.0 + FRAC_1_SQRT_2, 0.0);
    assert!(vec3_approx(mesh.positions()[0], expected), "{}", mesh.positions()[0]);
    assert!(vec3_approx(
        mesh.normals()[0],
        Vec3::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0)
    ));
}

#[test]
fn bounds_follow_the_deformed_buffer() {
    let mut mesh = MeshBuffers::new(
        "box",
        vec![Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)],
        Vec::new(),
    )
    .unwrap()
    .with_skin_influences(vec![0, 0], vec![1.0, 1.0], 1)
    .unwrap();

    mesh.apply_skinning(&[Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))]);

    let bounds = mesh.compute_bounds().unwrap();
    assert_eq!(bounds.min, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(bounds.max, Vec3::new(11.0, 2.0, 3.0));
    assert_eq!(bounds.center(), Vec3::new(10.5, 1.0, 1.5));
    assert_eq!(bounds.size(), Vec3::new(1.0, 2.0, 3.0));
}
