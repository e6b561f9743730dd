//! Skeleton Tests
//!
//! Tests for:
//! - Hierarchy construction and validation (parents, cycles, multiple roots)
//! - Name lookup
//! - World transform composition and dirty tracking
//! - Skinning matrices at and away from the bind pose

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use rig::errors::RigError;
use rig::skeleton::{BoneDesc, Skeleton};

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn arm() -> Skeleton {
    Skeleton::new(vec![
        BoneDesc::new("root", None),
        BoneDesc::new("upper", Some(0)).with_translation(Vec3::new(0.0, 1.0, 0.0)),
        BoneDesc::new("lower", Some(1)).with_translation(Vec3::new(0.0, 1.0, 0.0)),
    ])
    .unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn empty_skeleton_is_rejected() {
    assert_eq!(Skeleton::new(Vec::new()).unwrap_err(), RigError::EmptySkeleton);
}

#[test]
fn parent_out_of_range_is_rejected() {
    let err = Skeleton::new(vec![
        BoneDesc::new("root", None),
        BoneDesc::new("stray", Some(5)),
    ])
    .unwrap_err();

    assert_eq!(
        err,
        RigError::InvalidParent {
            bone: "stray".to_string(),
            parent: 5
        }
    );
}

#[test]
fn self_parent_is_rejected() {
    let err = Skeleton::new(vec![BoneDesc::new("loop", Some(0))]).unwrap_err();
    assert!(matches!(err, RigError::InvalidParent { .. }));
}

#[test]
fn duplicate_bone_names_are_rejected() {
    let err = Skeleton::new(vec![
        BoneDesc::new("root", None),
        BoneDesc::new("finger", Some(0)),
        BoneDesc::new("finger", Some(0)),
    ])
    .unwrap_err();
    assert_eq!(err, RigError::DuplicateBoneName("finger".to_string()));
}

#[test]
fn multiple_roots_are_allowed() {
    let skeleton = Skeleton::new(vec![
        BoneDesc::new("body", None),
        BoneDesc::new("prop", None),
        BoneDesc::new("head", Some(0)),
    ])
    .unwrap();

    let roots: Vec<&str> = skeleton.roots().map(|b| b.name()).collect();
    assert_eq!(roots, vec!["body", "prop"]);
    assert_eq!(skeleton.bone(0).unwrap().children(), &[2]);
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn bone_lookup_by_name() {
    let skeleton = arm();

    assert_eq!(skeleton.bone_count(), 3);
    assert_eq!(skeleton.bone_index("lower"), Some(2));
    assert_eq!(skeleton.bone_by_name("upper").unwrap().parent(), Some(0));
    assert_eq!(
        skeleton.bone_by_name("tail").unwrap_err(),
        RigError::BoneNotFound("tail".to_string())
    );
    assert_eq!(skeleton.bone(9).unwrap_err(), RigError::BoneIndexNotFound(9));
}

// ============================================================================
// World Transforms
// ============================================================================

#[test]
fn bind_world_transforms_compose_down_the_chain() {
    let skeleton = arm();
    let lower = skeleton.bone(2).unwrap().cached_world_transform();
    assert!(vec3_approx(lower.translation.into(), Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn anim_transforms_are_relative_to_bind() {
    let mut skeleton = arm();
    skeleton
        .set_anim_transforms(1, Vec3::new(0.5, 0.0, 0.0), Quat::IDENTITY)
        .unwrap();

    let local = skeleton.bone(1).unwrap().local_transform();
    assert!(vec3_approx(local.translation, Vec3::new(0.5, 1.0, 0.0)));
    assert!(skeleton.is_dirty());
}

#[test]
fn world_transform_is_exact_while_dirty() {
    let mut skeleton = arm();
    skeleton
        .set_anim_transforms(0, Vec3::ZERO, Quat::from_rotation_z(FRAC_PI_2))
        .unwrap();

    // Root turned 90 degrees about Z: the chain now points along -X.
    let world = skeleton.world_transform(2).unwrap();
    assert!(vec3_approx(world.translation.into(), Vec3::new(-2.0, 0.0, 0.0)));

    skeleton.update_world_transforms();
    assert!(!skeleton.is_dirty());
    let cached = skeleton.bone(2).unwrap().cached_world_transform();
    assert!(vec3_approx(cached.translation.into(), Vec3::new(-2.0, 0.0, 0.0)));
}

#[test]
fn reset_returns_to_bind_pose() {
    let mut skeleton = arm();
    skeleton
        .set_anim_transforms(1, Vec3::X, Quat::from_rotation_x(1.0))
        .unwrap();
    skeleton.reset();

    let bone = skeleton.bone(1).unwrap();
    assert_eq!(bone.local_transform(), bone.bind_transform());
    assert!(!skeleton.is_dirty());
}

#[test]
fn unknown_bone_index_is_an_error() {
    let mut skeleton = arm();
    let err = skeleton
        .set_anim_transforms(3, Vec3::ZERO, Quat::IDENTITY)
        .unwrap_err();
    assert_eq!(err, RigError::BoneIndexNotFound(3));
}

// ============================================================================
// Skinning Matrices
// ============================================================================

#[test]
fn bind_pose_skinning_matrices_are_identity() {
    let mut skeleton = Skeleton::new(vec![
        BoneDesc::new("root", None)
            .with_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(0.3)),
        BoneDesc::new("child", Some(0))
            .with_translation(Vec3::new(0.0, 1.0, 0.0))
            .with_scale(Vec3::splat(2.0)),
    ])
    .unwrap();

    for matrix in skeleton.compute_skinning_matrices() {
        assert!(matrix.abs_diff_eq(Mat4::IDENTITY, EPSILON), "{matrix:?}");
    }
}

#[test]
fn skinning_matrix_maps_bind_vertex_into_pose() {
    let mut skeleton = arm();
    skeleton
        .set_anim_transforms(1, Vec3::ZERO, Quat::from_rotation_z(FRAC_PI_2))
        .unwrap();

    let matrices = skeleton.compute_skinning_matrices();
    // A vertex on the tip of "upper" (at y = 2 in bind pose) swings to -X.
    let moved = matrices[1].transform_point3(Vec3::new(0.0, 2.0, 0.0));
    assert!(vec3_approx(moved, Vec3::new(-1.0, 1.0, 0.0)), "{moved}");
    // The root did not move.
    assert!(matrices[0].abs_diff_eq(Mat4::IDENTITY, EPSILON));
}

#[test]
fn skinning_matrix_bytes_cover_every_bone() {
    let mut skeleton = arm();
    skeleton.compute_skinning_matrices();
    assert_eq!(
        skeleton.skinning_matrices_bytes().len(),
        3 * std::mem::size_of::<Mat4>()
    );
}
