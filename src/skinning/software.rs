use glam::{Mat4, Vec3};

/// Linear blend skinning over flat vertex buffers, in place.
///
/// For every vertex `v` with influences `(b_i, w_i)`:
///
/// ```text
/// position'[v] = Σ w_i * (M[b_i] · position[v])
/// normal'[v]   = Σ w_i * (M[b_i]₃ₓ₃ · normal[v])
/// ```
///
/// Exactly `weights_per_vertex` entries are read per vertex. Slots with a
/// zero weight (padding) or a bone index past `matrices` are skipped; any
/// other weight, negative ones included, enters the sum as authored. Neither
/// weights nor normals are renormalized. `normals` may be empty, in which case
/// only positions are skinned.
///
/// The loop never allocates.
#[allow(clippy::float_cmp)]
pub fn skin_vertices(
    positions: &mut [Vec3],
    normals: &mut [Vec3],
    bone_indices: &[u16],
    bone_weights: &[f32],
    weights_per_vertex: usize,
    matrices: &[Mat4],
) {
    if weights_per_vertex == 0 {
        return;
    }
    let has_normals = normals.len() == positions.len();
    let influences = bone_indices
        .chunks_exact(weights_per_vertex)
        .zip(bone_weights.chunks_exact(weights_per_vertex));

    for (v, (position, (indices, weights))) in positions.iter_mut().zip(influences).enumerate() {
        let bind_position = *position;
        let bind_normal = if has_normals { normals[v] } else { Vec3::ZERO };

        let mut skinned_position = Vec3::ZERO;
        let mut skinned_normal = Vec3::ZERO;

        for (&bone, &weight) in indices.iter().zip(weights) {
            if weight == 0.0 {
                continue;
            }
            let Some(matrix) = matrices.get(usize::from(bone)) else {
                continue;
            };

            skinned_position += matrix.transform_point3(bind_position) * weight;
            skinned_normal += matrix.transform_vector3(bind_normal) * weight;
        }

        *position = skinned_position;
        if has_normals {
            normals[v] = skinned_normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn padded_slots_are_ignored() {
        let mut positions = vec![Vec3::new(1.0, 2.0, 3.0)];
        let mut normals = vec![Vec3::Y];
        // Second slot is padding that points at a bogus bone.
        let indices = [0u16, 7];
        let weights = [1.0f32, 0.0];
        let matrices = [Mat4::from_translation(Vec3::X)];

        skin_vertices(&mut positions, &mut normals, &indices, &weights, 2, &matrices);

        assert_eq!(positions[0], Vec3::new(2.0, 2.0, 3.0));
        // Translation does not reach normals.
        assert_eq!(normals[0], Vec3::Y);
    }

    #[test]
    fn negative_weights_enter_the_sum() {
        let mut positions = vec![Vec3::ZERO];
        let mut normals = Vec::new();
        let indices = [0u16, 1];
        let weights = [1.5f32, -0.5];
        let matrices = [
            Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
            Mat4::from_translation(Vec3::new(0.0, 4.0, 0.0)),
        ];

        skin_vertices(&mut positions, &mut normals, &indices, &weights, 2, &matrices);

        assert!(positions[0].abs_diff_eq(Vec3::new(3.0, -2.0, 0.0), 1e-6));
    }

    #[test]
    fn weights_are_not_renormalized() {
        let mut positions = vec![Vec3::new(2.0, 0.0, 0.0)];
        let mut normals = Vec::new();
        let indices = [0u16, 0];
        let weights = [0.25f32, 0.25];
        let matrices = [Mat4::from_quat(Quat::IDENTITY)];

        skin_vertices(&mut positions, &mut normals, &indices, &weights, 2, &matrices);

        assert!((positions[0].x - 1.0).abs() < 1e-6);
    }
}
