//! Bone Hierarchy
//!
//! The [`Skeleton`] owns every [`Bone`] of a rig in a flat array. Parent and
//! child relations are indices into that array, so there is no shared
//! ownership between bones.
//!
//! Each frame the animation tracks write bone *local* transforms; the skeleton
//! then composes them root-to-leaf into world transforms and derives the
//! skinning matrices that map bind-pose vertices into the animated pose:
//!
//! ```text
//! world(bone)    = world(parent) * local(bone)
//! skinning(bone) = world(bone) * inverse(bind_world(bone))
//! ```

mod bone;

pub use bone::{Bone, BoneDesc, BoneTransform};

use std::collections::VecDeque;

use glam::{Affine3A, Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::errors::{Result, RigError};

#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
    name_to_index: FxHashMap<String, usize>,

    /// Parents-first traversal order (breadth-first from the roots).
    update_order: Vec<usize>,

    // === Runtime Data ===
    // Final computed matrix array, rewritten by `compute_skinning_matrices`.
    skinning_matrices: Vec<Mat4>,
    /// Set whenever a local transform may have changed since the last pass.
    dirty: bool,
}

impl Skeleton {
    /// Builds the hierarchy and captures the bind pose.
    ///
    /// Fails if the list is empty, if two bones share a name, if a bone names
    /// itself or a missing bone as parent, or if the parent relation has a
    /// cycle.
    pub fn new(descs: Vec<BoneDesc>) -> Result<Self> {
        if descs.is_empty() {
            return Err(RigError::EmptySkeleton);
        }

        let count = descs.len();
        for (i, desc) in descs.iter().enumerate() {
            if let Some(parent) = desc.parent
                && (parent >= count || parent == i)
            {
                return Err(RigError::InvalidParent {
                    bone: desc.name.clone(),
                    parent,
                });
            }
        }

        let mut bones: Vec<Bone> = descs
            .into_iter()
            .enumerate()
            .map(|(i, desc)| Bone::from_desc(i, desc))
            .collect();

        for i in 0..count {
            if let Some(parent) = bones[i].parent {
                bones[parent].children.push(i);
            }
        }

        let update_order = Self::traversal_order(&bones)?;

        let mut name_to_index = FxHashMap::default();
        for bone in &bones {
            if name_to_index.insert(bone.name.clone(), bone.index).is_some() {
                return Err(RigError::DuplicateBoneName(bone.name.clone()));
            }
        }

        let mut skeleton = Self {
            bones,
            name_to_index,
            update_order,
            skinning_matrices: vec![Mat4::IDENTITY; count],
            dirty: true,
        };

        skeleton.update_world_transforms();
        for bone in &mut skeleton.bones {
            bone.inverse_bind_world = bone.world.inverse();
        }

        Ok(skeleton)
    }

    /// Breadth-first order from every root. Bones that cannot be reached from
    /// a root sit on (or below) a parent cycle.
    fn traversal_order(bones: &[Bone]) -> Result<Vec<usize>> {
        let mut order = Vec::with_capacity(bones.len());
        let mut queue: VecDeque<usize> = bones
            .iter()
            .filter(|b| b.parent.is_none())
            .map(|b| b.index)
            .collect();

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            queue.extend(bones[idx].children.iter().copied());
        }

        if order.len() < bones.len() {
            let mut visited = vec![false; bones.len()];
            for &idx in &order {
                visited[idx] = true;
            }
            let culprit = visited.iter().position(|v| !v).unwrap_or(0);
            return Err(RigError::CyclicHierarchy(bones[culprit].name.clone()));
        }

        Ok(order)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn bone(&self, index: usize) -> Result<&Bone> {
        self.bones
            .get(index)
            .ok_or(RigError::BoneIndexNotFound(index))
    }

    pub fn bone_by_name(&self, name: &str) -> Result<&Bone> {
        self.bone_index(name)
            .map(|i| &self.bones[i])
            .ok_or_else(|| RigError::BoneNotFound(name.to_string()))
    }

    /// Mutable access to a bone. World transforms are considered stale
    /// afterwards.
    pub fn bone_mut(&mut self, index: usize) -> Result<&mut Bone> {
        let bone = self
            .bones
            .get_mut(index)
            .ok_or(RigError::BoneIndexNotFound(index))?;
        self.dirty = true;
        Ok(bone)
    }

    /// Root bones (bones without a parent).
    pub fn roots(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter().filter(|b| b.parent.is_none())
    }

    // ========================================================================
    // Pose
    // ========================================================================

    /// See [`Bone::set_anim_transforms`].
    pub fn set_anim_transforms(
        &mut self,
        index: usize,
        translation: Vec3,
        rotation: Quat,
    ) -> Result<()> {
        self.bone_mut(index)?
            .set_anim_transforms(translation, rotation);
        Ok(())
    }

    /// Returns every bone to its bind pose and refreshes world transforms.
    pub fn reset(&mut self) {
        for bone in &mut self.bones {
            bone.reset();
        }
        self.update_world_transforms();
    }

    /// Recomposes world transforms parents-first.
    pub fn update_world_transforms(&mut self) {
        for &idx in &self.update_order {
            let local = self.bones[idx].local.to_affine();
            let world = match self.bones[idx].parent {
                Some(parent) => self.bones[parent].world * local,
                None => local,
            };
            self.bones[idx].world = world;
        }
        self.dirty = false;
    }

    /// Current world transform of a bone, even if locals changed since the
    /// last pass (the parent chain is composed on the fly in that case).
    pub fn world_transform(&self, index: usize) -> Result<Affine3A> {
        let bone = self.bone(index)?;
        if !self.dirty {
            return Ok(bone.world);
        }

        let mut world = bone.local.to_affine();
        let mut parent = bone.parent;
        while let Some(p) = parent {
            let ancestor = &self.bones[p];
            world = ancestor.local.to_affine() * world;
            parent = ancestor.parent;
        }
        Ok(world)
    }

    /// Whether world transforms lag behind local transforms.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ========================================================================
    // Skinning
    // ========================================================================

    /// Walks the hierarchy root-to-leaf and recomputes, per bone, the matrix
    /// mapping a bind-pose vertex into the current pose.
    pub fn compute_skinning_matrices(&mut self) -> &[Mat4] {
        self.update_world_transforms();
        for (matrix, bone) in self.skinning_matrices.iter_mut().zip(&self.bones) {
            *matrix = Mat4::from(bone.world * bone.inverse_bind_world);
        }
        &self.skinning_matrices
    }

    /// Matrices from the last [`compute_skinning_matrices`](Self::compute_skinning_matrices) call.
    #[inline]
    #[must_use]
    pub fn skinning_matrices(&self) -> &[Mat4] {
        &self.skinning_matrices
    }

    /// Raw bytes of the skinning matrices, ready for a uniform/storage upload.
    #[inline]
    #[must_use]
    pub fn skinning_matrices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.skinning_matrices)
    }
}
