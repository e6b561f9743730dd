use glam::{Affine3A, Quat, Vec3};
use smallvec::SmallVec;

/// Local TRS transform of a bone relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl BoneTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Construction-time description of a bone, as produced by model loaders.
#[derive(Debug, Clone)]
pub struct BoneDesc {
    pub name: String,
    /// Index of the parent bone in the same description list, `None` for roots.
    pub parent: Option<usize>,
    /// Bind-pose transform, local to the parent.
    pub bind: BoneTransform,
}

impl BoneDesc {
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
            bind: BoneTransform::IDENTITY,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.bind.translation = translation;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.bind.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.bind.scale = scale;
        self
    }
}

/// A node of the skeleton hierarchy.
///
/// Bones are owned by their [`Skeleton`](super::Skeleton); parent and children
/// are plain indices into the skeleton's bone array.
#[derive(Debug, Clone)]
pub struct Bone {
    pub(crate) name: String,
    pub(crate) index: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) children: SmallVec<[usize; 4]>,

    pub(crate) bind: BoneTransform,
    pub(crate) local: BoneTransform,

    // === Derived (written by the skeleton pass) ===
    pub(crate) world: Affine3A,
    pub(crate) inverse_bind_world: Affine3A,
}

impl Bone {
    pub(crate) fn from_desc(index: usize, desc: BoneDesc) -> Self {
        Self {
            name: desc.name,
            index,
            parent: desc.parent,
            children: SmallVec::new(),
            bind: desc.bind,
            local: desc.bind,
            world: Affine3A::IDENTITY,
            inverse_bind_world: Affine3A::IDENTITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn bind_transform(&self) -> &BoneTransform {
        &self.bind
    }

    /// Current (possibly animated) local transform.
    #[inline]
    #[must_use]
    pub fn local_transform(&self) -> &BoneTransform {
        &self.local
    }

    /// World transform as of the last skeleton pass.
    ///
    /// Use [`Skeleton::world_transform`](super::Skeleton::world_transform) when
    /// locals may have changed since.
    #[inline]
    #[must_use]
    pub fn cached_world_transform(&self) -> &Affine3A {
        &self.world
    }

    /// Overwrites the animated local transform.
    ///
    /// Track samples are relative to the bind pose: the translation is added
    /// to the bind translation and the rotation is applied after the bind
    /// rotation. Scale is never animated; the bind scale is kept.
    pub fn set_anim_transforms(&mut self, translation: Vec3, rotation: Quat) {
        self.local.translation = self.bind.translation + translation;
        self.local.rotation = self.bind.rotation * rotation;
        self.local.scale = self.bind.scale;
    }

    /// Puts the local transform back to the bind pose.
    pub fn reset(&mut self) {
        self.local = self.bind;
    }
}
