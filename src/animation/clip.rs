use smallvec::SmallVec;

use crate::animation::bone_track::BoneAnimation;
use crate::animation::pose::MeshAnimation;
use crate::errors::{Result, RigError};
use crate::mesh::MeshBuffers;
use crate::skeleton::Skeleton;

/// Everything an [`Animation`] may write to during evaluation.
pub struct AnimationTargets<'a> {
    pub skeleton: Option<&'a mut Skeleton>,
    pub meshes: &'a mut [MeshBuffers],
}

/// One kind-specific part of an [`Animation`].
#[derive(Debug, Clone)]
pub enum SubAnimation {
    Bone(BoneAnimation),
    Mesh(MeshAnimation),
}

impl SubAnimation {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bone(_) => "bone",
            Self::Mesh(_) => "mesh",
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bone(a) => a.name(),
            Self::Mesh(a) => a.name(),
        }
    }

    #[must_use]
    pub fn length(&self) -> f32 {
        match self {
            Self::Bone(a) => a.length(),
            Self::Mesh(a) => a.length(),
        }
    }

    fn set_time(&self, time: f32, targets: &mut AnimationTargets<'_>) -> Result<()> {
        match self {
            Self::Bone(a) => {
                let skeleton = targets
                    .skeleton
                    .as_deref_mut()
                    .ok_or_else(|| RigError::MissingSkeleton(a.name().to_string()))?;
                a.set_time(time, skeleton)
            }
            Self::Mesh(a) => a.set_time(time, targets.meshes),
        }
    }
}

/// A named clip made of at most one bone animation and at most one mesh
/// animation.
///
/// The two parts are independent: bone tracks only touch bone state, pose
/// tracks only touch vertex buffers.
#[derive(Debug, Clone)]
pub struct Animation {
    name: String,
    parts: SmallVec<[SubAnimation; 2]>,
}

impl Animation {
    /// At least one of the two parts must be present.
    pub fn new(
        name: impl Into<String>,
        bone: Option<BoneAnimation>,
        mesh: Option<MeshAnimation>,
    ) -> Result<Self> {
        let name = name.into();
        let mut parts = SmallVec::new();
        parts.extend(bone.map(SubAnimation::Bone));
        parts.extend(mesh.map(SubAnimation::Mesh));

        if parts.is_empty() {
            return Err(RigError::EmptyAnimation(name));
        }
        Ok(Self { name, parts })
    }

    pub fn from_bones(name: impl Into<String>, bone: BoneAnimation) -> Self {
        Self {
            name: name.into(),
            parts: smallvec::smallvec![SubAnimation::Bone(bone)],
        }
    }

    pub fn from_meshes(name: impl Into<String>, mesh: MeshAnimation) -> Self {
        Self {
            name: name.into(),
            parts: smallvec::smallvec![SubAnimation::Mesh(mesh)],
        }
    }

    fn push_part(&mut self, part: SubAnimation) -> Result<()> {
        if self
            .parts
            .iter()
            .any(|p| std::mem::discriminant(p) == std::mem::discriminant(&part))
        {
            return Err(RigError::DuplicateSubAnimation {
                name: self.name.clone(),
                kind: part.kind(),
            });
        }
        self.parts.push(part);
        Ok(())
    }

    /// Attaches the skeletal part. Fails if one is already present.
    pub fn add_bone_animation(&mut self, bone: BoneAnimation) -> Result<()> {
        self.push_part(SubAnimation::Bone(bone))
    }

    /// Attaches the morph part. Fails if one is already present.
    pub fn add_mesh_animation(&mut self, mesh: MeshAnimation) -> Result<()> {
        self.push_part(SubAnimation::Mesh(mesh))
    }

    /// Moves the parts of `other` into `self`. Either every part is taken or,
    /// on a kind collision, `self` is left untouched.
    pub fn merge(&mut self, other: Animation) -> Result<()> {
        if let Some(clash) = other.parts.iter().find(|incoming| {
            self.parts
                .iter()
                .any(|p| std::mem::discriminant(p) == std::mem::discriminant(*incoming))
        }) {
            return Err(RigError::DuplicateSubAnimation {
                name: self.name.clone(),
                kind: clash.kind(),
            });
        }
        self.parts.extend(other.parts);
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn parts(&self) -> &[SubAnimation] {
        &self.parts
    }

    #[must_use]
    pub fn bone_animation(&self) -> Option<&BoneAnimation> {
        self.parts.iter().find_map(|p| match p {
            SubAnimation::Bone(a) => Some(a),
            SubAnimation::Mesh(_) => None,
        })
    }

    #[must_use]
    pub fn mesh_animation(&self) -> Option<&MeshAnimation> {
        self.parts.iter().find_map(|p| match p {
            SubAnimation::Mesh(a) => Some(a),
            SubAnimation::Bone(_) => None,
        })
    }

    #[inline]
    #[must_use]
    pub fn has_bone_animation(&self) -> bool {
        self.bone_animation().is_some()
    }

    #[inline]
    #[must_use]
    pub fn has_mesh_animation(&self) -> bool {
        self.mesh_animation().is_some()
    }

    /// Longest of the present parts.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.parts
            .iter()
            .map(SubAnimation::length)
            .fold(0.0_f32, f32::max)
    }

    /// Evaluates every part at `time`.
    ///
    /// Bone parts need `targets.skeleton`; mesh parts add into the working
    /// buffers, which must hold the bind pose beforehand.
    pub fn set_time(&self, time: f32, targets: &mut AnimationTargets<'_>) -> Result<()> {
        for part in &self.parts {
            part.set_time(time, targets)?;
        }
        Ok(())
    }

    /// Checks every track against the rig it is about to drive.
    pub(crate) fn validate_targets(&self, bone_count: Option<usize>, mesh_count: usize) -> Result<()> {
        for part in &self.parts {
            match part {
                SubAnimation::Bone(a) => {
                    let count = bone_count.ok_or_else(|| RigError::MissingSkeleton(self.name.clone()))?;
                    if let Some(track) = a.tracks().iter().find(|t| t.bone_index() >= count) {
                        return Err(RigError::BoneIndexOutOfRange {
                            index: track.bone_index(),
                            count,
                        });
                    }
                }
                SubAnimation::Mesh(a) => {
                    if let Some(track) = a.tracks().iter().find(|t| t.target_mesh() >= mesh_count) {
                        return Err(RigError::MeshIndexOutOfRange {
                            index: track.target_mesh(),
                            count: mesh_count,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
