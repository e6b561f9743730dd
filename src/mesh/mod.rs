//! Mesh Vertex Buffers
//!
//! [`MeshBuffers`] is the narrow view of a renderable mesh that the animation
//! core mutates: a working position/normal buffer that pose blending and
//! software skinning write in place, the untouched bind-pose copy it is
//! restored from, and the per-vertex bone influences.
//!
//! # Restore, then mutate
//!
//! Both morph blending and software skinning are destructive and assume the
//! working buffer starts from the bind pose. Every frame that evaluates them
//! must therefore call [`MeshBuffers::restore_bind_pose`] first; evaluating
//! twice without a restore compounds the deformation.
//!
//! Every mutation bumps [`MeshBuffers::version`] so that dependent systems
//! (bounding volumes, GPU upload) can tell the vertices are dirty.

mod bounds;
mod revision;

pub use bounds::BoundingBox;
pub use revision::{Revision, VerticesMut};

use glam::{Mat4, Vec3};

use crate::errors::{Result, RigError};
use crate::skinning;

/// Positions and normals of one vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexData {
    pub positions: Vec<Vec3>,
    /// Either empty or one normal per position.
    pub normals: Vec<Vec3>,
}

/// Flat bone-index / bone-weight buffers, `weights_per_vertex` entries per
/// vertex. Unused slots carry a weight of `0.0`.
#[derive(Debug, Clone)]
pub struct SkinInfluences {
    bone_indices: Vec<u16>,
    bone_weights: Vec<f32>,
    weights_per_vertex: usize,
}

impl SkinInfluences {
    #[inline]
    #[must_use]
    pub fn bone_indices(&self) -> &[u16] {
        &self.bone_indices
    }

    #[inline]
    #[must_use]
    pub fn bone_weights(&self) -> &[f32] {
        &self.bone_weights
    }

    #[inline]
    #[must_use]
    pub fn weights_per_vertex(&self) -> usize {
        self.weights_per_vertex
    }
}

#[derive(Debug, Clone)]
pub struct MeshBuffers {
    name: String,
    bind: VertexData,
    working: VertexData,
    influences: Option<SkinInfluences>,
    revision: Revision,
}

impl MeshBuffers {
    /// Creates buffers whose working copy starts at the bind pose.
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, normals: Vec<Vec3>) -> Result<Self> {
        if !normals.is_empty() && normals.len() != positions.len() {
            return Err(RigError::BufferLengthMismatch {
                buffer: "normals",
                expected: positions.len(),
                actual: normals.len(),
            });
        }

        let bind = VertexData { positions, normals };
        Ok(Self {
            name: name.into(),
            working: bind.clone(),
            bind,
            influences: None,
            revision: Revision::default(),
        })
    }

    /// Attaches bone influences. Both buffers must hold exactly
    /// `vertex_count * weights_per_vertex` entries.
    pub fn with_skin_influences(
        mut self,
        bone_indices: Vec<u16>,
        bone_weights: Vec<f32>,
        weights_per_vertex: usize,
    ) -> Result<Self> {
        if weights_per_vertex == 0 {
            return Err(RigError::InvalidWeightsPerVertex);
        }

        let expected = self.vertex_count() * weights_per_vertex;
        if bone_indices.len() != expected {
            return Err(RigError::BufferLengthMismatch {
                buffer: "bone_indices",
                expected,
                actual: bone_indices.len(),
            });
        }
        if bone_weights.len() != expected {
            return Err(RigError::BufferLengthMismatch {
                buffer: "bone_weights",
                expected,
                actual: bone_weights.len(),
            });
        }

        self.influences = Some(SkinInfluences {
            bone_indices,
            bone_weights,
            weights_per_vertex,
        });
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.bind.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn bind_positions(&self) -> &[Vec3] {
        &self.bind.positions
    }

    #[inline]
    #[must_use]
    pub fn bind_normals(&self) -> &[Vec3] {
        &self.bind.normals
    }

    /// Working positions, as last written by the animation pass.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.working.positions
    }

    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.working.normals
    }

    #[inline]
    #[must_use]
    pub fn influences(&self) -> Option<&SkinInfluences> {
        self.influences.as_ref()
    }

    /// Bumped on every mutation of the working buffers.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.revision.get()
    }

    /// Whether the working buffers changed after revision `seen` was read.
    #[inline]
    #[must_use]
    pub fn changed_since(&self, seen: u64) -> bool {
        self.revision.changed_since(seen)
    }

    /// Scoped mutable access to the working buffers; marks them dirty when
    /// the guard is dropped.
    pub fn vertices_mut(&mut self) -> VerticesMut<'_> {
        VerticesMut::new(&mut self.working, &mut self.revision)
    }

    /// Copies the bind pose back over the working buffers.
    pub fn restore_bind_pose(&mut self) {
        self.working.positions.clone_from(&self.bind.positions);
        self.working.normals.clone_from(&self.bind.normals);
        self.revision.bump();
    }

    /// Runs the software skinning pass over the working buffers in place.
    ///
    /// Returns `false` (and leaves the buffers alone) when the mesh has no
    /// bone influences.
    pub fn apply_skinning(&mut self, skinning_matrices: &[Mat4]) -> bool {
        let Some(influences) = &self.influences else {
            return false;
        };

        skinning::skin_vertices(
            &mut self.working.positions,
            &mut self.working.normals,
            &influences.bone_indices,
            &influences.bone_weights,
            influences.weights_per_vertex,
            skinning_matrices,
        );
        self.revision.bump();
        true
    }

    /// Bounds of the working positions.
    #[must_use]
    pub fn compute_bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.working.positions)
    }
}
