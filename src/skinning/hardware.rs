use glam::Mat4;

/// Receiver of skinning data on the hardware path.
///
/// Implemented by the rendering backend; the animation core never sees shader
/// source or GPU handles, only this sink.
pub trait ShaderParameterSink {
    /// Per-bone skinning matrices, indexed by bone.
    fn set_bone_matrices(&mut self, matrices: &[Mat4]);

    /// Per-vertex influences of one target mesh (`weights_per_vertex`
    /// entries per vertex).
    fn set_vertex_influences(
        &mut self,
        mesh_index: usize,
        bone_indices: &[u16],
        bone_weights: &[f32],
        weights_per_vertex: usize,
    );
}

/// How a controller turns skinning matrices into deformed vertices.
///
/// Chosen once when the controller is built.
#[derive(Default)]
pub enum SkinningCapability {
    /// CPU fallback: the controller skins the working vertex buffers itself.
    #[default]
    Software,
    /// Matrices and influences are handed to the shader sink; the vertex
    /// buffers are never skinned on the CPU.
    Hardware(Box<dyn ShaderParameterSink>),
}

impl SkinningCapability {
    #[inline]
    #[must_use]
    pub fn is_hardware(&self) -> bool {
        matches!(self, Self::Hardware(_))
    }
}

impl std::fmt::Debug for SkinningCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Software => f.write_str("Software"),
            Self::Hardware(_) => f.write_str("Hardware"),
        }
    }
}
