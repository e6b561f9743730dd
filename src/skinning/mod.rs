//! Vertex Skinning
//!
//! Two interchangeable ways of applying skinning matrices:
//!
//! - [`skin_vertices`]: the CPU fallback, a linear blend over the working
//!   vertex buffers of a mesh.
//! - [`ShaderParameterSink`]: the hardware path, where matrices and bone
//!   influences are forwarded to the renderer and vertices stay untouched.
//!
//! Both consume the same matrices from
//! [`Skeleton::compute_skinning_matrices`](crate::skeleton::Skeleton::compute_skinning_matrices),
//! so they agree on the deformed result.

mod hardware;
mod software;

pub use hardware::{ShaderParameterSink, SkinningCapability};
pub use software::skin_vertices;
