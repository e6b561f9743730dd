#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Skeletal and morph animation core.
//!
//! A [`Skeleton`] holds the bone hierarchy, [`MeshBuffers`] the vertex data it
//! deforms, and a [`MeshAnimationController`] plays named [`Animation`]s over
//! them once per frame, skinning either on the CPU or through a
//! [`ShaderParameterSink`].

pub mod animation;
pub mod errors;
pub mod mesh;
pub mod skeleton;
pub mod skinning;

pub use animation::{
    Animation, BIND_POSE, BoneAnimation, BoneTrack, ControllerSettings, MeshAnimation,
    MeshAnimationController, Pose, PoseFrame, PoseTrack, RepeatMode, VertexOffset,
};
pub use errors::{Result, RigError};
pub use mesh::{BoundingBox, MeshBuffers};
pub use skeleton::{Bone, BoneDesc, BoneTransform, Skeleton};
pub use skinning::{ShaderParameterSink, SkinningCapability, skin_vertices};
