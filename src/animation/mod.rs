//! Animation Evaluation
//!
//! Keyframed data and its playback:
//!
//! - [`BoneTrack`] / [`BoneAnimation`]: bone translation and rotation over
//!   time, sampled relative to each bone's bind pose.
//! - [`PoseTrack`] / [`MeshAnimation`]: weighted morph poses over time,
//!   blended additively into a mesh's working vertices.
//! - [`Animation`]: a named clip combining at most one of each.
//! - [`MeshAnimationController`]: selects an animation by name, advances its
//!   time every frame and dispatches the resulting skinning matrices.

mod bone_track;
mod clip;
mod controller;
mod keys;
mod library;
mod pose;
mod settings;
mod values;

pub use bone_track::{BoneAnimation, BoneTrack};
pub use clip::{Animation, AnimationTargets, SubAnimation};
pub use controller::{BIND_POSE, MeshAnimationController};
pub use library::{AnimationKey, AnimationLibrary};
pub use pose::{MeshAnimation, Pose, PoseFrame, PoseTrack, PoseWeight, VertexOffset};
pub use settings::{ControllerSettings, RepeatMode};
pub use values::Interpolatable;
