//! Error Types
//!
//! This module defines the error types used throughout the animation core.
//!
//! # Overview
//!
//! The main error type [`RigError`] covers two families of failure:
//! - Configuration errors: malformed tracks, skeletons or buffers. These are
//!   raised by constructors so that an invalid object is never built.
//! - Lookup errors: unknown animation or bone names. These are recoverable;
//!   the caller is told and the state that was queried stays unchanged.
//!
//! Out-of-range vertex indices inside a pose are deliberately *not* part of
//! this taxonomy; they are a loader concern and never checked per frame.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rig::errors::{RigError, Result};
//!
//! fn switch(controller: &mut MeshAnimationController) -> Result<()> {
//!     controller.set_animation("walk")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the animation core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    // ========================================================================
    // Track Configuration Errors
    // ========================================================================
    /// A keyframe track was built without any keyframe.
    #[error("Track '{0}' has no keyframes")]
    EmptyTrack(String),

    /// The parallel arrays of a keyframe track have different lengths.
    #[error("Track length mismatch: {times} times, {translations} translations, {rotations} rotations")]
    TrackLengthMismatch {
        /// Number of key times
        times: usize,
        /// Number of translation samples
        translations: usize,
        /// Number of rotation samples
        rotations: usize,
    },

    /// Key times are not strictly ascending.
    #[error("Keyframe times must be strictly ascending (key {index}: {previous} -> {current})")]
    NonAscendingKeyframes {
        /// Index of the offending key
        index: usize,
        /// Time of the previous key
        previous: f32,
        /// Time of the offending key
        current: f32,
    },

    /// A pose referenced by a pose track targets another mesh.
    #[error("Pose '{pose}' targets mesh {pose_mesh}, but its track targets mesh {track_mesh}")]
    PoseTargetMismatch {
        /// Name of the pose
        pose: String,
        /// Mesh index stored in the pose
        pose_mesh: usize,
        /// Mesh index of the track
        track_mesh: usize,
    },

    // ========================================================================
    // Animation Configuration Errors
    // ========================================================================
    /// An animation was built with neither bone nor mesh data.
    #[error("Animation '{0}' has neither bone nor mesh data")]
    EmptyAnimation(String),

    /// An animation already carries a sub-animation of this kind.
    #[error("Animation '{name}' already has {kind} data")]
    DuplicateSubAnimation {
        /// Name of the animation
        name: String,
        /// "bone" or "mesh"
        kind: &'static str,
    },

    /// A bone track refers to a bone the skeleton does not have.
    #[error("Bone index {index} out of range (skeleton has {count} bones)")]
    BoneIndexOutOfRange {
        /// The invalid index
        index: usize,
        /// Number of bones in the skeleton
        count: usize,
    },

    /// A pose track refers to a mesh the controller does not drive.
    #[error("Mesh index {index} out of range ({count} meshes)")]
    MeshIndexOutOfRange {
        /// The invalid index
        index: usize,
        /// Number of target meshes
        count: usize,
    },

    /// Bone animation was registered on a controller without a skeleton.
    #[error("Animation '{0}' carries bone data but the controller has no skeleton")]
    MissingSkeleton(String),

    // ========================================================================
    // Skeleton Configuration Errors
    // ========================================================================
    /// A skeleton was built without bones.
    #[error("Skeleton has no bones")]
    EmptySkeleton,

    /// A bone names a parent that does not exist or is itself.
    #[error("Bone '{bone}' has invalid parent index {parent}")]
    InvalidParent {
        /// Name of the bone
        bone: String,
        /// The invalid parent index
        parent: usize,
    },

    /// Two bones share a name, so name lookup would be ambiguous.
    #[error("Duplicate bone name '{0}'")]
    DuplicateBoneName(String),

    /// The parent relation contains a cycle.
    #[error("Bone hierarchy contains a cycle through bone '{0}'")]
    CyclicHierarchy(String),

    // ========================================================================
    // Mesh Buffer Configuration Errors
    // ========================================================================
    /// Parallel vertex buffers disagree in length.
    #[error("Buffer length mismatch for {buffer}: expected {expected}, got {actual}")]
    BufferLengthMismatch {
        /// Name of the buffer
        buffer: &'static str,
        /// Expected element count
        expected: usize,
        /// Actual element count
        actual: usize,
    },

    /// Zero influences per vertex were requested.
    #[error("Weights per vertex must be at least 1")]
    InvalidWeightsPerVertex,

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// The requested animation is not registered.
    #[error("Animation not found: {0}")]
    AnimationNotFound(String),

    /// The requested bone name is unknown.
    #[error("Bone not found: {0}")]
    BoneNotFound(String),

    /// The requested bone index is unknown.
    #[error("Bone index not found: {0}")]
    BoneIndexNotFound(usize),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
