use std::sync::Arc;

use glam::Vec3;
use smallvec::SmallVec;

use crate::animation::keys::{interval_start, validate_key_times};
use crate::errors::{Result, RigError};
use crate::mesh::MeshBuffers;

/// Position offset of one vertex within a pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOffset {
    pub vertex: u32,
    pub offset: Vec3,
}

impl VertexOffset {
    #[must_use]
    pub fn new(vertex: u32, offset: Vec3) -> Self {
        Self { vertex, offset }
    }
}

/// A morph target: sparse per-vertex offsets for one mesh.
///
/// Vertex indices are trusted to be valid for the target mesh; that is
/// checked by whoever loads the pose, not per frame. Indices past the end of
/// the buffer are skipped rather than panicking.
#[derive(Debug, Clone)]
pub struct Pose {
    name: String,
    target_mesh: usize,
    offsets: Vec<VertexOffset>,
}

impl Pose {
    pub fn new(name: impl Into<String>, target_mesh: usize, offsets: Vec<VertexOffset>) -> Self {
        Self {
            name: name.into(),
            target_mesh,
            offsets,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn target_mesh(&self) -> usize {
        self.target_mesh
    }

    #[inline]
    #[must_use]
    pub fn offsets(&self) -> &[VertexOffset] {
        &self.offsets
    }

    /// Adds `offset * weight` to every listed vertex.
    pub fn apply(&self, weight: f32, positions: &mut [Vec3]) {
        for entry in &self.offsets {
            if let Some(position) = positions.get_mut(entry.vertex as usize) {
                *position += entry.offset * weight;
            }
        }
    }
}

/// A pose and its weight inside a [`PoseFrame`].
#[derive(Debug, Clone)]
pub struct PoseWeight {
    pub pose: Arc<Pose>,
    pub weight: f32,
}

/// Weighted pose combination valid at one key time.
#[derive(Debug, Clone)]
pub struct PoseFrame {
    time: f32,
    poses: SmallVec<[PoseWeight; 4]>,
}

impl PoseFrame {
    pub fn new(time: f32, poses: impl IntoIterator<Item = (Arc<Pose>, f32)>) -> Self {
        Self {
            time,
            poses: poses
                .into_iter()
                .map(|(pose, weight)| PoseWeight { pose, weight })
                .collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn poses(&self) -> &[PoseWeight] {
        &self.poses
    }

    /// Applies every pose of the frame, each scaled by `blend`.
    pub fn apply(&self, blend: f32, positions: &mut [Vec3]) {
        for entry in &self.poses {
            entry.pose.apply(entry.weight * blend, positions);
        }
    }
}

/// Time series of pose combinations for one target mesh.
#[derive(Debug, Clone)]
pub struct PoseTrack {
    target_mesh: usize,
    times: Vec<f32>,
    frames: Vec<PoseFrame>,
}

impl PoseTrack {
    /// Fails on an empty frame list, non-ascending frame times, or a pose
    /// that belongs to another mesh.
    pub fn new(target_mesh: usize, frames: Vec<PoseFrame>) -> Result<Self> {
        let times: Vec<f32> = frames.iter().map(PoseFrame::time).collect();
        validate_key_times(|| format!("poses of mesh {target_mesh}"), &times)?;

        for entry in frames.iter().flat_map(|f| f.poses.iter()) {
            if entry.pose.target_mesh != target_mesh {
                return Err(RigError::PoseTargetMismatch {
                    pose: entry.pose.name.clone(),
                    pose_mesh: entry.pose.target_mesh,
                    track_mesh: target_mesh,
                });
            }
        }

        Ok(Self {
            target_mesh,
            times,
            frames,
        })
    }

    #[inline]
    #[must_use]
    pub fn target_mesh(&self) -> usize {
        self.target_mesh
    }

    #[inline]
    #[must_use]
    pub fn frames(&self) -> &[PoseFrame] {
        &self.frames
    }

    /// Time of the last frame.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Blends the frames around `time` additively into `positions`.
    ///
    /// Outside the key range the first (or last) frame is applied at full
    /// weight; a NaN time counts as before the range. Inside, the interval is
    /// the last frame strictly before `time` and the one after it; the start
    /// frame is applied at `blend` and the end frame at `1 - blend`. A query
    /// landing exactly on an interior key therefore resolves to the interval
    /// that ends there.
    pub fn blend_into(&self, time: f32, positions: &mut [Vec3]) {
        let last = self.times.len() - 1;

        if time.is_nan() || time <= self.times[0] {
            self.frames[0].apply(1.0, positions);
            return;
        }
        if time >= self.times[last] {
            self.frames[last].apply(1.0, positions);
            return;
        }

        let start = interval_start(self.times.partition_point(|&t| t < time), self.times.len());
        let end = start + 1;
        let blend = (time - self.times[start]) / (self.times[end] - self.times[start]);

        self.frames[start].apply(blend, positions);
        self.frames[end].apply(1.0 - blend, positions);
    }

    /// Blends into the target mesh's working positions and marks its vertices
    /// dirty. The buffer is expected to hold the bind pose beforehand.
    pub fn set_time(&self, time: f32, meshes: &mut [MeshBuffers]) -> Result<()> {
        let count = meshes.len();
        let mesh = meshes
            .get_mut(self.target_mesh)
            .ok_or(RigError::MeshIndexOutOfRange {
                index: self.target_mesh,
                count,
            })?;

        let mut vertices = mesh.vertices_mut();
        self.blend_into(time, &mut vertices.positions);
        Ok(())
    }
}

/// Named set of pose tracks, one morph clip.
#[derive(Debug, Clone)]
pub struct MeshAnimation {
    name: String,
    tracks: Vec<PoseTrack>,
    length: f32,
}

impl MeshAnimation {
    /// The length is the latest frame time over all tracks (0 without tracks).
    pub fn new(name: impl Into<String>, tracks: Vec<PoseTrack>) -> Self {
        let length = tracks
            .iter()
            .map(PoseTrack::length)
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            tracks,
            length,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[PoseTrack] {
        &self.tracks
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn set_time(&self, time: f32, meshes: &mut [MeshBuffers]) -> Result<()> {
        for track in &self.tracks {
            track.set_time(time, meshes)?;
        }
        Ok(())
    }
}
