use glam::{Quat, Vec3};

use crate::animation::keys::{interval_start, validate_key_times};
use crate::animation::values::Interpolatable;
use crate::errors::{Result, RigError};
use crate::skeleton::Skeleton;

/// Keyframed translation/rotation of a single bone.
///
/// Immutable once built: at least one key, strictly ascending times, and one
/// translation and one rotation per key. Samples are relative to the bone's
/// bind pose.
#[derive(Debug, Clone)]
pub struct BoneTrack {
    bone_index: usize,
    times: Vec<f32>,
    translations: Vec<Vec3>,
    rotations: Vec<Quat>,
}

impl BoneTrack {
    pub fn new(
        bone_index: usize,
        times: Vec<f32>,
        translations: Vec<Vec3>,
        rotations: Vec<Quat>,
    ) -> Result<Self> {
        if times.len() != translations.len() || times.len() != rotations.len() {
            return Err(RigError::TrackLengthMismatch {
                times: times.len(),
                translations: translations.len(),
                rotations: rotations.len(),
            });
        }
        validate_key_times(|| format!("bone {bone_index}"), &times)?;

        Ok(Self {
            bone_index,
            times,
            translations,
            rotations,
        })
    }

    /// Track that only rotates the bone; translations stay at zero.
    pub fn from_rotations(bone_index: usize, times: Vec<f32>, rotations: Vec<Quat>) -> Result<Self> {
        let translations = vec![Vec3::ZERO; rotations.len()];
        Self::new(bone_index, times, translations, rotations)
    }

    #[inline]
    #[must_use]
    pub fn bone_index(&self) -> usize {
        self.bone_index
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn translations(&self) -> &[Vec3] {
        &self.translations
    }

    #[inline]
    #[must_use]
    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    /// Time of the last key.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Evaluates the track at `time`.
    ///
    /// Queries before the first key or after the last one return that key
    /// unmodified, and a NaN time reads as the first key. In between, the two
    /// surrounding keys are blended: linear for translation, shortest-arc
    /// slerp for rotation.
    #[must_use]
    pub fn sample(&self, time: f32) -> (Vec3, Quat) {
        let last = self.times.len() - 1;

        if time.is_nan() || time <= self.times[0] {
            return (self.translations[0], self.rotations[0]);
        }
        if time >= self.times[last] {
            return (self.translations[last], self.rotations[last]);
        }

        // partition_point finds the first key strictly after `time`
        let start = interval_start(self.times.partition_point(|&t| t <= time), self.times.len());
        let end = start + 1;
        let blend = (time - self.times[start]) / (self.times[end] - self.times[start]);

        (
            Vec3::interpolate_linear(self.translations[start], self.translations[end], blend),
            Quat::interpolate_linear(self.rotations[start], self.rotations[end], blend),
        )
    }

    /// Samples the track and writes the result into the target bone.
    pub fn set_time(&self, time: f32, skeleton: &mut Skeleton) -> Result<()> {
        let (translation, rotation) = self.sample(time);
        skeleton.set_anim_transforms(self.bone_index, translation, rotation)
    }
}

/// Named set of bone tracks, one skeletal clip.
#[derive(Debug, Clone)]
pub struct BoneAnimation {
    name: String,
    tracks: Vec<BoneTrack>,
    length: f32,
}

impl BoneAnimation {
    /// The length is the latest key time over all tracks (0 without tracks).
    pub fn new(name: impl Into<String>, tracks: Vec<BoneTrack>) -> Self {
        let length = tracks
            .iter()
            .map(BoneTrack::length)
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
    pub fn tracks(&self) -> &[BoneTrack] {
        &self.tracks
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn set_time(&self, time: f32, skeleton: &mut Skeleton) -> Result<()> {
        for track in &self.tracks {
            track.set_time(time, skeleton)?;
        }
        Ok(())
    }
}
