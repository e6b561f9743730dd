use crate::animation::clip::{Animation, AnimationTargets};
use crate::animation::library::{AnimationKey, AnimationLibrary};
use crate::animation::settings::{ControllerSettings, RepeatMode};
use crate::errors::{Result, RigError};
use crate::mesh::MeshBuffers;
use crate::skeleton::Skeleton;
use crate::skinning::SkinningCapability;

/// Reserved animation name that returns the rig to its bind pose.
pub const BIND_POSE: &str = "<bind>";

/// Drives one animated model: a set of mesh buffers, an optional skeleton and
/// the animations registered for them.
///
/// The controller is either in the bind pose (no animation selected) or
/// playing one animation. Time only moves inside [`update`](Self::update),
/// which is meant to be called once per rendered frame.
#[derive(Debug)]
pub struct MeshAnimationController {
    animations: AnimationLibrary,
    current: Option<AnimationKey>,

    skeleton: Option<Skeleton>,
    meshes: Vec<MeshBuffers>,
    skinning: SkinningCapability,

    settings: ControllerSettings,
    time: f32,
    frame_counter: u32,
    /// Working buffers are reset to the bind pose before each evaluation.
    restore_every_frame: bool,
}

impl MeshAnimationController {
    pub fn new(
        meshes: Vec<MeshBuffers>,
        skeleton: Option<Skeleton>,
        skinning: SkinningCapability,
    ) -> Self {
        Self {
            animations: AnimationLibrary::new(),
            current: None,
            skeleton,
            meshes,
            skinning,
            settings: ControllerSettings::default(),
            time: 0.0,
            frame_counter: 0,
            restore_every_frame: false,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ControllerSettings) -> Self {
        self.settings = settings;
        self
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Registers an animation, or merges it into the one already stored under
    /// the same name.
    ///
    /// Every track must address a bone of the controller's skeleton and one
    /// of its meshes.
    pub fn add_animation(&mut self, animation: Animation) -> Result<AnimationKey> {
        animation.validate_targets(
            self.skeleton.as_ref().map(Skeleton::bone_count),
            self.meshes.len(),
        )?;

        let name = animation.name().to_string();
        let key = self.animations.insert(animation)?;
        log::debug!("Registered animation '{name}'");

        if self.current == Some(key) {
            self.restore_every_frame = self.needs_restore(key);
        }
        Ok(key)
    }

    #[inline]
    #[must_use]
    pub fn animations(&self) -> &AnimationLibrary {
        &self.animations
    }

    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.names()
    }

    // ========================================================================
    // State transitions
    // ========================================================================

    /// Selects the animation to play, starting at time 0.
    ///
    /// [`BIND_POSE`] always succeeds and returns to the bind pose. Any other
    /// unknown name fails and leaves the controller exactly as it was.
    pub fn set_animation(&mut self, name: &str) -> Result<()> {
        if name == BIND_POSE {
            self.reset_to_bind_pose();
            return Ok(());
        }

        let Some(key) = self.animations.key(name) else {
            log::warn!("Animation '{name}' not found; keeping current state");
            return Err(RigError::AnimationNotFound(name.to_string()));
        };

        for mesh in &mut self.meshes {
            mesh.restore_bind_pose();
        }
        if let Some(skeleton) = &mut self.skeleton {
            skeleton.reset();
        }

        self.current = Some(key);
        self.time = 0.0;
        self.frame_counter = 0;
        self.restore_every_frame = self.needs_restore(key);

        log::debug!(
            "Switched to animation '{name}' (restore every frame: {})",
            self.restore_every_frame
        );
        Ok(())
    }

    /// Drops the current animation and puts meshes and skeleton back into
    /// the bind pose. With hardware skinning, identity matrices are uploaded.
    pub fn reset_to_bind_pose(&mut self) {
        self.current = None;
        self.time = 0.0;
        self.frame_counter = 0;
        self.restore_every_frame = false;

        for mesh in &mut self.meshes {
            mesh.restore_bind_pose();
        }

        if let Some(skeleton) = &mut self.skeleton {
            skeleton.reset();
            let matrices = skeleton.compute_skinning_matrices();
            if let SkinningCapability::Hardware(sink) = &mut self.skinning {
                sink.set_bone_matrices(matrices);
            }
        }

        log::debug!("Returned to bind pose");
    }

    fn needs_restore(&self, key: AnimationKey) -> bool {
        self.animations.get(key).is_some_and(|animation| {
            animation.has_mesh_animation()
                || (!self.skinning.is_hardware() && animation.has_bone_animation())
        })
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    /// Advances playback by `dt` seconds, evaluating the current animation
    /// unless this call is skipped by the frame-skip setting.
    ///
    /// Does nothing while inactive, in the bind pose, or when `dt` is not
    /// finite. Time advances even if evaluation fails; the error is returned
    /// so the caller can report it.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        if !self.settings.active {
            return Ok(());
        }
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite frame delta {dt}");
            return Ok(());
        }
        let Some(key) = self.current else {
            return Ok(());
        };
        let Some(animation) = self.animations.get(key) else {
            return Ok(());
        };

        let (time, reverse) = self
            .settings
            .repeat_mode
            .wrap_time(self.time, animation.length());
        self.time = time;
        if reverse {
            self.settings.speed = -self.settings.speed;
        }

        let skip = self.settings.frame_skip.max(1);
        let evaluate = self.frame_counter % skip == 0;
        self.frame_counter = self.frame_counter.wrapping_add(1);

        let result = if evaluate {
            log::trace!("Evaluating '{}' at t={:.4}", animation.name(), self.time);
            self.evaluate(key)
        } else {
            log::trace!("Frame skipped at t={:.4}", self.time);
            Ok(())
        };

        self.time += dt * self.settings.speed;

        if let Err(err) = &result {
            log::error!("Animation evaluation failed: {err}");
        }
        result
    }

    fn evaluate(&mut self, key: AnimationKey) -> Result<()> {
        let Some(animation) = self.animations.get(key) else {
            return Ok(());
        };

        if self.restore_every_frame {
            for mesh in &mut self.meshes {
                mesh.restore_bind_pose();
            }
        }

        let has_bones = animation.has_bone_animation();
        if has_bones && let Some(skeleton) = &mut self.skeleton {
            skeleton.reset();
        }

        animation.set_time(
            self.time,
            &mut AnimationTargets {
                skeleton: self.skeleton.as_mut(),
                meshes: &mut self.meshes,
            },
        )?;

        if has_bones && let Some(skeleton) = &mut self.skeleton {
            Self::dispatch_skinning(&mut self.skinning, skeleton, &mut self.meshes);
        }
        Ok(())
    }

    /// Hands the skinning matrices to the GPU sink, or runs the CPU pass on
    /// every skinned mesh.
    fn dispatch_skinning(
        skinning: &mut SkinningCapability,
        skeleton: &mut Skeleton,
        meshes: &mut [MeshBuffers],
    ) {
        let matrices = skeleton.compute_skinning_matrices();

        match skinning {
            SkinningCapability::Hardware(sink) => {
                sink.set_bone_matrices(matrices);
                for (index, mesh) in meshes.iter().enumerate() {
                    if let Some(influences) = mesh.influences() {
                        sink.set_vertex_influences(
                            index,
                            influences.bone_indices(),
                            influences.bone_weights(),
                            influences.weights_per_vertex(),
                        );
                    }
                }
            }
            SkinningCapability::Software => {
                for mesh in meshes.iter_mut() {
                    mesh.apply_skinning(matrices);
                }
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Name of the playing animation, or `None` in the bind pose.
    #[must_use]
    pub fn current_animation_name(&self) -> Option<&str> {
        self.current
            .and_then(|key| self.animations.get(key))
            .map(Animation::name)
    }

    #[inline]
    #[must_use]
    pub fn is_bind_pose(&self) -> bool {
        self.current.is_none()
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Jumps to `time`; the repeat mode is applied on the next update.
    /// Non-finite times are ignored.
    pub fn set_time(&mut self, time: f32) {
        if time.is_finite() {
            self.time = time;
        } else {
            log::warn!("Ignoring non-finite playback time {time}");
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.settings.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.settings.speed = speed;
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.settings.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.settings.active = active;
    }

    #[inline]
    #[must_use]
    pub fn frame_skip(&self) -> u32 {
        self.settings.frame_skip
    }

    pub fn set_frame_skip(&mut self, frame_skip: u32) {
        self.settings.frame_skip = frame_skip;
    }

    #[inline]
    #[must_use]
    pub fn repeat_mode(&self) -> RepeatMode {
        self.settings.repeat_mode
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.settings.repeat_mode = mode;
    }

    #[inline]
    #[must_use]
    pub fn restores_every_frame(&self) -> bool {
        self.restore_every_frame
    }

    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[MeshBuffers] {
        &self.meshes
    }

    #[must_use]
    pub fn mesh(&self, index: usize) -> Option<&MeshBuffers> {
        self.meshes.get(index)
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn skinning(&self) -> &SkinningCapability {
        &self.skinning
    }
}
