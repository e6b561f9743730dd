/// What happens when playback runs past either end of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepeatMode {
    /// Stop at the boundary.
    Clamp,
    /// Stop at the boundary and play back the other way (ping-pong).
    Cycle,
    /// Modular wrap: overshoot carries into the next loop.
    #[default]
    Wrap,
}

impl RepeatMode {
    /// Brings `time` back into `[0, length]`.
    ///
    /// The flag is set when `Cycle` hit a boundary and the playback direction
    /// must flip. Times already in range are returned untouched, so the last
    /// key is still reachable in `Wrap` mode. A non-positive length, or a
    /// time that is not finite, pins to 0.
    #[must_use]
    pub fn wrap_time(self, time: f32, length: f32) -> (f32, bool) {
        if length <= 0.0 || !time.is_finite() {
            return (0.0, false);
        }
        if (0.0..=length).contains(&time) {
            return (time, false);
        }

        match self {
            Self::Clamp => (time.clamp(0.0, length), false),
            Self::Cycle => (time.clamp(0.0, length), true),
            Self::Wrap => (time.rem_euclid(length), false),
        }
    }
}

/// Playback configuration of a [`MeshAnimationController`](super::MeshAnimationController).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerSettings {
    pub repeat_mode: RepeatMode,
    /// Multiplier on `dt`. Negative values play backwards.
    pub speed: f32,
    /// Evaluate only every Nth update; 0 and 1 both mean every update.
    pub frame_skip: u32,
    /// Inactive controllers ignore `update`.
    pub active: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            repeat_mode: RepeatMode::Wrap,
            speed: 1.0,
            frame_skip: 1,
            active: true,
        }
    }
}
