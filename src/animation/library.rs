use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::clip::Animation;
use crate::errors::Result;

new_key_type! {
    pub struct AnimationKey;
}

/// Name-indexed registry of the animations a controller can play.
#[derive(Debug, Clone)]
pub struct AnimationLibrary {
    animations: SlotMap<AnimationKey, Animation>,
    by_name: FxHashMap<String, AnimationKey>,
}

impl AnimationLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            animations: SlotMap::with_key(),
            by_name: FxHashMap::default(),
        }
    }

    /// Registers `animation` under its name.
    ///
    /// If an animation with that name already exists, the parts of the new
    /// one are merged into it; a kind that both carry is rejected and the
    /// stored animation stays as it was.
    pub fn insert(&mut self, animation: Animation) -> Result<AnimationKey> {
        if let Some(&key) = self.by_name.get(animation.name())
            && let Some(existing) = self.animations.get_mut(key)
        {
            existing.merge(animation)?;
            return Ok(key);
        }

        let name = animation.name().to_string();
        let key = self.animations.insert(animation);
        self.by_name.insert(name, key);
        Ok(key)
    }

    #[must_use]
    pub fn get(&self, key: AnimationKey) -> Option<&Animation> {
        self.animations.get(key)
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Animation> {
        self.key(name).and_then(|k| self.animations.get(k))
    }

    #[must_use]
    pub fn key(&self, name: &str) -> Option<AnimationKey> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnimationKey, &Animation)> {
        self.animations.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

impl Default for AnimationLibrary {
    fn default() -> Self {
        Self::new()
    }
}
