use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::animation::AnimationClip;
use crate::assets::{AnimationAsset, AssetProvider, ModelAsset, Prefab};
use crate::errors::{KennelError, Result};

#[derive(Default)]
struct LibraryInner {
    models: FxHashMap<ModelAsset, Arc<Prefab>>,
    animations: FxHashMap<AnimationAsset, Arc<AnimationClip>>,
}

/// Thread-safe in-memory asset registry.
///
/// Registration takes `&self`, so a library can be shared behind an `Arc`
/// while a loader fills it in.
#[derive(Default)]
pub struct AssetLibrary {
    inner: RwLock<LibraryInner>,
}

impl AssetLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model, replacing any previous entry for `id`.
    pub fn insert_model(&self, id: ModelAsset, prefab: impl Into<Arc<Prefab>>) {
        let prefab = prefab.into();
        log::debug!("Registered model '{id}' ({} nodes)", prefab.nodes.len());
        self.inner.write().models.insert(id, prefab);
    }

    /// Registers an animation clip, replacing any previous entry for `id`.
    pub fn insert_animation(&self, id: AnimationAsset, clip: impl Into<Arc<AnimationClip>>) {
        let clip = clip.into();
        log::debug!("Registered animation '{id}' ({:.3}s)", clip.duration);
        self.inner.write().animations.insert(id, clip);
    }

    #[must_use]
    pub fn contains_model(&self, id: ModelAsset) -> bool {
        self.inner.read().models.contains_key(&id)
    }

    #[must_use]
    pub fn contains_animation(&self, id: AnimationAsset) -> bool {
        self.inner.read().animations.contains_key(&id)
    }
}

impl AssetProvider for AssetLibrary {
    fn model(&self, id: ModelAsset) -> Result<Arc<Prefab>> {
        self.inner
            .read()
            .models
            .get(&id)
            .cloned()
            .ok_or(KennelError::ModelNotFound(id))
    }

    fn animation(&self, id: AnimationAsset) -> Result<Arc<AnimationClip>> {
        self.inner
            .read()
            .animations
            .get(&id)
            .cloned()
            .ok_or(KennelError::AnimationNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ids_are_lookup_failures() {
        let library = AssetLibrary::new();
        assert!(matches!(
            library.model(ModelAsset::Dogs),
            Err(KennelError::ModelNotFound(ModelAsset::Dogs))
        ));
        assert!(matches!(
            library.animation(AnimationAsset::DogSitting),
            Err(KennelError::AnimationNotFound(AnimationAsset::DogSitting))
        ));
    }

    #[test]
    fn registered_model_is_shared() {
        let library = AssetLibrary::new();
        library.insert_model(ModelAsset::Dogs, Prefab::new("Dogs"));

        let a = library.model(ModelAsset::Dogs).unwrap();
        let b = library.model(ModelAsset::Dogs).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(library.contains_model(ModelAsset::Dogs));
    }
}
