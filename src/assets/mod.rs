//! Asset Management
//!
//! The viewer never decodes files itself. Models and clips come from an
//! [`AssetProvider`], addressed by the symbolic ids [`ModelAsset`] and
//! [`AnimationAsset`]. [`AssetLibrary`] is the in-memory provider used by the
//! demo and the tests.

pub mod library;
pub mod prefab;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::AnimationClip;
use crate::errors::Result;

pub use library::AssetLibrary;
pub use prefab::{Prefab, PrefabNode};

/// Symbolic model identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelAsset {
    /// The multi-variant dog character.
    Dogs,
}

/// Symbolic animation clip identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationAsset {
    DogSitting,
}

impl fmt::Display for ModelAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelAsset::Dogs => f.write_str("dogs"),
        }
    }
}

impl fmt::Display for AnimationAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationAsset::DogSitting => f.write_str("dog_sitting"),
        }
    }
}

/// Source of loaded models and baked animation clips.
///
/// Missing ids are fatal lookup failures: implementations return
/// [`KennelError::ModelNotFound`](crate::errors::KennelError::ModelNotFound) or
/// [`KennelError::AnimationNotFound`](crate::errors::KennelError::AnimationNotFound)
/// and never substitute a default.
pub trait AssetProvider {
    /// Returns the model's prefab. Callers instantiate it to get an
    /// independent, mutable copy.
    fn model(&self, id: ModelAsset) -> Result<Arc<Prefab>>;

    fn animation(&self, id: AnimationAsset) -> Result<Arc<AnimationClip>>;
}
