//! # Kennel
//!
//! An orbit-camera character viewer. A [`Stage`] builds the scene once:
//! camera, lights, background, orbit controls, one visible variant of a
//! multi-variant model, and a looping baked clip. A [`FrameLoop`] then
//! advances controls and animation each frame and hands the scene to a
//! [`RenderPipeline`].
//!
//! ```rust,ignore
//! use kennel::{AssetLibrary, FrameLoop, HeadlessPipeline, PacedScheduler, Stage, StageConfig};
//!
//! let assets = AssetLibrary::new();
//! // ... register ModelAsset::Dogs and AnimationAsset::DogSitting
//! let stage = Stage::new(&assets, &StageConfig::default())?;
//! let mut frame_loop = FrameLoop::new(stage, HeadlessPipeline::new(1280, 720));
//! frame_loop.run(&mut PacedScheduler::new(60))?;
//! ```

pub mod animation;
pub mod app;
pub mod assets;
pub mod controls;
pub mod errors;
pub mod render;
pub mod scene;
pub mod stage;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, LoopMode};
#[cfg(not(target_arch = "wasm32"))]
pub use app::PacedScheduler;
pub use app::{FrameLoop, FrameScheduler, LoopState, StopHandle, Timer};
pub use assets::{AnimationAsset, AssetLibrary, AssetProvider, ModelAsset, Prefab, PrefabNode};
pub use controls::{Input, OrbitControls, PointerButton};
pub use errors::{KennelError, Result};
pub use render::{HeadlessPipeline, RenderPipeline};
pub use scene::{Camera, Light, LightKind, Node, NodeHandle, Scene, Transform};
pub use stage::{Stage, StageConfig, VariantLayout};
