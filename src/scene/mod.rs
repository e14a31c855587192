//! Scene graph
//!
//! - [`Node`]: hierarchy links, transform and visibility
//! - [`Transform`]: position / rotation / scale with cached matrices
//! - [`Scene`]: node storage, lights, background and prefab instantiation
//! - [`Camera`]: perspective projection
//! - [`Light`]: ambient and directional lights

pub mod camera;
pub mod light;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use light::{Light, LightKind};
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct LightKey;
}
