//! Scene bootstrapping: configuration, model layout and the [`Stage`] itself.

pub mod bootstrap;
pub mod config;
pub mod layout;

pub use bootstrap::Stage;
pub use config::{CameraConfig, ControlsConfig, LightingConfig, ModelConfig, StageConfig, parse_hex_color};
pub use layout::{VariantLayout, configure_visibility, hide_extras, select_variant};
