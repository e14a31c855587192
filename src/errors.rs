//! Error Types
//!
//! This module defines the error types used throughout the viewer.
//!
//! # Overview
//!
//! The main error type [`KennelError`] covers all failure modes including:
//! - Asset lookup failures (unknown model or animation identifiers)
//! - Structural mismatches between a loaded model and the expected layout
//! - Configuration loading and validation errors
//! - Faults reported by the render pipeline or the frame loop
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, KennelError>`.
//!
//! ```rust,ignore
//! use kennel::errors::{KennelError, Result};
//!
//! fn pick(count: usize, index: usize) -> Result<()> {
//!     if index >= count {
//!         return Err(KennelError::VariantIndexOutOfRange { index, count });
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::assets::{AnimationAsset, ModelAsset};

/// The main error type for the viewer.
#[derive(Error, Debug)]
pub enum KennelError {
    // ========================================================================
    // Asset Lookup Errors
    // ========================================================================
    /// The requested model is not registered with the asset provider.
    #[error("Model not found: {0}")]
    ModelNotFound(ModelAsset),

    /// The requested animation clip is not registered with the asset provider.
    #[error("Animation not found: {0}")]
    AnimationNotFound(AnimationAsset),

    // ========================================================================
    // Model Layout Errors
    // ========================================================================
    /// A variant index outside `[0, count)` was requested.
    #[error("Variant index out of range: {index} (variant count: {count})")]
    VariantIndexOutOfRange {
        /// The rejected index
        index: usize,
        /// Number of selectable variants in the model
        count: usize,
    },

    /// The loaded model does not have the expected child layout.
    #[error("Model layout mismatch at '{path}': expected {expected}")]
    LayoutMismatch {
        /// Slash separated path of the node whose shape was wrong
        path: &'static str,
        /// What the layout required at that node
        expected: String,
    },

    /// A prefab's child links do not form a forest.
    #[error("Invalid prefab '{prefab}': {reason}")]
    InvalidPrefab {
        /// Name of the offending prefab
        prefab: String,
        /// Which link broke and how
        reason: String,
    },

    /// A node handle no longer refers to a live node.
    #[error("Node not found in scene")]
    NodeNotFound,

    /// Attaching would make a node its own ancestor.
    #[error("Attaching would create a cycle in the scene graph")]
    HierarchyCycle,

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A configuration value failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // Frame Errors
    // ========================================================================
    /// The render pipeline failed to draw a frame.
    #[error("Render error: {0}")]
    RenderError(String),

    /// A frame was requested from a loop that is stopped or faulted.
    #[error("Frame loop is not running")]
    LoopStopped,

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    /// Window creation error (winit).
    #[cfg(feature = "winit")]
    #[error("Window creation failed: {0}")]
    WindowError(#[from] winit::error::OsError),
}

/// Alias for `Result<T, KennelError>`.
pub type Result<T> = std::result::Result<T, KennelError>;
