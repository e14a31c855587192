//! Structural descriptor of a multi-variant character model.
//!
//! The model is expected to look like this:
//!
//! ```text
//! model root
//! ├── mesh group
//! │   ├── variants group        (children 0..M: mutually exclusive meshes)
//! │   ├── attachment group 1
//! │   └── ... attachment group N-1
//! └── skeleton root             (optional)
//! ```
//!
//! [`VariantLayout::resolve`] checks this shape once and fails with a
//! [`KennelError::LayoutMismatch`] naming the broken level, so later
//! visibility changes never index blindly into the hierarchy.

use smallvec::SmallVec;

use crate::errors::{KennelError, Result};
use crate::scene::{NodeHandle, Scene};

const ROOT_PATH: &str = "model root";
const MESH_GROUP_PATH: &str = "model root/mesh group";
const VARIANTS_PATH: &str = "model root/mesh group/variants";

#[derive(Debug, Clone)]
pub struct VariantLayout {
    pub model_root: NodeHandle,
    pub mesh_group: NodeHandle,
    pub variants_group: NodeHandle,
    pub skeleton_root: Option<NodeHandle>,
    variants: Vec<NodeHandle>,
    attachments: SmallVec<[NodeHandle; 16]>,
}

impl VariantLayout {
    pub fn resolve(scene: &Scene, model_root: NodeHandle) -> Result<Self> {
        if scene.get_node(model_root).is_none() {
            return Err(KennelError::NodeNotFound);
        }

        let root_children = scene.children(model_root);
        let Some(&mesh_group) = root_children.first() else {
            return Err(KennelError::LayoutMismatch {
                path: ROOT_PATH,
                expected: "a mesh group as first child, found no children".to_string(),
            });
        };
        let skeleton_root = root_children.get(1).copied();

        let mesh_children = scene.children(mesh_group);
        let Some((&variants_group, attachments)) = mesh_children.split_first() else {
            return Err(KennelError::LayoutMismatch {
                path: MESH_GROUP_PATH,
                expected: "a variants group as first child, found no children".to_string(),
            });
        };

        let variants = scene.children(variants_group).to_vec();
        if variants.is_empty() {
            return Err(KennelError::LayoutMismatch {
                path: VARIANTS_PATH,
                expected: "at least one selectable variant, found none".to_string(),
            });
        }
        if let Some(shared) = variants.iter().position(|v| attachments.contains(v)) {
            return Err(KennelError::LayoutMismatch {
                path: VARIANTS_PATH,
                expected: format!("variants disjoint from attachment groups, variant {shared} is both"),
            });
        }

        log::debug!(
            "Resolved model layout: {} variants, {} attachment groups, skeleton: {}",
            variants.len(),
            attachments.len(),
            skeleton_root.is_some()
        );

        Ok(Self {
            model_root,
            mesh_group,
            variants_group,
            skeleton_root,
            variants,
            attachments: attachments.iter().copied().collect(),
        })
    }

    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    #[must_use]
    pub fn variants(&self) -> &[NodeHandle] {
        &self.variants
    }

    /// Children 1..N of the mesh group.
    #[must_use]
    pub fn attachments(&self) -> &[NodeHandle] {
        &self.attachments
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.variants.len() {
            return Err(KennelError::VariantIndexOutOfRange {
                index,
                count: self.variants.len(),
            });
        }
        Ok(())
    }

    /// Shows variant `index` and hides every other variant.
    ///
    /// An out-of-range index fails before any flag is touched.
    pub fn select_variant(&self, scene: &mut Scene, index: usize) -> Result<()> {
        self.check_index(index)?;

        for (i, &variant) in self.variants.iter().enumerate() {
            scene.set_visible(variant, i == index)?;
        }
        log::debug!("Selected variant {index} of {}", self.variants.len());
        Ok(())
    }

    /// Hides every attachment group. The variants group keeps its flag.
    pub fn hide_extras(&self, scene: &mut Scene) -> Result<()> {
        for &attachment in &self.attachments {
            scene.set_visible(attachment, false)?;
        }
        Ok(())
    }

    /// Applies the full visibility postcondition in one step: exactly
    /// variant `index` visible inside the variants group and every
    /// attachment group hidden.
    pub fn configure_visibility(&self, scene: &mut Scene, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.hide_extras(scene)?;
        self.select_variant(scene, index)
    }

    /// Index of the visible variant when exactly one is visible.
    #[must_use]
    pub fn visible_variant(&self, scene: &Scene) -> Option<usize> {
        let mut visible = self
            .variants
            .iter()
            .enumerate()
            .filter(|(_, v)| scene.is_visible(**v))
            .map(|(i, _)| i);

        match (visible.next(), visible.next()) {
            (Some(i), None) => Some(i),
            _ => None,
        }
    }
}

/// Resolves the layout of `model_root` and selects variant `index`.
pub fn select_variant(scene: &mut Scene, model_root: NodeHandle, index: usize) -> Result<()> {
    VariantLayout::resolve(scene, model_root)?.select_variant(scene, index)
}

/// Resolves the layout of `model_root` and hides its attachment groups.
pub fn hide_extras(scene: &mut Scene, model_root: NodeHandle) -> Result<()> {
    VariantLayout::resolve(scene, model_root)?.hide_extras(scene)
}

/// Resolves the layout of `model_root` and applies
/// [`VariantLayout::configure_visibility`].
pub fn configure_visibility(scene: &mut Scene, model_root: NodeHandle, index: usize) -> Result<()> {
    VariantLayout::resolve(scene, model_root)?.configure_visibility(scene, index)
}
