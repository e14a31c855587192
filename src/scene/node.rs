use std::borrow::Cow;

use glam::Affine3A;
use smallvec::SmallVec;

use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// A scene node: hierarchy links, transform and visibility.
///
/// Nodes form a tree through `parent` / `children`. Component data such as
/// lights lives in the [`Scene`](crate::scene::Scene) component maps, keyed by
/// node handle.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Cow<'static, str>,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: SmallVec<[NodeHandle; 4]>,

    pub transform: Transform,

    /// Visibility flag. A hidden node hides its whole subtree.
    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed(""),
            parent: None,
            children: SmallVec::new(),
            transform: Transform::new(),
            visible: true,
        }
    }

    #[must_use]
    pub fn with_name(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
