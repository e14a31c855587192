use std::borrow::Cow;

use glam::Vec4;
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::assets::prefab::Prefab;
use crate::errors::{KennelError, Result};
use crate::scene::light::Light;
use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::{LightKey, NodeHandle};

/// Scene graph container.
///
/// Nodes live in a slot map; `root_nodes` lists the nodes without a parent
/// that belong to the scene. Nodes created with
/// [`create_node_with_name`](Self::create_node_with_name) stay detached until
/// they are attached somewhere.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub lights: SlotMap<LightKey, Light>,
    light_components: SparseSecondaryMap<NodeHandle, LightKey>,

    /// Clear colour (linear RGBA). `None` leaves the surface untouched.
    pub background: Option<Vec4>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            lights: SlotMap::with_key(),
            light_components: SparseSecondaryMap::new(),
            background: Some(Vec4::new(0.0, 0.0, 0.0, 1.0)),
        }
    }

    // ========================================================================
    // Node management
    // ========================================================================

    /// Inserts a detached node.
    pub fn create_node_with_name(&mut self, name: impl Into<Cow<'static, str>>) -> NodeHandle {
        self.nodes.insert(Node::with_name(name))
    }

    /// Inserts a node as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Makes `child` the last child of `parent`, detaching it from wherever
    /// it was before.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(KennelError::NodeNotFound);
        }
        // Refuse to create a cycle.
        let mut ancestor = Some(parent);
        while let Some(a) = ancestor {
            if a == child {
                return Err(KennelError::HierarchyCycle);
            }
            ancestor = self.nodes.get(a).and_then(|n| n.parent);
        }
        self.detach(child)?;

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
        Ok(())
    }

    /// Unlinks `handle` from its parent (or from the root list).
    pub fn detach(&mut self, handle: NodeHandle) -> Result<()> {
        let parent = self
            .nodes
            .get(handle)
            .ok_or(KennelError::NodeNotFound)?
            .parent;

        if let Some(parent) = parent {
            if let Some(p) = self.nodes.get_mut(parent) {
                p.children.retain(|c| *c != handle);
            }
            if let Some(node) = self.nodes.get_mut(handle) {
                node.parent = None;
            }
        } else {
            self.root_nodes.retain(|r| *r != handle);
        }
        Ok(())
    }

    /// Removes a node and its whole subtree, including attached lights.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if self.detach(handle).is_err() {
            return;
        }

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children.iter().copied());
            }
            if let Some(light) = self.light_components.remove(current) {
                self.lights.remove(light);
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_ref())
    }

    /// Children of `handle`, or an empty slice for a stale handle.
    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        match self.nodes.get(handle) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    #[must_use]
    pub fn child(&self, handle: NodeHandle, index: usize) -> Option<NodeHandle> {
        self.children(handle).get(index).copied()
    }

    /// Depth-first search for a node named `name` in the subtree of `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.name == name {
                return Some(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    pub fn set_visible(&mut self, handle: NodeHandle, visible: bool) -> Result<()> {
        let node = self.nodes.get_mut(handle).ok_or(KennelError::NodeNotFound)?;
        node.visible = visible;
        Ok(())
    }

    /// The node's own flag; `false` for a stale handle.
    #[must_use]
    pub fn is_visible(&self, handle: NodeHandle) -> bool {
        self.nodes.get(handle).is_some_and(|n| n.visible)
    }

    /// `true` when the node and every ancestor are visible.
    #[must_use]
    pub fn is_effectively_visible(&self, handle: NodeHandle) -> bool {
        let mut current = Some(handle);
        while let Some(h) = current {
            match self.nodes.get(h) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// All nodes reachable from the roots through visible nodes only, in
    /// depth-first order.
    #[must_use]
    pub fn visible_nodes(&self) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeHandle> = self.root_nodes.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    // ========================================================================
    // Lights
    // ========================================================================

    /// Adds a light on its own root node and returns that node.
    pub fn add_light(&mut self, light: Light) -> NodeHandle {
        let handle = self.add_node(Node::with_name("Light"));
        let key = self.lights.insert(light);
        self.light_components.insert(handle, key);
        handle
    }

    #[must_use]
    pub fn get_light(&self, handle: NodeHandle) -> Option<&Light> {
        self.light_components
            .get(handle)
            .and_then(|key| self.lights.get(*key))
    }

    /// Lights attached to nodes that are currently effectively visible.
    pub fn iter_active_lights(&self) -> impl Iterator<Item = &Light> {
        self.light_components
            .iter()
            .filter(|(node, _)| self.is_effectively_visible(*node))
            .filter_map(|(_, key)| self.lights.get(*key))
    }

    // ========================================================================
    // Instantiation & update
    // ========================================================================

    /// Creates an independent copy of `prefab` under a new root group.
    ///
    /// Every call produces fresh nodes, so mutating one instance never
    /// affects another. The prefab is validated first; a malformed one
    /// fails with [`KennelError::InvalidPrefab`] and leaves the scene as it
    /// was.
    pub fn instantiate(&mut self, prefab: &Prefab) -> Result<NodeHandle> {
        prefab.validate()?;

        let root = self.add_node(Node::with_name(prefab.name.clone()));

        let handles: Vec<NodeHandle> = prefab
            .nodes
            .iter()
            .map(|p| {
                let mut node = Node::with_name(p.name.clone());
                node.transform = p.transform.clone();
                node.transform.mark_dirty();
                node.visible = p.visible;
                self.nodes.insert(node)
            })
            .collect();

        for (prefab_node, &parent) in prefab.nodes.iter().zip(&handles) {
            for &child_index in &prefab_node.children_indices {
                self.link(parent, handles[child_index]);
            }
        }
        for &root_index in &prefab.root_indices {
            self.link(root, handles[root_index]);
        }

        log::debug!("Instantiated prefab '{}' ({} nodes)", prefab.name, handles.len());
        Ok(root)
    }

    fn link(&mut self, parent: NodeHandle, child: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Propagates local transforms into world matrices.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }
}
