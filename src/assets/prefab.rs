use crate::errors::{KennelError, Result};
use crate::scene::transform::Transform;

/// A prefab node: pure data, children referenced by index into
/// [`Prefab::nodes`].
#[derive(Debug, Clone)]
pub struct PrefabNode {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub children_indices: Vec<usize>,
}

impl PrefabNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            visible: true,
            children_indices: Vec::new(),
        }
    }
}

/// A decoded model hierarchy, independent of any [`Scene`](crate::scene::Scene).
///
/// Use [`Scene::instantiate`](crate::scene::Scene::instantiate) to turn it
/// into live nodes. The instantiated root group gets the prefab's `name` and
/// the nodes listed in `root_indices` as its children, in order.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    pub name: String,
    pub nodes: Vec<PrefabNode>,
    pub root_indices: Vec<usize>,
}

impl Prefab {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            root_indices: Vec::new(),
        }
    }

    /// Adds a top-level node and returns its index.
    pub fn add_root(&mut self, node: PrefabNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        self.root_indices.push(index);
        index
    }

    /// Adds `node` as the last child of `parent` and returns its index.
    ///
    /// A `parent` index that does not exist leaves the node unlinked.
    pub fn add_child(&mut self, parent: usize, node: PrefabNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children_indices.push(index);
        }
        index
    }

    /// Convenience for building groups of `count` empty children named
    /// `"{prefix}{i}"`. Returns the child indices in order.
    pub fn add_children(&mut self, parent: usize, prefix: &str, count: usize) -> Vec<usize> {
        (0..count)
            .map(|i| self.add_child(parent, PrefabNode::new(format!("{prefix}{i}"))))
            .collect()
    }

    /// Checks that the child links describe a forest.
    ///
    /// Every index must exist, no node may be reached from two parents (a
    /// root entry counts as a parent), and no chain of parents may loop.
    /// Nodes that no link reaches are allowed and stay detached.
    pub fn validate(&self) -> Result<()> {
        let count = self.nodes.len();
        let mut parent: Vec<Option<usize>> = vec![None; count];
        let mut is_root = vec![false; count];

        for &root in &self.root_indices {
            if root >= count {
                return Err(self.invalid(format!("root index {root} out of range ({count} nodes)")));
            }
            if is_root[root] {
                return Err(self.invalid(format!("node {root} is listed as a root twice")));
            }
            is_root[root] = true;
        }

        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children_indices {
                if child >= count {
                    return Err(self.invalid(format!(
                        "node {index} references child {child}, out of range ({count} nodes)"
                    )));
                }
                if is_root[child] {
                    return Err(self.invalid(format!("root node {child} is also a child of node {index}")));
                }
                if let Some(first) = parent[child] {
                    return Err(self.invalid(format!(
                        "node {child} has two parents: {first} and {index}"
                    )));
                }
                parent[child] = Some(index);
            }
        }

        // With at most one parent each, a node is in a cycle exactly when its
        // parent chain is longer than the node count.
        for start in 0..count {
            let mut current = parent[start];
            let mut steps = 0;
            while let Some(p) = current {
                steps += 1;
                if steps > count {
                    return Err(self.invalid(format!("node {start} is its own ancestor")));
                }
                current = parent[p];
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: String) -> KennelError {
        KennelError::InvalidPrefab {
            prefab: self.name.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_output_is_valid() {
        let mut prefab = Prefab::new("Ok");
        let body = prefab.add_root(PrefabNode::new("Body"));
        prefab.add_children(body, "Part_", 3);
        prefab.add_child(99, PrefabNode::new("Loose"));

        assert!(prefab.validate().is_ok());
    }

    #[test]
    fn detached_cycle_is_rejected() {
        let mut prefab = Prefab::new("Loop");
        prefab.nodes.push(PrefabNode::new("A"));
        prefab.nodes.push(PrefabNode::new("B"));
        prefab.nodes[0].children_indices.push(1);
        prefab.nodes[1].children_indices.push(0);

        let err = prefab.validate().unwrap_err();
        assert!(matches!(err, KennelError::InvalidPrefab { .. }));
        assert!(err.to_string().contains("own ancestor"), "{err}");
    }
}
