//! World-matrix propagation.
//!
//! Kept separate from [`Scene`](crate::scene::Scene) so it only borrows the
//! node map and the root list.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Walks the hierarchy depth-first with an explicit stack and refreshes the
/// world matrix of every node whose local matrix or ancestor changed.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }

        let current_world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, current_world, world_needs_update));
        }
    }
}
