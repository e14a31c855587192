//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/remove nodes, attach/detach hierarchy
//! - Visibility: own flag, effective visibility, visible node traversal
//! - Prefab instantiation, malformed prefab rejection and world matrix propagation

mod common;

use glam::Vec3;
use kennel::errors::KennelError;
use kennel::scene::{Light, Node, Scene};
use kennel::{Prefab, PrefabNode};

// ============================================================================
// Node Creation & Hierarchy
// ============================================================================

#[test]
fn scene_add_node_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::new());
    assert!(scene.root_nodes.contains(&handle));
}

#[test]
fn scene_create_node_with_name_is_detached() {
    let mut scene = Scene::new();
    let handle = scene.create_node_with_name("Loose");
    assert_eq!(scene.get_name(handle), Some("Loose"));
    assert!(!scene.root_nodes.contains(&handle));
}

#[test]
fn scene_attach_moves_node_out_of_roots() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new());
    let child = scene.add_node(Node::new());

    scene.attach(child, parent).unwrap();

    assert!(!scene.root_nodes.contains(&child));
    assert_eq!(scene.children(parent), &[child]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
}

#[test]
fn scene_attach_reparents() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new());
    let b = scene.add_node(Node::new());
    let child = scene.create_node_with_name("child");

    scene.attach(child, a).unwrap();
    scene.attach(child, b).unwrap();

    assert!(scene.children(a).is_empty());
    assert_eq!(scene.child(b, 0), Some(child));
}

#[test]
fn scene_attach_rejects_cycles() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new());
    let child = scene.create_node_with_name("child");
    scene.attach(child, parent).unwrap();

    assert!(matches!(scene.attach(parent, child), Err(KennelError::HierarchyCycle)));
    assert!(matches!(scene.attach(parent, parent), Err(KennelError::HierarchyCycle)));
}

#[test]
fn scene_remove_node_removes_subtree() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new());
    let child = scene.create_node_with_name("child");
    let grandchild = scene.create_node_with_name("grandchild");
    scene.attach(child, parent).unwrap();
    scene.attach(grandchild, child).unwrap();

    scene.remove_node(parent);

    assert!(scene.get_node(parent).is_none());
    assert!(scene.get_node(child).is_none());
    assert!(scene.get_node(grandchild).is_none());
    assert!(scene.root_nodes.is_empty());
}

#[test]
fn scene_remove_light_node_drops_light() {
    let mut scene = Scene::new();
    let light = scene.add_light(Light::new_ambient(Vec3::ONE, 1.0));
    assert_eq!(scene.lights.len(), 1);

    scene.remove_node(light);

    assert!(scene.lights.is_empty());
    assert!(scene.get_light(light).is_none());
}

#[test]
fn scene_find_node_by_name() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::with_name("root"));
    let a = scene.create_node_with_name("a");
    let b = scene.create_node_with_name("b");
    scene.attach(a, root).unwrap();
    scene.attach(b, a).unwrap();

    assert_eq!(scene.find_node_by_name(root, "b"), Some(b));
    assert_eq!(scene.find_node_by_name(a, "root"), None);
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn hidden_parent_hides_subtree() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new());
    let child = scene.create_node_with_name("child");
    scene.attach(child, parent).unwrap();

    scene.set_visible(parent, false).unwrap();

    assert!(scene.is_visible(child));
    assert!(!scene.is_effectively_visible(child));
    assert!(scene.visible_nodes().is_empty());
}

#[test]
fn hidden_light_is_inactive() {
    let mut scene = Scene::new();
    let light = scene.add_light(Light::new_directional(Vec3::ONE, 2.0, Vec3::Y));
    assert_eq!(scene.iter_active_lights().count(), 1);

    scene.set_visible(light, false).unwrap();
    assert_eq!(scene.iter_active_lights().count(), 0);
}

#[test]
fn set_visible_on_removed_node_fails() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new());
    scene.remove_node(node);

    assert!(matches!(scene.set_visible(node, true), Err(KennelError::NodeNotFound)));
}

// ============================================================================
// Prefab & Transforms
// ============================================================================

#[test]
fn instantiate_creates_independent_copies() {
    let mut prefab = Prefab::new("Thing");
    let body = prefab.add_root(PrefabNode::new("Body"));
    prefab.add_children(body, "Part_", 3);

    let mut scene = Scene::new();
    let first = scene.instantiate(&prefab).unwrap();
    let second = scene.instantiate(&prefab).unwrap();

    let first_body = scene.child(first, 0).unwrap();
    let second_body = scene.child(second, 0).unwrap();
    assert_ne!(first_body, second_body);
    assert_eq!(scene.children(first_body).len(), 3);

    scene.set_visible(scene.child(first_body, 1).unwrap(), false).unwrap();
    assert!(scene.is_visible(scene.child(second_body, 1).unwrap()));
    assert_eq!(scene.get_name(first), Some("Thing"));
}

#[test]
fn world_matrices_follow_parent_scale() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new());
    let child = scene.create_node_with_name("child");
    scene.attach(child, root).unwrap();

    scene.get_node_mut(root).unwrap().transform.scale_uniform(0.01);
    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(100.0, 0.0, 0.0);
    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().world_matrix().transform_point3(Vec3::ZERO);
    assert!(world.distance(Vec3::new(1.0, 0.0, 0.0)) < 1e-5);
}

#[test]
fn world_matrix_updates_after_parent_moves() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new());
    let child = scene.create_node_with_name("child");
    scene.attach(child, root).unwrap();
    scene.update_matrix_world();

    scene.get_node_mut(root).unwrap().transform.position = Vec3::new(0.0, 2.0, 0.0);
    scene.update_matrix_world();

    let world = scene.get_node(child).unwrap().world_matrix().transform_point3(Vec3::ZERO);
    assert!(world.distance(Vec3::new(0.0, 2.0, 0.0)) < 1e-6);
}

// ============================================================================
// Malformed Prefabs
// ============================================================================

/// Body -> Arm -> Hand, all valid.
fn body_prefab() -> Prefab {
    let mut prefab = Prefab::new("Body");
    let body = prefab.add_root(PrefabNode::new("Body"));
    let arm = prefab.add_child(body, PrefabNode::new("Arm"));
    prefab.add_child(arm, PrefabNode::new("Hand"));
    prefab
}

fn assert_rejected(prefab: &Prefab, needle: &str) {
    common::init_logging();
    let mut scene = Scene::new();

    let err = scene.instantiate(prefab).unwrap_err();

    assert!(matches!(err, KennelError::InvalidPrefab { .. }), "{err}");
    assert!(err.to_string().contains(needle), "{err}");
    // Nothing was inserted, and traversal still terminates.
    assert!(scene.nodes.is_empty());
    assert!(scene.root_nodes.is_empty());
    scene.update_matrix_world();
    assert!(scene.visible_nodes().is_empty());
}

#[test]
fn prefab_with_child_pointing_at_ancestor_is_rejected() {
    let mut prefab = body_prefab();
    // Hand (2) lists Arm (1) as its child.
    prefab.nodes[2].children_indices.push(1);
    assert_rejected(&prefab, "two parents");
}

#[test]
fn prefab_with_root_listed_as_child_is_rejected() {
    let mut prefab = body_prefab();
    prefab.nodes[2].children_indices.push(0);
    assert_rejected(&prefab, "root node 0");
}

#[test]
fn prefab_with_shared_child_is_rejected() {
    let mut prefab = body_prefab();
    let extra = prefab.add_root(PrefabNode::new("Extra"));
    prefab.nodes[extra].children_indices.push(2);
    assert_rejected(&prefab, "two parents");
}

#[test]
fn prefab_with_detached_cycle_is_rejected() {
    let mut prefab = body_prefab();
    prefab.nodes.push(PrefabNode::new("A"));
    prefab.nodes.push(PrefabNode::new("B"));
    prefab.nodes[3].children_indices.push(4);
    prefab.nodes[4].children_indices.push(3);
    assert_rejected(&prefab, "own ancestor");
}

#[test]
fn prefab_with_out_of_range_indices_is_rejected() {
    let mut prefab = body_prefab();
    prefab.nodes[1].children_indices.push(42);
    assert_rejected(&prefab, "child 42");

    let mut prefab = body_prefab();
    prefab.root_indices.push(7);
    assert_rejected(&prefab, "root index 7");
}

#[test]
fn prefab_with_duplicate_root_is_rejected() {
    let mut prefab = body_prefab();
    prefab.root_indices.push(0);
    assert_rejected(&prefab, "root twice");
}
