use crate::scene::NodeHandle;

/// The node property an animation track writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
}

/// Track `track_index` of a clip resolved to a live node.
#[derive(Debug, Clone, Copy)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
}
