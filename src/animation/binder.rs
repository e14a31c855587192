use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves every track of `clip` to a node in the subtree of `root`,
    /// matching by node name. Tracks whose node is missing are skipped.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            match scene.find_node_by_name(root, &track.meta.node_name) {
                Some(node_handle) => bindings.push(PropertyBinding {
                    track_index,
                    node_handle,
                    target: track.meta.target,
                }),
                None => log::warn!(
                    "Clip '{}': no node named '{}', track {track_index} left unbound",
                    clip.name,
                    track.meta.node_name
                ),
            }
        }

        bindings
    }
}
