use std::sync::Arc;

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

/// Index of an action inside its [`AnimationMixer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionHandle(usize);

/// Animation driver bound to one object in the scene.
///
/// Tracks of every clip are resolved against the subtree of `root`.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: Vec<AnimationAction>,
    time: f64,
    pub time_scale: f32,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: Vec::new(),
            time: 0.0,
            time_scale: 1.0,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Total scaled time this mixer has been advanced by, in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Returns the action for `clip`, creating and binding it on first use.
    /// The same clip always yields the same action.
    pub fn clip_action(&mut self, scene: &Scene, clip: Arc<AnimationClip>) -> ActionHandle {
        if let Some(index) = self
            .actions
            .iter()
            .position(|a| Arc::ptr_eq(a.clip(), &clip))
        {
            return ActionHandle(index);
        }

        let bindings = Binder::bind(scene, self.root, &clip);
        log::debug!(
            "Bound clip '{}': {}/{} tracks",
            clip.name,
            bindings.len(),
            clip.tracks.len()
        );

        let mut action = AnimationAction::new(clip);
        action.bindings = bindings;
        self.actions.push(action);
        ActionHandle(self.actions.len() - 1)
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle.0)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle.0)
    }

    pub fn actions(&self) -> impl Iterator<Item = &AnimationAction> {
        self.actions.iter()
    }

    /// Advances every running action by `dt` and writes the sampled poses
    /// into the bound nodes.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        let dt = dt * self.time_scale;
        self.time += f64::from(dt);

        for action in &mut self.actions {
            action.update(dt);
        }

        for action in &mut self.actions {
            if !action.enabled || action.weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let binding = action.bindings[i];
                let Some(value) = action.sample_track(binding.track_index) else {
                    continue;
                };
                let Some(node) = scene.get_node_mut(binding.node_handle) else {
                    continue;
                };

                match (value, binding.target) {
                    (TrackValue::Vector3(v), TargetPath::Translation) => node.transform.position = v,
                    (TrackValue::Vector3(v), TargetPath::Scale) => node.transform.scale = v,
                    (TrackValue::Quaternion(q), TargetPath::Rotation) => node.transform.rotation = q,
                    _ => {}
                }
            }
        }
    }
}
