use glam::Vec3;

use crate::animation::{ActionHandle, AnimationMixer};
use crate::assets::AssetProvider;
use crate::controls::{Input, OrbitControls};
use crate::errors::{KennelError, Result};
use crate::scene::{Camera, Light, Node, NodeHandle, Scene};
use crate::stage::config::StageConfig;
use crate::stage::layout::VariantLayout;

/// A fully configured, ready-to-render viewer scene.
///
/// Built once by [`Stage::new`]; afterwards [`advance`](Self::advance) moves
/// controls and animation forward by one frame.
pub struct Stage {
    scene: Scene,
    camera: Camera,
    camera_node: NodeHandle,
    controls: OrbitControls,
    input: Input,

    model_root: NodeHandle,
    layout: VariantLayout,
    selected_variant: usize,

    mixer: AnimationMixer,
    action: ActionHandle,
}

impl Stage {
    /// Builds the scene: camera, lights, background, orbit controls, the
    /// model with its variant selected, and the looping clip.
    pub fn new(assets: &dyn AssetProvider, config: &StageConfig) -> Result<Self> {
        config.validate()?;

        let mut scene = Scene::new();
        scene.background = Some(config.background_color()?);

        let cam_cfg = &config.camera;
        let mut camera = Camera::new_perspective(cam_cfg.fov, cam_cfg.aspect, cam_cfg.near, cam_cfg.far);
        let mut camera_node = Node::with_name("Camera");
        camera_node.transform.position = cam_cfg.position;
        camera_node.transform.look_at(config.controls.target, Vec3::Y);
        let camera_node = scene.add_node(camera_node);

        Self::setup_lights(&mut scene, config);

        let mut controls = OrbitControls::new(config.controls.target);
        controls.enable_damping = config.controls.enable_damping;
        controls.damping_factor = config.controls.damping_factor;

        let prefab = assets.model(config.model.asset)?;
        let model_root = scene.instantiate(&prefab)?;
        scene
            .get_node_mut(model_root)
            .ok_or(KennelError::NodeNotFound)?
            .transform
            .scale_uniform(config.model.scale);

        let layout = VariantLayout::resolve(&scene, model_root)?;
        layout.configure_visibility(&mut scene, config.model.variant)?;

        let clip = assets.animation(config.animation)?;
        let mut mixer = AnimationMixer::new(model_root);
        let action = mixer.clip_action(&scene, clip);
        if let Some(action) = mixer.action_mut(action) {
            action.play();
        }

        scene.update_matrix_world();
        if let Some(node) = scene.get_node(camera_node) {
            camera.update_view(node.world_matrix());
        }

        log::info!(
            "Stage ready: model '{}' ({} variants, showing {}), clip '{}'",
            config.model.asset,
            layout.variant_count(),
            config.model.variant,
            config.animation
        );

        Ok(Self {
            scene,
            camera,
            camera_node,
            controls,
            input: Input::new(),
            model_root,
            layout,
            selected_variant: config.model.variant,
            mixer,
            action,
        })
    }

    fn setup_lights(scene: &mut Scene, config: &StageConfig) {
        let lighting = &config.lighting;
        scene.add_light(Light::new_ambient(lighting.ambient_color, lighting.ambient_intensity));

        let direction = lighting.directional_direction.normalize();
        let sun = scene.add_light(Light::new_directional(
            lighting.directional_color,
            lighting.directional_intensity,
            direction,
        ));
        if let Some(node) = scene.get_node_mut(sun) {
            node.transform.position = direction;
        }
    }

    /// Switches the visible variant. Attachments stay hidden.
    pub fn select_variant(&mut self, index: usize) -> Result<()> {
        self.layout.configure_visibility(&mut self.scene, index)?;
        self.selected_variant = index;
        Ok(())
    }

    /// Advances one frame: controls step, animation by `dt`, then world
    /// matrices and the camera view are refreshed.
    pub fn advance(&mut self, dt: f32) {
        let fov = self.camera.fov;
        if let Some(node) = self.scene.get_node_mut(self.camera_node) {
            self.controls.update(&mut node.transform, fov, &self.input);
        }

        self.mixer.update(dt, &mut self.scene);

        self.scene.update_matrix_world();
        if let Some(node) = self.scene.get_node(self.camera_node) {
            self.camera.update_view(node.world_matrix());
        }

        self.input.end_frame();
    }

    /// Applies a new surface size to the input state and camera aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.input.handle_resize(width, height);
        if height > 0 {
            self.camera.set_aspect(width as f32 / height as f32);
        }
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn camera_node(&self) -> NodeHandle {
        self.camera_node
    }

    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    #[must_use]
    pub fn model_root(&self) -> NodeHandle {
        self.model_root
    }

    #[must_use]
    pub fn layout(&self) -> &VariantLayout {
        &self.layout
    }

    #[must_use]
    pub fn selected_variant(&self) -> usize {
        self.selected_variant
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[must_use]
    pub fn action(&self) -> ActionHandle {
        self.action
    }
}
