//! Kennel viewer demo.
//!
//! Builds a procedural stand-in for the dog model (28 variants, 17
//! attachment groups, a small skeleton) and a sitting clip, then runs the
//! frame loop.
//!
//! ```text
//! kennel_viewer [variant] [config.json]
//! ```
//!
//! Without the `winit` feature the loop runs headless for five seconds at
//! 60 fps and logs frame statistics.

use std::sync::Arc;

use anyhow::Context;
use glam::{Quat, Vec3};
use kennel::animation::{InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use kennel::{
    AnimationAsset, AnimationClip, AssetLibrary, FrameLoop, HeadlessPipeline, ModelAsset, Prefab, PrefabNode,
    Stage, StageConfig,
};

const VARIANT_COUNT: usize = 28;
const ATTACHMENT_COUNT: usize = 17;

fn build_dogs() -> Prefab {
    let mut prefab = Prefab::new("Dogs");
    let mesh = prefab.add_root(PrefabNode::new("Mesh"));
    let variants = prefab.add_child(mesh, PrefabNode::new("Dogs"));
    prefab.add_children(variants, "Dog_", VARIANT_COUNT);
    for i in 1..=ATTACHMENT_COUNT {
        prefab.add_child(mesh, PrefabNode::new(format!("Attachment_{i}")));
    }

    let hips = prefab.add_root(PrefabNode::new("Hips"));
    let spine = prefab.add_child(hips, PrefabNode::new("Spine"));
    prefab.add_child(spine, PrefabNode::new("Head"));
    prefab
}

fn build_sitting_clip() -> AnimationClip {
    let times = vec![0.0, 1.0, 2.0];
    let hips = Track {
        meta: TrackMeta {
            node_name: "Hips".into(),
            target: TargetPath::Translation,
        },
        data: TrackData::Vector3(KeyframeTrack::new(
            times.clone(),
            vec![Vec3::new(0.0, 40.0, 0.0), Vec3::new(0.0, 38.0, 0.0), Vec3::new(0.0, 40.0, 0.0)],
            InterpolationMode::Linear,
        )),
    };
    let head = Track {
        meta: TrackMeta {
            node_name: "Head".into(),
            target: TargetPath::Rotation,
        },
        data: TrackData::Quaternion(KeyframeTrack::new(
            times,
            vec![Quat::IDENTITY, Quat::from_rotation_y(0.3), Quat::IDENTITY],
            InterpolationMode::Linear,
        )),
    };
    AnimationClip::new("Sitting", vec![hips, head])
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let variant = args
        .next()
        .map(|s| s.parse::<usize>())
        .transpose()
        .context("variant must be a non-negative integer")?;

    let mut config = match args.next() {
        Some(path) => StageConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => StageConfig::default(),
    };
    if let Some(variant) = variant {
        config.model.variant = variant;
    }

    let assets = AssetLibrary::new();
    assets.insert_model(ModelAsset::Dogs, build_dogs());
    assets.insert_animation(AnimationAsset::DogSitting, Arc::new(build_sitting_clip()));

    let stage = Stage::new(&assets, &config)?;
    let frame_loop = FrameLoop::new(stage, HeadlessPipeline::new(1280, 720));

    run(frame_loop)
}

#[cfg(feature = "winit")]
fn run(frame_loop: FrameLoop<HeadlessPipeline>) -> anyhow::Result<()> {
    kennel::app::winit::App::new()
        .with_title("Kennel Viewer")
        .run(frame_loop)?;
    Ok(())
}

#[cfg(not(feature = "winit"))]
fn run(mut frame_loop: FrameLoop<HeadlessPipeline>) -> anyhow::Result<()> {
    let mut scheduler = kennel::PacedScheduler::new(60).with_frame_limit(300);
    frame_loop.run(&mut scheduler)?;
    log::info!(
        "Rendered {} frames, animation time {:.2}s",
        frame_loop.pipeline().frames_rendered(),
        frame_loop.stage().mixer().time()
    );
    Ok(())
}
