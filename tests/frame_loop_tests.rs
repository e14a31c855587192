//! Frame Loop Tests
//!
//! Tests for:
//! - FrameLoop: per-frame ordering, delta accumulation, render count
//! - LoopState transitions (Running -> Stopped / Faulted)
//! - StopHandle cancellation and scheduler-driven teardown

mod common;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use glam::Vec3;
use kennel::animation::{InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use kennel::errors::{KennelError, Result};
use kennel::scene::{Camera, Scene};
use kennel::{
    AnimationAsset, AnimationClip, AssetLibrary, FrameLoop, FrameScheduler, LoopState, ModelAsset, Prefab,
    PrefabNode, RenderPipeline, Stage, StageConfig,
};

const EPSILON: f64 = 1e-6;

/// Records every `render` call; optionally fails on a given frame.
#[derive(Default)]
struct RecordingPipeline {
    deltas: Vec<f32>,
    fail_on: Option<usize>,
    visible_counts: Vec<usize>,
}

impl RenderPipeline for RecordingPipeline {
    fn render(&mut self, scene: &Scene, _camera: &Camera, dt: f32) -> Result<()> {
        if self.fail_on == Some(self.deltas.len()) {
            return Err(KennelError::RenderError("device lost".into()));
        }
        self.deltas.push(dt);
        self.visible_counts.push(scene.visible_nodes().len());
        Ok(())
    }
}

/// Grants a fixed number of frames and counts the requests.
struct CountingScheduler {
    granted: usize,
    requests: Rc<Cell<usize>>,
}

impl FrameScheduler for CountingScheduler {
    fn next_frame(&mut self) -> bool {
        self.requests.set(self.requests.get() + 1);
        if self.granted == 0 {
            return false;
        }
        self.granted -= 1;
        true
    }
}

fn assets() -> AssetLibrary {
    let mut prefab = Prefab::new("Dogs");
    let mesh = prefab.add_root(PrefabNode::new("Mesh"));
    let group = prefab.add_child(mesh, PrefabNode::new("Dogs"));
    prefab.add_children(group, "Dog_", 28);
    for i in 0..17 {
        prefab.add_child(mesh, PrefabNode::new(format!("Attachment_{i}")));
    }
    prefab.add_root(PrefabNode::new("Hips"));

    let track = Track {
        meta: TrackMeta {
            node_name: "Hips".into(),
            target: TargetPath::Translation,
        },
        data: TrackData::Vector3(KeyframeTrack::new(
            vec![0.0, 1.0],
            vec![Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0)],
            InterpolationMode::Linear,
        )),
    };

    let library = AssetLibrary::new();
    library.insert_model(ModelAsset::Dogs, prefab);
    library.insert_animation(
        AnimationAsset::DogSitting,
        Arc::new(AnimationClip::new("Sitting", vec![track])),
    );
    library
}

fn frame_loop(pipeline: RecordingPipeline) -> FrameLoop<RecordingPipeline> {
    common::init_logging();
    let stage = Stage::new(&assets(), &StageConfig::default()).unwrap();
    FrameLoop::new(stage, pipeline)
}

// ============================================================================
// Ticking
// ============================================================================

#[test]
fn two_ticks_accumulate_time_and_render_twice() -> anyhow::Result<()> {
    let mut frames = frame_loop(RecordingPipeline::default());

    frames.tick_with_delta(0.016)?;
    frames.tick_with_delta(0.020)?;

    let mixer_time = frames.stage().mixer().time();
    assert!((mixer_time - 0.036).abs() < EPSILON, "mixer time {mixer_time}");
    assert_eq!(frames.pipeline().deltas, vec![0.016, 0.020]);
    assert_eq!(frames.frames(), 2);

    let action = frames.stage().mixer().action(frames.stage().action()).unwrap();
    assert!((action.time - 0.036).abs() < 1e-6);
    Ok(())
}

#[test]
fn animation_pose_reaches_the_scene() {
    let mut frames = frame_loop(RecordingPipeline::default());
    frames.tick_with_delta(0.5).unwrap();

    let scene = frames.stage().scene();
    let hips = scene.find_node_by_name(frames.stage().model_root(), "Hips").unwrap();
    let y = scene.get_node(hips).unwrap().transform.position.y;
    assert!((y - 5.0).abs() < 1e-4, "hips y {y}");
}

#[test]
fn clip_time_wraps_while_mixer_time_keeps_growing() {
    let mut frames = frame_loop(RecordingPipeline::default());
    for _ in 0..3 {
        frames.tick_with_delta(0.5).unwrap();
    }

    let action = frames.stage().mixer().action(frames.stage().action()).unwrap();
    assert!((action.time - 0.5).abs() < 1e-5);
    assert!((frames.stage().mixer().time() - 1.5).abs() < EPSILON);
}

#[test]
fn negative_delta_is_clamped() {
    let mut frames = frame_loop(RecordingPipeline::default());
    frames.tick_with_delta(-1.0).unwrap();

    assert_eq!(frames.pipeline().deltas, vec![0.0]);
    assert!(frames.stage().mixer().time().abs() < EPSILON);
}

#[test]
fn render_sees_one_variant_and_no_attachments() {
    let mut frames = frame_loop(RecordingPipeline::default());
    frames.tick_with_delta(0.016).unwrap();

    // camera, two lights, model root, mesh group, variants group, one dog, hips
    assert_eq!(frames.pipeline().visible_counts, vec![8]);
}

#[test]
fn wall_clock_tick_yields_non_negative_delta() {
    let mut frames = frame_loop(RecordingPipeline::default());
    frames.tick().unwrap();
    frames.tick().unwrap();

    assert!(frames.pipeline().deltas.iter().all(|dt| *dt >= 0.0));
}

// ============================================================================
// State transitions
// ============================================================================

#[test]
fn render_failure_faults_the_loop() {
    let mut frames = frame_loop(RecordingPipeline {
        fail_on: Some(1),
        ..RecordingPipeline::default()
    });

    frames.tick_with_delta(0.016).unwrap();
    let err = frames.tick_with_delta(0.016).unwrap_err();
    assert!(matches!(err, KennelError::RenderError(_)));
    assert_eq!(frames.state(), LoopState::Faulted);

    assert!(matches!(frames.tick_with_delta(0.016), Err(KennelError::LoopStopped)));
    assert_eq!(frames.frames(), 1);
}

#[test]
fn stop_handle_halts_ticks() {
    let mut frames = frame_loop(RecordingPipeline::default());
    let stop = frames.stop_handle();

    frames.tick_with_delta(0.016).unwrap();
    stop.stop();

    assert!(matches!(frames.tick_with_delta(0.016), Err(KennelError::LoopStopped)));
    assert_eq!(frames.state(), LoopState::Stopped);
    assert_eq!(frames.pipeline().deltas.len(), 1);
}

#[test]
fn run_stops_when_scheduler_tears_down() {
    let mut frames = frame_loop(RecordingPipeline::default());
    let requests = Rc::new(Cell::new(0));
    let mut scheduler = CountingScheduler {
        granted: 4,
        requests: Rc::clone(&requests),
    };

    frames.run(&mut scheduler).unwrap();

    assert_eq!(frames.frames(), 4);
    assert_eq!(frames.pipeline().deltas.len(), 4);
    // One request per frame plus the refused one.
    assert_eq!(requests.get(), 5);
    assert_eq!(frames.state(), LoopState::Stopped);
}

#[test]
fn run_propagates_frame_faults() {
    let mut frames = frame_loop(RecordingPipeline {
        fail_on: Some(2),
        ..RecordingPipeline::default()
    });
    let mut scheduler = CountingScheduler {
        granted: 10,
        requests: Rc::new(Cell::new(0)),
    };

    let err = frames.run(&mut scheduler).unwrap_err();

    assert!(matches!(err, KennelError::RenderError(_)));
    assert_eq!(frames.frames(), 2);
    assert_eq!(frames.state(), LoopState::Faulted);
}

#[test]
fn run_returns_immediately_when_already_stopped() {
    let mut frames = frame_loop(RecordingPipeline::default());
    frames.stop_handle().stop();
    let requests = Rc::new(Cell::new(0));
    let mut scheduler = CountingScheduler {
        granted: 10,
        requests: Rc::clone(&requests),
    };

    frames.run(&mut scheduler).unwrap();

    assert_eq!(requests.get(), 0);
    assert_eq!(frames.frames(), 0);
    assert_eq!(frames.state(), LoopState::Stopped);
}

#[test]
fn run_on_faulted_loop_does_not_request_frames() {
    let mut frames = frame_loop(RecordingPipeline {
        fail_on: Some(0),
        ..RecordingPipeline::default()
    });
    assert!(frames.tick_with_delta(0.016).is_err());

    let requests = Rc::new(Cell::new(0));
    let mut scheduler = CountingScheduler {
        granted: 10,
        requests: Rc::clone(&requests),
    };

    assert!(matches!(frames.run(&mut scheduler), Err(KennelError::LoopStopped)));
    assert_eq!(requests.get(), 0);
    assert_eq!(frames.state(), LoopState::Faulted);
}

#[test]
fn run_after_host_teardown_does_not_request_frames() {
    let mut frames = frame_loop(RecordingPipeline::default());
    let requests = Rc::new(Cell::new(0));
    let mut scheduler = CountingScheduler {
        granted: 1,
        requests: Rc::clone(&requests),
    };
    frames.run(&mut scheduler).unwrap();
    assert_eq!(requests.get(), 2);

    assert!(matches!(frames.run(&mut scheduler), Err(KennelError::LoopStopped)));
    assert_eq!(requests.get(), 2);
    assert_eq!(frames.state(), LoopState::Stopped);
    assert_eq!(frames.frames(), 1);
}
