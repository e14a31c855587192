use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

/// Playback state of one clip on one object.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    /// Local clip time in seconds, wrapped according to `loop_mode`.
    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    /// Creates a stopped action in `Loop` mode.
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.paused = false;
        self
    }

    /// Disables the action and rewinds it to the start.
    pub fn stop(&mut self) -> &mut Self {
        self.enabled = false;
        self.time = 0.0;
        self
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled && !self.paused
    }

    /// Advances local time by `dt * time_scale`.
    pub fn update(&mut self, dt: f32) {
        if !self.is_running() || self.clip.duration <= 0.0 {
            return;
        }

        let advanced = self.time + dt * self.time_scale;
        let (time, finished) = wrap_time(advanced, self.clip.duration, self.loop_mode);
        self.time = time;
        if finished {
            self.paused = true;
        }
    }

    /// Samples track `track_index` at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => {
                t.sample_with_cursor(self.time, cursor).map(TrackValue::Quaternion)
            }
        }
    }
}

/// Maps an unbounded clip time into `[0, duration]` for `mode`.
///
/// The flag is set when a `Once` clip ran off either end.
fn wrap_time(time: f32, duration: f32, mode: LoopMode) -> (f32, bool) {
    match mode {
        LoopMode::Once if time >= duration => (duration, true),
        LoopMode::Once if time < 0.0 => (0.0, true),
        LoopMode::Once => (time, false),
        LoopMode::Loop => (time.rem_euclid(duration), false),
        LoopMode::PingPong => {
            let t = time.rem_euclid(duration * 2.0);
            (if t > duration { duration * 2.0 - t } else { t }, false)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_wraps_negative_time_from_the_end() {
        let (t, finished) = wrap_time(-0.25, 2.0, LoopMode::Loop);
        assert!((t - 1.75).abs() < 1e-6);
        assert!(!finished);
    }

    #[test]
    fn once_clamps_and_finishes() {
        assert_eq!(wrap_time(2.5, 2.0, LoopMode::Once), (2.0, true));
        assert_eq!(wrap_time(-1.0, 2.0, LoopMode::Once), (0.0, true));
        assert_eq!(wrap_time(1.0, 2.0, LoopMode::Once), (1.0, false));
    }
}
