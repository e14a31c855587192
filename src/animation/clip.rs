use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

/// Which node property a track drives, addressed by node name.
#[derive(Debug, Clone)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(t) => t.end_time(),
            TrackData::Quaternion(t) => t.end_time(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

/// A baked animation clip.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Last keyframe time across all tracks, in seconds.
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }
}
