use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    /// Values are stored as `[in_tangent, value, out_tangent]` triples.
    CubicSpline,
}

/// How far the cursor scans linearly before falling back to binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe interval so sequential playback samples in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Last keyframe time, or `0.0` for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    fn is_well_formed(&self) -> bool {
        let expected = match self.interpolation {
            InterpolationMode::CubicSpline => self.times.len() * 3,
            _ => self.times.len(),
        };
        !self.times.is_empty() && self.values.len() >= expected
    }

    /// Samples without a cursor (binary search every call).
    ///
    /// Returns `None` when the track has no keyframes or too few values.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if !self.is_well_formed() {
            return None;
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        Some(self.sample_at_frame(next_idx.saturating_sub(1), time))
    }

    /// Samples at `time`, scanning a few intervals around the cursor before
    /// falling back to binary search. Updates the cursor.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        if !self.is_well_formed() {
            return None;
        }

        let len = self.times.len();
        if len == 1 {
            return Some(self.value_at(0));
        }

        // A cursor left over from a longer track is reset to the start.
        let i = if cursor.last_index < len { cursor.last_index } else { 0 };
        let t_curr = self.times[i];

        let found = if time >= t_curr {
            // Forward playback.
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    if time >= self.times[len - 1] {
                        res = Some(len - 1);
                    }
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Reverse playback or loop wrap.
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                if i < offset {
                    break;
                }
                let idx = i - offset;
                if time >= self.times[idx] {
                    res = Some(idx);
                    break;
                }
            }
            res
        };

        let index = found.unwrap_or_else(|| {
            let next_idx = self.times.partition_point(|&t| t <= time);
            next_idx.saturating_sub(1)
        });
        cursor.last_index = index;

        Some(self.sample_at_frame(index, time))
    }

    fn value_at(&self, index: usize) -> T {
        match self.interpolation {
            InterpolationMode::CubicSpline => self.values[index * 3 + 1],
            _ => self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();
        if index >= len - 1 {
            return self.value_at(len - 1);
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index),
            InterpolationMode::Linear => {
                T::interpolate_linear(self.value_at(index), self.value_at(next_idx), t)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;
                T::interpolate_cubic(
                    self.values[i_prev + 1],
                    self.values[i_prev + 2],
                    self.values[i_next],
                    self.values[i_next + 1],
                    t,
                    dt,
                )
            }
        }
    }
}
