// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rolling frame-time tracker.

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct PerfStats {
    frame_ms: VecDeque<f32>,
    max_samples: usize,
}

impl Default for PerfStats {
    fn default() -> Self {
        Self::with_samples(240)
    }
}

impl PerfStats {
    pub fn with_samples(max_samples: usize) -> Self {
        Self {
            frame_ms: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
        }
    }

    pub fn push(&mut self, frame_ms: f32) {
        if self.frame_ms.len() == self.max_samples {
            self.frame_ms.pop_front();
        }
        self.frame_ms.push_back(frame_ms);
    }

    /// Mean frame time over the window.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_ms(&self) -> f32 {
        if self.frame_ms.is_empty() {
            return 0.0;
        }
        self.frame_ms.iter().sum::<f32>() / self.frame_ms.len() as f32
    }

    pub fn fps(&self) -> f32 {
        let mean = self.mean_ms();
        if mean > 0.0 {
            1000.0 / mean
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn window_is_bounded() {
        let mut perf = PerfStats::with_samples(2);
        perf.push(100.0);
        perf.push(10.0);
        perf.push(30.0);
        assert_relative_eq!(perf.mean_ms(), 20.0);
        assert_relative_eq!(perf.fps(), 50.0);
        assert_relative_eq!(PerfStats::default().fps(), 0.0);
    }
}
