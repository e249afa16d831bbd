//! Timed interpolation between consecutive layouts.
//!
//! A `Transition` captures where every node was on screen when a re-layout
//! fired; while it runs, draw code samples each node's position as an eased
//! blend from that snapshot to the new layout's target. Matching is keyed by
//! the stable node id, so a node that survives a re-layout glides to its new
//! slot while nodes without a counterpart appear (or vanish) at their target
//! directly. A re-layout during flight snapshots the interpolated positions,
//! restarting the animation from wherever things currently are.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_DURATION: Duration = Duration::from_millis(750);

/// Cubic ease-in-out over `t` in [0, 1].
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    started: Instant,
    duration: Duration,
    from: HashMap<String, (f64, f64)>,
}

impl Transition {
    pub fn begin(from: HashMap<String, (f64, f64)>, duration: Duration, now: Instant) -> Self {
        Self {
            started: now,
            duration,
            from,
        }
    }

    /// Eased progress in [0, 1].
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        ease_in_out_cubic(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    pub fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Current on-screen position for a node heading to `target`.
    pub fn sample(&self, id: &str, target: (f64, f64), now: Instant) -> (f64, f64) {
        match self.from.get(id) {
            Some(&(fx, fy)) => {
                let t = self.progress(now);
                (fx + (target.0 - fx) * t, fy + (target.1 - fy) * t)
            }
            // No previous position: the node enters at its target.
            None => target,
        }
    }
}
