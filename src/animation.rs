//! Tick-driven, multi-phase tweens.
//!
//! The animator never touches the host: `tick` returns the interpolated
//! values and the completion tags of sequences that finished, and the
//! window manager applies them. A new sequence on a key replaces the running
//! one immediately (its completion is dropped), which is the only way an
//! animation is cancelled mid-flight.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use crate::geometry::Transform;
use crate::window::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnimationKey {
    /// Layer transform of a host window.
    Transform(WindowId),
    /// Logical position of the split-view divider.
    DividerPosition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatedValue {
    Transform(Transform),
    Scalar(f64),
}

impl AnimatedValue {
    fn lerp(&self, to: &AnimatedValue, t: f64) -> AnimatedValue {
        match (self, to) {
            (AnimatedValue::Transform(a), AnimatedValue::Transform(b)) => {
                AnimatedValue::Transform(Transform::lerp(a, b, t))
            }
            (AnimatedValue::Scalar(a), AnimatedValue::Scalar(b)) => {
                AnimatedValue::Scalar(a + (b - a) * t)
            }
            // Mismatched kinds jump straight to the target.
            (_, to) => *to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOutCubic,
    /// cubic-bezier(0.4, 0, 0.2, 1)
    FastOutSlowIn,
    /// cubic-bezier(0.2, 0, 0, 1)
    Accel20Decel100,
}

impl Easing {
    pub fn value(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, t),
            Easing::Accel20Decel100 => cubic_bezier(0.2, 0.0, 0.0, 1.0, t),
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let sample = |a: f64, b: f64, t: f64| {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    };
    let slope = |a: f64, b: f64, t: f64| {
        let u = 1.0 - t;
        3.0 * u * u * a + 6.0 * u * t * (b - a) + 3.0 * t * t * (1.0 - b)
    };

    let mut t = x;
    for _ in 0..8 {
        let err = sample(x1, x2, t) - x;
        if err.abs() < 1e-6 {
            return sample(y1, y2, t);
        }
        let d = slope(x1, x2, t);
        if d.abs() < 1e-6 {
            break;
        }
        t -= err / d;
    }

    // Newton did not converge; bisect.
    let (mut lo, mut hi) = (0.0, 1.0);
    t = x;
    for _ in 0..32 {
        let v = sample(x1, x2, t);
        if (v - x).abs() < 1e-6 {
            break;
        }
        if v < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    sample(y1, y2, t)
}

/// What the window manager should do once a sequence runs to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    None,
    /// Untuck finished; release the tucker of this floated window.
    Untucked(WindowId),
    /// The desk drag proxy is back over its mini view.
    DeskSnappedBack,
    /// The divider reached its fixed ratio after a resize.
    DividerSnapped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    pub target: AnimatedValue,
    pub duration: Duration,
    pub easing: Easing,
}

impl Phase {
    pub fn new(target: AnimatedValue, duration: Duration, easing: Easing) -> Self {
        Self {
            target,
            duration,
            easing,
        }
    }
}

#[derive(Debug)]
struct Sequence {
    from: AnimatedValue,
    phases: VecDeque<Phase>,
    phase_elapsed: Duration,
    on_complete: Completion,
}

impl Sequence {
    fn final_target(&self) -> AnimatedValue {
        self.phases
            .back()
            .map(|phase| phase.target)
            .unwrap_or(self.from)
    }

    /// Advances by `elapsed`; returns the current value and whether the
    /// sequence is done.
    fn advance(&mut self, mut elapsed: Duration) -> (AnimatedValue, bool) {
        loop {
            let Some(phase) = self.phases.front().copied() else {
                return (self.from, true);
            };
            let left = phase.duration.saturating_sub(self.phase_elapsed);
            if elapsed >= left {
                elapsed -= left;
                self.from = phase.target;
                self.phase_elapsed = Duration::ZERO;
                self.phases.pop_front();
                continue;
            }
            self.phase_elapsed += elapsed;
            let t = self.phase_elapsed.as_secs_f64() / phase.duration.as_secs_f64();
            return (self.from.lerp(&phase.target, phase.easing.value(t)), false);
        }
    }
}

#[derive(Debug, Default)]
pub struct TickOutput {
    pub frames: Vec<(AnimationKey, AnimatedValue)>,
    pub completed: Vec<Completion>,
}

#[derive(Debug)]
pub struct Animator {
    running: BTreeMap<AnimationKey, Sequence>,
    scale: f64,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Animator {
    pub fn new(scale: f64) -> Self {
        Self {
            running: BTreeMap::new(),
            scale: scale.max(0.0),
        }
    }

    /// Starts `phases` on `key` from the value `from`, preempting whatever
    /// was running on that key.
    pub fn start(
        &mut self,
        key: AnimationKey,
        from: AnimatedValue,
        phases: Vec<Phase>,
        on_complete: Completion,
    ) {
        let phases = phases
            .into_iter()
            .map(|phase| Phase {
                duration: phase.duration.mul_f64(self.scale),
                ..phase
            })
            .collect();
        if let Some(previous) = self.running.insert(
            key,
            Sequence {
                from,
                phases,
                phase_elapsed: Duration::ZERO,
                on_complete,
            },
        ) {
            tracing::trace!(?key, dropped = ?previous.on_complete, "animation preempted");
        }
    }

    /// Drops a running sequence without reporting its completion.
    pub fn stop(&mut self, key: AnimationKey) -> bool {
        self.running.remove(&key).is_some()
    }

    pub fn is_animating(&self, key: AnimationKey) -> bool {
        self.running.contains_key(&key)
    }

    pub fn is_animating_to(&self, key: AnimationKey, target: AnimatedValue) -> bool {
        self.running
            .get(&key)
            .is_some_and(|sequence| sequence.final_target() == target)
    }

    pub fn has_running(&self) -> bool {
        !self.running.is_empty()
    }

    pub fn tick(&mut self, elapsed: Duration) -> TickOutput {
        let mut output = TickOutput::default();
        let mut finished = Vec::new();
        for (key, sequence) in self.running.iter_mut() {
            let (value, done) = sequence.advance(elapsed);
            output.frames.push((*key, value));
            if done {
                finished.push(*key);
            }
        }
        for key in finished {
            if let Some(sequence) = self.running.remove(&key) {
                output.completed.push(sequence.on_complete);
            }
        }
        output
    }
}
