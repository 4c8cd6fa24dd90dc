// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Frame-driven tween registry.
//!
//! Entries are advanced by elapsed milliseconds, not by snapshot arrival. Each
//! entry samples start values for the properties it animates at registration,
//! so a tween registered on top of a running one continues from wherever the
//! node currently is. An entry writes only its own properties. Where two
//! entries animate the same property, both keep writing until each completes
//! and the later registration wins; there is no cancellation primitive.

use core::fmt;

use thousand_scene_port::{NodeId, Transform};
use tracing::debug;

use crate::scene::SceneGraph;

/// Deferred scene mutation run when a tween completes.
pub type Completion = Box<dyn FnOnce(&mut SceneGraph)>;

/// What to do once a tween reaches its end values.
#[derive(Default)]
pub enum OnComplete {
    /// Leave the node in place.
    #[default]
    Nothing,
    /// Detach the target node.
    Detach,
    /// Run a closure against the scene.
    Callback(Completion),
}

impl fmt::Debug for OnComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnComplete::Nothing => f.write_str("Nothing"),
            OnComplete::Detach => f.write_str("Detach"),
            OnComplete::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Target values; `None` leaves that property alone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TweenTo {
    /// Target x.
    pub x: Option<f32>,
    /// Target y.
    pub y: Option<f32>,
    /// Target rotation.
    pub rotation: Option<f32>,
    /// Target scale.
    pub scale: Option<f32>,
    /// Target opacity.
    pub opacity: Option<f32>,
}

impl TweenTo {
    /// Every property taken from `t`.
    pub fn transform(t: Transform) -> Self {
        Self {
            x: Some(t.x),
            y: Some(t.y),
            rotation: Some(t.rotation),
            scale: Some(t.scale),
            opacity: Some(t.opacity),
        }
    }

    /// Builder: position.
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Builder: opacity.
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Builder: scale.
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// Ease-out quadratic: `t * (2 - t)` on `t` clamped to `[0, 1]`.
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

#[derive(Clone, Copy, Debug)]
struct Track {
    from: f32,
    to: f32,
}

impl Track {
    fn new(current: f32, to: Option<f32>) -> Option<Self> {
        to.map(|to| Self { from: current, to })
    }

    fn write(track: Option<Self>, k: f32, field: &mut f32) {
        if let Some(t) = track {
            *field = t.from + (t.to - t.from) * k;
        }
    }
}

/// Per-property start/end pairs; `None` for properties left alone.
#[derive(Clone, Copy, Debug)]
struct Tracks {
    x: Option<Track>,
    y: Option<Track>,
    rotation: Option<Track>,
    scale: Option<Track>,
    opacity: Option<Track>,
}

impl Tracks {
    fn sample(start: &Transform, to: TweenTo) -> Self {
        Self {
            x: Track::new(start.x, to.x),
            y: Track::new(start.y, to.y),
            rotation: Track::new(start.rotation, to.rotation),
            scale: Track::new(start.scale, to.scale),
            opacity: Track::new(start.opacity, to.opacity),
        }
    }

    fn apply(&self, k: f32, t: &mut Transform) {
        Track::write(self.x, k, &mut t.x);
        Track::write(self.y, k, &mut t.y);
        Track::write(self.rotation, k, &mut t.rotation);
        Track::write(self.scale, k, &mut t.scale);
        Track::write(self.opacity, k, &mut t.opacity);
    }
}

#[derive(Debug)]
struct Entry {
    target: NodeId,
    tracks: Tracks,
    duration_ms: f32,
    elapsed_ms: f32,
    on_complete: OnComplete,
    generation: u64,
}

impl Entry {
    fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        }
    }
}

/// Registry of running tweens. The only owner of its entries.
#[derive(Debug, Default)]
pub struct TweenScheduler {
    entries: Vec<Entry>,
    generation: u64,
}

impl TweenScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation stamped onto entries registered from now on.
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Register a tween of `target` toward `to` over `duration_ms`.
    ///
    /// Start values are sampled now. A missing target animates from identity
    /// and its writes are dropped; its completion still fires.
    pub fn tween(
        &mut self,
        scene: &SceneGraph,
        target: NodeId,
        to: TweenTo,
        duration_ms: f32,
        on_complete: OnComplete,
    ) {
        let start = scene
            .node(target)
            .map_or(Transform::IDENTITY, |n| n.transform);
        self.entries.push(Entry {
            target,
            tracks: Tracks::sample(&start, to),
            duration_ms,
            elapsed_ms: 0.0,
            on_complete,
            generation: self.generation,
        });
    }

    /// Advance every entry by `dt_ms`, write values, retire finished entries.
    ///
    /// Entries are processed in registration order. Returns how many entries
    /// retired. Completions run after all writes.
    pub fn tick(&mut self, dt_ms: f32, scene: &mut SceneGraph) -> usize {
        let dt_ms = dt_ms.max(0.0);
        for entry in &mut self.entries {
            entry.elapsed_ms += dt_ms;
            let k = ease_out(entry.progress());
            if let Some(node) = scene.node_mut(entry.target) {
                entry.tracks.apply(k, &mut node.transform);
            }
        }
        let (finished, running): (Vec<Entry>, Vec<Entry>) = self
            .entries
            .drain(..)
            .partition(|e| e.progress() >= 1.0);
        self.entries = running;
        let retired = finished.len();
        for entry in finished {
            if entry.generation < self.generation {
                debug!(
                    node = entry.target.0,
                    generation = entry.generation,
                    "tween from an earlier render retired"
                );
            }
            match entry.on_complete {
                OnComplete::Nothing => {}
                OnComplete::Detach => {
                    scene.detach(entry.target);
                }
                OnComplete::Callback(done) => done(scene),
            }
        }
        retired
    }

    /// Running entries.
    pub fn active(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is running.
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any running entry targets `node`.
    pub fn is_animating(&self, node: NodeId) -> bool {
        self.entries.iter().any(|e| e.target == node)
    }

    /// Drop every entry without running completions. Teardown only.
    pub fn abandon_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }
}
