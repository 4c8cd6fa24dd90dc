// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! State-driven scene renderer for the Thousand table.
//!
//! Snapshots come in whole; the scene is rebuilt from each one. Motion is
//! inferred by diffing against the previous snapshot and played by a
//! frame-driven tween scheduler that does not care when the next snapshot
//! arrives.
//!
//! - [`asset_cache`]: card textures, generated once per face.
//! - [`layout`]: pure placement functions.
//! - [`tween`]: the animation scheduler.
//! - [`differ`]: transient-event inference.
//! - [`scene`]: the retained node arena.
//! - [`coordinator`]: ties the above to a [`SurfacePort`](thousand_scene_port::SurfacePort).
//! - [`router`]: pointer hit-testing and intent translation.
//!
//! # Crate Features
//!
//! - `test-utils`: exports [`MockSurface`] for downstream tests.

pub mod artwork;
pub mod asset_cache;
pub mod coordinator;
pub mod differ;
pub mod layout;
pub mod router;
pub mod scene;
pub mod tween;

#[cfg(any(test, feature = "test-utils"))]
mod mock_surface;

pub use asset_cache::AssetCache;
pub use coordinator::{RenderOutcome, SceneConfig, SceneCoordinator};
pub use differ::{infer_events, SnapshotDigest, TransientEvent, TransientEvents};
pub use layout::{hand_positions, trick_slots, Placement, Viewport};
#[cfg(any(test, feature = "test-utils"))]
pub use mock_surface::MockSurface;
pub use router::{discard_intent, HitRegion, HitTarget, InteractionRouter, RouterOutcome};
pub use scene::{Node, NodeTag, SceneGraph};
pub use tween::{ease_out, OnComplete, TweenScheduler, TweenTo};
