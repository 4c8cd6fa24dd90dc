// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved table preferences (connection, viewport, animation timing).

use serde::{Deserialize, Serialize};
use thousand_proto::DeckKind;

/// Preferences persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePrefs {
    /// Authority WebSocket endpoint.
    pub server_url: String,
    /// Ruleset requested by `start_game`.
    pub ruleset: String,
    /// Deck whose faces are pre-generated.
    pub deck: DeckKind,
    /// Viewport and device scale.
    pub viewport: ViewportPrefs,
    /// Animation durations.
    pub animation: AnimationPrefs,
    /// Frames per second of the driver loop.
    pub frame_rate: u32,
}

impl Default for TablePrefs {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8080/ws".into(),
            ruleset: "classic".into(),
            deck: DeckKind::Short,
            viewport: ViewportPrefs::default(),
            animation: AnimationPrefs::default(),
            frame_rate: 60,
        }
    }
}

/// Logical viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportPrefs {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    /// Device/view scale factor.
    pub scale: f32,
}

impl Default for ViewportPrefs {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            scale: 1.0,
        }
    }
}

/// Tween durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationPrefs {
    /// Deck → hand flight.
    pub deal_ms: u32,
    /// Extra delay per dealt card.
    pub deal_stagger_ms: u32,
    /// Hand → trick flight.
    pub play_ms: u32,
    /// Trick fade-out.
    pub clear_ms: u32,
}

impl Default for AnimationPrefs {
    fn default() -> Self {
        Self {
            deal_ms: 420,
            deal_stagger_ms: 45,
            play_ms: 320,
            clear_ms: 260,
        }
    }
}
