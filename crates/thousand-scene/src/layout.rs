// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure table layout.
//!
//! Every function here is a function of its arguments only. The coordinator
//! calls them on every render, so there is nothing to drift.

use thousand_scene_port::Transform;

use crate::artwork::{CARD_H, CARD_W};

/// Horizontal overlap of neighbouring hand cards, as a fraction of card width.
const HAND_SPACING: f32 = 0.55;
/// Fraction of the viewport width the hand fan may span.
const HAND_MAX_SPAN: f32 = 0.86;
/// Rotation per card step away from the centre card (radians).
const FAN_ROTATION: f32 = 0.06;
/// Vertical drop per squared card step (logical px before scaling).
const FAN_DROP: f32 = 4.0;
/// Horizontal distance between trick slots, as a fraction of card width.
const TRICK_SPREAD: f32 = 0.8;
/// Tilt of the outer trick slots (radians).
const TRICK_TILT: f32 = 0.08;
/// Scale applied to opponents' face-down fans.
pub const BOT_CARD_SCALE: f32 = 0.45;
/// Maximum concurrent trick plays shown.
pub const TRICK_CAP: usize = 3;

/// Logical viewport plus device scale, passed explicitly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical width.
    pub width: f32,
    /// Logical height.
    pub height: f32,
    /// Card scale relative to artwork pixels.
    pub scale: f32,
}

impl Viewport {
    /// Construct a viewport.
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
        }
    }

    /// Whether the viewport can be laid out at all.
    pub fn is_usable(&self) -> bool {
        [self.width, self.height, self.scale]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    /// On-screen card width.
    pub fn card_width(&self) -> f32 {
        CARD_W * self.scale
    }

    /// On-screen card height.
    pub fn card_height(&self) -> f32 {
        CARD_H * self.scale
    }
}

/// Where one element sits.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    /// Centre x.
    pub x: f32,
    /// Centre y.
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
}

impl Placement {
    /// Placement without rotation.
    pub fn at(x: f32, y: f32) -> Self {
        Self { x, y, rotation: 0.0 }
    }

    /// Node transform for this placement at the given scale.
    pub fn transform(&self, scale: f32) -> Transform {
        Transform {
            scale,
            ..Transform::at(self.x, self.y).rotated(self.rotation)
        }
    }
}

/// Offsets of `count` items from their centre item: `-2, -1, 0, 1, 2`.
#[allow(clippy::cast_precision_loss)]
fn centred_offsets(count: usize) -> impl Iterator<Item = f32> {
    let mid = count.saturating_sub(1) as f32 / 2.0;
    (0..count).map(move |i| i as f32 - mid)
}

/// Fan positions for `count` hand cards along the bottom edge.
///
/// Cards spread from a centred origin. Spacing shrinks so the fan never spans
/// more than [`HAND_MAX_SPAN`] of the width. Rotation and drop grow with
/// distance from the centre card.
#[allow(clippy::cast_precision_loss)]
pub fn hand_positions(count: usize, viewport: &Viewport) -> Vec<Placement> {
    if count == 0 {
        return Vec::new();
    }
    let card_w = viewport.card_width();
    let natural = card_w * HAND_SPACING;
    let spacing = if count > 1 {
        let room = (viewport.width * HAND_MAX_SPAN - card_w).max(0.0);
        natural.min(room / (count - 1) as f32)
    } else {
        0.0
    };
    let cx = viewport.width / 2.0;
    let base_y = viewport.height - viewport.card_height() * 0.55;
    centred_offsets(count)
        .map(|offset| Placement {
            x: cx + offset * spacing,
            y: base_y + offset * offset * FAN_DROP * viewport.scale,
            rotation: offset * FAN_ROTATION,
        })
        .collect()
}

/// Centre of the trick area.
pub fn trick_center(viewport: &Viewport) -> Placement {
    Placement::at(viewport.width / 2.0, viewport.height * 0.45)
}

/// Slots for `count` trick cards around `center`, in play order.
///
/// At most three are returned. One card takes the centre slot, two take the
/// outer slots, three take all of them left to right.
pub fn trick_slots(count: usize, center: Placement, viewport: &Viewport) -> Vec<Placement> {
    let dx = viewport.card_width() * TRICK_SPREAD;
    let slots = [
        Placement {
            x: center.x - dx,
            y: center.y,
            rotation: -TRICK_TILT,
        },
        Placement {
            x: center.x,
            y: center.y - 6.0 * viewport.scale,
            rotation: 0.0,
        },
        Placement {
            x: center.x + dx,
            y: center.y,
            rotation: TRICK_TILT,
        },
    ];
    let picks: &[usize] = match count.min(TRICK_CAP) {
        0 => &[],
        1 => &[1],
        2 => &[0, 2],
        _ => &[0, 1, 2],
    };
    picks.iter().map(|&i| slots[i]).collect()
}

/// Stock / kitty position, left of the trick area.
pub fn deck_anchor(viewport: &Viewport) -> Placement {
    Placement::at(viewport.width * 0.12, viewport.height * 0.45)
}

/// Trump indicator position, top right.
pub fn trump_badge_anchor(viewport: &Viewport) -> Placement {
    Placement::at(viewport.width * 0.9, viewport.height * 0.1)
}

/// Seat anchors for `count` opponents, spread across the top edge.
#[allow(clippy::cast_precision_loss)]
pub fn bot_seats(count: usize, viewport: &Viewport) -> Vec<Placement> {
    (0..count)
        .map(|i| {
            let x = viewport.width * (i + 1) as f32 / (count + 1) as f32;
            Placement::at(x, viewport.height * 0.14)
        })
        .collect()
}

/// Small face-down fan of `count` cards, relative to a seat anchor.
pub fn bot_fan(count: usize, viewport: &Viewport) -> Vec<Placement> {
    let step = 12.0 * viewport.scale;
    centred_offsets(count)
        .map(|offset| Placement {
            x: offset * step,
            y: offset.abs() * 1.5 * viewport.scale,
            rotation: offset * FAN_ROTATION * 0.8,
        })
        .collect()
}
