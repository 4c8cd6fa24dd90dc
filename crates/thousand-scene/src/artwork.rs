// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Card face and back display lists.
//!
//! Paper stock, ink colors and metrics are fixed so the same card looks the
//! same in every run and on every backend.

use core::f32::consts::PI;

use thousand_proto::Card;
use thousand_scene_port::{rgb, CardArtwork, ColorRgba8, DrawCmd, Fill, TextAlign};

/// Card width in artwork pixels.
pub const CARD_W: f32 = 140.0;
/// Card height in artwork pixels.
pub const CARD_H: f32 = 196.0;

const CORNER_RADIUS: f32 = 14.0;
const BORDER_WIDTH: f32 = 2.0;
const INNER_PADDING: f32 = 12.0;
const SAFE_INSET: f32 = 8.0;
const RANK_SIZE: f32 = 26.0;
const SUIT_MINI_SIZE: f32 = 22.0;
const CORNER_TOP: f32 = 10.0;
const WATERMARK_SIZE: f32 = 92.0;
const WATERMARK_ALPHA: f32 = 0.12;
const LATTICE_STEP: usize = 10;
const EMBLEM_RADIUS: f32 = 26.0;

const PAPER_TOP: u32 = 0xfbfbf6;
const PAPER_BOTTOM: u32 = 0xf2efe7;
const BORDER_COLOR: u32 = 0xd6d1c6;
const INK_BLACK: u32 = 0x1a1a1f;
const INK_RED: u32 = 0xc62828;
const BACK_BASE: u32 = 0x0f3b2e;
const BACK_BORDER: u32 = 0xc7a24a;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn size() -> (u32, u32) {
    (CARD_W as u32, CARD_H as u32)
}

fn card_outline(stroke: ColorRgba8) -> DrawCmd {
    DrawCmd::RoundedRect {
        origin: [BORDER_WIDTH / 2.0, BORDER_WIDTH / 2.0],
        size: [CARD_W - BORDER_WIDTH, CARD_H - BORDER_WIDTH],
        radius: CORNER_RADIUS,
        fill: None,
        stroke: Some((stroke, BORDER_WIDTH)),
    }
}

fn glyph(text: &str, at: [f32; 2], size: f32, color: ColorRgba8, rotation: f32) -> DrawCmd {
    DrawCmd::Text {
        text: text.to_owned(),
        at,
        size,
        bold: false,
        color,
        rotation,
        align: TextAlign::Left,
    }
}

/// Face artwork: corner indices top-left and mirrored bottom-right, a faint
/// suit watermark in the middle, on rounded paper with a drop shadow.
pub fn face_artwork(card: Card) -> CardArtwork {
    let ink = rgb(if card.suit.is_red() { INK_RED } else { INK_BLACK }, 1.0);
    let rank = card.rank.label();
    let suit = card.suit.glyph();
    let mini_y = CORNER_TOP + RANK_SIZE + 2.0;
    let (width, height) = size();
    CardArtwork {
        label: card.to_string(),
        width,
        height,
        commands: vec![
            DrawCmd::Shadow {
                blur: 18.0,
                offset_y: 8.0,
                color: rgb(0x000000, 0.28),
            },
            DrawCmd::RoundedRect {
                origin: [0.0, 0.0],
                size: [CARD_W, CARD_H],
                radius: CORNER_RADIUS,
                fill: Some(Fill::VerticalGradient {
                    top: rgb(PAPER_TOP, 1.0),
                    bottom: rgb(PAPER_BOTTOM, 1.0),
                }),
                stroke: None,
            },
            card_outline(rgb(BORDER_COLOR, 1.0)),
            glyph(rank, [INNER_PADDING, CORNER_TOP], RANK_SIZE, ink, 0.0),
            glyph(suit, [INNER_PADDING, mini_y], SUIT_MINI_SIZE, ink, 0.0),
            glyph(
                rank,
                [CARD_W - INNER_PADDING, CARD_H - CORNER_TOP],
                RANK_SIZE,
                ink,
                PI,
            ),
            glyph(
                suit,
                [CARD_W - INNER_PADDING, CARD_H - mini_y],
                SUIT_MINI_SIZE,
                ink,
                PI,
            ),
            DrawCmd::Text {
                text: suit.to_owned(),
                at: [CARD_W / 2.0, CARD_H / 2.0 + 6.0],
                size: WATERMARK_SIZE,
                bold: false,
                color: rgb(if card.suit.is_red() { INK_RED } else { INK_BLACK }, WATERMARK_ALPHA),
                rotation: 0.0,
                align: TextAlign::Center,
            },
        ],
    }
}

/// Back artwork: felt green base, gold border, diagonal lattice, emblem.
#[allow(clippy::cast_precision_loss)]
pub fn back_artwork() -> CardArtwork {
    let gold = rgb(BACK_BORDER, 1.0);
    let lattice = rgb(BACK_BORDER, 0.12);
    let mut commands = vec![
        DrawCmd::RoundedRect {
            origin: [0.0, 0.0],
            size: [CARD_W, CARD_H],
            radius: CORNER_RADIUS,
            fill: Some(Fill::Solid(rgb(BACK_BASE, 1.0))),
            stroke: None,
        },
        card_outline(gold),
    ];
    let start = SAFE_INSET as usize;
    let end = (CARD_W - SAFE_INSET) as usize;
    for x in (start..end).step_by(LATTICE_STEP) {
        let x = x as f32;
        commands.push(DrawCmd::Line {
            from: [x, SAFE_INSET],
            to: [x + CARD_H, CARD_H - SAFE_INSET],
            width: 1.0,
            color: lattice,
        });
        commands.push(DrawCmd::Line {
            from: [x, CARD_H - SAFE_INSET],
            to: [x + CARD_H, SAFE_INSET],
            width: 1.0,
            color: lattice,
        });
    }
    commands.push(DrawCmd::Circle {
        center: [CARD_W / 2.0, CARD_H / 2.0],
        radius: EMBLEM_RADIUS,
        fill: Some(rgb(BACK_BORDER, 0.18)),
        stroke: None,
    });
    let (width, height) = size();
    CardArtwork {
        label: "back".into(),
        width,
        height,
        commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thousand_proto::{DeckKind, Rank, Suit};

    #[test]
    fn faces_are_deterministic_across_builds() {
        let card = Card::new(Rank::Queen, Suit::Hearts);
        assert_eq!(face_artwork(card), face_artwork(card));
        assert_eq!(face_artwork(card).fingerprint(), face_artwork(card).fingerprint());
    }

    #[test]
    fn every_face_is_distinct() {
        let prints: std::collections::HashSet<_> = DeckKind::Full
            .cards()
            .map(|c| face_artwork(c).fingerprint())
            .collect();
        assert_eq!(prints.len(), 52);
        assert!(!prints.contains(&back_artwork().fingerprint()));
    }

    #[test]
    fn red_suits_use_red_ink() {
        let art = face_artwork(Card::new(Rank::Nine, Suit::Diamonds));
        let inked = art.commands.iter().any(|c| {
            matches!(c, DrawCmd::Text { color, .. } if color[..3] == [0xc6, 0x28, 0x28])
        });
        assert!(inked);
    }

    #[test]
    fn back_has_lattice_and_emblem() {
        let art = back_artwork();
        let lines = art
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Line { .. }))
            .count();
        assert_eq!(lines, 26);
        assert!(matches!(art.commands.last(), Some(DrawCmd::Circle { .. })));
    }
}
