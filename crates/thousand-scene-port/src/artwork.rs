// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic display lists for card faces and backs.
//!
//! An artwork is data, not pixels. The same artwork always produces the
//! same [`fingerprint`](CardArtwork::fingerprint), so a backend may key its
//! own raster cache on it and two runs can be compared byte for byte.

use crate::canon::canonicalize_f32;
use crate::types::{ColorRgba8, Hash};

/// Paint for filled shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    /// One flat color.
    Solid(ColorRgba8),
    /// Top-to-bottom linear gradient.
    VerticalGradient {
        /// Color at the top edge.
        top: ColorRgba8,
        /// Color at the bottom edge.
        bottom: ColorRgba8,
    },
}

/// Horizontal text anchoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the left edge.
    Left,
    /// Anchor is the centre.
    Center,
}

/// One drawing instruction, in artwork-local pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// Soft drop shadow under the following shape.
    Shadow {
        /// Blur radius.
        blur: f32,
        /// Vertical offset.
        offset_y: f32,
        /// Shadow color.
        color: ColorRgba8,
    },
    /// Rounded rectangle with optional outline.
    RoundedRect {
        /// Top-left `[x, y]`.
        origin: [f32; 2],
        /// `[width, height]`.
        size: [f32; 2],
        /// Corner radius.
        radius: f32,
        /// Interior paint.
        fill: Option<Fill>,
        /// Outline color and width.
        stroke: Option<(ColorRgba8, f32)>,
    },
    /// Straight line segment.
    Line {
        /// Start point.
        from: [f32; 2],
        /// End point.
        to: [f32; 2],
        /// Stroke width.
        width: f32,
        /// Stroke color.
        color: ColorRgba8,
    },
    /// Circle with optional fill and outline.
    Circle {
        /// Centre point.
        center: [f32; 2],
        /// Radius.
        radius: f32,
        /// Interior color.
        fill: Option<ColorRgba8>,
        /// Outline color and width.
        stroke: Option<(ColorRgba8, f32)>,
    },
    /// Text run, rotated about its anchor.
    Text {
        /// The glyphs.
        text: String,
        /// Anchor point.
        at: [f32; 2],
        /// Font size in px.
        size: f32,
        /// Bold weight.
        bold: bool,
        /// Ink color.
        color: ColorRgba8,
        /// Rotation in radians.
        rotation: f32,
        /// Anchoring.
        align: TextAlign,
    },
}

/// A complete card image description.
#[derive(Clone, Debug, PartialEq)]
pub struct CardArtwork {
    /// Human-readable name (`"10H"`, `"back"`).
    pub label: String,
    /// Raster width in px.
    pub width: u32,
    /// Raster height in px.
    pub height: u32,
    /// Drawing instructions, back to front.
    pub commands: Vec<DrawCmd>,
}

impl CardArtwork {
    /// BLAKE3 over the canonical byte encoding of the artwork.
    pub fn fingerprint(&self) -> Hash {
        let mut enc = Encoder(blake3::Hasher::new());
        enc.text(&self.label);
        enc.u32(self.width);
        enc.u32(self.height);
        enc.u32(u32::try_from(self.commands.len()).unwrap_or(u32::MAX));
        for cmd in &self.commands {
            enc.cmd(cmd);
        }
        *enc.0.finalize().as_bytes()
    }
}

struct Encoder(blake3::Hasher);

impl Encoder {
    fn tag(&mut self, tag: u8) {
        self.0.update(&[tag]);
    }

    fn u32(&mut self, v: u32) {
        self.0.update(&v.to_le_bytes());
    }

    fn f32(&mut self, v: f32) {
        self.0.update(&canonicalize_f32(v).to_le_bytes());
    }

    fn point(&mut self, p: [f32; 2]) {
        self.f32(p[0]);
        self.f32(p[1]);
    }

    fn color(&mut self, c: ColorRgba8) {
        self.0.update(&c);
    }

    fn text(&mut self, s: &str) {
        self.u32(u32::try_from(s.len()).unwrap_or(u32::MAX));
        self.0.update(s.as_bytes());
    }

    fn stroke(&mut self, stroke: Option<(ColorRgba8, f32)>) {
        match stroke {
            None => self.tag(0),
            Some((color, width)) => {
                self.tag(1);
                self.color(color);
                self.f32(width);
            }
        }
    }

    fn fill(&mut self, fill: Option<Fill>) {
        match fill {
            None => self.tag(0),
            Some(Fill::Solid(c)) => {
                self.tag(1);
                self.color(c);
            }
            Some(Fill::VerticalGradient { top, bottom }) => {
                self.tag(2);
                self.color(top);
                self.color(bottom);
            }
        }
    }

    fn cmd(&mut self, cmd: &DrawCmd) {
        match cmd {
            DrawCmd::Shadow {
                blur,
                offset_y,
                color,
            } => {
                self.tag(0x10);
                self.f32(*blur);
                self.f32(*offset_y);
                self.color(*color);
            }
            DrawCmd::RoundedRect {
                origin,
                size,
                radius,
                fill,
                stroke,
            } => {
                self.tag(0x11);
                self.point(*origin);
                self.point(*size);
                self.f32(*radius);
                self.fill(*fill);
                self.stroke(*stroke);
            }
            DrawCmd::Line {
                from,
                to,
                width,
                color,
            } => {
                self.tag(0x12);
                self.point(*from);
                self.point(*to);
                self.f32(*width);
                self.color(*color);
            }
            DrawCmd::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                self.tag(0x13);
                self.point(*center);
                self.f32(*radius);
                self.fill(fill.map(Fill::Solid));
                self.stroke(*stroke);
            }
            DrawCmd::Text {
                text,
                at,
                size,
                bold,
                color,
                rotation,
                align,
            } => {
                self.tag(0x14);
                self.text(text);
                self.point(*at);
                self.f32(*size);
                self.tag(u8::from(*bold));
                self.color(*color);
                self.f32(*rotation);
                self.tag(match align {
                    TextAlign::Left => 0,
                    TextAlign::Center => 1,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: &str, x: f32) -> CardArtwork {
        CardArtwork {
            label: label.into(),
            width: 140,
            height: 196,
            commands: vec![DrawCmd::Line {
                from: [x, 0.0],
                to: [10.0, 10.0],
                width: 1.0,
                color: [0, 0, 0, 255],
            }],
        }
    }

    #[test]
    fn fingerprint_is_stable() {
        assert_eq!(sample("AS", 1.0).fingerprint(), sample("AS", 1.0).fingerprint());
    }

    #[test]
    fn fingerprint_ignores_float_noise() {
        assert_eq!(
            sample("AS", 0.0).fingerprint(),
            sample("AS", -0.0).fingerprint()
        );
    }

    #[test]
    fn fingerprint_sees_content_changes() {
        assert_ne!(sample("AS", 1.0).fingerprint(), sample("KS", 1.0).fingerprint());
        assert_ne!(sample("AS", 1.0).fingerprint(), sample("AS", 2.0).fingerprint());
    }
}
