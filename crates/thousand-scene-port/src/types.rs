// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core scene types shared by the scene crate and surface backends.

/// 32-byte content fingerprint.
pub type Hash = [u8; 32];

/// RGBA color with 8-bit components.
pub type ColorRgba8 = [u8; 4];

/// Build a color from a `0xRRGGBB` literal and an alpha in `[0, 1]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb(hex: u32, alpha: f32) -> ColorRgba8 {
    let [_, r, g, b] = hex.to_be_bytes();
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    [r, g, b, a]
}

/// Backend-issued texture handle. Opaque to the scene.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureHandle(pub u64);

/// Scene node id. Issued monotonically, never reused.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Named top-level groups of the table scene, in draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// Face-down stock / kitty.
    Deck,
    /// Opponent seats and their face-down fans.
    Bots,
    /// Cards played into the current trick.
    Trick,
    /// The local player's hand.
    Hand,
    /// Trump suit indicator.
    TrumpBadge,
    /// Transient sprites owned by running tweens.
    Effects,
}

impl Region {
    /// All regions, back to front.
    pub const ALL: [Region; 6] = [
        Region::Deck,
        Region::Bots,
        Region::Trick,
        Region::Hand,
        Region::TrumpBadge,
        Region::Effects,
    ];

    /// Whether the region is rebuilt from each snapshot.
    ///
    /// `Effects` is the only region whose children are spawned and retired
    /// through the animation scheduler instead.
    pub fn is_derived(self) -> bool {
        !matches!(self, Region::Effects)
    }
}

/// Visual emphasis applied to a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tint {
    /// Drawn as-is.
    #[default]
    Normal,
    /// Legal or selected: raised and outlined.
    Highlight,
    /// Not currently playable: still visible, de-emphasized.
    Dimmed,
}

/// What a node draws.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Content {
    /// Pure grouping node.
    #[default]
    Empty,
    /// A cached texture.
    Texture(TextureHandle),
    /// A short text label (seat names, trump glyph, counts).
    Label(String),
}

/// Local transform of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Horizontal position (logical px).
    pub x: f32,
    /// Vertical position (logical px).
    pub y: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No offset, no rotation, full size, fully opaque.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    /// Identity moved to `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::IDENTITY
        }
    }

    /// Builder: set rotation.
    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Compose `child` under `self`: rotate and scale the child's offset,
    /// then add rotations, multiply scales and opacities.
    pub fn then(&self, child: &Transform) -> Transform {
        let (sin, cos) = self.rotation.sin_cos();
        let cx = child.x * self.scale;
        let cy = child.y * self.scale;
        Transform {
            x: self.x + cx * cos - cy * sin,
            y: self.y + cx * sin + cy * cos,
            rotation: self.rotation + child.rotation,
            scale: self.scale * child.scale,
            opacity: self.opacity * child.opacity,
        }
    }
}

/// One drawable in a presented frame, already in world space.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Source node.
    pub node: NodeId,
    /// Region the node lives under.
    pub region: Region,
    /// World transform.
    pub transform: Transform,
    /// What to draw.
    pub content: Content,
    /// Emphasis.
    pub tint: Tint,
}

/// Flattened scene handed to [`SurfacePort::present`](crate::SurfacePort::present).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    /// Sprites back to front.
    pub sprites: Vec<Sprite>,
}

impl Frame {
    /// Sprites belonging to one region.
    pub fn in_region(&self, region: Region) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(move |s| s.region == region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_unpacks_hex() {
        assert_eq!(rgb(0xc62828, 1.0), [0xc6, 0x28, 0x28, 0xff]);
        assert_eq!(rgb(0x000000, 0.0)[3], 0);
    }

    #[test]
    fn transform_composes_rotation_and_opacity() {
        let parent = Transform {
            opacity: 0.5,
            ..Transform::at(100.0, 50.0).rotated(core::f32::consts::FRAC_PI_2)
        };
        let world = parent.then(&Transform::at(10.0, 0.0));
        assert!((world.x - 100.0).abs() < 1e-4);
        assert!((world.y - 60.0).abs() < 1e-4);
        assert!((world.opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn only_effects_is_not_derived() {
        let derived: Vec<_> = Region::ALL.into_iter().filter(|r| r.is_derived()).collect();
        assert_eq!(derived.len(), 5);
        assert!(!Region::Effects.is_derived());
    }
}
