// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Surface port trait defining the backend contract.

use crate::{CardArtwork, Frame, SurfaceError, TextureHandle};

/// Rendering surface port.
///
/// # Design
///
/// Hexagonal port: the scene crate emits artworks and frames; adapters
/// (a GPU canvas, a terminal dump, a test mock) implement this trait.
///
/// # Texture ownership
///
/// A handle returned by [`rasterize`](Self::rasterize) stays valid until it
/// is passed to [`release`](Self::release). Callers release each handle
/// exactly once; backends may treat a second release as a bug.
pub trait SurfacePort {
    /// Rasterize a display list into a texture.
    fn rasterize(&mut self, artwork: &CardArtwork) -> Result<TextureHandle, SurfaceError>;

    /// Release a texture previously returned by `rasterize`.
    fn release(&mut self, texture: TextureHandle);

    /// Draw one frame. Sprites are in back-to-front order.
    fn present(&mut self, frame: &Frame);

    /// Viewport changed (logical size and device scale).
    fn resize(&mut self, width: u32, height: u32, scale: f32);
}
