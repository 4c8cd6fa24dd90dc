// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Memoised card textures.
//!
//! Every face of the configured deck plus one back is rasterized once when the
//! cache is warmed. A card outside the deck is rasterized on first request and
//! kept. Handles are immutable and shared by every region of the scene.
//!
//! # Ownership
//!
//! The cache owns its handles; the surface owns the pixels behind them.
//! [`AssetCache::dispose`] consumes the cache and releases every handle
//! exactly once, so a disposed cache cannot be asked for a visual again.

use std::collections::HashMap;

use thousand_proto::{Card, DeckKind};
use thousand_scene_port::{SurfaceError, SurfacePort, TextureHandle};
use tracing::{debug, warn};

use crate::artwork::{back_artwork, face_artwork};

/// Face and back textures keyed by card.
#[derive(Debug)]
pub struct AssetCache {
    faces: HashMap<Card, TextureHandle>,
    back: TextureHandle,
    generated: usize,
}

impl AssetCache {
    /// Rasterize the back and every face of `deck`.
    ///
    /// On failure, textures already produced are released before returning.
    pub fn warm<S: SurfacePort + ?Sized>(
        surface: &mut S,
        deck: DeckKind,
    ) -> Result<Self, SurfaceError> {
        let back = surface.rasterize(&back_artwork())?;
        let mut cache = Self {
            faces: HashMap::with_capacity(deck.size()),
            back,
            generated: 1,
        };
        for card in deck.cards() {
            if let Err(err) = cache.card_visual(surface, card) {
                warn!(%card, error = %err, "asset warm-up failed; releasing partial cache");
                cache.dispose(surface);
                return Err(err);
            }
        }
        debug!(faces = cache.faces.len(), "asset cache warm");
        Ok(cache)
    }

    /// Texture for `card`, rasterizing it on first use.
    pub fn card_visual<S: SurfacePort + ?Sized>(
        &mut self,
        surface: &mut S,
        card: Card,
    ) -> Result<TextureHandle, SurfaceError> {
        if let Some(handle) = self.faces.get(&card) {
            return Ok(*handle);
        }
        let handle = surface.rasterize(&face_artwork(card))?;
        self.generated += 1;
        self.faces.insert(card, handle);
        Ok(handle)
    }

    /// Texture for `card` if it has been generated.
    pub fn cached(&self, card: Card) -> Option<TextureHandle> {
        self.faces.get(&card).copied()
    }

    /// The shared card-back texture.
    pub fn back_visual(&self) -> TextureHandle {
        self.back
    }

    /// Number of face textures held.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Total rasterizations performed over the cache's lifetime (faces + back).
    pub fn generated(&self) -> usize {
        self.generated
    }

    /// Release every texture exactly once.
    pub fn dispose<S: SurfacePort + ?Sized>(self, surface: &mut S) {
        let count = self.faces.len() + 1;
        for (_, handle) in self.faces {
            surface.release(handle);
        }
        surface.release(self.back);
        debug!(count, "asset cache disposed");
    }
}
