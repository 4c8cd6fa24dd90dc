// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mock surface for headless testing of the scene crate.
//!
//! Tracks issued and released textures and keeps the last presented frame,
//! without rasterizing anything.

use std::collections::BTreeSet;

use thousand_scene_port::{CardArtwork, Frame, SurfaceError, SurfacePort, TextureHandle};

/// Mock surface backend for testing.
#[derive(Debug, Default)]
pub struct MockSurface {
    /// Labels of every artwork rasterized, in order.
    pub rasterized: Vec<String>,
    live: BTreeSet<TextureHandle>,
    released: usize,
    double_releases: usize,
    next_handle: u64,
    fail_label: Option<String>,
    /// Number of `present` calls.
    pub present_count: u32,
    /// The most recently presented frame.
    pub last_frame: Option<Frame>,
    /// Current viewport dimensions.
    pub viewport: (u32, u32, f32),
    /// Number of `resize` calls.
    pub resize_count: u32,
}

impl MockSurface {
    /// Create a new mock surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `rasterize` fail for the artwork with this label.
    pub fn fail_on(&mut self, label: &str) {
        self.fail_label = Some(label.to_owned());
    }

    /// Number of successful rasterizations.
    pub fn rasterize_count(&self) -> usize {
        self.rasterized.len()
    }

    /// Number of release calls for live handles.
    pub fn release_count(&self) -> usize {
        self.released
    }

    /// Handles issued and not yet released.
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Release calls for handles that were not live.
    pub fn double_releases(&self) -> usize {
        self.double_releases
    }
}

impl SurfacePort for MockSurface {
    fn rasterize(&mut self, artwork: &CardArtwork) -> Result<TextureHandle, SurfaceError> {
        if self.fail_label.as_deref() == Some(artwork.label.as_str()) {
            return Err(SurfaceError::Rasterize {
                label: artwork.label.clone(),
                reason: "mock failure".into(),
            });
        }
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        self.live.insert(handle);
        self.rasterized.push(artwork.label.clone());
        Ok(handle)
    }

    fn release(&mut self, texture: TextureHandle) {
        if self.live.remove(&texture) {
            self.released += 1;
        } else {
            self.double_releases += 1;
        }
    }

    fn present(&mut self, frame: &Frame) {
        self.present_count += 1;
        self.last_frame = Some(frame.clone());
    }

    fn resize(&mut self, width: u32, height: u32, scale: f32) {
        self.resize_count += 1;
        self.viewport = (width, height, scale);
    }
}
