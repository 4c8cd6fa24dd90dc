// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless `SurfacePort`: keeps texture bookkeeping and the last presented
//! frame so the driver can report what would be on screen.

use std::collections::BTreeMap;

use thousand_scene_port::{
    CardArtwork, Content, Frame, Hash, Region, SurfaceError, SurfacePort, TextureHandle, Tint,
};
use tracing::{trace, warn};

#[derive(Debug, Clone)]
struct Texture {
    label: String,
    fingerprint: Hash,
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    textures: BTreeMap<TextureHandle, Texture>,
    next_handle: u64,
    frames: u64,
    last: Option<Frame>,
    size: (u32, u32, f32),
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn label_of(&self, handle: TextureHandle) -> Option<&str> {
        self.textures.get(&handle).map(|t| t.label.as_str())
    }

    /// A viewport line, then one line per region, e.g. `Hand: AH 10S* 9C~`.
    ///
    /// `*` marks highlighted sprites, `~` dimmed ones.
    pub fn describe(&self) -> Vec<String> {
        let Some(frame) = &self.last else {
            return vec!["(nothing presented)".into()];
        };
        let (w, h, scale) = self.size;
        let header = format!("surface {w}x{h} @{scale} ({} textures)", self.textures.len());
        let regions = Region::ALL.into_iter().map(|region| {
            let items: Vec<String> = frame
                .in_region(region)
                .map(|s| {
                    let name = match &s.content {
                        Content::Texture(h) => self.label_of(*h).unwrap_or("?").to_owned(),
                        Content::Label(text) => format!("\"{text}\""),
                        Content::Empty => String::new(),
                    };
                    let mark = match s.tint {
                        Tint::Normal => "",
                        Tint::Highlight => "*",
                        Tint::Dimmed => "~",
                    };
                    format!("{name}{mark}")
                })
                .collect();
            format!("{region:?}: {}", items.join(" "))
        });
        core::iter::once(header).chain(regions).collect()
    }
}

impl SurfacePort for HeadlessSurface {
    fn rasterize(&mut self, art: &CardArtwork) -> Result<TextureHandle, SurfaceError> {
        if art.width == 0 || art.height == 0 {
            return Err(SurfaceError::Rasterize {
                label: art.label.clone(),
                reason: "empty canvas".into(),
            });
        }
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        let fingerprint = art.fingerprint();
        trace!(label = %art.label, ?handle, "rasterized");
        self.textures.insert(
            handle,
            Texture {
                label: art.label.clone(),
                fingerprint,
            },
        );
        Ok(handle)
    }

    fn release(&mut self, handle: TextureHandle) {
        match self.textures.remove(&handle) {
            Some(tex) => trace!(label = %tex.label, fingerprint = ?tex.fingerprint, "released"),
            None => warn!(?handle, "release of unknown texture"),
        }
    }

    fn present(&mut self, frame: &Frame) {
        self.frames += 1;
        self.last = Some(frame.clone());
    }

    fn resize(&mut self, width: u32, height: u32, scale: f32) {
        self.size = (width, height, scale);
    }
}
