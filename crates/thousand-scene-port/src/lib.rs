// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Surface port contract for the Thousand table.
//!
//! The scene crate owns layout, animation and the node tree. A backend only
//! has to turn [`CardArtwork`] display lists into textures and draw the flat
//! [`Frame`] it is handed each tick.
//!
//! # Design Principles
//!
//! - **Backends are dumb.** They rasterize and draw. No game logic.
//! - **No time ownership.** Frame pacing comes from the driver, not the backend.
//! - **Explicit lifetimes.** Every texture a backend issues is released by the
//!   caller exactly once.

use thiserror::Error;

/// Error type for surface operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The backend could not rasterize an artwork.
    #[error("rasterize failed for {label}: {reason}")]
    Rasterize {
        /// Artwork label (`"10H"`, `"back"`).
        label: String,
        /// Backend explanation.
        reason: String,
    },
    /// The backend has been torn down.
    #[error("surface is gone")]
    Gone,
}

mod artwork;
mod canon;
mod port;
mod types;

pub use artwork::{CardArtwork, DrawCmd, Fill, TextAlign};
pub use canon::{canonicalize_f32, canonicalize_point};
pub use port::SurfacePort;
pub use types::{
    rgb, ColorRgba8, Content, Frame, Hash, NodeId, Region, Sprite, TextureHandle, Tint, Transform,
};
