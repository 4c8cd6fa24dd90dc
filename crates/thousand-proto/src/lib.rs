// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire schema for the Thousand table.
//!
//! The authority is the system of record. It pushes complete [`GameView`]
//! snapshots and accepts [`ClientMessage`]s; this crate only describes those
//! shapes. It knows nothing about rendering or transport.
//!
//! - [`card`]: cards, suits, ranks, deck domains.
//! - [`action`]: legal actions / outbound intents and their highlight keys.
//! - [`view`]: the snapshot projection.
//! - [`message`]: inbound/outbound message envelopes and action ids.
//! - [`wire`]: JSON text framing.

pub mod action;
pub mod card;
pub mod message;
pub mod view;
pub mod wire;

pub use action::{legal_keys, ActionIntent, ActionKey, LegalAction};
pub use card::{Card, DeckKind, Rank, Suit};
pub use message::{ActionId, AuthorityEvent, ClientMessage, ErrorView, ServerMessage};
pub use view::{
    EffectsView, GameView, MetaView, Phase, PlayerView, RoundView, RulesView,
};
pub use wire::{decode_server_message, encode_client_message, WireError};
