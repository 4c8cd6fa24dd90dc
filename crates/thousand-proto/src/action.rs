// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Legal actions (authority → client) and action intents (client → authority).
//!
//! Both directions share one tagged enum: the authority lists what may be
//! attempted, the client echoes one of those variants back inside a
//! `player_action` message.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};

/// Tagged action variant. The tag lives in the `type` field on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LegalAction {
    /// Place a bid of `bid` points.
    Bid {
        /// Bid value.
        #[serde(default)]
        bid: u32,
    },
    /// Pass on bidding.
    Pass,
    /// Choose the trump suit.
    ChooseTrump {
        /// The suit to make trump.
        suit: Suit,
    },
    /// Take the kitty into hand.
    TakeKitty,
    /// Hand off a set of cards to opponents ("snos").
    #[serde(rename = "snos")]
    DiscardSet {
        /// Cards to pass, in opponent order.
        #[serde(default)]
        cards: Vec<Card>,
    },
    /// Play a card into the trick, optionally declaring a marriage.
    PlayCard {
        /// The card to play.
        card: Card,
        /// Marriage suit declared alongside the play.
        #[serde(
            rename = "marriageSuit",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        marriage_suit: Option<Suit>,
    },
    /// Declare the special concession ("rospis").
    #[serde(rename = "rospis")]
    DeclareSpecial,
    /// A tag this client does not know. Never offered to the user.
    #[serde(other)]
    Unknown,
}

/// Outbound intents use the same shape as legal actions.
pub type ActionIntent = LegalAction;

/// Stable string key for an action, used for highlight lookups.
///
/// Keys identify *what* can be done, not how: `play_card:10H` is the same key
/// whether or not a marriage is declared with it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionKey(String);

impl ActionKey {
    /// Key for playing a specific card.
    pub fn play(card: Card) -> Self {
        Self(format!("play_card:{card}"))
    }

    /// Borrow the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key names playing one specific card.
    pub fn is_play(&self) -> bool {
        self.0.starts_with("play_card:")
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl LegalAction {
    /// Wire tag for this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            LegalAction::Bid { .. } => "bid",
            LegalAction::Pass => "pass",
            LegalAction::ChooseTrump { .. } => "choose_trump",
            LegalAction::TakeKitty => "take_kitty",
            LegalAction::DiscardSet { .. } => "snos",
            LegalAction::PlayCard { .. } => "play_card",
            LegalAction::DeclareSpecial => "rospis",
            LegalAction::Unknown => "unknown",
        }
    }

    /// Highlight key for this action.
    pub fn key(&self) -> ActionKey {
        match self {
            LegalAction::Bid { bid } => ActionKey(format!("bid:{bid}")),
            LegalAction::ChooseTrump { suit } => ActionKey(format!("choose_trump:{}", suit.code())),
            LegalAction::PlayCard { card, .. } => ActionKey::play(*card),
            other => ActionKey(other.tag().to_string()),
        }
    }

    /// The single card this action is about, if any.
    pub fn card(&self) -> Option<Card> {
        match self {
            LegalAction::PlayCard { card, .. } => Some(*card),
            _ => None,
        }
    }

    /// Whether the action asks the user to pick cards from the hand.
    pub fn selects_cards(&self) -> bool {
        matches!(
            self,
            LegalAction::PlayCard { .. } | LegalAction::DiscardSet { .. }
        )
    }
}

/// Collect the highlight keys for a list of legal actions.
pub fn legal_keys<'a, I>(actions: I) -> std::collections::BTreeSet<ActionKey>
where
    I: IntoIterator<Item = &'a LegalAction>,
{
    actions
        .into_iter()
        .filter(|a| !matches!(a, LegalAction::Unknown))
        .map(LegalAction::key)
        .collect()
}
