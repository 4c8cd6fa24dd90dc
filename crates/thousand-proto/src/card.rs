// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Card values: suits, ranks, and the configurable deck domain.
//!
//! Identity is structural. Two `Card`s with the same rank and suit are the
//! same card everywhere (asset cache keys, trick diffs, hit targets).

use core::fmt;
use serde::{Deserialize, Serialize};

/// Card suit. Wire form is the single-letter code used by the authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs (`C`).
    #[serde(rename = "C")]
    Clubs,
    /// Diamonds (`D`).
    #[serde(rename = "D")]
    Diamonds,
    /// Hearts (`H`).
    #[serde(rename = "H")]
    Hearts,
    /// Spades (`S`).
    #[serde(rename = "S")]
    Spades,
}

impl Suit {
    /// All suits in wire order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Single-letter wire code.
    pub fn code(self) -> &'static str {
        match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        }
    }

    /// Printed glyph used on card faces and the trump badge.
    pub fn glyph(self) -> &'static str {
        match self {
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
        }
    }

    /// Hearts and diamonds print in red ink.
    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    /// Parse the single-letter code (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" | "c" => Some(Suit::Clubs),
            "D" | "d" => Some(Suit::Diamonds),
            "H" | "h" => Some(Suit::Hearts),
            "S" | "s" => Some(Suit::Spades),
            _ => None,
        }
    }
}

/// Card rank. The Thousand deck uses `9..=A`; the lower ranks exist so a
/// full 52-card deck can be configured without changing the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// 2
    #[serde(rename = "2")]
    Two,
    /// 3
    #[serde(rename = "3")]
    Three,
    /// 4
    #[serde(rename = "4")]
    Four,
    /// 5
    #[serde(rename = "5")]
    Five,
    /// 6
    #[serde(rename = "6")]
    Six,
    /// 7
    #[serde(rename = "7")]
    Seven,
    /// 8
    #[serde(rename = "8")]
    Eight,
    /// 9
    #[serde(rename = "9")]
    Nine,
    /// 10
    #[serde(rename = "10")]
    Ten,
    /// Jack
    #[serde(rename = "J")]
    Jack,
    /// Queen
    #[serde(rename = "Q")]
    Queen,
    /// King
    #[serde(rename = "K")]
    King,
    /// Ace
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// Ranks of the 24-card Thousand deck.
    pub const SHORT: [Rank; 6] = [
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Ranks of the standard 52-card deck.
    pub const FULL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Printed label (`"10"`, `"Q"`, ...), identical to the wire code.
    pub fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    /// Parse a printed label (`"10"`, `"q"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        Rank::FULL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(label))
    }
}

/// A playing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Suit of the card.
    pub suit: Suit,
    /// Rank of the card.
    pub rank: Rank,
}

impl Card {
    /// Construct a card.
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Parse the compact form printed by `Display` (`"10H"`, `"qs"`).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let split = text.len().checked_sub(1)?;
        if !text.is_char_boundary(split) {
            return None;
        }
        let (rank, suit) = text.split_at(split);
        Some(Card::new(Rank::from_label(rank)?, Suit::from_code(suit)?))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.label(), self.suit.code())
    }
}

/// Which rank×suit product the table pre-generates visuals for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckKind {
    /// 24 cards: `9, 10, J, Q, K, A` in four suits.
    #[default]
    Short,
    /// 52 cards: `2..=A` in four suits.
    Full,
}

impl DeckKind {
    /// Ranks included in this deck.
    pub fn ranks(self) -> &'static [Rank] {
        match self {
            DeckKind::Short => &Rank::SHORT,
            DeckKind::Full => &Rank::FULL,
        }
    }

    /// Every card of the deck, suit-major.
    pub fn cards(self) -> impl Iterator<Item = Card> {
        Suit::ALL
            .into_iter()
            .flat_map(move |suit| self.ranks().iter().map(move |&rank| Card::new(rank, suit)))
    }

    /// Number of distinct faces.
    pub fn size(self) -> usize {
        self.ranks().len() * Suit::ALL.len()
    }
}
