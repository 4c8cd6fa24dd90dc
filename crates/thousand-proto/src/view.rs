// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Game-view snapshot: the authority's per-player projection of table state.
//!
//! A snapshot is total. Everything needed to draw the table is in here; the
//! renderer only looks at an earlier snapshot to guess which animation to play.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::action::LegalAction;
use crate::card::{Card, Suit};

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Round phase as named by the authority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a game to start.
    #[default]
    Lobby,
    /// Cards are being dealt.
    Deal,
    /// Players bid for the contract.
    Bidding,
    /// Bid winner takes the kitty.
    KittyTake,
    /// Bid winner hands cards to opponents.
    Snos,
    /// Tricks are being played.
    PlayTricks,
    /// Round totals are being applied.
    ScoreRound,
    /// Someone reached the target score.
    GameOver,
    /// A phase name this client does not know.
    #[serde(other)]
    Unknown,
}

/// Per-player view. `hand` is only present for the local player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// Seat index.
    pub id: usize,
    /// Cards in hand (local player only).
    #[serde(default, deserialize_with = "null_as_default")]
    pub hand: Vec<Card>,
    /// Number of cards in hand (all players).
    #[serde(default)]
    pub hand_count: usize,
    /// Points taken this round.
    #[serde(default)]
    pub round_pts: i32,
    /// Running game score.
    #[serde(default)]
    pub game_score: i32,
    /// Tricks won this round.
    #[serde(default)]
    pub tricks: usize,
    /// Bolt (zero-round) marks.
    #[serde(default)]
    pub bolts: u32,
    /// Whether the player is "on the barrel".
    #[serde(default)]
    pub on_barrel: bool,
    /// Barrel attempts used.
    #[serde(default)]
    pub barrel_attempts: u32,
}

/// Round view: phase, seats of interest, trump, trick in play order, bids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    /// Current phase.
    #[serde(default)]
    pub phase: Phase,
    /// Dealer seat.
    #[serde(default)]
    pub dealer: usize,
    /// Seat that led the current trick.
    #[serde(default)]
    pub leader: usize,
    /// Trump suit once chosen.
    #[serde(default)]
    pub trump: Option<Suit>,
    /// Cards left in the kitty.
    #[serde(default)]
    pub kitty_count: usize,
    /// Seat whose turn it is to bid.
    #[serde(default)]
    pub bid_turn: usize,
    /// Seat that won the bidding.
    #[serde(default)]
    pub bid_winner: usize,
    /// Winning bid value.
    #[serde(default)]
    pub bid_value: i32,
    /// Bids by seat.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bids: BTreeMap<usize, i32>,
    /// Passed flags by seat.
    #[serde(default, deserialize_with = "null_as_default")]
    pub passed: BTreeMap<usize, bool>,
    /// Cards in the trick area, in play order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trick_cards: Vec<Card>,
    /// Seat that played each trick card.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trick_order: Vec<usize>,
    /// Game winner (valid when `has_winner`).
    #[serde(default)]
    pub winner: usize,
    /// Whether the game has a winner.
    #[serde(default)]
    pub has_winner: bool,
    /// Seat expected to act (valid when `has_current`).
    #[serde(default)]
    pub current_player: usize,
    /// Whether any seat is expected to act.
    #[serde(default)]
    pub has_current: bool,
}

/// Rule parameters in force for the session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesView {
    /// Cards dealt to each hand.
    #[serde(default)]
    pub deal_hand_size: usize,
    /// Cards in hand once play starts.
    #[serde(default)]
    pub play_hand_size: usize,
    /// Cards in the kitty.
    #[serde(default)]
    pub kitty_size: usize,
    /// Opening bid.
    #[serde(default)]
    pub bid_min: u32,
    /// Bid increment.
    #[serde(default)]
    pub bid_step: u32,
    /// Highest allowed bid.
    #[serde(default)]
    pub max_bid: u32,
    /// Cards handed off during snos (the discard count).
    #[serde(default)]
    pub snos_cards: usize,
    /// Barrel attempts allowed.
    #[serde(default)]
    pub barrel_attempts: u32,
}

/// Round-end side effects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectsView {
    /// Seats whose score was dumped this round.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dumped: Vec<usize>,
}

/// Session identity for this view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaView {
    /// Authority session id.
    #[serde(default)]
    pub session_id: String,
    /// Seat of the local player.
    #[serde(default)]
    pub player_id: usize,
}

/// Complete snapshot of the table from the local player's seat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    /// One entry per seat.
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<PlayerView>,
    /// Round state.
    #[serde(default)]
    pub round: RoundView,
    /// Rule parameters.
    #[serde(default)]
    pub rules: RulesView,
    /// Actions the local player may attempt right now.
    #[serde(default, deserialize_with = "null_as_default")]
    pub legal_actions: Vec<LegalAction>,
    /// Round-end effects.
    #[serde(default)]
    pub effects: EffectsView,
    /// Session identity.
    #[serde(default)]
    pub meta: MetaView,
}

impl GameView {
    /// The local player's view, if the seat exists.
    pub fn local_player(&self) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == self.meta.player_id)
    }

    /// Cards in the local hand (empty when unknown).
    pub fn local_hand(&self) -> &[Card] {
        self.local_player()
            .map(|p| p.hand.as_slice())
            .unwrap_or_default()
    }

    /// Cards in the trick area, in play order.
    pub fn trick(&self) -> &[Card] {
        &self.round.trick_cards
    }

    /// Every seat except the local one, in seat order.
    pub fn opponents(&self) -> impl Iterator<Item = &PlayerView> {
        let me = self.meta.player_id;
        self.players.iter().filter(move |p| p.id != me)
    }

    /// Whether the local seat is the one expected to act.
    pub fn is_local_turn(&self) -> bool {
        self.round.has_current && self.round.current_player == self.meta.player_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::card::Rank;

    const AUTHORITY_STATE: &str = r#"{
        "players": [
            {"id":0,"hand":[{"suit":"H","rank":"A"},{"suit":"S","rank":"9"}],"handCount":2,
             "roundPts":0,"gameScore":120,"tricks":1,"bolts":0,"onBarrel":false,"barrelAttempts":0},
            {"id":1,"handCount":7,"roundPts":0,"gameScore":40,"tricks":0,"bolts":1,"onBarrel":false,"barrelAttempts":0},
            {"id":2,"handCount":7,"roundPts":0,"gameScore":0,"tricks":0,"bolts":0,"onBarrel":true,"barrelAttempts":1}
        ],
        "round": {"phase":"PlayTricks","dealer":2,"leader":1,"trump":"D","kittyCount":0,
                  "bidTurn":0,"bidWinner":0,"bidValue":120,"bids":{"0":120,"1":110},"passed":null,
                  "trickCards":[{"suit":"D","rank":"10"}],"trickOrder":[1],"winner":0,"hasWinner":false,
                  "currentPlayer":0,"hasCurrent":true},
        "rules": {"dealHandSize":7,"playHandSize":8,"kittySize":3,"bidMin":100,"bidStep":5,
                  "maxBid":300,"snosCards":2,"barrelAttempts":3},
        "legalActions": [{"type":"play_card","card":{"suit":"H","rank":"A"}}],
        "effects": {"dumped":null},
        "meta": {"sessionId":"20240101120000","playerId":0}
    }"#;

    #[test]
    fn decodes_authority_payload() {
        let view: GameView = serde_json::from_str(AUTHORITY_STATE).unwrap();
        assert_eq!(view.round.phase, Phase::PlayTricks);
        assert_eq!(view.round.trump, Some(Suit::Diamonds));
        assert_eq!(view.round.bids.get(&1), Some(&110));
        assert!(view.round.passed.is_empty());
        assert!(view.effects.dumped.is_empty());
        assert_eq!(view.local_hand().len(), 2);
        assert_eq!(view.trick(), &[Card::new(Rank::Ten, Suit::Diamonds)]);
        assert_eq!(view.opponents().count(), 2);
        assert!(view.is_local_turn());
    }

    #[test]
    fn unknown_phase_and_missing_sections_default() {
        let view: GameView =
            serde_json::from_str(r#"{"round":{"phase":"Intermission"},"meta":{"playerId":0}}"#)
                .unwrap();
        assert_eq!(view.round.phase, Phase::Unknown);
        assert!(view.local_hand().is_empty());
        assert!(view.trick().is_empty());
    }
}
