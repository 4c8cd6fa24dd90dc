// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transient-event inference from consecutive snapshots.
//!
//! The authority sends states, not animations. These rules guess what moved
//! between two states. A guess that cannot be made uniquely is not made: the
//! steady-state render is always correct on its own.
//!
//! # Known gap
//!
//! Only adjacent snapshots are compared. If the authority resolves a trick and
//! deals again before the client sees the intermediate state, both
//! `TrickCleared` and `DealtIn` are reported together (when the hand was empty
//! before), and a local play that happened inside the skipped state produces
//! no `CardPlayed`.

use thousand_proto::{Card, GameView};

/// The slice of a snapshot the differ looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDigest {
    /// Local hand.
    pub hand: Vec<Card>,
    /// Trick cards in play order.
    pub trick: Vec<Card>,
}

impl SnapshotDigest {
    /// Extract the digest of a snapshot.
    pub fn of(view: &GameView) -> Self {
        Self {
            hand: view.local_hand().to_vec(),
            trick: view.trick().to_vec(),
        }
    }
}

/// One inferred event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransientEvent {
    /// The local hand went from empty to non-empty.
    DealtIn,
    /// The local player put this card into the trick.
    CardPlayed(Card),
    /// The trick area emptied.
    TrickCleared,
}

/// Set of events inferred for one snapshot transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransientEvents {
    /// See [`TransientEvent::DealtIn`].
    pub dealt_in: bool,
    /// See [`TransientEvent::CardPlayed`].
    pub card_played: Option<Card>,
    /// See [`TransientEvent::TrickCleared`].
    pub trick_cleared: bool,
}

impl TransientEvents {
    /// No events.
    pub fn is_empty(&self) -> bool {
        !self.dealt_in && self.card_played.is_none() && !self.trick_cleared
    }

    /// Events as a list, in the order the coordinator applies them.
    pub fn to_vec(&self) -> Vec<TransientEvent> {
        let mut out = Vec::with_capacity(3);
        if self.trick_cleared {
            out.push(TransientEvent::TrickCleared);
        }
        if self.dealt_in {
            out.push(TransientEvent::DealtIn);
        }
        if let Some(card) = self.card_played {
            out.push(TransientEvent::CardPlayed(card));
        }
        out
    }
}

/// Infer transient events between two digests.
pub fn infer_events(previous: &SnapshotDigest, current: &SnapshotDigest) -> TransientEvents {
    TransientEvents {
        dealt_in: previous.hand.is_empty() && !current.hand.is_empty(),
        card_played: played_card(previous, current),
        trick_cleared: !previous.trick.is_empty() && current.trick.is_empty(),
    }
}

fn played_card(previous: &SnapshotDigest, current: &SnapshotDigest) -> Option<Card> {
    if current.trick.len() <= previous.trick.len() || previous.hand.len() <= current.hand.len() {
        return None;
    }
    let mut fresh = current
        .trick
        .iter()
        .filter(|card| !previous.trick.contains(card));
    match (fresh.next(), fresh.next()) {
        (Some(card), None) => Some(*card),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thousand_proto::DeckKind;

    fn cards(n: usize) -> Vec<Card> {
        DeckKind::Short.cards().take(n).collect()
    }

    fn digest(hand: &[Card], trick: &[Card]) -> SnapshotDigest {
        SnapshotDigest {
            hand: hand.to_vec(),
            trick: trick.to_vec(),
        }
    }

    #[test]
    fn empty_hand_to_seven_cards_is_deal_in() {
        let events = infer_events(&digest(&[], &[]), &digest(&cards(7), &[]));
        assert_eq!(
            events,
            TransientEvents {
                dealt_in: true,
                ..TransientEvents::default()
            }
        );
        assert_eq!(events.to_vec(), vec![TransientEvent::DealtIn]);
    }

    #[test]
    fn single_new_trick_card_from_hand_is_a_play() {
        let deck = cards(4);
        let (a, b) = (deck[0], deck[1]);
        let prev = digest(&[b, deck[2], deck[3]], &[a]);
        let cur = digest(&[deck[2], deck[3]], &[a, b]);
        assert_eq!(
            infer_events(&prev, &cur).to_vec(),
            vec![TransientEvent::CardPlayed(b)]
        );
    }

    #[test]
    fn full_trick_to_empty_is_cleared() {
        let deck = cards(5);
        let prev = digest(&deck[3..], &deck[..3]);
        let cur = digest(&deck[3..], &[]);
        assert_eq!(
            infer_events(&prev, &cur).to_vec(),
            vec![TransientEvent::TrickCleared]
        );
    }

    #[test]
    fn identical_snapshots_infer_nothing() {
        let deck = cards(6);
        let d = digest(&deck[..4], &deck[4..]);
        assert!(infer_events(&d, &d).is_empty());
    }

    #[test]
    fn bot_play_without_hand_change_is_not_a_local_play() {
        let deck = cards(4);
        let prev = digest(&deck[2..], &[deck[0]]);
        let cur = digest(&deck[2..], &[deck[0], deck[1]]);
        assert!(infer_events(&prev, &cur).is_empty());
    }

    #[test]
    fn ambiguous_play_degrades_to_no_animation() {
        let deck = cards(6);
        let prev = digest(&deck[2..], &[]);
        let cur = digest(&deck[3..], &[deck[0], deck[1]]);
        assert_eq!(infer_events(&prev, &cur).card_played, None);
    }

    #[test]
    fn clear_and_redeal_in_one_step_reports_both() {
        let deck = cards(10);
        let prev = digest(&[], &deck[..3]);
        let cur = digest(&deck[3..10], &[]);
        assert_eq!(
            infer_events(&prev, &cur).to_vec(),
            vec![TransientEvent::TrickCleared, TransientEvent::DealtIn]
        );
    }

    #[test]
    fn play_hidden_inside_skipped_snapshot_is_lost() {
        let deck = cards(8);
        let prev = digest(&deck[3..8], &deck[..2]);
        let cur = digest(&deck[4..8], &[]);
        let events = infer_events(&prev, &cur);
        assert!(events.trick_cleared);
        assert_eq!(events.card_played, None);
    }
}
