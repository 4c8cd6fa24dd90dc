// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pointer hit-testing and gesture → intent translation.
//!
//! The coordinator re-registers every hit region on each render under a new
//! generation. Registrations stamped with any other generation are ignored,
//! so a late registration from a superseded render can never steer input.

use std::collections::BTreeSet;

use thousand_proto::{ActionIntent, Card, LegalAction, RulesView};

/// Something a pointer can land on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// A card in the local hand.
    HandCard(Card),
    /// The stock / kitty.
    Deck,
}

/// Rotated rectangle bound to a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRegion {
    /// Centre `[x, y]`.
    pub center: [f32; 2],
    /// Half extents `[w/2, h/2]`.
    pub half: [f32; 2],
    /// Rotation in radians.
    pub rotation: f32,
    /// What the region stands for.
    pub target: HitTarget,
}

impl HitRegion {
    /// Whether `(x, y)` falls inside the rotated rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let (sin, cos) = (-self.rotation).sin_cos();
        let dx = x - self.center[0];
        let dy = y - self.center[1];
        let lx = dx * cos - dy * sin;
        let ly = dx * sin + dy * cos;
        lx.abs() <= self.half[0] && ly.abs() <= self.half[1]
    }

    /// World point at `(fx, fy)` half-extents from the centre, in the
    /// region's rotated frame. `(0, 0)` is the centre, `(-1, 0)` the left edge.
    pub fn point_at(&self, fx: f32, fy: f32) -> [f32; 2] {
        let (sin, cos) = self.rotation.sin_cos();
        let lx = fx * self.half[0];
        let ly = fy * self.half[1];
        [
            self.center[0] + lx * cos - ly * sin,
            self.center[1] + lx * sin + ly * cos,
        ]
    }
}

/// Result of routing one pointer press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterOutcome {
    /// Send this intent to the authority.
    Intent(ActionIntent),
    /// Add or remove the card from the local selection.
    ToggleSelection(Card),
    /// Nothing actionable was hit.
    Nothing,
}

/// Generation-tagged hit regions.
#[derive(Debug, Default)]
pub struct InteractionRouter {
    generation: u64,
    regions: Vec<HitRegion>,
    discard_limit: usize,
}

impl InteractionRouter {
    /// Empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new generation, dropping all regions. A generation that is not
    /// newer than the current one is refused.
    pub fn begin(&mut self, generation: u64, discard_limit: usize) -> bool {
        if generation <= self.generation {
            return false;
        }
        self.generation = generation;
        self.discard_limit = discard_limit;
        self.regions.clear();
        true
    }

    /// Register a region for `generation`. Returns whether it was accepted.
    pub fn register(&mut self, generation: u64, region: HitRegion) -> bool {
        if generation != self.generation {
            return false;
        }
        self.regions.push(region);
        true
    }

    /// Registered regions, bottom to top.
    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    /// Topmost target under the point. Later registrations are on top.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<HitTarget> {
        self.regions
            .iter()
            .rev()
            .find(|r| r.contains(x, y))
            .map(|r| r.target)
    }

    /// Translate a pointer press into an outcome.
    ///
    /// A hand card yields a `play_card` intent when one is legal for it,
    /// preferring the variant that declares a marriage. Otherwise, while a
    /// discard set is legal, the card toggles in or out of the selection
    /// (adding stops once the selection is full). The deck yields
    /// `take_kitty` when legal.
    pub fn pointer(
        &self,
        x: f32,
        y: f32,
        legal: &[LegalAction],
        selection: &BTreeSet<Card>,
    ) -> RouterOutcome {
        match self.hit_test(x, y) {
            Some(HitTarget::HandCard(card)) => self.on_card(card, legal, selection),
            Some(HitTarget::Deck) if legal.contains(&LegalAction::TakeKitty) => {
                RouterOutcome::Intent(LegalAction::TakeKitty)
            }
            _ => RouterOutcome::Nothing,
        }
    }

    fn on_card(
        &self,
        card: Card,
        legal: &[LegalAction],
        selection: &BTreeSet<Card>,
    ) -> RouterOutcome {
        if let Some(play) = preferred_play(card, legal) {
            return RouterOutcome::Intent(play.clone());
        }
        let discarding = legal
            .iter()
            .any(|a| matches!(a, LegalAction::DiscardSet { .. }));
        if !discarding {
            return RouterOutcome::Nothing;
        }
        let full = self.discard_limit > 0 && selection.len() >= self.discard_limit;
        if selection.contains(&card) || !full {
            RouterOutcome::ToggleSelection(card)
        } else {
            RouterOutcome::Nothing
        }
    }
}

fn preferred_play(card: Card, legal: &[LegalAction]) -> Option<&LegalAction> {
    let mut plays = legal.iter().filter(|a| a.card() == Some(card));
    let first = plays.next()?;
    Some(
        core::iter::once(first)
            .chain(plays)
            .find(|a| {
                matches!(
                    a,
                    LegalAction::PlayCard {
                        marriage_suit: Some(_),
                        ..
                    }
                )
            })
            .unwrap_or(first),
    )
}

/// Build the discard-set intent once the selection holds exactly the number
/// of cards the rules ask for and a discard set is legal.
pub fn discard_intent(
    selection: &BTreeSet<Card>,
    legal: &[LegalAction],
    rules: &RulesView,
) -> Option<ActionIntent> {
    let discarding = legal
        .iter()
        .any(|a| matches!(a, LegalAction::DiscardSet { .. }));
    (discarding && rules.snos_cards > 0 && selection.len() == rules.snos_cards).then(|| {
        LegalAction::DiscardSet {
            cards: selection.iter().copied().collect(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use thousand_proto::{Rank, Suit};

    const KH: Card = Card::new(Rank::King, Suit::Hearts);
    const NC: Card = Card::new(Rank::Nine, Suit::Clubs);

    fn region(x: f32, target: HitTarget) -> HitRegion {
        HitRegion {
            center: [x, 100.0],
            half: [30.0, 45.0],
            rotation: 0.0,
            target,
        }
    }

    fn router_with(cards: &[(f32, Card)]) -> InteractionRouter {
        let mut router = InteractionRouter::new();
        router.begin(1, 2);
        for (x, card) in cards {
            router.register(1, region(*x, HitTarget::HandCard(*card)));
        }
        router
    }

    #[test]
    fn topmost_region_wins() {
        let router = router_with(&[(100.0, NC), (120.0, KH)]);
        assert_eq!(router.hit_test(110.0, 100.0), Some(HitTarget::HandCard(KH)));
        assert_eq!(router.hit_test(75.0, 100.0), Some(HitTarget::HandCard(NC)));
        assert_eq!(router.hit_test(500.0, 100.0), None);
    }

    #[test]
    fn rotated_regions_hit_test_in_local_space() {
        let r = HitRegion {
            center: [0.0, 0.0],
            half: [10.0, 40.0],
            rotation: core::f32::consts::FRAC_PI_2,
            target: HitTarget::Deck,
        };
        assert!(r.contains(35.0, 0.0));
        assert!(!r.contains(0.0, 35.0));
        let [x, y] = r.point_at(0.0, 0.9);
        assert!(r.contains(x, y));
        assert!(!r.contains(y, x));
        let [x, y] = r.point_at(0.0, 1.2);
        assert!(!r.contains(x, y));
    }

    #[test]
    fn stale_generation_registrations_are_ignored() {
        let mut router = router_with(&[(100.0, NC)]);
        assert!(router.begin(2, 2));
        assert!(!router.register(1, region(100.0, HitTarget::HandCard(NC))));
        assert_eq!(router.hit_test(100.0, 100.0), None);
        assert!(!router.begin(1, 2));
        assert_eq!(router.generation(), 2);
    }

    #[test]
    fn play_prefers_marriage_variant() {
        let router = router_with(&[(100.0, KH)]);
        let legal = vec![
            LegalAction::PlayCard {
                card: KH,
                marriage_suit: None,
            },
            LegalAction::PlayCard {
                card: KH,
                marriage_suit: Some(Suit::Hearts),
            },
        ];
        assert_eq!(
            router.pointer(100.0, 100.0, &legal, &BTreeSet::new()),
            RouterOutcome::Intent(LegalAction::PlayCard {
                card: KH,
                marriage_suit: Some(Suit::Hearts),
            })
        );
    }

    #[test]
    fn illegal_card_does_nothing() {
        let router = router_with(&[(100.0, NC)]);
        let legal = vec![LegalAction::Pass];
        assert_eq!(
            router.pointer(100.0, 100.0, &legal, &BTreeSet::new()),
            RouterOutcome::Nothing
        );
    }

    #[test]
    fn discard_selection_toggles_until_full() {
        let router = router_with(&[(100.0, NC), (300.0, KH)]);
        let legal = vec![LegalAction::DiscardSet { cards: vec![] }];
        let mut selection = BTreeSet::new();
        assert_eq!(
            router.pointer(100.0, 100.0, &legal, &selection),
            RouterOutcome::ToggleSelection(NC)
        );
        selection.insert(NC);
        let ace = Card::new(Rank::Ace, Suit::Spades);
        selection.insert(ace);
        assert_eq!(
            router.pointer(300.0, 100.0, &legal, &selection),
            RouterOutcome::Nothing
        );
        assert_eq!(
            router.pointer(100.0, 100.0, &legal, &selection),
            RouterOutcome::ToggleSelection(NC)
        );
    }

    #[test]
    fn discard_intent_needs_exact_count() {
        let legal = vec![LegalAction::DiscardSet { cards: vec![] }];
        let rules = RulesView {
            snos_cards: 2,
            ..RulesView::default()
        };
        let mut selection = BTreeSet::from([NC]);
        assert_eq!(discard_intent(&selection, &legal, &rules), None);
        selection.insert(KH);
        assert_eq!(
            discard_intent(&selection, &legal, &rules),
            Some(LegalAction::DiscardSet {
                cards: vec![NC, KH]
            })
        );
        assert_eq!(discard_intent(&selection, &[], &rules), None);
    }

    #[test]
    fn deck_tap_takes_kitty_when_legal() {
        let mut router = InteractionRouter::new();
        router.begin(1, 0);
        router.register(1, region(50.0, HitTarget::Deck));
        assert_eq!(
            router.pointer(50.0, 100.0, &[LegalAction::TakeKitty], &BTreeSet::new()),
            RouterOutcome::Intent(LegalAction::TakeKitty)
        );
        assert_eq!(
            router.pointer(50.0, 100.0, &[], &BTreeSet::new()),
            RouterOutcome::Nothing
        );
    }
}
