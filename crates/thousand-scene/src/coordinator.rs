// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scene coordinator: snapshot in, retained scene out.
//!
//! Each [`render`](SceneCoordinator::render) rebuilds every derived region
//! from the snapshot alone, then layers transient animation on top based on
//! what the differ inferred against the one digest kept from the previous
//! render. Frames are driven separately through
//! [`tick`](SceneCoordinator::tick); the two may interleave in any order.

use std::collections::BTreeSet;

use thousand_proto::{ActionKey, Card, DeckKind, GameView};
use thousand_scene_port::{Content, Region, SurfaceError, SurfacePort, Tint, Transform};
use tracing::{debug, info};

use crate::asset_cache::AssetCache;
use crate::differ::{infer_events, SnapshotDigest, TransientEvents};
use crate::layout::{
    bot_fan, bot_seats, deck_anchor, hand_positions, trick_center, trick_slots, trump_badge_anchor,
    Placement, Viewport, BOT_CARD_SCALE, TRICK_CAP,
};
use crate::router::{HitRegion, HitTarget, InteractionRouter};
use crate::scene::{NodeTag, SceneGraph};
use crate::tween::{OnComplete, TweenScheduler, TweenTo};

/// Vertical lift of a selected hand card (logical px before scaling).
const SELECT_LIFT: f32 = 18.0;
/// Most face-down cards drawn for the kitty stack.
const DECK_STACK: usize = 3;

/// Construction-time settings. Nothing is read from ambient state.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Deck whose faces are pre-generated.
    pub deck: DeckKind,
    /// Deal-in flight time of the first card (ms).
    pub deal_ms: f32,
    /// Extra flight time per subsequent dealt card (ms).
    pub deal_stagger_ms: f32,
    /// Hand → trick flight time (ms).
    pub play_ms: f32,
    /// Trick fade-out time (ms).
    pub clear_ms: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            deck: DeckKind::Short,
            deal_ms: 420.0,
            deal_stagger_ms: 45.0,
            play_ms: 320.0,
            clear_ms: 260.0,
        }
    }
}

/// Result of one render call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Viewport or assets not ready; the snapshot was dropped.
    NotReady,
    /// The scene now reflects the snapshot.
    Rendered {
        /// Generation issued for this render.
        generation: u64,
        /// Events inferred against the previous render.
        events: TransientEvents,
    },
}

/// Owns the scene, the tweens, the asset cache and the surface.
#[derive(Debug)]
pub struct SceneCoordinator<S: SurfacePort> {
    surface: S,
    config: SceneConfig,
    assets: Option<AssetCache>,
    viewport: Option<Viewport>,
    scene: SceneGraph,
    tweens: TweenScheduler,
    router: InteractionRouter,
    previous: Option<SnapshotDigest>,
    hand_layout: Vec<(Card, Placement)>,
    generation: u64,
}

impl<S: SurfacePort> SceneCoordinator<S> {
    /// New coordinator. Not ready until [`warm`](Self::warm) and
    /// [`resize`](Self::resize) have both succeeded.
    pub fn new(surface: S, config: SceneConfig) -> Self {
        Self {
            surface,
            config,
            assets: None,
            viewport: None,
            scene: SceneGraph::new(),
            tweens: TweenScheduler::new(),
            router: InteractionRouter::new(),
            previous: None,
            hand_layout: Vec::new(),
            generation: 0,
        }
    }

    /// Pre-generate card visuals. Idempotent.
    pub fn warm(&mut self) -> Result<(), SurfaceError> {
        if self.assets.is_none() {
            self.assets = Some(AssetCache::warm(&mut self.surface, self.config.deck)?);
        }
        Ok(())
    }

    /// Set the viewport. An unusable size makes the coordinator not ready.
    ///
    /// Existing nodes keep their positions until the next render.
    #[allow(clippy::cast_precision_loss)]
    pub fn resize(&mut self, width: u32, height: u32, scale: f32) {
        let viewport = Viewport::new(width as f32, height as f32, scale);
        self.viewport = viewport.is_usable().then_some(viewport);
        self.surface.resize(width, height, scale);
    }

    /// Whether a render would be accepted.
    pub fn is_ready(&self) -> bool {
        self.assets.is_some() && self.viewport.is_some()
    }

    /// Current generation (bumped by every accepted render and by resets).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The retained scene.
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The interaction router holding this generation's hit regions.
    pub fn router(&self) -> &InteractionRouter {
        &self.router
    }

    /// Running tweens.
    pub fn active_tweens(&self) -> usize {
        self.tweens.active()
    }

    /// The backend.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Rebuild the scene from `view`.
    ///
    /// `legal_keys` decides highlighting, `selection` lifts and highlights
    /// chosen cards. Non-legal hand cards are dimmed only while some card play
    /// is legal.
    pub fn render(
        &mut self,
        view: &GameView,
        legal_keys: &BTreeSet<ActionKey>,
        selection: &BTreeSet<Card>,
    ) -> Result<RenderOutcome, SurfaceError> {
        let (Some(viewport), Some(assets)) = (self.viewport, self.assets.as_mut()) else {
            debug!("render dropped: scene not ready");
            return Ok(RenderOutcome::NotReady);
        };
        self.generation += 1;
        let generation = self.generation;
        self.tweens.set_generation(generation);

        let current = SnapshotDigest::of(view);
        let events = self
            .previous
            .as_ref()
            .map(|prev| infer_events(prev, &current))
            .unwrap_or_default();
        if !events.is_empty() {
            debug!(generation, events = ?events.to_vec(), "transient events inferred");
        }
        let prior_layout = std::mem::take(&mut self.hand_layout);

        let mut pass = Pass {
            scene: &mut self.scene,
            tweens: &mut self.tweens,
            assets,
            surface: &mut self.surface,
            config: &self.config,
            vp: viewport,
        };
        pass.deck(view);
        pass.bots(view);
        pass.trump(view);
        pass.trick(view, &events, &prior_layout)?;
        let layout = pass.hand(view, &events, legal_keys, selection)?;

        self.register_hits(view, &viewport, &layout, generation);
        self.hand_layout = layout;
        self.previous = Some(current);
        Ok(RenderOutcome::Rendered { generation, events })
    }

    fn register_hits(
        &mut self,
        view: &GameView,
        vp: &Viewport,
        layout: &[(Card, Placement)],
        generation: u64,
    ) {
        self.router.begin(generation, view.rules.snos_cards);
        let half = [vp.card_width() / 2.0, vp.card_height() / 2.0];
        if view.round.kitty_count > 0 {
            let deck = deck_anchor(vp);
            self.router.register(
                generation,
                HitRegion {
                    center: [deck.x, deck.y],
                    half,
                    rotation: 0.0,
                    target: HitTarget::Deck,
                },
            );
        }
        for (card, place) in layout {
            self.router.register(
                generation,
                HitRegion {
                    center: [place.x, place.y],
                    half,
                    rotation: place.rotation,
                    target: HitTarget::HandCard(*card),
                },
            );
        }
    }

    /// Advance animation by `dt_ms` and present a frame.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tick(&mut self, dt_ms: f32) {
        self.tweens.tick(dt_ms, &mut self.scene);
        if let Some(vp) = self.viewport {
            let frame = self.scene.flatten(vp.width as u32, vp.height as u32);
            self.surface.present(&frame);
        }
    }

    /// Forget the retained digest and start a new generation (reconnect).
    ///
    /// The next render snaps without transient events. Running tweens finish
    /// against whatever nodes they still find.
    pub fn reset_session(&mut self) {
        self.generation += 1;
        self.previous = None;
        self.hand_layout.clear();
        self.router.begin(self.generation, 0);
        info!(generation = self.generation, "scene session reset");
    }

    /// Tear down: abandon tweens, drop every node, release every texture.
    /// Returns the surface to the caller.
    pub fn dispose(mut self) -> S {
        let abandoned = self.tweens.abandon_all();
        self.scene.clear();
        if let Some(assets) = self.assets.take() {
            assets.dispose(&mut self.surface);
        }
        debug!(abandoned, "scene coordinator disposed");
        self.surface
    }
}

/// Borrowed state for one render pass.
struct Pass<'a, S: SurfacePort> {
    scene: &'a mut SceneGraph,
    tweens: &'a mut TweenScheduler,
    assets: &'a mut AssetCache,
    surface: &'a mut S,
    config: &'a SceneConfig,
    vp: Viewport,
}

impl<S: SurfacePort> Pass<'_, S> {
    fn texture(&mut self, card: Card) -> Result<Content, SurfaceError> {
        Ok(Content::Texture(self.assets.card_visual(self.surface, card)?))
    }

    #[allow(clippy::cast_precision_loss)]
    fn deck(&mut self, view: &GameView) {
        self.scene.clear_region(Region::Deck);
        let kitty = view.round.kitty_count;
        if kitty == 0 {
            return;
        }
        let anchor = deck_anchor(&self.vp);
        let back = Content::Texture(self.assets.back_visual());
        let step = 2.0 * self.vp.scale;
        for i in 0..kitty.min(DECK_STACK) {
            let offset = i as f32 * step;
            let place = Placement::at(anchor.x + offset, anchor.y - offset);
            self.scene
                .spawn(Region::Deck, place.transform(self.vp.scale), back.clone());
        }
        let below = anchor.y + self.vp.card_height() / 2.0 + 14.0 * self.vp.scale;
        self.scene.spawn(
            Region::Deck,
            Transform::at(anchor.x, below),
            Content::Label(kitty.to_string()),
        );
    }

    fn bots(&mut self, view: &GameView) {
        self.scene.clear_region(Region::Bots);
        let opponents: Vec<_> = view.opponents().collect();
        let seats = bot_seats(opponents.len(), &self.vp);
        let back = Content::Texture(self.assets.back_visual());
        let card_scale = self.vp.scale * BOT_CARD_SCALE;
        for (player, seat) in opponents.into_iter().zip(seats) {
            let group = self
                .scene
                .spawn(Region::Bots, seat.transform(1.0), Content::Empty);
            for place in bot_fan(player.hand_count, &self.vp) {
                self.scene
                    .spawn_child(group, place.transform(card_scale), back.clone());
            }
            let name_y = self.vp.card_height() * BOT_CARD_SCALE / 2.0 + 16.0 * self.vp.scale;
            let label = format!("P{} · {}", player.id, player.game_score);
            if let Some(id) =
                self.scene
                    .spawn_child(group, Transform::at(0.0, name_y), Content::Label(label))
            {
                let on_turn = view.round.has_current && view.round.current_player == player.id;
                if let Some(node) = self.scene.node_mut(id) {
                    node.tint = if on_turn { Tint::Highlight } else { Tint::Normal };
                }
            }
        }
    }

    fn trump(&mut self, view: &GameView) {
        self.scene.clear_region(Region::TrumpBadge);
        if let Some(suit) = view.round.trump {
            let place = trump_badge_anchor(&self.vp);
            self.scene.spawn(
                Region::TrumpBadge,
                place.transform(self.vp.scale),
                Content::Label(suit.glyph().to_owned()),
            );
        }
    }

    fn trick(
        &mut self,
        view: &GameView,
        events: &TransientEvents,
        prior_layout: &[(Card, Placement)],
    ) -> Result<(), SurfaceError> {
        if events.trick_cleared {
            let leaving = self.scene.region_children(Region::Trick).to_vec();
            for id in leaving {
                self.scene.reparent(id, Region::Effects);
                let scale = self.scene.node(id).map_or(1.0, |n| n.transform.scale);
                self.tweens.tween(
                    self.scene,
                    id,
                    TweenTo::default().opacity(0.0).scale(scale * 0.6),
                    self.config.clear_ms,
                    OnComplete::Detach,
                );
            }
        } else {
            self.scene.clear_region(Region::Trick);
        }

        let cards = view.trick();
        if cards.len() > TRICK_CAP {
            debug!(
                cards = cards.len(),
                cap = TRICK_CAP,
                "trick larger than the slot count, extra cards not drawn"
            );
        }
        let slots = trick_slots(cards.len(), trick_center(&self.vp), &self.vp);
        for (&card, slot) in cards.iter().zip(&slots) {
            let content = self.texture(card)?;
            let rest = slot.transform(self.vp.scale);
            let id = self.scene.spawn(Region::Trick, rest, content.clone());
            let mut hidden = self
                .scene
                .find_tagged(Region::Effects, NodeTag::InFlight(card))
                .is_some();
            if events.card_played == Some(card) {
                if let Some((_, origin)) = prior_layout.iter().find(|(c, _)| *c == card) {
                    self.fly(card, content, origin.transform(self.vp.scale), rest);
                    hidden = true;
                }
            }
            if let Some(node) = self.scene.node_mut(id) {
                node.tag = Some(NodeTag::Card(card));
                node.visible = !hidden;
            }
        }
        Ok(())
    }

    /// Spawn a sprite that carries `card` from `from` to `to`, then removes
    /// itself and reveals the resting trick node for that card.
    fn fly(&mut self, card: Card, content: Content, from: Transform, to: Transform) {
        let sprite = self.scene.spawn(Region::Effects, from, content);
        if let Some(node) = self.scene.node_mut(sprite) {
            node.tag = Some(NodeTag::InFlight(card));
        }
        self.tweens.tween(
            self.scene,
            sprite,
            TweenTo::transform(to),
            self.config.play_ms,
            OnComplete::Callback(Box::new(move |scene: &mut SceneGraph| {
                scene.detach(sprite);
                if scene
                    .find_tagged(Region::Effects, NodeTag::InFlight(card))
                    .is_some()
                {
                    return;
                }
                if let Some(id) = scene.find_tagged(Region::Trick, NodeTag::Card(card)) {
                    if let Some(node) = scene.node_mut(id) {
                        node.visible = true;
                    }
                }
            })),
        );
    }

    #[allow(clippy::cast_precision_loss)]
    fn hand(
        &mut self,
        view: &GameView,
        events: &TransientEvents,
        legal_keys: &BTreeSet<ActionKey>,
        selection: &BTreeSet<Card>,
    ) -> Result<Vec<(Card, Placement)>, SurfaceError> {
        self.scene.clear_region(Region::Hand);
        let hand = view.local_hand();
        let fan = hand_positions(hand.len(), &self.vp);
        let plays_offered = legal_keys.iter().any(ActionKey::is_play);
        let deck = deck_anchor(&self.vp).transform(self.vp.scale);
        let mut layout = Vec::with_capacity(hand.len());
        for (i, (&card, place)) in hand.iter().zip(&fan).enumerate() {
            let content = self.texture(card)?;
            let selected = selection.contains(&card);
            let mut rest = *place;
            if selected {
                rest.y -= SELECT_LIFT * self.vp.scale;
            }
            let tint = if selected || legal_keys.contains(&ActionKey::play(card)) {
                Tint::Highlight
            } else if plays_offered {
                Tint::Dimmed
            } else {
                Tint::Normal
            };
            let target = rest.transform(self.vp.scale);
            let start = if events.dealt_in { deck } else { target };
            let id = self.scene.spawn(Region::Hand, start, content);
            if let Some(node) = self.scene.node_mut(id) {
                node.tag = Some(NodeTag::Card(card));
                node.tint = tint;
            }
            if events.dealt_in {
                let duration = self.config.deal_ms + i as f32 * self.config.deal_stagger_ms;
                self.tweens.tween(
                    self.scene,
                    id,
                    TweenTo::transform(target),
                    duration,
                    OnComplete::Nothing,
                );
            }
            layout.push((card, rest));
        }
        Ok(layout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::MockSurface;
    use crate::router::RouterOutcome;
    use approx::assert_relative_eq;
    use thousand_proto::{legal_keys, LegalAction, Phase, PlayerView, RoundView, Suit};

    fn deck() -> Vec<Card> {
        DeckKind::Short.cards().collect()
    }

    fn view(hand: &[Card], trick: &[Card], legal: Vec<LegalAction>) -> GameView {
        let bot = |id| PlayerView {
            id,
            hand_count: 7,
            ..PlayerView::default()
        };
        GameView {
            players: vec![
                PlayerView {
                    id: 0,
                    hand: hand.to_vec(),
                    hand_count: hand.len(),
                    ..PlayerView::default()
                },
                bot(1),
                bot(2),
            ],
            round: RoundView {
                phase: Phase::PlayTricks,
                trump: Some(Suit::Hearts),
                trick_cards: trick.to_vec(),
                ..RoundView::default()
            },
            legal_actions: legal,
            ..GameView::default()
        }
    }

    fn ready() -> SceneCoordinator<MockSurface> {
        let mut c = SceneCoordinator::new(MockSurface::new(), SceneConfig::default());
        c.warm().unwrap();
        c.resize(1280, 800, 0.6);
        c
    }

    fn render(c: &mut SceneCoordinator<MockSurface>, v: &GameView) -> TransientEvents {
        let keys = legal_keys(&v.legal_actions);
        match c.render(v, &keys, &BTreeSet::new()).unwrap() {
            RenderOutcome::Rendered { events, .. } => events,
            RenderOutcome::NotReady => panic!("coordinator not ready"),
        }
    }

    fn effects(c: &SceneCoordinator<MockSurface>) -> usize {
        c.scene().region_children(Region::Effects).len()
    }

    #[test]
    fn render_before_ready_is_dropped() {
        let mut c = SceneCoordinator::new(MockSurface::new(), SceneConfig::default());
        let v = view(&deck()[..7], &[], vec![]);
        let out = c.render(&v, &BTreeSet::new(), &BTreeSet::new()).unwrap();
        assert_eq!(out, RenderOutcome::NotReady);
        c.warm().unwrap();
        assert_eq!(
            c.render(&v, &BTreeSet::new(), &BTreeSet::new()).unwrap(),
            RenderOutcome::NotReady
        );
        assert_eq!(c.generation(), 0);
        assert!(c.scene().region_children(Region::Hand).is_empty());
        c.resize(0, 800, 1.0);
        assert!(!c.is_ready());
        assert_eq!(c.surface().viewport.0, 0);
    }

    #[test]
    fn resize_reaches_the_surface_once() {
        let mut c = SceneCoordinator::new(MockSurface::new(), SceneConfig::default());
        c.resize(1280, 800, 1.0);
        assert_eq!(c.surface().resize_count, 1);
        c.resize(640, 400, 2.0);
        assert_eq!(c.surface().resize_count, 2);
        assert_eq!(c.surface().viewport.0, 640);
        assert_eq!(c.surface().viewport.1, 400);
    }

    #[test]
    fn oversized_trick_draws_only_capped_slots() {
        let mut c = ready();
        let d = deck();
        let v = view(&d[..5], &d[5..9], vec![]);
        render(&mut c, &v);
        assert_eq!(c.scene().region_children(Region::Trick).len(), TRICK_CAP);
    }

    #[test]
    fn rendering_same_snapshot_twice_is_quiet() {
        let mut c = ready();
        let d = deck();
        let v = view(&d[..6], &d[6..8], vec![]);
        render(&mut c, &v);
        let events = render(&mut c, &v);
        assert!(events.is_empty());
        assert_eq!(effects(&c), 0);
        assert_eq!(c.active_tweens(), 0);
        assert_eq!(c.scene().region_children(Region::Hand).len(), 6);
        assert_eq!(c.scene().region_children(Region::Trick).len(), 2);
    }

    #[test]
    fn deal_in_starts_hand_at_deck_and_settles_on_fan() {
        let mut c = ready();
        let d = deck();
        render(&mut c, &view(&[], &[], vec![]));
        let events = render(&mut c, &view(&d[..7], &[], vec![]));
        assert!(events.dealt_in);
        assert_eq!(c.active_tweens(), 7);

        let vp = Viewport::new(1280.0, 800.0, 0.6);
        let origin = deck_anchor(&vp);
        let first = c.scene().region_children(Region::Hand)[0];
        assert_relative_eq!(c.scene().node(first).unwrap().transform.x, origin.x);

        c.tick(420.0 + 6.0 * 45.0);
        assert_eq!(c.active_tweens(), 0);
        let fan = hand_positions(7, &vp);
        for (id, place) in c.scene().region_children(Region::Hand).iter().zip(&fan) {
            let t = c.scene().node(*id).unwrap().transform;
            assert_relative_eq!(t.x, place.x, epsilon = 1e-3);
            assert_relative_eq!(t.y, place.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn first_render_and_reset_never_animate() {
        let mut c = ready();
        let d = deck();
        assert!(render(&mut c, &view(&d[..7], &[], vec![])).is_empty());
        render(&mut c, &view(&[], &[], vec![]));
        c.reset_session();
        assert!(render(&mut c, &view(&d[..7], &[], vec![])).is_empty());
        assert_eq!(c.active_tweens(), 0);
    }

    #[test]
    fn played_card_flies_then_lands() {
        let mut c = ready();
        let d = deck();
        let (a, b) = (d[0], d[1]);
        render(&mut c, &view(&[b, d[2], d[3]], &[a], vec![]));
        let events = render(&mut c, &view(&[d[2], d[3]], &[a, b], vec![]));
        assert_eq!(events.card_played, Some(b));

        let sprite = c
            .scene()
            .find_tagged(Region::Effects, NodeTag::InFlight(b))
            .unwrap();
        assert_eq!(effects(&c), 1);
        let resting = c
            .scene()
            .find_tagged(Region::Trick, NodeTag::Card(b))
            .unwrap();
        assert!(!c.scene().node(resting).unwrap().visible);

        c.tick(160.0);
        assert!(c.scene().contains(sprite));
        c.tick(160.0);
        assert!(!c.scene().contains(sprite));
        assert_eq!(effects(&c), 0);
        assert!(c.scene().node(resting).unwrap().visible);
    }

    #[test]
    fn rerender_mid_flight_keeps_card_hidden_until_landing() {
        let mut c = ready();
        let d = deck();
        let (a, b) = (d[0], d[1]);
        render(&mut c, &view(&[b, d[2]], &[a], vec![]));
        let after = view(&[d[2]], &[a, b], vec![]);
        render(&mut c, &after);
        c.tick(100.0);
        render(&mut c, &after);
        let resting = c
            .scene()
            .find_tagged(Region::Trick, NodeTag::Card(b))
            .unwrap();
        assert!(!c.scene().node(resting).unwrap().visible);
        c.tick(400.0);
        let resting = c
            .scene()
            .find_tagged(Region::Trick, NodeTag::Card(b))
            .unwrap();
        assert!(c.scene().node(resting).unwrap().visible);
    }

    #[test]
    fn cleared_trick_fades_out_then_detaches() {
        let mut c = ready();
        let d = deck();
        render(&mut c, &view(&d[3..8], &d[..3], vec![]));
        let events = render(&mut c, &view(&d[3..8], &[], vec![]));
        assert!(events.trick_cleared);
        assert!(c.scene().region_children(Region::Trick).is_empty());
        assert_eq!(effects(&c), 3);

        c.tick(130.0);
        let fading = c.scene().region_children(Region::Effects)[0];
        assert!(c.scene().node(fading).unwrap().transform.opacity < 1.0);
        c.tick(130.0);
        assert_eq!(effects(&c), 0);
    }

    #[test]
    fn legal_cards_highlight_and_others_dim() {
        let mut c = ready();
        let d = deck();
        let legal = vec![LegalAction::PlayCard {
            card: d[1],
            marriage_suit: None,
        }];
        render(&mut c, &view(&d[..3], &[], legal));
        let tints: Vec<Tint> = c
            .scene()
            .region_children(Region::Hand)
            .iter()
            .map(|id| c.scene().node(*id).unwrap().tint)
            .collect();
        assert_eq!(tints, vec![Tint::Dimmed, Tint::Highlight, Tint::Dimmed]);

        render(&mut c, &view(&d[..3], &[], vec![LegalAction::Pass]));
        let any_dimmed = c
            .scene()
            .region_children(Region::Hand)
            .iter()
            .any(|id| c.scene().node(*id).unwrap().tint == Tint::Dimmed);
        assert!(!any_dimmed);
    }

    #[test]
    fn hit_regions_follow_each_render() {
        let mut c = ready();
        let d = deck();
        let legal = vec![LegalAction::PlayCard {
            card: d[0],
            marriage_suit: None,
        }];
        let v = view(&d[..1], &[], legal.clone());
        let keys = legal_keys(&v.legal_actions);
        let RenderOutcome::Rendered { generation, .. } =
            c.render(&v, &keys, &BTreeSet::new()).unwrap()
        else {
            panic!("not rendered");
        };
        assert_eq!(c.router().generation(), generation);
        let spot = hand_positions(1, &Viewport::new(1280.0, 800.0, 0.6))[0];
        assert_eq!(
            c.router().pointer(spot.x, spot.y, &legal, &BTreeSet::new()),
            RouterOutcome::Intent(legal[0].clone())
        );
        c.reset_session();
        assert!(c.router().regions().is_empty());
    }

    #[test]
    fn tick_presents_flattened_scene() {
        let mut c = ready();
        let d = deck();
        render(&mut c, &view(&d[..4], &d[4..5], vec![]));
        c.tick(16.0);
        let frame = c.surface().last_frame.clone().unwrap();
        assert_eq!(frame.in_region(Region::Hand).count(), 4);
        assert_eq!(frame.in_region(Region::Trick).count(), 1);
        assert_eq!(frame.in_region(Region::TrumpBadge).count(), 1);
        assert!(frame.in_region(Region::Bots).count() >= 14);
    }

    #[test]
    fn dispose_releases_all_textures_once() {
        let mut c = ready();
        let d = deck();
        render(&mut c, &view(&d[..7], &[], vec![]));
        let surface = c.dispose();
        assert_eq!(surface.live_textures(), 0);
        assert_eq!(surface.release_count(), 25);
        assert_eq!(surface.double_releases(), 0);
    }
}
