// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure state transitions for the table (connection, snapshot, selection).

use std::collections::BTreeSet;

use thousand_app_core::toast::ToastKind;
use thousand_proto::{
    legal_keys, ActionIntent, Card, ClientMessage, ErrorView, GameView, LegalAction, Phase,
};
use thousand_scene::discard_intent;
use thousand_session_client::{ChannelState, ChannelStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Connecting,
    Lobby,
    Table,
    Disconnected(String),
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub screen: Screen,
    pub connection: ChannelState,
    pub view: Option<Box<GameView>>,
    pub selection: BTreeSet<Card>,
    pub quitting: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Connecting,
            connection: ChannelState::Connecting,
            view: None,
            selection: BTreeSet::new(),
            quitting: false,
        }
    }

    fn legal(&self) -> &[LegalAction] {
        self.view
            .as_deref()
            .map(|v| v.legal_actions.as_slice())
            .unwrap_or_default()
    }

    fn discarding(&self) -> bool {
        self.legal()
            .iter()
            .any(|a| matches!(a, LegalAction::DiscardSet { .. }))
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Status(ChannelStatus),
    Snapshot(Box<GameView>),
    Rejected(ErrorView),
    Intent(ActionIntent),
    ToggleSelection(Card),
    StartGame(String),
    RequestState,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    Send(ClientMessage),
    Render,
    ResetScene,
    ScheduleReconnect,
    ReconnectSucceeded,
    Toast(ToastKind, String, Option<String>),
    Log(String),
    Quit,
}

fn on_status(next: &mut UiState, status: ChannelStatus, fx: &mut Vec<UiEffect>) {
    let was = next.connection;
    next.connection = status.state;
    match status.state {
        ChannelState::Open => {
            next.screen = if next.view.is_some() {
                Screen::Table
            } else {
                Screen::Lobby
            };
            fx.push(UiEffect::ReconnectSucceeded);
            fx.push(UiEffect::ResetScene);
            fx.push(UiEffect::Send(ClientMessage::JoinSession));
            fx.push(UiEffect::Log("Connected".into()));
        }
        ChannelState::Closed if !next.quitting => {
            let reason = status
                .last_error
                .unwrap_or_else(|| "connection closed".into());
            next.screen = Screen::Disconnected(reason.clone());
            next.selection.clear();
            if was != ChannelState::Closed {
                fx.push(UiEffect::Toast(
                    ToastKind::Warn,
                    "Disconnected".into(),
                    Some(reason.clone()),
                ));
                fx.push(UiEffect::Log(format!("Disconnected: {reason}")));
            }
            fx.push(UiEffect::ScheduleReconnect);
        }
        ChannelState::Connecting => next.screen = Screen::Connecting,
        ChannelState::Closing | ChannelState::Closed => {}
    }
}

fn on_snapshot(next: &mut UiState, view: Box<GameView>, fx: &mut Vec<UiEffect>) {
    next.screen = if view.round.phase == Phase::Lobby {
        Screen::Lobby
    } else {
        Screen::Table
    };
    let hand: BTreeSet<Card> = view.local_hand().iter().copied().collect();
    next.view = Some(view);
    if next.discarding() {
        next.selection.retain(|c| hand.contains(c));
    } else {
        next.selection.clear();
    }
    fx.push(UiEffect::Render);
}

fn on_intent(next: &mut UiState, intent: ActionIntent, fx: &mut Vec<UiEffect>) {
    let offered = legal_keys(next.legal()).contains(&intent.key());
    if !offered {
        fx.push(UiEffect::Log(format!("{} is not offered right now", intent.key())));
        return;
    }
    if matches!(intent, LegalAction::DiscardSet { .. }) {
        next.selection.clear();
        fx.push(UiEffect::Render);
    }
    fx.push(UiEffect::Send(ClientMessage::action(intent)));
}

fn on_toggle(next: &mut UiState, card: Card, fx: &mut Vec<UiEffect>) {
    if !next.discarding() {
        return;
    }
    if !next.selection.remove(&card) {
        next.selection.insert(card);
    }
    let ready = next
        .view
        .as_deref()
        .and_then(|v| discard_intent(&next.selection, &v.legal_actions, &v.rules));
    if let Some(intent) = ready {
        next.selection.clear();
        fx.push(UiEffect::Send(ClientMessage::action(intent)));
    }
    fx.push(UiEffect::Render);
}

pub fn reduce(ui: &UiState, ev: UiEvent) -> (UiState, Vec<UiEffect>) {
    let mut next = ui.clone();
    let mut fx = Vec::new();
    match ev {
        UiEvent::Status(status) => on_status(&mut next, status, &mut fx),
        UiEvent::Snapshot(view) => on_snapshot(&mut next, view, &mut fx),
        UiEvent::Rejected(err) => {
            fx.push(UiEffect::Toast(
                ToastKind::Error,
                err.code.clone(),
                Some(err.message.clone()),
            ));
            fx.push(UiEffect::Log(format!("Rejected ({}): {}", err.code, err.message)));
        }
        UiEvent::Intent(intent) => on_intent(&mut next, intent, &mut fx),
        UiEvent::ToggleSelection(card) => on_toggle(&mut next, card, &mut fx),
        UiEvent::StartGame(ruleset) => fx.push(UiEffect::Send(ClientMessage::StartGame { ruleset })),
        UiEvent::RequestState => fx.push(UiEffect::Send(ClientMessage::RequestState)),
        UiEvent::Quit => {
            next.quitting = true;
            fx.push(UiEffect::Quit);
        }
    }
    (next, fx)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use thousand_proto::{Rank, RulesView, Suit};

    const NC: Card = Card::new(Rank::Nine, Suit::Clubs);
    const JS: Card = Card::new(Rank::Jack, Suit::Spades);
    const AH: Card = Card::new(Rank::Ace, Suit::Hearts);

    fn open() -> ChannelStatus {
        ChannelStatus {
            state: ChannelState::Open,
            last_error: None,
        }
    }

    fn snos_view() -> Box<GameView> {
        let mut view = GameView::default();
        view.players.push(thousand_proto::PlayerView {
            id: 0,
            hand: vec![NC, JS, AH],
            hand_count: 3,
            ..Default::default()
        });
        view.round.phase = Phase::Snos;
        view.rules = RulesView {
            snos_cards: 2,
            ..Default::default()
        };
        view.legal_actions = vec![LegalAction::DiscardSet { cards: vec![] }];
        Box::new(view)
    }

    fn sent(fx: &[UiEffect]) -> Vec<&ClientMessage> {
        fx.iter()
            .filter_map(|f| match f {
                UiEffect::Send(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn open_joins_and_resets_scene() {
        let (ui, fx) = reduce(&UiState::new(), UiEvent::Status(open()));
        assert_eq!(ui.screen, Screen::Lobby);
        assert!(fx.contains(&UiEffect::ResetScene));
        assert_eq!(sent(&fx), [&ClientMessage::JoinSession]);
    }

    #[test]
    fn close_schedules_reconnect_unless_quitting() {
        let (ui, _) = reduce(&UiState::new(), UiEvent::Status(open()));
        let closed = ChannelStatus {
            state: ChannelState::Closed,
            last_error: Some("reset by peer".into()),
        };
        let (dropped, fx) = reduce(&ui, UiEvent::Status(closed.clone()));
        assert_eq!(dropped.screen, Screen::Disconnected("reset by peer".into()));
        assert!(fx.contains(&UiEffect::ScheduleReconnect));
        assert!(fx.iter().any(|f| matches!(f, UiEffect::Toast(ToastKind::Warn, ..))));

        let (quitting, _) = reduce(&ui, UiEvent::Quit);
        let (_, fx) = reduce(&quitting, UiEvent::Status(closed));
        assert!(!fx.contains(&UiEffect::ScheduleReconnect));
    }

    #[test]
    fn authority_error_toasts_and_keeps_snapshot() {
        let (ui, _) = reduce(&UiState::new(), UiEvent::Snapshot(snos_view()));
        let (ui, fx) = reduce(
            &ui,
            UiEvent::Rejected(ErrorView {
                code: "apply_failed".into(),
                message: "not your turn".into(),
            }),
        );
        assert!(ui.view.is_some());
        assert!(fx.iter().any(
            |f| matches!(f, UiEffect::Toast(ToastKind::Error, code, _) if code == "apply_failed")
        ));
    }

    #[test]
    fn selection_fills_then_sends_discard_set() {
        let (ui, _) = reduce(&UiState::new(), UiEvent::Snapshot(snos_view()));
        let (ui, fx) = reduce(&ui, UiEvent::ToggleSelection(NC));
        assert!(sent(&fx).is_empty());
        assert!(ui.selection.contains(&NC));
        let (ui, fx) = reduce(&ui, UiEvent::ToggleSelection(JS));
        assert!(ui.selection.is_empty());
        let msgs = sent(&fx);
        assert_eq!(msgs.len(), 1);
        let ClientMessage::PlayerAction { action, .. } = msgs[0] else {
            panic!("expected player_action, got {:?}", msgs[0]);
        };
        assert_eq!(action, &LegalAction::DiscardSet { cards: vec![NC, JS] });
    }

    #[test]
    fn selection_drops_when_discard_no_longer_offered() {
        let (ui, _) = reduce(&UiState::new(), UiEvent::Snapshot(snos_view()));
        let (ui, _) = reduce(&ui, UiEvent::ToggleSelection(AH));
        let mut play = snos_view();
        play.round.phase = Phase::PlayTricks;
        play.legal_actions = vec![LegalAction::PlayCard {
            card: AH,
            marriage_suit: None,
        }];
        let (ui, fx) = reduce(&ui, UiEvent::Snapshot(play));
        assert!(ui.selection.is_empty());
        assert_eq!(ui.screen, Screen::Table);
        assert!(fx.contains(&UiEffect::Render));
    }

    #[test]
    fn intents_not_on_offer_are_not_sent() {
        let (ui, _) = reduce(&UiState::new(), UiEvent::Snapshot(snos_view()));
        let (_, fx) = reduce(&ui, UiEvent::Intent(LegalAction::Bid { bid: 100 }));
        assert!(sent(&fx).is_empty());
        let (_, fx) = reduce(&ui, UiEvent::Intent(LegalAction::DiscardSet { cards: vec![NC, AH] }));
        assert_eq!(sent(&fx).len(), 1);
    }
}
