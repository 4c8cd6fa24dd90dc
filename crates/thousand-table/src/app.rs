// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Top-level application wiring and the frame-driven event loop.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use thousand_app_core::{
    config_port::ConfigPort,
    event_log::EventLog,
    prefs::{TablePrefs, ViewportPrefs},
    toast::{ToastKind, ToastService},
};
use thousand_proto::{legal_keys, Card, LegalAction, ServerMessage};
use thousand_scene::{HitTarget, RenderOutcome, RouterOutcome, SceneConfig, SceneCoordinator};
use thousand_session_client::{
    backoff::ReconnectBackoff,
    tool::{ChannelSession, SessionPort},
    ChannelEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::input::{self, Command, HELP};
use crate::perf::PerfStats;
use crate::surface::HeadlessSurface;
use crate::ui_state::{self, Screen, UiEffect, UiEvent, UiState};

const TOAST_TTL: Duration = Duration::from_secs(6);
const EVENTS_PER_FRAME: usize = 64;

pub struct App {
    prefs: TablePrefs,
    config: Option<Box<dyn ConfigPort>>,
    save_on_exit: bool,
    session: ChannelSession,
    coordinator: SceneCoordinator<HeadlessSurface>,
    ui: UiState,
    toasts: ToastService,
    log: EventLog,
    backoff: ReconnectBackoff,
    reconnect_at: Option<Instant>,
    perf: PerfStats,
}

#[allow(clippy::cast_precision_loss)]
fn scene_config(prefs: &TablePrefs) -> SceneConfig {
    let anim = prefs.animation;
    SceneConfig {
        deck: prefs.deck,
        deal_ms: anim.deal_ms as f32,
        deal_stagger_ms: anim.deal_stagger_ms as f32,
        play_ms: anim.play_ms as f32,
        clear_ms: anim.clear_ms as f32,
    }
}

impl App {
    pub fn new(
        prefs: TablePrefs,
        config: Option<Box<dyn ConfigPort>>,
        backoff: ReconnectBackoff,
        save_on_exit: bool,
    ) -> Result<Self> {
        let mut coordinator = SceneCoordinator::new(HeadlessSurface::new(), scene_config(&prefs));
        coordinator
            .warm()
            .context("pre-generating card visuals")?;
        let vp = prefs.viewport;
        coordinator.resize(vp.width, vp.height, vp.scale);

        let mut toasts = ToastService::new(16);
        if config.is_none() {
            warn!("config store unavailable; prefs won't persist this session");
            toasts.push(
                ToastKind::Warn,
                "Config store unavailable",
                Some(String::from("prefs won't persist this session")),
                TOAST_TTL,
                Instant::now(),
            );
        }
        let mut log = EventLog::new(200);
        log.note("Game created");

        Ok(Self {
            prefs,
            config,
            save_on_exit,
            session: ChannelSession::new(),
            coordinator,
            ui: UiState::new(),
            toasts,
            log,
            backoff,
            reconnect_at: None,
            perf: PerfStats::default(),
        })
    }

    pub fn should_quit(&self) -> bool {
        self.ui.quitting
    }

    pub fn connect(&mut self) {
        self.reconnect_at = None;
        info!(url = %self.prefs.server_url, attempt = self.backoff.attempt(), "connecting");
        self.log.note("Awaiting server");
        self.session.connect(&self.prefs.server_url);
    }

    pub fn apply(&mut self, ev: UiEvent) {
        let (next, effects) = ui_state::reduce(&self.ui, ev);
        self.ui = next;
        for fx in effects {
            self.run_effect(fx);
        }
    }

    fn run_effect(&mut self, fx: UiEffect) {
        match fx {
            UiEffect::Send(msg) => {
                if let Err(err) = self.session.send(&msg) {
                    warn!(error = %err, "send failed");
                }
            }
            UiEffect::Render => self.render(),
            UiEffect::ResetScene => self.coordinator.reset_session(),
            UiEffect::ScheduleReconnect => self.schedule_reconnect(),
            UiEffect::ReconnectSucceeded => self.backoff.reset(),
            UiEffect::Toast(kind, title, body) => {
                match kind {
                    ToastKind::Info => info!(%title, body = ?body, "toast"),
                    ToastKind::Warn | ToastKind::Error => warn!(%title, body = ?body, "toast"),
                }
                self.toasts.push(kind, title, body, TOAST_TTL, Instant::now());
            }
            UiEffect::Log(line) => {
                info!("{line}");
                self.log.note(line);
            }
            UiEffect::Quit => info!("quitting"),
        }
    }

    fn schedule_reconnect(&mut self) {
        if self.reconnect_at.is_some() {
            return;
        }
        match self.backoff.next_delay() {
            Some(delay) => {
                info!(
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    attempt = self.backoff.attempt(),
                    "reconnect scheduled"
                );
                self.reconnect_at = Some(Instant::now() + delay);
            }
            None => {
                warn!("reconnect attempts exhausted");
                self.toasts.push(
                    ToastKind::Error,
                    "Connection lost",
                    Some(String::from("reconnect attempts exhausted")),
                    TOAST_TTL,
                    Instant::now(),
                );
            }
        }
    }

    fn pump_session(&mut self) {
        for event in self.session.drain_events(EVENTS_PER_FRAME) {
            match event {
                ChannelEvent::Status(status) => self.apply(UiEvent::Status(status)),
                ChannelEvent::Message(ServerMessage::State { state, events }) => {
                    for event in &events {
                        let line = self.log.record(event);
                        debug!(event = %line, "authority event");
                    }
                    self.apply(UiEvent::Snapshot(state));
                }
                ChannelEvent::Message(ServerMessage::Error { error }) => {
                    self.apply(UiEvent::Rejected(error));
                }
                ChannelEvent::Message(ServerMessage::Unknown) => {}
            }
        }
    }

    fn render(&mut self) {
        let Some(view) = self.ui.view.as_deref() else {
            return;
        };
        let keys = legal_keys(&view.legal_actions);
        match self.coordinator.render(view, &keys, &self.ui.selection) {
            Ok(RenderOutcome::Rendered { generation, events }) => {
                debug!(generation, events = ?events.to_vec(), phase = ?view.round.phase, "rendered");
            }
            Ok(RenderOutcome::NotReady) => debug!("snapshot held: scene not ready"),
            Err(err) => {
                warn!(error = %err, "render failed");
                self.toasts.push(
                    ToastKind::Error,
                    "Render failed",
                    Some(err.to_string()),
                    TOAST_TTL,
                    Instant::now(),
                );
            }
        }
    }

    /// One frame: drain the channel, fire a due reconnect, advance tweens,
    /// present.
    pub fn frame(&mut self, now: Instant, dt: Duration) {
        self.pump_session();
        if self.reconnect_at.is_some_and(|at| now >= at) {
            self.connect();
        }
        let dt_ms = dt.as_secs_f32() * 1000.0;
        self.coordinator.tick(dt_ms);
        self.perf.push(dt_ms);
        self.toasts.retain_visible(now);
    }

    pub fn command_line(&mut self, line: &str) {
        match input::parse(line) {
            Ok(Some(cmd)) => self.command(cmd),
            Ok(None) => {}
            Err(err) => warn!("{err:#}"),
        }
    }

    fn intent(&mut self, action: LegalAction) {
        self.apply(UiEvent::Intent(action));
    }

    pub fn command(&mut self, cmd: Command) {
        match cmd {
            Command::Start(ruleset) => {
                let ruleset = ruleset.unwrap_or_else(|| self.prefs.ruleset.clone());
                self.apply(UiEvent::StartGame(ruleset));
            }
            Command::State => self.apply(UiEvent::RequestState),
            Command::Click(x, y) => self.click(x, y),
            Command::Play(card) => self.press_card(card),
            Command::Select(card) => self.apply(UiEvent::ToggleSelection(card)),
            Command::Snos(cards) => self.intent(LegalAction::DiscardSet { cards }),
            Command::Bid(bid) => self.intent(LegalAction::Bid { bid }),
            Command::Pass => self.intent(LegalAction::Pass),
            Command::Take => self.intent(LegalAction::TakeKitty),
            Command::Trump(suit) => self.intent(LegalAction::ChooseTrump { suit }),
            Command::Rospis => self.intent(LegalAction::DeclareSpecial),
            Command::Resize(width, height, scale) => {
                let scale = scale.unwrap_or(self.prefs.viewport.scale);
                self.prefs.viewport = ViewportPrefs {
                    width,
                    height,
                    scale,
                };
                self.coordinator.resize(width, height, scale);
                self.render();
            }
            Command::Show => self.show(),
            Command::Log => {
                for line in self.log.lines() {
                    info!("{line}");
                }
            }
            Command::Help => info!("{HELP}"),
            Command::Quit => self.apply(UiEvent::Quit),
        }
    }

    fn click(&mut self, x: f32, y: f32) {
        let Some(view) = self.ui.view.as_deref() else {
            info!("no table yet");
            return;
        };
        let outcome = self
            .coordinator
            .router()
            .pointer(x, y, &view.legal_actions, &self.ui.selection);
        match outcome {
            RouterOutcome::Intent(action) => self.intent(action),
            RouterOutcome::ToggleSelection(card) => self.apply(UiEvent::ToggleSelection(card)),
            RouterOutcome::Nothing => debug!(x, y, "pointer hit nothing actionable"),
        }
    }

    /// Press a hand card through the router, aiming at the strip the
    /// neighbouring card leaves uncovered.
    fn press_card(&mut self, card: Card) {
        let point = self
            .coordinator
            .router()
            .regions()
            .iter()
            .rev()
            .find(|r| r.target == HitTarget::HandCard(card))
            .map(|r| r.point_at(-0.5, 0.0));
        match point {
            Some([x, y]) => self.click(x, y),
            None => info!(%card, "card is not in hand"),
        }
    }

    fn show(&self) {
        let status = self.session.status();
        info!(
            screen = ?self.ui.screen,
            connection = ?status.state,
            last_error = ?status.last_error,
            generation = self.coordinator.generation(),
            tweens = self.coordinator.active_tweens(),
            fps = self.perf.fps(),
            "table"
        );
        if let Some(view) = self.ui.view.as_deref() {
            let hand: Vec<String> = view.local_hand().iter().map(ToString::to_string).collect();
            let keys: Vec<String> = legal_keys(&view.legal_actions)
                .iter()
                .map(ToString::to_string)
                .collect();
            info!(
                phase = ?view.round.phase,
                trump = ?view.round.trump,
                hand = %hand.join(" "),
                legal = %keys.join(" "),
                "snapshot"
            );
        }
        for line in self.coordinator.surface().describe() {
            info!("{line}");
        }
        for toast in self.toasts.visible(Instant::now()) {
            info!(kind = ?toast.kind, title = %toast.title, body = ?toast.body, "toast");
        }
        if let Screen::Disconnected(reason) = &self.ui.screen {
            info!(%reason, "disconnected");
        }
    }

    /// Close the channel, persist prefs, release every texture.
    pub fn shutdown(mut self) {
        self.session.close();
        if self.save_on_exit {
            match &self.config {
                Some(config) if config.save_prefs(&self.prefs) => info!("prefs saved"),
                Some(_) => warn!("failed to save prefs"),
                None => {}
            }
        }
        let surface = self.coordinator.dispose();
        info!(
            frames = surface.frames_presented(),
            leaked = surface.live_textures(),
            "table closed"
        );
    }
}

/// Drive the app until quit: frames on a fixed interval, stdin commands and
/// Ctrl-C, all on the current thread.
pub async fn run(mut app: App) -> Result<()> {
    let fps = app.prefs.frame_rate.clamp(1, 240);
    let mut ticker = tokio::time::interval(Duration::from_secs(1) / fps);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut last = Instant::now();

    app.connect();
    info!("{HELP}");
    while !app.should_quit() {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                app.frame(now, now.saturating_duration_since(last));
                last = now;
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("reading stdin")? {
                    Some(line) => app.command_line(&line),
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("installing ctrl-c handler")?;
                app.apply(UiEvent::Quit);
            }
        }
    }
    app.shutdown();
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use thousand_proto::{GameView, Phase, PlayerView, Rank, Suit};
    use thousand_session_client::{ChannelState, ChannelStatus};

    const AH: Card = Card::new(Rank::Ace, Suit::Hearts);
    const NC: Card = Card::new(Rank::Nine, Suit::Clubs);

    fn app() -> App {
        App::new(TablePrefs::default(), None, ReconnectBackoff::default(), false).unwrap()
    }

    fn play_view() -> Box<GameView> {
        let mut view = GameView::default();
        view.players.push(PlayerView {
            id: 0,
            hand: vec![NC, AH],
            hand_count: 2,
            ..Default::default()
        });
        view.round.phase = Phase::PlayTricks;
        view.round.has_current = true;
        view.legal_actions = vec![LegalAction::PlayCard {
            card: AH,
            marriage_suit: None,
        }];
        Box::new(view)
    }

    #[test]
    fn snapshot_renders_hand_and_registers_hits() {
        let mut app = app();
        app.apply(UiEvent::Snapshot(play_view()));
        assert_eq!(app.coordinator.generation(), 1);
        let targets: Vec<_> = app.coordinator.router().regions().iter().map(|r| r.target).collect();
        assert!(targets.contains(&HitTarget::HandCard(AH)));
        assert!(targets.contains(&HitTarget::HandCard(NC)));
    }

    #[test]
    fn close_without_channel_schedules_one_reconnect() {
        let mut app = app();
        let closed = ChannelStatus {
            state: ChannelState::Closed,
            last_error: Some("refused".into()),
        };
        app.apply(UiEvent::Status(closed.clone()));
        let first = app.reconnect_at;
        assert!(first.is_some());
        app.apply(UiEvent::Status(closed));
        assert_eq!(app.reconnect_at, first);
        assert_eq!(app.backoff.attempt(), 1);
        assert!(!app.toasts.is_empty());
    }

    #[test]
    fn resize_rerenders_at_new_viewport() {
        let mut app = app();
        app.apply(UiEvent::Snapshot(play_view()));
        app.command(Command::Resize(640, 480, Some(1.0)));
        assert_eq!(app.coordinator.generation(), 2);
        assert_eq!(app.prefs.viewport.width, 640);
        app.frame(Instant::now(), Duration::from_millis(16));
        assert_eq!(app.coordinator.surface().frames_presented(), 1);
    }

    #[test]
    fn quit_command_stops_the_loop() {
        let mut app = app();
        app.command_line("quit");
        assert!(app.should_quit());
    }
}
