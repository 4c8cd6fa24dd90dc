// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! thousand-table: headless Thousand client. Connects to an authority,
//! renders each snapshot into a headless surface and takes table commands
//! on stdin.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use thousand_app_core::{config::ConfigService, config_port::ConfigPort, prefs::TablePrefs};
use thousand_config_fs::FsConfigStore;
use thousand_proto::DeckKind;
use thousand_session_client::backoff::ReconnectBackoff;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod app;
mod input;
mod perf;
mod surface;
mod ui_state;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Thousand table client")]
struct Args {
    /// Authority WebSocket endpoint (overrides saved prefs)
    #[arg(long)]
    url: Option<String>,
    /// Ruleset for `start` (overrides saved prefs)
    #[arg(long)]
    ruleset: Option<String>,
    /// Deck to pre-generate: short (24) or full (52)
    #[arg(long, value_parser = parse_deck)]
    deck: Option<DeckKind>,
    /// Viewport width in logical pixels
    #[arg(long)]
    width: Option<u32>,
    /// Viewport height in logical pixels
    #[arg(long)]
    height: Option<u32>,
    /// Device scale factor
    #[arg(long)]
    scale: Option<f32>,
    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,
    /// Give up after this many consecutive failed reconnects (default: never)
    #[arg(long)]
    max_reconnects: Option<u32>,
    /// Persist the effective prefs on exit
    #[arg(long)]
    save_prefs: bool,
}

fn parse_deck(s: &str) -> Result<DeckKind, String> {
    match s {
        "short" => Ok(DeckKind::Short),
        "full" => Ok(DeckKind::Full),
        other => Err(format!("unknown deck `{other}` (short|full)")),
    }
}

impl Args {
    fn apply(&self, mut prefs: TablePrefs) -> TablePrefs {
        if let Some(url) = &self.url {
            prefs.server_url.clone_from(url);
        }
        if let Some(ruleset) = &self.ruleset {
            prefs.ruleset.clone_from(ruleset);
        }
        if let Some(deck) = self.deck {
            prefs.deck = deck;
        }
        if let Some(width) = self.width {
            prefs.viewport.width = width;
        }
        if let Some(height) = self.height {
            prefs.viewport.height = height;
        }
        if let Some(scale) = self.scale {
            prefs.viewport.scale = scale;
        }
        if let Some(fps) = self.fps {
            prefs.frame_rate = fps;
        }
        prefs
    }

    fn backoff(&self) -> ReconnectBackoff {
        let backoff = ReconnectBackoff::new(Duration::from_millis(500), Duration::from_secs(8));
        match self.max_reconnects {
            Some(max) => backoff.with_max_attempts(max),
            None => backoff,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = match FsConfigStore::new() {
        Ok(store) => Some(Box::new(ConfigService::new(store)) as Box<dyn ConfigPort>),
        Err(err) => {
            warn!(error = %err, "config store unavailable");
            None
        }
    };
    let prefs = args.apply(
        config
            .as_ref()
            .and_then(|c| c.load_prefs())
            .unwrap_or_default(),
    );

    let app = app::App::new(prefs, config, args.backoff(), args.save_prefs)?;
    app::run(app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_saved_prefs() {
        let args = Args::parse_from([
            "thousand-table",
            "--url",
            "ws://example:1/ws",
            "--deck",
            "full",
            "--width",
            "640",
        ]);
        let prefs = args.apply(TablePrefs::default());
        assert_eq!(prefs.server_url, "ws://example:1/ws");
        assert_eq!(prefs.deck, DeckKind::Full);
        assert_eq!(prefs.viewport.width, 640);
        assert_eq!(prefs.viewport.height, TablePrefs::default().viewport.height);
        assert_eq!(prefs.ruleset, "classic");
    }
}
