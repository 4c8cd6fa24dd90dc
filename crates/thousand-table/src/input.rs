// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line commands read from stdin.

use anyhow::{anyhow, bail, Context, Result};
use thousand_proto::{Card, Suit};

pub const HELP: &str = "commands: start [ruleset] | state | click X Y | play CARD | \
select CARD | snos CARD CARD.. | bid N | pass | take | trump S | rospis | \
resize W H [SCALE] | show | log | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start(Option<String>),
    State,
    Click(f32, f32),
    Play(Card),
    Select(Card),
    Snos(Vec<Card>),
    Bid(u32),
    Pass,
    Take,
    Trump(Suit),
    Rospis,
    Resize(u32, u32, Option<f32>),
    Show,
    Log,
    Help,
    Quit,
}

fn card(word: Option<&str>) -> Result<Card> {
    let word = word.ok_or_else(|| anyhow!("missing card (e.g. 10H)"))?;
    Card::parse(word).ok_or_else(|| anyhow!("not a card: {word}"))
}

fn number<T: core::str::FromStr>(word: Option<&str>, what: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let word = word.ok_or_else(|| anyhow!("missing {what}"))?;
    word.parse().with_context(|| format!("bad {what}: {word}"))
}

/// Parse one line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let cmd = match head.to_ascii_lowercase().as_str() {
        "start" => Command::Start(words.next().map(str::to_owned)),
        "state" => Command::State,
        "click" => Command::Click(number(words.next(), "x")?, number(words.next(), "y")?),
        "play" => Command::Play(card(words.next())?),
        "select" => Command::Select(card(words.next())?),
        "snos" => {
            let cards = words.map(|w| card(Some(w))).collect::<Result<Vec<_>>>()?;
            if cards.is_empty() {
                bail!("snos needs at least one card");
            }
            Command::Snos(cards)
        }
        "bid" => Command::Bid(number(words.next(), "bid")?),
        "pass" => Command::Pass,
        "take" => Command::Take,
        "trump" => {
            let code = words.next().ok_or_else(|| anyhow!("missing suit"))?;
            Command::Trump(Suit::from_code(code).ok_or_else(|| anyhow!("not a suit: {code}"))?)
        }
        "rospis" => Command::Rospis,
        "resize" => Command::Resize(
            number(words.next(), "width")?,
            number(words.next(), "height")?,
            words.next().map(|w| number(Some(w), "scale")).transpose()?,
        ),
        "show" => Command::Show,
        "log" => Command::Log,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command `{other}`; {HELP}"),
    };
    Ok(Some(cmd))
}
