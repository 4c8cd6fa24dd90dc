// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bounded, human-readable log of authority events and session notices.

use std::collections::VecDeque;

use serde_json::Value;
use thousand_proto::AuthorityEvent;

/// Ring of the most recent log lines, oldest first.
#[derive(Debug, Clone)]
pub struct EventLog {
    lines: VecDeque<String>,
    cap: usize,
}

impl EventLog {
    /// Log retaining at most `cap` lines.
    pub fn new(cap: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(cap.min(256)),
            cap: cap.max(1),
        }
    }

    /// Append a free-form notice.
    pub fn note(&mut self, line: impl Into<String>) {
        if self.lines.len() >= self.cap {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Describe and append an authority event. Returns the line written.
    pub fn record(&mut self, event: &AuthorityEvent) -> &str {
        self.note(describe(event));
        self.lines.back().map_or("", String::as_str)
    }

    /// Lines oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Number of lines held.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn int(data: &Value, field: &str) -> i64 {
    data.get(field).and_then(Value::as_i64).unwrap_or_default()
}

fn card_label(card: &Value) -> String {
    let rank = card.get("rank").and_then(Value::as_str).unwrap_or("?");
    let suit = card.get("suit").and_then(Value::as_str).unwrap_or("?");
    format!("{rank}{suit}")
}

/// One-line description of an authority event.
pub fn describe(event: &AuthorityEvent) -> String {
    let d = &event.data;
    let p = int(d, "player");
    match event.kind.as_str() {
        "bid_made" => format!("P{p} bids {}", int(d, "bid")),
        "bid_passed" => format!("P{p} passes"),
        "kitty_taken" => format!("P{p} takes the kitty"),
        "snos_made" => {
            let transfers = d
                .get("transfers")
                .and_then(Value::as_array)
                .map(|ts| {
                    ts.iter()
                        .map(|t| {
                            let card = t.get("card").map(card_label).unwrap_or_default();
                            format!("{card}→P{}", int(t, "to"))
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            format!("P{p} hands off {transfers}")
        }
        "card_played" => {
            let card = d
                .get("cards")
                .and_then(Value::as_array)
                .and_then(|cs| cs.first())
                .map(card_label)
                .unwrap_or_default();
            format!("P{p} plays {card}")
        }
        "marriage_declared" => {
            let suit = d.get("suit").and_then(Value::as_str).unwrap_or("?");
            format!("P{p} declares {suit} marriage (+{})", int(d, "value"))
        }
        "ace_marriage_declared" => format!("P{p} declares ace marriage (+{})", int(d, "value")),
        "rospis_declared" => format!("P{p} declares rospis"),
        "trick_won" => format!("P{p} wins the trick ({} pts)", int(d, "value")),
        "round_scored" => {
            let points = d
                .get("points")
                .and_then(Value::as_array)
                .map(|ps| {
                    ps.iter()
                        .map(|v| v.as_i64().unwrap_or_default().to_string())
                        .collect::<Vec<_>>()
                        .join(" / ")
                })
                .unwrap_or_default();
            format!("Round scored: {points}")
        }
        "bolt_awarded" => format!("P{p} gets a bolt"),
        "bolt_penalty" => format!("P{p} bolt penalty {}", int(d, "value")),
        "barrel_enter" => format!("P{p} is on the barrel"),
        "barrel_exit" => format!("P{p} leaves the barrel"),
        "barrel_penalty" => format!("P{p} barrel penalty {}", int(d, "value")),
        "dump_reset" => format!("P{p} score dumped"),
        "game_ended" => format!("Game over: P{p} wins"),
        other => other.replace('_', " "),
    }
}
