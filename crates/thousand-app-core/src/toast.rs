// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Toast queue with TTL and dedupe, used for authority errors and
//! connection notices.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Informational note.
    Info,
    /// Something degraded (e.g. connection lost).
    Warn,
    /// The authority rejected something.
    Error,
}

/// Identifier for a toast entry.
pub type ToastId = u64;

#[derive(Debug, Clone)]
struct Toast {
    id: ToastId,
    kind: ToastKind,
    title: String,
    body: Option<String>,
    ttl: Duration,
    created: Instant,
}

/// Rendering-friendly view of a toast.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastRender {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Short title line.
    pub title: String,
    /// Optional body text.
    pub body: Option<String>,
    /// 1.0 when just created, 0.0 when expired.
    pub progress: f32,
}

/// In-memory toast queue.
#[derive(Debug)]
pub struct ToastService {
    queue: VecDeque<Toast>,
    max: usize,
    dedupe_window: Duration,
    next_id: ToastId,
}

impl ToastService {
    /// Queue holding at most `max` toasts; the oldest is evicted first.
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a toast. An identical toast pushed within the dedupe window is
    /// refreshed instead of duplicated.
    pub fn push<T, B>(
        &mut self,
        kind: ToastKind,
        title: T,
        body: B,
        ttl: Duration,
        now: Instant,
    ) -> ToastId
    where
        T: Into<String>,
        B: Into<Option<String>>,
    {
        let title = title.into();
        let body = body.into();
        let window = self.dedupe_window;
        if let Some(existing) = self.queue.iter_mut().find(|t| {
            t.kind == kind
                && t.title == title
                && t.body == body
                && now.saturating_duration_since(t.created) <= window
        }) {
            existing.created = now;
            existing.ttl = ttl;
            return existing.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() >= self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            id,
            kind,
            title,
            body,
            ttl,
            created: now,
        });
        id
    }

    /// Drop expired toasts. Call once per frame.
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue
            .retain(|t| now.saturating_duration_since(t.created) < t.ttl);
    }

    /// Live toasts with their remaining-life ratio.
    pub fn visible(&self, now: Instant) -> Vec<ToastRender> {
        self.queue
            .iter()
            .filter(|t| now.saturating_duration_since(t.created) < t.ttl)
            .map(|t| ToastRender {
                id: t.id,
                kind: t.kind,
                title: t.title.clone(),
                body: t.body.clone(),
                progress: 1.0
                    - now.saturating_duration_since(t.created).as_secs_f32()
                        / t.ttl.as_secs_f32(),
            })
            .collect()
    }

    /// Number of queued toasts, expired ones included until the next retain.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
