// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in command handlers.
//!
//! Each handler is a pure function of the original utterance except for the
//! timer, which schedules a deferred notification through a one-way channel
//! to the transport layer.

use async_trait::async_trait;
use regex::Regex;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, warn};

use aida_core::AidaError;
use aida_core::traits::command::CommandHandler;
use aida_core::types::Notification;

/// Guidance returned when a timer utterance carries no parseable duration.
const TIMER_GUIDANCE: &str = "⏱️ Specifica una durata per il timer (es. '5 minuti').";
/// Message delivered when a timer expires.
const TIMER_DONE: &str = "⏰ Timer terminato!";

/// Sets a timer parsed from free text and notifies on expiry.
pub struct TimerHandler {
    duration_re: Regex,
    notifier: mpsc::Sender<Notification>,
}

impl TimerHandler {
    pub fn new(notifier: mpsc::Sender<Notification>) -> Result<Self, AidaError> {
        let duration_re = Regex::new(r"(\d+)\s*(minuto|minuti|secondo|secondi)")
            .map_err(|e| AidaError::Internal(format!("invalid timer pattern: {e}")))?;
        Ok(Self {
            duration_re,
            notifier,
        })
    }
}

#[async_trait]
impl CommandHandler for TimerHandler {
    fn name(&self) -> &str {
        "timer"
    }

    async fn handle(&self, utterance: &str) -> String {
        let Some(caps) = self.duration_re.captures(utterance) else {
            return TIMER_GUIDANCE.to_string();
        };

        // The regex guarantees the value group is all digits; a value that
        // overflows u64 (or the ×60 conversion) is treated like a missing
        // duration.
        let Ok(value) = caps[1].parse::<u64>() else {
            return TIMER_GUIDANCE.to_string();
        };
        let unit = caps[2].to_string();
        let seconds = if unit.starts_with("minut") {
            match value.checked_mul(60) {
                Some(seconds) => seconds,
                None => return TIMER_GUIDANCE.to_string(),
            }
        } else {
            value
        };

        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            let notification = Notification {
                message: TIMER_DONE.to_string(),
            };
            if notifier.send(notification).await.is_err() {
                warn!("notification channel closed, timer expiry dropped");
            }
        });

        debug!(seconds, "timer scheduled");
        format!("⏱️ Timer impostato per {value} {unit}.")
    }
}

/// Replies with the calendar URL.
pub struct CalendarHandler {
    url: String,
}

impl CalendarHandler {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl CommandHandler for CalendarHandler {
    fn name(&self) -> &str {
        "calendar"
    }

    async fn handle(&self, _utterance: &str) -> String {
        self.url.clone()
    }
}

/// Echoes back the utterance with the leading "ripeti" keyword removed.
pub struct EchoHandler;

#[async_trait]
impl CommandHandler for EchoHandler {
    fn name(&self) -> &str {
        "echo"
    }

    async fn handle(&self, utterance: &str) -> String {
        let lower = utterance.to_lowercase();
        // Indexing the original with the lowercase offset is safe only when
        // case folding kept byte positions; fall back to the full text when
        // it did not.
        let rest = lower
            .find("ripeti")
            .and_then(|pos| utterance.get(pos + "ripeti".len()..))
            .map(str::trim)
            .unwrap_or_else(|| utterance.trim());
        format!("🔁 {rest}")
    }
}

/// Canned weather reply; a stand-in until a real forecast source exists.
pub struct FakeWeatherHandler;

#[async_trait]
impl CommandHandler for FakeWeatherHandler {
    fn name(&self) -> &str {
        "weather"
    }

    async fn handle(&self, _utterance: &str) -> String {
        "☀️ Oggi è previsto sole con 24 gradi.".to_string()
    }
}
