// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-phase command classifier.
//!
//! Deterministic keyword rules run first: they catch the frequent,
//! high-precision intents cheaply and stay stable under embedding drift.
//! Utterances the rules miss fall to a cosine-similarity match against the
//! precomputed phrase embeddings, gated by a configurable threshold.

use std::sync::Arc;

use tracing::debug;

use aida_core::AidaError;
use aida_core::traits::command::CommandHandler;
use aida_core::traits::embedding::EmbeddingAdapter;
use aida_core::types::EmbeddingInput;

use crate::registry::CommandRegistry;

/// Tokens signalling a command intent for the timer rule.
const COMMAND_TOKENS: [&str; 7] = [
    "timer", "setta", "imposta", "avvia", "crea", "sveglia", "ricorda",
];
/// Time-unit tokens for the timer rule.
const TIME_UNIT_TOKENS: [&str; 6] = ["secondo", "secondi", "minuto", "minuti", "ora", "ore"];
/// Tokens signalling a calendar intent.
const CALENDAR_TOKENS: [&str; 4] = ["calendario", "agenda", "pianificazione", "appuntamenti"];

/// Keyword-then-embedding command dispatcher.
pub struct HybridDispatcher {
    registry: CommandRegistry,
    embedder: Arc<dyn EmbeddingAdapter>,
    threshold: f32,
    timer: Option<Arc<dyn CommandHandler>>,
    calendar: Option<Arc<dyn CommandHandler>>,
}

impl HybridDispatcher {
    /// Build a dispatcher over an initialized registry.
    ///
    /// The timer and calendar handlers for the deterministic rules are
    /// resolved from the registry once, here.
    pub fn new(
        registry: CommandRegistry,
        embedder: Arc<dyn EmbeddingAdapter>,
        threshold: f32,
    ) -> Self {
        let timer = registry.handler_named("timer");
        let calendar = registry.handler_named("calendar");
        Self {
            registry,
            embedder,
            threshold,
            timer,
            calendar,
        }
    }

    /// Classify the utterance and run the matched handler.
    ///
    /// Returns `Ok(None)` when no rule fires and no phrase clears the
    /// similarity threshold.
    pub async fn dispatch(&self, utterance: &str) -> Result<Option<String>, AidaError> {
        let lower = utterance.to_lowercase();

        if let Some(timer) = &self.timer {
            if timer_rule_fires(&lower) {
                debug!("timer rule matched");
                return Ok(Some(timer.handle(utterance).await));
            }
        }

        if let Some(calendar) = &self.calendar {
            if CALENDAR_TOKENS.iter().any(|t| lower.contains(t)) {
                debug!("calendar rule matched");
                return Ok(Some(calendar.handle(utterance).await));
            }
        }

        let Some((entry, score)) = self.best_match(utterance).await? else {
            return Ok(None);
        };

        if score >= self.threshold {
            debug!(phrase = %entry.phrase, score, "embedding match");
            let reply = entry.handler.handle(utterance).await;
            return Ok(Some(reply));
        }

        debug!(phrase = %entry.phrase, score, "best embedding match below threshold");
        Ok(None)
    }

    /// Top-k phrase matches in descending similarity, for UI hinting.
    pub async fn suggest(
        &self,
        utterance: &str,
        k: usize,
    ) -> Result<Vec<(String, f32)>, AidaError> {
        let query = self.embed(utterance).await?;
        let mut scored: Vec<(String, f32)> = self
            .registry
            .entries()
            .iter()
            .map(|e| (e.phrase.clone(), cosine_similarity(&query, &e.embedding)))
            .collect();
        // Stable sort keeps registration order among equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    /// Highest-similarity registry entry for the utterance.
    ///
    /// Strictly-greater comparison keeps the first registered phrase on
    /// ties.
    async fn best_match(
        &self,
        utterance: &str,
    ) -> Result<Option<(&crate::registry::CommandEntry, f32)>, AidaError> {
        if self.registry.entries().is_empty() {
            return Ok(None);
        }
        let query = self.embed(utterance).await?;

        let mut best: Option<(&crate::registry::CommandEntry, f32)> = None;
        for entry in self.registry.entries() {
            let score = cosine_similarity(&query, &entry.embedding);
            if best.as_ref().is_none_or(|(_, b)| score > *b) {
                best = Some((entry, score));
            }
        }
        Ok(best)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AidaError> {
        self.embedder
            .embed(EmbeddingInput::single(text))
            .await?
            .into_single()
            .ok_or_else(|| AidaError::Internal("embedder returned no vector".to_string()))
    }
}

/// True when the utterance names a command intent together with a time
/// unit, or places "tra" next to a time unit ("ricordamelo tra 5 minuti").
fn timer_rule_fires(lower: &str) -> bool {
    let has_unit = TIME_UNIT_TOKENS.iter().any(|t| lower.contains(t));
    if !has_unit {
        return false;
    }
    COMMAND_TOKENS.iter().any(|t| lower.contains(t)) || lower.contains("tra")
}

/// Cosine similarity `(a·b) / (‖a‖·‖b‖)`; zero when either norm vanishes.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_test_utils::StubEmbedder;
    use tokio::sync::mpsc;

    const DIM: usize = 4;

    fn axis(i: usize) -> Vec<f32> {
        let mut v = vec![0.0; DIM];
        v[i] = 1.0;
        v
    }

    async fn dispatcher(embedder: StubEmbedder) -> HybridDispatcher {
        let (tx, _rx) = mpsc::channel(4);
        let mut registry = CommandRegistry::builtin(tx, "https://calendar.google.com").unwrap();
        registry.init_embeddings(&embedder).await.unwrap();
        HybridDispatcher::new(registry, Arc::new(embedder2()), 0.6)
    }

    // The dispatcher embeds queries through its own adapter; pin the query
    // vectors there.
    fn embedder2() -> StubEmbedder {
        StubEmbedder::new(DIM)
            .with_vector("metti un conto alla rovescia", axis(0))
            .with_vector("che ore sono?", axis(3))
    }

    fn phrase_embedder() -> StubEmbedder {
        // "timer" phrases near axis 0, calendar phrases near axis 1.
        StubEmbedder::new(DIM)
            .with_vector("setta timer", axis(0))
            .with_vector("imposta timer", axis(0))
            .with_vector("avvia timer", axis(0))
            .with_vector("crea timer", axis(0))
            .with_vector("timer", axis(0))
            .with_vector("apri calendario", axis(1))
            .with_vector("mostra calendario", axis(1))
            .with_vector("calendario", axis(1))
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.3, -0.5, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn timer_rule_needs_intent_and_unit() {
        assert!(timer_rule_fires("setta timer 5 minuti"));
        assert!(timer_rule_fires("timer 30 secondi"));
        assert!(timer_rule_fires("sveglia fra 2 ore"));
        // Command word without a unit does not fire.
        assert!(!timer_rule_fires("timer domani"));
        // Unit without an intent word does not fire.
        assert!(!timer_rule_fires("sono passati dieci minuti"));
    }

    #[test]
    fn timer_rule_accepts_tra_with_unit() {
        assert!(timer_rule_fires("ricordamelo tra 5 minuti"));
    }

    #[tokio::test]
    async fn keyword_rules_win_before_embeddings() {
        let dispatcher = dispatcher(phrase_embedder()).await;
        let reply = dispatcher.dispatch("setta timer 5 minuti").await.unwrap();
        assert_eq!(reply.as_deref(), Some("⏱️ Timer impostato per 5 minuti."));
    }

    #[tokio::test]
    async fn calendar_rule_matches_any_calendar_token() {
        let dispatcher = dispatcher(phrase_embedder()).await;
        let reply = dispatcher.dispatch("mostra la mia agenda").await.unwrap();
        assert_eq!(reply.as_deref(), Some("https://calendar.google.com"));
    }

    #[tokio::test]
    async fn embedding_fallback_clears_threshold() {
        let dispatcher = dispatcher(phrase_embedder()).await;
        // Query pinned on axis 0: similarity 1.0 against every timer phrase.
        let reply = dispatcher
            .dispatch("metti un conto alla rovescia")
            .await
            .unwrap();
        // The timer handler sees no duration in the utterance.
        assert_eq!(
            reply.as_deref(),
            Some("⏱️ Specifica una durata per il timer (es. '5 minuti').")
        );
    }

    #[tokio::test]
    async fn below_threshold_is_no_match() {
        let dispatcher = dispatcher(phrase_embedder()).await;
        // Query pinned on axis 3: orthogonal to every phrase.
        let reply = dispatcher.dispatch("che ore sono?").await.unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn dispatch_is_deterministic() {
        let dispatcher = dispatcher(phrase_embedder()).await;
        let first = dispatcher.dispatch("che ore sono?").await.unwrap();
        let second = dispatcher.dispatch("che ore sono?").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn suggest_orders_by_descending_similarity() {
        let dispatcher = dispatcher(phrase_embedder()).await;
        let suggestions = dispatcher
            .suggest("metti un conto alla rovescia", 3)
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 3);
        // All top suggestions are timer phrases, in registration order.
        assert_eq!(suggestions[0].0, "setta timer");
        assert!(suggestions[0].1 >= suggestions[1].1);
        assert!(suggestions[1].1 >= suggestions[2].1);
    }
}
