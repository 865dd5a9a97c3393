// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static phrase-to-handler table with precomputed phrase embeddings.
//!
//! Built once at startup, embedded once, then read-only. Multiple phrases
//! may point at the same handler (synonyms), and registration order is the
//! tie-break order for equal-similarity matches.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use aida_core::AidaError;
use aida_core::traits::command::CommandHandler;
use aida_core::traits::embedding::EmbeddingAdapter;
use aida_core::types::{EmbeddingInput, Notification};

use crate::handlers::{CalendarHandler, TimerHandler};

/// One registered phrase with its handler and, after initialization, its
/// embedding.
pub struct CommandEntry {
    pub phrase: String,
    pub handler: Arc<dyn CommandHandler>,
    pub embedding: Vec<f32>,
}

/// Phrase registry consumed by the hybrid dispatcher.
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    embedded: bool,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            embedded: false,
        }
    }

    /// The built-in vocabulary: timer synonyms and calendar synonyms.
    pub fn builtin(
        notifier: mpsc::Sender<Notification>,
        calendar_url: &str,
    ) -> Result<Self, AidaError> {
        let timer: Arc<dyn CommandHandler> = Arc::new(TimerHandler::new(notifier)?);
        let calendar: Arc<dyn CommandHandler> = Arc::new(CalendarHandler::new(calendar_url));

        let mut registry = Self::new();
        registry.register(
            &["setta timer", "imposta timer", "avvia timer", "crea timer", "timer"],
            timer,
        );
        registry.register(&["apri calendario", "mostra calendario", "calendario"], calendar);
        Ok(registry)
    }

    /// Register a handler under one or more synonym phrases.
    pub fn register(&mut self, phrases: &[&str], handler: Arc<dyn CommandHandler>) {
        for phrase in phrases {
            self.entries.push(CommandEntry {
                phrase: (*phrase).to_string(),
                handler: Arc::clone(&handler),
                embedding: Vec::new(),
            });
        }
    }

    /// Embed every registered phrase. Must run once before dispatch; the
    /// registry is immutable afterwards.
    pub async fn init_embeddings(
        &mut self,
        embedder: &dyn EmbeddingAdapter,
    ) -> Result<(), AidaError> {
        let phrases: Vec<String> = self.entries.iter().map(|e| e.phrase.clone()).collect();
        let output = embedder.embed(EmbeddingInput { texts: phrases }).await?;

        if output.embeddings.len() != self.entries.len() {
            return Err(AidaError::Internal(format!(
                "embedder returned {} vectors for {} phrases",
                output.embeddings.len(),
                self.entries.len()
            )));
        }

        for (entry, embedding) in self.entries.iter_mut().zip(output.embeddings) {
            entry.embedding = embedding;
        }
        self.embedded = true;
        debug!(phrases = self.entries.len(), "command phrase embeddings ready");
        Ok(())
    }

    /// True once `init_embeddings` has completed.
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Registered entries in registration order.
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Look a handler up by its stable name.
    pub fn handler_named(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.entries
            .iter()
            .find(|e| e.handler.name() == name)
            .map(|e| Arc::clone(&e.handler))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_test_utils::StubEmbedder;

    fn builtin() -> CommandRegistry {
        let (tx, _rx) = mpsc::channel(1);
        CommandRegistry::builtin(tx, "https://calendar.google.com").unwrap()
    }

    #[test]
    fn builtin_registers_all_synonyms() {
        let registry = builtin();
        let phrases: Vec<&str> = registry.entries().iter().map(|e| e.phrase.as_str()).collect();
        assert_eq!(
            phrases,
            vec![
                "setta timer",
                "imposta timer",
                "avvia timer",
                "crea timer",
                "timer",
                "apri calendario",
                "mostra calendario",
                "calendario",
            ]
        );
    }

    #[test]
    fn handler_lookup_by_name() {
        let registry = builtin();
        assert!(registry.handler_named("timer").is_some());
        assert!(registry.handler_named("calendar").is_some());
        assert!(registry.handler_named("missing").is_none());
    }

    #[tokio::test]
    async fn init_embeddings_fills_every_entry() {
        let mut registry = builtin();
        assert!(!registry.is_embedded());

        registry.init_embeddings(&StubEmbedder::new(8)).await.unwrap();

        assert!(registry.is_embedded());
        assert!(registry.entries().iter().all(|e| e.embedding.len() == 8));
    }
}
