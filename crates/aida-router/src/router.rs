// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Three-tier request router.
//!
//! Order of precedence: hybrid dispatcher, keyword dispatcher, LLM with
//! retrieved context. A "correggi: A -> B" utterance bypasses the tiers
//! entirely and feeds the correction into semantic memory. Tiers never
//! raise across their boundary; a failing tier is logged and the next one
//! runs.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use aida_commands::{HybridDispatcher, KeywordDispatcher};
use aida_core::traits::provider::LlmProvider;
use aida_core::types::{Interaction, Tier};
use aida_memory::SemanticMemory;

use crate::history::InteractionLog;

/// Literal prefix of the correction side-channel.
const CORRECTION_PREFIX: &str = "correggi:";
/// Acknowledgement for a registered correction.
const CORRECTION_ACK: &str = "✅ Correzione registrata.";
/// Guidance for a correction that does not parse.
const CORRECTION_GUIDANCE: &str =
    "✏️ Formato correzione: correggi: <vecchia frase> -> <nuova frase>";
/// Reply when a correction could not be stored.
const CORRECTION_FAILED: &str = "⚠️ Non sono riuscito a registrare la correzione.";
/// Reply when every tier failed.
const FALLBACK_REPLY: &str = "😓 Mi dispiace, al momento non riesco a rispondere.";

/// A routed reply together with the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    pub reply: String,
    pub tier: Tier,
}

/// Orchestrates the dispatch tiers and records every answered exchange.
pub struct Router {
    hybrid: HybridDispatcher,
    keyword: KeywordDispatcher,
    memory: Arc<SemanticMemory>,
    llm: Arc<dyn LlmProvider>,
    history: Arc<InteractionLog>,
    llm_deadline: Duration,
}

impl Router {
    pub fn new(
        hybrid: HybridDispatcher,
        keyword: KeywordDispatcher,
        memory: Arc<SemanticMemory>,
        llm: Arc<dyn LlmProvider>,
        history: Arc<InteractionLog>,
        llm_deadline: Duration,
    ) -> Self {
        Self {
            hybrid,
            keyword,
            memory,
            llm,
            history,
            llm_deadline,
        }
    }

    /// Route one utterance to a reply.
    pub async fn route(&self, utterance: &str) -> Routed {
        if let Some(rest) = utterance.strip_prefix(CORRECTION_PREFIX) {
            return self.handle_correction(rest).await;
        }

        match self.hybrid.dispatch(utterance).await {
            Ok(Some(reply)) => {
                info!(tier = %Tier::Semantic, "dispatched");
                self.record(utterance, &reply).await;
                return Routed {
                    reply,
                    tier: Tier::Semantic,
                };
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "hybrid dispatcher failed, falling through"),
        }

        if let Some(reply) = self.keyword.dispatch(utterance).await {
            info!(tier = %Tier::Traditional, "dispatched");
            self.record(utterance, &reply).await;
            return Routed {
                reply,
                tier: Tier::Traditional,
            };
        }

        self.llm_tier(utterance).await
    }

    /// Tier 3: attach retrieved context when it adds anything, then ask the
    /// LLM.
    async fn llm_tier(&self, utterance: &str) -> Routed {
        let context = match self.memory.search(utterance).await {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "context retrieval failed, prompting without context");
                String::new()
            }
        };

        let prompt = if !context.is_empty() && context != utterance {
            format!("Contesto precedente: {context}\nDomanda: {utterance}")
        } else {
            utterance.to_string()
        };

        let reply = match self.llm.respond(&prompt, self.llm_deadline).await {
            Ok(reply) => reply,
            Err(e) => {
                // Nothing is recorded for an unanswered request.
                warn!(error = %e, "LLM tier failed");
                return Routed {
                    reply: FALLBACK_REPLY.to_string(),
                    tier: Tier::Llm,
                };
            }
        };

        info!(tier = %Tier::Llm, "dispatched");
        self.record(utterance, &reply).await;
        Routed {
            reply,
            tier: Tier::Llm,
        }
    }

    async fn handle_correction(&self, rest: &str) -> Routed {
        let parsed = rest.split_once("->").and_then(|(old, new)| {
            let old = old.trim();
            let new = new.trim();
            (!old.is_empty() && !new.is_empty()).then_some((old, new))
        });

        let reply = match parsed {
            Some((old, new)) => match self.memory.learn(old, new).await {
                Ok(()) => CORRECTION_ACK,
                Err(e) => {
                    warn!(error = %e, "correction could not be stored");
                    CORRECTION_FAILED
                }
            },
            None => CORRECTION_GUIDANCE,
        };

        Routed {
            reply: reply.to_string(),
            tier: Tier::Correction,
        }
    }

    /// Post-hoc recording: remember the utterance, then log the exchange.
    /// Failures are logged and do not affect the reply.
    async fn record(&self, utterance: &str, reply: &str) {
        if let Err(e) = self.memory.add(utterance).await {
            warn!(error = %e, "failed to remember utterance");
        }
        let interaction = Interaction {
            user: utterance.to_string(),
            ai: reply.to_string(),
        };
        if let Err(e) = self.history.append(interaction).await {
            warn!(error = %e, "failed to append interaction log");
        }
    }
}
