// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end routing scenarios over the full tier stack, with a stub
//! embedder and a mock LLM standing in for the model-backed adapters.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use aida_commands::{CommandRegistry, HybridDispatcher, KeywordDispatcher};
use aida_core::traits::embedding::EmbeddingAdapter;
use aida_core::traits::provider::LlmProvider;
use aida_core::types::{Notification, Tier};
use aida_memory::SemanticMemory;
use aida_router::{InteractionLog, Router};
use aida_test_utils::{MockLlm, StubEmbedder};

const DIM: usize = 8;

fn axis(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[i] = 1.0;
    v
}

/// Registry phrases share axes 0 (timer) and 1 (calendar); every query that
/// must miss the embedding stage gets its own orthogonal axis.
fn stub_embedder() -> StubEmbedder {
    StubEmbedder::new(DIM)
        .with_vector("setta timer", axis(0))
        .with_vector("imposta timer", axis(0))
        .with_vector("avvia timer", axis(0))
        .with_vector("crea timer", axis(0))
        .with_vector("timer", axis(0))
        .with_vector("apri calendario", axis(1))
        .with_vector("mostra calendario", axis(1))
        .with_vector("calendario", axis(1))
        .with_vector("ripeti ciao", axis(2))
        .with_vector("che ore sono?", axis(3))
        .with_vector("timer domani", axis(4))
        .with_vector("metto timer", axis(5))
        .with_vector("mi piace il caffè", axis(6))
        .with_vector("cosa mi piace?", axis(7))
}

struct Fixture {
    router: Router,
    memory: Arc<SemanticMemory>,
    history: Arc<InteractionLog>,
    llm: Arc<MockLlm>,
    notifications: mpsc::Receiver<Notification>,
    _dir: TempDir,
}

async fn fixture_with(llm: MockLlm) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(stub_embedder());
    let (tx, notifications) = mpsc::channel(8);

    let mut registry = CommandRegistry::builtin(tx, "https://calendar.google.com").unwrap();
    registry.init_embeddings(embedder.as_ref()).await.unwrap();
    let hybrid = HybridDispatcher::new(registry, Arc::clone(&embedder), 0.6);
    let keyword = KeywordDispatcher::builtin();

    let memory = Arc::new(
        SemanticMemory::open_in_dir(Arc::clone(&embedder), dir.path(), DIM, 0.8).unwrap(),
    );
    let history = Arc::new(InteractionLog::open(dir.path().join("memory.json")));

    let llm = Arc::new(llm);
    let router = Router::new(
        hybrid,
        keyword,
        Arc::clone(&memory),
        Arc::clone(&llm) as Arc<dyn LlmProvider>,
        Arc::clone(&history),
        Duration::from_secs(5),
    );

    Fixture {
        router,
        memory,
        history,
        llm,
        notifications,
        _dir: dir,
    }
}

async fn fixture() -> Fixture {
    fixture_with(MockLlm::new()).await
}

#[tokio::test]
async fn timer_utterance_hits_the_semantic_tier() {
    let fx = fixture().await;
    let routed = fx.router.route("setta timer 5 minuti").await;

    assert_eq!(routed.tier, Tier::Semantic);
    assert_eq!(routed.reply, "⏱️ Timer impostato per 5 minuti.");
    // The LLM is never consulted.
    assert!(fx.llm.prompts().await.is_empty());
}

#[tokio::test]
async fn timer_in_seconds_is_acknowledged_verbatim() {
    let fx = fixture().await;
    let routed = fx.router.route("timer 30 secondi").await;

    assert_eq!(routed.tier, Tier::Semantic);
    assert_eq!(routed.reply, "⏱️ Timer impostato per 30 secondi.");
}

#[tokio::test]
async fn calendar_utterance_returns_the_url() {
    let fx = fixture().await;
    let routed = fx.router.route("apri calendario").await;

    assert_eq!(routed.tier, Tier::Semantic);
    assert_eq!(routed.reply, "https://calendar.google.com");
}

#[tokio::test]
async fn ripeti_falls_to_the_traditional_tier() {
    let fx = fixture().await;
    let routed = fx.router.route("ripeti ciao").await;

    assert_eq!(routed.tier, Tier::Traditional);
    assert_eq!(routed.reply, "🔁 ciao");
}

#[tokio::test]
async fn unmatched_question_reaches_the_llm_without_context() {
    let fx = fixture_with(MockLlm::with_responses(vec!["Sono le tre.".to_string()])).await;
    let routed = fx.router.route("che ore sono?").await;

    assert_eq!(routed.tier, Tier::Llm);
    assert_eq!(routed.reply, "Sono le tre.");
    // Empty memory: the prompt is the bare utterance.
    assert_eq!(fx.llm.prompts().await, vec!["che ore sono?"]);
}

#[tokio::test]
async fn command_word_without_unit_falls_to_the_llm() {
    let fx = fixture().await;
    let routed = fx.router.route("timer domani").await;

    assert_eq!(routed.tier, Tier::Llm);
    assert_eq!(fx.llm.prompts().await, vec!["timer domani"]);
}

#[tokio::test]
async fn retrieved_context_is_attached_to_the_prompt() {
    let fx = fixture().await;
    fx.memory.add("mi piace il caffè").await.unwrap();

    fx.router.route("cosa mi piace?").await;

    assert_eq!(
        fx.llm.prompts().await,
        vec!["Contesto precedente: mi piace il caffè\nDomanda: cosa mi piace?"]
    );
}

#[tokio::test]
async fn answered_requests_are_recorded_in_memory_and_history() {
    let fx = fixture_with(MockLlm::with_responses(vec!["Sono le tre.".to_string()])).await;
    fx.router.route("che ore sono?").await;

    let texts: Vec<String> = fx.memory.entries().await.into_iter().map(|(_, t)| t).collect();
    assert_eq!(texts, vec!["che ore sono?".to_string()]);

    let history = fx.history.entries().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user, "che ore sono?");
    assert_eq!(history[0].ai, "Sono le tre.");
}

#[tokio::test]
async fn command_tiers_are_recorded_too() {
    let fx = fixture().await;
    fx.router.route("apri calendario").await;

    assert_eq!(fx.memory.len().await, 1);
    assert_eq!(fx.history.len().await, 1);
}

#[tokio::test]
async fn correction_bypasses_the_pipeline() {
    let fx = fixture().await;
    fx.memory.add("metto timer").await.unwrap();

    let routed = fx.router.route("correggi: metto timer -> imposta timer").await;
    assert_eq!(routed.tier, Tier::Correction);
    assert_eq!(routed.reply, "✅ Correzione registrata.");

    // The correction itself is not an exchange.
    assert!(fx.history.is_empty().await);

    // The old text is gone; a distant probe now recalls the replacement.
    assert_eq!(fx.memory.search("metto timer").await.unwrap(), "imposta timer");
    let texts: Vec<String> = fx.memory.entries().await.into_iter().map(|(_, t)| t).collect();
    assert_eq!(texts, vec!["imposta timer".to_string()]);
}

#[tokio::test]
async fn malformed_correction_returns_guidance() {
    let fx = fixture().await;
    let routed = fx.router.route("correggi: manca la freccia").await;

    assert_eq!(routed.tier, Tier::Correction);
    assert_eq!(
        routed.reply,
        "✏️ Formato correzione: correggi: <vecchia frase> -> <nuova frase>"
    );
    assert!(fx.memory.is_empty().await);
}

#[tokio::test]
async fn correction_with_empty_side_returns_guidance() {
    let fx = fixture().await;
    let routed = fx.router.route("correggi: qualcosa -> ").await;

    assert_eq!(routed.tier, Tier::Correction);
    assert!(routed.reply.starts_with("✏️"));
}

#[tokio::test]
async fn llm_failure_returns_apology_and_records_nothing() {
    let fx = fixture_with(MockLlm::failing()).await;
    let routed = fx.router.route("che ore sono?").await;

    assert_eq!(routed.tier, Tier::Llm);
    assert_eq!(routed.reply, "😓 Mi dispiace, al momento non riesco a rispondere.");
    assert!(fx.memory.is_empty().await);
    assert!(fx.history.is_empty().await);
}

#[tokio::test]
async fn timer_tier_schedules_a_notification() {
    let mut fx = fixture().await;
    tokio::time::pause();

    fx.router.route("timer 30 secondi").await;
    tokio::time::advance(Duration::from_secs(31)).await;

    let notification = fx.notifications.recv().await.unwrap();
    assert_eq!(notification.message, "⏰ Timer terminato!");
}
