// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aida shell` command implementation.
//!
//! Wires the full stack together (embedder, semantic memory, dispatchers,
//! Ollama provider, router) and runs an interactive REPL with readline
//! history. Timer notifications arrive asynchronously through a channel
//! and are printed between prompts.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tracing::{info, warn};

use aida_commands::{CommandRegistry, HybridDispatcher, KeywordDispatcher};
use aida_config::AidaConfig;
use aida_core::AidaError;
use aida_core::traits::embedding::EmbeddingAdapter;
use aida_core::traits::provider::LlmProvider;
use aida_core::types::Notification;
use aida_memory::{EMBEDDING_DIM, ModelManager, SemanticMemory, SentenceEmbedder};
use aida_ollama::OllamaProvider;
use aida_router::{InteractionLog, Router};

/// Runs the interactive assistant session.
pub async fn run_shell(config: AidaConfig) -> Result<(), AidaError> {
    let data_dir = &config.memory.data_dir;
    std::fs::create_dir_all(data_dir).map_err(|e| {
        AidaError::Config(format!(
            "data directory {} is not writable: {e}",
            data_dir.display()
        ))
    })?;

    // Embedding model: downloaded on first run, then loaded eagerly so a
    // broken model fails here rather than mid-conversation.
    let model_manager = ModelManager::new(data_dir.clone(), config.memory.model_name.clone());
    let model_path = model_manager.ensure().await?;
    let embedder: Arc<dyn EmbeddingAdapter> = Arc::new(SentenceEmbedder::load(&model_path)?);
    info!(model = %config.memory.model_name, "embedder ready");

    let memory = Arc::new(SemanticMemory::open_in_dir(
        Arc::clone(&embedder),
        data_dir,
        EMBEDDING_DIM,
        config.memory.context_distance_gate as f32,
    )?);
    let entries = memory.len().await;
    info!(entries, "semantic memory loaded");

    let (notify_tx, mut notify_rx) = mpsc::channel::<Notification>(16);

    let mut registry = CommandRegistry::builtin(notify_tx, &config.commands.calendar_url)?;
    registry.init_embeddings(embedder.as_ref()).await?;
    let hybrid = HybridDispatcher::new(
        registry,
        Arc::clone(&embedder),
        config.commands.similarity_threshold as f32,
    );
    let keyword = KeywordDispatcher::builtin();

    let ollama = OllamaProvider::new(&config.ollama)?;
    if ollama.is_running().await {
        println!("{}", "✅ Ollama è attivo.".green());
    } else {
        warn!(base_url = %config.ollama.base_url, "Ollama server not reachable");
        println!(
            "{}",
            "⚠️ Ollama non risponde: le risposte libere non funzioneranno.".yellow()
        );
    }
    let llm: Arc<dyn LlmProvider> = Arc::new(ollama);

    let history = Arc::new(InteractionLog::open(data_dir.join("memory.json")));

    let router = Router::new(
        hybrid,
        keyword,
        Arc::clone(&memory),
        llm,
        history,
        Duration::from_secs(config.ollama.timeout_secs),
    );

    // Deferred notifications (timer expiry) print between prompts.
    tokio::spawn(async move {
        while let Some(notification) = notify_rx.recv().await {
            println!("\n{}", notification.message.yellow());
        }
    });

    let mut rl = DefaultEditor::new()
        .map_err(|e| AidaError::Internal(format!("failed to initialize readline: {e}")))?;

    println!(
        "{}",
        format!("🤖 {} avviato (offline). Scrivi 'esci' per terminare.", config.agent.name)
            .bold()
            .green()
    );

    let prompt = format!("{}> ", "tu".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("esci") {
                    break;
                }

                let _ = rl.add_history_entry(&line);

                let routed = router.route(trimmed).await;
                println!("{} {}", "AI:".bold(), routed.reply);
                println!("{}", format!("[{}]", routed.tier).dimmed());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "errore".red());
                break;
            }
        }
    }

    println!("{}", "🤖 Spegnimento in corso. Ciao!".dimmed());
    Ok(())
}
