// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command handling for the Aida assistant.
//!
//! Two independent dispatch tiers over a shared handler vocabulary:
//!
//! - **HybridDispatcher**: deterministic keyword-pattern rules first, then a
//!   cosine-similarity match against precomputed phrase embeddings.
//! - **KeywordDispatcher**: a small substring-keyword table covering intents
//!   the hybrid registry does not enumerate.
//!
//! Handlers themselves are plain async functions of the original utterance;
//! deferred side effects (timer expiry) go out through a one-way
//! notification channel rather than back into the transport.

pub mod handlers;
pub mod hybrid;
pub mod keyword;
pub mod registry;

pub use handlers::{CalendarHandler, EchoHandler, FakeWeatherHandler, TimerHandler};
pub use hybrid::{HybridDispatcher, cosine_similarity};
pub use keyword::KeywordDispatcher;
pub use registry::{CommandEntry, CommandRegistry};
