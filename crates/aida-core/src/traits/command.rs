// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command handler trait for pre-registered command implementations.

use async_trait::async_trait;

/// A pre-registered command implementation.
///
/// Handlers receive the original (unnormalized) user utterance and always
/// produce a user-visible reply string. A handler that cannot act on the
/// utterance returns a human-readable guidance string rather than an error;
/// dispatch tiers never raise across their boundary.
#[async_trait]
pub trait CommandHandler: Send + Sync + 'static {
    /// Stable identifier used by dispatchers to look the handler up.
    fn name(&self) -> &str;

    /// Execute the command for the given utterance.
    async fn handle(&self, utterance: &str) -> String;
}
