// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Substring-keyword dispatch table.
//!
//! A second-chance tier over intents the hybrid registry does not
//! enumerate. Keywords are scanned in declaration order; the first keyword
//! contained in the lowercased utterance wins.

use std::sync::Arc;

use tracing::debug;

use aida_core::traits::command::CommandHandler;

use crate::handlers::{EchoHandler, FakeWeatherHandler};

/// Ordered keyword→handler table.
pub struct KeywordDispatcher {
    table: Vec<(String, Arc<dyn CommandHandler>)>,
}

impl KeywordDispatcher {
    pub fn new() -> Self {
        Self { table: Vec::new() }
    }

    /// The built-in table: "ripeti" echoes, "meteo" answers with the canned
    /// forecast.
    pub fn builtin() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register("ripeti", Arc::new(EchoHandler));
        dispatcher.register("meteo", Arc::new(FakeWeatherHandler));
        dispatcher
    }

    /// Append a keyword to the scan order.
    pub fn register(&mut self, keyword: &str, handler: Arc<dyn CommandHandler>) {
        self.table.push((keyword.to_lowercase(), handler));
    }

    /// Run the first handler whose keyword the utterance contains, or
    /// return `None`.
    pub async fn dispatch(&self, utterance: &str) -> Option<String> {
        let lower = utterance.to_lowercase();
        for (keyword, handler) in &self.table {
            if lower.contains(keyword.as_str()) {
                debug!(keyword = %keyword, handler = handler.name(), "keyword match");
                return Some(handler.handle(utterance).await);
            }
        }
        None
    }
}

impl Default for KeywordDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[tokio::test]
    async fn ripeti_routes_to_echo() {
        let dispatcher = KeywordDispatcher::builtin();
        let reply = dispatcher.dispatch("ripeti ciao").await;
        assert_eq!(reply.as_deref(), Some("🔁 ciao"));
    }

    #[tokio::test]
    async fn meteo_routes_to_weather() {
        let dispatcher = KeywordDispatcher::builtin();
        let reply = dispatcher.dispatch("che meteo fa oggi").await;
        assert!(reply.unwrap().contains("sole"));
    }

    #[tokio::test]
    async fn no_keyword_is_none() {
        let dispatcher = KeywordDispatcher::builtin();
        assert!(dispatcher.dispatch("che ore sono?").await.is_none());
    }

    #[tokio::test]
    async fn matching_is_case_insensitive() {
        let dispatcher = KeywordDispatcher::builtin();
        assert!(dispatcher.dispatch("RIPETI tutto").await.is_some());
    }

    struct Marker(&'static str);

    #[async_trait]
    impl CommandHandler for Marker {
        fn name(&self) -> &str {
            self.0
        }
        async fn handle(&self, _utterance: &str) -> String {
            self.0.to_string()
        }
    }

    #[tokio::test]
    async fn declaration_order_breaks_overlaps() {
        let mut dispatcher = KeywordDispatcher::new();
        dispatcher.register("meteo domani", Arc::new(Marker("specific")));
        dispatcher.register("meteo", Arc::new(Marker("general")));

        let reply = dispatcher.dispatch("meteo domani a Roma").await;
        assert_eq!(reply.as_deref(), Some("specific"));
    }
}
