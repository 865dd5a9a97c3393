// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The request router: three dispatch tiers, a correction side-channel,
//! and post-hoc recording into semantic memory and the interaction log.

pub mod history;
pub mod router;

pub use history::InteractionLog;
pub use router::{Routed, Router};
