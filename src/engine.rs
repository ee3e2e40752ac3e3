//! Rewrite engine.
//!
//! This module is the entry point for the tag-rewriting machinery. The work
//! is split into focused submodules under `src/engine/`:
//!
//! ```text
//! input ── Rewriter::new ──▶ buffer (owned copy)
//!                              │
//!            ┌─────────────────┘
//!            ▼
//!   next_span (tokenizer.rs)        tag or comment after the cursor
//!            │
//!            ▼
//!   Tag::parse (crate::tag)         name, attributes, opening/closing
//!            │
//!            ▼
//!   Rewriter::apply (rewriter.rs)   named rules, then wildcard rules
//!            │    └─ CaptureStack (capture.rs) for ReplaceContents
//!            ▼
//!   splice + advance cursor         until no span is left
//!            │
//!            ▼
//!   RunResult { html, metrics }     (metrics.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `tokenizer.rs`: heuristic tag/comment boundary detection. No HTML
//!   grammar: `<` + not `!`/`>` + anything up to `>`.
//! - `capture.rs`: the LIFO of open `ReplaceContents` regions.
//! - `rewriter.rs`: the loop itself, rule dispatch and offset bookkeeping.
//! - `metrics.rs`: counters and timings for one pass.
//!
//! ## Debugging
//!
//! The engine logs through the `log` facade: `trace` for every span and
//! rewrite, `debug` for capture bookkeeping and the per-run summary.

#[path = "engine/capture.rs"]
mod capture;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/rewriter.rs"]
mod rewriter;
#[path = "engine/tokenizer.rs"]
mod tokenizer;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

#[allow(unused_imports)]
pub use metrics::{RunMetrics, RunResult};
pub use rewriter::Rewriter;
