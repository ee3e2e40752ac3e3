//! Rewrite run metrics.
//!
//! Counters and timings for a single pass over a document. They are collected
//! unconditionally (a handful of integer increments) and surfaced by
//! [`rewrite_verbose_with`](crate::rewrite_verbose_with) and the CLI's
//! `--stats` report.

use crate::RuleMode;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for `Rewriter::run_with_metrics`.
    pub total: Duration,
    /// Tags parsed and offered to the rule set.
    pub tags: usize,
    /// Comments passed through untouched.
    pub comments: usize,
    /// Tag-like matches inside `<script>` bodies that were skipped.
    pub suppressed: usize,
    /// Tags whose text was replaced in the buffer.
    pub rewritten: usize,
    /// Enclosed regions rewritten by `ReplaceContents` rules.
    pub captured: usize,
    /// Capture entries still open when the document ended.
    pub unclosed: usize,
    /// How many times each rule mode took effect.
    pub applied: BTreeMap<RuleMode, usize>,
}

impl RunMetrics {
    pub(crate) fn record(&mut self, mode: RuleMode) {
        *self.applied.entry(mode).or_default() += 1;
    }
}

/// Rewriter output bundled with its metrics.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub html: String,
    pub metrics: RunMetrics,
}
