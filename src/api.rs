use crate::engine;
use crate::{RuleMode, RuleSet};
use std::time::Duration;

/// Options that affect rewriting behavior.
#[derive(Debug, Clone)]
pub struct Options {
    /// Treat tag-like matches after an opening `<script>` as script code
    /// until its closing tag shows up, instead of rewriting them.
    pub script_heuristic: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { script_heuristic: true }
    }
}

/// Result from [`rewrite_with`].
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// The rewritten document.
    pub html: String,
    /// Total elapsed time spent rewriting.
    pub elapsed: Duration,
}

/// Additional details returned by [`rewrite_verbose_with`].
///
/// Meant for debugging rule sets: how much of the document the engine looked
/// at and what the rules actually did.
#[derive(Debug, Clone)]
pub struct RewriteDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Tags offered to the rule set.
    pub tags: usize,
    /// Comments passed through.
    pub comments: usize,
    /// Tag-like matches skipped inside `<script>` bodies.
    pub suppressed: usize,
    /// Tags whose text changed.
    pub rewritten: usize,
    /// Enclosed regions rewritten by `ReplaceContents` rules.
    pub captured: usize,
    /// `ReplaceContents` regions never closed before the end of the document.
    pub unclosed: usize,
    /// Number of rules registered.
    pub rule_count: usize,
    /// How many times each rule mode took effect, in mode order.
    pub applied: Vec<(RuleMode, usize)>,
}

/// Result from [`rewrite_verbose_with`].
#[derive(Debug, Clone)]
pub struct RewriteResultVerbose {
    pub html: String,
    pub elapsed: Duration,
    pub details: RewriteDetails,
}

/// Rewrite `html` with `rules` and default [`Options`].
///
/// # Example
/// ```
/// use retag::{RuleSet, Targets, rewrite};
///
/// let mut rules = RuleSet::new();
/// rules.replace_tag("b", "<strong>", Targets::OPENING).replace_tag("b", "</strong>", Targets::CLOSING);
///
/// assert_eq!(rewrite("<p><b>hi</b></p>", &rules), "<p><strong>hi</strong></p>");
/// ```
pub fn rewrite(html: &str, rules: &RuleSet) -> String {
    engine::Rewriter::new(html, rules).run(&Options::default())
}

/// Rewrite `html` with `rules` and the provided `options`.
pub fn rewrite_with(html: &str, rules: &RuleSet, options: &Options) -> RewriteResult {
    let run = engine::Rewriter::new(html, rules).run_with_metrics(options);
    RewriteResult { html: run.html, elapsed: run.metrics.total }
}

/// Rewrite `html` and return counters describing the pass.
///
/// The default [`rewrite_with`] path returns only the document and timing.
pub fn rewrite_verbose_with(html: &str, rules: &RuleSet, options: &Options) -> RewriteResultVerbose {
    let run = engine::Rewriter::new(html, rules).run_with_metrics(options);
    let metrics = run.metrics;

    let details = RewriteDetails {
        total: metrics.total,
        tags: metrics.tags,
        comments: metrics.comments,
        suppressed: metrics.suppressed,
        rewritten: metrics.rewritten,
        captured: metrics.captured,
        unclosed: metrics.unclosed,
        rule_count: rules.len(),
        applied: metrics.applied.into_iter().collect(),
    };

    RewriteResultVerbose { html: run.html, elapsed: metrics.total, details }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Targets;

    #[test]
    fn rewrite_with_returns_document() {
        let mut rules = RuleSet::new();
        rules.surround_tag("hr", "<div class=\"rule\">", "</div>", Targets::OPENING);

        let res = rewrite_with("a<hr>b", &rules, &Options::default());
        assert_eq!(res.html, "a<div class=\"rule\"><HR></div>b");
        assert!(res.elapsed >= Duration::ZERO);
    }

    #[test]
    fn rewrite_verbose_counts_what_happened() {
        let mut rules = RuleSet::new();
        rules.replace_contents("p", "o", "0").unwrap();
        rules.replace_tag("i", "", Targets::BOTH);

        let html = "<!-- c --><p>foo <i>bar</i></p><p>open";
        let res = rewrite_verbose_with(html, &rules, &Options::default());

        assert_eq!(res.html, "<!-- c --><p>f00 bar</p><p>open");
        assert_eq!(res.elapsed, res.details.total);
        assert_eq!(res.details.comments, 1);
        assert_eq!(res.details.tags, 5);
        assert_eq!(res.details.rewritten, 2);
        assert_eq!(res.details.captured, 1);
        assert_eq!(res.details.unclosed, 1);
        assert_eq!(res.details.rule_count, 2);
        assert_eq!(res.details.applied, vec![(RuleMode::ReplaceTag, 2), (RuleMode::ReplaceContents, 1)]);
    }

    #[test]
    fn script_heuristic_can_be_disabled() {
        let mut rules = RuleSet::new();
        rules.replace_tag("b", "<strong>", Targets::OPENING);

        let html = "<script>x</script><b>";
        let on = rewrite_with("<script>if (a<b>c) {}</script>", &rules, &Options::default());
        assert_eq!(on.html, "<script>if (a<b>c) {}</script>");

        let off = rewrite_with("<script>if (a<b>c) {}</script>", &rules, &Options { script_heuristic: false });
        assert_eq!(off.html, "<script>if (a<strong>c) {}</script>");

        assert_eq!(rewrite(html, &rules), "<script>x</script><strong>");
    }
}
