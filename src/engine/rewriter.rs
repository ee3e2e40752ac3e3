//! The rewrite loop.
//!
//! [`Rewriter`] owns a copy of the input and edits it in place:
//!
//! ```text
//! offset ──▶ next_span(&buffer[offset..])
//!              │ comment ─────────────────────────▶ skip
//!              │ tag
//!              ▼
//!           Tag::parse ── inside <script>? ───────▶ skip
//!              │
//!              ▼
//!           rules_for(name): named rules, then wildcard rules
//!              │  (ReplaceContents may splice enclosed text first)
//!              ▼
//!           changed? ── yes ─▶ splice tag.to_string() over the raw tag
//!              │ no          (raw text kept byte-for-byte)
//!              ▼
//!           offset = tag start + emitted length
//! ```
//!
//! The scan position is always re-derived from the start of the current tag
//! plus the length of what was written there, never carried across a splice.

use super::capture::CaptureStack;
use super::metrics::{RunMetrics, RunResult};
use super::tokenizer::{SpanKind, next_span};
use crate::{Options, Rule, RuleMode, RuleSet, Tag};
use log::{debug, trace, warn};
use std::ops::ControlFlow;
use std::time::Instant;
use url::{Position, Url};

/// Where the tag being processed currently sits in the buffer.
struct Occurrence {
    /// Absolute offset of the tag's `<`. Moves when enclosed contents ahead of
    /// it are rewritten.
    start: usize,
    /// Length of the raw tag text.
    raw_len: usize,
    /// Set by a `ReplaceContents` rule on an opening tag; the capture entry is
    /// pushed once the tag's final length is known.
    opens_capture: bool,
}

/// One rewrite pass over a document.
///
/// Usage: `Rewriter::new(html, &rules).run(&options)`.
#[derive(Debug)]
pub struct Rewriter<'a> {
    buffer: String,
    rules: &'a RuleSet,
    captures: CaptureStack,
}

impl<'a> Rewriter<'a> {
    pub fn new(html: &str, rules: &'a RuleSet) -> Self {
        Self { buffer: html.to_string(), rules, captures: CaptureStack::default() }
    }

    /// Rewrite the document and return the result.
    pub fn run(self, options: &Options) -> String {
        self.run_with_metrics(options).html
    }

    /// Rewrite the document, collecting counters and timings along the way.
    pub fn run_with_metrics(mut self, options: &Options) -> RunResult {
        let started = Instant::now();
        let rules = self.rules;
        let mut metrics = RunMetrics::default();
        let mut offset = 0;
        let mut previous = Tag::default();

        while let Some(span) = next_span(&self.buffer[offset..]) {
            let start = offset + span.start;
            let raw_len = span.text.len();

            if span.kind == SpanKind::Comment {
                trace!("comment at {start} ({raw_len} bytes) passed through");
                metrics.comments += 1;
                offset = start + raw_len;
                continue;
            }

            let parsed = Tag::parse(span.text);

            if options.script_heuristic && is_script_body(&previous, &parsed) {
                trace!("skipping {:?} at {start}: inside <script>", span.text);
                metrics.suppressed += 1;
                offset = start + raw_len;
                continue;
            }

            metrics.tags += 1;
            let mut tag = parsed.clone();
            let mut occurrence = Occurrence { start, raw_len, opens_capture: false };

            if rules.applies_to(tag.name()) {
                let name = tag.name().to_string();
                for rule in rules.rules_for(&name) {
                    if self.apply(rule, &mut tag, &mut occurrence, &mut metrics).is_break() {
                        break;
                    }
                }
            }

            let raw_range = occurrence.start..occurrence.start + occurrence.raw_len;
            let emitted_len = if tag == parsed {
                occurrence.raw_len
            } else {
                let text = tag.to_string();
                trace!("rewrote {:?} at {} as {:?}", parsed.name(), occurrence.start, text);
                self.buffer.replace_range(raw_range, &text);
                metrics.rewritten += 1;
                text.len()
            };
            offset = occurrence.start + emitted_len;

            if occurrence.opens_capture {
                debug!("capture opened for {} at {offset}", tag.name());
                self.captures.push(tag.name(), offset);
            }

            previous = tag;
        }

        metrics.unclosed = self.captures.len();
        if metrics.unclosed > 0 {
            debug!("discarding {} unclosed capture(s) at end of document", metrics.unclosed);
        }
        metrics.total = started.elapsed();
        debug!(
            "rewrite done: {} tags, {} rewritten, {} comments, {} suppressed in {:?}",
            metrics.tags, metrics.rewritten, metrics.comments, metrics.suppressed, metrics.total
        );

        RunResult { html: self.buffer, metrics }
    }

    /// Apply one rule to the current tag. `Break` stops evaluation of the
    /// remaining rules for this occurrence.
    fn apply(
        &mut self,
        rule: &Rule,
        tag: &mut Tag,
        occurrence: &mut Occurrence,
        metrics: &mut RunMetrics,
    ) -> ControlFlow<()> {
        match rule {
            Rule::ReplaceContents { pattern, replacement } => {
                // A self-closing tag encloses nothing.
                if tag.is_opening() && tag.is_closing() {
                    return ControlFlow::Break(());
                }
                if tag.is_opening() {
                    occurrence.opens_capture = true;
                } else if let Some(begin) = self.captures.pop_if_top(tag.name()) {
                    let end = occurrence.start;
                    let contents = pattern.replace_all(&self.buffer[begin..end], replacement.as_str()).into_owned();
                    debug!("capture closed for {}: {} bytes -> {} bytes", tag.name(), end - begin, contents.len());
                    self.buffer.replace_range(begin..end, &contents);
                    occurrence.start = begin + contents.len();
                    metrics.captured += 1;
                    metrics.record(RuleMode::ReplaceContents);
                }
                return ControlFlow::Break(());
            }
            Rule::ResolveUrl { attribute, base } => {
                // A missing attribute resolves as empty, i.e. to the base itself.
                let value = tag.attribute(attribute).unwrap_or_default().to_string();
                if value.starts_with("http://") || value.starts_with("https://") {
                    return ControlFlow::Break(());
                }
                match resolve_against(base, &value) {
                    Ok(url) => {
                        tag.set_attribute(attribute, url);
                        metrics.record(RuleMode::ResolveUrl);
                    }
                    Err(err) => warn!("cannot resolve {value:?} against {base:?}: {err}"),
                }
            }
            Rule::ReplaceAttribute { attribute, pattern, replacement } => {
                if let Some(value) = tag.attribute(attribute) {
                    let value = pattern.replace_all(value, replacement.as_str()).into_owned();
                    tag.set_attribute(attribute, value);
                    metrics.record(RuleMode::ReplaceAttribute);
                }
            }
            Rule::ReplaceTag { text, targets } => {
                if targets.matches(tag) {
                    tag.replace_with(text.as_str());
                    metrics.record(RuleMode::ReplaceTag);
                }
            }
            Rule::SurroundTag { before, after, targets } => {
                if targets.matches(tag) {
                    tag.set_surroundings(before.as_str(), after.as_str());
                    metrics.record(RuleMode::SurroundTag);
                }
            }
            Rule::ModifyTag(modifier) => {
                modifier.modify_tag(tag);
                metrics.record(RuleMode::ModifyTag);
            }
        }
        ControlFlow::Continue(())
    }
}

/// Whether `current` follows an opening `<script>` and is not its closing tag,
/// i.e. is most likely a `<` inside script code.
fn is_script_body(previous: &Tag, current: &Tag) -> bool {
    previous.name() == "SCRIPT" && !previous.is_closing() && !(current.name() == "SCRIPT" && current.is_closing())
}

/// Stand-in origin for bases without a scheme, so `Url::join` can do the path
/// arithmetic.
const RELATIVE_ANCHOR: &str = "http://relative.invalid/";

/// Resolve `reference` against `base`.
///
/// An absolute base goes through `Url::join`. A relative base (`/docs/`,
/// `dir/`) gives a relative result: `x.html` against `/docs/` is
/// `/docs/x.html`, against `dir/` it is `dir/x.html`.
fn resolve_against(base: &str, reference: &str) -> Result<String, url::ParseError> {
    match Url::parse(base) {
        Ok(base) => Ok(base.join(reference)?.into()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let anchor = Url::parse(RELATIVE_ANCHOR)?;
            let resolved = anchor.join(base)?.join(reference)?;
            if resolved.origin() != anchor.origin() {
                return Ok(resolved.into());
            }
            let path = &resolved[Position::BeforePath..];
            let path = if base.starts_with('/') { path } else { path.strip_prefix('/').unwrap_or(path) };
            Ok(path.to_string())
        }
        Err(err) => Err(err),
    }
}
