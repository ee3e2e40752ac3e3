//! Rule-driven HTML rewriting.
//!
//! `retag` finds tags with lightweight pattern matching (no DOM, no full HTML
//! parser) and applies declarative per-tag rules to them: replace a tag,
//! rewrite an attribute, rewrite the text a tag encloses, resolve relative
//! URLs, wrap a tag in text, or hand the tag to custom code.
//!
//! ```
//! use retag::{RuleSet, Targets, rewrite};
//!
//! let mut rules = RuleSet::new();
//! rules.resolve_url("a", "href", "https://example.com/docs/");
//! rules.surround_tag("img", "<figure>", "</figure>", Targets::OPENING);
//!
//! let html = r#"<a href="intro.html">Intro</a><img src="x.png">"#;
//! assert_eq!(
//!     rewrite(html, &rules),
//!     r#"<A HREF="https://example.com/docs/intro.html">Intro</a><figure><IMG SRC="x.png"></figure>"#
//! );
//! ```
//!
//! Tags no rule changed are copied through byte-for-byte. Any other tag is
//! written in canonical form (uppercase names, double-quoted values), then
//! wrapped in its surround text.

mod macros;
mod api;
mod engine;
mod error;
mod rules;
mod tag;

pub use api::{
    Options, RewriteDetails, RewriteResult, RewriteResultVerbose, rewrite, rewrite_verbose_with, rewrite_with,
};
pub use error::RuleError;
pub use rules::{Rule, RuleMode, RuleSet, TagModifier, Targets};
pub use tag::Tag;
