//! Rules and rule sets.
//!
//! A [`Rule`] is one transformation; a [`RuleSet`] indexes rules by the
//! uppercase tag name they apply to. The empty name is the wildcard bucket:
//! its rules run for every tag occurrence, after the name-specific ones.
//!
//! ```text
//! RuleSet
//!   "A"  ─▶ [ResolveUrl(HREF), ReplaceAttribute(CLASS)]
//!   "P"  ─▶ [ReplaceContents]
//!   ""   ─▶ [ModifyTag]            (every tag)
//!
//! rules_for("A") = ResolveUrl, ReplaceAttribute, ModifyTag
//! ```

use crate::{RuleError, Tag};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

bitflags::bitflags! {
    /// Which occurrences of a tag a rule affects.
    ///
    /// A self-closing tag counts as both opening and closing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Targets: u8 {
        const OPENING = 1 << 0;
        const CLOSING = 1 << 1;
        const BOTH = Self::OPENING.bits() | Self::CLOSING.bits();
    }
}

impl Targets {
    /// Whether a rule with these targets fires for `tag`.
    pub fn matches(self, tag: &Tag) -> bool {
        (self.contains(Targets::OPENING) && tag.is_opening()) || (self.contains(Targets::CLOSING) && tag.is_closing())
    }
}

/// Caller-supplied tag mutation.
///
/// Invoked once per matching tag occurrence with full access to the tag.
/// Closures taking `&mut Tag` implement this trait; stateful modifiers can
/// implement it directly and keep their state behind a `Cell`/`RefCell`.
pub trait TagModifier {
    fn modify_tag(&self, tag: &mut Tag);
}

impl<F> TagModifier for F
where
    F: Fn(&mut Tag),
{
    fn modify_tag(&self, tag: &mut Tag) {
        self(tag)
    }
}

/// One transformation.
pub enum Rule {
    /// Replace the whole tag with literal text.
    ReplaceTag { text: String, targets: Targets },
    /// Regex-substitute (all matches) inside one attribute value.
    ReplaceAttribute { attribute: String, pattern: Regex, replacement: String },
    /// Regex-substitute (all matches) the raw text between an opening tag and
    /// its closing tag.
    ReplaceContents { pattern: Regex, replacement: String },
    /// Resolve one attribute value against a base URL. Values that already
    /// start with `http://` or `https://` are left alone.
    ResolveUrl { attribute: String, base: String },
    /// Emit literal text before and after the tag.
    SurroundTag { before: String, after: String, targets: Targets },
    /// Hand the tag to an arbitrary modifier.
    ModifyTag(Box<dyn TagModifier>),
}

/// Discriminant of [`Rule`], used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleMode {
    ReplaceTag,
    ReplaceAttribute,
    ReplaceContents,
    ResolveUrl,
    SurroundTag,
    ModifyTag,
}

impl RuleMode {
    pub fn name(self) -> &'static str {
        match self {
            RuleMode::ReplaceTag => "replace-tag",
            RuleMode::ReplaceAttribute => "replace-attribute",
            RuleMode::ReplaceContents => "replace-contents",
            RuleMode::ResolveUrl => "resolve-url",
            RuleMode::SurroundTag => "surround-tag",
            RuleMode::ModifyTag => "modify-tag",
        }
    }
}

impl Rule {
    pub fn mode(&self) -> RuleMode {
        match self {
            Rule::ReplaceTag { .. } => RuleMode::ReplaceTag,
            Rule::ReplaceAttribute { .. } => RuleMode::ReplaceAttribute,
            Rule::ReplaceContents { .. } => RuleMode::ReplaceContents,
            Rule::ResolveUrl { .. } => RuleMode::ResolveUrl,
            Rule::SurroundTag { .. } => RuleMode::SurroundTag,
            Rule::ModifyTag(_) => RuleMode::ModifyTag,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::ReplaceTag { text, targets } => {
                f.debug_struct("ReplaceTag").field("text", text).field("targets", targets).finish()
            }
            Rule::ReplaceAttribute { attribute, pattern, replacement } => f
                .debug_struct("ReplaceAttribute")
                .field("attribute", attribute)
                .field("pattern", &pattern.as_str())
                .field("replacement", replacement)
                .finish(),
            Rule::ReplaceContents { pattern, replacement } => f
                .debug_struct("ReplaceContents")
                .field("pattern", &pattern.as_str())
                .field("replacement", replacement)
                .finish(),
            Rule::ResolveUrl { attribute, base } => {
                f.debug_struct("ResolveUrl").field("attribute", attribute).field("base", base).finish()
            }
            Rule::SurroundTag { before, after, targets } => f
                .debug_struct("SurroundTag")
                .field("before", before)
                .field("after", after)
                .field("targets", targets)
                .finish(),
            Rule::ModifyTag(_) => f.debug_tuple("ModifyTag").field(&"<modifier>").finish(),
        }
    }
}

/// Rules indexed by uppercase tag name, `""` meaning every tag.
///
/// Registration order is kept per name and is the order rules are applied in.
#[derive(Debug, Default)]
pub struct RuleSet {
    by_tag: HashMap<String, Vec<Rule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` for `tag` (any case; `""` for every tag).
    pub fn add_rule(&mut self, tag: &str, rule: Rule) -> &mut Self {
        self.by_tag.entry(tag.to_ascii_uppercase()).or_default().push(rule);
        self
    }

    /// Replace `tag` occurrences selected by `targets` with `text`.
    pub fn replace_tag(&mut self, tag: &str, text: impl Into<String>, targets: Targets) -> &mut Self {
        self.add_rule(tag, Rule::ReplaceTag { text: text.into(), targets })
    }

    /// Substitute `pattern` with `replacement` inside attribute `attribute`.
    ///
    /// `replacement` may reference capture groups (`$1`, `${name}`).
    pub fn replace_attribute(
        &mut self,
        tag: &str,
        attribute: &str,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<&mut Self, RuleError> {
        let pattern = compile(pattern)?;
        Ok(self.add_rule(
            tag,
            Rule::ReplaceAttribute { attribute: attribute.to_ascii_uppercase(), pattern, replacement: replacement.into() },
        ))
    }

    /// Substitute `pattern` with `replacement` in the raw text enclosed by
    /// `tag`, nested markup included.
    pub fn replace_contents(
        &mut self,
        tag: &str,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<&mut Self, RuleError> {
        let pattern = compile(pattern)?;
        Ok(self.add_rule(tag, Rule::ReplaceContents { pattern, replacement: replacement.into() }))
    }

    /// Resolve relative URLs in `attribute` against `base_url`.
    ///
    /// `base_url` is taken as given. A relative base yields relative results,
    /// and one that cannot be resolved against leaves values unchanged.
    pub fn resolve_url(&mut self, tag: &str, attribute: &str, base_url: impl Into<String>) -> &mut Self {
        self.add_rule(tag, Rule::ResolveUrl { attribute: attribute.to_ascii_uppercase(), base: base_url.into() })
    }

    /// Wrap `tag` occurrences selected by `targets` in `before`/`after`.
    pub fn surround_tag(
        &mut self,
        tag: &str,
        before: impl Into<String>,
        after: impl Into<String>,
        targets: Targets,
    ) -> &mut Self {
        self.add_rule(tag, Rule::SurroundTag { before: before.into(), after: after.into(), targets })
    }

    /// Run `modifier` on every occurrence of `tag`.
    pub fn modify_tag(&mut self, tag: &str, modifier: impl TagModifier + 'static) -> &mut Self {
        self.add_rule(tag, Rule::ModifyTag(Box::new(modifier)))
    }

    /// Rules applicable to a tag named `name`: name-specific rules first,
    /// then wildcard rules, each in registration order.
    ///
    /// A nameless tag only sees the wildcard rules.
    pub fn rules_for<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Rule> + use<'a> {
        let named = if name.is_empty() { None } else { self.by_tag.get(name) };
        named.into_iter().flatten().chain(self.by_tag.get("").into_iter().flatten())
    }

    /// Whether any rule would apply to a tag named `name`.
    pub fn applies_to(&self, name: &str) -> bool {
        (!name.is_empty() && self.by_tag.contains_key(name)) || self.by_tag.contains_key("")
    }

    pub fn len(&self) -> usize {
        self.by_tag.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn compile(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern { pattern: pattern.to_string(), source })
}
