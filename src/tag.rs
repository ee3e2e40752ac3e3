//! Tag model.
//!
//! A [`Tag`] is the structured form of one raw tag substring such as
//! `<a href='x.html' class=link>`. Parsing is heuristic, not a real HTML
//! tokenizer:
//!
//! ```text
//! "<a href='x.html' class=link>"
//!   │ └──────┬─────┘ └───┬────┘
//!   │     attribute    attribute     (searched left to right)
//!   └─ name: first alnum run followed by whitespace, '/' or '>'
//! ```
//!
//! Names (of the tag and of its attributes) are normalized to uppercase.
//! Serializing a tag always produces the canonical form
//! (`<A CLASS="link" HREF="x.html">`); the engine only asks for it when a
//! rule actually changed something.

use std::collections::BTreeMap;
use std::fmt;

/// One parsed tag occurrence.
///
/// `Tag` is also the handle passed to [`TagModifier`](crate::TagModifier)s,
/// so every field is reachable through accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attributes: BTreeMap<String, String>,
    opening: bool,
    closing: bool,
    replacement: Option<String>,
    before: Option<String>,
    after: Option<String>,
}

impl Tag {
    /// Parse a raw tag such as `<div class="x">`, `</div>` or `<br/>`.
    ///
    /// Never fails: text without a recognizable name yields a tag with an
    /// empty name and no attributes.
    pub fn parse(data: &str) -> Self {
        let trimmed = data.trim();
        let closing_only = trimmed.starts_with("</");
        let mut tag = Tag {
            opening: !closing_only,
            closing: closing_only || trimmed.ends_with("/>"),
            ..Tag::default()
        };

        let Some(name_caps) = crate::regex!(r"([a-zA-Z0-9]+)[\s/>]").captures(data) else {
            return tag;
        };
        tag.name = name_caps[1].to_ascii_uppercase();

        // Attributes are searched for after the name's delimiter.
        let rest = name_caps.get(0).map_or("", |m| &data[m.end()..]);
        let attribute_re = crate::regex!(r#"[a-zA-Z0-9]+\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]*)"#);
        for attr in attribute_re.find_iter(rest) {
            let attr = attr.as_str();
            let Some((name, value)) = attr.split_once('=') else {
                continue;
            };
            tag.attributes.insert(name.trim().to_ascii_uppercase(), unquote(value.trim()).to_string());
        }

        tag
    }

    /// Uppercase tag name; empty when the raw text had none.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_ascii_uppercase();
    }

    pub fn is_opening(&self) -> bool {
        self.opening
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    pub fn set_opening(&mut self, opening: bool) {
        self.opening = opening;
    }

    pub fn set_closing(&mut self, closing: bool) {
        self.closing = closing;
    }

    /// Value of attribute `name` (case-insensitive), quotes already stripped.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_uppercase()).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(&name.to_ascii_uppercase())
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_ascii_uppercase(), value.into());
    }

    /// Remove attribute `name`, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(&name.to_ascii_uppercase())
    }

    /// Attributes as `(NAME, value)` pairs, sorted by name.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace the whole tag with literal text. Surround text still applies.
    pub fn replace_with(&mut self, text: impl Into<String>) {
        self.replacement = Some(text.into());
    }

    pub fn replacement(&self) -> Option<&str> {
        self.replacement.as_deref()
    }

    /// Emit `before` and `after` around the tag (or around its replacement).
    pub fn set_surroundings(&mut self, before: impl Into<String>, after: impl Into<String>) {
        self.before = Some(before.into());
        self.after = Some(after.into());
    }

    /// The `(before, after)` surround text, empty strings when unset.
    pub fn surroundings(&self) -> (&str, &str) {
        (self.before.as_deref().unwrap_or(""), self.after.as_deref().unwrap_or(""))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (before, after) = self.surroundings();
        f.write_str(before)?;

        if let Some(replacement) = &self.replacement {
            f.write_str(replacement)?;
        } else {
            f.write_str("<")?;
            if self.closing && !self.opening {
                f.write_str("/")?;
            }
            f.write_str(&self.name)?;
            for (name, value) in &self.attributes {
                write!(f, " {name}=\"{value}\"")?;
            }
            if self.opening && self.closing {
                f.write_str("/")?;
            }
            f.write_str(">")?;
        }

        f.write_str(after)
    }
}

/// Strip one surrounding pair of quotes, single or double.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
