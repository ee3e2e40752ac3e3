/// Compile a literal regular expression once and hand out a `&'static Regex`.
///
/// The fixed tokenizer and tag-model patterns go through this macro; rule
/// patterns supplied at runtime are compiled by `RuleSet` instead.
#[doc(hidden)]
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
