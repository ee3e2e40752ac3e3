use super::Rewriter;
use crate::{Options, RuleSet, Tag, TagModifier, Targets};
use std::cell::Cell;

fn run(rules: &RuleSet, html: &str) -> String {
    Rewriter::new(html, rules).run(&Options::default())
}

#[test]
fn empty_rule_set_is_identity() {
    let docs = [
        "",
        "plain text",
        "<p class='lead' id=intro>Hello <b>world</b></p>",
        "<!DOCTYPE html><html><head><title>x</title></head><body></body></html>",
        "<img src=\"a.png\"/><br><hr />",
        "<!-- comment --> a < b > c",
        "<script>if (a<b) {}</script>",
        "<p>unterminated <!-- comment <b>",
        "<ul>\n  <li data-x=\"1\">één</li>\n</ul>",
    ];

    let rules = RuleSet::new();
    for doc in docs {
        assert_eq!(run(&rules, doc), doc, "empty rule set changed {doc:?}");
    }
}

#[test]
fn rule_examples() {
    // Array of (rule set, input, expected output)
    let mut cases: Vec<(RuleSet, &str, &str)> = Vec::new();

    let mut rules = RuleSet::new();
    rules.replace_tag("div", "<SECTION>", Targets::OPENING);
    cases.push((rules, "<div>x</div>", "<SECTION>x</div>"));

    let mut rules = RuleSet::new();
    rules.replace_tag("b", "<strong>", Targets::OPENING).replace_tag("b", "</strong>", Targets::CLOSING);
    cases.push((rules, "<p><b>bold</b> and <B>loud</B></p>", "<p><strong>bold</strong> and <strong>loud</strong></p>"));

    let mut rules = RuleSet::new();
    rules.replace_contents("p", "A", "X").unwrap();
    cases.push((rules, "<p>AAA<b>BBB</b>CCC</p>", "<p>XXX<b>BBB</b>CCC</p>"));

    let mut rules = RuleSet::new();
    rules.replace_contents("div", "a", "b").unwrap();
    cases.push((rules, "<div>a<div>a</div>a</div>", "<div>b<div>b</div>b</div>"));

    let mut rules = RuleSet::new();
    rules.replace_contents("p", "b", "BBB").unwrap();
    cases.push((rules, "<p>ab</p>-<p>abab</p>", "<p>aBBB</p>-<p>aBBBaBBB</p>"));

    let mut rules = RuleSet::new();
    rules.replace_contents("p", "p", "q").unwrap();
    cases.push((rules, "</p>unopened p", "</p>unopened p"));

    let mut rules = RuleSet::new();
    rules.replace_contents("p", "x", "y").unwrap();
    rules.replace_contents("div", "p", "q").unwrap();
    cases.push((rules, "<p>x<div></p>x</div>", "<p>x<div></q>x</div>"));

    let mut rules = RuleSet::new();
    rules.replace_contents("p", "x", "y").unwrap();
    cases.push((rules, "<p/>x<p>x", "<p/>x<p>x"));

    let mut rules = RuleSet::new();
    rules.replace_attribute("img", "src", r"^/(.*)$", "https://cdn.example.com/$1").unwrap();
    cases.push((rules, r#"<img src="/a.png" alt=pic>"#, r#"<IMG ALT="pic" SRC="https://cdn.example.com/a.png">"#));

    let mut rules = RuleSet::new();
    rules.replace_attribute("img", "src", "x", "y").unwrap();
    cases.push((rules, r#"<img src="x"/><img alt="x">"#, r#"<IMG SRC="y"/><img alt="x">"#));

    let mut rules = RuleSet::new();
    rules.replace_tag("hr", "<br>", Targets::BOTH).surround_tag("hr", "\n", "", Targets::OPENING);
    cases.push((rules, "a<hr>b", "a\n<br>b"));

    let mut rules = RuleSet::new();
    rules.surround_tag("", "(", ")", Targets::BOTH).surround_tag("b", "[", "]", Targets::BOTH);
    cases.push((rules, "<b>x</b><i>y</i>", "(<B>)x(</B>)(<I>)y(</I>)"));

    let mut rules = RuleSet::new();
    rules.surround_tag("", "[", "]", Targets::OPENING);
    cases.push((rules, "<#>", "[<>]"));

    let mut rules = RuleSet::new();
    rules.surround_tag("img", "[", "]", Targets::OPENING);
    cases.push((rules, "<img src=x>", r#"[<IMG SRC="x">]"#));

    let mut rules = RuleSet::new();
    rules.replace_contents("p", "x", "y").unwrap();
    rules.replace_tag("p", "<div>", Targets::BOTH);
    cases.push((rules, "<p>x</p>", "<p>y</p>"));

    let mut rules = RuleSet::new();
    rules.replace_tag("div", "", Targets::BOTH);
    cases.push((rules, "<!-- <div>fake</div> --><div>real</div>", "<!-- <div>fake</div> -->real"));

    let mut rules = RuleSet::new();
    rules.replace_tag("b", "<strong>", Targets::OPENING);
    cases.push((rules, "<b>x<!-- open <b>y", "<strong>x<!-- open <b>y"));


    let mut rules = RuleSet::new();
    rules.replace_contents("p", "é", "e").unwrap();
    cases.push((rules, "<p title=\"ü\">héllo wörld</p>", "<p title=\"ü\">hello wörld</p>"));

    for (rules, input, expected) in cases {
        let output = run(&rules, input);
        assert_eq!(output, expected, "input {input:?} with rules {rules:?}");
    }
}

#[test]
fn script_body_is_not_tokenized() {
    let mut rules = RuleSet::new();
    rules.modify_tag("", |tag: &mut Tag| {
        if tag.name() != "SCRIPT" {
            tag.replace_with("");
        }
    });

    let html = "<script>if (a<b) {}</script>";
    assert_eq!(run(&RuleSet::new(), html), html);

    // Every tag outside the script vanishes; nothing inside the body is touched.
    let html = "<div><script>for (i=0;i<n;i++) { x = '<b>' }</script></div>";
    assert_eq!(run(&rules, html), "<script>for (i=0;i<n;i++) { x = '<b>' }</script>");
}

#[test]
fn swallowed_script_end_keeps_suppressing() {
    let mut rules = RuleSet::new();
    rules.replace_tag("p", "<div>", Targets::OPENING).replace_tag("b", "<strong>", Targets::OPENING);

    // `<b</script>` is taken as one tag inside the body, so the real end of
    // the script is never seen and nothing after it is rewritten.
    for html in ["<script>a<b</script><p>", "<script>if (a<b) {}</script><b>x</b>"] {
        assert_eq!(run(&rules, html), html);
    }
}

#[test]
fn resolve_url_rules() {
    let mut rules = RuleSet::new();
    rules.resolve_url("a", "href", "https://example.com/dir/");

    let absolute = r#"<a href="https://example.com/a">a</a>"#;
    assert_eq!(run(&rules, absolute), absolute);

    assert_eq!(run(&rules, r#"<a href="b.html">b</a>"#), r#"<A HREF="https://example.com/dir/b.html">b</a>"#);
    assert_eq!(run(&rules, r#"<a href='../up.html'>"#), r#"<A HREF="https://example.com/up.html">"#);
    assert_eq!(run(&rules, r#"<a href="//cdn.example.org/x">"#), r#"<A HREF="https://cdn.example.org/x">"#);
    assert_eq!(run(&rules, "<a name=top>"), r#"<A HREF="https://example.com/dir/" NAME="top">"#);
}

#[test]
fn resolve_url_against_relative_base() {
    let mut rules = RuleSet::new();
    rules.resolve_url("a", "href", "/docs/").resolve_url("img", "src", "img/");

    assert_eq!(run(&rules, r#"<a href="x.html">"#), r#"<A HREF="/docs/x.html">"#);
    assert_eq!(run(&rules, r#"<a href="../up.html">"#), r#"<A HREF="/up.html">"#);
    assert_eq!(run(&rules, r#"<img src="a.png">"#), r#"<IMG SRC="img/a.png">"#);
}

#[test]
fn unusable_base_leaves_value_unchanged() {
    let mut rules = RuleSet::new();
    rules.resolve_url("a", "href", "http://");

    let html = r#"<a href="x.html">"#;
    assert_eq!(run(&rules, html), html);
}

#[test]
fn absolute_url_stops_rule_evaluation() {
    let mut rules = RuleSet::new();
    rules.resolve_url("a", "href", "https://example.com/dir/");
    rules.replace_attribute("a", "href", "example", "sample").unwrap();

    let absolute = r#"<a href="http://example.com/a">"#;
    assert_eq!(run(&rules, absolute), absolute);
    assert_eq!(run(&rules, r#"<a href="b.html">"#), r#"<A HREF="https://sample.com/dir/b.html">"#);
}

struct Numberer {
    next: Cell<usize>,
}

impl TagModifier for Numberer {
    fn modify_tag(&self, tag: &mut Tag) {
        if !tag.is_opening() {
            return;
        }
        let n = self.next.get() + 1;
        self.next.set(n);
        tag.set_attribute("id", format!("item-{n}"));
    }
}

#[test]
fn modify_tag_with_state() {
    let mut rules = RuleSet::new();
    rules.modify_tag("li", Numberer { next: Cell::new(0) });

    let html = "<ul><li>a</li><li class=x>b</li></ul>";
    let expected = r#"<ul><LI ID="item-1">a</li><LI CLASS="x" ID="item-2">b</li></ul>"#;
    assert_eq!(run(&rules, html), expected);
}

#[test]
fn modify_tag_closure_sees_every_tag() {
    let mut rules = RuleSet::new();
    rules.modify_tag("", |tag: &mut Tag| {
        if tag.name() == "FONT" {
            tag.set_name("span");
            tag.remove_attribute("color");
        }
    });

    let html = "<p><font color=red>x</font></p>";
    assert_eq!(run(&rules, html), "<p><SPAN>x</SPAN></p>");
}

#[test]
fn metrics_track_the_pass() {
    let mut rules = RuleSet::new();
    rules.replace_contents("p", "a", "b").unwrap();

    let result = Rewriter::new("<!--x--><p>a</p><script>a<b</script><p>", &rules).run_with_metrics(&Options::default());
    assert_eq!(result.html, "<!--x--><p>b</p><script>a<b</script><p>");
    assert_eq!(result.metrics.comments, 1);
    assert_eq!(result.metrics.tags, 3);
    assert_eq!(result.metrics.suppressed, 2);
    assert_eq!(result.metrics.captured, 1);
    assert_eq!(result.metrics.unclosed, 0);
    assert_eq!(result.metrics.rewritten, 0);
}
