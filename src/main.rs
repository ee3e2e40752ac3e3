mod debug_report;

use clap::{ArgAction, Parser};
use retag::{Options, RuleSet, Tag, Targets, rewrite_verbose_with};
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

/// Rewrite HTML tags with declarative rules.
///
/// Rules are applied per tag in this order: --resolve-url, --replace-attribute,
/// --replace-contents, --replace-tag, --surround-tag, --drop-attribute. An empty
/// TAG (e.g. `--surround-tag '=[|]'`) matches every tag.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// HTML file to rewrite (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Resolve relative URLs in an attribute against BASE
    #[arg(long = "resolve-url", value_name = "TAG:ATTR=BASE")]
    resolve_url: Vec<String>,

    /// Regex-substitute inside an attribute value ($1 refers to groups)
    #[arg(long = "replace-attribute", value_name = "TAG:ATTR=PATTERN=>REPLACEMENT")]
    replace_attribute: Vec<String>,

    /// Regex-substitute the raw text enclosed by a tag
    #[arg(long = "replace-contents", value_name = "TAG=PATTERN=>REPLACEMENT")]
    replace_contents: Vec<String>,

    /// Replace a tag with literal text
    #[arg(long = "replace-tag", value_name = "TAG=TEXT")]
    replace_tag: Vec<String>,

    /// Wrap a tag in literal text
    #[arg(long = "surround-tag", value_name = "TAG=BEFORE|AFTER")]
    surround_tag: Vec<String>,

    /// Remove an attribute from a tag
    #[arg(long = "drop-attribute", value_name = "TAG:ATTR")]
    drop_attribute: Vec<String>,

    /// Apply --replace-tag and --surround-tag to opening tags only
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "closing_only")]
    opening_only: bool,

    /// Apply --replace-tag and --surround-tag to closing tags only
    #[arg(long, action = ArgAction::SetTrue)]
    closing_only: bool,

    /// Rewrite tag-like text inside <script> bodies too
    #[arg(long = "no-script-heuristic", action = ArgAction::SetTrue)]
    no_script_heuristic: bool,

    /// Print a run report to stderr
    #[arg(long, action = ArgAction::SetTrue)]
    stats: bool,

    /// Force ANSI color in the report
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color in the report
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rules = match build_rules(&cli) {
        Ok(rules) => rules,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&cli, &rules) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli, rules: &RuleSet) -> Result<(), String> {
    let html = read_input(cli.input.as_deref())?;
    let options = Options { script_heuristic: !cli.no_script_heuristic };
    let res = rewrite_verbose_with(&html, rules, &options);

    write_output(cli.output.as_deref(), &res.html)?;

    if cli.stats {
        let color = if cli.color {
            true
        } else if cli.no_color {
            false
        } else {
            io::stderr().is_terminal()
        };
        debug_report::print_run(&res.details, color);
    }
    Ok(())
}

fn targets(cli: &Cli) -> Targets {
    if cli.opening_only {
        Targets::OPENING
    } else if cli.closing_only {
        Targets::CLOSING
    } else {
        Targets::BOTH
    }
}

fn build_rules(cli: &Cli) -> Result<RuleSet, String> {
    let mut rules = RuleSet::new();
    let targets = targets(cli);

    for arg in &cli.resolve_url {
        let (tag, attr, base) = split_attribute_arg(arg, "--resolve-url")?;
        rules.resolve_url(tag, attr, base);
    }
    for arg in &cli.replace_attribute {
        let (tag, attr, rest) = split_attribute_arg(arg, "--replace-attribute")?;
        let (pattern, replacement) = split_substitution(rest, arg, "--replace-attribute")?;
        rules
            .replace_attribute(tag, attr, pattern, replacement)
            .map_err(|err| format!("error: --replace-attribute '{arg}': {err}"))?;
    }
    for arg in &cli.replace_contents {
        let (tag, rest) = split_tag_arg(arg, "--replace-contents")?;
        let (pattern, replacement) = split_substitution(rest, arg, "--replace-contents")?;
        rules
            .replace_contents(tag, pattern, replacement)
            .map_err(|err| format!("error: --replace-contents '{arg}': {err}"))?;
    }
    for arg in &cli.replace_tag {
        let (tag, text) = split_tag_arg(arg, "--replace-tag")?;
        rules.replace_tag(tag, text, targets);
    }
    for arg in &cli.surround_tag {
        let (tag, rest) = split_tag_arg(arg, "--surround-tag")?;
        let (before, after) = rest
            .split_once('|')
            .ok_or_else(|| format!("error: --surround-tag '{arg}' (expected TAG=BEFORE|AFTER)"))?;
        rules.surround_tag(tag, before, after, targets);
    }
    for arg in &cli.drop_attribute {
        let (tag, attr) = arg
            .split_once(':')
            .ok_or_else(|| format!("error: --drop-attribute '{arg}' (expected TAG:ATTR)"))?;
        let attr = attr.to_string();
        rules.modify_tag(tag, move |tag: &mut Tag| {
            tag.remove_attribute(&attr);
        });
    }

    Ok(rules)
}

/// `TAG=REST` -> `(TAG, REST)`.
fn split_tag_arg<'a>(arg: &'a str, flag: &str) -> Result<(&'a str, &'a str), String> {
    arg.split_once('=').ok_or_else(|| format!("error: {flag} '{arg}' is missing '='"))
}

/// `TAG:ATTR=REST` -> `(TAG, ATTR, REST)`.
fn split_attribute_arg<'a>(arg: &'a str, flag: &str) -> Result<(&'a str, &'a str, &'a str), String> {
    let (target, rest) = split_tag_arg(arg, flag)?;
    let (tag, attr) = target.split_once(':').ok_or_else(|| format!("error: {flag} '{arg}' (expected TAG:ATTR=...)"))?;
    if attr.is_empty() {
        return Err(format!("error: {flag} '{arg}' names no attribute"));
    }
    Ok((tag, attr, rest))
}

/// `PATTERN=>REPLACEMENT` -> `(PATTERN, REPLACEMENT)`.
fn split_substitution<'a>(rest: &'a str, arg: &str, flag: &str) -> Result<(&'a str, &'a str), String> {
    rest.split_once("=>").ok_or_else(|| format!("error: {flag} '{arg}' (expected PATTERN=>REPLACEMENT)"))
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).map_err(|err| format!("error: failed to read {}: {err}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, html: &str) -> Result<(), String> {
    match path {
        Some(path) => fs::write(path, html).map_err(|err| format!("error: failed to write {}: {err}", path.display())),
        None => io::stdout().write_all(html.as_bytes()).map_err(|err| format!("error: failed to write stdout: {err}")),
    }
}
