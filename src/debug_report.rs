use retag::RewriteDetails;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Print a run report to stderr (stdout carries the rewritten document).
pub fn print_run(details: &RewriteDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    eprintln!("\n{}", palette.bold(palette.paint(format!("⚙  Rewrite: {} rules", details.rule_count), ansi::CYAN)));

    eprintln!("\n{}", palette.paint("━━━ Scan ━━━", ansi::GRAY));
    print_counter(&palette, "tags", details.tags);
    print_counter(&palette, "comments", details.comments);
    print_counter(&palette, "script", details.suppressed);

    eprintln!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));
    if details.applied.is_empty() {
        eprintln!("{}", palette.dim("  No rule took effect"));
        eprintln!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        eprintln!("  • Tag names in the rules do not occur in the document");
        eprintln!("  • Targeted attributes are missing, or URLs are already absolute");
        eprintln!("  • Patterns did not match");
        eprintln!("\n{}", palette.dim("  Tip: run with -vv (or RUST_LOG=retag=trace) to see every tag"));
    } else {
        for (mode, count) in &details.applied {
            eprintln!(
                "  {} {}",
                palette.paint(format!("{:<18}", mode.name()), ansi::BLUE),
                palette.paint(count.to_string(), ansi::GREEN)
            );
        }
    }
    print_counter(&palette, "rewritten", details.rewritten);
    print_counter(&palette, "captured", details.captured);
    if details.unclosed > 0 {
        eprintln!(
            "  {} {}",
            palette.paint(format!("{:<18}", "unclosed"), ansi::YELLOW),
            palette.paint(details.unclosed.to_string(), ansi::YELLOW)
        );
    }

    eprintln!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    eprintln!("  Total: {}", palette.paint(format!("{:?}", details.total), ansi::GREEN));
    eprintln!();
}

fn print_counter(palette: &ansi::Palette, label: &str, value: usize) {
    let value = if value > 0 { palette.paint(value.to_string(), ansi::GREEN) } else { palette.dim(value.to_string()) };
    eprintln!("  {} {}", palette.dim(format!("{:<18}", label)), value);
}
