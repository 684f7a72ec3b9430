use callscan::{ExplainDetails, Fact, FactMatch, NodeSummary};

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

pub fn print_explain(details: &ExplainDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Scanning: \"{}\"", details.text), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Active rules ━━━", ansi::GRAY));
    if details.active_rules.is_empty() {
        println!("{}", palette.dim("  none"));
    } else {
        println!("  {}", palette.paint(details.active_rules.join(", "), ansi::BLUE));
    }

    println!("\n{}", palette.paint("━━━ Saturation ━━━", ansi::GRAY));
    print_saturation(details, &palette);

    println!("\n{}", palette.paint("━━━ Facts ━━━", ansi::GRAY));
    if details.matches.is_empty() {
        println!("{}", palette.dim("  No facts found"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • Rules were filtered out (check key phrase requirements)");
        println!("  • Regex patterns didn't match");
        println!("  • Production functions returned None");
        println!("\n{}", palette.dim("  Tip: set RUST_LOG=callscan::engine=trace to see rule activation"));
    } else {
        print_matches(&details.matches, &palette);
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Saturation: {}  │  Resolve: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", details.saturation_total), ansi::CYAN),
        palette.dim(format!("{:?}", details.resolve)),
    );
    println!();
}

fn print_saturation(details: &ExplainDetails, palette: &ansi::Palette) {
    for pass in &details.saturation {
        let label = if pass.pass == 0 { "Pass 0 (regex):".to_string() } else { format!("Pass {}:", pass.pass) };

        println!(
            "  {} {}",
            palette.paint(label, ansi::BLUE),
            if pass.produced > 0 {
                palette.paint(format!("✓ {} nodes", pass.produced), ansi::GREEN)
            } else {
                palette.dim(format!("✗ {} nodes", pass.produced))
            }
        );

        for node in pass.samples.iter().take(5) {
            println!("    {}", fmt_node_compact(node, palette));
        }
        if pass.produced > 5 {
            println!("    {}", palette.dim(format!("... +{} more", pass.produced - 5)));
        }
    }
}

fn print_matches(matches: &[FactMatch], palette: &ansi::Palette) {
    for (idx, m) in matches.iter().enumerate() {
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(palette.paint(m.kind().name(), ansi::GREEN)),
            palette.dim("│"),
            palette.paint(format!("span {}..{}", m.start, m.end), ansi::YELLOW),
        );
        println!("      {} {}", palette.dim("text:"), palette.paint(&m.text, ansi::CYAN));
        println!("      {} {}", palette.dim("fact:"), palette.paint(describe(&m.fact), ansi::BLUE));
    }
}

fn describe(fact: &Fact) -> String {
    match fact {
        Fact::Greeting { words } => words.clone(),
        Fact::Introduce { first, second: Some(second) } => format!("{first} {second}"),
        Fact::Introduce { first, second: None } => first.clone(),
        Fact::Company { name } => name.clone(),
        Fact::Bye { words, weekday: Some(day) } => format!("{words} ({day})"),
        Fact::Bye { words, weekday: None } => words.clone(),
    }
}

fn fmt_node_compact(node: &NodeSummary, palette: &ansi::Palette) -> String {
    format!(
        "{} {} {}",
        palette.paint(format!("{}..{}", node.start, node.end), ansi::YELLOW),
        palette.paint(&node.rule, ansi::BLUE),
        palette.dim(node.preview.clone())
    )
}
