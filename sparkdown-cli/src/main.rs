//! Sparkdown Parser CLI
//!
//! Converts a Sparkdown file to `<prefix>.html`, optionally dumping tokens,
//! the element tree, or a JSON snapshot along the way.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as _;
use owo_colors::OwoColorize;
use sparkdown_common::warning::set_warnings_enabled;
use sparkdown_dom::NodeId;
use sparkdown_parser::serialize::{document_title, print_tree, to_html, to_html_page, to_json};
use sparkdown_parser::{ParseOutput, Parser, ParserConfig, ReaderSource, tokenize};

/// sdparse: convert Sparkdown markup to HTML
#[derive(clap::Parser, Debug)]
#[command(name = "sdparse")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Convert notes.sd to notes.html
    sdparse -i notes.sd -o notes

    # Write only the HTML fragment, without the page wrapper
    sdparse -i notes.sd -o notes --fragment

    # Also write notes.json and print the element tree
    sdparse -i notes.sd -o notes --json --tree

    # Show what the tokenizer sees
    sdparse -i notes.sd -o notes --tokens
"#)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// The Sparkdown file to parse
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Prefix of the output files (defaults to the input path without its extension)
    #[arg(short, long, value_name = "PREFIX")]
    output: Option<PathBuf>,

    /// Log element construction to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress warnings and the summary line
    #[arg(short, long)]
    quiet: bool,

    /// Lookahead window size; must hold the longest markup run
    #[arg(long, value_name = "N")]
    window: Option<usize>,

    /// Write the bare HTML fragment instead of a full page
    #[arg(long)]
    fragment: bool,

    /// Also write `<prefix>.json` with the element tree
    #[arg(long)]
    json: bool,

    /// Print the element tree to stdout
    #[arg(long)]
    tree: bool,

    /// Print the token stream to stdout
    #[arg(long)]
    tokens: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = match cli.window {
        Some(window) => ParserConfig::default().with_window_capacity(window)?,
        None => ParserConfig::default(),
    };

    if cli.tokens {
        let input = fs::read_to_string(&cli.input)
            .with_context(|| format!("reading {}", cli.input.display()))?;
        println!("=== Tokens ===");
        for token in tokenize(&input, &config) {
            println!("{token}");
        }
        println!();
    }

    let source = ReaderSource::open(&cli.input)?;
    let output = Parser::new(source, &config)
        .run()
        .with_context(|| format!("parsing {}", cli.input.display()))?;
    log::info!(
        "parsed {} nodes, {} issues",
        output.tree.len(),
        output.issues.len()
    );

    if cli.tree {
        println!("=== Element Tree ===");
        print_tree(&output.tree, NodeId::ROOT, 0);
    }

    let prefix = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension(""));
    let html_path = with_suffix(&prefix, "html");
    let html = if cli.fragment {
        to_html(&output.tree)
    } else {
        let title = document_title(&output.tree).unwrap_or_else(|| default_title(&cli.input));
        to_html_page(&output.tree, &title)
    };
    fs::write(&html_path, html).with_context(|| format!("writing {}", html_path.display()))?;

    if cli.json {
        let json_path = with_suffix(&prefix, "json");
        let json = to_json(&output.tree)?;
        fs::write(&json_path, json).with_context(|| format!("writing {}", json_path.display()))?;
        log::info!("wrote {}", json_path.display());
    }

    if !cli.quiet {
        report(&output, &html_path);
    }
    Ok(())
}

/// `-v` shows debug output, `-q` only errors; `RUST_LOG` overrides both.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    if cli.quiet {
        set_warnings_enabled(false);
    }
}

/// `notes` + `html` → `notes.html`, keeping any dots already in the prefix.
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn default_title(input: &Path) -> String {
    input
        .file_stem()
        .map_or_else(|| "Sparkdown".to_string(), |stem| stem.to_string_lossy().into_owned())
}

fn report(output: &ParseOutput, html_path: &Path) {
    if !output.issues.is_empty() {
        println!("\n=== Parse Issues ===");
        for issue in &output.issues {
            println!("  - {issue}");
        }
    }
    println!("{} {}", "wrote".green(), html_path.display());
}
