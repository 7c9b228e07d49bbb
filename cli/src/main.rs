//! magsplit CLI - split magazine issues into article records

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use magsplit::{
    ErrorMode, JsonFormat, Magsplit, ParseOptions, PublicationProfile, SegmentOptions,
    SegmentStrategy,
};

#[derive(Parser)]
#[command(name = "magsplit")]
#[command(version)]
#[command(about = "Split scanned magazine issues into article records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split issues into one JSON record per article plus summary.json
    Split {
        /// Input issues (.pdf or .json pages)
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "articles")]
        output: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        segment: SegmentArgs,
    },

    /// Print the reconstructed text of every page
    Pages {
        /// Input issue
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Fail on the first undecodable page
        #[arg(long)]
        strict: bool,
    },

    /// Print the detected article anchors
    Toc {
        /// Input issue
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        segment: SegmentArgs,
    },

    /// Print the built-in publication profile as JSON
    Profile,

    /// Show version information
    Version,
}

#[derive(Args)]
struct SegmentArgs {
    /// Publication profile (JSON)
    #[arg(long, value_name = "FILE", env = "MAGSPLIT_PROFILE")]
    profile: Option<PathBuf>,

    /// Anchor strategy
    #[arg(long, value_enum, default_value = "toc")]
    strategy: Strategy,

    /// Maximum pages an article may extend past its start page
    #[arg(long, value_name = "N", default_value = "20")]
    max_span: u32,

    /// Fail on the first undecodable page
    #[arg(long)]
    strict: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Table of contents, section headers as fallback
    Toc,
    /// Section headers only
    Headers,
}

impl From<Strategy> for SegmentStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Toc => SegmentStrategy::TocWithBounds,
            Strategy::Headers => SegmentStrategy::HeadersOnly,
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Split {
            inputs,
            output,
            compact,
            segment,
        } => cmd_split(&inputs, &output, compact, &segment),
        Commands::Pages { input, strict } => cmd_pages(&input, strict),
        Commands::Toc {
            input,
            json,
            segment,
        } => cmd_toc(&input, json, &segment),
        Commands::Profile => cmd_profile(),
        Commands::Version => {
            cmd_version();
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn parse_options(strict: bool) -> ParseOptions {
    // Lenient by default: one broken page should not lose the issue
    let mode = if strict {
        ErrorMode::Strict
    } else {
        ErrorMode::Lenient
    };
    ParseOptions::new().with_error_mode(mode)
}

fn build(args: &SegmentArgs, format: JsonFormat) -> CliResult<Magsplit> {
    let profile = match &args.profile {
        Some(path) => {
            log::info!("Using profile {}", path.display());
            PublicationProfile::from_file(path)?
        }
        None => PublicationProfile::default(),
    };

    let segment = SegmentOptions::new()
        .with_strategy(args.strategy.into())
        .with_max_span(args.max_span);

    Ok(Magsplit::builder()
        .with_profile(profile)
        .with_parse_options(parse_options(args.strict))
        .with_segment_options(segment)
        .with_format(format)
        .build()?)
}

/// Returns `Ok(false)` when at least one issue failed.
fn cmd_split(
    inputs: &[PathBuf],
    output: &Path,
    compact: bool,
    args: &SegmentArgs,
) -> CliResult<bool> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let magsplit = build(args, format)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Splitting {} issue(s)...", inputs.len()));

    let reports = magsplit.process_batch(inputs, output);
    pb.finish_and_clear();

    let mut failed = 0;
    for report in &reports {
        match &report.result {
            Ok(summary) => {
                let pages = report.stats.as_ref().map_or(0, |s| s.page_count);
                println!(
                    "{} {} {} articles from {} pages",
                    "✓".green(),
                    summary.issue.bold(),
                    summary.article_count.to_string().cyan(),
                    pages
                );
                if summary.article_count == 0 {
                    println!("  {}", "no articles detected".yellow());
                }
            }
            Err(e) => {
                failed += 1;
                println!("{} {} {}", "✗".red(), report.path.display(), e.to_string().red());
            }
        }
    }

    println!();
    println!(
        "{} {} issue(s) written to {}, {} failed",
        "Done!".green().bold(),
        reports.len() - failed,
        output.display(),
        failed
    );

    Ok(failed == 0)
}

fn cmd_pages(input: &Path, strict: bool) -> CliResult<bool> {
    let magsplit = Magsplit::builder()
        .with_parse_options(parse_options(strict))
        .build()?;

    for page in magsplit.load_pages(input)? {
        println!("{}", format!("── page {} ──", page.number).dimmed());
        println!("{}", page.text);
    }

    Ok(true)
}

fn cmd_toc(input: &Path, json: bool, args: &SegmentArgs) -> CliResult<bool> {
    let magsplit = build(args, JsonFormat::Pretty)?;
    let pages = magsplit.load_pages(input)?;
    let (anchors, entries) = magsplit.segmenter().detect_entries(&pages);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(true);
    }

    println!("{} {:?}", "Anchors from".cyan().bold(), anchors);
    println!("{}", "─".repeat(40).dimmed());
    for entry in &entries {
        println!("{:>4}  {}", entry.page.to_string().bold(), entry.title);
    }
    if entries.is_empty() {
        println!("{}", "No anchors found".yellow());
    }

    Ok(true)
}

fn cmd_profile() -> CliResult<bool> {
    let profile = PublicationProfile::default();
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(true)
}

fn cmd_version() {
    println!("{} {}", "magsplit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Magazine issue to article splitter");
    println!();
    println!("License: MIT");
}
