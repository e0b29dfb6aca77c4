use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use bardclean::discovery::{self, DiscoveryConfig};
use bardclean::{resolve_file_arguments, ExitCode, Pipeline, ProcessorConfig};

#[derive(Parser, Debug)]
#[command(name = "bardclean")]
#[command(about = "Strip punctuation from the dialogue of play texts, leaving poetry alone")]
#[command(version)]
struct Args {
    /// Text files to process; relative names are looked up in --dir first
    files: Vec<PathBuf>,

    /// Directory containing the text files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Process every *.txt file in --dir
    #[arg(long)]
    all: bool,

    /// Classify files and report whether they are safe to process; writes nothing
    #[arg(long)]
    validate: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Process files even when they look like pure poetry
    #[arg(long)]
    force: bool,

    /// Show what would change without writing files
    #[arg(long)]
    dry_run: bool,

    /// Do not keep a .bak copy of rewritten files
    #[arg(long)]
    no_backup: bool,

    /// Write results to this directory instead of rewriting in place
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Confidence below which a classification is flagged
    #[arg(long, default_value_t = 0.5)]
    min_confidence: f64,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // WHY: logs go to stderr so stdout carries only the report (JSON output stays parseable)
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let exit = match run(args).await {
        Ok(exit) => exit,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from_error(&e)
        }
    };
    std::process::exit(exit.code());
}

async fn run(args: Args) -> Result<ExitCode> {
    info!(?args, "Parsed CLI arguments");

    if !(0.0..=1.0).contains(&args.min_confidence) {
        eprintln!("Error: --min-confidence must be between 0.0 and 1.0, got {}", args.min_confidence);
        return Ok(ExitCode::InvalidArguments);
    }
    if !args.dir.is_dir() {
        eprintln!("Error: Directory not found: {}", args.dir.display());
        return Ok(ExitCode::InvalidArguments);
    }

    let Some(files) = select_files(&args).await? else {
        return Ok(ExitCode::UserCancelled);
    };

    let config = ProcessorConfig {
        min_confidence: args.min_confidence,
        block_poetry: !args.force,
        create_backup: !args.no_backup,
        dry_run: args.dry_run,
    };
    let pipeline = Pipeline::new(config, args.output_dir.clone())?;
    let progress = progress_bar(&args, files.len());

    let (rendered, exit) = if args.validate {
        let report = pipeline
            .validate_files(&files, args.fail_fast, |path| advance(&progress, path))
            .await;
        let rendered = if args.json { serde_json::to_string_pretty(&report)? } else { report.render() };
        (rendered, report.outcome)
    } else {
        let report = pipeline
            .process_files(&files, args.fail_fast, |file| advance(&progress, Path::new(&file.filepath)))
            .await;
        let rendered = if args.json { serde_json::to_string_pretty(&report)? } else { report.render() };
        (rendered, report.outcome)
    };

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }
    println!("{rendered}");

    Ok(exit)
}

/// Files named on the command line, or every text file in --dir with --all.
/// `None` means nothing was selected; the candidates are listed instead.
async fn select_files(args: &Args) -> Result<Option<Vec<PathBuf>>> {
    if !args.files.is_empty() {
        return Ok(Some(resolve_file_arguments(&args.files, &args.dir)));
    }

    let discovery_config = DiscoveryConfig { fail_fast: args.fail_fast };
    let discovered = discovery::collect_discovered_files(&args.dir, discovery_config).await?;
    let candidates: Vec<PathBuf> = discovered.into_iter().filter(|f| f.is_valid()).map(|f| f.path).collect();

    if candidates.is_empty() {
        eprintln!("No text files found in {}", args.dir.display());
        return Ok(None);
    }

    if args.all {
        info!("Selected {} files from {}", candidates.len(), args.dir.display());
        return Ok(Some(candidates));
    }

    eprintln!("No files selected. Name files to process or pass --all. Candidates in {}:", args.dir.display());
    for candidate in &candidates {
        eprintln!("  {}", candidate.file_name().unwrap_or(candidate.as_os_str()).to_string_lossy());
    }
    Ok(None)
}

fn progress_bar(args: &Args, file_count: usize) -> Option<ProgressBar> {
    if args.json || args.no_progress || file_count < 2 {
        return None;
    }

    let bar = ProgressBar::new(file_count as u64);
    let style = ProgressStyle::with_template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    Some(bar)
}

fn advance(progress: &Option<ProgressBar>, path: &Path) {
    if let Some(bar) = progress {
        let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy().to_string();
        bar.set_message(name);
        bar.inc(1);
    }
}

