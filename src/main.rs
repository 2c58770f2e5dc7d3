use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use walkup::{AscentGuard, Config, EntryKind, EntryMatcher, walk_up_guarded};

/// Find the nearest entry with a given name in a directory or any of its ancestors.
#[derive(Parser, Debug)]
#[command(name = "walkup", version)]
struct Args {
    /// Entry names to look for
    #[arg(required_unless_present = "regex")]
    names: Vec<String>,

    /// Match entry names against a regular expression instead
    #[arg(short = 'e', long, conflicts_with = "names")]
    regex: Option<String>,

    /// Where to start (defaults to the current directory)
    #[arg(short, long)]
    start: Option<PathBuf>,

    /// Maximum number of parent directories to climb
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Stop climbing after a level containing this entry (repeatable)
    #[arg(long = "stop-at", value_name = "MARKER")]
    stop_at: Vec<String>,

    /// Only accept entries of this type: any, file or dir
    #[arg(short = 't', long = "type", default_value_t = EntryKind::Any)]
    kind: EntryKind,

    /// Never match entries whose name starts with a dot
    #[arg(long)]
    no_hidden: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log every level scanned to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    start: PathBuf,
    found: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_matcher(args: &Args, config: &Config) -> Result<EntryMatcher, walkup::MatcherError> {
    let matcher = match &args.regex {
        Some(pattern) => EntryMatcher::pattern(pattern)?,
        None => EntryMatcher::names(&args.names),
    };
    Ok(matcher
        .with_kind(args.kind)
        .with_hidden(config.include_hidden && !args.no_hidden))
}

fn build_guard(args: &Args, config: &Config) -> AscentGuard {
    let guard = AscentGuard::new().stop_at(config.stop_at.iter().chain(&args.stop_at).cloned());
    match args.max_depth.or(config.max_depth) {
        Some(depth) => guard.max_depth(depth),
        None => guard,
    }
}

fn run(args: &Args) -> Result<Report, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    // A relative walk stops at `.`, so anchor it to reach the real ancestors.
    let start = match &args.start {
        Some(path) => cwd.join(path),
        None => cwd,
    };
    let config = Config::load(&start);
    let matcher = build_matcher(args, &config)?;
    let mut guard = build_guard(args, &config);

    let found = walk_up_guarded(&start, |p| matcher.matches(p), |dir| guard.allow(dir))?;
    debug!(ascents = guard.ascents(), found = found.is_some(), "walk finished");
    Ok(Report { start, found })
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let report = match run(&args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("walkup: {}", e);
            return ExitCode::from(2);
        }
    };

    if args.json {
        match serde_json::to_string(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("walkup: cannot encode result: {}", e);
                return ExitCode::from(2);
            }
        }
    } else if let Some(found) = &report.found {
        println!("{}", found.display());
    }

    if report.found.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
