use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use docnorm_core::{
    JsonLine, NormalizeConfig, Normalizer, Profile, RawDocument, RuleLoader, RuleLoaderBuilder, WorkerPool,
    list_documents, read_feed, read_file, read_stdin, repair_file, run_batch, run_pages, to_pretty_json,
    write_records,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Normalize harvested documentation pages into JSON-lines records
#[derive(Parser, Debug)]
#[command(name = "docnorm")]
#[command(author = "docnorm Contributors")]
#[command(version)]
#[command(about = "Normalize harvested documentation into JSON-lines records", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a directory of plaintext documents
    Normalize(NormalizeArgs),

    /// Normalize a JSON-lines crawler feed
    Crawl(CrawlArgs),

    /// Validate a record file and repair unescaped content values
    Repair(RepairArgs),

    /// Normalize one document and print the record
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Directory containing the documents
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// File extension to pick up
    #[arg(long, default_value = "txt", value_name = "EXT")]
    ext: String,

    /// Rule table (plaintext, crawl)
    #[arg(long, value_name = "PROFILE")]
    profile: Option<Profile>,

    #[command(flatten)]
    pool: PoolArgs,

    #[command(flatten)]
    rules: RulesArgs,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// JSON-lines feed of crawled pages
    #[arg(value_name = "FEED")]
    feed: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    pool: PoolArgs,

    #[command(flatten)]
    rules: RulesArgs,
}

#[derive(Args, Debug)]
struct RepairArgs {
    /// Record file to validate
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// File receiving valid and repaired lines
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Plaintext document, or "-" for stdin
    #[arg(value_name = "FILE")]
    input: String,

    /// Rule table (plaintext, crawl)
    #[arg(long, value_name = "PROFILE")]
    profile: Option<Profile>,

    #[command(flatten)]
    rules: RulesArgs,
}

#[derive(Args, Debug)]
struct PoolArgs {
    /// Worker threads (default: available parallelism)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Documents submitted to the pool per round
    #[arg(long, value_name = "N")]
    queue_depth: Option<usize>,
}

#[derive(Args, Debug)]
struct RulesArgs {
    /// Extra rules file, applied after discovered ones
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Rules directory to search instead of the default locations
    #[arg(long, value_name = "DIR")]
    rules_dir: Option<PathBuf>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the run configuration from flags and rules files.
///
/// An explicit `--profile` wins over a rules-file `profile:` directive, which
/// wins over the subcommand's default.
fn build_config(
    profile: Option<Profile>, fallback: Profile, pool: Option<&PoolArgs>, rules: &RulesArgs,
) -> anyhow::Result<NormalizeConfig> {
    let loader = match &rules.rules_dir {
        Some(dir) => RuleLoaderBuilder::new().custom_dir(dir).build(),
        None => RuleLoader::default(),
    };

    let rule_set = match &rules.rules {
        Some(path) => {
            loader.load_with_file(path).with_context(|| format!("Failed to load rules file: {}", path.display()))?
        }
        None => loader.load(),
    };

    let mut builder = NormalizeConfig::builder()
        .profile(profile.or(rule_set.profile).unwrap_or(fallback))
        .rules(&rule_set);

    if let Some(pool) = pool {
        if let Some(workers) = pool.workers {
            builder = builder.workers(workers);
        }
        if let Some(depth) = pool.queue_depth {
            builder = builder.queue_depth(depth);
        }
    }

    Ok(builder.build())
}

fn write_output<R: JsonLine>(output: Option<&Path>, records: &[R]) -> anyhow::Result<usize> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_records(BufWriter::new(file), records)
                .with_context(|| format!("Failed to write records to: {}", path.display()))
        }
        None => write_records(io::stdout().lock(), records).context("Failed to write records to stdout"),
    }
}

fn report_written(written: usize, output: Option<&Path>) {
    if let Some(path) = output {
        echo::print_success(&format!("{} record(s) written to {}", written, path.display().bright_white()));
    }
}

fn run_normalize(args: &NormalizeArgs, verbose: bool) -> anyhow::Result<()> {
    let config = build_config(args.profile, Profile::Plaintext, Some(&args.pool), &args.rules)?;
    let normalizer = Normalizer::new(&config).context("Failed to compile rules")?;
    let pool = WorkerPool::from_config(&config).context("Failed to start worker pool")?;

    if verbose {
        echo::print_step(1, 3, &format!("Scanning {}", args.dir.display().bright_white()));
    }

    let sources = list_documents(&args.dir, &args.ext)
        .with_context(|| format!("Failed to read directory: {}", args.dir.display()))?;

    if verbose {
        echo::print_detail("Documents", &sources.len().to_string());
        echo::print_detail("Profile", &format!("{:?}", config.profile));
        echo::print_detail("Workers", &pool.workers().to_string());
        eprintln!();
        echo::print_step(2, 3, "Normalizing documents");
    }

    let started = Instant::now();
    let report = run_batch(&pool, &normalizer, &sources);
    let elapsed = started.elapsed();

    if verbose {
        echo::print_step(3, 3, "Writing records");
    }

    let written = write_output(args.output.as_deref(), &report.records)?;
    tracing::info!(
        written,
        failures = report.failures.len(),
        profile = ?config.profile,
        elapsed_ms = elapsed.as_millis() as u64,
        "normalize finished"
    );

    if verbose {
        echo::print_batch_summary(report.records.len(), &report.failures, elapsed);
    } else if !report.failures.is_empty() {
        echo::print_warning(&format!("{} document(s) could not be normalized", report.failures.len()));
    }

    report_written(written, args.output.as_deref());
    Ok(())
}

fn run_crawl(args: &CrawlArgs, verbose: bool) -> anyhow::Result<()> {
    let config = build_config(None, Profile::Crawl, Some(&args.pool), &args.rules)?;
    let normalizer = Normalizer::new(&config).context("Failed to compile rules")?;
    let pool = WorkerPool::from_config(&config).context("Failed to start worker pool")?;

    if verbose {
        echo::print_step(1, 3, &format!("Reading feed {}", args.feed.display().bright_white()));
    }

    let lines = read_feed(&args.feed).with_context(|| format!("Failed to read feed: {}", args.feed.display()))?;

    if verbose {
        echo::print_detail("Pages", &lines.len().to_string());
        echo::print_detail("Workers", &pool.workers().to_string());
        eprintln!();
        echo::print_step(2, 3, "Normalizing pages");
    }

    let started = Instant::now();
    let report = run_pages(&pool, &normalizer, &lines);
    let elapsed = started.elapsed();

    if verbose {
        echo::print_step(3, 3, "Writing records");
    }

    let written = write_output(args.output.as_deref(), &report.records)?;
    tracing::info!(
        written,
        failures = report.failures.len(),
        profile = ?config.profile,
        elapsed_ms = elapsed.as_millis() as u64,
        "crawl finished"
    );

    if verbose {
        echo::print_batch_summary(report.records.len(), &report.failures, elapsed);
    } else if !report.failures.is_empty() {
        echo::print_warning(&format!("{} page(s) could not be normalized", report.failures.len()));
    }

    report_written(written, args.output.as_deref());
    Ok(())
}

fn run_repair(args: &RepairArgs, verbose: bool) -> anyhow::Result<()> {
    if verbose {
        echo::print_step(1, 1, &format!("Repairing {}", args.input.display().bright_white()));
    }

    let report = repair_file(&args.input, &args.output)
        .with_context(|| format!("Failed to repair record file: {}", args.input.display()))?;
    tracing::info!(
        kept = report.kept,
        repaired = report.repaired,
        dropped = report.dropped.len(),
        output = %args.output.display(),
        "repair finished"
    );

    echo::print_repair_summary(&report);
    echo::print_success(&format!("{} line(s) written to {}", report.written(), args.output.display().bright_white()));
    Ok(())
}

fn run_inspect(args: &InspectArgs, verbose: bool) -> anyhow::Result<()> {
    let config = build_config(args.profile, Profile::Plaintext, None, &args.rules)?;
    let normalizer = Normalizer::new(&config).context("Failed to compile rules")?;

    let document = if args.input == "-" {
        if verbose {
            echo::print_step(1, 2, "Reading from stdin");
        }
        RawDocument::new("stdin", read_stdin().context("Failed to read from stdin")?)
    } else {
        if verbose {
            echo::print_step(1, 2, &format!("Reading from file {}", args.input.bright_white()));
        }
        let text = read_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
        RawDocument::new(args.input.as_str(), text)
    };

    if verbose {
        echo::print_detail("Size", &echo::format_size(document.text.len()));
        eprintln!();
        echo::print_step(2, 2, "Normalizing document");
    }

    let record = normalizer.assemble(&document);
    tracing::debug!(id = %document.id, sections = record.sections.len(), commands = record.commands.len(), "inspected");
    println!("{}", to_pretty_json(&record).context("Failed to encode record")?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "docnorm", &mut io::stdout());
        return Ok(());
    }

    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if cli.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    match &command {
        Command::Normalize(args) => run_normalize(args, cli.verbose),
        Command::Crawl(args) => run_crawl(args, cli.verbose),
        Command::Repair(args) => run_repair(args, cli.verbose),
        Command::Inspect(args) => run_inspect(args, cli.verbose),
    }
}
