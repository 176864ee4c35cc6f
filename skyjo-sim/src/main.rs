mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::{SimulationConfig, parse_roster};
use logic::{BatchSummary, run_batch};
use skyjo_game::StrategyKind;

#[derive(Debug, Parser)]
#[command(name = "skyjo-sim", version = "0.1.0")]
#[command(about = "Batch simulator comparing Skyjo strategies over many seeded games")]
struct Args {
    /// Number of games to simulate [default: 10000]
    #[arg(long)]
    rounds: Option<usize>,

    /// Seats in order, e.g. player1=local,player2=random
    #[arg(long)]
    players: Option<String>,

    /// Batch seed; the same seed replays the same games [default: 1337]
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with simulation settings; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run games on all cores
    #[arg(long)]
    parallel: bool,

    /// Verbose output (lists every game in the console report)
    #[arg(short, long)]
    verbose: bool,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    let config = resolve_config(&args)?;
    if args.report == "console" || args.output.is_some() {
        announce_banner(&config);
    }

    let start_time = Instant::now();
    info!(
        "simulating {} games with seed {} ({})",
        config.rounds,
        config.seed,
        if config.parallel { "parallel" } else { "sequential" }
    );
    let summary = run_batch(&config, args.verbose);
    write_reports(&args, &summary, start_time)?;

    if summary.failed() {
        eprintln!(
            "❌ {} of {} games aborted",
            summary.failures.len(),
            summary.rounds
        );
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for kind in StrategyKind::ALL {
        writeln!(
            output_target.writer(),
            "  {:10} - {}: {}",
            kind.key(),
            kind.label(),
            kind.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner(config: &SimulationConfig) {
    println!("{}", "🃏 Skyjo Strategy Simulator".bright_cyan().bold());
    println!("{}", "===========================".cyan());
    let seats: Vec<String> = config
        .players
        .iter()
        .map(|p| format!("{} ({})", p.name, p.strategy))
        .collect();
    println!("Players: {}", seats.join(", "));
    println!("Rounds: {}  Seed: {}", config.rounds, config.seed);
}

/// Defaults, then the config file, then command line flags.
fn resolve_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(players) = &args.players {
        config.players = parse_roster(players).context("invalid --players")?;
    }
    config.parallel |= args.parallel;
    config.validate()?;
    Ok(config)
}

fn write_reports(args: &Args, summary: &BatchSummary, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, summary)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, summary)?,
        _ => {
            let duration = start_time.elapsed();
            logic::reports::generate_console_report(
                &mut output_target,
                summary,
                duration,
                args.verbose,
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
