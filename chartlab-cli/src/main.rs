//! ChartLab CLI: analyze, strategy, synth and config commands.
//!
//! Commands:
//! - `analyze`: run the full analysis engine over a CSV bar file
//! - `strategy`: run one strategy over every window of a CSV bar file
//! - `synth`: write a seeded random-walk bar file
//! - `config`: print the default analysis configuration as TOML

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chartlab_core::components::{build_strategy, run_strategy, StrategyConfig};
use chartlab_core::config::BackendKind;
use chartlab_core::data::{load_bars_csv, random_walk, write_bars_csv};
use chartlab_core::fingerprint::analysis_fingerprint;
use chartlab_core::{AnalysisConfig, AnalysisEngine};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "chartlab",
    about = "ChartLab CLI: technical analysis over OHLCV bars"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV bar file and print the result as JSON.
    Analyze {
        /// CSV with columns timestamp,open,high,low,close,volume.
        #[arg(long)]
        input: PathBuf,

        /// TOML analysis config. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the backend from the config.
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,

        /// Worker threads for the parallel backend (0 = rayon default).
        /// Selects the parallel backend unless `--backend` says otherwise.
        #[arg(long)]
        threads: Option<usize>,

        /// Pretty-print JSON.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Run a strategy over every window and print the actionable signals.
    Strategy {
        #[arg(long)]
        input: PathBuf,

        /// TOML strategy config with a `type` tag.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strategy name, run with default parameters.
        #[arg(long)]
        kind: Option<String>,

        /// Only evaluate the full window and print one signal.
        #[arg(long, default_value_t = false)]
        last: bool,

        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Write a seeded random-walk bar file.
    Synth {
        #[arg(long, default_value_t = 250)]
        bars: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output CSV path. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the default analysis configuration as TOML.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Sequential,
    Parallel,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Analyze {
            input,
            config,
            backend,
            threads,
            pretty,
        } => run_analyze(&input, config.as_deref(), backend, threads, pretty),
        Commands::Strategy {
            input,
            config,
            kind,
            last,
            pretty,
        } => run_strategy_cmd(&input, config.as_deref(), kind.as_deref(), last, pretty),
        Commands::Synth { bars, seed, output } => run_synth(bars, seed, output.as_deref()),
        Commands::Config => {
            print!("{}", AnalysisConfig::default().to_toml_string()?);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")
}

/// Apply `--backend` and `--threads` on top of the configured backend.
fn resolve_backend(
    configured: BackendKind,
    backend: Option<BackendArg>,
    threads: Option<usize>,
) -> BackendKind {
    let configured_threads = match configured {
        BackendKind::Parallel { threads } => threads,
        BackendKind::Sequential => 0,
    };
    match (backend, threads) {
        (Some(BackendArg::Sequential), Some(threads)) => {
            tracing::warn!(threads, "--threads has no effect with the sequential backend");
            BackendKind::Sequential
        }
        (Some(BackendArg::Sequential), None) => BackendKind::Sequential,
        (Some(BackendArg::Parallel), threads) => BackendKind::Parallel {
            threads: threads.unwrap_or(configured_threads),
        },
        (None, Some(threads)) => BackendKind::Parallel { threads },
        (None, None) => configured,
    }
}

fn run_analyze(
    input: &Path,
    config_path: Option<&Path>,
    backend: Option<BackendArg>,
    threads: Option<usize>,
    pretty: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    config.backend = resolve_backend(config.backend, backend, threads);

    let bars = load_bars_csv(input)
        .with_context(|| format!("failed to read bars: {}", input.display()))?;
    let fingerprint = analysis_fingerprint(&config, &bars)?;
    let engine = AnalysisEngine::new(config)?;
    tracing::info!(
        bars = bars.len(),
        backend = engine.backend_name(),
        %fingerprint,
        "running analysis"
    );

    let result = engine.analyze(&bars)?;
    let signal = result.to_signal(&bars)?;
    let report = serde_json::json!({
        "fingerprint": fingerprint,
        "signal": signal,
        "result": result,
    });
    print_json(&report, pretty)
}

fn run_strategy_cmd(
    input: &Path,
    config_path: Option<&Path>,
    kind: Option<&str>,
    last: bool,
    pretty: bool,
) -> Result<()> {
    let strategy_config = match (config_path, kind) {
        (Some(_), Some(_)) => bail!("--config and --kind are mutually exclusive"),
        (None, None) => bail!(
            "one of --config or --kind is required (kinds: {})",
            StrategyConfig::names().join(", ")
        ),
        (Some(path), None) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<StrategyConfig>(&content)
                .with_context(|| format!("invalid strategy config: {}", path.display()))?
        }
        (None, Some(name)) => StrategyConfig::default_for(name)?,
    };
    let strategy = build_strategy(&strategy_config)?;

    let bars = load_bars_csv(input)
        .with_context(|| format!("failed to read bars: {}", input.display()))?;
    tracing::info!(
        strategy = strategy.name(),
        bars = bars.len(),
        warmup = strategy.warmup_bars(),
        "running strategy"
    );

    if last {
        let signal = strategy.compute_signal(&bars)?;
        return print_json(&signal, pretty);
    }
    let signals = run_strategy(strategy.as_ref(), &bars)?;
    print_json(&signals, pretty)
}

fn run_synth(bars: usize, seed: u64, output: Option<&Path>) -> Result<()> {
    if bars == 0 {
        bail!("--bars must be at least 1");
    }
    let series = random_walk(bars, seed);
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_bars_csv(file, &series)?;
            eprintln!("Wrote {bars} bars to {}", path.display());
        }
        None => write_bars_csv(std::io::stdout().lock(), &series)?,
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}
