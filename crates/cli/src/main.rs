//! lipsync-ar CLI — Arabic text to timed viseme sequences.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use lipsync_ar_core::language::numbers::convert_number_to_words;
use lipsync_ar_core::{LipsyncAr, TimingConfig, VisemeEvent};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "lipsync-ar",
    about = "Arabic text to Oculus viseme sequences for avatar lip-sync",
    version,
)]
struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text to a timed viseme sequence (JSON)
    Process(ProcessArgs),
    /// Print the normalized form of the text
    Normalize(TextArgs),
    /// Read a run of digits as Arabic words
    Number(NumberArgs),
    /// List the supported viseme names
    Visemes,
}

// ─── Shared arguments ────────────────────────────────────────────

#[derive(Parser, Debug)]
struct TextArgs {
    /// Text to convert (reads --input or stdin when omitted)
    text: Option<String>,

    /// Read text from a file
    #[arg(short, long, conflicts_with = "text")]
    input: Option<PathBuf>,
}

// ─── Process ─────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct ProcessArgs {
    #[command(flatten)]
    text: TextArgs,

    /// JSON file overriding the built-in timing tables
    #[arg(long)]
    timing: Option<PathBuf>,

    /// Milliseconds per relative duration unit
    #[arg(long)]
    ms_per_unit: Option<f64>,

    /// Emit a list of events instead of parallel arrays
    #[arg(long, default_value_t = false)]
    events: bool,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

// ─── Number ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct NumberArgs {
    /// ASCII digits, e.g. 1250
    digits: String,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Process(args) => run_process(args),
        Command::Normalize(args) => run_normalize(args),
        Command::Number(args) => run_number(args),
        Command::Visemes => run_visemes(),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

fn read_text(args: &TextArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.input {
        if !path.exists() {
            bail!("File not found: {}", path.display());
        }
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;
    Ok(text)
}

fn load_timing(args: &ProcessArgs) -> Result<TimingConfig> {
    let mut timing = match &args.timing {
        Some(path) => {
            log::info!("Loading timing config: {}", path.display());
            TimingConfig::load(path)
                .with_context(|| format!("Invalid timing config {}", path.display()))?
        }
        None => TimingConfig::default(),
    };
    if let Some(ms) = args.ms_per_unit {
        timing.ms_per_unit = ms;
    }
    timing.validate().context("Invalid timing configuration")?;
    Ok(timing)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

// ─── Runners ─────────────────────────────────────────────────────

fn run_process(args: ProcessArgs) -> Result<()> {
    let text = read_text(&args.text)?;
    let lipsync = LipsyncAr::with_timing(load_timing(&args)?);

    let sequence = lipsync.process(&text);
    log::info!(
        "{} visemes, {} ms",
        sequence.len(),
        sequence.total_duration_ms()
    );

    let json = if args.events {
        let events: Vec<VisemeEvent> = sequence.events().collect();
        to_json(&events, args.pretty)?
    } else {
        to_json(&sequence, args.pretty)?
    };
    println!("{}", json);
    Ok(())
}

fn run_normalize(args: TextArgs) -> Result<()> {
    let text = read_text(&args)?;
    println!("{}", LipsyncAr::new().pre_process_text(&text));
    Ok(())
}

fn run_number(args: NumberArgs) -> Result<()> {
    let words = convert_number_to_words(args.digits.trim())
        .with_context(|| format!("Cannot read {:?} as a number", args.digits))?;
    println!("{}", words);
    Ok(())
}

fn run_visemes() -> Result<()> {
    for name in LipsyncAr::new().viseme_names() {
        println!("{}", name);
    }
    Ok(())
}
