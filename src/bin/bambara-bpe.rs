use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use bambara_bpe::config::{IngestConfig, TrainerConfig, DEFAULT_NUM_MERGES};
use bambara_bpe::{BpeTokenizer, Trainer};
use clap::{ArgAction, Parser};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bambara BPE tokenizer", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    /// Training corpus file or directory (repeat flag)
    #[arg(long = "train", value_name = "PATH")]
    train: Vec<PathBuf>,

    /// Text to encode
    #[arg(long, value_name = "TEXT")]
    encode: Option<String>,

    /// Whitespace-separated tokens to decode
    #[arg(long, value_name = "TOKENS")]
    decode: Option<String>,

    /// Number of BPE merges to learn
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_NUM_MERGES)]
    merges: usize,

    /// Write the learned vocabulary here (requires --merges-out)
    #[arg(long, value_name = "PATH")]
    vocab_out: Option<PathBuf>,

    /// Write the learned merges here (requires --vocab-out)
    #[arg(long, value_name = "PATH")]
    merges_out: Option<PathBuf>,

    /// Emit JSON instead of human-readable output
    #[arg(long)]
    json: bool,

    /// Disable per-iteration logging/progress
    #[arg(long)]
    no_progress: bool,

    /// Disable recursive directory traversal
    #[arg(long)]
    no_recursive: bool,

    /// Follow symlinks during traversal
    #[arg(long)]
    follow_symlinks: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if cli.vocab_out.is_some() != cli.merges_out.is_some() {
        bail!("--vocab-out and --merges-out must be given together");
    }
    if cli.vocab_out.is_some() && cli.train.is_empty() {
        bail!("saving vocab and merges requires --train");
    }

    let mut tokenizer = if cli.train.is_empty() {
        BpeTokenizer::new()
    } else {
        run_train(&cli)?
    };

    if let (Some(vocab_path), Some(merges_path)) = (&cli.vocab_out, &cli.merges_out) {
        tokenizer.save(vocab_path, merges_path).with_context(|| {
            format!(
                "failed to save vocab to {} and merges to {}",
                vocab_path.display(),
                merges_path.display()
            )
        })?;
        info!(
            "wrote vocab to {} and merges to {}",
            vocab_path.display(),
            merges_path.display()
        );
    }

    if let Some(text) = &cli.encode {
        run_encode(&mut tokenizer, text, cli.json)?;
    }
    if let Some(tokens) = &cli.decode {
        run_decode(&tokenizer, tokens, cli.json)?;
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run_train(cli: &Cli) -> Result<BpeTokenizer> {
    let trainer_cfg = TrainerConfig::builder()
        .num_merges(cli.merges)
        .show_progress(!cli.no_progress)
        .build()?;
    let ingest_cfg = IngestConfig::builder()
        .recursive(!cli.no_recursive)
        .follow_symlinks(cli.follow_symlinks)
        .build();

    let spinner = if cli.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} learning merges... {elapsed}")
            .context("invalid progress template")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let trainer = Trainer::new(trainer_cfg);
    let start = Instant::now();
    let artifacts = trainer
        .train_from_paths(&cli.train, &ingest_cfg)
        .with_context(|| "failed to train on corpus")?;
    if let Some(pb) = spinner {
        pb.finish_with_message("training complete");
    }

    let elapsed = start.elapsed();
    let merges = artifacts.tokenizer.num_merges();
    let vocab_entries = artifacts.tokenizer.vocab().len();
    info!(
        "training complete: merges={merges} vocab_entries={vocab_entries} duration={elapsed:.2?} stop={:?}",
        artifacts.metrics.stop_reason
    );

    if cli.json {
        let summary = json!({
            "merges": merges,
            "vocab_entries": vocab_entries,
            "stop_reason": artifacts.metrics.stop_reason,
            "duration_secs": elapsed.as_secs_f64(),
        });
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("✅ Trained BPE model with {merges} merges.");
    }

    Ok(artifacts.tokenizer)
}

fn run_encode(tokenizer: &mut BpeTokenizer, text: &str, as_json: bool) -> Result<()> {
    let tokens = tokenizer.encode(text);
    if as_json {
        let record = json!({ "text": text, "tokens": tokens });
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("Encoded: {tokens:?}");
    }
    Ok(())
}

fn run_decode(tokenizer: &BpeTokenizer, tokens: &str, as_json: bool) -> Result<()> {
    let tokens: Vec<&str> = tokens.split_whitespace().collect();
    let text = tokenizer.decode(&tokens);
    if as_json {
        let record = json!({ "tokens": tokens, "text": text });
        println!("{}", serde_json::to_string(&record)?);
    } else {
        println!("Decoded: {text}");
    }
    Ok(())
}
