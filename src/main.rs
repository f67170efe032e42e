//! Pixel Words CLI
//!
//! Command-line interface for turning raw RGB images into ranked
//! dictionary words, inspecting the daily mapping, and serving the
//! pipeline over HTTP.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pixel_words::{
    imaging::RgbImage,
    lexicon::{Dictionary, Lexicon, LexiconError},
    pipeline::{display_score, ConfigError, FileConfig, ProcessError, ProcessPipeline, WordResponse},
    seeding::{BinAlphabetMapping, Clock, DailySeedProvider, FixedClock, SystemClock},
    words::{WordExtractor, WordRanker},
    LetterString,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pixel-words", version, about = "Find dictionary words hidden in an image")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dictionary file, one word per line (overrides config and DICTIONARY_PATH)
    #[arg(short, long, global = true)]
    dictionary: Option<PathBuf>,

    /// Use the mapping of this UTC date (YYYY-MM-DD) instead of today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process a raw packed-RGB image file
    Process {
        /// File holding width * height * 3 bytes
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// Number of words to return
        #[arg(long)]
        top_n: Option<usize>,
        /// Shortest word to report
        #[arg(long)]
        min_word_length: Option<usize>,
        /// Also print the generated letter string
        #[arg(long)]
        letters: bool,
        /// Print the JSON response instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the bin-to-letter mapping for the day
    Mapping,
    /// Scan a letter string directly
    Scan {
        /// Lowercase a-z letters
        #[arg(long)]
        text: String,
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Serve POST /process, /metrics and /health over HTTP
    #[cfg(feature = "metrics")]
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "metrics")]
    #[error(transparent)]
    Metrics(#[from] pixel_words::metrics::MetricsError),
    #[cfg(feature = "metrics")]
    #[error(transparent)]
    Server(#[from] pixel_words::metrics::ServerError),
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    info!("Pixel Words v{}", pixel_words::VERSION);

    let config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let clock: Box<dyn Clock> = match cli.date {
        Some(date) => Box::new(FixedClock::new(date)),
        None => Box::new(SystemClock),
    };

    match cli.command {
        Command::Process {
            input,
            width,
            height,
            top_n,
            min_word_length,
            letters,
            json,
        } => {
            let data = std::fs::read(&input).map_err(|source| CliError::Io {
                path: input.clone(),
                source,
            })?;
            let image = RgbImage::new(data, width, height);

            let lexicon = load_lexicon(&config, cli.dictionary.as_ref())?;
            let pipeline = ProcessPipeline::with_clock(lexicon, &config, clock)?;

            let mut options = pipeline.defaults().clone();
            if let Some(top_n) = top_n {
                options.top_n = top_n;
            }
            if let Some(min) = min_word_length {
                options.min_word_length = min;
            }
            options.include_letter_string = letters;

            let outcome = pipeline.process_with(&image, &options)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&WordResponse::from(&outcome))?);
            } else {
                if let Some(seed) = outcome.seed {
                    println!("Seed: {}", seed);
                }
                print_words(outcome.words.iter().map(|w| w.word.as_str()));
                if let Some(letters) = &outcome.letter_string {
                    println!();
                    for line in letters.lines(64) {
                        println!("{}", line);
                    }
                }
            }
        }

        Command::Mapping => {
            let seed = DailySeedProvider::new(clock).current();
            let mapping = BinAlphabetMapping::from_seed(seed);
            println!("Seed: {}", seed);
            println!("Mapping: {}", mapping);
            for (bin, letter) in mapping.letters().iter().enumerate() {
                let low = bin as f32 / 26.0;
                let high = (bin + 1) as f32 / 26.0;
                println!("  bin {:>2} [{:.3}, {:.3}) -> {}", bin, low, high, char::from(*letter));
            }
        }

        Command::Scan { text, top_n } => {
            let letters = LetterString::new(text.to_ascii_lowercase()).ok_or_else(|| {
                CliError::Invalid("scan text must contain only letters a-z".into())
            })?;

            let lexicon = load_lexicon(&config, cli.dictionary.as_ref())?;
            let extractor = WordExtractor::new(lexicon)
                .with_chunk_len(config.encoding.scan_chunk_len)
                .with_min_word_length(config.limits.min_word_length);
            let stats = extractor.extract(&letters);

            let ranker = WordRanker::new(config.ranking, top_n.unwrap_or(config.limits.top_n))
                .map_err(ConfigError::from)?;
            let ranked = ranker.rank(&stats);

            info!(distinct_words = stats.len(), "Scan complete");
            for (index, word) in ranked.iter().enumerate() {
                let stat = stats.iter().find(|s| s.word == word.word);
                println!(
                    "{:>2}. {:<12} score={:.3} count={} first={}",
                    index + 1,
                    word.word,
                    word.score,
                    stat.map_or(0, |s| s.count),
                    stat.map_or(0, |s| s.first_offset),
                );
            }
        }

        #[cfg(feature = "metrics")]
        Command::Serve { host, port } => {
            use pixel_words::metrics::{MetricsRegistry, Server, ServerConfig};

            if cli.date.is_some() {
                tracing::warn!("--date is ignored by serve; the server follows the system clock");
            }

            let mut output = config.output.clone().with_env_overrides()?;
            if let Some(host) = host {
                output.host = host;
            }
            if let Some(port) = port {
                output.port = port;
            }

            let lexicon = load_lexicon(&config, cli.dictionary.as_ref())?;
            let registry = Arc::new(MetricsRegistry::new()?);
            let pipeline =
                ProcessPipeline::new(lexicon, &config)?.with_metrics(Arc::clone(&registry));

            let server_config = ServerConfig::from_output(&output, config.limits.max_pixels)?;
            let server = Server::new(server_config, Arc::new(pipeline), registry);

            let runtime = tokio::runtime::Runtime::new().map_err(|source| CliError::Io {
                path: PathBuf::from("<tokio runtime>"),
                source,
            })?;
            runtime.block_on(server.run())?;
        }
    }

    Ok(())
}

fn load_lexicon(
    config: &FileConfig,
    dictionary: Option<&PathBuf>,
) -> Result<Arc<Lexicon>, LexiconError> {
    match dictionary {
        Some(path) => {
            let dictionary = Dictionary::from_file(path, &config.dictionary)?;
            Ok(Arc::new(Lexicon::build(dictionary)?))
        }
        None => Lexicon::load(&config.dictionary),
    }
}

fn print_words<'a>(words: impl Iterator<Item = &'a str>) {
    let mut any = false;
    for (index, word) in words.enumerate() {
        any = true;
        println!("{:>2}. {:<12} {:.2}", index + 1, word, display_score(index));
    }
    if !any {
        println!("No words found");
    }
}
