use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use ragpack_chunk::{ChunkingEngine, DataProcessor};
use ragpack_core::config::{resolve_with_base, Config};
use ragpack_core::types::{DocumentChunk, ScoredHit};
use ragpack_core::{ChunkingStrategy, Tokenizer};
use ragpack_optimize::{render_markdown, ResultOptimizer};
use ragpack_tokenize::{get_default_tokenizer, load_tokenizer};

#[derive(Parser)]
#[command(name = "ragpack", about = "Chunk documents and pack retrieval hits into a token budget")]
struct Cli {
    /// Explicit config file instead of config.toml / config.<env>.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chunk one file and print its chunks as JSON lines
    Chunk {
        file: PathBuf,
        #[arg(long)]
        strategy: Option<ChunkingStrategy>,
        /// Defaults to the file stem
        #[arg(long)]
        doc_id: Option<String>,
    },
    /// Chunk every .txt/.md file under a directory
    Ingest {
        /// Defaults to `data.docs_dir` from the config
        dir: Option<PathBuf>,
        #[arg(long)]
        strategy: Option<ChunkingStrategy>,
        /// Only process the first N files
        #[arg(long)]
        limit: Option<usize>,
        /// Write JSON lines here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Group, rank and pack a JSON array of scored hits
    Optimize {
        hits: PathBuf,
        #[arg(long)]
        budget: Option<usize>,
        #[arg(long)]
        threshold: Option<usize>,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Markdown,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load().context("failed to load configuration")?,
    };
    let config_dir = cli
        .config
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let tokenizer = tokenizer_from_config(&config, &config_dir)?;

    match cli.command {
        Command::Chunk { file, strategy, doc_id } => {
            let engine = chunking_engine(&config, strategy, tokenizer)?;
            let text = read_text(&file)?;
            let doc_id = doc_id.unwrap_or_else(|| {
                file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "document".to_string())
            });
            let chunks = engine.chunk(&text, &doc_id);
            let mut out = BufWriter::new(io::stdout().lock());
            write_json_lines(&mut out, &chunks)?;
            eprintln!("{} chunks from {}", chunks.len(), file.display());
        }
        Command::Ingest { dir, strategy, limit, out } => {
            let dir = match dir {
                Some(dir) => dir,
                None => match config.get::<String>("data.docs_dir") {
                    Ok(dir) => resolve_with_base(&config_dir, dir),
                    Err(_) => bail!("no directory given and data.docs_dir is not configured"),
                },
            };
            let processor = DataProcessor::new(chunking_engine(&config, strategy, tokenizer)?);
            let chunks = ingest(&processor, &dir, limit)?;
            match out {
                Some(path) => {
                    let mut file = BufWriter::new(File::create(&path).with_context(|| format!("creating {}", path.display()))?);
                    write_json_lines(&mut file, &chunks)?;
                    eprintln!("✅ Wrote {} chunks to {}", chunks.len(), path.display());
                }
                None => write_json_lines(&mut BufWriter::new(io::stdout().lock()), &chunks)?,
            }
        }
        Command::Optimize { hits, budget, threshold, format } => {
            let mut options = config.optimization()?;
            if let Some(budget) = budget {
                options = options.with_token_budget(budget);
            }
            if let Some(threshold) = threshold {
                options = options.with_full_document_threshold(threshold);
            }
            let raw = read_text(&hits)?;
            let hits: Vec<ScoredHit> =
                serde_json::from_str(&raw).with_context(|| format!("parsing hits from {}", hits.display()))?;
            let optimizer = ResultOptimizer::new(options, tokenizer)?;
            info!(
                "Packing {} hits into {} of {} tokens",
                hits.len(),
                optimizer.options().max_tokens(),
                optimizer.options().token_budget
            );
            let output = optimizer.optimize(&hits);
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&output)?),
                Format::Markdown => println!("{}", render_markdown(&output.results)),
            }
            eprintln!(
                "📊 {} documents, {} of {} tokens ({:.1}% of budget): {}",
                output.stats.documents_returned,
                output.stats.total_optimized_tokens,
                output.stats.total_original_tokens,
                output.stats.utilization * 100.0,
                output.stats.strategies
            );
        }
    }
    Ok(())
}

/// `tokenizer.path` from the config, relative to the config file; else the environment default.
fn tokenizer_from_config(config: &Config, base: &Path) -> Result<Arc<dyn Tokenizer>> {
    match config.get::<String>("tokenizer.path") {
        Ok(path) => load_tokenizer(Some(&resolve_with_base(base, path))),
        Err(_) => get_default_tokenizer(),
    }
}

fn chunking_engine(
    config: &Config,
    strategy: Option<ChunkingStrategy>,
    tokenizer: Arc<dyn Tokenizer>,
) -> Result<ChunkingEngine> {
    let mut chunking = config.chunking()?;
    if let Some(strategy) = strategy {
        chunking = chunking.with_strategy(strategy);
    }
    let engine = ChunkingEngine::new(chunking, tokenizer)?;
    let chunking = engine.config();
    info!("Chunking with {} (size {}, overlap {})", chunking.strategy, chunking.chunk_size, chunking.chunk_overlap);
    Ok(engine)
}

fn ingest(processor: &DataProcessor, dir: &Path, limit: Option<usize>) -> Result<Vec<DocumentChunk>> {
    info!("Ingesting {} with {}", dir.display(), processor.engine().config().strategy);
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    let chunks = processor.process_directory_with(dir, limit, |done, total, file| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
        pb.set_message(file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default());
    })?;
    pb.finish_with_message(format!("{} chunks", chunks.len()));
    Ok(chunks)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write_json_lines<W: Write>(out: &mut W, chunks: &[DocumentChunk]) -> Result<()> {
    for chunk in chunks {
        serde_json::to_writer(&mut *out, chunk)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
