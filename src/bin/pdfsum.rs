//! CLI binary for pdfsum.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SummarizeConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfsum::{
    inspect, summarize, summarize_to_file, ChunkStrategy, ProgressCallback, SummarizationClient,
    SummarizeConfig, SummarizeProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-chunk log
/// lines using [indicatif]. Chunk numbers can have gaps (skipped chunks), so
/// the bar advances on skip as well as on completion and failure.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Wall-clock start of the chunk currently in flight (the run is sequential).
    chunk_start: Mutex<Option<Instant>>,
    /// Count of chunks that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_run_start` (called once chunking is done).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            chunk_start: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} chunks  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Summarizing");
        self.bar.reset_eta();
    }

    fn elapsed_secs(&self) -> f64 {
        self.chunk_start
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis() as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}

impl SummarizeProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_chunks: usize) {
        self.activate_bar(total_chunks);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracted {total_chunks} chunks for summarization…"))
        ));
    }

    fn on_chunk_start(&self, chunk_num: usize, _total: usize) {
        *self.chunk_start.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(format!("chunk {chunk_num}"));
    }

    fn on_chunk_skipped(&self, chunk_num: usize, total: usize) {
        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {}",
            dim("·"),
            chunk_num,
            total,
            dim("skipped (too short)"),
        ));
        self.bar.inc(1);
    }

    fn on_chunk_complete(&self, chunk_num: usize, total: usize, summary_len: usize) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            chunk_num,
            total,
            dim(&format!("{summary_len:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_chunk_error(&self, chunk_num: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs();
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {}  {}",
            red("✗"),
            chunk_num,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_reduce_start(&self, combined_len: usize) {
        self.bar.set_prefix("Reducing");
        self.bar
            .set_message(format!("condensing {combined_len} chars"));
    }

    fn on_run_complete(&self, total_chunks: usize, success_count: usize) {
        let failed = self.errors.load(Ordering::SeqCst);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} chunks summarized successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} chunks summarized  ({} failed)",
                if success_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total_chunks,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic summarization (stdout)
  pdfsum document.pdf

  # Write the summary to a file
  pdfsum document.pdf -o summary.txt

  # Use a different hosted model
  pdfsum --model sshleifer/distilbart-cnn-12-6 document.pdf

  # Summarize from URL
  pdfsum https://arxiv.org/pdf/1706.03762 -o attention.txt

  # Preview the chunking without any API call (no token needed)
  pdfsum --inspect-only document.pdf

  # Sentence-boundary chunking for prose without paragraph breaks
  pdfsum --strategy sentences lecture_notes.pdf

  # Show per-chunk summaries alongside the final one
  pdfsum --show-chunks document.pdf

  # JSON output with chunks, per-chunk summaries, and stats
  pdfsum --json document.pdf > output.json

  # Verify the token and endpoint before a long run
  pdfsum --check document.pdf

HOSTED MODELS (summarization task):
  Model                          Notes
  ─────────────────────────────  ─────────────────────────────────────
  facebook/bart-large-cnn        default — strong news-style summaries
  sshleifer/distilbart-cnn-12-6  smaller/faster distilled BART
  google/pegasus-xsum            very short, single-sentence summaries

ENVIRONMENT VARIABLES:
  HF_API_TOKEN   Inference API token (required unless --inspect-only)
  HF_TOKEN       Fallback name for the same token

SETUP:
  1. Create a token with the Inference API permission at
     https://huggingface.co/settings/tokens
  2. export HF_API_TOKEN=hf_...
  3. pdfsum document.pdf

A 403 Forbidden response means the token exists but lacks the Inference
API permission — create a new one with that permission enabled.
"#;

/// Summarize PDF files and URLs using hosted text-summarization models.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsum",
    version,
    about = "Summarize PDF files and URLs using hosted text-summarization models",
    long_about = "Extract text from PDF documents (local files or URLs), split it into \
model-size-safe chunks, summarize each chunk through the hosted Inference API with an \
HTTP fallback transport, and reduce the chunk summaries into one final summary.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write the final summary to this file instead of stdout.
    #[arg(short, long, env = "PDFSUM_OUTPUT")]
    output: Option<PathBuf>,

    /// Summarization model ID.
    #[arg(
        long,
        env = "PDFSUM_MODEL",
        default_value = pdfsum::DEFAULT_MODEL,
        long_help = "Hosted summarization model. Default: facebook/bart-large-cnn.\n\
          Alternatives: sshleifer/distilbart-cnn-12-6 (faster), google/pegasus-xsum (terser)."
    )]
    model: String,

    /// Chunking strategy: paragraphs or sentences.
    #[arg(long, env = "PDFSUM_STRATEGY", value_enum, default_value = "paragraphs")]
    strategy: StrategyArg,

    /// Soft character limit per paragraph chunk.
    #[arg(long, env = "PDFSUM_CHUNK_SIZE", default_value_t = 700)]
    chunk_size: usize,

    /// Character limit per sentence chunk (with --strategy sentences).
    #[arg(long, env = "PDFSUM_SENTENCE_CHUNK_SIZE", default_value_t = 3000)]
    sentence_chunk_size: usize,

    /// Skip chunks shorter than this many characters after trimming.
    #[arg(long, env = "PDFSUM_MIN_CHUNK_CHARS", default_value_t = 50)]
    min_chunk_chars: usize,

    /// Token cap for the fallback transport (max_new_tokens).
    #[arg(long, env = "PDFSUM_MAX_NEW_TOKENS", default_value_t = 100)]
    max_new_tokens: u32,

    /// Print each chunk summary after the final summary.
    #[arg(long, env = "PDFSUM_SHOW_CHUNKS")]
    show_chunks: bool,

    /// Output structured JSON (SummaryOutput) instead of plain text.
    #[arg(long, env = "PDFSUM_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFSUM_NO_PROGRESS")]
    no_progress: bool,

    /// Extract and chunk only — no API call, no token needed.
    #[arg(long)]
    inspect_only: bool,

    /// Probe the inference endpoint with a tiny request before the run.
    #[arg(long)]
    check: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFSUM_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFSUM_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Per-call API timeout in seconds.
    #[arg(long, env = "PDFSUM_API_TIMEOUT", default_value_t = 30)]
    api_timeout: u64,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum StrategyArg {
    Paragraphs,
    Sentences,
}

impl From<StrategyArg> for ChunkStrategy {
    fn from(v: StrategyArg) -> Self {
        match v {
            StrategyArg::Paragraphs => ChunkStrategy::Paragraphs,
            StrategyArg::Sentences => ChunkStrategy::Sentences,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let config = build_config(&cli, None)?;
        let preview = inspect(&cli.input, &config)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&preview).context("Failed to serialize preview")?
            );
        } else {
            println!("File:        {}", cli.input);
            println!("Characters:  {}", preview.char_count);
            println!("Chunks:      {}", preview.chunk_count);
            if !preview.preview.is_empty() {
                println!("Preview:     {}…", preview.preview);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    // The progress bar is initialised with a spinner (no chunk count yet);
    // `on_run_start` resizes it to the correct total once the text has
    // been chunked. `show_progress` was already computed above.
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn SummarizeProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Optional connection probe ────────────────────────────────────────
    if cli.check {
        let client =
            SummarizationClient::from_config(&config).context("Failed to build client")?;
        match client.check_connection().await {
            Ok(sample) => {
                if !cli.quiet {
                    eprintln!("{} Inference API reachable. Example summary:", green("✔"));
                    eprintln!("  {}", dim(&sample));
                }
            }
            Err(e) => anyhow::bail!("Connection check failed — {e}"),
        }
    }

    // ── Run summarization ────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let stats = summarize_to_file(&cli.input, output_path, &config)
            .await
            .context("Summarization failed")?;

        // Summary line (callback already printed the per-chunk log).
        if !cli.quiet {
            eprintln!(
                "{}  {}/{} chunks  {}ms  →  {}",
                if stats.failed_chunks == 0 {
                    green("✔")
                } else {
                    cyan("⚠")
                },
                stats.summarized_chunks,
                stats.total_chunks,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
    } else {
        let output = summarize(&cli.input, &config)
            .await
            .context("Summarization failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            if output.summary.is_unavailable() {
                // Legitimate terminal state, not an error: render distinctly.
                eprintln!("{} {}", cyan("⚠"), bold("No summary generated."));
                eprintln!(
                    "   All {} eligible chunks failed to summarize.",
                    output.stats.failed_chunks
                );
            } else {
                println!("{}", output.summary);
            }

            if cli.show_chunks {
                println!();
                println!("{}", bold("Chunk summaries:"));
                for cs in &output.chunk_summaries {
                    println!("  {}. {}", cs.chunk_num, cs.display_text());
                }
            }
        }

        if !cli.quiet && !show_progress && !cli.json {
            eprintln!(
                "Summarized {}/{} chunks in {}ms",
                output.stats.summarized_chunks,
                output.stats.total_chunks,
                output.stats.total_duration_ms
            );
            if output.stats.failed_chunks > 0 {
                eprintln!("  {} chunks failed", output.stats.failed_chunks);
            }
        }
    }

    Ok(())
}

/// Map CLI args to `SummarizeConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummarizeConfig> {
    let mut builder = SummarizeConfig::builder()
        .model(cli.model.clone())
        .strategy(cli.strategy.clone().into())
        .chunk_size(cli.chunk_size)
        .sentence_chunk_size(cli.sentence_chunk_size)
        .min_chunk_chars(cli.min_chunk_chars)
        .max_new_tokens(cli.max_new_tokens)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
