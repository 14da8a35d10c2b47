//! Deal finder CLI.
//!
//! `search` runs a new FindAll search and processes it; `parse` resumes
//! from a saved raw results file, reusing the extraction cache.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use deal_finder::normalize::DEFAULT_THERAPEUTIC_AREA;
use deal_finder::report::print_samples;
use deal_finder::search::{self, DEFAULT_MATCH_LIMIT};
use deal_finder::types::run::{latest_run_file, RAW_RESULTS_PREFIX};
use deal_finder::{
    filter_matched, write_reports, AppConfig, Candidate, ExtractionCache, NormalizeOptions,
    OpenAiExtractor, OutputLayout, Pipeline, PipelineConfig, RawSearchResults, RunTimestamp,
    TherapeuticAreaMode,
};
use openai_client::OpenAIClient;
use parallel_client::{Generator, ParallelClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "deal-finder")]
#[command(about = "Find early-stage I&I biotech deals and export them to a spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: RunOptions,
}

#[derive(Args)]
struct RunOptions {
    /// Directory for raw results, cache, summary and spreadsheet
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// OpenAI model used for extraction
    #[arg(long, global = true)]
    model: Option<String>,

    /// Stamp every deal with one therapeutic area instead of the extracted one
    /// (`--fixed-therapeutic-area=AREA`; bare flag uses the default area)
    #[arg(
        long,
        global = true,
        value_name = "AREA",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_THERAPEUTIC_AREA
    )]
    fixed_therapeutic_area: Option<String>,

    /// Leave key_evidence empty instead of copying the candidate description
    #[arg(long, global = true)]
    no_evidence: bool,
}

impl RunOptions {
    fn pipeline_config(&self) -> PipelineConfig {
        let therapeutic_area = match &self.fixed_therapeutic_area {
            Some(area) => TherapeuticAreaMode::Fixed(area.clone()),
            None => TherapeuticAreaMode::Extracted,
        };
        PipelineConfig {
            normalize: NormalizeOptions {
                therapeutic_area,
                include_evidence: !self.no_evidence,
            },
            show_progress: true,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new FindAll search, then extract and export every match
    Search {
        /// Generator tier: base ($0.25 + $0.03/match), core ($2 + $0.15/match), pro ($10 + $1/match)
        #[arg(long)]
        generator: Option<Generator>,

        /// Maximum number of matches FindAll may return
        #[arg(long, default_value_t = DEFAULT_MATCH_LIMIT)]
        match_limit: u32,
    },

    /// Extract and export from saved FindAll results, reusing cached extractions
    Parse {
        /// Raw results file (defaults to PARALLEL_RAW_FILE, then the newest in the output dir)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Ignore existing extraction caches and start a new one
        #[arg(long)]
        fresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they don't fight the progress line on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,deal_finder=info,parallel_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let output_dir = cli
        .options
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());
    let pipeline_config = cli.options.pipeline_config();
    let model = cli
        .options
        .model
        .clone()
        .unwrap_or_else(|| config.openai_model.clone());

    // Built before any search so a bad key never costs a paid FindAll run
    let extractor = openai_extractor(&config, &model);

    match cli.command {
        Commands::Search {
            generator,
            match_limit,
        } => {
            let generator = generator.unwrap_or(config.generator);
            let parallel = parallel_client(&config);
            let (matched, cache) =
                run_search(&parallel, generator, match_limit, &output_dir).await?;
            process_and_report(extractor, cache, &matched, pipeline_config, &output_dir).await
        }
        Commands::Parse { input, fresh } => {
            let input = match input.or_else(|| config.raw_results_file.clone()) {
                Some(path) => path,
                None => match latest_run_file(&output_dir, RAW_RESULTS_PREFIX)? {
                    Some((path, _)) => path,
                    None => bail!(
                        "No raw results found in {}. Pass --input or set PARALLEL_RAW_FILE.",
                        output_dir.display()
                    ),
                },
            };
            let matched = load_matched(&input)?;
            let cache = open_cache(&output_dir, fresh)?;
            process_and_report(extractor, cache, &matched, pipeline_config, &output_dir).await
        }
    }
}

/// Print a diagnostic plus a remediation hint and exit non-zero.
fn fatal(what: &str, err: &dyn std::fmt::Display, hint: &str) -> ! {
    eprintln!("✗ {} initialization failed: {}", what, err);
    eprintln!("\n{}", hint);
    std::process::exit(1);
}

fn openai_extractor(config: &AppConfig, model: &str) -> OpenAiExtractor {
    let client = config
        .require_openai_key()
        .map_err(|e| e.to_string())
        .and_then(|key| OpenAIClient::try_new(key).map_err(|e| e.to_string()));
    match client {
        Ok(client) => {
            println!("✓ OpenAI client initialized ({})\n", model);
            OpenAiExtractor::new(client).with_model(model)
        }
        Err(e) => fatal(
            "OpenAI client",
            &e,
            "Set OPENAI_API_KEY in your environment or in a .env file.",
        ),
    }
}

fn parallel_client(config: &AppConfig) -> ParallelClient {
    let client = config
        .require_parallel_key()
        .map_err(|e| e.to_string())
        .and_then(|key| ParallelClient::try_new(key.to_string()).map_err(|e| e.to_string()));
    match client {
        Ok(client) => client,
        Err(e) => fatal(
            "Parallel client",
            &e,
            "Set PARALLEL_API_KEY in your environment or in a .env file.",
        ),
    }
}

async fn run_search(
    parallel: &ParallelClient,
    generator: Generator,
    match_limit: u32,
    output_dir: &Path,
) -> Result<(Vec<Candidate>, ExtractionCache)> {
    println!("Creating FindAll run...");
    let input = search::run_input(generator, match_limit);
    let run = parallel
        .create_findall_run(&input)
        .await
        .context("Failed to create FindAll run")?;
    println!("✓ Created FindAll run: {}", run.findall_id);
    println!("  Generator: {}", generator);

    println!("\nWaiting for results (this may take several minutes)...");
    let completed = parallel
        .wait_for_completion(&run.findall_id, |status| {
            print!("  Status: {}...\r", status.status.status);
            let _ = std::io::stdout().flush();
        })
        .await
        .context("Failed while polling FindAll run")?;

    let metrics = &completed.status.metrics;
    println!("\n✓ Run completed!");
    if let Some(generated) = metrics.generated_candidates_count {
        println!("  Generated candidates: {}", generated);
    }
    if let Some(matched) = metrics.matched_candidates_count {
        println!("  Matched candidates: {}", matched);
    }

    println!("\nRetrieving results...");
    let result = parallel
        .fetch_result::<Candidate>(&run.findall_id)
        .await
        .context("Failed to fetch FindAll results")?;

    let timestamp = RunTimestamp::now();
    let layout = OutputLayout::new(output_dir, timestamp.clone());
    let raw = RawSearchResults::new(run.findall_id, &timestamp, result.candidates);
    let (matched, summary) = filter_matched(&raw.candidates);
    println!("✓ Retrieved {} matched deals\n", summary.matched);

    raw.save(&layout.raw_results())
        .context("Failed to save raw search results")?;
    println!("✓ Saved raw Parallel output to: {}\n", layout.raw_results().display());

    Ok((matched, ExtractionCache::create(output_dir, timestamp)))
}

fn load_matched(path: &Path) -> Result<Vec<Candidate>> {
    println!("Loading Parallel data from: {}", path.display());
    let raw = RawSearchResults::load(path)?;
    let (matched, _) = filter_matched(&raw.candidates);
    println!("✓ Loaded {} matched deals\n", matched.len());
    Ok(matched)
}

fn open_cache(output_dir: &Path, fresh: bool) -> Result<ExtractionCache> {
    let cache = if fresh {
        ExtractionCache::create(output_dir, RunTimestamp::now())
    } else {
        ExtractionCache::discover(output_dir)?
    };

    if cache.is_empty() {
        println!(
            "No existing responses found, creating new file: {}\n",
            cache.path().display()
        );
    } else {
        println!("✓ Found existing OpenAI responses: {}", cache.path().display());
        println!("  Loaded {} cached responses\n", cache.len());
    }
    Ok(cache)
}

async fn process_and_report(
    extractor: OpenAiExtractor,
    cache: ExtractionCache,
    matched: &[Candidate],
    config: PipelineConfig,
    output_dir: &Path,
) -> Result<()> {
    let layout = OutputLayout::new(output_dir, cache.timestamp().clone());

    println!("Parsing deals with OpenAI...");
    let mut pipeline = Pipeline::new(extractor, cache, config);
    let outcome = pipeline
        .process(matched)
        .await
        .context("Failed to persist extraction cache")?;

    println!("\n\n✓ Successfully parsed {} deals", outcome.deals.len());
    if !outcome.failed.is_empty() {
        println!("✗ Failed to parse {} deals", outcome.failed.len());
    }

    let files = write_reports(&layout, &outcome).context("Failed to write reports")?;
    println!("\n✓ Saved JSON to: {}", files.summary.display());

    match &files.spreadsheet {
        Some(path) => {
            println!("✓ Saved Excel to: {}", path.display());
            print_samples(&outcome.deals);
        }
        None => println!("\n✗ No deals to export!"),
    }

    println!("\nDone!");
    Ok(())
}
