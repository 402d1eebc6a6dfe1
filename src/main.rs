use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use icarus::config::{NormalizeConfig, MIN_ARTICLE_CHARS, STUB_SECTION_MAX_CHARS};
use icarus::models::{PageEvent, RawArticle};
use icarus::titles::AllowList;
use std::fs;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "icarus")]
#[command(about = "Distill Wikipedia dumps into a sectioned prose corpus")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract allow-listed articles from a dump into a JSON array
    Extract(ExtractArgs),
    /// Normalize a single wikitext file and print its sections
    Normalize(NormalizeArgs),
}

#[derive(Args)]
struct NormalizeOpts {
    /// Minimum normalized article length in characters
    #[arg(long, default_value_t = MIN_ARTICLE_CHARS)]
    min_size: usize,

    /// Sections with at most this many characters are dropped as stubs
    #[arg(long, default_value_t = STUB_SECTION_MAX_CHARS)]
    stub_section_max: usize,

    /// Extra non-Latin characters to accept in prose (e.g. "γφ")
    #[arg(long, default_value = "")]
    extra_chars: String,
}

impl NormalizeOpts {
    fn to_config(&self) -> NormalizeConfig {
        NormalizeConfig {
            min_article_chars: self.min_size,
            stub_section_max_chars: self.stub_section_max,
            ..NormalizeConfig::default()
        }
        .allow_chars(&self.extra_chars)
    }
}

#[derive(Args)]
struct ExtractArgs {
    /// Path to the Wikipedia dump file (.xml.bz2 or .xml)
    #[arg(short, long)]
    input: String,

    /// Output JSON file
    #[arg(short, long)]
    output: String,

    /// Newline-delimited list of titles to keep
    #[arg(short, long)]
    titles: String,

    /// Stop after writing this many articles (for testing)
    #[arg(long)]
    limit: Option<u64>,

    #[command(flatten)]
    normalize: NormalizeOpts,
}

#[derive(Args)]
struct NormalizeArgs {
    /// File containing raw wikitext
    #[arg(short, long)]
    input: String,

    /// Article title used in section markers
    #[arg(long)]
    title: String,

    #[command(flatten)]
    normalize: NormalizeOpts,
}

/// Sets the returned flag on the first Ctrl-C.
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build signal runtime")?;

    thread::Builder::new()
        .name("icarus-signal".to_string())
        .spawn(move || {
            rt.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        warn!("Interrupt received, finishing current article");
                        flag.store(true, Ordering::Relaxed);
                    }
                    Err(e) => error!(error = %e, "Failed to listen for interrupt"),
                }
            })
        })
        .context("Failed to spawn signal thread")?;

    Ok(cancel)
}

fn run_extract(args: ExtractArgs) -> Result<()> {
    let start = Instant::now();
    let allow = AllowList::load(&args.titles)?;
    let config = args.normalize.to_config();
    let cancel = install_interrupt_handler()?;

    let stats = icarus::extract::run_extraction(
        &args.input,
        &args.output,
        &allow,
        &config,
        args.limit,
        cancel,
    )?;
    let duration = start.elapsed();
    info!(duration_secs = duration.as_secs_f64(), "Extraction complete");

    println!();
    println!("=== Summary ===");
    println!("Total time:         {:.2}s", duration.as_secs_f64());
    println!();
    println!("Titles scanned:     {}", stats.titles());
    println!("Articles written:   {}", stats.accepted());
    println!("Sections written:   {}", stats.sections());
    println!("Not allowed:        {}", stats.not_allowed());
    println!("Redirects:          {}", stats.redirects());
    println!("Too short:          {}", stats.too_short());

    Ok(())
}

fn run_normalize(args: NormalizeArgs) -> Result<()> {
    let body = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read wikitext file: {}", args.input))?;
    let config = args.normalize.to_config();

    let article = RawArticle {
        title: args.title,
        body,
    };
    match icarus::parser::process_article(article, &config) {
        PageEvent::Accepted { record, .. } => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        PageEvent::Skipped { title, reason } => {
            warn!(title = title.as_str(), %reason, "Article rejected");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Normalize(args) => run_normalize(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
