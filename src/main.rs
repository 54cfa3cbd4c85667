use clap::Parser;
use clap::builder::FalseyValueParser;
use folio::probe::{DEFAULT_PROBE_TIMEOUT, server_reachable};
use folio::{
    ChromeOptions, ChromeTypesetter, DEFAULT_ANCHOR_ADJUSTMENT, DocumentContent, DocumentSource,
    MarkupInline, PipelineBuilder, PipelineError, PrintOptions, SourceError, SourceOptions,
};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Renders the document content to a PDF with a resolved table of contents.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Content JSON to render.
    #[arg(long, env = "FOLIO_CONTENT", default_value = "content/document.json")]
    content: PathBuf,

    /// Where the PDF is written. Replaced on every successful run.
    #[arg(long, env = "FOLIO_OUTPUT", default_value = "public/document.pdf")]
    output: PathBuf,

    /// Port of the local asset server that must be up before rendering.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Base URL for stylesheets and scripts; defaults to the local asset server.
    #[arg(long, env = "FOLIO_ASSET_BASE_URL")]
    asset_base_url: Option<String>,

    /// Stylesheet to link, relative to the asset base URL. Repeatable.
    #[arg(long = "stylesheet")]
    stylesheets: Vec<String>,

    /// Script to load, relative to the asset base URL. Repeatable.
    #[arg(long = "script")]
    scripts: Vec<String>,

    /// Exit immediately without generating anything.
    #[arg(long, env = "SKIP_GENERATION", value_parser = FalseyValueParser::new())]
    skip_generation: bool,

    /// Log intermediate geometry and page maps.
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    debug: bool,

    /// Running on a managed host: skip the server check and never fail the build.
    #[arg(long, env = "MANAGED_HOSTING", value_parser = FalseyValueParser::new())]
    managed_hosting: bool,

    /// Chrome or Chromium binary.
    #[arg(long, env = "CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    /// Run the browser without its sandbox (containers).
    #[arg(long)]
    no_sandbox: bool,

    /// Per-anchor page correction factor.
    #[arg(long, default_value_t = DEFAULT_ANCHOR_ADJUSTMENT)]
    adjustment: f64,

    /// Upper bound on the whole generation, in seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Asset server is not reachable on port {0}; start it or set MANAGED_HOSTING")]
    ServerUnreachable(u16),

    #[error(transparent)]
    Content(#[from] SourceError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

async fn run(cli: &Cli, typesetter: Arc<ChromeTypesetter>) -> Result<(), CliError> {
    if cli.managed_hosting {
        info!("Managed hosting detected; skipping asset server check.");
    } else if !server_reachable("127.0.0.1", cli.port, DEFAULT_PROBE_TIMEOUT).await {
        return Err(CliError::ServerUnreachable(cli.port));
    }

    info!("Loading content from {}", cli.content.display());
    let content = DocumentContent::from_path(&cli.content)?;

    let print = PrintOptions::default();
    let mut options = SourceOptions::default()
        .with_asset_base_url(
            cli.asset_base_url
                .clone()
                .unwrap_or_else(|| format!("http://localhost:{}/", cli.port)),
        )
        .with_content_width(print.content_width_in());
    options.stylesheets = cli.stylesheets.clone();
    options.scripts = cli.scripts.clone();

    let document = DocumentSource::new(Arc::new(MarkupInline))
        .with_options(options)
        .build(&content)?;

    let pipeline = PipelineBuilder::new()
        .with_typesetter(typesetter)
        .with_print_options(print)
        .with_anchor_adjustment(cli.adjustment)
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .with_debug(cli.debug)
        .build()?;

    info!("Generating PDF to {}...", cli.output.display());
    let report = pipeline.generate_to_file(&document, &cli.output).await?;

    info!(
        "Wrote {} ({:?} pages; {} exact, {} estimated, {} unresolved).",
        cli.output.display(),
        report.final_pages,
        report.anchors_exact,
        report.anchors_estimated,
        report.unresolved.len()
    );
    if report.is_degraded() {
        warn!("Degraded stages: {:?}", report.degraded);
    }
    if cli.debug {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => log::debug!("Generation report:\n{}", json),
            Err(e) => log::debug!("Could not serialize report: {}", e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if cli.skip_generation {
        info!("SKIP_GENERATION is set; not generating a PDF.");
        return ExitCode::SUCCESS;
    }

    let mut chrome = ChromeOptions::default().with_sandbox(!cli.no_sandbox);
    if let Some(path) = &cli.chrome_path {
        chrome = chrome.with_executable(path);
    }
    let typesetter = Arc::new(ChromeTypesetter::new(chrome));

    let outcome = run(&cli, Arc::clone(&typesetter)).await;
    typesetter.shutdown().await;

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if cli.managed_hosting => {
            warn!("PDF generation failed: {}. Continuing because MANAGED_HOSTING is set.", e);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("PDF generation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
