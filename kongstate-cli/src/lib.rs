use anyhow::Context;
use clap::Parser;
use kongstate_core::config::{EngineConfig, LogFormat};
use kongstate_core::diagnostics::CollectingSink;
use kongstate_core::document::OverrideDocument;
use kongstate_core::service::ServiceConfig;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kongstate", version, about = "Resolve Kong service overrides offline")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/kongstate/kongstate.yaml")]
    pub config: PathBuf,

    /// Log level (overrides the config file; RUST_LOG wins over both)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override document (.yaml, .yml or .json)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Write the resolved service here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit with status 2 if any annotation was rejected
    #[arg(long)]
    pub strict: bool,
}

/// Load config, set up logging and resolve the input document.
///
/// Returns `true` when `--strict` is set and diagnostics were emitted.
pub fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = load_config(&cli.config)?;
    init_tracing(&config, cli.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        prefix = %config.annotations.prefix,
        "kongstate starting"
    );

    let doc = OverrideDocument::load(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    let sink = CollectingSink::new();
    let resolved = doc.resolve(&config.engine(), &sink);
    info!(
        sources = doc.sources.len(),
        diagnostics = sink.len(),
        "Service resolved"
    );

    write_output(&resolved, cli.output.as_deref())?;
    Ok(cli.strict && !sink.is_empty())
}

fn load_config(path: &Path) -> anyhow::Result<EngineConfig> {
    if path.exists() {
        EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))
    } else {
        Ok(EngineConfig::default())
    }
}

fn init_tracing(config: &EngineConfig, level_flag: Option<&str>) {
    let level = level_flag.unwrap_or(config.log.level.as_str());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    // a global subscriber may already be installed
    let _ = match config.log.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

/// Pretty JSON rendering of a resolved service, newline-terminated.
pub fn render(resolved: &ServiceConfig) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(resolved)?;
    out.push('\n');
    Ok(out)
}

fn write_output(resolved: &ServiceConfig, output: Option<&Path>) -> anyhow::Result<()> {
    let rendered = render(resolved)?;
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
