use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::info;

use m3u_transform::{
    config::{Config, LogFormat},
    observability::init_logging,
    sources::SourceFormat,
    utils::human_format::{format_duration, format_size},
};

#[derive(Parser)]
#[command(name = "m3u-transform")]
#[command(version)]
#[command(about = "Normalize provider channel listings and playlists into clean M3U8")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./m3u-transform.toml when present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input file, or `-` for stdin
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    input: PathBuf,

    /// Output file, or `-` for stdout
    #[arg(short, long, value_name = "FILE", default_value = "-")]
    output: PathBuf,

    /// Input format (overrides config)
    #[arg(short, long, value_enum)]
    format: Option<SourceFormat>,

    /// Pipeline step; repeat to build the step list (overrides config)
    #[arg(short, long = "step", value_name = "STEP")]
    steps: Vec<String>,

    /// Log level (overrides config)
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log output format (overrides config)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    if is_stdio(path) {
        let mut buffer = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buffer)
            .await
            .context("failed to read stdin")?;
        Ok(buffer)
    } else {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))
    }
}

async fn write_output(path: &Path, playlist: &str) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(playlist.as_bytes())
            .await
            .context("failed to write stdout")?;
        stdout.flush().await.context("failed to flush stdout")?;
        Ok(())
    } else {
        tokio::fs::write(path, playlist)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Validated once the CLI overrides are in place
    let mut config = Config::load_unvalidated(cli.config.as_deref())
        .context("failed to load configuration")?;

    // Override config with CLI arguments
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(format) = cli.format {
        config.source.format = format;
    }
    if !cli.steps.is_empty() {
        config.pipeline.steps = cli.steps;
    }
    config.validate().context("invalid configuration")?;

    if cli.print_config {
        let rendered =
            toml::to_string_pretty(&config).context("failed to render configuration")?;
        print!("{rendered}");
        return Ok(());
    }

    init_logging(&config.logging)?;
    info!("Starting m3u-transform v{}", env!("CARGO_PKG_VERSION"));
    match Config::resolve_file(cli.config.as_deref()) {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No configuration file, using defaults"),
    }

    let bytes = read_input(&cli.input).await?;
    let (path, source_name) = if is_stdio(&cli.input) {
        (None, "stdin".to_string())
    } else {
        (Some(cli.input.as_path()), cli.input.display().to_string())
    };

    let output = m3u_transform::transform(&config, path, &bytes, &source_name)
        .context("transformation failed")?;

    for report in &output.stages {
        info!(
            "Stage {}: duration={} output_size={}",
            report.stage_id,
            format_duration(report.duration),
            format_size(report.output_bytes)
        );
    }

    write_output(&cli.output, &output.playlist).await?;
    Ok(())
}
