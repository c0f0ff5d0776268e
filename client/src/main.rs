//! `agro` – command-line front end for the AgriScience inference API.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use agro_client::inference::Analyzer;
use agro_client::report::Report;
use agro_common::analysis::Analysis;
use agro_common::config::Config;
use agro_common::crop::CropForm;
use agro_common::disease::DiseaseImage;

#[derive(Parser)]
#[command(name = "agro", version, about = "Crop recommendation and plant disease detection")]
struct Cli {
    /// KEY=VALUE config file (environment variables take precedence).
    #[arg(long, env = "AGRO_CONFIG", default_value = Config::default_path())]
    config: PathBuf,

    /// Inference API base URL, overriding the config.
    #[arg(long)]
    api: Option<String>,

    /// Show placeholder results instead of failing when the API is down.
    #[arg(long)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recommend crops for the given soil and climate readings.
    Crop(CropArgs),
    /// Check a leaf photo for disease.
    Disease {
        image: PathBuf,
        /// Write a PDF report to this file or directory.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Query the API health endpoint.
    Health,
}

/// Values are taken as typed; unparseable text is sent as NaN.
#[derive(Args)]
struct CropArgs {
    #[arg(long, short = 'n', allow_hyphen_values = true)]
    nitrogen: String,
    #[arg(long, short = 'p', allow_hyphen_values = true)]
    phosphorus: String,
    #[arg(long, short = 'k', allow_hyphen_values = true)]
    potassium: String,
    #[arg(long, short = 't', allow_hyphen_values = true)]
    temperature: String,
    #[arg(long, short = 'u', allow_hyphen_values = true)]
    humidity: String,
    #[arg(long, allow_hyphen_values = true)]
    ph: String,
    #[arg(long, short = 'r', allow_hyphen_values = true)]
    rainfall: String,
    /// Write a PDF report to this file or directory.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = agro_common::config::load(&cli.config).context("Config load failed")?;
    if let Some(api) = cli.api {
        config.api_base_url = api.trim_end_matches('/').to_string();
    }
    config.demo_mode |= cli.demo;
    info!(
        "Using inference API at {} (demo_mode={})",
        config.api_base_url, config.demo_mode
    );

    let analyzer = Analyzer::from_config(&config)?;

    match cli.command {
        Command::Crop(args) => run_crop(&analyzer, args).await,
        Command::Disease { image, report } => run_disease(&analyzer, &image, report).await,
        Command::Health => {
            let health = analyzer.client().health().await?;
            println!("{}: {}", health.status, health.message);
            Ok(())
        }
    }
}

async fn run_crop(analyzer: &Analyzer, args: CropArgs) -> Result<()> {
    let form = CropForm {
        nitrogen: args.nitrogen,
        phosphorus: args.phosphorus,
        potassium: args.potassium,
        temperature: args.temperature,
        humidity: args.humidity,
        ph: args.ph,
        rainfall: args.rainfall,
    };
    let input = form.parse();
    for field in input.out_of_range() {
        let spec = field.spec();
        tracing::warn!(
            "{} is outside {}..={} – sending anyway",
            spec.caption(),
            spec.min,
            spec.max
        );
    }

    let analysis = analyzer.crops(&input).await?;
    print_placeholder_notice(&analysis);
    for (i, row) in analysis.value().iter().enumerate() {
        println!("{}. {} {} {}%", i + 1, row.icon, row.name, row.confidence);
    }

    if let Some(target) = args.report {
        let report = Report::crop(&input, &analysis, chrono::Local::now());
        write_report(&report, &target)?;
    }
    Ok(())
}

async fn run_disease(analyzer: &Analyzer, path: &Path, report: Option<PathBuf>) -> Result<()> {
    let mime = image::ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");
    let bytes = std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let Some(image) = DiseaseImage::accept(&file_name, mime, bytes) else {
        bail!("{} is not an image ({mime})", path.display());
    };

    let analysis = analyzer.disease(&image).await?;
    print_placeholder_notice(&analysis);
    let result = analysis.value();
    println!("{} – {}%", result.status.headline(), result.confidence);
    if let Some(disease) = &result.disease {
        println!("{disease}");
    }

    if let Some(target) = report {
        let report = Report::disease(&analysis, Some(&image), chrono::Local::now());
        write_report(&report, &target)?;
    }
    Ok(())
}

fn print_placeholder_notice<T>(analysis: &Analysis<T>) {
    if let Some(reason) = analysis.placeholder_reason() {
        eprintln!("DEMO DATA – the analysis service failed ({reason})");
    }
}

/// Write to `target`, or into it using the dated file name when it is a directory.
fn write_report(report: &Report, target: &Path) -> Result<()> {
    let path = if target.is_dir() {
        target.join(report.file_name())
    } else {
        target.to_path_buf()
    };
    let pdf = report.to_pdf()?;
    std::fs::write(&path, pdf).with_context(|| format!("Cannot write {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
