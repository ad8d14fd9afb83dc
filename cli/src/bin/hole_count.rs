use clap::{Parser, Subcommand};
use cli::InspectionConfig;
use color_eyre::eyre::Result;
use holes::{
    Pipeline, Polarity,
    io::{BytesSource, FileSource, ImageSource, SourceChain, save_mask},
};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count the holes of the part in an image
    Count {
        /// Image file to inspect
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Read an encoded image from stdin when no file is given
        #[arg(long)]
        stdin: bool,
        /// Configuration file (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Factor applied to the Otsu threshold
        #[arg(long)]
        threshold_multiplier: Option<f64>,
        /// Which side of the threshold the part lies on (part_is_low, part_is_high)
        #[arg(long)]
        part_polarity: Option<Polarity>,
        /// Write the binarized mask to this image file
        #[arg(short, long)]
        mask_output: Option<PathBuf>,
        /// Write the hole report as JSON to this file
        #[arg(long)]
        report_output: Option<PathBuf>,
    },
    /// Print the JSON schema of the configuration file
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Count {
            input,
            stdin,
            config,
            threshold_multiplier,
            part_polarity,
            mask_output,
            report_output,
        } => {
            let mut settings = match config {
                Some(path) => InspectionConfig::from_file(path)?,
                None => InspectionConfig::default(),
            };
            if let Some(multiplier) = threshold_multiplier {
                settings.counting.threshold_multiplier = multiplier;
            }
            if let Some(polarity) = part_polarity {
                settings.counting.part_polarity = polarity;
            }
            let input = input.or_else(|| settings.input.clone().map(PathBuf::from));
            let mask_output = mask_output.or_else(|| settings.mask_output.clone().map(PathBuf::from));
            let report_output =
                report_output.or_else(|| settings.report_output.clone().map(PathBuf::from));

            count(&settings, input, stdin, mask_output, report_output)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&InspectionConfig::schema())?);
        }
    }

    Ok(())
}

fn count(
    settings: &InspectionConfig,
    input: Option<PathBuf>,
    stdin: bool,
    mask_output: Option<PathBuf>,
    report_output: Option<PathBuf>,
) -> Result<()> {
    let mut bytes = Vec::new();
    if stdin {
        std::io::stdin().read_to_end(&mut bytes)?;
    }

    let sources = SourceChain::new()
        .then(FileSource { path: input })
        .then(BytesSource { bytes });

    let Some(raster) = sources.acquire()? else {
        info!("No image available, nothing to inspect");
        return Ok(());
    };

    let pipeline = Pipeline::builder()
        .threshold_multiplier(settings.counting.threshold_multiplier)
        .part_polarity(settings.counting.part_polarity)
        .build()?;
    info!("{}", pipeline.info());

    let inspection = pipeline.process(&raster)?;
    println!("Holes: {}", inspection.holes());

    if let Some(path) = mask_output {
        save_mask(&inspection.mask, &path)?;
    }

    if let Some(path) = report_output {
        let report = serde_json::json!({
            "image_width": inspection.image_width,
            "image_height": inspection.image_height,
            "threshold": inspection.threshold,
            "report": inspection.report,
        });
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        info!("📄 Report saved to: {:?}", path);
    }

    Ok(())
}
