use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use lens_shading_rs::lens_shading::{AnalysisConfig, LensShadingPipeline};
use lens_shading_rs::logger::{self, error, info};

/// Analyses a raw capture of a uniformly lit scene (e.g. a white wall) and
/// writes a lens shading table that flattens it.
#[derive(Parser)]
#[command(name = "lens_shading_analyse", version, about = "Lens shading analysis tool")]
struct Args {
    /// Raw image file, bare BRCM raw or JPEG with appended raw
    #[arg(short, long)]
    input: PathBuf,

    /// Black level (0 uses the sensor model's default)
    #[arg(short, long, default_value_t = 0)]
    black_level: u32,

    /// Size of the analysis cell. Minimum 2, maximum 32, odd sizes are rounded up
    #[arg(short = 's', long, default_value_t = 4)]
    cell_size: u8,

    /// Output formats, combinable (3 = 1 + 2):
    /// 1 header file, 2 binary file, 4 text file, 8 channel data
    #[arg(short, long, default_value_t = 1)]
    output_format: u8,

    /// Directory receiving the output files
    #[arg(short = 'd', long, default_value = ".")]
    output_dir: PathBuf,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    let config = AnalysisConfig::builder()
        .black_level(args.black_level)
        .cell_size(args.cell_size)
        .output_mask(args.output_format)
        .build()
        .context("Invalid arguments")?;
    let pipeline = LensShadingPipeline::new(config);

    info!("Analysing {}", args.input.display());
    match pipeline.analyse_file(&args.input, &args.output_dir) {
        Ok(analysis) => {
            info!(
                "Lens shading table complete: {} x {} cells",
                analysis.grid.width, analysis.grid.height
            );
            Ok(())
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            Err(e).with_context(|| format!("Failed to analyse {}", args.input.display()))
        }
    }
}
