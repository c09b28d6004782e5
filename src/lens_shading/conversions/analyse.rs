use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::lens_shading::{
    common::error::{LensShadingError, Result},
    config::AnalysisConfig,
    emit::{BinaryGridWriter, GridWriter, HeaderGridWriter, PlaneWriter, TextGridWriter, TiffPlaneWriter},
    grid::{GainGrid, build_gain_grid},
    raw::{BrcmDecoder, CaptureDecoder, ChannelPlanes, SensorHeader},
    timing::{PipelineTimings, Stage},
};

/// Everything a run produces before emission.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub header: SensorHeader,
    /// Black level actually applied
    pub black_level: u32,
    /// Corrected planes in physical order
    pub planes: ChannelPlanes,
    pub grid: GainGrid,
    pub timings: PipelineTimings,
}

pub struct LensShadingPipeline<D: CaptureDecoder> {
    decoder: D,
    config: AnalysisConfig,
}

impl LensShadingPipeline<BrcmDecoder> {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            decoder: BrcmDecoder,
            config,
        }
    }
}

impl<D: CaptureDecoder> LensShadingPipeline<D> {
    pub fn with_custom(decoder: D, config: AnalysisConfig) -> Self {
        Self { decoder, config }
    }

    /// Decodes `input_data` and derives its gain grid. Nothing is written.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn analyse(&self, input_data: &[u8]) -> Result<Analysis> {
        info!("Starting lens shading analysis");
        let mut timings = PipelineTimings::new();

        let decoded = {
            let _span = tracing::info_span!("decode_capture").entered();
            self.decoder.decode(input_data, self.config.black_level)?
        };
        timings.merge(&decoded.timings);

        let grid = {
            let _span = tracing::info_span!("build_grid", cell_size = self.config.cell_size).entered();
            build_gain_grid(&decoded.planes, &decoded.header, self.config.cell_size, &mut timings)?
        };

        info!(
            grid_width = grid.width,
            grid_height = grid.height,
            "Grid size: {} x {}",
            grid.width,
            grid.height
        );

        Ok(Analysis {
            header: decoded.header,
            black_level: decoded.black_level,
            planes: decoded.planes,
            grid,
            timings,
        })
    }

    /// Writes the grid through a single emitter.
    pub fn write_grid(&self, analysis: &Analysis, writer: &dyn GridWriter, output: &mut dyn Write) -> Result<()> {
        let _span = tracing::info_span!("write_grid", format = writer.file_name()).entered();
        writer.write_grid(&analysis.grid, output)
    }

    /// Writes every artifact selected in the configuration into `output_dir`
    /// and returns the paths created.
    pub fn emit<P: AsRef<Path>>(&self, analysis: &Analysis, output_dir: P) -> Result<Vec<PathBuf>> {
        let outputs = self.config.outputs;
        let mut grid_writers: Vec<&dyn GridWriter> = Vec::new();
        if outputs.header {
            grid_writers.push(&HeaderGridWriter);
        }
        if outputs.binary {
            grid_writers.push(&BinaryGridWriter);
        }
        if outputs.text {
            grid_writers.push(&TextGridWriter);
        }
        let tiff_writer = TiffPlaneWriter::new(self.config.plane_compression);
        let plane_writer: Option<&dyn PlaneWriter> = if outputs.channel_data {
            Some(&tiff_writer)
        } else {
            None
        };

        self.emit_with(analysis, &grid_writers, plane_writer, output_dir.as_ref())
    }

    /// Like [`emit`](Self::emit) with explicit writers.
    ///
    /// Every artifact is encoded before any file is created. If a file
    /// cannot be written, the ones already written by this call are removed.
    #[instrument(skip(self, analysis, grid_writers, plane_writer))]
    pub fn emit_with(
        &self,
        analysis: &Analysis,
        grid_writers: &[&dyn GridWriter],
        plane_writer: Option<&dyn PlaneWriter>,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        let mut encoded: Vec<(PathBuf, Vec<u8>)> = Vec::new();

        if let Some(plane_writer) = plane_writer {
            for (index, plane) in analysis.planes.iter().enumerate() {
                let mut buffer = Vec::new();
                plane_writer.write_plane(plane, &mut buffer)?;
                encoded.push((output_dir.join(plane_writer.file_name(index)), buffer));
            }
        }

        for writer in grid_writers {
            let mut buffer = Vec::new();
            self.write_grid(analysis, *writer, &mut buffer)?;
            encoded.push((output_dir.join(writer.file_name()), buffer));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(encoded.len());
        for (path, bytes) in encoded {
            if let Err(e) = write_output(&path, &bytes) {
                for path in &written {
                    if let Err(remove_err) = fs::remove_file(path) {
                        warn!(output = %path.display(), "Failed to remove partial output: {}", remove_err);
                    }
                }
                return Err(e);
            }
            info!(output = %path.display(), "Wrote output file");
            written.push(path);
        }

        Ok(written)
    }

    /// Reads a capture from disk, analyses it and emits the configured
    /// artifacts into `output_dir`.
    #[instrument(skip(self, input_path, output_dir))]
    pub fn analyse_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input_path: P, output_dir: Q) -> Result<Analysis> {
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();

        info!(
            input = %input_path.display(),
            output_dir = %output_dir.display(),
            "Analysing file"
        );

        let mut timings = PipelineTimings::new();
        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            timings.time(Stage::Read, || fs::read(input_path)).map_err(|e| {
                LensShadingError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };
        info!("File size is {}", input_data.len());

        let mut analysis = self.analyse(&input_data)?;
        timings.merge(&analysis.timings);

        timings.time(Stage::Emit, || self.emit(&analysis, output_dir))?;
        analysis.timings = timings;

        analysis.timings.log_summary();
        Ok(analysis)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let to_error = |e: std::io::Error| LensShadingError::OutputWriteError(format!("{}: {}", path.display(), e));
    let mut output = File::create(path).map(BufWriter::new).map_err(to_error)?;
    output.write_all(bytes).map_err(to_error)?;
    output.flush().map_err(to_error)
}
