use tracing::debug;

use crate::lens_shading::common::error::{LensShadingError, Result};
use crate::lens_shading::grid::types::BlockGrid;
use crate::lens_shading::raw::types::ChannelPlane;

/// Spacing of grid cells in plane pixels, independent of the analysis cell size.
pub const GRID_PITCH: usize = 32;

/// Number of grid cells covering `plane_len` pixels.
pub fn grid_len(plane_len: usize) -> usize {
    plane_len.div_ceil(GRID_PITCH)
}

/// Start and stop (exclusive) of the sampling window for one grid cell on
/// one axis. Windows that run off the plane are cut short.
fn window(cell: usize, cell_size: usize, plane_len: usize) -> (usize, usize) {
    let start = (cell * GRID_PITCH + GRID_PITCH / 2 - cell_size / 2).min(plane_len - 1);
    let stop = (start + cell_size).min(plane_len);
    (start, stop)
}

/// Rejects window sizes that are odd or outside 2..=32.
pub fn check_cell_size(cell_size: usize) -> Result<()> {
    if (2..=GRID_PITCH).contains(&cell_size) && cell_size % 2 == 0 {
        Ok(())
    } else {
        Err(LensShadingError::InvalidConfiguration(format!(
            "analysis cell size {} must be even and within 2-{}",
            cell_size, GRID_PITCH
        )))
    }
}

/// Samples a `cell_size` square window at the centre of every 32-pixel cell.
///
/// Windows clipped by the plane edge are scaled up to a full window's worth
/// so edge cells compare fairly with interior ones. A zero block is stored
/// as 1; `max_value` is taken before that clamp.
pub fn aggregate(plane: &ChannelPlane, cell_size: usize) -> Result<BlockGrid> {
    check_cell_size(cell_size)?;
    Ok(aggregate_checked(plane, cell_size))
}

/// [`aggregate`] for a window size already accepted by [`check_cell_size`].
pub(crate) fn aggregate_checked(plane: &ChannelPlane, cell_size: usize) -> BlockGrid {
    let width = grid_len(plane.width);
    let height = grid_len(plane.height);
    let full_window = (cell_size * cell_size) as u64;

    let mut cells = Vec::with_capacity(width * height);
    let mut max_value = 0u32;

    for gy in 0..height {
        let (y_start, y_stop) = window(gy, cell_size, plane.height);
        for gx in 0..width {
            let (x_start, x_stop) = window(gx, cell_size, plane.width);

            let mut sum = 0u64;
            for y in y_start..y_stop {
                sum += plane.row(y)[x_start..x_stop]
                    .iter()
                    .map(|&v| u64::from(v))
                    .sum::<u64>();
            }

            let sampled = ((y_stop - y_start) * (x_stop - x_start)) as u64;
            if sampled < full_window {
                sum = sum * full_window / sampled;
            }
            let value = sum.min(u64::from(u32::MAX)) as u32;

            max_value = max_value.max(value);
            cells.push(value.max(1));
        }
    }

    debug!("Grid {}x{}, max block value {}", width, height, max_value);

    BlockGrid {
        width,
        height,
        cells,
        max_value,
    }
}
