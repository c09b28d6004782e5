use tracing::{debug, instrument, warn};

use crate::lens_shading::common::error::Result;
use crate::lens_shading::grid::aggregate::{aggregate_checked, check_cell_size};
use crate::lens_shading::grid::types::{BlockGrid, Channel, ChannelGains, GainGrid};
use crate::lens_shading::raw::header::{BayerOrder, SensorHeader};
use crate::lens_shading::raw::types::ChannelPlanes;
use crate::lens_shading::timing::{PipelineTimings, Stage};

/// Fixed-point unity gain.
pub const UNITY_GAIN: u8 = 32;

/// Largest representable gain, roughly x8.
pub const MAX_GAIN: u8 = 255;

/// Physical plane feeding each of R, Gr, Gb, B.
pub fn channel_ordering(order: BayerOrder) -> [usize; 4] {
    match order {
        BayerOrder::Rggb => [0, 1, 2, 3],
        BayerOrder::Gbrg => [2, 3, 0, 1],
        BayerOrder::Bggr => [3, 2, 1, 0],
        BayerOrder::Grbg => [1, 0, 3, 2],
    }
}

/// Converts block values into gains relative to the brightest block.
///
/// Each gain is `round(32 * max / block)` clipped to `[32, 255]`. A channel
/// with no signal at all has nothing to normalise against and gets the
/// maximum gain everywhere.
pub fn derive(blocks: &BlockGrid) -> Vec<u8> {
    if blocks.max_value == 0 {
        warn!("Channel has no signal, emitting maximum gain for every cell");
        return vec![MAX_GAIN; blocks.cells.len()];
    }

    let reference = u64::from(blocks.max_value) << 5;
    blocks
        .cells
        .iter()
        .map(|&cell| {
            let cell = u64::from(cell);
            let gain = (reference + cell / 2) / cell;
            if gain < u64::from(UNITY_GAIN) {
                warn!("Gain {} below unity for block value {}, clipping", gain, cell);
            }
            gain.clamp(u64::from(UNITY_GAIN), u64::from(MAX_GAIN)) as u8
        })
        .collect()
}

/// Runs aggregation and gain derivation for all four channels, mapping
/// physical planes onto R, Gr, Gb, B through the header's bayer order.
/// Aggregation and derivation time is charged to `timings`.
#[instrument(skip_all, fields(bayer_order = %header.bayer_order, cell_size = cell_size))]
pub fn build_gain_grid(
    planes: &ChannelPlanes,
    header: &SensorHeader,
    cell_size: usize,
    timings: &mut PipelineTimings,
) -> Result<GainGrid> {
    check_cell_size(cell_size)?;
    let ordering = channel_ordering(header.bayer_order);

    let mut width = 0;
    let mut height = 0;
    let channels = Channel::ALL.map(|channel| {
        let source_plane = ordering[channel.index()];
        let blocks = timings.time(Stage::Aggregate, || aggregate_checked(&planes[source_plane], cell_size));
        debug!(
            "{} - Ch {}: max block value {}",
            channel.label(),
            source_plane,
            blocks.max_value
        );
        width = blocks.width;
        height = blocks.height;
        ChannelGains {
            channel,
            source_plane,
            gains: timings.time(Stage::Derive, || derive(&blocks)),
        }
    });

    Ok(GainGrid {
        width,
        height,
        transform: u32::from(header.transform),
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_shading::raw::header::BitDepth;
    use crate::lens_shading::raw::types::ChannelPlane;

    fn blocks(cells: Vec<u32>) -> BlockGrid {
        let max_value = cells.iter().copied().max().unwrap_or(0);
        BlockGrid {
            width: cells.len(),
            height: 1,
            cells,
            max_value,
        }
    }

    fn header(order: BayerOrder) -> SensorHeader {
        SensorHeader {
            model: "imx219".to_string(),
            mode_name: "test".to_string(),
            width: 128,
            height: 64,
            padding_right: 0,
            padding_down: 0,
            transform: 7,
            format: 33,
            bayer_order: order,
            bit_depth: BitDepth::Raw10,
        }
    }

    #[test]
    fn test_brightest_cell_is_unity() {
        let gains = derive(&blocks(vec![1000, 500, 250, 800]));
        assert_eq!(gains, vec![32, 64, 128, 40]);
    }

    #[test]
    fn test_gain_rounds_to_nearest() {
        // 32 * 1000 / 600 = 53.33, 32 * 1000 / 610 = 52.46
        let gains = derive(&blocks(vec![1000, 600, 610]));
        assert_eq!(gains, vec![32, 53, 52]);
    }

    #[test]
    fn test_gain_clips_at_maximum() {
        let gains = derive(&blocks(vec![10000, 1, 100]));
        assert_eq!(gains, vec![32, 255, 255]);
    }

    #[test]
    fn test_no_signal_yields_maximum_gain() {
        let grid = BlockGrid {
            width: 2,
            height: 2,
            cells: vec![1; 4],
            max_value: 0,
        };
        assert_eq!(derive(&grid), vec![255; 4]);
    }

    #[test]
    fn test_channel_ordering_table() {
        assert_eq!(channel_ordering(BayerOrder::Rggb), [0, 1, 2, 3]);
        assert_eq!(channel_ordering(BayerOrder::Gbrg), [2, 3, 0, 1]);
        assert_eq!(channel_ordering(BayerOrder::Bggr), [3, 2, 1, 0]);
        assert_eq!(channel_ordering(BayerOrder::Grbg), [1, 0, 3, 2]);
    }

    #[test]
    fn test_gain_grid_follows_bayer_order() {
        // Plane i is uniformly bright except cell (0,0), which is darker by i+1
        let planes: ChannelPlanes = std::array::from_fn(|i| {
            let mut plane = ChannelPlane::new(64, 32);
            for y in 0..32 {
                for x in 0..64 {
                    plane.data[y * 64 + x] = if x < 32 { 100 / (i as u16 + 1) } else { 100 };
                }
            }
            plane
        });

        let mut timings = PipelineTimings::new();
        let grid = build_gain_grid(&planes, &header(BayerOrder::Bggr), 4, &mut timings).unwrap();
        assert!(timings.get(Stage::Aggregate).is_some());
        assert!(timings.get(Stage::Derive).is_some());
        assert_eq!((grid.width, grid.height), (2, 1));
        assert_eq!(grid.transform, 7);

        let labels: Vec<_> = grid.channels.iter().map(|c| c.channel.label()).collect();
        assert_eq!(labels, vec!["R", "Gr", "Gb", "B"]);

        let sources: Vec<_> = grid.channels.iter().map(|c| c.source_plane).collect();
        assert_eq!(sources, vec![3, 2, 1, 0]);

        // R comes from plane 3: 32 * 1600 / 400 = 128
        assert_eq!(grid.channels[0].gains, vec![128, 32]);
        // B comes from plane 0: flat
        assert_eq!(grid.channels[3].gains, vec![32, 32]);
        for channel in &grid.channels {
            assert!(channel.gains.iter().all(|&g| (32..=255).contains(&g)));
        }
    }

    #[test]
    fn test_gain_grid_rejects_bad_cell_size() {
        let planes: ChannelPlanes = std::array::from_fn(|_| ChannelPlane::new(64, 32));
        let result = build_gain_grid(&planes, &header(BayerOrder::Rggb), 40, &mut PipelineTimings::new());
        assert!(matches!(
            result,
            Err(crate::lens_shading::common::error::LensShadingError::InvalidConfiguration(_))
        ));
    }
}
