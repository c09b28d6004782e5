//! Synthetic BRCM captures for tests

use crate::lens_shading::raw::header::{BayerOrder, BitDepth, FORMAT_BAYER, HEADER_OFFSET};
use crate::lens_shading::raw::unpack::{PIXEL_DATA_OFFSET, scanline_stride};

type PixelFn = Box<dyn Fn(usize, usize) -> u16>;

pub(crate) struct CaptureBuilder {
    width: u16,
    height: u16,
    padding_right: u16,
    bit_depth: BitDepth,
    model: String,
    mode_name: String,
    transform: u16,
    format: u16,
    bayer_order_tag: u8,
    bayer_format_tag: u8,
    pixels: PixelFn,
}

impl CaptureBuilder {
    pub(crate) fn new(width: u16, height: u16, bit_depth: BitDepth) -> Self {
        Self {
            width,
            height,
            padding_right: 0,
            bit_depth,
            model: "ov5647".to_string(),
            mode_name: "test".to_string(),
            transform: 0,
            format: FORMAT_BAYER,
            bayer_order_tag: BayerOrder::Rggb.tag(),
            bayer_format_tag: bit_depth.tag(),
            pixels: Box::new(|_, _| 0),
        }
    }

    pub(crate) fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub(crate) fn mode_name(mut self, name: &str) -> Self {
        self.mode_name = name.to_string();
        self
    }

    pub(crate) fn transform(mut self, transform: u16) -> Self {
        self.transform = transform;
        self
    }

    pub(crate) fn padding_right(mut self, padding: u16) -> Self {
        self.padding_right = padding;
        self
    }

    pub(crate) fn format(mut self, format: u16) -> Self {
        self.format = format;
        self
    }

    pub(crate) fn bayer_order(self, order: BayerOrder) -> Self {
        self.bayer_order_tag(order.tag())
    }

    pub(crate) fn bayer_order_tag(mut self, tag: u8) -> Self {
        self.bayer_order_tag = tag;
        self
    }

    pub(crate) fn bayer_format_tag(mut self, tag: u8) -> Self {
        self.bayer_format_tag = tag;
        self
    }

    /// Raw (uncorrected) sample for sensor pixel `(x, y)`
    pub(crate) fn pixels(mut self, f: impl Fn(usize, usize) -> u16 + 'static) -> Self {
        self.pixels = Box::new(f);
        self
    }

    pub(crate) fn stride(&self) -> usize {
        scanline_stride(self.width, self.padding_right, self.bit_depth)
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let stride = self.stride();
        let height = usize::from(self.height);
        let mut buffer = vec![0u8; PIXEL_DATA_OFFSET + stride * height];

        buffer[..4].copy_from_slice(b"BRCM");
        let model = self.model.as_bytes();
        buffer[16..16 + model.len().min(6)].copy_from_slice(&model[..model.len().min(6)]);

        let header = &mut buffer[HEADER_OFFSET..HEADER_OFFSET + 70];
        let name = self.mode_name.as_bytes();
        header[..name.len().min(31)].copy_from_slice(&name[..name.len().min(31)]);
        header[32..34].copy_from_slice(&self.width.to_le_bytes());
        header[34..36].copy_from_slice(&self.height.to_le_bytes());
        header[36..38].copy_from_slice(&self.padding_right.to_le_bytes());
        header[64..66].copy_from_slice(&self.transform.to_le_bytes());
        header[66..68].copy_from_slice(&self.format.to_le_bytes());
        header[68] = self.bayer_order_tag;
        header[69] = self.bayer_format_tag;

        let width = usize::from(self.width);
        let clusters = width.div_ceil(4);
        let cluster_bytes = self.bit_depth.cluster_bytes();
        for y in 0..height {
            let row = PIXEL_DATA_OFFSET + y * stride;
            for c in 0..clusters {
                let mut p = [0u16; 4];
                for (i, sample) in p.iter_mut().enumerate() {
                    let x = c * 4 + i;
                    if x < width {
                        *sample = (self.pixels)(x, y);
                    }
                }
                let at = row + c * cluster_bytes;
                let packed = pack_cluster(self.bit_depth, p);
                buffer[at..at + cluster_bytes].copy_from_slice(&packed[..cluster_bytes]);
            }
        }
        buffer
    }
}

pub(crate) fn pack_cluster(bit_depth: BitDepth, p: [u16; 4]) -> [u8; 6] {
    match bit_depth {
        BitDepth::Raw10 => {
            let mut lsbs = 0u8;
            for (i, v) in p.iter().enumerate() {
                lsbs |= ((v & 0x3) as u8) << (6 - 2 * i);
            }
            [
                (p[0] >> 2) as u8,
                (p[1] >> 2) as u8,
                (p[2] >> 2) as u8,
                (p[3] >> 2) as u8,
                lsbs,
                0,
            ]
        }
        BitDepth::Raw12 => [
            (p[0] >> 4) as u8,
            (p[1] >> 4) as u8,
            (((p[0] & 0xF) << 4) | (p[1] & 0xF)) as u8,
            (p[2] >> 4) as u8,
            (p[3] >> 4) as u8,
            (((p[2] & 0xF) << 4) | (p[3] & 0xF)) as u8,
        ],
    }
}
