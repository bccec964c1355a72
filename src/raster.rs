//! Per-cell aggregate statistics over a decoded pixel buffer.
//!
//! A `RasterAggregator` wraps an RGBA buffer (row-major, 8 bits per
//! channel) and computes one scalar per grid cell: a statistic extracted
//! per pixel (luminance, hue, saturation, lightness) folded by an
//! aggregate operation (avg, median, min, max). Large uniform regions
//! repeat identical pixel words heavily, so per-pixel statistic values are
//! memoized by packed pixel value for the duration of one aggregation
//! pass.
//!
//! The flattened pixel cache and the memo map are owned by one instance
//! and must not be shared across render passes.

use std::cell::OnceCell;
use std::collections::HashMap;

use glam::dvec2;

use crate::color::{luminance, rgb_to_hsl, Rgba};
use crate::errors::RasterError;
use crate::types::{BBox, Size};

/// How per-pixel statistics fold into one value per cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Avg,
    Median,
    Min,
    Max,
}

/// Which scalar is extracted from each pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Statistic {
    Luminance,
    Hue,
    Saturation,
    Lightness,
}

/// Memoized per-pixel statistic values, keyed by packed RGBA word
pub type PixelMemo = HashMap<u32, f64>;

/// A decoded RGBA image plus its lazily-built packed-pixel cache
pub struct RasterAggregator {
    width: usize,
    height: usize,
    data: Vec<u8>,
    packed: OnceCell<Vec<u32>>,
}

impl RasterAggregator {
    /// Wrap a row-major RGBA buffer. The buffer length must be exactly
    /// `width * height * 4`.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self, RasterError> {
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                actual: data.len(),
                expected,
                width,
                height,
            });
        }
        Ok(RasterAggregator {
            width,
            height,
            data,
            packed: OnceCell::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn bounds(&self) -> BBox {
        BBox::new(dvec2(0.0, 0.0), dvec2(self.width as f64, self.height as f64))
    }

    pub fn smallest_dimension(&self) -> usize {
        self.width.min(self.height)
    }

    pub fn largest_dimension(&self) -> usize {
        self.width.max(self.height)
    }

    /// One 32-bit word per pixel, built on first use and reused for every
    /// subsequent statistic request against this instance
    fn packed(&self) -> &[u32] {
        self.packed.get_or_init(|| {
            self.data
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect()
        })
    }

    /// Pixel at (col, row); reads past the image edge come back as fully
    /// transparent black, not clamped or reflected
    pub fn pixel(&self, col: i64, row: i64) -> Rgba {
        Rgba::from_packed(self.packed_pixel(col, row))
    }

    fn packed_pixel(&self, col: i64, row: i64) -> u32 {
        if col < 0 || col >= self.width as i64 || row < 0 || row >= self.height as i64 {
            0
        } else {
            self.packed()[row as usize * self.width + col as usize]
        }
    }

    /// Row-major packed pixels of a `w` x `h` chunk anchored at (x, y)
    fn chunk_flat(&self, x: i64, y: i64, w: usize, h: usize) -> Vec<u32> {
        let mut out = Vec::with_capacity(w * h);
        for row in y..y + h as i64 {
            for col in x..x + w as i64 {
                out.push(self.packed_pixel(col, row));
            }
        }
        out
    }

    /// Aggregate one chunk; the memo map persists pixel-value lookups
    /// across chunks of the same pass
    pub fn aggregate_chunk(
        &self,
        x: i64,
        y: i64,
        w: usize,
        h: usize,
        operation: Operation,
        statistic: Statistic,
        memo: &mut PixelMemo,
    ) -> f64 {
        let values: Vec<f64> = self
            .chunk_flat(x, y, w, h)
            .into_iter()
            .map(|px| {
                *memo
                    .entry(px)
                    .or_insert_with(|| statistic_value(px, statistic))
            })
            .collect();
        fold(operation, values)
    }

    /// One aggregate per cell of a `horizontal` x `vertical` grid, cells
    /// traversed column-major (increasing x outer, increasing y inner) to
    /// match the canvas segmentation order
    pub fn aggregate_chunks_flat(
        &self,
        horizontal: usize,
        vertical: usize,
        operation: Operation,
        statistic: Statistic,
    ) -> Vec<f64> {
        if horizontal == 0 || vertical == 0 {
            return Vec::new();
        }

        let cell_w = self.width / horizontal;
        let cell_h = self.height / vertical;

        let mut memo = PixelMemo::new();
        let mut out = Vec::with_capacity(horizontal * vertical);
        for x in 0..horizontal {
            for y in 0..vertical {
                out.push(self.aggregate_chunk(
                    (x * cell_w) as i64,
                    (y * cell_h) as i64,
                    cell_w,
                    cell_h,
                    operation,
                    statistic,
                    &mut memo,
                ));
            }
        }
        out
    }

    /// Like `aggregate_chunks_flat` with cell counts chosen to preserve
    /// the image aspect ratio, mirroring the canvas segmentation rule
    pub fn aggregate_chunks_aspect_ratio_flat(
        &self,
        count: usize,
        operation: Operation,
        statistic: Statistic,
    ) -> Vec<f64> {
        let (w, h) = (self.width as f64, self.height as f64);
        let (horizontal, vertical) = if self.width == self.height {
            (count, count)
        } else if self.width > self.height {
            (count, (count as f64 * (h / w)).floor() as usize)
        } else {
            ((count as f64 * (w / h)).floor() as usize, count)
        };
        self.aggregate_chunks_flat(horizontal, vertical, operation, statistic)
    }
}

fn statistic_value(px: u32, statistic: Statistic) -> f64 {
    let c = Rgba::from_packed(px);
    match statistic {
        Statistic::Luminance => luminance(c),
        Statistic::Hue => rgb_to_hsl(c).h,
        Statistic::Saturation => rgb_to_hsl(c).s,
        Statistic::Lightness => rgb_to_hsl(c).l,
    }
}

fn fold(operation: Operation, mut values: Vec<f64>) -> f64 {
    match operation {
        Operation::Avg => {
            if values.is_empty() {
                return f64::NAN;
            }
            // NaN samples contribute zero but stay in the denominator
            let sum: f64 = values
                .iter()
                .map(|v| if v.is_nan() { 0.0 } else { *v })
                .sum();
            sum / values.len() as f64
        }
        Operation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Operation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Operation::Median => {
            if values.is_empty() {
                return f64::NAN;
            }
            if values.len() == 1 {
                return values[0];
            }
            values.sort_by(f64::total_cmp);
            let half = values.len() / 2;
            if values.len() % 2 == 0 {
                (values[half - 1] + values[half]) / 2.0
            } else {
                values[half]
            }
        }
    }
}
