//! Working coordinate space for one render pass.
//!
//! A `RenderContext` owns the page and drawing canvas geometry, the seed
//! and its `RandomSource`. Segmentation carves the canvas (or an explicit
//! region) into a grid and hands back representative points or cell boxes
//! in column-major order; the aggregate raster statistics are produced in
//! the same order, and downstream code zips the two sequences by index.

use glam::{DVec2, dvec2};

use crate::page::CanvasSize;
use crate::random::RandomSource;
use crate::types::{BBox, Size};

/// Where the representative point sits inside its cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentStyle {
    /// Cell origin, no offset
    Start,
    /// Cell-size/2 offset
    Center,
    /// Full cell-size offset
    End,
}

/// One axis of the canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A segmentation result: cell counts, cell size, and one entry per cell
/// in column-major order
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentGrid<T> {
    pub horizontal: usize,
    pub vertical: usize,
    pub cell: Size,
    pub cells: Vec<T>,
}

impl<T> SegmentGrid<T> {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn style_adjustment(style: SegmentStyle, cell_size: f64) -> f64 {
    match style {
        SegmentStyle::Start => 0.0,
        SegmentStyle::Center => cell_size / 2.0,
        SegmentStyle::End => cell_size,
    }
}

/// Page + drawing-canvas coordinate state for one render pass
pub struct RenderContext {
    pub page: CanvasSize,
    pub canvas: CanvasSize,
    pub seed: String,
    pub random: RandomSource,
}

impl RenderContext {
    pub fn new(page: CanvasSize, canvas: CanvasSize, seed: &str) -> Self {
        RenderContext {
            page,
            canvas,
            random: RandomSource::new(seed),
            seed: seed.to_string(),
        }
    }

    pub fn width(&self) -> f64 {
        self.canvas.width_px()
    }

    pub fn height(&self) -> f64 {
        self.canvas.height_px()
    }

    pub fn smallest_dimension(&self) -> f64 {
        self.width().min(self.height())
    }

    pub fn center(&self) -> DVec2 {
        dvec2(self.width() / 2.0, self.height() / 2.0)
    }

    pub fn clamp_horizontal(&self, x: f64, padding: f64) -> f64 {
        x.min(self.width() - padding).max(padding)
    }

    pub fn clamp_vertical(&self, y: f64, padding: f64) -> f64 {
        y.min(self.height() - padding).max(padding)
    }

    /// Clamp both axes into `[padding, dimension - padding]`
    pub fn clamp(&self, p: DVec2, padding: f64) -> DVec2 {
        dvec2(
            self.clamp_horizontal(p.x, padding),
            self.clamp_vertical(p.y, padding),
        )
    }

    // ========================================================================
    // Segmentation
    // ========================================================================

    /// Representative points of a `horizontal` x `vertical` grid over the
    /// drawing canvas
    pub fn segment_points(
        &self,
        horizontal: usize,
        vertical: usize,
        style: SegmentStyle,
    ) -> SegmentGrid<DVec2> {
        self.segment_points_in(horizontal, vertical, style, self.width(), self.height())
    }

    /// Representative points of a grid over an explicit `w` x `h` region
    pub fn segment_points_in(
        &self,
        horizontal: usize,
        vertical: usize,
        style: SegmentStyle,
        w: f64,
        h: f64,
    ) -> SegmentGrid<DVec2> {
        let cell = Size::new(w / horizontal as f64, h / vertical as f64);
        let h_adjust = style_adjustment(style, cell.w);
        let v_adjust = style_adjustment(style, cell.h);

        let mut cells = Vec::with_capacity(horizontal * vertical);
        for x in 0..horizontal {
            for y in 0..vertical {
                cells.push(dvec2(
                    x as f64 * cell.w + h_adjust,
                    y as f64 * cell.h + v_adjust,
                ));
            }
        }

        SegmentGrid {
            horizontal,
            vertical,
            cell,
            cells,
        }
    }

    /// Cell rectangles of a grid over the drawing canvas
    pub fn segment_boxes(&self, horizontal: usize, vertical: usize) -> SegmentGrid<BBox> {
        self.segment_boxes_in(horizontal, vertical, self.width(), self.height())
    }

    /// Cell rectangles of a grid over an explicit region, same traversal
    /// order as `segment_points_in`
    pub fn segment_boxes_in(
        &self,
        horizontal: usize,
        vertical: usize,
        w: f64,
        h: f64,
    ) -> SegmentGrid<BBox> {
        let cell = Size::new(w / horizontal as f64, h / vertical as f64);

        let mut cells = Vec::with_capacity(horizontal * vertical);
        for x in 0..horizontal {
            for y in 0..vertical {
                cells.push(BBox::from_xywh(
                    x as f64 * cell.w,
                    y as f64 * cell.h,
                    cell.w,
                    cell.h,
                ));
            }
        }

        SegmentGrid {
            horizontal,
            vertical,
            cell,
            cells,
        }
    }

    /// Cell counts preserving the region's aspect ratio: the longer side
    /// gets `count` cells, the shorter side proportionally fewer.
    ///
    /// This mirrors the aggregate-statistic grid rule; the two cell counts
    /// must agree or the render aborts with a grid mismatch.
    fn aspect_counts(count: usize, w: f64, h: f64) -> (usize, usize) {
        if w == h {
            (count, count)
        } else if w > h {
            (count, (count as f64 * (h / w)).floor() as usize)
        } else {
            ((count as f64 * (w / h)).floor() as usize, count)
        }
    }

    /// Aspect-ratio-aware point segmentation of the drawing canvas
    pub fn segment_points_aspect_ratio(
        &self,
        count: usize,
        style: SegmentStyle,
    ) -> SegmentGrid<DVec2> {
        self.segment_points_aspect_ratio_in(count, style, self.width(), self.height())
    }

    /// Aspect-ratio-aware point segmentation of an explicit region
    pub fn segment_points_aspect_ratio_in(
        &self,
        count: usize,
        style: SegmentStyle,
        w: f64,
        h: f64,
    ) -> SegmentGrid<DVec2> {
        let (horizontal, vertical) = Self::aspect_counts(count, w, h);
        self.segment_points_in(horizontal, vertical, style, w, h)
    }

    /// Aspect-ratio-aware box segmentation of the drawing canvas
    pub fn segment_boxes_aspect_ratio(&self, count: usize) -> SegmentGrid<BBox> {
        self.segment_boxes_aspect_ratio_in(count, self.width(), self.height())
    }

    /// Aspect-ratio-aware box segmentation of an explicit region
    pub fn segment_boxes_aspect_ratio_in(&self, count: usize, w: f64, h: f64) -> SegmentGrid<BBox> {
        let (horizontal, vertical) = Self::aspect_counts(count, w, h);
        self.segment_boxes_in(horizontal, vertical, w, h)
    }

    /// 1D segmentation along one axis
    pub fn segment_dimension(&self, count: usize, axis: Axis, style: SegmentStyle) -> Vec<f64> {
        let length = match axis {
            Axis::Horizontal => self.width(),
            Axis::Vertical => self.height(),
        };
        let cell = length / count as f64;
        let adjust = style_adjustment(style, cell);

        (0..count).map(|i| cell * i as f64 + adjust).collect()
    }

    // ========================================================================
    // Fitting
    // ========================================================================

    /// Scale `target` to fit within the canvas preserving aspect ratio
    /// (contain-fit)
    pub fn fit_rect(&self, target: Size) -> Size {
        let scale = (self.width() / target.w).min(self.height() / target.h);
        Size::new(target.w * scale, target.h * scale)
    }

    /// Offset that centers a rectangle of `size` within the canvas
    pub fn center_rect(&self, size: Size) -> DVec2 {
        dvec2(
            (self.width() - size.w) / 2.0,
            (self.height() - size.h) / 2.0,
        )
    }

    /// Contain-fit `target` and center it, returning the placed box
    pub fn center_fit_rect(&self, target: Size) -> BBox {
        let fitted = self.fit_rect(target);
        let offset = self.center_rect(fitted);
        BBox::from_xywh(offset.x, offset.y, fitted.w, fitted.h)
    }
}
