//! Page and canvas size model.
//!
//! Physical paper dimensions in inches and millimeters, pixel dimensions at
//! a fixed 96 DPI, and the margin arithmetic that derives the drawing canvas
//! from the selected page. A `CanvasSize` is computed once per render pass
//! and never mutated.

use glam::{DVec2, dvec2};

use crate::types::Size;

/// Fixed raster density for pixel-space coordinates
pub const DPI: f64 = 96.0;

const MM_PER_INCH: f64 = 25.4;

/// Convert inches to whole pixels at 96 DPI
pub fn inches_to_pixels(inches: f64) -> u32 {
    (inches * DPI).floor() as u32
}

/// Convert millimeters to whole pixels at 96 DPI
pub fn millimeters_to_pixels(millimeters: f64) -> u32 {
    inches_to_pixels(millimeters / MM_PER_INCH)
}

pub fn inches_to_millimeters(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Derived page geometry: physical units, pixel units, viewbox
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasSize {
    /// Physical size in inches, `[width, height]`
    pub inches: [f64; 2],
    /// Physical size in millimeters, `[width, height]`
    pub millimeters: [f64; 2],
    /// Pixel size at 96 DPI, `[width, height]`
    pub pixels: [u32; 2],
    /// SVG viewbox covering the pixel size
    pub view_box: String,
    pub width_to_height_ratio: f64,
}

impl CanvasSize {
    pub fn new(width_inches: f64, height_inches: f64) -> Self {
        let pixels = [
            inches_to_pixels(width_inches),
            inches_to_pixels(height_inches),
        ];

        CanvasSize {
            inches: [width_inches, height_inches],
            millimeters: [
                inches_to_millimeters(width_inches),
                inches_to_millimeters(height_inches),
            ],
            view_box: format!("0 0 {} {}", pixels[0], pixels[1]),
            pixels,
            width_to_height_ratio: width_inches / height_inches,
        }
    }

    pub fn width_px(&self) -> f64 {
        self.pixels[0] as f64
    }

    pub fn height_px(&self) -> f64 {
        self.pixels[1] as f64
    }

    pub fn pixel_size(&self) -> Size {
        Size::new(self.width_px(), self.height_px())
    }
}

/// A paper size in both orientations
#[derive(Clone, Debug, PartialEq)]
pub struct PaperSize {
    pub portrait: CanvasSize,
    pub landscape: CanvasSize,
}

pub fn page_size(width_inches: f64, height_inches: f64) -> PaperSize {
    PaperSize {
        portrait: CanvasSize::new(width_inches, height_inches),
        landscape: CanvasSize::new(height_inches, width_inches),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Supported paper stock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaperSizes {
    A4,
    A3,
    Bristol9x12,
    Bristol11x17,
}

impl PaperSizes {
    pub fn create(self) -> PaperSize {
        match self {
            PaperSizes::A4 => page_size(8.3, 11.7),
            PaperSizes::A3 => page_size(11.7, 16.5),
            PaperSizes::Bristol9x12 => page_size(9.0157, 12.0078),
            PaperSizes::Bristol11x17 => page_size(11.0, 17.0),
        }
    }

    pub fn canvas(self, orientation: Orientation) -> CanvasSize {
        let paper = self.create();
        match orientation {
            Orientation::Portrait => paper.portrait,
            Orientation::Landscape => paper.landscape,
        }
    }
}

/// Page margins in inches: `[left, top, right, bottom]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins(pub [f64; 4]);

impl Margins {
    pub fn uniform(inches: f64) -> Self {
        Margins([inches; 4])
    }

    pub fn left(&self) -> f64 {
        self.0[0]
    }

    pub fn top(&self) -> f64 {
        self.0[1]
    }

    pub fn right(&self) -> f64 {
        self.0[2]
    }

    pub fn bottom(&self) -> f64 {
        self.0[3]
    }

    /// The drawing area left inside the page after margins
    pub fn drawing_canvas(&self, page: &CanvasSize) -> CanvasSize {
        CanvasSize::new(
            page.inches[0] - self.left() - self.right(),
            page.inches[1] - self.top() - self.bottom(),
        )
    }

    /// Pixel offset of the drawing area's top-left corner on the page
    pub fn offset_px(&self) -> DVec2 {
        dvec2(
            inches_to_pixels(self.left()) as f64,
            inches_to_pixels(self.top()) as f64,
        )
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::uniform(1.0)
    }
}
