//! Deterministic pen-plotter line art.
//!
//! `hachure` turns a seed, a page geometry, and per-artwork parameters
//! into layered vector line art, optionally steered by per-cell
//! statistics of a source raster (luminance, hue, saturation). Output is
//! stroke-only SVG sized in physical millimeters, one layer per pen, in
//! the Inkscape layer convention plotter toolchains understand.
//!
//! The same `(seed, values, pixel data)` always reproduce byte-identical
//! output: randomness is seeded, rendering is single-threaded and
//! synchronous, and the only asynchronous step (decoding the source
//! image) happens host-side before a pass starts.
//!
//! # Example
//!
//! ```no_run
//! use hachure::{render, DelaunayHatch, RenderOptions, Artwork, RasterAggregator};
//!
//! # fn run(pixels: Vec<u8>) -> Result<(), miette::Report> {
//! let artwork = DelaunayHatch;
//! let values = artwork.config()?.default_values();
//!
//! // pixels: decoded RGBA, row-major (host-side I/O)
//! let raster = RasterAggregator::new(pixels, 640, 480)?;
//! let setup = artwork.setup(&values, &raster, 0)?;
//!
//! let options = RenderOptions {
//!     seed: "napier".to_string(),
//!     attribution: Some("seed [SEED] plotted [DATE]".to_string()),
//!     ..RenderOptions::default()
//! };
//! let svg = render(&artwork, &options, &values, Some(&setup))?;
//! # Ok(())
//! # }
//! ```

pub mod artworks;
pub mod canvas;
pub mod color;
pub mod config;
pub mod delaunay;
pub mod emit;
pub mod errors;
pub mod hatch;
pub mod log;
pub mod page;
pub mod pens;
pub mod random;
pub mod raster;
pub mod types;

pub use artworks::{
    render_artwork, render_artwork_svg, Artwork, DelaunayHatch, GridHatch, ImageStats,
    RenderOptions,
};
pub use canvas::{RenderContext, SegmentGrid, SegmentStyle};
pub use config::{Config, Property, Value, Values};
pub use emit::{BlendMode, Document, PathData, Primitive};
pub use errors::{ConfigError, HatchError, RasterError, RenderError};
pub use page::{CanvasSize, Margins, Orientation, PaperSizes};
pub use pens::{MicronPigma, Pen};
pub use random::{RandomSource, Rounding};
pub use raster::{Operation, RasterAggregator, Statistic};
pub use types::{BBox, Circle, Polygon, Segment, Shape, Size};

/// Render an artwork to SVG.
///
/// Returns the serialized document on success, or an error with
/// diagnostics.
pub fn render(
    artwork: &dyn Artwork,
    options: &RenderOptions,
    values: &Values,
    setup: Option<&ImageStats>,
) -> Result<String, miette::Report> {
    render_artwork_svg(artwork, options, values, setup).map_err(miette::Report::new)
}
