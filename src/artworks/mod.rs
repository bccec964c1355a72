//! Artwork pipelines and the render entry point.
//!
//! An artwork declares its configuration schema, how it distills a source
//! raster into per-cell statistics (the setup step, cacheable by the host
//! keyed on image source + detail level), and how it renders resolved
//! values into document layers. `render_artwork` wires one pass together:
//! page geometry, margins, seeded randomness, the artwork itself, and the
//! optional attribution layer.
//!
//! Identical `(seed, values, pixel data)` produce byte-identical output;
//! whether the setup came from a cache or was computed fresh is
//! indistinguishable to the render.

pub mod delaunay_hatch;
pub mod grid_hatch;

pub use delaunay_hatch::DelaunayHatch;
pub use grid_hatch::GridHatch;

use crate::canvas::RenderContext;
use crate::config::{Config, ImageSource, Values};
use crate::emit::{BlendMode, Document, Primitive};
use crate::errors::{ConfigError, RenderError};
use crate::log;
use crate::page::{inches_to_pixels, Margins, Orientation, PaperSizes};
use crate::pens::{Pen, BLACK};
use crate::raster::RasterAggregator;

/// Per-cell statistics distilled from one source image at one detail
/// level. Produced by an artwork's setup step; the host may cache it
/// keyed on `(source, detail)` and hand it back on later renders.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageStats {
    pub source: String,
    pub detail: f64,
    /// Host-side generation counter; a superseded setup request is
    /// discarded by comparing generations instead of racing
    pub generation: u64,
    pub width: usize,
    pub height: usize,
    pub luminance: Vec<f64>,
    pub hue: Vec<f64>,
    pub saturation: Vec<f64>,
}

impl ImageStats {
    /// Whether this cached result still matches the requested values
    pub fn matches(&self, source: &str, detail: f64) -> bool {
        self.source == source && self.detail == detail
    }
}

/// One generative artwork: a configuration schema, an image-analysis
/// setup step, and a render pass
pub trait Artwork {
    fn name(&self) -> &'static str;

    /// The validated configuration schema
    fn config(&self) -> Result<Config, ConfigError>;

    /// Whether a previously computed setup can be reused for these values
    fn setup_is_current(
        &self,
        values: &Values,
        prior: Option<&ImageStats>,
    ) -> Result<bool, RenderError> {
        let source = values.text("image")?;
        let detail = values.number("detail")?;
        Ok(prior.is_some_and(|p| p.matches(source, detail)))
    }

    /// Distill the decoded raster into per-cell statistics
    fn setup(
        &self,
        values: &Values,
        raster: &RasterAggregator,
        generation: u64,
    ) -> Result<ImageStats, RenderError>;

    /// Render resolved values (and setup statistics) into document layers
    fn render(
        &self,
        values: &Values,
        setup: Option<&ImageStats>,
        doc: &mut Document,
        ctx: &mut RenderContext,
    ) -> Result<(), RenderError>;
}

/// The stock predefined image sources offered by image properties
pub fn default_predefined_images() -> Vec<ImageSource> {
    vec![
        ImageSource::new("mountains", "/images/nz_mt.jpg"),
        ImageSource::new("roadster", "/images/mr1.jpg"),
        ImageSource::new("coupe", "/images/mr2.jpg"),
    ]
}

/// Everything a render pass needs besides the artwork's own values
#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub size: PaperSizes,
    pub orientation: Orientation,
    pub margins: Margins,
    pub seed: String,
    /// Attribution template; `[SEED]` and `[DATE]` tokens are substituted
    pub attribution: Option<String>,
    /// Date stamped into the attribution; supplied by the host so output
    /// stays reproducible
    pub date: Option<String>,
    /// How drawing layers composite
    pub blend_mode: BlendMode,
    /// Draw a frame around the drawing area
    pub container_stroke: Option<(Pen, f64)>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            size: PaperSizes::Bristol9x12,
            orientation: Orientation::Landscape,
            margins: Margins::uniform(1.0),
            seed: String::new(),
            attribution: None,
            date: None,
            blend_mode: BlendMode::Multiply,
            container_stroke: None,
        }
    }
}

/// Run one full render pass and return the accumulated document
pub fn render_artwork(
    artwork: &dyn Artwork,
    options: &RenderOptions,
    values: &Values,
    setup: Option<&ImageStats>,
) -> Result<Document, RenderError> {
    let page = options.size.canvas(options.orientation);
    let canvas = options.margins.drawing_canvas(&page);

    log::debug!(
        artwork = artwork.name(),
        canvas_w = canvas.pixels[0],
        canvas_h = canvas.pixels[1],
        "starting render pass"
    );

    let mut ctx = RenderContext::new(page, canvas, &options.seed);
    let mut doc = Document::with_offset(options.margins.offset_px());
    doc.set_blend_mode(options.blend_mode);

    artwork.render(values, setup, &mut doc, &mut ctx)?;

    if let Some(template) = &options.attribution {
        draw_attribution(&mut doc, template, options, &ctx);
    }

    if let Some((pen, stroke_width)) = options.container_stroke {
        let overlay = doc.page_layer("overlay");
        doc.plot_with_width(
            overlay,
            Primitive::Rect {
                x: inches_to_pixels(options.margins.left()) as f64,
                y: inches_to_pixels(options.margins.top()) as f64,
                w: ctx.canvas.width_px(),
                h: ctx.canvas.height_px(),
            },
            pen,
            stroke_width,
        );
    }

    Ok(doc)
}

/// Run one full render pass and serialize straight to SVG
pub fn render_artwork_svg(
    artwork: &dyn Artwork,
    options: &RenderOptions,
    values: &Values,
    setup: Option<&ImageStats>,
) -> Result<String, RenderError> {
    let page = options.size.canvas(options.orientation);
    let doc = render_artwork(artwork, options, values, setup)?;
    Ok(doc.serialize(&page))
}

fn draw_attribution(
    doc: &mut Document,
    template: &str,
    options: &RenderOptions,
    ctx: &RenderContext,
) {
    let seed = if options.seed.is_empty() {
        "Unknown"
    } else {
        options.seed.as_str()
    };
    let date = options.date.as_deref().unwrap_or("unknown");
    let content = template.replace("[SEED]", seed).replace("[DATE]", date);

    let left = inches_to_pixels(options.margins.left()) as f64;
    let top = inches_to_pixels(options.margins.top()) as f64;
    let bottom = inches_to_pixels(options.margins.bottom()) as f64;

    let layer = doc.page_layer("attribution");
    doc.plot(
        layer,
        Primitive::Text {
            x: left + ctx.canvas.width_px() / 2.0,
            y: bottom / 2.0 + ctx.canvas.height_px() + top + 5.0,
            content,
            font_size_px: 10.0,
        },
        BLACK,
    );
}
