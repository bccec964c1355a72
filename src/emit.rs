//! Layered vector document and SVG serialization.
//!
//! A `Document` accumulates stroke-only primitives into named layers and
//! serializes once, after the synchronous render phase completes, into an
//! SVG sized in physical millimeters. Layers use the Inkscape grouping
//! convention so plotter toolchains can address them one pen at a time.
//! Everything is `stroke={pen}` / `fill=none`; the only exception is
//! text, which fills.

use glam::DVec2;

use crate::page::CanvasSize;
use crate::pens::Pen;

/// Stroke width applied when the caller does not pick one
pub const DEFAULT_STROKE_WIDTH: f64 = 0.75;

/// How drawing layers composite over each other. Multiply makes
/// overlapping pen strokes darken the way real ink does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    #[default]
    Multiply,
}

impl BlendMode {
    fn css(self) -> Option<&'static str> {
        match self {
            BlendMode::Normal => None,
            BlendMode::Multiply => Some("multiply"),
        }
    }
}

// ============================================================================
// Path data
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
enum PathCmd {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Close,
}

/// Fluent builder for SVG path data
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCmd>,
}

impl PathData {
    pub fn new() -> Self {
        PathData::default()
    }

    pub fn m(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCmd::MoveTo(x, y));
        self
    }

    pub fn l(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCmd::LineTo(x, y));
        self
    }

    pub fn z(mut self) -> Self {
        self.commands.push(PathCmd::Close);
        self
    }

    /// One open polyline through every point in order
    pub fn polyline(points: &[DVec2]) -> Self {
        let mut path = PathData::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path = path.m(first.x, first.y);
        }
        for p in iter {
            path = path.l(p.x, p.y);
        }
        path
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn to_attr(&self) -> String {
        let mut out = String::new();
        for cmd in &self.commands {
            match cmd {
                PathCmd::MoveTo(x, y) => {
                    out.push('M');
                    out.push_str(&fmt_num(*x));
                    out.push(',');
                    out.push_str(&fmt_num(*y));
                }
                PathCmd::LineTo(x, y) => {
                    out.push('L');
                    out.push_str(&fmt_num(*x));
                    out.push(',');
                    out.push_str(&fmt_num(*y));
                }
                PathCmd::Close => out.push('Z'),
            }
        }
        out
    }
}

// ============================================================================
// Primitives and layers
// ============================================================================

/// A single vector primitive
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Path(PathData),
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        font_size_px: f64,
    },
}

#[derive(Clone, Debug)]
struct PlottedNode {
    primitive: Primitive,
    pen: Pen,
    stroke_width: f64,
}

#[derive(Clone, Debug)]
struct Layer {
    id: String,
    name: String,
    index: usize,
    translate: Option<DVec2>,
    /// Drawing layers composite with the document blend mode; page
    /// chrome (attribution, overlay) does not
    blended: bool,
    nodes: Vec<PlottedNode>,
}

/// Stable handle to a layer inside one document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerId(usize);

/// Accumulates layered primitives for one render pass
#[derive(Clone, Debug, Default)]
pub struct Document {
    layers: Vec<Layer>,
    next_index: usize,
    draw_offset: Option<DVec2>,
    blend: BlendMode,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// A document whose drawing layers are translated by `offset`
    /// (the page margin, in pixels)
    pub fn with_offset(offset: DVec2) -> Self {
        Document {
            draw_offset: Some(offset),
            ..Document::default()
        }
    }

    /// Blend mode applied to drawing layers
    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.blend = blend;
    }

    /// Create (or recreate) a named drawing layer.
    ///
    /// If a layer with this id already exists it is destroyed and
    /// replaced empty, so a re-render into the same document never
    /// accumulates stale geometry. The slot keeps its position in the
    /// z-order; the layer index keeps counting up.
    pub fn layer(&mut self, name: &str) -> LayerId {
        self.make_layer(name, self.draw_offset, true)
    }

    /// Like `layer` but pinned to page coordinates (attribution,
    /// overlay chrome)
    pub fn page_layer(&mut self, name: &str) -> LayerId {
        self.make_layer(name, None, false)
    }

    fn make_layer(&mut self, name: &str, translate: Option<DVec2>, blended: bool) -> LayerId {
        let index = self.next_index;
        self.next_index += 1;

        let fresh = Layer {
            id: name.to_string(),
            name: name.to_string(),
            index,
            translate,
            blended,
            nodes: Vec::new(),
        };

        if let Some(slot) = self.layers.iter().position(|l| l.id == name) {
            self.layers[slot] = fresh;
            LayerId(slot)
        } else {
            self.layers.push(fresh);
            LayerId(self.layers.len() - 1)
        }
    }

    /// Append a primitive with the default stroke width
    pub fn plot(&mut self, layer: LayerId, primitive: Primitive, pen: Pen) {
        self.plot_with_width(layer, primitive, pen, DEFAULT_STROKE_WIDTH);
    }

    /// Append a primitive with an explicit stroke width
    pub fn plot_with_width(
        &mut self,
        layer: LayerId,
        primitive: Primitive,
        pen: Pen,
        stroke_width: f64,
    ) {
        self.layers[layer.0].nodes.push(PlottedNode {
            primitive,
            pen,
            stroke_width,
        });
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of primitives in one layer
    pub fn node_count(&self, layer: LayerId) -> usize {
        self.layers[layer.0].nodes.len()
    }

    /// Total number of primitives across all layers
    pub fn total_nodes(&self) -> usize {
        self.layers.iter().map(|l| l.nodes.len()).sum()
    }

    /// Serialize into an SVG document sized in millimeters from the page
    /// size, independent of any on-screen pixel scale
    pub fn serialize(&self, page: &CanvasSize) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
             xmlns:inkscape=\"http://www.inkscape.org/namespaces/inkscape\" \
             width=\"{}mm\" height=\"{}mm\" viewBox=\"{}\">\n",
            fmt_num(page.millimeters[0]),
            fmt_num(page.millimeters[1]),
            page.view_box,
        ));

        for layer in &self.layers {
            let transform = match layer.translate {
                Some(t) => format!(
                    " transform=\"translate({}, {})\"",
                    fmt_num(t.x),
                    fmt_num(t.y)
                ),
                None => String::new(),
            };
            let blend = match self.blend.css() {
                Some(mode) if layer.blended => {
                    format!(" style=\"mix-blend-mode:{mode}\"")
                }
                _ => String::new(),
            };
            out.push_str(&format!(
                "  <g id=\"{}\" inkscape:groupmode=\"layer\" inkscape:label=\"{}-{}\"{}{}>\n",
                escape_xml(&layer.id),
                layer.index,
                escape_xml(&layer.name),
                transform,
                blend,
            ));
            for node in &layer.nodes {
                out.push_str("    ");
                out.push_str(&serialize_node(node));
                out.push('\n');
            }
            out.push_str("  </g>\n");
        }

        out.push_str("</svg>\n");
        out
    }
}

fn serialize_node(node: &PlottedNode) -> String {
    let stroke = format!(
        "stroke=\"{}\" stroke-width=\"{}px\" fill=\"none\"",
        node.pen.color,
        fmt_num(node.stroke_width)
    );
    match &node.primitive {
        Primitive::Path(data) => {
            format!("<path d=\"{}\" {}/>", data.to_attr(), stroke)
        }
        Primitive::Circle { cx, cy, r } => format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {}/>",
            fmt_num(*cx),
            fmt_num(*cy),
            fmt_num(*r),
            stroke
        ),
        Primitive::Ellipse { cx, cy, rx, ry } => format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" {}/>",
            fmt_num(*cx),
            fmt_num(*cy),
            fmt_num(*rx),
            fmt_num(*ry),
            stroke
        ),
        Primitive::Rect { x, y, w, h } => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {}/>",
            fmt_num(*x),
            fmt_num(*y),
            fmt_num(*w),
            fmt_num(*h),
            stroke
        ),
        Primitive::Text {
            x,
            y,
            content,
            font_size_px,
        } => format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" text-anchor=\"middle\" \
             font-size=\"{}px\" font-family=\"sans-serif\">{}</text>",
            fmt_num(*x),
            fmt_num(*y),
            node.pen.color,
            fmt_num(*font_size_px),
            escape_xml(content)
        ),
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a number matching C's %g format (6 significant figures,
/// trailing zeros trimmed)
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    let s = s.trim_end_matches('0');
    let s = s.trim_end_matches('.');
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pens::{MicronPigma, BLACK};
    use glam::dvec2;

    #[test]
    fn fmt_num_trims_like_percent_g() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.75), "0.75");
        assert_eq!(fmt_num(123.456), "123.456");
        assert_eq!(fmt_num(1234.56789), "1234.57");
        assert_eq!(fmt_num(-2.5), "-2.5");
    }

    #[test]
    fn path_data_renders_commands() {
        let d = PathData::new().m(0.0, 1.0).l(2.5, 3.0).z();
        assert_eq!(d.to_attr(), "M0,1L2.5,3Z");
    }

    #[test]
    fn polyline_walks_all_points() {
        let d = PathData::polyline(&[dvec2(0.0, 0.0), dvec2(1.0, 1.0), dvec2(2.0, 0.0)]);
        assert_eq!(d.to_attr(), "M0,0L1,1L2,0");
    }

    #[test]
    fn layer_recreation_replaces_contents() {
        let mut doc = Document::new();
        let first = doc.layer("red");
        doc.plot(first, Primitive::Circle { cx: 1.0, cy: 1.0, r: 1.0 }, BLACK);
        assert_eq!(doc.node_count(first), 1);

        // recreating the layer empties it but keeps the handle slot valid
        let second = doc.layer("red");
        assert_eq!(first, second);
        assert_eq!(doc.node_count(second), 0);
        assert_eq!(doc.layer_count(), 1);
    }

    #[test]
    fn layer_indices_keep_counting() {
        let mut doc = Document::new();
        doc.layer("a");
        doc.layer("b");
        doc.layer("a");
        let svg = doc.serialize(&crate::page::CanvasSize::new(1.0, 1.0));
        // the recreated "a" carries index 2
        assert!(svg.contains("inkscape:label=\"2-a\""));
        assert!(svg.contains("inkscape:label=\"1-b\""));
    }

    #[test]
    fn stroke_contract_is_applied() {
        let mut doc = Document::new();
        let layer = doc.layer("draw");
        doc.plot(
            layer,
            Primitive::Path(PathData::new().m(0.0, 0.0).l(5.0, 5.0)),
            MicronPigma::RED,
        );
        let svg = doc.serialize(&crate::page::CanvasSize::new(1.0, 1.0));
        assert!(svg.contains("stroke=\"#d02d2e\""));
        assert!(svg.contains("stroke-width=\"0.75px\""));
        assert!(svg.contains("fill=\"none\""));
    }

    #[test]
    fn document_is_sized_in_millimeters() {
        let doc = Document::new();
        let svg = doc.serialize(&crate::page::CanvasSize::new(1.0, 2.0));
        assert!(svg.contains("width=\"25.4mm\""));
        assert!(svg.contains("height=\"50.8mm\""));
        assert!(svg.contains("viewBox=\"0 0 96 192\""));
        assert!(svg.contains("xmlns:inkscape"));
    }

    #[test]
    fn draw_layers_carry_the_margin_offset() {
        let mut doc = Document::with_offset(dvec2(96.0, 48.0));
        doc.layer("draw");
        doc.page_layer("attribution");
        let svg = doc.serialize(&crate::page::CanvasSize::new(3.0, 3.0));
        assert!(svg.contains("transform=\"translate(96, 48)\""));
        // the page layer has no transform
        let attribution_line = svg
            .lines()
            .find(|l| l.contains("id=\"attribution\""))
            .unwrap();
        assert!(!attribution_line.contains("transform"));
    }

    #[test]
    fn drawing_layers_blend_page_layers_do_not() {
        let mut doc = Document::new();
        doc.layer("draw");
        doc.page_layer("attribution");
        let svg = doc.serialize(&crate::page::CanvasSize::new(1.0, 1.0));
        let draw_line = svg.lines().find(|l| l.contains("id=\"draw\"")).unwrap();
        assert!(draw_line.contains("mix-blend-mode:multiply"));
        let attribution_line = svg
            .lines()
            .find(|l| l.contains("id=\"attribution\""))
            .unwrap();
        assert!(!attribution_line.contains("mix-blend-mode"));

        doc.set_blend_mode(BlendMode::Normal);
        let svg = doc.serialize(&crate::page::CanvasSize::new(1.0, 1.0));
        assert!(!svg.contains("mix-blend-mode"));
    }

    #[test]
    fn text_escapes_content() {
        let mut doc = Document::new();
        let layer = doc.page_layer("attribution");
        doc.plot(
            layer,
            Primitive::Text {
                x: 0.0,
                y: 0.0,
                content: "a < b & c".to_string(),
                font_size_px: 10.0,
            },
            BLACK,
        );
        let svg = doc.serialize(&crate::page::CanvasSize::new(1.0, 1.0));
        assert!(svg.contains("a &lt; b &amp; c"));
    }
}
