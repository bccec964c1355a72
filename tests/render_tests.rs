//! End-to-end render passes over synthetic images.

use hachure::{
    render_artwork_svg, Artwork, DelaunayHatch, GridHatch, Margins, Orientation, PaperSizes,
    RasterAggregator, RenderError, RenderOptions, Value,
};

/// A horizontal gradient with a hue sweep: dark red on the left, bright
/// blue on the right. Enough structure to light up every pipeline stage.
fn gradient_image(width: usize, height: usize) -> RasterAggregator {
    let mut data = Vec::with_capacity(width * height * 4);
    for row in 0..height {
        for col in 0..width {
            let t = col as f64 / (width - 1) as f64;
            let r = (255.0 * (1.0 - t)) as u8;
            let g = (40.0 + 60.0 * (row as f64 / height as f64)) as u8;
            let b = (255.0 * t) as u8;
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }
    RasterAggregator::new(data, width, height).unwrap()
}

fn options(seed: &str) -> RenderOptions {
    RenderOptions {
        size: PaperSizes::A4,
        orientation: Orientation::Landscape,
        margins: Margins::uniform(1.0),
        seed: seed.to_string(),
        attribution: Some("seed [SEED] plotted [DATE]".to_string()),
        date: Some("2026-08-06".to_string()),
        ..RenderOptions::default()
    }
}

fn values_for(artwork: &dyn Artwork, detail: f64) -> hachure::Values {
    let mut values = artwork.config().unwrap().default_values();
    values.set("detail", Value::Number(detail));
    values
}

#[test]
fn delaunay_hatch_renders_deterministically() {
    let artwork = DelaunayHatch;
    let values = values_for(&artwork, 20.0);
    let raster = gradient_image(100, 80);
    let setup = artwork.setup(&values, &raster, 0).unwrap();

    let first = render_artwork_svg(&artwork, &options("plotter"), &values, Some(&setup)).unwrap();
    let second = render_artwork_svg(&artwork, &options("plotter"), &values, Some(&setup)).unwrap();
    assert_eq!(first, second);
    assert!(first.contains("<path d=\"M"));
}

#[test]
fn different_seeds_change_the_output() {
    let artwork = DelaunayHatch;
    let values = values_for(&artwork, 20.0);
    let raster = gradient_image(100, 80);
    let setup = artwork.setup(&values, &raster, 0).unwrap();

    let first = render_artwork_svg(&artwork, &options("seed-one"), &values, Some(&setup)).unwrap();
    let second = render_artwork_svg(&artwork, &options("seed-two"), &values, Some(&setup)).unwrap();
    assert_ne!(first, second);
}

#[test]
fn cached_setup_renders_identically_to_fresh() {
    let artwork = DelaunayHatch;
    let values = values_for(&artwork, 20.0);
    let raster = gradient_image(100, 80);

    let fresh = artwork.setup(&values, &raster, 0).unwrap();
    let cached = fresh.clone();
    assert!(artwork.setup_is_current(&values, Some(&cached)).unwrap());

    let a = render_artwork_svg(&artwork, &options("cache"), &values, Some(&fresh)).unwrap();
    let b = render_artwork_svg(&artwork, &options("cache"), &values, Some(&cached)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn grid_hatch_emits_pen_layers() {
    let artwork = GridHatch;
    let values = values_for(&artwork, 20.0);
    let raster = gradient_image(100, 80);
    let setup = artwork.setup(&values, &raster, 0).unwrap();

    let svg = render_artwork_svg(&artwork, &options("layers"), &values, Some(&setup)).unwrap();
    assert!(svg.contains("id=\"red\""));
    assert!(svg.contains("id=\"blue\""));
    assert!(svg.contains("id=\"other\""));
    assert!(svg.contains("inkscape:groupmode=\"layer\""));
    assert!(svg.contains("stroke-width=\"0.75px\""));
    assert!(svg.contains("fill=\"none\""));
    // physical sizing survives serialization
    assert!(svg.contains("mm\" height=\""));
}

#[test]
fn attribution_substitutes_seed_and_date() {
    let artwork = GridHatch;
    let values = values_for(&artwork, 20.0);
    let raster = gradient_image(100, 80);
    let setup = artwork.setup(&values, &raster, 0).unwrap();

    let svg = render_artwork_svg(&artwork, &options("my-seed"), &values, Some(&setup)).unwrap();
    assert!(svg.contains("seed my-seed plotted 2026-08-06"));
    assert!(svg.contains("id=\"attribution\""));
}

#[test]
fn stale_setup_aborts_with_grid_mismatch() {
    let artwork = GridHatch;
    let stale_values = values_for(&artwork, 20.0);
    let raster = gradient_image(100, 80);
    let setup = artwork.setup(&stale_values, &raster, 0).unwrap();

    // the host re-rendered at a different detail level without refreshing
    // the cached statistics
    let mut fresh_values = stale_values.clone();
    fresh_values.set("detail", Value::Number(24.0));
    assert!(!artwork
        .setup_is_current(&fresh_values, Some(&setup))
        .unwrap());

    let err =
        render_artwork_svg(&artwork, &options("stale"), &fresh_values, Some(&setup)).unwrap_err();
    assert!(matches!(err, RenderError::GridMismatch { .. }));
}

#[test]
fn missing_setup_is_an_error_not_a_blank_canvas() {
    let artwork = DelaunayHatch;
    let values = values_for(&artwork, 20.0);
    let err = render_artwork_svg(&artwork, &options("missing"), &values, None).unwrap_err();
    assert!(matches!(err, RenderError::MissingSetup));
}

#[test]
fn segmentation_and_aggregation_lengths_agree() {
    // the canvas grid and the raster statistic grid compute their aspect
    // counts independently; for the same region they must agree
    use hachure::{CanvasSize, Operation, RenderContext, SegmentStyle, Statistic};

    for (w, h) in [(100usize, 80usize), (80, 100), (64, 64), (97, 41)] {
        let raster = gradient_image(w, h);
        let ctx = RenderContext::new(
            CanvasSize::new(12.0, 9.0),
            CanvasSize::new(10.0, 7.0),
            "lengths",
        );
        for count in [5usize, 10, 16, 20] {
            let chunks =
                raster.aggregate_chunks_aspect_ratio_flat(count, Operation::Avg, Statistic::Luminance);
            let grid = ctx.segment_points_aspect_ratio_in(
                count,
                SegmentStyle::Center,
                w as f64,
                h as f64,
            );
            assert_eq!(
                grid.len(),
                chunks.len(),
                "counts diverged for {w}x{h} at detail {count}"
            );
        }
    }
}
