//! Merged Delaunay regions hatched at seeded random angles.
//!
//! Grid cells carrying HSL statistics are merged where neighbors are
//! perceptually similar (CIEDE2000 under a threshold), the survivors are
//! triangulated, and every triangle below the lightness threshold is
//! filled with an angled hatch whose spacing tracks the merged lightness.
//! Visually uniform image regions come out as a few large triangles
//! instead of a dense mesh.

use glam::DVec2;

use crate::canvas::{RenderContext, SegmentStyle};
use crate::color::{channel_from_hue, Hsl, RgbChannel, HUE_RANGE_RGB};
use crate::config::{Config, Property, Values};
use crate::delaunay::{merge_similar, triangulate};
use crate::emit::{Document, PathData, Primitive};
use crate::errors::{ConfigError, RenderError};
use crate::hatch::{hatch, segments_to_points, translate_segments};
use crate::log;
use crate::raster::{Operation, RasterAggregator, Statistic};
use crate::types::{Shape, Size};

use super::{default_predefined_images, Artwork, ImageStats};

/// Threshold-merged Delaunay triangles, hatch-filled per merged HSL
pub struct DelaunayHatch;

struct CellStat {
    point: DVec2,
    hsl: Hsl,
}

fn median3(a: f64, b: f64, c: f64) -> f64 {
    let mut values = [a, b, c];
    values.sort_by(f64::total_cmp);
    values[1]
}

fn average3(a: f64, b: f64, c: f64) -> f64 {
    (a + b + c) / 3.0
}

impl Artwork for DelaunayHatch {
    fn name(&self) -> &'static str {
        "processing/delaunay-hatch"
    }

    fn config(&self) -> Result<Config, ConfigError> {
        Config::new(vec![
            (
                "image",
                Property::Image {
                    predefined: default_predefined_images(),
                    default: Some("/images/nz_mt.jpg".into()),
                },
            ),
            (
                "detail",
                Property::Number {
                    default: Some(70.0),
                    min: Some(20.0),
                    max: Some(100.0),
                    step: Some(2.0),
                },
            ),
            (
                "diff_threshold",
                Property::Number {
                    default: Some(1.3),
                    min: Some(0.1),
                    max: Some(10.0),
                    step: Some(0.05),
                },
            ),
            (
                "max_merge",
                Property::Number {
                    default: Some(18.0),
                    min: Some(1.0),
                    max: Some(100.0),
                    step: Some(1.0),
                },
            ),
            (
                "high_threshold",
                Property::Number {
                    default: Some(0.85),
                    min: Some(0.1),
                    max: Some(1.0),
                    step: Some(0.05),
                },
            ),
        ])
    }

    fn setup(
        &self,
        values: &Values,
        raster: &RasterAggregator,
        generation: u64,
    ) -> Result<ImageStats, RenderError> {
        let detail = values.number("detail")?;
        let count = detail as usize;
        Ok(ImageStats {
            source: values.text("image")?.to_string(),
            detail,
            generation,
            width: raster.width(),
            height: raster.height(),
            luminance: raster.aggregate_chunks_aspect_ratio_flat(
                count,
                Operation::Median,
                Statistic::Luminance,
            ),
            hue: raster.aggregate_chunks_aspect_ratio_flat(count, Operation::Avg, Statistic::Hue),
            saturation: raster.aggregate_chunks_aspect_ratio_flat(
                count,
                Operation::Median,
                Statistic::Saturation,
            ),
        })
    }

    fn render(
        &self,
        values: &Values,
        setup: Option<&ImageStats>,
        doc: &mut Document,
        ctx: &mut RenderContext,
    ) -> Result<(), RenderError> {
        let setup = setup.ok_or(RenderError::MissingSetup)?;
        let detail = values.number("detail")? as usize;
        let diff_threshold = values.number("diff_threshold")?;
        let max_merge = values.number("max_merge")? as usize;
        let high_threshold = values.number("high_threshold")?;

        let red = doc.layer("red");
        let green = doc.layer("green");
        let blue = doc.layer("blue");
        let black = doc.layer("black");

        let fit = ctx.center_fit_rect(Size::new(setup.width as f64, setup.height as f64));
        let offset = fit.top_left();
        let size = fit.size();

        let grid = ctx.segment_points_aspect_ratio_in(
            detail,
            SegmentStyle::Center,
            size.w.round(),
            size.h.round(),
        );
        if grid.len() != setup.luminance.len() {
            return Err(RenderError::GridMismatch {
                cells: grid.len(),
                samples: setup.luminance.len(),
            });
        }

        let mut cells: Vec<Option<CellStat>> = grid
            .cells
            .iter()
            .enumerate()
            .map(|(i, &point)| {
                Some(CellStat {
                    point,
                    hsl: Hsl::new(setup.hue[i], setup.saturation[i], setup.luminance[i]),
                })
            })
            .collect();

        merge_similar(&mut cells, grid.horizontal, diff_threshold, max_merge, |c| {
            c.hsl
        });

        let survivors: Vec<CellStat> = cells.into_iter().flatten().collect();
        log::debug!(
            cells = grid.len(),
            survivors = survivors.len(),
            "merged similar grid cells"
        );

        let regions = triangulate(
            &survivors,
            |c| c.point,
            |a, b, c| {
                Hsl::new(
                    median3(a.hsl.h, b.hsl.h, c.hsl.h),
                    average3(a.hsl.s, b.hsl.s, c.hsl.s),
                    average3(a.hsl.l, b.hsl.l, c.hsl.l),
                )
            },
        );

        for region in regions {
            let merged = region.agg;
            // bright triangles stay white space
            if merged.l > high_threshold {
                continue;
            }

            let interval = 0.5 + merged.l * grid.cell.w;
            let angle = ctx.random.between(45.0, 200.0, None);
            let fill = hatch(&Shape::Polygon(region.polygon), interval, angle, true)?;
            let points = segments_to_points(&translate_segments(&fill, offset));

            let (layer, pen) = if merged.s < 0.15 || merged.l > 0.9 {
                (black, crate::pens::BLACK)
            } else {
                match channel_from_hue(merged.h, &HUE_RANGE_RGB) {
                    Some(RgbChannel::Red) => (red, crate::pens::MicronPigma::RED),
                    Some(RgbChannel::Green) => (green, crate::pens::MicronPigma::GREEN),
                    Some(RgbChannel::Blue) => (blue, crate::pens::MicronPigma::BLUE),
                    None => (black, crate::pens::BLACK),
                }
            };

            doc.plot(layer, Primitive::Path(PathData::polyline(&points)), pen);
        }

        Ok(())
    }
}
