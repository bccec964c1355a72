//! Per-cell 45-degree hatching driven by image luminance.
//!
//! The source image is fitted and centered on the drawing canvas, the
//! canvas is segmented into an aspect-ratio-correct grid of cell boxes,
//! and every cell darker than the threshold gets a diagonal hatch fill
//! whose spacing tracks the cell's median luminance. The dominant cell
//! hue picks the drawing pen.

use crate::canvas::RenderContext;
use crate::color::{channel_from_hue, RgbChannel, HUE_RANGE_RGB};
use crate::config::{Config, Property, Values};
use crate::emit::{Document, PathData, Primitive};
use crate::errors::{ConfigError, RenderError};
use crate::hatch::{flip_alternate, hatch45, segments_to_points, translate_segments};
use crate::log;
use crate::raster::{Operation, RasterAggregator, Statistic};
use crate::types::{linear_map, Size};

use super::{default_predefined_images, Artwork, ImageStats};

/// Hatched grid driven by per-cell luminance, pen per dominant hue
pub struct GridHatch;

impl Artwork for GridHatch {
    fn name(&self) -> &'static str {
        "processing/grid-hatch"
    }

    fn config(&self) -> Result<Config, ConfigError> {
        Config::new(vec![
            (
                "image",
                Property::Image {
                    predefined: default_predefined_images(),
                    default: Some("/images/mr1.jpg".into()),
                },
            ),
            (
                "detail",
                Property::Number {
                    default: Some(60.0),
                    min: Some(20.0),
                    max: Some(100.0),
                    step: Some(2.0),
                },
            ),
            (
                "strength",
                Property::NumberRange {
                    default: Some((0.25, 5.5)),
                    min: 0.05,
                    max: 20.0,
                    step: Some(0.05),
                },
            ),
            (
                "high_threshold",
                Property::Number {
                    default: Some(0.55),
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
        let (strength_min, strength_max) = values.range("strength")?;
        let high_threshold = values.number("high_threshold")?;

        let red = doc.layer("red");
        let green = doc.layer("green");
        let blue = doc.layer("blue");
        let other = doc.layer("other");

        let fit = ctx.center_fit_rect(Size::new(setup.width as f64, setup.height as f64));
        let offset = fit.top_left();
        let size = fit.size();

        let grid = ctx.segment_boxes_aspect_ratio_in(detail, size.w.round(), size.h.round());
        if grid.len() != setup.luminance.len() {
            return Err(RenderError::GridMismatch {
                cells: grid.len(),
                samples: setup.luminance.len(),
            });
        }

        log::debug!(
            horizontal = grid.horizontal,
            vertical = grid.vertical,
            "hatching luminance grid"
        );

        // hatch spacing range derived from the cell width: the darkest
        // cells get the tightest spacing
        let densest = grid.cell.w / strength_max;
        let sparsest = grid.cell.w / strength_min;

        for (i, cell) in grid.cells.iter().enumerate() {
            let l = setup.luminance[i];
            if l.is_nan() || l > high_threshold {
                continue;
            }

            let interval = linear_map(l, 0.0, 1.0, densest, sparsest).floor().max(1.0);
            let fill = hatch45(cell, interval, false)?;
            let fill = flip_alternate(&translate_segments(&fill, offset));
            let points = segments_to_points(&fill);

            let s = setup.saturation[i];
            let (layer, pen) = if s > 0.2 && l < 0.8 {
                match channel_from_hue(setup.hue[i], &HUE_RANGE_RGB) {
                    Some(RgbChannel::Red) => (red, crate::pens::MicronPigma::RED),
                    Some(RgbChannel::Green) => (green, crate::pens::MicronPigma::GREEN),
                    Some(RgbChannel::Blue) => (blue, crate::pens::MicronPigma::BLUE),
                    None => (other, crate::pens::BLACK),
                }
            } else {
                (other, crate::pens::BLACK)
            };

            doc.plot(layer, Primitive::Path(PathData::polyline(&points)), pen);
        }

        Ok(())
    }
}
