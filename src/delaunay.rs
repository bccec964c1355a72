//! Region merging and Delaunay triangulation.
//!
//! Grid cells carrying HSL statistics are walked row-major; visually
//! similar neighbors (CIEDE2000 below a threshold) absorb their
//! predecessor, bounded by a merge-streak cap. The surviving point cloud
//! is triangulated and each triangle aggregates its three source cells
//! into one statistic, so uniform regions end up as fewer, larger
//! triangles.

use glam::DVec2;

use crate::color::{ciede2000, Hsl};
use crate::types::Polygon;

/// Grid position of one flat-indexed cell, with edge/corner flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Element2d {
    pub index: usize,
    pub x: usize,
    pub y: usize,
    pub edge: bool,
    pub corner: bool,
}

/// Row-major walk over a flat grid of `len` cells and `width` columns
pub fn enumerate2d(len: usize, width: usize) -> impl Iterator<Item = Element2d> {
    let len = if width == 0 { 0 } else { len };
    let rows = if width == 0 { 0 } else { len.div_ceil(width) };
    (0..len).map(move |index| {
        let x = index % width;
        let y = index / width;
        let x_edge = x == 0 || x == width - 1;
        let y_edge = y == 0 || y == rows - 1;
        Element2d {
            index,
            x,
            y,
            edge: x_edge || y_edge,
            corner: x_edge && y_edge,
        }
    })
}

/// Absorb runs of visually similar interior cells.
///
/// Walks cells row-major comparing each interior cell to its
/// row-predecessor; when the CIEDE2000 difference stays under `threshold`
/// and the running streak is under `max_merge`, the predecessor is
/// removed (absorbed into the current cell) and the streak grows,
/// otherwise the streak resets. Edge cells never participate, which keeps
/// the outline of the grid intact.
pub fn merge_similar<T>(
    cells: &mut [Option<T>],
    width: usize,
    threshold: f64,
    max_merge: usize,
    hsl_of: impl Fn(&T) -> Hsl,
) {
    let len = cells.len();
    let mut prior: Option<(usize, Hsl, bool)> = None;
    let mut run = 0usize;

    for el in enumerate2d(len, width) {
        let current = cells[el.index].as_ref().map(&hsl_of);

        if let (Some(hsl), Some((prior_index, prior_hsl, prior_edge))) = (current, prior) {
            if !el.edge && !prior_edge {
                let diff = ciede2000(hsl, prior_hsl);
                if diff < threshold && run < max_merge {
                    cells[prior_index] = None;
                    run += 1;
                } else {
                    run = 0;
                }
            }
        }

        prior = current.map(|hsl| (el.index, hsl, el.edge));
    }
}

/// One Delaunay triangle: its closed outline, the indices of its three
/// source items, and their aggregated statistic
#[derive(Clone, Debug)]
pub struct TriangleRegion<A> {
    pub polygon: Polygon,
    pub indices: [usize; 3],
    pub agg: A,
}

/// Delaunay-triangulate `source` and aggregate each triangle's three
/// items into one value
pub fn triangulate<T, A>(
    source: &[T],
    point_of: impl Fn(&T) -> DVec2,
    aggregate: impl Fn(&T, &T, &T) -> A,
) -> Vec<TriangleRegion<A>> {
    if source.len() < 3 {
        return Vec::new();
    }

    let points: Vec<delaunator::Point> = source
        .iter()
        .map(|item| {
            let p = point_of(item);
            delaunator::Point { x: p.x, y: p.y }
        })
        .collect();

    let triangulation = delaunator::triangulate(&points);

    let mut result = Vec::with_capacity(triangulation.triangles.len() / 3);
    for triple in triangulation.triangles.chunks_exact(3) {
        let (i, j, k) = (triple[0], triple[1], triple[2]);
        let (a, b, c) = (&source[i], &source[j], &source[k]);

        result.push(TriangleRegion {
            polygon: Polygon::closed(vec![point_of(a), point_of(b), point_of(c)]),
            indices: [i, j, k],
            agg: aggregate(a, b, c),
        });
    }

    result
}
