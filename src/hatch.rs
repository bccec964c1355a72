//! Hatch fill generation.
//!
//! Two families: `hatch45` walks perfectly spaced 45-degree diagonals
//! across a box using right-triangle edge wrapping (no trigonometry), and
//! `hatch` handles arbitrary shapes and angles by rotating a fan of scan
//! lines and intersecting them with the shape outline.

use glam::{DVec2, dvec2};

use crate::errors::HatchError;
use crate::log;
use crate::types::{BBox, Polygon, Segment, Shape};

/// Safety cap on generated segments; exceeding it halts generation and
/// returns the partial result.
pub const MAX_SEGMENTS: usize = 10_000;

/// General-angle hatching never spaces lines closer than one pixel
const MIN_INTERVAL: f64 = 1.0;

/// 45-degree diagonal hatch of an axis-aligned box.
///
/// Walks diagonal lines at a fixed `interval`. When a line's start
/// overshoots the right edge the overflow is added to its y instead,
/// which keeps the spacing exact without any rotation math. With
/// `reverse` the mirrored diagonal family is generated from the opposite
/// corner (for cross-hatching).
pub fn hatch45(bounds: &BBox, interval: f64, reverse: bool) -> Result<Vec<Segment>, HatchError> {
    if !interval.is_finite() || interval <= 0.0 {
        return Err(HatchError::InvalidInterval { value: interval });
    }
    if !bounds.is_finite() {
        return Err(HatchError::InvalidBounds {
            xmin: bounds.min.x,
            ymin: bounds.min.y,
            xmax: bounds.max.x,
            ymax: bounds.max.y,
        });
    }

    let (xmin, ymin) = (bounds.min.x, bounds.min.y);
    let (xmax, ymax) = (bounds.max.x, bounds.max.y);

    let mut result: Vec<Segment> = Vec::new();

    if !reverse {
        let mut sx = xmin + interval;
        let mut sy = ymin;
        let mut ex = xmin;
        let mut ey = ymin + interval;

        while result.len() < MAX_SEGMENTS {
            result.push(Segment::new(dvec2(sx, sy), dvec2(ex, ey)));

            sx += interval;
            if sx > xmax {
                // right-triangle wrap: the overhang past the right edge
                // becomes downward travel, so the spacing stays exact
                sy += sx - xmax;
                sx = xmax;
            }

            ey += interval;
            if ey > ymax {
                ex += ey - ymax;
                ey = ymax;
            }

            if ex >= sx {
                break;
            }
        }
    } else {
        let mut sx = xmax - interval;
        let mut sy = ymin;
        let mut ex = xmax;
        let mut ey = ymin + interval;

        while result.len() < MAX_SEGMENTS {
            result.push(Segment::new(dvec2(sx, sy), dvec2(ex, ey)));

            sx -= interval;
            if sx < xmin {
                sy += xmin - sx;
                sx = xmin;
            }

            ey += interval;
            if ey > ymax {
                ex -= ey - ymax;
                ey = ymax;
            }

            if ex <= sx {
                break;
            }
        }
    }

    if result.len() >= MAX_SEGMENTS {
        log::warn!(
            segments = result.len(),
            "hatch45 hit the segment cap, returning partial fill"
        );
    }

    Ok(result)
}

/// Both 45-degree diagonal families over a box
pub fn cross_hatch45(bounds: &BBox, interval: f64) -> Result<Vec<Segment>, HatchError> {
    let mut result = hatch45(bounds, interval, false)?;
    result.extend(hatch45(bounds, interval, true)?);
    Ok(result)
}

/// General-angle hatch of a box, circle, or polygon.
///
/// The shape is normalized to a polygon, covered with vertical scan lines
/// spaced by `interval` over a containing circle, and the lines are
/// rotated by `angle_deg` about the shape's center and clipped against
/// the outline. Consecutive intersection points pair into fill segments;
/// an odd leftover point (a tangent graze) is dropped. With `alternate`
/// every even-indexed segment is reversed so consecutive segments share
/// an endpoint region and the pen travels continuously.
pub fn hatch(
    shape: &Shape,
    interval: f64,
    angle_deg: f64,
    alternate: bool,
) -> Result<Vec<Segment>, HatchError> {
    if !interval.is_finite() {
        return Err(HatchError::InvalidInterval { value: interval });
    }

    let polygon = shape.to_polygon();
    if polygon.is_degenerate() {
        return Err(HatchError::DegenerateShape {
            distinct: polygon.distinct_count(),
        });
    }

    let bounds = polygon.bbox();
    if !bounds.is_finite() {
        return Err(HatchError::InvalidBounds {
            xmin: bounds.min.x,
            ymin: bounds.min.y,
            xmax: bounds.max.x,
            ymax: bounds.max.y,
        });
    }

    let interval = interval.max(MIN_INTERVAL);

    // A circle this large still covers the whole shape after any rotation
    let center = bounds.center();
    let radius = bounds.size().max_dimension() / (std::f64::consts::PI / 2.0);

    let mut scan: Vec<Segment> = Vec::new();
    let mut x = center.x - radius;
    while x < center.x + radius {
        scan.push(Segment::new(
            dvec2(x, center.y - radius),
            dvec2(x, center.y + radius),
        ));
        if scan.len() > MAX_SEGMENTS {
            break;
        }
        x += interval;
    }

    let angle = angle_deg.to_radians();
    let mut result: Vec<Segment> = Vec::new();

    for line in &scan {
        let rotated = line.rotate_about(angle, center);
        let hits = clip_points(&rotated, &polygon);

        let mut i = 0;
        while i + 1 < hits.len() {
            let (start, end) = (hits[i], hits[i + 1]);

            // An intersection passing exactly through a polygon corner can
            // come out flipped; force a consistent point order so the
            // hatching stays neat.
            if lex_less(start, end) {
                result.push(Segment::new(end, start));
            } else {
                result.push(Segment::new(start, end));
            }

            i += 2;
        }
    }

    if !alternate {
        return Ok(result);
    }

    Ok(flip_alternate(&result))
}

/// Two hatch passes at complementary angles; the second pass comes back
/// in reverse order so the pen can continue from where the first ended.
pub fn cross_hatch(
    shape: &Shape,
    interval: f64,
    angle_deg: f64,
    alternate: bool,
) -> Result<(Vec<Segment>, Vec<Segment>), HatchError> {
    let first = hatch(shape, interval, angle_deg, alternate)?;
    let mut second = hatch(
        shape,
        interval,
        (90.0 - angle_deg).max(angle_deg + 90.0),
        alternate,
    )?;
    second.reverse();
    Ok((first, second))
}

/// Translate every segment by `offset`
pub fn translate_segments(segments: &[Segment], offset: DVec2) -> Vec<Segment> {
    segments.iter().map(|s| s.translate(offset)).collect()
}

/// Reverse every even-indexed segment's direction
pub fn flip_alternate(segments: &[Segment]) -> Vec<Segment> {
    segments
        .iter()
        .enumerate()
        .map(|(i, s)| if i % 2 == 0 { s.reversed() } else { *s })
        .collect()
}

/// Flatten segments into their endpoint sequence
pub fn segments_to_points(segments: &[Segment]) -> Vec<DVec2> {
    let mut points = Vec::with_capacity(segments.len() * 2);
    for s in segments {
        points.push(s.start);
        points.push(s.end);
    }
    points
}

/// y-major lexicographic point order
fn lex_less(a: DVec2, b: DVec2) -> bool {
    a.y < b.y || (a.y == b.y && a.x < b.x)
}

const EPS: f64 = 1e-9;

/// Intersection point of two segments, or None (collinear overlap counts
/// as no intersection)
fn intersect_segments(a: &Segment, b: &Segment) -> Option<DVec2> {
    let r = a.end - a.start;
    let s = b.end - b.start;
    let denom = r.perp_dot(s);
    if denom.abs() < f64::EPSILON {
        return None;
    }

    let qp = b.start - a.start;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    if (-EPS..=1.0 + EPS).contains(&t) && (-EPS..=1.0 + EPS).contains(&u) {
        Some(a.start + r * t)
    } else {
        None
    }
}

/// Intersection points of a line with a polygon outline, sorted along the
/// line. Corner hits are collapsed so they count once.
fn clip_points(line: &Segment, polygon: &Polygon) -> Vec<DVec2> {
    let mut hits: Vec<DVec2> = polygon
        .edges()
        .filter_map(|edge| intersect_segments(line, &edge))
        .collect();

    let dir = line.end - line.start;
    hits.sort_by(|a, b| {
        let ta = (*a - line.start).dot(dir);
        let tb = (*b - line.start).dot(dir);
        ta.total_cmp(&tb)
    });
    hits.dedup_by(|a, b| (*a - *b).length() < EPS);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Circle;

    fn unit_box(side: f64) -> BBox {
        BBox::from_xywh(0.0, 0.0, side, side)
    }

    #[test]
    fn hatch45_first_segment_and_count() {
        let segments = hatch45(&unit_box(100.0), 10.0, false).unwrap();
        assert!(!segments.is_empty());
        assert_eq!(segments[0].start, dvec2(10.0, 0.0));
        assert_eq!(segments[0].end, dvec2(0.0, 10.0));
        // one segment per diagonal band across both triangle halves
        assert_eq!(segments.len(), 19);
    }

    #[test]
    fn hatch45_stays_inside_the_box() {
        let bounds = unit_box(100.0);
        for reverse in [false, true] {
            for segment in hatch45(&bounds, 7.0, reverse).unwrap() {
                assert!(bounds.contains(segment.start), "{segment:?}");
                assert!(bounds.contains(segment.end), "{segment:?}");
            }
        }
    }

    #[test]
    fn hatch45_rejects_zero_interval() {
        assert!(matches!(
            hatch45(&unit_box(10.0), 0.0, false),
            Err(HatchError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn hatch45_rejects_negative_interval() {
        assert!(matches!(
            hatch45(&unit_box(10.0), -2.0, false),
            Err(HatchError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn hatch45_rejects_nan_interval() {
        assert!(matches!(
            hatch45(&unit_box(10.0), f64::NAN, false),
            Err(HatchError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn hatch45_rejects_nan_bounds() {
        let bounds = BBox::new(dvec2(f64::NAN, 0.0), dvec2(10.0, 10.0));
        assert!(matches!(
            hatch45(&bounds, 1.0, false),
            Err(HatchError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn hatch45_caps_runaway_generation() {
        // far more bands than the cap allows; generation halts with a
        // partial fill instead of hanging
        let segments = hatch45(&unit_box(100.0), 0.001, false).unwrap();
        assert_eq!(segments.len(), MAX_SEGMENTS);
    }

    #[test]
    fn cross_hatch45_merges_both_families() {
        let forward = hatch45(&unit_box(60.0), 6.0, false).unwrap();
        let reverse = hatch45(&unit_box(60.0), 6.0, true).unwrap();
        let both = cross_hatch45(&unit_box(60.0), 6.0).unwrap();
        assert_eq!(both.len(), forward.len() + reverse.len());
    }

    #[test]
    fn hatch_covers_a_box() {
        let shape = Shape::Box(unit_box(100.0));
        let segments = hatch(&shape, 5.0, 45.0, true).unwrap();
        assert!(!segments.is_empty());
        for segment in &segments {
            // every clipped segment stays on or inside the outline
            assert!(segment.start.x >= -1e-6 && segment.start.x <= 100.0 + 1e-6);
            assert!(segment.start.y >= -1e-6 && segment.start.y <= 100.0 + 1e-6);
        }
    }

    #[test]
    fn hatch_density_grows_as_interval_shrinks() {
        let shape = Shape::Box(unit_box(100.0));
        let coarse = hatch(&shape, 20.0, 45.0, true).unwrap().len();
        let medium = hatch(&shape, 10.0, 45.0, true).unwrap().len();
        let fine = hatch(&shape, 5.0, 45.0, true).unwrap().len();
        assert!(coarse <= medium && medium <= fine);
        assert!(coarse < fine);
    }

    #[test]
    fn hatch_floors_tiny_intervals() {
        let shape = Shape::Box(unit_box(40.0));
        let at_one = hatch(&shape, 1.0, 45.0, true).unwrap().len();
        let below_one = hatch(&shape, 0.01, 45.0, true).unwrap().len();
        assert_eq!(at_one, below_one);
    }

    #[test]
    fn hatch_accepts_circles() {
        let shape = Shape::Circle(Circle::new(dvec2(50.0, 50.0), 30.0));
        let segments = hatch(&shape, 4.0, 60.0, true).unwrap();
        assert!(!segments.is_empty());
        for segment in &segments {
            assert!((segment.start - dvec2(50.0, 50.0)).length() <= 30.0 + 1e-3);
            assert!((segment.end - dvec2(50.0, 50.0)).length() <= 30.0 + 1e-3);
        }
    }

    #[test]
    fn hatch_rejects_degenerate_polygon() {
        let shape = Shape::Polygon(Polygon::closed(vec![dvec2(3.0, 3.0), dvec2(3.0, 3.0)]));
        assert!(matches!(
            hatch(&shape, 2.0, 45.0, true),
            Err(HatchError::DegenerateShape { .. })
        ));
    }

    #[test]
    fn hatch_handles_concave_outlines() {
        // an L-shape: some scan lines cross the outline four times
        let shape = Shape::Polygon(Polygon::closed(vec![
            dvec2(0.0, 0.0),
            dvec2(100.0, 0.0),
            dvec2(100.0, 40.0),
            dvec2(40.0, 40.0),
            dvec2(40.0, 100.0),
            dvec2(0.0, 100.0),
        ]));
        let segments = hatch(&shape, 3.0, 45.0, true).unwrap();
        assert!(!segments.is_empty());
    }

    #[test]
    fn hatch_tolerates_collinear_edges() {
        // redundant vertices sit on the outline; near-tangent scan lines
        // can graze them and leave an odd hit, which is dropped rather
        // than paired across the outline
        let shape = Shape::Polygon(Polygon::closed(vec![
            dvec2(0.0, 0.0),
            dvec2(50.0, 0.0),
            dvec2(100.0, 0.0),
            dvec2(100.0, 50.0),
            dvec2(100.0, 100.0),
            dvec2(50.0, 100.0),
            dvec2(0.0, 100.0),
            dvec2(0.0, 50.0),
        ]));
        let segments = hatch(&shape, 4.0, 45.0, true).unwrap();
        assert!(!segments.is_empty());
        for segment in &segments {
            // paired hits always produce a segment inside the outline
            let mid = (segment.start + segment.end) * 0.5;
            assert!(mid.x >= -1e-6 && mid.x <= 100.0 + 1e-6);
            assert!(mid.y >= -1e-6 && mid.y <= 100.0 + 1e-6);
        }
    }

    #[test]
    fn hatch_alternates_pen_direction() {
        let shape = Shape::Box(unit_box(50.0));
        let plain = hatch(&shape, 5.0, 45.0, false).unwrap();
        let stitched = hatch(&shape, 5.0, 45.0, true).unwrap();
        assert_eq!(plain.len(), stitched.len());
        for (i, (p, s)) in plain.iter().zip(stitched.iter()).enumerate() {
            if i % 2 == 0 {
                assert_eq!(s.start, p.end);
                assert_eq!(s.end, p.start);
            } else {
                assert_eq!(s, p);
            }
        }
    }

    #[test]
    fn cross_hatch_complementary_angles() {
        let shape = Shape::Box(unit_box(80.0));
        let (first, second) = cross_hatch(&shape, 8.0, 45.0, true).unwrap();
        // second pass runs at 135 degrees: same geometry mirrored
        assert!(!first.is_empty());
        assert!(!second.is_empty());
        let direct_second = hatch(&shape, 8.0, 135.0, true).unwrap();
        let mut reversed = direct_second.clone();
        reversed.reverse();
        assert_eq!(second, reversed);
    }

    #[test]
    fn translate_moves_every_endpoint() {
        let segments = vec![Segment::new(dvec2(0.0, 0.0), dvec2(1.0, 1.0))];
        let moved = translate_segments(&segments, dvec2(10.0, 20.0));
        assert_eq!(moved[0].start, dvec2(10.0, 20.0));
        assert_eq!(moved[0].end, dvec2(11.0, 21.0));
    }

    #[test]
    fn flip_alternate_reverses_even_indices() {
        let segments = vec![
            Segment::new(dvec2(0.0, 0.0), dvec2(1.0, 0.0)),
            Segment::new(dvec2(0.0, 1.0), dvec2(1.0, 1.0)),
            Segment::new(dvec2(0.0, 2.0), dvec2(1.0, 2.0)),
        ];
        let flipped = flip_alternate(&segments);
        assert_eq!(flipped[0], segments[0].reversed());
        assert_eq!(flipped[1], segments[1]);
        assert_eq!(flipped[2], segments[2].reversed());
    }

    #[test]
    fn segments_to_points_flattens_in_order() {
        let segments = vec![
            Segment::new(dvec2(0.0, 0.0), dvec2(1.0, 0.0)),
            Segment::new(dvec2(2.0, 0.0), dvec2(3.0, 0.0)),
        ];
        let points = segments_to_points(&segments);
        assert_eq!(
            points,
            vec![
                dvec2(0.0, 0.0),
                dvec2(1.0, 0.0),
                dvec2(2.0, 0.0),
                dvec2(3.0, 0.0)
            ]
        );
    }
}
