//! Geometric primitives shared across the crate.
//!
//! Points are `glam::DVec2` in drawing-canvas pixel space. Everything here
//! is a plain value type; arithmetic goes through free functions or the
//! operators `glam` provides, nothing is mutated in place.

use glam::{DVec2, dvec2};

/// 2D size in pixels
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Size { w, h }
    }

    /// Length of the longest side
    pub fn max_dimension(&self) -> f64 {
        self.w.max(self.h)
    }
}

/// Axis-aligned bounding box. Invariant: `max.x >= min.x`, `max.y >= min.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BBox {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        BBox { min, max }
    }

    /// Build from a top-left corner and a size
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        BBox {
            min: dvec2(x, y),
            max: dvec2(x + w, y + h),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn top_left(&self) -> DVec2 {
        self.min
    }

    pub fn bottom_right(&self) -> DVec2 {
        self.max
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn translate(&self, offset: DVec2) -> BBox {
        BBox {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corner-walk outline, closed
    pub fn to_polygon(&self) -> Polygon {
        Polygon::closed(vec![
            self.min,
            dvec2(self.max.x, self.min.y),
            self.max,
            dvec2(self.min.x, self.max.y),
        ])
    }
}

/// Directed line segment; direction matters for pen-travel stitching
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: DVec2,
    pub end: DVec2,
}

impl Segment {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Segment { start, end }
    }

    pub fn reversed(&self) -> Segment {
        Segment {
            start: self.end,
            end: self.start,
        }
    }

    pub fn translate(&self, offset: DVec2) -> Segment {
        Segment {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    pub fn rotate_about(&self, angle_rad: f64, center: DVec2) -> Segment {
        Segment {
            start: rotate_about(self.start, center, angle_rad),
            end: rotate_about(self.end, center, angle_rad),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }
}

/// Rotate `p` around `center` by `angle_rad` (counter-clockwise)
pub fn rotate_about(p: DVec2, center: DVec2, angle_rad: f64) -> DVec2 {
    let (sin, cos) = angle_rad.sin_cos();
    let d = p - center;
    center + dvec2(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Ordered vertex ring, stored closed (first point repeated last)
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    /// Build from a vertex list, appending the closing point if missing
    pub fn closed(mut points: Vec<DVec2>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        Polygon { vertices: points }
    }

    /// Closed vertex sequence (first point repeated last)
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Vertex ring without the closing duplicate
    pub fn ring(&self) -> &[DVec2] {
        if self.vertices.len() > 1 {
            &self.vertices[..self.vertices.len() - 1]
        } else {
            &self.vertices
        }
    }

    /// Number of distinct vertices (exact comparison)
    pub fn distinct_count(&self) -> usize {
        let mut distinct: Vec<DVec2> = Vec::new();
        for &v in self.ring() {
            if !distinct.contains(&v) {
                distinct.push(v);
            }
        }
        distinct.len()
    }

    /// A polygon with fewer than two distinct points cannot be hatched
    pub fn is_degenerate(&self) -> bool {
        self.distinct_count() <= 1
    }

    pub fn bbox(&self) -> BBox {
        let mut min = dvec2(f64::MAX, f64::MAX);
        let mut max = dvec2(f64::MIN, f64::MIN);
        for &v in self.ring() {
            min = min.min(v);
            max = max.max(v);
        }
        BBox { min, max }
    }

    /// Edge segments of the closed ring
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        self.vertices
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
    }

    pub fn translate(&self, offset: DVec2) -> Polygon {
        Polygon {
            vertices: self.vertices.iter().map(|&v| v + offset).collect(),
        }
    }
}

/// Circle by center and radius
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: DVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Circle { center, radius }
    }
}

/// Vertex count used when a circle is normalized to a polygon
const CIRCLE_STEPS: usize = 64;

/// Any shape the hatch engine accepts. Every variant normalizes to a
/// canonical closed polygon before the scanline algorithm runs.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Box(BBox),
    Circle(Circle),
    Polygon(Polygon),
}

impl Shape {
    pub fn to_polygon(&self) -> Polygon {
        match self {
            Shape::Box(b) => b.to_polygon(),
            Shape::Circle(c) => {
                let step = std::f64::consts::TAU / CIRCLE_STEPS as f64;
                let ring = (0..CIRCLE_STEPS)
                    .map(|i| {
                        let theta = step * i as f64;
                        c.center + dvec2(theta.cos(), theta.sin()) * c.radius
                    })
                    .collect();
                Polygon::closed(ring)
            }
            Shape::Polygon(p) => p.clone(),
        }
    }

    pub fn bbox(&self) -> BBox {
        match self {
            Shape::Box(b) => *b,
            Shape::Circle(c) => BBox {
                min: c.center - DVec2::splat(c.radius),
                max: c.center + DVec2::splat(c.radius),
            },
            Shape::Polygon(p) => p.bbox(),
        }
    }
}

impl From<BBox> for Shape {
    fn from(b: BBox) -> Shape {
        Shape::Box(b)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Shape {
        Shape::Circle(c)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Shape {
        Shape::Polygon(p)
    }
}

/// Linear map of `value` from `[in_min, in_max]` to `[out_min, out_max]`
pub fn linear_map(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (out_max - out_min) * ((value - in_min) / (in_max - in_min))
}
