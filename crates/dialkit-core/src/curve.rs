//! Editable transfer curve `f: [0, 1] -> [0, 1]`.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// How the curve passes between control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    #[default]
    CatmullRom,
}

impl Interpolation {
    pub fn is_smooth(&self) -> bool {
        matches!(self, Self::CatmullRom)
    }
}

/// Control points sorted by x, first pinned at x = 0 and last at x = 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveModel {
    points: Vec<Point>,
    interpolation: Interpolation,
}

impl Default for CurveModel {
    fn default() -> Self {
        Self {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            interpolation: Interpolation::default(),
        }
    }
}

impl CurveModel {
    /// Identity curve through (0, 0) and (1, 1).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary points. Coordinates are clamped to the unit square,
    /// points are sorted, and the endpoints are pinned (added when missing).
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut points: Vec<Point> = points
            .into_iter()
            .filter(|p| !p.x.is_nan() && !p.y.is_nan())
            .map(clamp_unit)
            .collect();
        sort_by_x(&mut points);
        match points.len() {
            0 => return Self::default(),
            1 => {
                let y = points[0].y;
                points = vec![Point::new(0.0, y), Point::new(1.0, y)];
            }
            _ => {}
        }
        let last = points.len() - 1;
        points[0].x = 0.0;
        points[last].x = 1.0;
        Self {
            points,
            interpolation: Interpolation::default(),
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Back to the identity curve.
    pub fn reset(&mut self) {
        self.points = CurveModel::default().points;
    }

    /// Whether index `i` is one of the two pinned endpoints.
    pub fn is_endpoint(&self, i: usize) -> bool {
        i == 0 || i + 1 == self.points.len()
    }

    /// Insert a point and return its index after sorting.
    pub fn insert(&mut self, point: Point) -> usize {
        let point = clamp_unit(point);
        // At x = 0 or 1 the new point sorts inside the pinned ends.
        let x = point.x.clamp(0.0, 1.0);
        let index = self
            .points
            .partition_point(|p| p.x <= x)
            .clamp(1, self.points.len() - 1);
        self.points.insert(index, point);
        index
    }

    /// Remove an interior point. Endpoints are kept.
    pub fn remove(&mut self, index: usize) -> Option<Point> {
        if index >= self.points.len() || self.is_endpoint(index) {
            return None;
        }
        Some(self.points.remove(index))
    }

    /// Move point `index` to `target` and return the point's index after the
    /// sequence is re-sorted. Endpoints keep their x.
    pub fn move_point(&mut self, index: usize, target: Point) -> Option<usize> {
        if index >= self.points.len() {
            return None;
        }
        let mut target = clamp_unit(target);
        let last = self.points.len() - 1;
        if index == 0 {
            target.x = 0.0;
            self.points[0] = target;
            return Some(0);
        }
        if index == last {
            target.x = 1.0;
            self.points[last] = target;
            return Some(last);
        }

        self.points[index] = target;
        let interior = &mut self.points[1..last];
        sort_by_x(interior);
        // Re-locate the moved point by value, never by its old index.
        interior
            .iter()
            .position(|p| p.x == target.x && p.y == target.y)
            .map(|i| i + 1)
    }

    /// Index of the first point within `radius` of `position`, measured in the
    /// space `to_screen` maps into.
    pub fn find_near(
        &self,
        position: Point,
        radius: f64,
        to_screen: impl Fn(Point) -> Point,
    ) -> Option<usize> {
        self.points
            .iter()
            .position(|p| to_screen(*p).distance(position) < radius)
    }

    /// Curve value at `t`. Outside the covered x span the boundary y is returned.
    pub fn interpolate(&self, t: f64) -> f64 {
        match self.interpolation {
            Interpolation::Linear => self.interpolate_linear(t),
            Interpolation::CatmullRom => self.interpolate_catmull_rom(t),
        }
    }

    pub fn interpolate_linear(&self, t: f64) -> f64 {
        let Some(i) = self.segment(t) else {
            return self.boundary(t);
        };
        let (p0, p1) = (self.points[i], self.points[i + 1]);
        let span = p1.x - p0.x;
        if span <= 0.0 {
            return p1.y;
        }
        let u = (t - p0.x) / span;
        p0.y * (1.0 - u) + p1.y * u
    }

    pub fn interpolate_catmull_rom(&self, t: f64) -> f64 {
        let Some(i) = self.segment(t) else {
            return self.boundary(t);
        };
        let last = self.points.len() - 1;
        let p0 = self.points[i.saturating_sub(1)];
        let p1 = self.points[i];
        let p2 = self.points[i + 1];
        let p3 = self.points[(i + 2).min(last)];

        let span = p2.x - p1.x;
        let u = if span > 0.0 {
            ((t - p1.x) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let u2 = u * u;
        let u3 = u2 * u;
        let y = 0.5
            * (2.0 * p1.y
                + (-p0.y + p2.y) * u
                + (2.0 * p0.y - 5.0 * p1.y + 4.0 * p2.y - p3.y) * u2
                + (-p0.y + 3.0 * p1.y - 3.0 * p2.y + p3.y) * u3);
        y.clamp(0.0, 1.0)
    }

    /// `n` evenly spaced evaluations over `[0, 1]`.
    pub fn resample(&self, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.interpolate(0.0)],
            _ => (0..n)
                .map(|i| self.interpolate(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }

    /// Interval `[p_i, p_{i+1}]` strictly inside the x span containing `t`.
    fn segment(&self, t: f64) -> Option<usize> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if t.is_nan() || t <= first.x || t >= last.x {
            return None;
        }
        self.points
            .windows(2)
            .position(|w| t >= w[0].x && t <= w[1].x)
    }

    fn boundary(&self, t: f64) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => {
                if t >= last.x { last.y } else { first.y }
            }
            _ => 0.0,
        }
    }
}

fn clamp_unit(p: Point) -> Point {
    Point::new(p.x.clamp(0.0, 1.0), p.y.clamp(0.0, 1.0))
}

fn sort_by_x(points: &mut [Point]) {
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
}
