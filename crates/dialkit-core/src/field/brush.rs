//! Circular brush over a [`FieldPair`].

use std::f64::consts::PI;

use super::FieldPair;

pub const DEFAULT_BRUSH_RADIUS: usize = 32;
pub const DEFAULT_BRUSH_STRENGTH: f64 = 0.05;

/// What one brush application does to the cells it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushMode {
    Add,
    Subtract,
    /// Blend toward the local box average.
    Smooth,
}

/// Stroke direction from `from` to `to`, remapped from `[-π, π]` into `[0, 1]`.
/// A zero-length stroke maps to 0.5.
pub fn direction_angle(from: (i64, i64), to: (i64, i64)) -> f32 {
    let dx = (to.0 - from.0) as f64;
    let dy = (to.1 - from.1) as f64;
    (0.5 * (dy.atan2(dx) / PI + 1.0)) as f32
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    radius: usize,
    strength: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_RADIUS, DEFAULT_BRUSH_STRENGTH)
    }
}

impl Brush {
    /// Radius is at least one cell, strength is never negative.
    pub fn new(radius: usize, strength: f64) -> Self {
        Self {
            radius: radius.max(1),
            strength: strength.max(0.0),
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn set_radius(&mut self, radius: usize) {
        self.radius = radius.max(1);
    }

    pub fn set_strength(&mut self, strength: f64) {
        self.strength = strength.max(0.0);
    }

    /// One wheel notch on the radius. Steps scale with the current size.
    pub fn scroll_radius(&mut self, up: bool) {
        let diff = (self.radius / 8).max(1);
        self.radius = if up {
            self.radius.saturating_add(diff)
        } else {
            self.radius.saturating_sub(diff).max(1)
        };
    }

    /// One wheel notch on the strength.
    pub fn scroll_strength(&mut self, up: bool, tick: f64) {
        let diff = if up { tick } else { -tick };
        self.strength = (self.strength + diff).max(0.0);
    }

    /// Linear falloff, 1 at the center and 0 on the rim.
    pub fn falloff(&self, dist: f64) -> f64 {
        (1.0 - dist / self.radius as f64).clamp(0.0, 1.0)
    }

    /// Offsets `(dx, dy, dist)` inside the disk, row by row.
    fn disk(&self) -> impl Iterator<Item = (i64, i64, f64)> {
        let r = self.radius as i64;
        let rf = self.radius as f64;
        (-r..=r).flat_map(move |dy| {
            (-r..=r).filter_map(move |dx| {
                let dist = ((dx * dx + dy * dy) as f64).sqrt();
                (dist <= rf).then_some((dx, dy, dist))
            })
        })
    }

    /// Apply once around cell `center`. `previous` is the cell of the last
    /// application in this stroke. Returns the number of cells visited.
    pub fn apply(
        &self,
        fields: &mut FieldPair,
        mode: BrushMode,
        center: (i64, i64),
        previous: (i64, i64),
        avg_radius: usize,
        smooth_angle: bool,
    ) -> usize {
        match mode {
            BrushMode::Add => self.paint(fields, center, previous, 1.0),
            BrushMode::Subtract => self.paint(fields, center, previous, -1.0),
            BrushMode::Smooth => self.smooth(fields, center, avg_radius, smooth_angle),
        }
    }

    fn paint(&self, fields: &mut FieldPair, center: (i64, i64), previous: (i64, i64), sign: f64) -> usize {
        let angle = direction_angle(previous, center);
        let amp = sign * self.strength;
        let (value, angles) = fields.split_mut();
        let mut visited = 0;
        for (dx, dy, dist) in self.disk() {
            let (x, y) = (center.0 + dx, center.1 + dy);
            let Some(v) = value.at_mut(x, y) else {
                continue;
            };
            let falloff = self.falloff(dist);
            *v = (f64::from(*v) + amp * falloff).clamp(0.0, 1.0) as f32;
            if let Some(a) = angles.at_mut(x, y) {
                let t = falloff as f32;
                *a = (1.0 - t) * *a + t * angle;
            }
            visited += 1;
        }
        visited
    }

    /// Averages are taken from the grid as it was before this application.
    fn smooth(&self, fields: &mut FieldPair, center: (i64, i64), avg_radius: usize, smooth_angle: bool) -> usize {
        let blends: Vec<(i64, i64, f32, Option<f32>, Option<f32>)> = self
            .disk()
            .filter_map(|(dx, dy, dist)| {
                let (x, y) = (center.0 + dx, center.1 + dy);
                fields.value().index(x, y)?;
                let avg = fields.value().box_average(x, y, avg_radius);
                let angle_avg = smooth_angle
                    .then(|| fields.angle().box_average(x, y, avg_radius))
                    .flatten();
                Some((x, y, self.falloff(dist) as f32, avg, angle_avg))
            })
            .collect();

        let (value, angles) = fields.split_mut();
        for &(x, y, t, avg, angle_avg) in &blends {
            if let (Some(v), Some(avg)) = (value.at_mut(x, y), avg) {
                *v = (1.0 - t) * *v + t * avg.clamp(0.0, 1.0);
            }
            if let (Some(a), Some(avg)) = (angles.at_mut(x, y), angle_avg) {
                *a = (1.0 - t) * *a + t * avg.clamp(0.0, 1.0);
            }
        }
        blends.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(fields: &FieldPair, x: i64, y: i64) -> f32 {
        fields.value().at(x, y).unwrap()
    }

    #[test]
    fn test_unit_radius_touches_center_only() {
        let mut fields = FieldPair::new(4, 4);
        let brush = Brush::new(1, 1.0);
        let visited = brush.apply(&mut fields, BrushMode::Add, (2, 2), (2, 2), 1, false);
        // Center plus the four axis neighbours are inside the disk.
        assert_eq!(visited, 5);
        assert!((value(&fields, 2, 2) - 1.0).abs() < 1e-6);
        // Neighbours sit on the rim: zero falloff.
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert_eq!(value(&fields, x, y), 0.0);
        }
        for (x, y) in [(1, 1), (3, 3), (1, 3), (3, 1)] {
            assert_eq!(value(&fields, x, y), 0.0);
        }
    }

    #[test]
    fn test_radius_two_raises_neighbours() {
        let mut fields = FieldPair::new(4, 4);
        Brush::new(2, 1.0).apply(&mut fields, BrushMode::Add, (2, 2), (2, 2), 1, false);
        for (x, y) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert!((value(&fields, x, y) - 0.5).abs() < 1e-6);
        }
        // (0, 0) is at distance 2.83: outside the disk.
        assert_eq!(value(&fields, 0, 0), 0.0);
    }

    #[test]
    fn test_values_stay_in_unit_range() {
        let mut fields = FieldPair::new(8, 8);
        let brush = Brush::new(3, 0.7);
        for _ in 0..4 {
            brush.apply(&mut fields, BrushMode::Add, (4, 4), (4, 4), 1, false);
        }
        assert!(fields.value().data().iter().all(|v| (0.0..=1.0).contains(v)));
        for _ in 0..4 {
            brush.apply(&mut fields, BrushMode::Subtract, (4, 4), (4, 4), 1, false);
        }
        assert!(fields.value().data().iter().all(|v| (0.0..1e-6).contains(v)));
    }

    #[test]
    fn test_cells_off_grid_skipped() {
        let mut fields = FieldPair::new(4, 4);
        let visited = Brush::new(1, 1.0).apply(&mut fields, BrushMode::Add, (0, 0), (0, 0), 1, false);
        assert_eq!(visited, 3);
        assert!((value(&fields, 0, 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_follows_stroke() {
        assert!((direction_angle((0, 0), (0, 0)) - 0.5).abs() < 1e-6);
        assert!((direction_angle((0, 0), (1, 0)) - 0.5).abs() < 1e-6);
        assert!((direction_angle((0, 0), (0, 1)) - 0.75).abs() < 1e-6);
        assert!((direction_angle((0, 0), (0, -1)) - 0.25).abs() < 1e-6);

        let mut fields = FieldPair::new(4, 4);
        Brush::new(1, 1.0).apply(&mut fields, BrushMode::Add, (2, 2), (2, 1), 1, false);
        assert!((fields.angle().at(2, 2).unwrap() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_blends_toward_average() {
        let mut fields = FieldPair::new(3, 3);
        fields.set_value_data(3, 3, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        Brush::new(2, 1.0).apply(&mut fields, BrushMode::Smooth, (1, 1), (1, 1), 1, false);
        // Center: falloff 1, average 1/9.
        assert!((value(&fields, 1, 1) - 1.0 / 9.0).abs() < 1e-6);
        // Edge neighbour: falloff 0.5 toward the 6-cell average 1/6.
        assert!((value(&fields, 0, 1) - 0.5 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_angle_layer_in_parallel() {
        let mut fields = FieldPair::new(3, 3);
        fields.set_value_data(3, 3, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        *fields.split_mut().1.at_mut(1, 1).unwrap() = 1.0;
        let before = fields.clone();

        Brush::new(2, 1.0).apply(&mut fields, BrushMode::Smooth, (1, 1), (1, 1), 1, true);
        // Same blend as the value layer.
        assert!((fields.angle().at(1, 1).unwrap() - 1.0 / 9.0).abs() < 1e-6);
        assert!((fields.angle().at(0, 1).unwrap() - 0.5 / 6.0).abs() < 1e-6);
        for i in 0..9 {
            assert!((fields.angle().data()[i] - fields.value().data()[i]).abs() < 1e-6);
        }

        let mut untouched = before;
        Brush::new(2, 1.0).apply(&mut untouched, BrushMode::Smooth, (1, 1), (1, 1), 1, false);
        assert_eq!(untouched.angle().at(1, 1), Some(1.0));
    }

    #[test]
    fn test_smooth_visits_disk_on_large_field() {
        let mut fields = FieldPair::new(512, 256);
        fields.set_value_data(512, 256, vec![1.0; 512 * 256]).unwrap();
        let visited = Brush::new(1, 1.0).apply(&mut fields, BrushMode::Smooth, (0, 0), (0, 0), 1, true);
        assert_eq!(visited, 3);
        assert!((value(&fields, 0, 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_wheel_adjustments() {
        let mut brush = Brush::default();
        brush.scroll_radius(true);
        assert_eq!(brush.radius(), 36);
        let mut small = Brush::new(3, 0.05);
        small.scroll_radius(false);
        small.scroll_radius(false);
        small.scroll_radius(false);
        assert_eq!(small.radius(), 1);

        small.scroll_strength(false, 0.01);
        assert!((small.strength() - 0.04).abs() < 1e-12);
        for _ in 0..10 {
            small.scroll_strength(false, 0.01);
        }
        assert_eq!(small.strength(), 0.0);
    }
}
