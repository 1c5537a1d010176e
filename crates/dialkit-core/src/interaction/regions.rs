//! Cached hit rectangles of a control.

use kurbo::{Point, Rect};

/// Typed rectangles a control tests pointer positions against.
///
/// Regions are kept in priority order: when several contain a point, the one
/// inserted first wins.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegions<R> {
    bounds: Rect,
    regions: Vec<(R, Rect)>,
}

impl<R> Default for HitRegions<R> {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            regions: Vec::new(),
        }
    }
}

impl<R: Copy + PartialEq> HitRegions<R> {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            regions: Vec::new(),
        }
    }

    /// Whole-widget rectangle.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Drop every region and set new bounds. Call when the widget is resized.
    pub fn reset(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.regions.clear();
    }

    /// Add or replace a region. Replacing keeps the original priority.
    pub fn set(&mut self, region: R, rect: Rect) {
        match self.regions.iter_mut().find(|(r, _)| *r == region) {
            Some(entry) => entry.1 = rect,
            None => self.regions.push((region, rect)),
        }
    }

    pub fn remove(&mut self, region: R) {
        self.regions.retain(|(r, _)| *r != region);
    }

    pub fn rect(&self, region: R) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, rect)| *rect)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    /// Highest-priority region containing `point`.
    pub fn hit(&self, point: Point) -> Option<R> {
        self.regions
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(r, _)| *r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (R, Rect)> + '_ {
        self.regions.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Part {
        Handle,
        Bar,
    }

    #[test]
    fn test_priority_order() {
        let mut regions = HitRegions::new(Rect::new(0.0, 0.0, 100.0, 20.0));
        regions.set(Part::Handle, Rect::new(40.0, 0.0, 50.0, 20.0));
        regions.set(Part::Bar, Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(regions.hit(Point::new(45.0, 10.0)), Some(Part::Handle));
        assert_eq!(regions.hit(Point::new(10.0, 10.0)), Some(Part::Bar));
        assert_eq!(regions.hit(Point::new(10.0, 30.0)), None);
    }

    #[test]
    fn test_replace_keeps_priority() {
        let mut regions = HitRegions::new(Rect::new(0.0, 0.0, 100.0, 20.0));
        regions.set(Part::Handle, Rect::new(0.0, 0.0, 10.0, 20.0));
        regions.set(Part::Bar, Rect::new(0.0, 0.0, 100.0, 20.0));
        regions.set(Part::Handle, Rect::new(60.0, 0.0, 70.0, 20.0));
        assert_eq!(regions.hit(Point::new(65.0, 5.0)), Some(Part::Handle));
        assert_eq!(regions.iter().count(), 2);
    }

    #[test]
    fn test_reset_and_remove() {
        let mut regions = HitRegions::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        regions.set(Part::Bar, Rect::new(0.0, 0.0, 10.0, 10.0));
        regions.remove(Part::Bar);
        assert!(regions.rect(Part::Bar).is_none());
        regions.set(Part::Bar, Rect::new(0.0, 0.0, 10.0, 10.0));
        regions.reset(Rect::new(0.0, 0.0, 50.0, 50.0));
        assert!(regions.hit(Point::new(5.0, 5.0)).is_none());
        assert!(regions.contains(Point::new(40.0, 40.0)));
    }
}
