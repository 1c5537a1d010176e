//! Dense scalar grids edited by a circular brush.

mod brush;

pub use brush::{Brush, BrushMode, DEFAULT_BRUSH_RADIUS, DEFAULT_BRUSH_STRENGTH, direction_angle};

use crate::error::{ConstructionError, ConstructionResult};

/// Row-major `f32` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ScalarField {
    /// Zero-filled grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Grid over existing data. The length must be `width * height`.
    pub fn from_data(width: usize, height: usize, data: Vec<f32>) -> ConstructionResult<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(ConstructionError::FieldSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Flat index of a cell. Signed so brush offsets can go negative.
    pub fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn at(&self, x: i64, y: i64) -> Option<f32> {
        self.index(x, y).map(|i| self.data[i])
    }

    pub fn at_mut(&mut self, x: i64, y: i64) -> Option<&mut f32> {
        let i = self.index(x, y)?;
        self.data.get_mut(i)
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn clear(&mut self) {
        self.fill(0.0);
    }

    /// New size, contents zeroed.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data = vec![0.0; width * height];
    }

    /// Mean over the `(2n+1)²` box around a cell, skipping cells off the grid.
    pub fn box_average(&self, x: i64, y: i64, n: usize) -> Option<f32> {
        let n = n as i64;
        let mut sum = 0.0;
        let mut count = 0usize;
        for dy in -n..=n {
            for dx in -n..=n {
                if let Some(v) = self.at(x + dx, y + dy) {
                    sum += v;
                    count += 1;
                }
            }
        }
        (count > 0).then(|| sum / count as f32)
    }
}

/// Value and angle grids kept at the same size.
///
/// Angles are stored remapped from `[-π, π]` into `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPair {
    value: ScalarField,
    angle: ScalarField,
}

impl FieldPair {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            value: ScalarField::new(width, height),
            angle: ScalarField::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.value.width()
    }

    pub fn height(&self) -> usize {
        self.value.height()
    }

    pub fn value(&self) -> &ScalarField {
        &self.value
    }

    pub fn angle(&self) -> &ScalarField {
        &self.angle
    }

    pub(crate) fn split_mut(&mut self) -> (&mut ScalarField, &mut ScalarField) {
        (&mut self.value, &mut self.angle)
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.angle.clear();
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.value.resize(width, height);
        self.angle.resize(width, height);
    }

    /// Replace the value grid. The angle grid is resized and zeroed with it.
    pub fn set_value_data(&mut self, width: usize, height: usize, data: Vec<f32>) -> ConstructionResult<()> {
        let value = ScalarField::from_data(width, height, data)?;
        self.value = value;
        self.angle = ScalarField::new(width, height);
        Ok(())
    }
}
