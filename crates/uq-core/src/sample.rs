//! Samples of points sharing a dimension

use crate::{Error, PersistentId, Point, Result};

/// Component labels of a sample or a function
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Description(Vec<String>);

impl Description {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    /// `prefix0, prefix1, ...` with `dimension` entries
    pub fn with_prefix(prefix: &str, dimension: usize) -> Self {
        Self((0..dimension).map(|i| format!("{prefix}{i}")).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

/// Row-major collection of points of a common dimension
#[derive(Debug, Clone)]
pub struct Sample {
    id: PersistentId,
    dimension: usize,
    data: Vec<f64>,
    description: Description,
}

impl Sample {
    /// Empty sample of the given dimension
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            id: PersistentId::new(),
            dimension,
            data: Vec::new(),
            description: Description::with_prefix("X", dimension),
        }
    }

    /// `size` rows filled with `value`
    pub fn filled(size: usize, dimension: usize, value: f64) -> Self {
        Self {
            data: vec![value; size * dimension],
            ..Self::with_dimension(dimension)
        }
    }

    /// Build a sample from flat row-major data
    pub fn from_flat(dimension: usize, data: Vec<f64>) -> Result<Self> {
        if dimension == 0 && !data.is_empty() {
            return Err(Error::InvalidArgument(
                "cannot store values in a sample of dimension 0".to_string(),
            ));
        }
        if dimension > 0 && data.len() % dimension != 0 {
            return Err(Error::dimension_mismatch(
                dimension,
                data.len() % dimension,
                "sample flat data remainder",
            ));
        }
        Ok(Self {
            data,
            ..Self::with_dimension(dimension)
        })
    }

    pub fn id(&self) -> crate::Id {
        self.id.get()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a row
    pub fn add(&mut self, point: &[f64]) -> Result<()> {
        if point.len() != self.dimension {
            return Err(Error::dimension_mismatch(
                self.dimension,
                point.len(),
                "sample row",
            ));
        }
        self.data.extend_from_slice(point);
        Ok(())
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.len() {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.row(index).map(Point::from)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0, and a 0-dimensional sample has no rows
        self.data.chunks_exact(self.dimension.max(1))
    }

    /// Flat row-major storage
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn set_description(&mut self, description: Description) -> Result<()> {
        if description.len() != self.dimension {
            return Err(Error::dimension_mismatch(
                self.dimension,
                description.len(),
                "sample description",
            ));
        }
        self.description = description;
        Ok(())
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension
            && self.data == other.data
            && self.description == other.description
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self::with_dimension(0)
    }
}
