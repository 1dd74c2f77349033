use crate::error::CoreError;

/// Square matrix of normalized brightness values, one flat row-major buffer.
///
/// Row index = time-slice, column index = frequency bin. Values are expected
/// in [0.0, 1.0]. The grid cannot be mutated once built.
///
/// # Example
/// ```
/// use pw_core::grid::BrightnessGrid;
/// let grid = BrightnessGrid::from_fn(4, |row, col| if row == col { 1.0 } else { 0.0 });
/// assert_eq!(grid.resolution(), 4);
/// assert_eq!(grid.get(2, 2), 1.0);
/// assert_eq!(grid.row(1), &[0.0, 1.0, 0.0, 0.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BrightnessGrid {
    values: Vec<f32>,
    resolution: usize,
}

impl BrightnessGrid {
    /// Build a grid from a row-major buffer of `resolution²` values.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `values.len() != resolution²`.
    pub fn from_vec(resolution: usize, values: Vec<f32>) -> Result<Self, CoreError> {
        let expected = resolution * resolution;
        if values.len() != expected {
            return Err(CoreError::InvalidDimensions {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { values, resolution })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    #[must_use]
    pub fn from_fn(resolution: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(resolution * resolution);
        for row in 0..resolution {
            for col in 0..resolution {
                values.push(f(row, col));
            }
        }
        Self { values, resolution }
    }

    /// Side length R of the grid.
    #[inline]
    #[must_use]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Brightness at (row, col).
    ///
    /// # Panics
    /// Panics if `row` or `col` is out of bounds.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(col < self.resolution, "column out of bounds");
        self.values[row * self.resolution + col]
    }

    /// One row of the grid, i.e. the spectrum of one time-slice.
    ///
    /// # Panics
    /// Panics if `row` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.resolution;
        &self.values[start..start + self.resolution]
    }

    /// Iterate over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact(0) panics; an empty grid has no rows anyway.
        self.values.chunks_exact(self.resolution.max(1))
    }

    /// Sum of each row, the normalization divisor of the synthesizer.
    ///
    /// # Example
    /// ```
    /// use pw_core::grid::BrightnessGrid;
    /// let grid = BrightnessGrid::from_fn(2, |row, _| row as f32 * 0.5);
    /// let energy = grid.row_energy();
    /// assert_eq!(energy.as_slice(), &[0.0, 1.0]);
    /// ```
    #[must_use]
    pub fn row_energy(&self) -> RowEnergy {
        RowEnergy {
            sums: self.rows().map(|row| row.iter().sum()).collect(),
        }
    }
}

/// Per-row brightness sums of a [`BrightnessGrid`].
///
/// Only obtainable through [`BrightnessGrid::row_energy`], so
/// `energy[r] == Σ grid[r][c]` always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct RowEnergy {
    sums: Vec<f32>,
}

impl RowEnergy {
    /// Energy of row `row`.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize) -> f32 {
        self.sums[row]
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sums.len()
    }

    /// `true` for an empty grid.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// All sums in row order.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.sums
    }

    /// Indices of rows whose energy is zero (fully black rows).
    #[must_use]
    pub fn silent_rows(&self) -> Vec<usize> {
        self.sums
            .iter()
            .enumerate()
            .filter(|&(_, &e)| e <= 0.0)
            .map(|(row, _)| row)
            .collect()
    }
}
