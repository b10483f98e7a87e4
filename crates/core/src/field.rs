//! Live per-cell concentration storage.

use serde::{Deserialize, Serialize};

/// Concentration of the tracer in every cell of the grid, in amount per unit
/// volume, keyed by linear cell id.
///
/// The field is the single mutable array of a run: the boundary forcer
/// overwrites the fixed layers in place each timestep and the walker merges
/// its move deltas into the free cells. External consumers read past states
/// through the [`crate::ledger::ConcentrationHistory`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationField {
    values: Vec<f64>,
}

impl ConcentrationField {
    /// Create a field of `cell_count` cells, all at `initial` concentration.
    pub fn new(cell_count: usize, initial: f64) -> Self {
        Self {
            values: vec![initial; cell_count],
        }
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.values.len()
    }

    /// Concentration of the cell with linear id `id`.
    #[inline]
    pub fn get(&self, id: usize) -> f64 {
        self.values[id]
    }

    /// Per-cell concentrations in linear-id order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub(crate) fn set(&mut self, id: usize, value: f64) {
        self.values[id] = value;
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_initialization() {
        let field = ConcentrationField::new(125, 2.5);
        assert_eq!(field.cell_count(), 125);
        assert!(field.values().iter().all(|&v| v == 2.5));
    }

    #[test]
    fn test_set_and_get() {
        let mut field = ConcentrationField::new(27, 0.0);
        field.set(13, 4.0);
        assert_eq!(field.get(13), 4.0);
        assert_eq!(field.get(12), 0.0);
    }
}
