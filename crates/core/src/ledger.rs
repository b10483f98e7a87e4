//! Append-only concentration history.
//!
//! One full-grid snapshot is recorded per completed timestep. Timesteps are
//! 1-based: `timestep t` is the state after the t-th step's updates, and the
//! pre-run state is not a recorded snapshot. Snapshots are never mutated
//! once written.

use crate::error::SimulationError;
use crate::field::ConcentrationField;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Recorded concentration of every cell at every completed timestep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationHistory {
    cell_count: usize,
    /// `snapshots[t - 1]` holds the field at the end of timestep `t`.
    snapshots: Vec<Vec<f64>>,
}

impl ConcentrationHistory {
    /// Create an empty history for a grid of `cell_count` cells.
    pub fn new(cell_count: usize) -> Self {
        Self {
            cell_count,
            snapshots: Vec::new(),
        }
    }

    /// Number of cells per snapshot.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Number of timesteps recorded so far.
    pub fn recorded_steps(&self) -> usize {
        self.snapshots.len()
    }

    /// Append the snapshot for `timestep`, which must be the next unrecorded
    /// timestep.
    pub(crate) fn record(&mut self, timestep: usize, field: &ConcentrationField) {
        debug_assert_eq!(timestep, self.snapshots.len() + 1, "history is append-only");
        debug_assert_eq!(field.cell_count(), self.cell_count);
        self.snapshots.push(field.values().to_vec());
    }

    /// Full-grid snapshot at `timestep`.
    ///
    /// # Errors
    /// `NotYetRecorded` if `timestep` is 0 or past the recorded horizon.
    pub fn snapshot(&self, timestep: usize) -> Result<&[f64], SimulationError> {
        if timestep == 0 || timestep > self.snapshots.len() {
            return Err(SimulationError::NotYetRecorded {
                requested: timestep,
                recorded: self.snapshots.len(),
            });
        }
        Ok(&self.snapshots[timestep - 1])
    }

    /// Concentration of `cell` at `timestep`.
    ///
    /// # Errors
    /// `NotYetRecorded` for an unrecorded timestep, `CellOutOfBounds` for a
    /// cell id outside the grid.
    pub fn query(&self, cell: usize, timestep: usize) -> Result<f64, SimulationError> {
        let snapshot = self.snapshot(timestep)?;
        if cell >= self.cell_count {
            return Err(SimulationError::CellOutOfBounds(cell));
        }
        Ok(snapshot[cell])
    }

    /// Sum of concentrations over `cells` at `timestep`. Duplicate ids are
    /// counted once: an inventory over a region must not double-count a
    /// cell.
    ///
    /// # Errors
    /// `NotYetRecorded` for an unrecorded timestep, `CellOutOfBounds` if any
    /// id is outside the grid.
    pub fn region_sum(&self, cells: &[usize], timestep: usize) -> Result<f64, SimulationError> {
        let snapshot = self.snapshot(timestep)?;
        let mut seen = FxHashSet::default();
        let mut total = 0.0;
        for &cell in cells {
            if cell >= self.cell_count {
                return Err(SimulationError::CellOutOfBounds(cell));
            }
            if seen.insert(cell) {
                total += snapshot[cell];
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_with(values: &[f64]) -> ConcentrationField {
        let mut field = ConcentrationField::new(values.len(), 0.0);
        for (id, &v) in values.iter().enumerate() {
            field.set(id, v);
        }
        field
    }

    #[test]
    fn test_record_and_query() {
        let mut history = ConcentrationHistory::new(3);
        history.record(1, &field_with(&[1.0, 2.0, 3.0]));
        history.record(2, &field_with(&[4.0, 5.0, 6.0]));

        assert_eq!(history.recorded_steps(), 2);
        assert_eq!(history.query(0, 1), Ok(1.0));
        assert_eq!(history.query(2, 2), Ok(6.0));
    }

    #[test]
    fn test_snapshots_are_immutable_copies() {
        let mut history = ConcentrationHistory::new(2);
        let mut field = field_with(&[1.0, 1.0]);
        history.record(1, &field);

        // Later mutation of the live field does not reach the ledger.
        field.set(0, 9.0);
        assert_eq!(history.query(0, 1), Ok(1.0));
    }

    #[test]
    fn test_unrecorded_timestep_rejected() {
        let mut history = ConcentrationHistory::new(2);
        assert_eq!(
            history.query(0, 1),
            Err(SimulationError::NotYetRecorded {
                requested: 1,
                recorded: 0
            })
        );

        history.record(1, &field_with(&[1.0, 2.0]));
        assert!(history.query(0, 1).is_ok());
        assert_eq!(
            history.query(0, 2),
            Err(SimulationError::NotYetRecorded {
                requested: 2,
                recorded: 1
            })
        );
        // The pre-run state is not a recorded snapshot.
        assert!(matches!(
            history.query(0, 0),
            Err(SimulationError::NotYetRecorded { .. })
        ));
    }

    #[test]
    fn test_out_of_range_cell_rejected() {
        let mut history = ConcentrationHistory::new(2);
        history.record(1, &field_with(&[1.0, 2.0]));
        assert_eq!(
            history.query(2, 1),
            Err(SimulationError::CellOutOfBounds(2))
        );
        assert_eq!(
            history.region_sum(&[0, 7], 1),
            Err(SimulationError::CellOutOfBounds(7))
        );
    }

    #[test]
    fn test_region_sum_deduplicates() {
        let mut history = ConcentrationHistory::new(4);
        history.record(1, &field_with(&[1.0, 2.0, 4.0, 8.0]));

        assert_eq!(history.region_sum(&[0, 1, 2, 3], 1), Ok(15.0));
        assert_eq!(history.region_sum(&[1, 1, 1], 1), Ok(2.0));
        assert_eq!(history.region_sum(&[], 1), Ok(0.0));
    }
}
