//! Macro-particle random-walk move engine.
//!
//! Each free cell's concentration is converted into a count of
//! macro-particles (one macro-particle stands in for `scaling_factor` real
//! molecules, since true molecule counts are computationally out of reach)
//! and every macro-particle draws one uniform choice over the 27 relative
//! moves. A move transfers exactly one quantum of concentration from the
//! source cell to the chosen neighbor; draw 13 ("stay") and moves whose
//! target falls off the grid are no-ops.
//!
//! The step has synchronous semantics: all draws are made against a
//! read-only snapshot of the field taken at the start of the step, with the
//! resulting transfers accumulated in a delta buffer that is merged back
//! only after every free cell has been processed. The outcome is therefore
//! independent of the sweep order within a step, and fully reproducible for
//! a fixed seed given the documented draw order (ascending cell id, then
//! draw index).

use crate::field::ConcentrationField;
use crate::grid::{ClassificationTable, GridIndex, Layer, DRAW_CHOICES, OFFSETS, STAY_DRAW};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Source of uniform move draws in `[0, 27)`.
///
/// Implemented for every [`rand::Rng`]; tests substitute scripted sequences
/// to force specific moves.
pub trait DrawSource {
    /// Next uniform draw in `[0, 27)`.
    fn next_draw(&mut self) -> usize;
}

impl<R: Rng> DrawSource for R {
    fn next_draw(&mut self) -> usize {
        self.random_range(0..DRAW_CHOICES)
    }
}

/// Counters for one walk sweep (or, accumulated, for a whole run).
///
/// Off-grid targets and underflow clamps are resolved locally and reported
/// here rather than surfaced as errors, so a started step always completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkMetrics {
    /// Macro-particles that drew a move this sweep.
    pub particles_walked: u64,
    /// Draws that selected the zero offset.
    pub stays: u64,
    /// Transfers applied to an in-bounds destination.
    pub transfers: u64,
    /// Moves rejected because the target fell outside the grid; the
    /// particle reflects and the source cell is left unchanged.
    pub rejected_moves: u64,
    /// Transfers skipped or merge results clamped because they would have
    /// driven a concentration negative.
    pub underflow_clamps: u64,
}

impl WalkMetrics {
    /// Fold another sweep's counters into this one.
    pub fn accumulate(&mut self, step: &WalkMetrics) {
        self.particles_walked += step.particles_walked;
        self.stays += step.stays;
        self.transfers += step.transfers;
        self.rejected_moves += step.rejected_moves;
        self.underflow_clamps += step.underflow_clamps;
    }
}

/// Converts concentrations to macro-particle counts and walks them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Walker {
    cell_volume: f64,
    scaling_factor: f64,
    quantum: f64,
}

impl Walker {
    /// Create a walker for cells of volume `cell_volume`, with one
    /// macro-particle representing `scaling_factor` real molecules.
    pub fn new(cell_volume: f64, scaling_factor: f64) -> Self {
        Self {
            cell_volume,
            scaling_factor,
            quantum: 1.0 / (scaling_factor * cell_volume),
        }
    }

    /// Concentration change caused by moving one macro-particle out of or
    /// into a cell: `1 / (scaling_factor · cell_volume)`.
    pub fn quantum(&self) -> f64 {
        self.quantum
    }

    /// Number of macro-particles represented by `concentration` in one cell.
    pub fn particle_count(&self, concentration: f64) -> u64 {
        if concentration <= 0.0 {
            return 0;
        }
        (concentration * self.cell_volume * self.scaling_factor).floor() as u64
    }

    /// Walk every free cell's macro-particles once and merge the resulting
    /// transfers into `field`.
    ///
    /// Free cells are swept in ascending id order, drawing once per
    /// macro-particle from `draws`. Transfers may land in shell or source
    /// cells; that tracer is visible for the remainder of the step and is
    /// overwritten by the next boundary-forcing pass.
    pub fn step<D: DrawSource>(
        &self,
        field: &mut ConcentrationField,
        table: &ClassificationTable,
        index: &GridIndex,
        draws: &mut D,
    ) -> WalkMetrics {
        debug_assert_eq!(field.cell_count(), table.cell_count());

        let snapshot: Vec<f64> = field.values().to_vec();
        let mut deltas = vec![0.0_f64; snapshot.len()];
        let mut metrics = WalkMetrics::default();

        for (id, &layer) in table.layers().iter().enumerate() {
            if layer != Layer::Free {
                continue;
            }

            let available = snapshot[id];
            let particles = self.particle_count(available);
            let mut outgoing = 0.0_f64;

            for _ in 0..particles {
                let draw = draws.next_draw();
                metrics.particles_walked += 1;

                if draw == STAY_DRAW {
                    metrics.stays += 1;
                    continue;
                }

                let dest = match index.neighbor(id, OFFSETS[draw]) {
                    Some(dest) => dest,
                    None => {
                        // Reflected at the boundary; source unchanged.
                        metrics.rejected_moves += 1;
                        continue;
                    }
                };

                if outgoing + self.quantum > available {
                    // Would overdraw the cell's start-of-step concentration.
                    metrics.underflow_clamps += 1;
                    continue;
                }

                outgoing += self.quantum;
                deltas[id] -= self.quantum;
                deltas[dest] += self.quantum;
                metrics.transfers += 1;
            }
        }

        for (id, (&before, &delta)) in snapshot.iter().zip(deltas.iter()).enumerate() {
            let merged = before + delta;
            if merged < 0.0 {
                metrics.underflow_clamps += 1;
                field.set(id, 0.0);
            } else {
                field.set(id, merged);
            }
        }

        if metrics.rejected_moves > 0 || metrics.underflow_clamps > 0 {
            debug!(
                "Walk sweep resolved {} boundary reflections and {} underflow clamps",
                metrics.rejected_moves, metrics.underflow_clamps
            );
        }

        metrics
    }
}
