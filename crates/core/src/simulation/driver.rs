//! Simulation driver: owns the live field, the history, and the timeline.
//!
//! A run is a strict sequence of timesteps. Each `run_step` forces the fixed
//! layers, walks every free cell's macro-particles against a snapshot of the
//! field, and commits the result to the history. The driver is the only
//! component with lifecycle state; the field and history it owns are not
//! reachable mutably from outside.

use crate::boundary::force_fixed_layers;
use crate::error::SimulationError;
use crate::field::ConcentrationField;
use crate::grid::{ClassificationTable, GridIndex, Layer};
use crate::ledger::ConcentrationHistory;
use crate::simulation::config::SimulationConfig;
use crate::walker::{WalkMetrics, Walker};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Lifecycle state of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Validated and initialized, no timestep run yet.
    Configured,
    /// At least one timestep run, horizon not yet reached.
    Running,
    /// All configured timesteps recorded; no further steps permitted.
    Complete,
}

/// Stochastic diffusion run over a layered cubic medium.
pub struct Simulation {
    config: SimulationConfig,
    index: GridIndex,
    table: ClassificationTable,
    walker: Walker,
    field: ConcentrationField,
    history: ConcentrationHistory,
    rng: StdRng,
    completed_steps: usize,
    metrics: WalkMetrics,
}

impl Simulation {
    /// Validate `config` and set up a run: static layer classification,
    /// seeded random source, and a field at the configured initial
    /// concentration.
    ///
    /// # Errors
    /// `InvalidConfiguration` for non-physical or out-of-range parameters.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let index = GridIndex::new(config.divs);
        let table = ClassificationTable::new(&index);
        info!(
            "Configured {}³ diffusion grid: {} shell, {} source, {} free cells, {} timesteps",
            config.divs,
            table.shell_count(),
            table.source_count(),
            table.free_count(),
            config.total_timesteps
        );

        let walker = Walker::new(config.cell_volume(), config.scaling_factor);
        let field = ConcentrationField::new(index.cell_count(), config.initial_concentration);
        let history = ConcentrationHistory::new(index.cell_count());
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            index,
            table,
            walker,
            field,
            history,
            rng,
            completed_steps: 0,
            metrics: WalkMetrics::default(),
        })
    }

    /// Advance exactly one timestep: force boundaries, walk all free cells,
    /// record the snapshot. Returns the sweep's counters.
    ///
    /// # Errors
    /// `AlreadyComplete` if the configured horizon has been reached.
    pub fn run_step(&mut self) -> Result<WalkMetrics, SimulationError> {
        if self.completed_steps >= self.config.total_timesteps {
            return Err(SimulationError::AlreadyComplete {
                total_timesteps: self.config.total_timesteps,
            });
        }

        force_fixed_layers(
            &mut self.field,
            &self.table,
            self.config.shell_concentration,
            self.config.source_concentration,
        );
        let step = self
            .walker
            .step(&mut self.field, &self.table, &self.index, &mut self.rng);

        self.completed_steps += 1;
        self.history.record(self.completed_steps, &self.field);
        self.metrics.accumulate(&step);

        debug!(
            "Timestep {}: {} particles walked, {} transfers, {} stays, {} reflected, {} clamped",
            self.completed_steps,
            step.particles_walked,
            step.transfers,
            step.stays,
            step.rejected_moves,
            step.underflow_clamps
        );
        Ok(step)
    }

    /// Run every remaining timestep. A no-op on an already complete run.
    ///
    /// # Errors
    /// None in practice; the signature propagates `run_step` for callers
    /// that interleave manual stepping.
    pub fn run_to_completion(&mut self) -> Result<(), SimulationError> {
        while !self.is_complete() {
            self.run_step()?;
        }
        info!(
            "Run complete: {} timesteps, {} macro-particles walked, {} transfers applied",
            self.completed_steps, self.metrics.particles_walked, self.metrics.transfers
        );
        Ok(())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        if self.completed_steps == 0 {
            RunState::Configured
        } else if self.completed_steps < self.config.total_timesteps {
            RunState::Running
        } else {
            RunState::Complete
        }
    }

    /// Whether the configured horizon has been reached.
    pub fn is_complete(&self) -> bool {
        self.completed_steps >= self.config.total_timesteps
    }

    /// Number of timesteps completed and recorded so far.
    pub fn completed_steps(&self) -> usize {
        self.completed_steps
    }

    /// The validated configuration of this run.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Walk counters accumulated over the whole run.
    pub fn metrics(&self) -> &WalkMetrics {
        &self.metrics
    }

    /// Concentration of `cell` at recorded `timestep` (1-based).
    ///
    /// # Errors
    /// `NotYetRecorded` or `CellOutOfBounds`.
    pub fn query(&self, cell: usize, timestep: usize) -> Result<f64, SimulationError> {
        self.history.query(cell, timestep)
    }

    /// Summed concentration over `cells` at recorded `timestep`, duplicates
    /// counted once.
    ///
    /// # Errors
    /// `NotYetRecorded` or `CellOutOfBounds`.
    pub fn region_sum(&self, cells: &[usize], timestep: usize) -> Result<f64, SimulationError> {
        self.history.region_sum(cells, timestep)
    }

    /// Static layer of `cell`, for presentation consumers.
    ///
    /// # Errors
    /// `CellOutOfBounds` for a cell id outside the grid.
    pub fn classification(&self, cell: usize) -> Result<Layer, SimulationError> {
        if cell >= self.index.cell_count() {
            return Err(SimulationError::CellOutOfBounds(cell));
        }
        Ok(self.table.layer(cell))
    }

    /// Total tracer amount (concentration times cell volume) held by all
    /// cells of `layer` at recorded `timestep`. `layer_inventory(Free, t)`
    /// is the tracer mass that has penetrated past the source band.
    ///
    /// # Errors
    /// `NotYetRecorded` if `timestep` is not recorded.
    pub fn layer_inventory(&self, layer: Layer, timestep: usize) -> Result<f64, SimulationError> {
        let cells = self.table.cells_in(layer);
        let sum = self.history.region_sum(&cells, timestep)?;
        Ok(sum * self.config.cell_volume())
    }

    /// Recorded history of the run.
    pub fn history(&self) -> &ConcentrationHistory {
        &self.history
    }

    /// Static per-cell classification table.
    pub fn layers(&self) -> &ClassificationTable {
        &self.table
    }

    /// Grid index for coordinate arithmetic on query results.
    pub fn grid(&self) -> &GridIndex {
        &self.index
    }
}
