//! Run configuration and validation.

use crate::error::SimulationError;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Smallest grid resolution with a nonempty free interior: the shell and
/// source band each consume one cell per face.
pub const MIN_DIVS: usize = 5;

/// Reference scenario: a cube of side 5.0 split into 10 divisions (cell side
/// 0.5) with the source band held at the water-saturation placeholder value.
const REFERENCE_DIVS: usize = 10;
const REFERENCE_TIMESTEPS: usize = 100;
const REFERENCE_BLOCK_SIDE: f64 = 5.0;
const REFERENCE_SATURATION: f64 = 1451.7008;

/// Complete configuration of a simulation run.
///
/// All physical knobs are explicit here; the core has no other tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid resolution: the block is split into `divs³` cubic cells.
    pub divs: usize,
    /// Number of timesteps to run and record.
    pub total_timesteps: usize,
    /// Concentration the outer shell is pinned to every timestep.
    pub shell_concentration: f64,
    /// Concentration the source band is pinned to every timestep.
    pub source_concentration: f64,
    /// Starting concentration of every cell before the first timestep.
    pub initial_concentration: f64,
    /// Measured physical dimensions of the block along x, y, z.
    pub block_dimensions: Vector3<f64>,
    /// Number of real molecules represented by one macro-particle. The
    /// single knob trading statistical fidelity for runtime cost.
    pub scaling_factor: f64,
    /// Seed for the walker's random source; runs with equal configuration
    /// and seed are bit-identical.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            divs: REFERENCE_DIVS,
            total_timesteps: REFERENCE_TIMESTEPS,
            shell_concentration: 0.0,
            source_concentration: REFERENCE_SATURATION,
            initial_concentration: 0.0,
            block_dimensions: Vector3::new(
                REFERENCE_BLOCK_SIDE,
                REFERENCE_BLOCK_SIDE,
                REFERENCE_BLOCK_SIDE,
            ),
            scaling_factor: 1.0,
            seed: 0,
        }
    }
}

impl SimulationConfig {
    /// Physical dimensions of a single cell, `block_dimensions / divs`.
    pub fn cell_dimensions(&self) -> Vector3<f64> {
        self.block_dimensions / self.divs as f64
    }

    /// Volume of a single cell.
    pub fn cell_volume(&self) -> f64 {
        let cell = self.cell_dimensions();
        cell.x * cell.y * cell.z
    }

    /// Check every parameter for physical validity.
    ///
    /// # Errors
    /// `InvalidConfiguration` naming the offending parameter.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.divs < MIN_DIVS {
            return Err(SimulationError::InvalidConfiguration(format!(
                "divs must be at least {MIN_DIVS} for a nonempty interior, got {}",
                self.divs
            )));
        }
        if self.total_timesteps < 1 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "total_timesteps must be at least 1, got {}",
                self.total_timesteps
            )));
        }
        for (axis, length) in ["x", "y", "z"].iter().zip(self.block_dimensions.iter()) {
            if !length.is_finite() || *length <= 0.0 {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "block {axis} length must be positive and finite, got {length}"
                )));
            }
        }
        if !self.scaling_factor.is_finite() || self.scaling_factor <= 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "scaling_factor must be positive and finite, got {}",
                self.scaling_factor
            )));
        }
        for (name, value) in [
            ("shell_concentration", self.shell_concentration),
            ("source_concentration", self.source_concentration),
            ("initial_concentration", self.initial_concentration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}
