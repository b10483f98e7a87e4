//! Error taxonomy for the simulation core.
//!
//! Configuration problems are fatal at construction. Ledger and driver
//! misuse (reading an unrecorded timestep, stepping a finished run) are
//! recoverable. Per-move anomalies (an off-grid target, or a transfer that
//! would overdraw a cell) are resolved inside the walker and reported only
//! as [`crate::walker::WalkMetrics`] counters, so a started timestep always
//! completes.

/// Errors surfaced by the simulation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Non-physical or out-of-range setup parameters.
    InvalidConfiguration(String),
    /// Query for a timestep that has not been recorded yet.
    NotYetRecorded {
        /// Timestep the caller asked for.
        requested: usize,
        /// Number of timesteps recorded so far.
        recorded: usize,
    },
    /// Attempt to step a simulation past its configured horizon.
    AlreadyComplete {
        /// The configured number of timesteps.
        total_timesteps: usize,
    },
    /// Query with a cell id outside the grid.
    CellOutOfBounds(usize),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {msg}")
            }
            SimulationError::NotYetRecorded {
                requested,
                recorded,
            } => write!(
                f,
                "timestep {requested} not yet recorded ({recorded} recorded so far)"
            ),
            SimulationError::AlreadyComplete { total_timesteps } => {
                write!(f, "simulation already completed all {total_timesteps} timesteps")
            }
            SimulationError::CellOutOfBounds(cell) => {
                write!(f, "cell id {cell} is outside the grid")
            }
        }
    }
}

impl std::error::Error for SimulationError {}
