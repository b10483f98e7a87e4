//! Stochastic Voxel-Grid Diffusion Core
//!
//! Models diffusion of a tracer substance through a layered cubic medium
//! with a discrete-space, discrete-time random walk instead of a continuum
//! PDE solve. The cube is split into `divs³` cells: an outer shell and a
//! source band are pinned to configured concentrations at the start of
//! every timestep, and interior cells exchange concentration through
//! macro-particle moves drawn uniformly over the 27-cell Moore
//! neighborhood.
//!
//! Every timestep is committed to an append-only history that external
//! reporting and visualization collaborators consume through point,
//! region-sum, and layer-inventory queries. Runs are deterministic for a
//! fixed configuration and seed.

// Grid indexing and static layer classification
pub mod grid;

// Live field, boundary forcing, and the move engine
pub mod boundary;
pub mod field;
pub mod walker;

// Recorded results
pub mod ledger;

// Run configuration and orchestration
pub mod error;
pub mod simulation;

// Re-export core types
pub use error::SimulationError;
pub use field::ConcentrationField;
pub use grid::{classify, ClassificationTable, GridIndex, Layer, DRAW_CHOICES, OFFSETS, STAY_DRAW};
pub use ledger::ConcentrationHistory;
pub use simulation::{RunState, Simulation, SimulationConfig, MIN_DIVS};
pub use walker::{DrawSource, WalkMetrics, Walker};
