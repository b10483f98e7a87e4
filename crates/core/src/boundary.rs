//! Per-timestep boundary forcing for the fixed layers.

use crate::field::ConcentrationField;
use crate::grid::{ClassificationTable, Layer};
use rayon::prelude::*;

/// Pin every fixed-layer cell to its configured concentration.
///
/// Shell cells are set to `shell_value` and source cells to `source_value`,
/// overwriting whatever the previous timestep left there, including tracer
/// that random-walked into a fixed cell. Free cells are untouched. Runs at
/// the start of every timestep, before the walker, so that fixed layers hold
/// their configured values for the whole sweep.
pub fn force_fixed_layers(
    field: &mut ConcentrationField,
    table: &ClassificationTable,
    shell_value: f64,
    source_value: f64,
) {
    field
        .values_mut()
        .par_iter_mut()
        .zip(table.layers().par_iter())
        .for_each(|(value, layer)| match layer {
            Layer::Shell => *value = shell_value,
            Layer::Source => *value = source_value,
            Layer::Free => {}
        });
}
