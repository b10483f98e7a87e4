//! Material layer classification for the layered cubic medium.
//!
//! The cube is a crust of fixed-concentration `Shell` cells, a
//! fixed-concentration `Source` band one layer in, and a `Free` interior
//! whose concentration evolves only through random-walk moves. For a grid of
//! resolution `n` the shell holds `n³ − (n−2)³` cells and the source band
//! `(n−2)³ − (n−4)³`; the interior needs `n ≥ 5` to be nonempty.
//!
//! Classification is a function of the coordinate alone and never changes
//! during a run, so it is evaluated once into a [`ClassificationTable`]
//! instead of being recomputed every timestep.

use crate::grid::GridIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Material layer of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Outermost crust; concentration pinned to the ambient value every
    /// timestep.
    Shell,
    /// Band directly inside the shell; concentration pinned to the
    /// saturation value every timestep.
    Source,
    /// Interior cell; concentration evolves only via macro-particle moves.
    Free,
}

/// Classify the cell at `(x, y, z)` in a `divs³` grid.
///
/// Pure and deterministic: shell cells touch the grid boundary, source cells
/// lie on the surface of the `(divs−2)³` sub-cube one layer inward, and
/// everything deeper is free.
pub fn classify(x: usize, y: usize, z: usize, divs: usize) -> Layer {
    let edge = divs - 1;
    if x == 0 || y == 0 || z == 0 || x == edge || y == edge || z == edge {
        Layer::Shell
    } else if x == 1 || y == 1 || z == 1 || x == edge - 1 || y == edge - 1 || z == edge - 1 {
        Layer::Source
    } else {
        Layer::Free
    }
}

/// Precomputed per-cell layer table with cached layer sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationTable {
    divs: usize,
    layers: Vec<Layer>,
    shell_count: usize,
    source_count: usize,
    free_count: usize,
}

impl ClassificationTable {
    /// Build the table for every cell of `index`.
    pub fn new(index: &GridIndex) -> Self {
        let divs = index.divs();
        let layers: Vec<Layer> = (0..index.cell_count())
            .into_par_iter()
            .map(|id| {
                let (x, y, z) = index.to_coord(id);
                classify(x, y, z, divs)
            })
            .collect();

        let shell_count = layers.iter().filter(|&&l| l == Layer::Shell).count();
        let source_count = layers.iter().filter(|&&l| l == Layer::Source).count();
        let free_count = layers.len() - shell_count - source_count;

        Self {
            divs,
            layers,
            shell_count,
            source_count,
            free_count,
        }
    }

    /// Grid resolution the table was built for.
    pub fn divs(&self) -> usize {
        self.divs
    }

    /// Total number of classified cells.
    pub fn cell_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer of the cell with linear id `id`.
    #[inline]
    pub fn layer(&self, id: usize) -> Layer {
        self.layers[id]
    }

    /// Per-cell layers in linear-id order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of shell cells, `divs³ − (divs−2)³`.
    pub fn shell_count(&self) -> usize {
        self.shell_count
    }

    /// Number of source cells, `(divs−2)³ − (divs−4)³`.
    pub fn source_count(&self) -> usize {
        self.source_count
    }

    /// Number of free interior cells.
    pub fn free_count(&self) -> usize {
        self.free_count
    }

    /// Linear ids of all cells in `layer`, ascending.
    pub fn cells_in(&self, layer: Layer) -> Vec<usize> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == layer)
            .map(|(id, _)| id)
            .collect()
    }

    /// Build a table from an explicit per-cell layer assignment. Test-only:
    /// lets walker tests place free cells against the grid boundary, which
    /// the geometric rule never produces.
    #[cfg(test)]
    pub(crate) fn from_raw(divs: usize, layers: Vec<Layer>) -> Self {
        let shell_count = layers.iter().filter(|&&l| l == Layer::Shell).count();
        let source_count = layers.iter().filter(|&&l| l == Layer::Source).count();
        let free_count = layers.len() - shell_count - source_count;
        Self {
            divs,
            layers,
            shell_count,
            source_count,
            free_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(n: usize) -> usize {
        n * n * n
    }

    #[test]
    fn test_layer_counts_match_geometric_recursion() {
        for divs in [5, 6, 7, 9, 12] {
            let table = ClassificationTable::new(&GridIndex::new(divs));
            assert_eq!(
                table.shell_count(),
                cube(divs) - cube(divs - 2),
                "shell count for divs={divs}"
            );
            assert_eq!(
                table.source_count(),
                cube(divs - 2) - cube(divs - 4),
                "source count for divs={divs}"
            );
            assert_eq!(
                table.free_count(),
                cube(divs - 4),
                "free count for divs={divs}"
            );
        }
    }

    #[test]
    fn test_every_cell_has_exactly_one_layer() {
        let table = ClassificationTable::new(&GridIndex::new(7));
        assert_eq!(
            table.shell_count() + table.source_count() + table.free_count(),
            table.cell_count()
        );
        assert_eq!(table.cell_count(), cube(7));
    }

    #[test]
    fn test_classification_is_idempotent() {
        for divs in [5, 8] {
            for x in 0..divs {
                for y in 0..divs {
                    for z in 0..divs {
                        let first = classify(x, y, z, divs);
                        let second = classify(x, y, z, divs);
                        assert_eq!(first, second);
                    }
                }
            }
        }
    }

    #[test]
    fn test_known_cells_divs_5() {
        // Corner and faces are shell, the band inside is source, the single
        // center cell is free.
        assert_eq!(classify(0, 0, 0, 5), Layer::Shell);
        assert_eq!(classify(4, 2, 2, 5), Layer::Shell);
        assert_eq!(classify(2, 0, 3, 5), Layer::Shell);
        assert_eq!(classify(1, 1, 1, 5), Layer::Source);
        assert_eq!(classify(3, 2, 2, 5), Layer::Source);
        assert_eq!(classify(2, 1, 2, 5), Layer::Source);
        assert_eq!(classify(2, 2, 2, 5), Layer::Free);

        let table = ClassificationTable::new(&GridIndex::new(5));
        assert_eq!(table.free_count(), 1);
        assert_eq!(table.cells_in(Layer::Free), vec![62]);
    }

    #[test]
    fn test_cells_in_ascending_order() {
        let table = ClassificationTable::new(&GridIndex::new(6));
        let free = table.cells_in(Layer::Free);
        assert_eq!(free.len(), table.free_count());
        assert!(free.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_table_agrees_with_classify() {
        let index = GridIndex::new(7);
        let table = ClassificationTable::new(&index);
        for id in 0..index.cell_count() {
            let (x, y, z) = index.to_coord(id);
            assert_eq!(table.layer(id), classify(x, y, z, 7));
        }
    }
}
