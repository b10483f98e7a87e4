//! Voxel-grid indexing and static layer classification

pub mod index;
pub mod layers;

// Re-export main types
pub use index::{GridIndex, DRAW_CHOICES, OFFSETS, STAY_DRAW};
pub use layers::{classify, ClassificationTable, Layer};
