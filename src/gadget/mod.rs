pub mod affine;
pub mod assignment;
pub mod gadgets;

pub use affine::Affine;
pub use assignment::{LayerPlan, WeightAssignment};
