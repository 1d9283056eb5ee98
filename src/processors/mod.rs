pub mod combiner;
pub mod consistency;
pub mod day_boundary;
pub mod normalize;
pub mod reconciler;

pub use combiner::combine_years;
pub use consistency::ConsistencyChecker;
pub use day_boundary::correct_day_boundary;
pub use normalize::ShapeNormalizer;
pub use reconciler::CodeReconciler;
