//! Services orchestrating the analysis passes.

pub mod audit;
