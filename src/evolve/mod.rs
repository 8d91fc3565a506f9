pub mod generation;
pub mod schedule;
pub mod trainer;
