//! Utility functions shared by the analysis modules.

pub mod stats;

pub use stats::{coefficient_of_variation, linear_fit, mean, std_dev, variance};
