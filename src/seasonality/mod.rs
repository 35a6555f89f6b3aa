//! Seasonal decomposition of monthly count totals.
//!
//! - Classical: moving-average trend with extrapolated ends (default)
//! - STL: Seasonal-Trend decomposition using LOESS
//!
//! Both sit behind the [`Decomposer`] trait, so callers can plug in their own.

mod classical;
mod decomposer;
mod result;
mod stl;

pub use classical::ClassicalDecomposition;
pub use decomposer::{Components, Decomposer};
pub use result::{decompose_monthly, Decomposition, DecompositionResult};
pub use stl::Stl;
