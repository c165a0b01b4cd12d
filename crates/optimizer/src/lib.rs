//! # TuringQuant Optimizer
//!
//! Markowitz-style portfolio optimization by random sampling. An
//! `AssetUniverse` aligns the return series of several assets; the
//! `MarkowitzOptimizer` draws random long-only weightings over it and the
//! resulting `EfficientFrontier` picks the best one by Sharpe ratio,
//! volatility or return.

pub mod error;
pub mod frontier;
pub mod markowitz;
pub mod universe;

pub use error::OptimizerError;
pub use frontier::{EfficientFrontier, Portfolio};
pub use markowitz::MarkowitzOptimizer;
pub use universe::AssetUniverse;
