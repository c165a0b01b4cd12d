pub mod bar;
pub mod enums;
pub mod error;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use bar::{Bar, BarSeries};
pub use enums::{AlignmentPolicy, ReturnKind, SelectionMethod, VarMethod};
pub use error::CoreError;
pub use series::{BenchmarkSeries, PriceSeries, ReturnSeries, TimeSeries};
