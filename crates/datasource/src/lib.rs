//! # TuringQuant Data Source
//!
//! Loads price history from CSV files, the way data vendors export it, into
//! the validated series of `core-types`.
//!
//! Headers are matched loosely: `Close`, `4. close` and `close` all name the
//! close column, `Adj Close` and `5. adjusted close` the adjusted close.

pub mod column;
pub mod error;
pub mod reader;

pub use column::PriceColumn;
pub use error::DataError;
pub use reader::{load_bars, load_prices, read_bars, read_prices};
