use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The price field of a bar file that becomes the price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceColumn {
    Open,
    High,
    Low,
    #[default]
    Close,
    AdjustedClose,
}

impl PriceColumn {
    /// Canonical header name of the column.
    pub fn name(self) -> &'static str {
        match self {
            PriceColumn::Open => "open",
            PriceColumn::High => "high",
            PriceColumn::Low => "low",
            PriceColumn::Close => "close",
            PriceColumn::AdjustedClose => "adjusted_close",
        }
    }

    /// Normalised header names accepted for the column.
    pub(crate) fn aliases(self) -> &'static [&'static str] {
        match self {
            PriceColumn::Open => &["open"],
            PriceColumn::High => &["high"],
            PriceColumn::Low => &["low"],
            PriceColumn::Close => &["close", "price", "last"],
            PriceColumn::AdjustedClose => &["adjusted_close", "adj_close", "adjclose"],
        }
    }
}

impl fmt::Display for PriceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PriceColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_header(s);
        [
            PriceColumn::Open,
            PriceColumn::High,
            PriceColumn::Low,
            PriceColumn::Close,
            PriceColumn::AdjustedClose,
        ]
        .into_iter()
        .find(|column| column.aliases().contains(&normalized.as_str()))
        .ok_or_else(|| format!("unknown price column '{s}'"))
    }
}

pub(crate) const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "date", "datetime", "time"];

/// Lowercases a header, drops vendor numbering such as `"1. open"` and joins
/// words with underscores, so `"Adj Close"` becomes `"adj_close"`.
pub(crate) fn normalize_header(header: &str) -> String {
    let trimmed = header.trim();
    let unnumbered = match trimmed.split_once(". ") {
        Some((prefix, rest)) if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => trimmed,
    };
    unnumbered
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
