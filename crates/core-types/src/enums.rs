use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a per-period return was computed from consecutive prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// `p[i] / p[i-1] - 1`
    #[default]
    Simple,
    /// `ln(p[i] / p[i-1])`
    Log,
}

impl ReturnKind {
    /// Growth factor of a single period, i.e. the multiplier applied to wealth.
    pub fn growth(&self, value: f64) -> f64 {
        match self {
            ReturnKind::Simple => 1.0 + value,
            ReturnKind::Log => value.exp(),
        }
    }
}

/// What to do when two series used together do not share the same timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Keep only the timestamps present in both series.
    #[default]
    Intersect,
    /// Reject the pair unless both series have exactly the same timestamps.
    Strict,
}

/// Estimation method for Value at Risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarMethod {
    /// Parametric estimate assuming normally distributed returns.
    #[default]
    VarianceCovariance,
    /// Empirical quantile of the observed returns.
    Historical,
}

/// Criterion used to pick a single portfolio out of a simulated frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// Highest Sharpe ratio.
    #[default]
    SharpeRatio,
    /// Lowest volatility.
    Volatility,
    /// Highest expected return.
    Return,
}

impl FromStr for ReturnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" | "simp" => Ok(ReturnKind::Simple),
            "log" => Ok(ReturnKind::Log),
            other => Err(format!("unknown return kind '{other}' (expected simple or log)")),
        }
    }
}

impl FromStr for AlignmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "intersect" => Ok(AlignmentPolicy::Intersect),
            "strict" => Ok(AlignmentPolicy::Strict),
            other => Err(format!("unknown alignment policy '{other}' (expected intersect or strict)")),
        }
    }
}

impl FromStr for VarMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "variance_covariance" | "parametric" => Ok(VarMethod::VarianceCovariance),
            "historical" => Ok(VarMethod::Historical),
            other => Err(format!(
                "unknown VaR method '{other}' (expected variance-covariance or historical)"
            )),
        }
    }
}

impl FromStr for SelectionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "sharpe_ratio" | "sharpe" => Ok(SelectionMethod::SharpeRatio),
            "volatility" => Ok(SelectionMethod::Volatility),
            "return" => Ok(SelectionMethod::Return),
            other => Err(format!(
                "unknown selection method '{other}' (expected sharpe-ratio, volatility or return)"
            )),
        }
    }
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionMethod::SharpeRatio => "sharpe-ratio",
            SelectionMethod::Volatility => "volatility",
            SelectionMethod::Return => "return",
        };
        f.write_str(name)
    }
}
