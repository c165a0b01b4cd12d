use core_types::SelectionMethod;
use serde::Serialize;
use std::cmp::Ordering;

/// One randomly weighted portfolio with its annualized characteristics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    /// Non-negative weights summing to one, in asset order.
    pub weights: Vec<f64>,
    pub expected_return: f64,
    pub volatility: f64,
    /// `None` for a portfolio without volatility.
    pub sharpe_ratio: Option<f64>,
}

/// All portfolios generated by one optimizer run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficientFrontier {
    assets: Vec<String>,
    portfolios: Vec<Portfolio>,
}

impl EfficientFrontier {
    pub fn new(assets: Vec<String>, portfolios: Vec<Portfolio>) -> Self {
        Self { assets, portfolios }
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn portfolios(&self) -> &[Portfolio] {
        &self.portfolios
    }

    /// The portfolio that is best under `method`: highest Sharpe ratio,
    /// lowest volatility or highest expected return.
    ///
    /// Ties keep the earliest portfolio. Returns `None` when no portfolio
    /// qualifies, e.g. a Sharpe selection where every volatility is zero.
    pub fn best(&self, method: SelectionMethod) -> Option<&Portfolio> {
        let candidates = self.portfolios.iter();
        match method {
            SelectionMethod::SharpeRatio => candidates
                .filter_map(|p| p.sharpe_ratio.map(|s| (p, s)))
                .fold(None, keep_max)
                .map(|(p, _)| p),
            SelectionMethod::Volatility => candidates
                .map(|p| (p, -p.volatility))
                .fold(None, keep_max)
                .map(|(p, _)| p),
            SelectionMethod::Return => candidates
                .map(|p| (p, p.expected_return))
                .fold(None, keep_max)
                .map(|(p, _)| p),
        }
    }

    /// The weights of the best portfolio paired with their asset names.
    pub fn allocation(&self, method: SelectionMethod) -> Option<Vec<(&str, f64)>> {
        self.best(method).map(|p| {
            self.assets
                .iter()
                .map(String::as_str)
                .zip(p.weights.iter().copied())
                .collect()
        })
    }
}

fn keep_max<'a>(best: Option<(&'a Portfolio, f64)>, next: (&'a Portfolio, f64)) -> Option<(&'a Portfolio, f64)> {
    match best {
        Some(current) if current.1.total_cmp(&next.1) != Ordering::Less => Some(current),
        _ => Some(next),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio(expected_return: f64, volatility: f64, sharpe_ratio: Option<f64>) -> Portfolio {
        Portfolio {
            weights: vec![0.5, 0.5],
            expected_return,
            volatility,
            sharpe_ratio,
        }
    }

    fn frontier() -> EfficientFrontier {
        EfficientFrontier::new(
            vec!["A".to_string(), "B".to_string()],
            vec![
                portfolio(0.10, 0.20, Some(0.5)),
                portfolio(0.15, 0.10, Some(1.5)),
                portfolio(0.30, 0.40, Some(0.75)),
                portfolio(0.05, 0.05, Some(1.0)),
            ],
        )
    }

    #[test]
    fn best_by_each_method() {
        let frontier = frontier();
        assert_eq!(frontier.best(SelectionMethod::SharpeRatio), Some(&frontier.portfolios()[1]));
        assert_eq!(frontier.best(SelectionMethod::Volatility), Some(&frontier.portfolios()[3]));
        assert_eq!(frontier.best(SelectionMethod::Return), Some(&frontier.portfolios()[2]));
    }

    #[test]
    fn sharpe_selection_skips_undefined_ratios() {
        let frontier = EfficientFrontier::new(vec!["A".to_string()], vec![portfolio(0.1, 0.0, None)]);
        assert!(frontier.best(SelectionMethod::SharpeRatio).is_none());
        assert!(frontier.best(SelectionMethod::Volatility).is_some());

        let empty = EfficientFrontier::new(vec![], vec![]);
        assert!(empty.best(SelectionMethod::Return).is_none());
    }

    #[test]
    fn allocation_names_the_weights() {
        let frontier = frontier();
        let allocation = frontier.allocation(SelectionMethod::SharpeRatio).unwrap();
        assert_eq!(allocation, vec![("A", 0.5), ("B", 0.5)]);
    }
}
