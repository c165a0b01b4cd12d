use crate::error::OptimizerError;
use crate::frontier::{EfficientFrontier, Portfolio};
use crate::universe::AssetUniverse;
use configuration::OptimizerSettings;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Volatility below this is treated as zero when computing Sharpe ratios.
const ZERO_VOLATILITY: f64 = 1e-12;

/// Mean-variance optimizer that samples random long-only portfolios.
///
/// Every portfolio draws one uniform number per asset and normalises the
/// draws to sum to one. Its expected return is `mean · w · f`, its volatility
/// `sqrt(wᵀ Σ w) · sqrt(f)` and its Sharpe ratio `(R - risk_free) / vol`,
/// where `f` is the annualization factor and `risk_free` an annual rate.
#[derive(Debug, Clone)]
pub struct MarkowitzOptimizer {
    settings: OptimizerSettings,
    annualization_factor: f64,
    risk_free: f64,
}

impl MarkowitzOptimizer {
    pub fn new(settings: OptimizerSettings, annualization_factor: f64, risk_free: f64) -> Self {
        Self {
            settings,
            annualization_factor,
            risk_free,
        }
    }

    /// Generates the configured number of portfolios over `universe`.
    ///
    /// With `settings.seed` set, the same universe always yields the same
    /// frontier.
    pub fn run(&self, universe: &AssetUniverse) -> Result<EfficientFrontier, OptimizerError> {
        self.validate()?;

        let total = self.settings.num_portfolios;
        let mean = universe.mean_returns();
        let covariance = universe.covariance();
        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        tracing::info!(
            assets = universe.num_assets(),
            periods = universe.periods(),
            portfolios = total,
            seed = ?self.settings.seed,
            "Starting Markowitz optimization"
        );

        let progress_bar = self.progress_bar(total)?;
        let mut portfolios = Vec::with_capacity(total);
        for _ in 0..total {
            let weights = random_weights(&mut rng, universe.num_assets());
            portfolios.push(self.evaluate(weights, &mean, &covariance));
            progress_bar.inc(1);
        }
        progress_bar.finish_with_message("Portfolio generation complete.");

        tracing::info!(portfolios = portfolios.len(), "Markowitz optimization complete");
        Ok(EfficientFrontier::new(universe.names().to_vec(), portfolios))
    }

    fn validate(&self) -> Result<(), OptimizerError> {
        if self.settings.num_portfolios == 0 {
            return Err(OptimizerError::InvalidInput(
                "num_portfolios".to_string(),
                "at least one portfolio must be generated".to_string(),
            ));
        }
        if !(self.annualization_factor.is_finite() && self.annualization_factor > 0.0) {
            return Err(OptimizerError::InvalidInput(
                "annualization_factor".to_string(),
                format!("must be positive and finite, got {}", self.annualization_factor),
            ));
        }
        if !self.risk_free.is_finite() {
            return Err(OptimizerError::InvalidInput(
                "risk_free".to_string(),
                "must be finite".to_string(),
            ));
        }
        Ok(())
    }

    fn evaluate(&self, weights: Array1<f64>, mean: &Array1<f64>, covariance: &Array2<f64>) -> Portfolio {
        let f = self.annualization_factor;
        let expected_return = mean.dot(&weights) * f;
        let variance = weights.dot(&covariance.dot(&weights)).max(0.0);
        let volatility = variance.sqrt() * f.sqrt();
        let sharpe_ratio = (volatility > ZERO_VOLATILITY).then(|| (expected_return - self.risk_free) / volatility);

        Portfolio {
            weights: weights.to_vec(),
            expected_return,
            volatility,
            sharpe_ratio,
        }
    }

    fn progress_bar(&self, total: usize) -> Result<ProgressBar, OptimizerError> {
        if !self.settings.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let progress_bar = ProgressBar::new(total as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("=>-"),
        );
        Ok(progress_bar)
    }
}

/// Uniform draws normalised to sum to one.
fn random_weights(rng: &mut StdRng, n: usize) -> Array1<f64> {
    let draws: Array1<f64> = (0..n).map(|_| rng.random::<f64>()).collect();
    let total = draws.sum();
    if total > 0.0 {
        draws / total
    } else {
        Array1::from_elem(n, 1.0 / n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use core_types::{ReturnSeries, SelectionMethod};

    fn day(n: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n as i64)
    }

    fn asset(name: &str, values: &[f64]) -> (String, ReturnSeries) {
        let points = values.iter().enumerate().map(|(i, v)| (day(i), *v)).collect();
        (name.to_string(), ReturnSeries::new(points).unwrap())
    }

    fn universe() -> AssetUniverse {
        AssetUniverse::new(vec![
            asset("AAA", &[0.010, -0.020, 0.015, 0.005, -0.010, 0.020]),
            asset("BBB", &[0.002, 0.001, 0.003, 0.002, 0.001, 0.002]),
            asset("CCC", &[-0.030, 0.040, -0.010, 0.025, 0.010, -0.005]),
        ])
        .unwrap()
    }

    fn settings(num_portfolios: usize, seed: Option<u64>) -> OptimizerSettings {
        OptimizerSettings {
            num_portfolios,
            seed,
            show_progress: false,
            ..OptimizerSettings::default()
        }
    }

    #[test]
    fn weights_are_long_only_and_fully_invested() {
        let frontier = MarkowitzOptimizer::new(settings(500, Some(1)), 252.0, 0.0)
            .run(&universe())
            .unwrap();

        assert_eq!(frontier.portfolios().len(), 500);
        assert_eq!(frontier.assets().len(), 3);
        for portfolio in frontier.portfolios() {
            assert_eq!(portfolio.weights.len(), 3);
            assert!(portfolio.weights.iter().all(|w| *w >= 0.0));
            assert_relative_eq!(portfolio.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            assert!(portfolio.volatility >= 0.0);
        }
    }

    #[test]
    fn same_seed_same_frontier() {
        let universe = universe();
        let first = MarkowitzOptimizer::new(settings(200, Some(42)), 252.0, 0.01).run(&universe).unwrap();
        let second = MarkowitzOptimizer::new(settings(200, Some(42)), 252.0, 0.01).run(&universe).unwrap();
        let other = MarkowitzOptimizer::new(settings(200, Some(7)), 252.0, 0.01).run(&universe).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn portfolio_metrics_follow_the_moments() {
        let universe = universe();
        let optimizer = MarkowitzOptimizer::new(settings(1, Some(3)), 252.0, 0.02);
        let frontier = optimizer.run(&universe).unwrap();
        let portfolio = &frontier.portfolios()[0];

        let weights = Array1::from(portfolio.weights.clone());
        let expected_return = universe.mean_returns().dot(&weights) * 252.0;
        let volatility = weights.dot(&universe.covariance().dot(&weights)).sqrt() * 252f64.sqrt();

        assert_relative_eq!(portfolio.expected_return, expected_return, epsilon = 1e-12);
        assert_relative_eq!(portfolio.volatility, volatility, epsilon = 1e-12);
        assert_relative_eq!(
            portfolio.sharpe_ratio.unwrap(),
            (expected_return - 0.02) / volatility,
            epsilon = 1e-9
        );
    }

    #[test]
    fn min_volatility_prefers_the_quiet_asset() {
        let frontier = MarkowitzOptimizer::new(settings(2_000, Some(11)), 252.0, 0.0)
            .run(&universe())
            .unwrap();
        let best = frontier.best(SelectionMethod::Volatility).unwrap();

        // BBB barely moves, so the least volatile sample leans on it.
        let heaviest = best
            .weights
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(heaviest, Some(1));
    }

    #[test]
    fn single_asset_gets_full_weight() {
        let universe = AssetUniverse::new(vec![asset("AAA", &[0.01, -0.02, 0.03])]).unwrap();
        let frontier = MarkowitzOptimizer::new(settings(10, Some(5)), 12.0, 0.0).run(&universe).unwrap();
        assert!(frontier.portfolios().iter().all(|p| (p.weights[0] - 1.0).abs() < 1e-12));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let universe = universe();
        assert!(matches!(
            MarkowitzOptimizer::new(settings(0, None), 252.0, 0.0).run(&universe),
            Err(OptimizerError::InvalidInput(..))
        ));
        assert!(MarkowitzOptimizer::new(settings(10, None), 0.0, 0.0).run(&universe).is_err());
    }
}
