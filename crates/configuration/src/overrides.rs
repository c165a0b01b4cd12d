use crate::settings::AnalyticsSettings;
use core_types::{AlignmentPolicy, ReturnKind};

/// Command-line flags that take precedence over `config.toml`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AnalyticsOverrides {
    /// Number of return periods per year (252 daily, 52 weekly, 12 monthly).
    #[arg(long, global = true)]
    pub annualization_factor: Option<f64>,

    /// Annual risk-free rate, e.g. 0.1 for 10%.
    #[arg(long, global = true)]
    pub risk_free_rate: Option<f64>,

    /// Confidence level of the Value at Risk estimate.
    #[arg(long, global = true)]
    pub var_confidence: Option<f64>,

    /// How to reconcile series with different timestamps (intersect, strict).
    #[arg(long, global = true)]
    pub alignment: Option<AlignmentPolicy>,

    /// How returns are derived from prices (simple, log).
    #[arg(long, global = true)]
    pub return_kind: Option<ReturnKind>,
}

impl AnalyticsOverrides {
    pub fn apply(&self, settings: &mut AnalyticsSettings) {
        if let Some(factor) = self.annualization_factor {
            settings.annualization_factor = factor;
        }
        if let Some(rate) = self.risk_free_rate {
            settings.risk_free_rate = rate;
        }
        if let Some(confidence) = self.var_confidence {
            settings.var_confidence = confidence;
        }
        if let Some(alignment) = self.alignment {
            settings.alignment = alignment;
        }
        if let Some(kind) = self.return_kind {
            settings.return_kind = kind;
        }
    }
}
