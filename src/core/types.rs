use serde::Serialize;

/// Annual inflation assumed when contributions are inflation-indexed.
pub const DEFAULT_AVERAGE_INFLATION_RATE_PERCENT: f64 = 6.0;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest horizon any projector accepts.
pub const MAX_HORIZON_YEARS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentParameters {
    /// Monthly deposit for SIP and step-up runs, the single deposit for lumpsum.
    pub contribution: f64,
    pub annual_return_rate_percent: f64,
    pub horizon_years: u32,
    /// Annual increase of the monthly contribution; zero disables step-up.
    pub step_up_rate_percent: f64,
    pub inflation_adjustment_enabled: bool,
    pub average_inflation_rate_percent: f64,
}

impl InvestmentParameters {
    pub fn new(
        contribution: f64,
        annual_return_rate_percent: f64,
        horizon_years: u32,
    ) -> Self {
        Self {
            contribution,
            annual_return_rate_percent,
            horizon_years,
            step_up_rate_percent: 0.0,
            inflation_adjustment_enabled: false,
            average_inflation_rate_percent: DEFAULT_AVERAGE_INFLATION_RATE_PERCENT,
        }
    }

    pub fn with_step_up(mut self, step_up_rate_percent: f64) -> Self {
        self.step_up_rate_percent = step_up_rate_percent;
        self
    }

    pub fn with_inflation_adjustment(mut self, enabled: bool) -> Self {
        self.inflation_adjustment_enabled = enabled;
        self
    }

    pub(crate) fn monthly_rate(&self) -> f64 {
        self.annual_return_rate_percent / 12.0 / 100.0
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalMode {
    /// Equal monthly deposits (SIP).
    Periodic,
    /// A single upfront deposit (lumpsum).
    OneTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalParameters {
    pub target_amount: f64,
    pub horizon_years: u32,
    pub annual_return_rate_percent: f64,
    pub mode: GoalMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyPoint {
    pub year: u32,
    pub cumulative_value: f64,
    pub cumulative_investment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub total_investment: f64,
    pub total_returns: f64,
    pub maturity_amount: f64,
    pub yearly_breakdown: Vec<YearlyPoint>,
    /// Monthly contribution in force at the start of the final year (step-up runs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_monthly_contribution: Option<f64>,
}

impl ProjectionResult {
    /// Returns are always derived so that `maturity - investment` holds exactly.
    pub fn new(
        total_investment: f64,
        maturity_amount: f64,
        yearly_breakdown: Vec<YearlyPoint>,
    ) -> Self {
        Self {
            total_investment,
            total_returns: maturity_amount - total_investment,
            maturity_amount,
            yearly_breakdown,
            final_monthly_contribution: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResult {
    pub mode: GoalMode,
    pub target_amount: f64,
    pub required_contribution: f64,
    pub total_investment: f64,
    pub total_returns: f64,
    /// Equal to the target; returns are reported against it.
    pub maturity_amount: f64,
    /// Maturity of the forward projection run with the solved contribution.
    pub projected_maturity_amount: f64,
    pub yearly_breakdown: Vec<YearlyPoint>,
}
