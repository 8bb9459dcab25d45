use tracing::debug;

use super::engine::{
    annuity_due_factor, ensure_finite, growth_factor, project_lumpsum, project_sip,
    require_finite, validate_annual_rate, validate_horizon, validate_monthly_rate,
};
use super::error::ProjectionError;
use super::types::{GoalMode, GoalParameters, GoalResult, InvestmentParameters};

/// Solves for the contribution that reaches `target_amount` at the horizon.
///
/// Both forward formulas are closed-form and linear in the contribution, so the
/// inversion is a single division; the trajectory comes from re-running the
/// matching forward projector with the solved amount.
pub fn solve_goal(params: &GoalParameters) -> Result<GoalResult, ProjectionError> {
    let months = validate_goal(params)?;

    let required_contribution = match params.mode {
        GoalMode::OneTime => {
            let annual_rate = params.annual_return_rate_percent / 100.0;
            params.target_amount / growth_factor(annual_rate, params.horizon_years)
        }
        GoalMode::Periodic => {
            let monthly_rate = params.annual_return_rate_percent / 12.0 / 100.0;
            params.target_amount / annuity_due_factor(monthly_rate, months)
        }
    };
    ensure_finite("required_contribution", required_contribution)?;

    let forward = InvestmentParameters::new(
        required_contribution,
        params.annual_return_rate_percent,
        params.horizon_years,
    );
    let projection = match params.mode {
        GoalMode::OneTime => project_lumpsum(&forward)?,
        GoalMode::Periodic => project_sip(&forward)?,
    };

    debug!(
        target = params.target_amount,
        mode = ?params.mode,
        required_contribution,
        projected = projection.maturity_amount,
        "solved goal"
    );

    Ok(GoalResult {
        mode: params.mode,
        target_amount: params.target_amount,
        required_contribution,
        total_investment: projection.total_investment,
        total_returns: params.target_amount - projection.total_investment,
        maturity_amount: params.target_amount,
        projected_maturity_amount: projection.maturity_amount,
        yearly_breakdown: projection.yearly_breakdown,
    })
}

fn validate_goal(params: &GoalParameters) -> Result<u32, ProjectionError> {
    require_finite("target_amount", params.target_amount)?;
    if params.target_amount <= 0.0 {
        return Err(ProjectionError::invalid("target_amount", "must be > 0"));
    }
    match params.mode {
        GoalMode::OneTime => validate_annual_rate(params.annual_return_rate_percent)?,
        GoalMode::Periodic => validate_monthly_rate(params.annual_return_rate_percent)?,
    }
    validate_horizon(params.horizon_years)
}
