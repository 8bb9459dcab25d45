use tracing::debug;

use super::error::ProjectionError;
use super::types::{
    InvestmentParameters, MAX_HORIZON_YEARS, MONTHS_PER_YEAR, ProjectionResult, YearlyPoint,
};

pub fn project_lumpsum(
    params: &InvestmentParameters,
) -> Result<ProjectionResult, ProjectionError> {
    validate_contribution(params.contribution)?;
    validate_annual_rate(params.annual_return_rate_percent)?;
    validate_horizon(params.horizon_years)?;

    let principal = params.contribution;
    let annual_rate = params.annual_return_rate_percent / 100.0;

    let yearly_breakdown = (1..=params.horizon_years)
        .map(|year| YearlyPoint {
            year,
            cumulative_value: principal * growth_factor(annual_rate, year),
            cumulative_investment: principal,
        })
        .collect::<Vec<_>>();
    let maturity_amount = principal * growth_factor(annual_rate, params.horizon_years);

    debug!(
        principal,
        rate = params.annual_return_rate_percent,
        years = params.horizon_years,
        maturity_amount,
        "projected lumpsum"
    );
    finish(ProjectionResult::new(principal, maturity_amount, yearly_breakdown))
}

pub fn project_sip(
    params: &InvestmentParameters,
) -> Result<ProjectionResult, ProjectionError> {
    validate_contribution(params.contribution)?;
    validate_monthly_rate(params.annual_return_rate_percent)?;
    let total_months = validate_horizon(params.horizon_years)?;

    let monthly = params.contribution;
    let monthly_rate = params.monthly_rate();

    let yearly_breakdown = (1..=params.horizon_years)
        .map(|year| {
            let months = year * MONTHS_PER_YEAR;
            YearlyPoint {
                year,
                cumulative_value: monthly * annuity_due_factor(monthly_rate, months),
                cumulative_investment: monthly * f64::from(months),
            }
        })
        .collect::<Vec<_>>();
    let maturity_amount = monthly * annuity_due_factor(monthly_rate, total_months);
    let total_investment = monthly * f64::from(total_months);

    debug!(
        monthly,
        rate = params.annual_return_rate_percent,
        years = params.horizon_years,
        maturity_amount,
        "projected sip"
    );
    finish(ProjectionResult::new(
        total_investment,
        maturity_amount,
        yearly_breakdown,
    ))
}

/// Month-by-month run with an annual contribution step-up and optional inflation indexing.
///
/// Each year's point holds the horizon-end value of that year's deposits and the amount
/// deposited during that year; the maturity amount is the sum of the per-year values.
pub fn simulate_step_up(
    params: &InvestmentParameters,
) -> Result<ProjectionResult, ProjectionError> {
    validate_contribution(params.contribution)?;
    validate_monthly_rate(params.annual_return_rate_percent)?;
    validate_horizon(params.horizon_years)?;
    validate_step_up(params.step_up_rate_percent)?;
    if params.inflation_adjustment_enabled {
        validate_inflation(params.average_inflation_rate_percent)?;
    }

    let years = params.horizon_years;
    let monthly_rate = params.monthly_rate();
    let step_up = 1.0 + params.step_up_rate_percent / 100.0;
    let monthly_inflation = 1.0 + params.average_inflation_rate_percent / 100.0 / 12.0;

    let mut current_contribution = params.contribution;
    let mut final_monthly_contribution = current_contribution;
    let mut total_investment = 0.0;
    let mut maturity_amount = 0.0;
    let mut yearly_breakdown = Vec::with_capacity(years as usize);

    for year in 1..=years {
        if year == years {
            final_monthly_contribution = current_contribution;
        }
        let mut yearly_investment = 0.0;
        let mut year_end_amount = 0.0;

        for month in 1..=MONTHS_PER_YEAR {
            total_investment += current_contribution;
            yearly_investment += current_contribution;

            let remaining = (years - year) * MONTHS_PER_YEAR + (MONTHS_PER_YEAR - month + 1);
            year_end_amount += current_contribution * growth_factor(monthly_rate, remaining);

            if params.inflation_adjustment_enabled {
                current_contribution *= monthly_inflation;
            }
        }

        current_contribution *= step_up;
        yearly_breakdown.push(YearlyPoint {
            year,
            cumulative_value: year_end_amount,
            cumulative_investment: yearly_investment,
        });
        maturity_amount += year_end_amount;
    }

    debug!(
        start = params.contribution,
        step_up = params.step_up_rate_percent,
        inflation = params.inflation_adjustment_enabled,
        years,
        maturity_amount,
        "simulated step-up sip"
    );
    let mut result = ProjectionResult::new(total_investment, maturity_amount, yearly_breakdown);
    ensure_finite("final_monthly_contribution", final_monthly_contribution)?;
    result.final_monthly_contribution = Some(final_monthly_contribution);
    finish(result)
}

/// `(1 + rate)^periods`.
pub(super) fn growth_factor(rate: f64, periods: u32) -> f64 {
    (1.0 + rate).powf(f64::from(periods))
}

/// Value of one unit deposited at the start of each of `months` periods, i.e.
/// `((1+i)^m - 1) / i * (1+i)`, collapsing to `m` when the rate is zero.
pub(super) fn annuity_due_factor(monthly_rate: f64, months: u32) -> f64 {
    let months = f64::from(months);
    if monthly_rate == 0.0 {
        return months;
    }
    (months * monthly_rate.ln_1p()).exp_m1() / monthly_rate * (1.0 + monthly_rate)
}

pub(super) fn require_finite(field: &'static str, value: f64) -> Result<(), ProjectionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::invalid(field, "must be a finite number"))
    }
}

fn validate_contribution(value: f64) -> Result<(), ProjectionError> {
    require_finite("contribution", value)?;
    if value < 0.0 {
        return Err(ProjectionError::invalid("contribution", "must be >= 0"));
    }
    Ok(())
}

/// Rejects rates at or below -100% per year.
pub(super) fn validate_annual_rate(rate_percent: f64) -> Result<(), ProjectionError> {
    require_finite("annual_return_rate_percent", rate_percent)?;
    if rate_percent <= -100.0 {
        return Err(ProjectionError::invalid(
            "annual_return_rate_percent",
            "must be > -100",
        ));
    }
    Ok(())
}

/// Rejects rates whose monthly equivalent is at or below -100%.
pub(super) fn validate_monthly_rate(rate_percent: f64) -> Result<(), ProjectionError> {
    require_finite("annual_return_rate_percent", rate_percent)?;
    if rate_percent <= -1200.0 {
        return Err(ProjectionError::invalid(
            "annual_return_rate_percent",
            "must be > -1200 (monthly rate above -100%)",
        ));
    }
    Ok(())
}

/// Returns the horizon in months. Runs before any per-year allocation.
pub(super) fn validate_horizon(years: u32) -> Result<u32, ProjectionError> {
    if !(1..=MAX_HORIZON_YEARS).contains(&years) {
        return Err(ProjectionError::invalid(
            "horizon_years",
            format!("must be between 1 and {MAX_HORIZON_YEARS}"),
        ));
    }
    Ok(years * MONTHS_PER_YEAR)
}

fn validate_step_up(rate_percent: f64) -> Result<(), ProjectionError> {
    require_finite("step_up_rate_percent", rate_percent)?;
    if rate_percent < 0.0 {
        return Err(ProjectionError::invalid("step_up_rate_percent", "must be >= 0"));
    }
    Ok(())
}

fn validate_inflation(rate_percent: f64) -> Result<(), ProjectionError> {
    require_finite("average_inflation_rate_percent", rate_percent)?;
    if rate_percent <= -1200.0 {
        return Err(ProjectionError::invalid(
            "average_inflation_rate_percent",
            "must be > -1200",
        ));
    }
    Ok(())
}

pub(super) fn ensure_finite(quantity: &'static str, value: f64) -> Result<(), ProjectionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::NonFiniteResult { quantity })
    }
}

fn finish(result: ProjectionResult) -> Result<ProjectionResult, ProjectionError> {
    ensure_finite("total_investment", result.total_investment)?;
    ensure_finite("maturity_amount", result.maturity_amount)?;
    ensure_finite("total_returns", result.total_returns)?;
    for point in &result.yearly_breakdown {
        ensure_finite("yearly_breakdown", point.cumulative_value)?;
        ensure_finite("yearly_breakdown", point.cumulative_investment)?;
    }
    Ok(result)
}
