mod engine;
mod error;
mod solver;
mod types;

pub use engine::{project_lumpsum, project_sip, simulate_step_up};
pub use error::ProjectionError;
pub use solver::solve_goal;
pub use types::{
    DEFAULT_AVERAGE_INFLATION_RATE_PERCENT, GoalMode, GoalParameters, GoalResult,
    InvestmentParameters, MAX_HORIZON_YEARS, MONTHS_PER_YEAR, ProjectionResult, YearlyPoint,
};
