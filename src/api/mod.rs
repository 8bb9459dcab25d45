use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    DEFAULT_AVERAGE_INFLATION_RATE_PERCENT, GoalMode, GoalParameters, GoalResult,
    InvestmentParameters, MAX_HORIZON_YEARS, ProjectionError, ProjectionResult,
    project_lumpsum, project_sip, simulate_step_up, solve_goal,
};

const DEFAULT_YEARS: u32 = 10;
const DEFAULT_RETURN_RATE: f64 = 12.0;
const DEFAULT_LUMPSUM_AMOUNT: f64 = 100_000.0;
const DEFAULT_MONTHLY_INVESTMENT: f64 = 5_000.0;
const DEFAULT_STEP_UP_RATE: f64 = 10.0;
const DEFAULT_GOAL_AMOUNT: f64 = 1_000_000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliGoalMode {
    Periodic,
    OneTime,
}

impl From<CliGoalMode> for GoalMode {
    fn from(value: CliGoalMode) -> Self {
        match value {
            CliGoalMode::Periodic => GoalMode::Periodic,
            CliGoalMode::OneTime => GoalMode::OneTime,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiGoalMode {
    #[serde(alias = "sip")]
    Periodic,
    #[serde(alias = "oneTime", alias = "one_time", alias = "lumpsum")]
    OneTime,
}

impl From<ApiGoalMode> for CliGoalMode {
    fn from(value: ApiGoalMode) -> Self {
        match value {
            ApiGoalMode::Periodic => CliGoalMode::Periodic,
            ApiGoalMode::OneTime => CliGoalMode::OneTime,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LumpsumArgs {
    #[arg(long, default_value_t = DEFAULT_LUMPSUM_AMOUNT, help = "One-time investment amount")]
    pub amount: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS)]
    pub years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_RETURN_RATE,
        help = "Expected annual return in percent, e.g. 12"
    )]
    pub return_rate: f64,
}

impl Default for LumpsumArgs {
    fn default() -> Self {
        Self {
            amount: DEFAULT_LUMPSUM_AMOUNT,
            years: DEFAULT_YEARS,
            return_rate: DEFAULT_RETURN_RATE,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SipArgs {
    #[arg(long, default_value_t = DEFAULT_MONTHLY_INVESTMENT)]
    pub monthly_investment: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS)]
    pub years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_RETURN_RATE,
        help = "Expected annual return in percent, e.g. 12"
    )]
    pub return_rate: f64,
}

impl Default for SipArgs {
    fn default() -> Self {
        Self {
            monthly_investment: DEFAULT_MONTHLY_INVESTMENT,
            years: DEFAULT_YEARS,
            return_rate: DEFAULT_RETURN_RATE,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct StepUpArgs {
    #[arg(long, default_value_t = DEFAULT_MONTHLY_INVESTMENT)]
    pub monthly_investment: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_STEP_UP_RATE,
        help = "Annual increase of the monthly investment in percent"
    )]
    pub step_up_rate: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS)]
    pub years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_RETURN_RATE,
        help = "Expected annual return in percent, e.g. 12"
    )]
    pub return_rate: f64,
    #[arg(long, help = "Raise the monthly investment every month in line with inflation")]
    pub inflation: bool,
    #[arg(
        long,
        default_value_t = DEFAULT_AVERAGE_INFLATION_RATE_PERCENT,
        help = "Average annual inflation in percent, used with --inflation"
    )]
    pub inflation_rate: f64,
}

impl Default for StepUpArgs {
    fn default() -> Self {
        Self {
            monthly_investment: DEFAULT_MONTHLY_INVESTMENT,
            step_up_rate: DEFAULT_STEP_UP_RATE,
            years: DEFAULT_YEARS,
            return_rate: DEFAULT_RETURN_RATE,
            inflation: false,
            inflation_rate: DEFAULT_AVERAGE_INFLATION_RATE_PERCENT,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct GoalArgs {
    #[arg(long, default_value_t = DEFAULT_GOAL_AMOUNT, help = "Target corpus")]
    pub goal_amount: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS)]
    pub years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_RETURN_RATE,
        help = "Expected annual return in percent, e.g. 12"
    )]
    pub return_rate: f64,
    #[arg(long, value_enum, default_value_t = CliGoalMode::Periodic)]
    pub mode: CliGoalMode,
}

impl Default for GoalArgs {
    fn default() -> Self {
        Self {
            goal_amount: DEFAULT_GOAL_AMOUNT,
            years: DEFAULT_YEARS,
            return_rate: DEFAULT_RETURN_RATE,
            mode: CliGoalMode::Periodic,
        }
    }
}

/// One calculator run, shared by the CLI subcommands and the HTTP routes.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Calculation {
    /// Future value of a single upfront investment
    Lumpsum(LumpsumArgs),
    /// Future value of equal monthly investments
    Sip(SipArgs),
    /// Monthly investments with an annual step-up and optional inflation indexing
    StepUp(StepUpArgs),
    /// Contribution required to reach a target corpus
    Goal(GoalArgs),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationOutput {
    Projection(ProjectionResult),
    Goal(GoalResult),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    InvalidRequest {
        field: &'static str,
        message: String,
    },
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl ApiError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidRequest { field, .. } => Some(field),
            Self::Projection(err) => err.field(),
        }
    }
}

pub fn run_calculation(calculation: Calculation) -> Result<CalculationOutput, ApiError> {
    let output = match calculation {
        Calculation::Lumpsum(args) => {
            CalculationOutput::Projection(project_lumpsum(&build_lumpsum_params(&args)?)?)
        }
        Calculation::Sip(args) => {
            CalculationOutput::Projection(project_sip(&build_sip_params(&args)?)?)
        }
        Calculation::StepUp(args) => {
            CalculationOutput::Projection(simulate_step_up(&build_step_up_params(&args)?)?)
        }
        Calculation::Goal(args) => CalculationOutput::Goal(solve_goal(&build_goal_params(&args)?)?),
    };
    Ok(output)
}

fn check_years(years: u32) -> Result<u32, ApiError> {
    if !(1..=MAX_HORIZON_YEARS).contains(&years) {
        return Err(ApiError::InvalidRequest {
            field: "years",
            message: format!("years must be between 1 and {MAX_HORIZON_YEARS}"),
        });
    }
    Ok(years)
}

fn build_lumpsum_params(args: &LumpsumArgs) -> Result<InvestmentParameters, ApiError> {
    Ok(InvestmentParameters::new(
        args.amount,
        args.return_rate,
        check_years(args.years)?,
    ))
}

fn build_sip_params(args: &SipArgs) -> Result<InvestmentParameters, ApiError> {
    Ok(InvestmentParameters::new(
        args.monthly_investment,
        args.return_rate,
        check_years(args.years)?,
    ))
}

fn build_step_up_params(args: &StepUpArgs) -> Result<InvestmentParameters, ApiError> {
    let mut params = InvestmentParameters::new(
        args.monthly_investment,
        args.return_rate,
        check_years(args.years)?,
    )
    .with_step_up(args.step_up_rate)
    .with_inflation_adjustment(args.inflation);
    params.average_inflation_rate_percent = args.inflation_rate;
    Ok(params)
}

fn build_goal_params(args: &GoalArgs) -> Result<GoalParameters, ApiError> {
    Ok(GoalParameters {
        target_amount: args.goal_amount,
        horizon_years: check_years(args.years)?,
        annual_return_rate_percent: args.return_rate,
        mode: args.mode.into(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LumpsumPayload {
    #[serde(alias = "investment")]
    amount: Option<f64>,
    years: Option<u32>,
    return_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    monthly_investment: Option<f64>,
    years: Option<u32>,
    return_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StepUpPayload {
    monthly_investment: Option<f64>,
    step_up_rate: Option<f64>,
    years: Option<u32>,
    return_rate: Option<f64>,
    inflation_enabled: Option<bool>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct GoalPayload {
    goal_amount: Option<f64>,
    years: Option<u32>,
    return_rate: Option<f64>,
    #[serde(alias = "calculationType")]
    mode: Option<ApiGoalMode>,
}

impl From<LumpsumPayload> for LumpsumArgs {
    fn from(payload: LumpsumPayload) -> Self {
        let defaults = Self::default();
        Self {
            amount: payload.amount.unwrap_or(defaults.amount),
            years: payload.years.unwrap_or(defaults.years),
            return_rate: payload.return_rate.unwrap_or(defaults.return_rate),
        }
    }
}

impl From<SipPayload> for SipArgs {
    fn from(payload: SipPayload) -> Self {
        let defaults = Self::default();
        Self {
            monthly_investment: payload
                .monthly_investment
                .unwrap_or(defaults.monthly_investment),
            years: payload.years.unwrap_or(defaults.years),
            return_rate: payload.return_rate.unwrap_or(defaults.return_rate),
        }
    }
}

impl From<StepUpPayload> for StepUpArgs {
    fn from(payload: StepUpPayload) -> Self {
        let defaults = Self::default();
        Self {
            monthly_investment: payload
                .monthly_investment
                .unwrap_or(defaults.monthly_investment),
            step_up_rate: payload.step_up_rate.unwrap_or(defaults.step_up_rate),
            years: payload.years.unwrap_or(defaults.years),
            return_rate: payload.return_rate.unwrap_or(defaults.return_rate),
            inflation: payload.inflation_enabled.unwrap_or(defaults.inflation),
            inflation_rate: payload.inflation_rate.unwrap_or(defaults.inflation_rate),
        }
    }
}

impl From<GoalPayload> for GoalArgs {
    fn from(payload: GoalPayload) -> Self {
        let defaults = Self::default();
        Self {
            goal_amount: payload.goal_amount.unwrap_or(defaults.goal_amount),
            years: payload.years.unwrap_or(defaults.years),
            return_rate: payload.return_rate.unwrap_or(defaults.return_rate),
            mode: payload.mode.map(Into::into).unwrap_or(defaults.mode),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "projection API listening");
    info!("local access: http://127.0.0.1:{port}/api/sip");
    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route(
            "/api/lumpsum",
            get(lumpsum_get_handler).post(lumpsum_post_handler),
        )
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .route(
            "/api/step-up",
            get(step_up_get_handler).post(step_up_post_handler),
        )
        .route("/api/goal", get(goal_get_handler).post(goal_post_handler))
        .fallback(not_found_handler)
}

async fn not_found_handler() -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        ErrorResponse {
            error: "Not found".to_string(),
            field: None,
        },
    )
}

async fn lumpsum_get_handler(
    payload: Result<Query<LumpsumPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => calculation_response(Calculation::Lumpsum(payload.into())),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn lumpsum_post_handler(payload: Result<Json<LumpsumPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => calculation_response(Calculation::Lumpsum(payload.into())),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn sip_get_handler(payload: Result<Query<SipPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => calculation_response(Calculation::Sip(payload.into())),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn sip_post_handler(payload: Result<Json<SipPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => calculation_response(Calculation::Sip(payload.into())),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn step_up_get_handler(payload: Result<Query<StepUpPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => calculation_response(Calculation::StepUp(payload.into())),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn step_up_post_handler(payload: Result<Json<StepUpPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => calculation_response(Calculation::StepUp(payload.into())),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn goal_get_handler(payload: Result<Query<GoalPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => calculation_response(Calculation::Goal(payload.into())),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

async fn goal_post_handler(payload: Result<Json<GoalPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => calculation_response(Calculation::Goal(payload.into())),
        Err(rejection) => rejection_response(rejection.body_text()),
    }
}

/// Malformed query strings and bodies get the same JSON error shape as invalid values.
fn rejection_response(message: String) -> Response {
    warn!(error = %message, "rejected malformed request");
    json_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse {
            error: message,
            field: None,
        },
    )
}

fn calculation_response(calculation: Calculation) -> Response {
    match run_calculation(calculation) {
        Ok(output) => json_response(StatusCode::OK, output),
        Err(err) => {
            warn!(error = %err, field = err.field(), "rejected calculation request");
            json_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: err.to_string(),
                    field: err.field(),
                },
            )
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[test]
    fn empty_payloads_fall_back_to_calculator_defaults() {
        let lumpsum: LumpsumArgs = serde_json::from_str::<LumpsumPayload>("{}")
            .expect("json should parse")
            .into();
        assert_eq!(lumpsum, LumpsumArgs::default());
        assert_approx(lumpsum.amount, 100_000.0);

        let step_up: StepUpArgs = serde_json::from_str::<StepUpPayload>("{}")
            .expect("json should parse")
            .into();
        assert_approx(step_up.step_up_rate, 10.0);
        assert!(!step_up.inflation);
        assert_approx(step_up.inflation_rate, 6.0);
    }

    #[test]
    fn step_up_payload_parses_web_keys() {
        let json = r#"{
          "monthlyInvestment": 2500,
          "stepUpRate": 5,
          "years": 15,
          "returnRate": 11.5,
          "inflationEnabled": true
        }"#;
        let args: StepUpArgs = serde_json::from_str::<StepUpPayload>(json)
            .expect("json should parse")
            .into();
        let params = build_step_up_params(&args).expect("valid params");

        assert_approx(params.contribution, 2_500.0);
        assert_approx(params.step_up_rate_percent, 5.0);
        assert_eq!(params.horizon_years, 15);
        assert_approx(params.annual_return_rate_percent, 11.5);
        assert!(params.inflation_adjustment_enabled);
        assert_approx(params.average_inflation_rate_percent, 6.0);
    }

    #[test]
    fn goal_payload_accepts_calculator_tab_names() {
        let json = r#"{ "goalAmount": 500000, "calculationType": "lumpsum" }"#;
        let args: GoalArgs = serde_json::from_str::<GoalPayload>(json)
            .expect("json should parse")
            .into();
        assert_eq!(args.mode, CliGoalMode::OneTime);
        assert_approx(args.goal_amount, 500_000.0);

        let json = r#"{ "mode": "sip" }"#;
        let args: GoalArgs = serde_json::from_str::<GoalPayload>(json)
            .expect("json should parse")
            .into();
        assert_eq!(args.mode, CliGoalMode::Periodic);
    }

    #[test]
    fn run_calculation_rejects_out_of_range_years() {
        let args = SipArgs {
            years: MAX_HORIZON_YEARS + 1,
            ..SipArgs::default()
        };
        let err = run_calculation(Calculation::Sip(args)).expect_err("must reject long horizon");
        assert_eq!(err.field(), Some("years"));
        assert_eq!(err.to_string(), "years must be between 1 and 100");
    }

    #[test]
    fn run_calculation_passes_engine_errors_through() {
        let args = LumpsumArgs {
            amount: -10.0,
            ..LumpsumArgs::default()
        };
        let err = run_calculation(Calculation::Lumpsum(args)).expect_err("negative amount");
        assert!(matches!(err, ApiError::Projection(_)));
        assert_eq!(err.field(), Some("contribution"));
    }

    #[test]
    fn projection_output_serializes_camel_case_fields() {
        let output = run_calculation(Calculation::StepUp(StepUpArgs::default()))
            .expect("default step-up is valid");
        let json = serde_json::to_string(&output).expect("output should serialize");
        assert!(json.contains("\"totalInvestment\""));
        assert!(json.contains("\"totalReturns\""));
        assert!(json.contains("\"maturityAmount\""));
        assert!(json.contains("\"yearlyBreakdown\""));
        assert!(json.contains("\"cumulativeValue\""));
        assert!(json.contains("\"finalMonthlyContribution\""));

        let output =
            run_calculation(Calculation::Sip(SipArgs::default())).expect("default sip is valid");
        let json = serde_json::to_string(&output).expect("output should serialize");
        assert!(!json.contains("finalMonthlyContribution"));
    }

    #[tokio::test]
    async fn sip_post_handler_returns_projection() {
        let payload = serde_json::from_str::<SipPayload>(
            r#"{ "monthlyInvestment": 1000, "years": 5, "returnRate": 0 }"#,
        )
        .expect("json should parse");
        let response = sip_post_handler(Ok(Json(payload))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );

        let body = body_json(response).await;
        assert_eq!(body["totalInvestment"], serde_json::json!(60000.0));
        assert_eq!(body["maturityAmount"], serde_json::json!(60000.0));
        assert_eq!(body["yearlyBreakdown"].as_array().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn goal_get_handler_solves_default_goal() {
        let response = goal_get_handler(Ok(Query(GoalPayload::default()))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["mode"], serde_json::json!("periodic"));
        let required = body["requiredContribution"]
            .as_f64()
            .expect("required contribution is a number");
        assert!((required - 4_305.0).abs() <= 43.05, "got {required}");
    }

    #[tokio::test]
    async fn invalid_request_returns_bad_request_with_field() {
        let payload = LumpsumPayload {
            years: Some(0),
            ..LumpsumPayload::default()
        };
        let response = lumpsum_post_handler(Ok(Json(payload))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["field"], serde_json::json!("years"));
        assert_eq!(
            body["error"],
            serde_json::json!("years must be between 1 and 100")
        );
    }

    async fn send(method: Method, uri: &str, body: Option<&str>) -> Response {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        let request = request
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .expect("request should build");
        router().oneshot(request).await.expect("router is infallible")
    }

    fn assert_no_store(response: &Response) {
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }

    #[tokio::test]
    async fn router_serves_lumpsum_query() {
        let response = send(
            Method::GET,
            "/api/lumpsum?amount=100000&years=10&returnRate=0",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_no_store(&response);

        let body = body_json(response).await;
        assert_eq!(body["maturityAmount"], serde_json::json!(100000.0));
        assert_eq!(body["yearlyBreakdown"].as_array().map(Vec::len), Some(10));
    }

    #[tokio::test]
    async fn router_serves_sip_json_body() {
        let response = send(
            Method::POST,
            "/api/sip",
            Some(r#"{ "monthlyInvestment": 1000, "years": 5, "returnRate": 0 }"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_no_store(&response);

        let body = body_json(response).await;
        assert_eq!(body["totalInvestment"], serde_json::json!(60000.0));
        assert_eq!(body["totalReturns"], serde_json::json!(0.0));
    }

    #[tokio::test]
    async fn router_serves_step_up_both_ways() {
        let response = send(
            Method::GET,
            "/api/step-up?monthlyInvestment=5000&stepUpRate=10&years=3",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_no_store(&response);
        let body = body_json(response).await;
        let final_monthly = body["finalMonthlyContribution"]
            .as_f64()
            .expect("step-up reports final contribution");
        assert!((final_monthly - 6_050.0).abs() <= 1e-6, "got {final_monthly}");

        let response = send(
            Method::POST,
            "/api/step-up",
            Some(r#"{ "years": 2, "inflationEnabled": true }"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["yearlyBreakdown"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn router_serves_goal_post() {
        let response = send(
            Method::POST,
            "/api/goal",
            Some(r#"{ "goalAmount": 1000000, "mode": "one-time", "returnRate": 0 }"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_no_store(&response);

        let body = body_json(response).await;
        assert_eq!(body["mode"], serde_json::json!("one-time"));
        assert_eq!(body["requiredContribution"], serde_json::json!(1000000.0));
    }

    #[tokio::test]
    async fn router_returns_json_not_found_for_unknown_path() {
        let response = send(Method::GET, "/api/unknown", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_no_store(&response);

        let body = body_json(response).await;
        assert_eq!(body["error"], serde_json::json!("Not found"));
    }

    #[tokio::test]
    async fn malformed_query_gets_json_error() {
        let response = send(Method::GET, "/api/sip?years=abc", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_no_store(&response);

        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|e| e.contains("query string"))
        );
        assert!(body.get("field").is_none());
    }

    #[tokio::test]
    async fn malformed_json_body_gets_json_error() {
        let response = send(Method::POST, "/api/sip", Some("{bad")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_no_store(&response);

        let body = body_json(response).await;
        assert!(body["error"].as_str().is_some_and(|e| e.contains("JSON")));
        assert!(body.get("field").is_none());
    }

    #[tokio::test]
    async fn out_of_range_years_through_router_names_field() {
        let response = send(Method::GET, "/api/lumpsum?years=0", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_no_store(&response);

        let body = body_json(response).await;
        assert_eq!(body["field"], serde_json::json!("years"));
    }
}
