//! Commands - API for front ends
//!
//! Every command returns `Result<T, String>` so front ends only deal with
//! serializable values. `handle_line` dispatches one JSON request line.

use serde::{Deserialize, Serialize};

use super::engine_status::EngineStatusReport;
use crate::logic::adapter::{self, PredictionResult};
use crate::logic::advice::{self, Advice, Recommendation, RECOMMENDATIONS};
use crate::logic::config::AdapterOptions;
use crate::logic::features::LayoutInfo;
use crate::logic::grade::{self, GradeInfo};
use crate::logic::error::AdapterError;
use crate::logic::params::{rock_type, RawParameters, RockType, ROCK_TYPES};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Rock type given either as its code or its name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RockTypeInput {
    Code(f64),
    Name(String),
}

impl RockTypeInput {
    pub fn code(&self) -> Result<f64, String> {
        match self {
            RockTypeInput::Code(code) => Ok(*code),
            RockTypeInput::Name(name) => rock_type::by_name(name)
                .map(|r| r.code)
                .ok_or_else(|| format!("Unknown rock type: {}", name)),
        }
    }
}

/// Prediction request. Ratios are always derived, any supplied ratio is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub rock_type: RockTypeInput,
    pub sigma_theta: f64,
    pub sigma_c: f64,
    pub sigma_t: f64,
    pub wet: f64,
}

impl PredictionRequest {
    pub fn to_parameters(&self) -> Result<RawParameters, String> {
        Ok(RawParameters::from_measurements(
            self.rock_type.code()?,
            self.sigma_theta,
            self.sigma_c,
            self.sigma_t,
            self.wet,
        ))
    }
}

/// Prediction response
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub request_id: String,
    pub predicted_at: chrono::DateTime<chrono::Utc>,
    pub parameters: RawParameters,
    pub result: PredictionResult,
    pub warnings: Vec<String>,
    pub advice: Advice,
}

/// One line of input for the JSON-lines front end
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Predict(PredictionRequest),
    Status,
    Grades,
    RockTypes,
    Recommendations,
    Layout,
}

// ============================================================================
// PREDICTION COMMANDS
// ============================================================================

/// Predict with the process-wide model
pub fn predict_rock_burst(request: PredictionRequest, options: &AdapterOptions) -> Result<PredictionResponse, String> {
    let parameters = request.to_parameters()?;
    let result = adapter::predict(&parameters, options).map_err(report_error)?;
    Ok(build_response(parameters, result))
}

/// Log by severity, hand the message to the front end
fn report_error(error: AdapterError) -> String {
    if error.is_fatal() {
        log::error!("Model unavailable: {}", error);
    } else if error.is_integrity_violation() {
        log::error!("Model output rejected: {}", error);
    } else {
        log::warn!("Prediction rejected: {}", error);
    }
    error.to_string()
}

fn build_response(parameters: RawParameters, result: PredictionResult) -> PredictionResponse {
    let warnings = parameters.range_warnings();
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    PredictionResponse {
        request_id: uuid::Uuid::new_v4().to_string(),
        predicted_at: chrono::Utc::now(),
        advice: advice::for_grade(result.grade),
        parameters,
        result,
        warnings,
    }
}

// ============================================================================
// CATALOG COMMANDS
// ============================================================================

pub fn get_engine_status() -> EngineStatusReport {
    EngineStatusReport::current()
}

pub fn get_grade_catalog() -> Vec<GradeInfo> {
    grade::catalog()
}

pub fn get_rock_types() -> Vec<RockType> {
    ROCK_TYPES.to_vec()
}

pub fn get_recommendations() -> Vec<Recommendation> {
    RECOMMENDATIONS.to_vec()
}

pub fn get_feature_layout() -> LayoutInfo {
    LayoutInfo::current()
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Handle one JSON request line; errors come back as `{"error": ...}`
pub fn handle_line(line: &str, options: &AdapterOptions) -> serde_json::Value {
    let command: Command = match serde_json::from_str(line) {
        Ok(command) => command,
        Err(e) => return error_value(format!("Invalid request: {}", e)),
    };

    let value = match command {
        Command::Predict(request) => predict_rock_burst(request, options).and_then(to_value),
        Command::Status => to_value(get_engine_status()),
        Command::Grades => to_value(get_grade_catalog()),
        Command::RockTypes => to_value(get_rock_types()),
        Command::Recommendations => to_value(get_recommendations()),
        Command::Layout => to_value(get_feature_layout()),
    };

    value.unwrap_or_else(error_value)
}

fn to_value<T: Serialize>(value: T) -> Result<serde_json::Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

fn error_value(message: String) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

// ============================================================================
// TESTS
// ============================================================================
