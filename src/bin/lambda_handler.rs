//! AWS Lambda handler for scheme comparisons
//!
//! Accepts a scenario as JSON (every field optional) plus an optional
//! `horizon` and returns both scheme summaries, overtakes and the ranking.
//!
//! Supports direct invocation and Lambda Function URLs (JSON in `body`).

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use pension_projection::calendar::Month;
use pension_projection::comparison::{MergedTable, OvertakeEvent, Ranking};
use pension_projection::projection::{GrowthRecord, MonthlyRecord, SimulationSummary};
use pension_projection::report::{format_currency, overtake_lines, ranking_lines, DEFAULT_CURRENCY};
use pension_projection::{ComparisonScenario, ScenarioRunner};

/// Request body: a scenario plus run options
#[derive(Debug, Deserialize)]
pub struct ComparisonRequest {
    #[serde(flatten)]
    pub scenario: ComparisonScenario,

    /// Last month to project (default: two years past the last start date)
    #[serde(default)]
    pub horizon: Option<Month>,

    /// Include monthly records and the merged value table
    #[serde(default)]
    pub include_records: bool,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String { DEFAULT_CURRENCY.to_string() }

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub horizon: Month,
    pub minimum_horizon: Month,
    pub schemes: Vec<SchemeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_fund: Option<GrowthFundOutput>,
    pub overtakes: Vec<OvertakeEvent>,
    pub overtake_text: Vec<String>,
    pub ranking: Ranking,
    pub ranking_text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<MergedTable>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct SchemeOutput {
    pub name: String,
    pub final_value_text: String,
    pub summary: SimulationSummary,
    pub tax_on_pension: f64,
    pub tax_on_interest: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<MonthlyRecord>>,
}

#[derive(Debug, Serialize)]
pub struct GrowthFundOutput {
    pub name: String,
    pub final_value: f64,
    pub total_interest: f64,
    pub total_added: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<GrowthRecord>>,
}

/// Pull the request document out of a raw event. Function URL events carry it
/// as a string in `body`; direct invocations are the document itself.
fn request_document(payload: Value) -> Result<Value, String> {
    let Some(body) = payload.get("body").and_then(Value::as_str) else {
        return Ok(payload);
    };

    if payload.get("isBase64Encoded").and_then(Value::as_bool).unwrap_or(false) {
        return Err("base64-encoded bodies are not supported".to_string());
    }
    if body.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(body).map_err(|e| format!("Invalid JSON: {}", e))
}

fn is_function_url(payload: &Value) -> bool {
    payload.get("requestContext").is_some() && payload.get("body").map_or(true, Value::is_string)
}

fn process(document: Value) -> Result<ComparisonResponse, String> {
    let start = std::time::Instant::now();

    let request: ComparisonRequest =
        serde_json::from_value(document).map_err(|e| format!("Invalid request: {}", e))?;
    let scenario = request.scenario;
    scenario.validate().map_err(|e| e.to_string())?;

    let horizon = scenario.resolve_horizon(request.horizon);
    debug!("comparing schemes through {}", horizon);
    let outcome = ScenarioRunner::new().run(&scenario, horizon);

    let include = request.include_records;
    let currency = request.currency.as_str();

    let schemes = [
        (&scenario.early.name, &outcome.early),
        (&scenario.late.name, &outcome.late),
    ]
    .into_iter()
    .map(|(name, result)| SchemeOutput {
        name: name.clone(),
        final_value_text: format_currency(result.final_value, currency),
        summary: result.summary(),
        tax_on_pension: result.tax_on_pension,
        tax_on_interest: result.tax_on_interest,
        records: include.then(|| result.records.clone()),
    })
    .collect();

    let growth_fund = match (&outcome.growth, &scenario.growth_fund) {
        (Some(growth), Some(fund)) => Some(GrowthFundOutput {
            name: fund.name.clone(),
            final_value: growth.final_value,
            total_interest: growth.total_interest,
            total_added: growth.total_added(),
            records: include.then(|| growth.records.clone()),
        }),
        _ => None,
    };

    Ok(ComparisonResponse {
        horizon,
        minimum_horizon: scenario.minimum_horizon(),
        schemes,
        growth_fund,
        overtake_text: overtake_lines(&outcome.comparison.overtakes),
        ranking_text: ranking_lines(&outcome.comparison.ranking, currency),
        overtakes: outcome.comparison.overtakes,
        ranking: outcome.comparison.ranking,
        merged: include.then_some(outcome.merged),
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

fn http_envelope(status: u16, body: &Value) -> Value {
    json!({
        "statusCode": status,
        "headers": {
            "Content-Type": "application/json",
            "Access-Control-Allow-Origin": "*",
            "Access-Control-Allow-Methods": "POST, OPTIONS",
            "Access-Control-Allow-Headers": "Content-Type",
        },
        "body": body.to_string(),
    })
}

/// Lambda handler function
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let payload = event.payload;
    let via_url = is_function_url(&payload);

    let result = request_document(payload).and_then(process);

    let (status, body) = match result {
        Ok(response) => (200, serde_json::to_value(&response)?),
        Err(message) => {
            warn!("rejected request: {}", message);
            (400, json!({ "error": message }))
        }
    };

    if via_url {
        Ok(http_envelope(status, &body))
    } else if status == 200 {
        Ok(body)
    } else {
        Err(body["error"].as_str().unwrap_or("invalid request").into())
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_document_passes_through() {
        let doc = request_document(json!({"monthly_contribution": 1000})).unwrap();
        assert_eq!(doc["monthly_contribution"], 1000);
    }

    #[test]
    fn test_function_url_body_is_parsed() {
        let event = json!({
            "requestContext": {},
            "body": "{\"horizon\": \"2031-01\"}",
            "isBase64Encoded": false
        });
        assert!(is_function_url(&event));
        let doc = request_document(event).unwrap();
        assert_eq!(doc["horizon"], "2031-01");

        let empty = request_document(json!({"requestContext": {}, "body": ""})).unwrap();
        assert_eq!(empty, json!({}));
    }

    #[test]
    fn test_process_defaults() {
        let response = process(json!({})).unwrap();
        assert_eq!(response.horizon, Month::new(2030, 7).unwrap());
        assert_eq!(response.schemes.len(), 2);
        assert_eq!(response.schemes[0].name, "Scheme 58");
        assert!(response.schemes[0].records.is_none());
        assert!(response.merged.is_none());
        assert_eq!(response.ranking.entries.len(), 2);
    }

    #[test]
    fn test_process_with_records_and_horizon() {
        let response = process(json!({
            "horizon": "2029-12",
            "include_records": true,
            "growth_fund": {}
        }))
        .unwrap();
        assert_eq!(response.horizon, Month::new(2029, 12).unwrap());
        assert!(response.schemes[1].records.as_ref().is_some_and(|r| !r.is_empty()));
        assert!(response.growth_fund.is_some());
        assert_eq!(response.merged.map(|m| m.names.len()), Some(3));
    }

    #[test]
    fn test_process_rejects_bad_input() {
        assert!(process(json!({"tax": {"enabled": true, "rate": 3.0}})).is_err());
        assert!(process(json!({"early": {"side_fund_compounding": "Hourly"}})).is_err());
        assert!(process(json!({"horizon": "soon"})).is_err());
    }
}
