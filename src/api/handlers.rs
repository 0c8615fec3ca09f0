//! Request handlers for the API endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, HealthResponse, ModelInfo, PredictionResponse};
use crate::energy::EnergyType;
use crate::error::PredictError;
use crate::features::{self, RawFields};

/// HTTP status for each prediction failure kind.
fn status_for(e: &PredictError) -> StatusCode {
    match e {
        PredictError::UnknownEnergyType(_) | PredictError::FieldParse { .. } => {
            StatusCode::BAD_REQUEST
        }
        PredictError::Configuration { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PredictError::ModelInvocation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Runs a prediction for a submitted form.
///
/// `POST /predict` (form body with `energy_type` + fields) → 200 + `PredictionResponse`
/// Unknown type or bad field → 400, missing artifact → 503, model failure → 500,
/// each with an `ErrorResponse` body.
pub async fn post_predict(
    State(state): State<Arc<AppState>>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let fields = RawFields::from(form);

    // Artifact reads and scoring are blocking.
    let outcome = tokio::task::spawn_blocking(move || {
        let energy_type = fields.require_str("energy_type")?;
        state.dispatcher.predict(energy_type, &fields)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => Ok(Json(PredictionResponse::from(result))),
        Ok(Err(e)) => {
            tracing::warn!(kind = e.kind(), error = %e, "prediction failed");
            Err((status_for(&e), Json(ErrorResponse::from(&e))))
        }
        Err(e) => {
            tracing::error!(error = %e, "prediction task aborted");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    message: format!("Error occurred: {e}"),
                    kind: "model_invocation",
                }),
            ))
        }
    }
}

/// Lists the model binding table.
///
/// `GET /models` → 200 + `Vec<ModelInfo>` JSON
pub async fn get_models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelInfo>> {
    let dispatcher = &state.dispatcher;
    let models = EnergyType::ALL
        .into_iter()
        .filter_map(|ty| {
            dispatcher.bindings().get(ty).map(|binding| ModelInfo {
                energy_type: ty,
                path: binding.path.clone(),
                co2_factor: binding.co2_factor,
                available: dispatcher.is_available(ty),
                columns: features::columns(ty),
            })
        })
        .collect();
    Json(models)
}

/// Liveness probe.
///
/// `GET /health` → 200 + `HealthResponse` JSON
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::Request;
    use axum::http::header::CONTENT_TYPE;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::dispatch::Dispatcher;
    use crate::features::EncodeOptions;
    use crate::model::{FileModelLoader, ModelBindings};

    /// Dispatcher bound to `dir` with only a solar artifact present.
    fn make_test_state(dir: &Path) -> Arc<AppState> {
        std::fs::write(
            dir.join("solar.json"),
            r#"{"kind": "linear", "intercept": 100.0, "columns": [
                {"type": "numeric", "name": "avg_temp", "weight": 1.0},
                {"type": "numeric", "name": "avg_irradiance", "weight": 10.0},
                {"type": "numeric", "name": "peak_capacity", "weight": 2.0},
                {"type": "numeric", "name": "State_Madhya Pradesh", "weight": 0.0},
                {"type": "numeric", "name": "State_Maharashtra", "weight": 0.0},
                {"type": "numeric", "name": "State_Rajasthan", "weight": 5.0},
                {"type": "numeric", "name": "State_Uttarakhand", "weight": 0.0}
            ]}"#,
        )
        .unwrap();
        let dispatcher = Dispatcher::new(
            ModelBindings::with_defaults(dir),
            Arc::new(FileModelLoader),
            EncodeOptions::default(),
        );
        Arc::new(AppState { dispatcher })
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn predict_solar_returns_200() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(make_test_state(dir.path()));

        let resp = app
            .oneshot(form_request(
                "energy_type=solar&avg_temp_solar=25&avg_irradiance=5&peak_capacity_solar=10&state_solar=Rajasthan",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        // 100 + 25 + 50 + 20 + 5
        assert_eq!(json["energy_type"], "Solar");
        assert_eq!(json["prediction"], 200.0);
        assert_eq!(json["co2_mitigated"], 305.4);
        assert_eq!(json["carbon_credits"], 305.4);
    }

    #[tokio::test]
    async fn invalid_energy_type_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(make_test_state(dir.path()));

        let resp = app
            .oneshot(form_request("energy_type=geothermal"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert_eq!(json["message"], "Invalid energy type selected.");
        assert_eq!(json["kind"], "unknown_energy_type");
    }

    #[tokio::test]
    async fn missing_energy_type_is_field_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(make_test_state(dir.path()));

        let resp = app.oneshot(form_request("avg_temp_solar=1")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        assert_eq!(json["kind"], "field_parse");
    }

    #[tokio::test]
    async fn non_numeric_field_returns_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(make_test_state(dir.path()));

        let resp = app
            .oneshot(form_request(
                "energy_type=solar&avg_temp_solar=abc&avg_irradiance=5&peak_capacity_solar=10&state_solar=Rajasthan",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = json_body(resp).await;
        let message = json["message"].as_str().unwrap_or_default();
        assert!(message.starts_with("Error occurred: field `avg_temp_solar`"), "{message}");
    }

    #[tokio::test]
    async fn missing_artifact_returns_503() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(make_test_state(dir.path()));

        let resp = app
            .oneshot(form_request(
                "energy_type=hydro&head_height=10&flow_rate=2&turbine_efficiency=90&peak_capacity_hydro=4&scale=Small",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = json_body(resp).await;
        assert_eq!(json["message"], "Model file not found for hydro");
    }

    #[tokio::test]
    async fn models_lists_availability() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(make_test_state(dir.path()));

        let req = Request::builder()
            .uri("/models")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = json_body(resp).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["energy_type"], "solar");
        assert_eq!(rows[0]["available"], true);
        assert_eq!(rows[0]["co2_factor"], 1.527);
        assert_eq!(rows[0]["columns"].as_array().map(Vec::len), Some(7));
        assert_eq!(rows[3]["energy_type"], "hydro");
        assert_eq!(rows[3]["available"], false);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(make_test_state(dir.path()));

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["status"], "ok");
    }
}
