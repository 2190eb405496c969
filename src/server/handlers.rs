use crate::config::GEMINI_API_KEY_VAR;
use crate::error::ChomptronError;
use crate::server::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NO_INGREDIENTS: &str = "No ingredients provided";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body clients send to `/api/generate-recipe`.
///
/// The handler itself reads the body as loose JSON so that falsy or
/// non-string `ingredients` values get the same answer as the web client
/// expects; this type is the well-formed shape for Rust callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRecipeRequest {
    pub ingredients: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRecipeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateRecipeResponse {
    fn recipe(recipe: String) -> Self {
        Self {
            success: true,
            recipe: Some(recipe),
            error: None,
        }
    }

    fn failure(status: StatusCode, error: impl Into<String>) -> Response {
        let body = Self {
            success: false,
            recipe: None,
            error: Some(error.into()),
        };
        (status, Json(body)).into_response()
    }
}

/// Body of the health and readiness endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn health(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "healthy".to_string(),
        service: Some(state.service_name.to_string()),
        error: None,
    })
}

pub async fn ready(State(state): State<AppState>) -> Response {
    if state.provider.is_none() {
        let body = ServiceStatus {
            status: "not ready".to_string(),
            service: None,
            error: Some(ChomptronError::MissingCredential(GEMINI_API_KEY_VAR).to_string()),
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }

    Json(ServiceStatus {
        status: "ready".to_string(),
        service: Some(state.service_name.to_string()),
        error: None,
    })
    .into_response()
}

/// Generate a recipe from `{"ingredients": ...}`.
///
/// The body is read leniently: anything that is not a JSON object with a
/// truthy `ingredients` value is answered with 400.
pub async fn generate_recipe(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let Some(ingredients) = ingredients_text(&payload["ingredients"]) else {
        debug!("Rejected generation request without ingredients");
        return GenerateRecipeResponse::failure(StatusCode::BAD_REQUEST, NO_INGREDIENTS);
    };

    let Some(provider) = state.provider.clone() else {
        let err = ChomptronError::MissingCredential(GEMINI_API_KEY_VAR);
        error!("Error: {}", err);
        return GenerateRecipeResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
    };

    match crate::generate_recipe(provider.as_ref(), &ingredients).await {
        Ok(recipe) => {
            info!(
                "Generated recipe with {} ({} chars)",
                provider.provider_name(),
                recipe.len()
            );
            Json(GenerateRecipeResponse::recipe(recipe)).into_response()
        }
        Err(e) => {
            error!("Error: {}", e);
            GenerateRecipeResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Text to put in the prompt, or `None` when the value is missing or falsy
/// (`null`, `false`, `0`, `""`).
fn ingredients_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f == 0.0) => None,
        other => Some(other.to_string()),
    }
}
