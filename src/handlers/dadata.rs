use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::utils::suggest::{normalize_countries, normalize_suggestions, Countries, Suggestion};
use crate::AppState;

const DADATA_URL: &str = "https://suggestions.dadata.ru/suggestions/api/4_1/rs/suggest/address";

#[derive(Debug, Deserialize)]
pub struct CitySuggestRequest {
    pub query: Option<String>,
    pub countries: Option<Countries>,
}

#[derive(Debug, Serialize)]
pub struct CitySuggestResponse {
    pub data: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct DadataResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

/// POST /api/dadata/cities
///
/// City autocomplete: one upstream request per country code, flattened,
/// then filtered to city/settlement level and deduplicated.
pub async fn cities(
    State(state): State<AppState>,
    Json(payload): Json<CitySuggestRequest>,
) -> AppResult<Json<CitySuggestResponse>> {
    let query = payload.query.unwrap_or_default().trim().to_string();

    // Too short to be worth an upstream call
    if query.chars().count() < 2 {
        return Ok(Json(CitySuggestResponse { data: Vec::new() }));
    }

    let (Some(api_key), Some(secret)) = (
        state.config.dadata_api_key.as_deref(),
        state.config.dadata_secret.as_deref(),
    ) else {
        return Err(AppError::Internal("Dadata не настроена".to_string()));
    };

    let countries = normalize_countries(
        payload.countries.as_ref(),
        &state.config.dadata_default_countries,
    );

    let mut suggestions: Vec<Suggestion> = Vec::new();
    for country in &countries {
        let body = serde_json::json!({
            "query": query,
            "count": 10,
            "from_bound": { "value": "city" },
            "to_bound": { "value": "settlement" },
            "locations": [{ "country_iso_code": country }],
        });

        let response = state
            .http
            .post(DADATA_URL)
            .header("Authorization", format!("Token {}", api_key))
            .header("X-Secret", secret)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Ошибка Dadata: {}", e)))?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!("Ошибка Dadata: {}", detail)));
        }

        let parsed: DadataResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Ошибка Dadata: {}", e)))?;
        suggestions.extend(parsed.suggestions);
    }

    Ok(Json(CitySuggestResponse {
        data: normalize_suggestions(suggestions),
    }))
}
