use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Html,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        RatingFilter, RecommendationQuery, Recommendations, ALL_RATINGS, MAX_DURATION,
        MAX_RELEASE_YEAR, MIN_DURATION, MIN_RELEASE_YEAR,
    },
    services::recommendations,
    views::page::{render_index, render_results, FormValues},
};

use super::AppState;

// Request types

/// Query parameters submitted by the HTML form
#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub duration: i64,
    pub release_year: i64,
    #[serde(default)]
    pub rating: Option<String>,
}

/// Body of the JSON recommendation endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub duration: i64,
    pub release_year: i64,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl RecommendationRequest {
    /// Validates bounds and fills in defaults
    pub fn into_query(self, default_limit: usize) -> AppResult<RecommendationQuery> {
        let duration = u32::try_from(self.duration)
            .ok()
            .filter(|d| (MIN_DURATION..=MAX_DURATION).contains(d))
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "duration must be between {} and {}, got {}",
                    MIN_DURATION, MAX_DURATION, self.duration
                ))
            })?;

        let release_year = i32::try_from(self.release_year)
            .ok()
            .filter(|y| (MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(y))
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "release_year must be between {} and {}, got {}",
                    MIN_RELEASE_YEAR, MAX_RELEASE_YEAR, self.release_year
                ))
            })?;

        let limit = self.limit.unwrap_or(default_limit);
        if limit == 0 {
            return Err(AppError::InvalidInput(
                "limit must be at least 1".to_string(),
            ));
        }

        let rating = self
            .rating
            .as_deref()
            .map(RatingFilter::from)
            .unwrap_or_default();

        Ok(RecommendationQuery {
            duration,
            release_year,
            rating,
            limit,
        })
    }
}

impl From<RecommendParams> for RecommendationRequest {
    fn from(params: RecommendParams) -> Self {
        Self {
            duration: params.duration,
            release_year: params.release_year,
            rating: params.rating,
            limit: None,
        }
    }
}

fn run(state: &AppState, request_id: RequestId, query: &RecommendationQuery) -> Recommendations {
    tracing::info!(
        request_id = %request_id,
        duration = query.duration,
        release_year = query.release_year,
        rating = %query.rating,
        limit = query.limit,
        "Processing recommendation request"
    );

    let outcome = recommendations::recommend(&state.catalog, query);

    match &outcome {
        Recommendations::Ranked { recommendations } => tracing::info!(
            request_id = %request_id,
            returned = recommendations.len(),
            "Recommendations ranked"
        ),
        Recommendations::NoMatches { message } => tracing::warn!(
            request_id = %request_id,
            message = %message,
            "No recommendations"
        ),
    }

    outcome
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "healthy", "titles": state.catalog.len() }))
}

/// Landing page with the query form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.ratings, &FormValues::default()))
}

/// Form submission: renders the warning or the table and chart
pub async fn recommend_page(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> AppResult<Html<String>> {
    let Query(params) = params?;
    let query = RecommendationRequest::from(params).into_query(state.recommendation_count)?;
    let outcome = run(&state, request_id, &query);

    Ok(Html(render_results(
        &state.ratings,
        &query,
        state.catalog.entries(),
        &outcome,
    )))
}

/// Rating choices for the selector, `All` first
pub async fn list_ratings(State(state): State<AppState>) -> Json<Vec<String>> {
    let ratings = std::iter::once(ALL_RATINGS.to_string())
        .chain(state.ratings.iter().cloned())
        .collect();
    Json(ratings)
}

/// JSON recommendation endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    request: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<Recommendations>> {
    let Json(request) = request?;
    let query = request.into_query(state.recommendation_count)?;
    Ok(Json(run(&state, request_id, &query)))
}
