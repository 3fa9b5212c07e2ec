use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::{BoardGame, ChatTurn, GameCandidate, GameSummary, Page, SearchHit};
use crate::services::picker::{self, PickConstraints};
use crate::services::providers::hydrate_candidates;
use crate::services::query::{build_query, FilterCriteria, NumericParam};

use super::AppState;

const DEFAULT_PAGE_SIZE: u32 = 32;
const RECOMMENDATION_COUNT: usize = 4;

// Request/Response types

/// Raw search parameters, straight off the query string. All filter fields
/// are optional strings; validation happens in the filter builder, which
/// treats malformed numbers as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub size: Option<u32>,
    pub page: Option<u32>,
    /// Minimum recommended age
    pub mnage: Option<String>,
    /// Player count bounds
    pub mnpl: Option<String>,
    pub mxpl: Option<String>,
    /// Playtime bounds
    pub mnpt: Option<String>,
    pub mxpt: Option<String>,
    /// Publication year bounds
    pub mnyr: Option<String>,
    pub mxyr: Option<String>,
    /// Facets: designer, publisher, subdomain
    pub bgds: Option<String>,
    pub bgpb: Option<String>,
    pub bgsd: Option<String>,
}

impl SearchParams {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            min_age: NumericParam::parse(self.mnage.as_deref()),
            min_players: NumericParam::parse(self.mnpl.as_deref()),
            max_players: NumericParam::parse(self.mxpl.as_deref()),
            min_playtime: NumericParam::parse(self.mnpt.as_deref()),
            max_playtime: NumericParam::parse(self.mxpt.as_deref()),
            min_year: NumericParam::parse(self.mnyr.as_deref()),
            max_year: NumericParam::parse(self.mxyr.as_deref()),
            designer: self.bgds.clone(),
            publisher: self.bgpb.clone(),
            subdomain: self.bgsd.clone(),
            query_text: self.query.clone(),
        }
    }

    /// 1-based page number mapped to an offset; page 0/1 both mean the
    /// first window. Both values come straight from the caller, so the
    /// offset saturates instead of overflowing.
    fn page(&self) -> Page {
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        let from = match self.page {
            Some(page) if page > 1 => (page - 1).saturating_mul(size),
            _ => 0,
        };
        Page { from, size }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub total: u64,
    pub results: Vec<SearchHit>,
    pub suggest: Value,
}

#[derive(Debug, Serialize)]
pub struct GameDetailResponse {
    #[serde(flatten)]
    pub game: BoardGame,
    pub recommendation: Vec<GameSummary>,
}

#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub game_ids: Vec<u64>,
    #[serde(flatten)]
    pub constraints: PickConstraints,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Faceted catalog search with optional range filters and free text
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let Some(query_text) = params.query.clone() else {
        return Err(AppError::InvalidInput("query is required".to_string()));
    };

    let query = build_query(&params.criteria());

    tracing::info!(
        must_clauses = query.must.len(),
        filter_clauses = query.filter.len(),
        "Executing catalog search"
    );

    let results = state
        .catalog
        .search(&query, params.page(), Some(query_text))
        .await?;

    Ok(Json(SearchResponse {
        total: results.total,
        results: results.hits,
        suggest: results.suggest,
    }))
}

/// Single game by catalog id, with content-based recommendations
pub async fn get_game(
    State(state): State<AppState>,
    Path(bg_id): Path<u64>,
) -> AppResult<Json<GameDetailResponse>> {
    let Some(document) = state.catalog.get_game(bg_id).await? else {
        return Err(AppError::NotFound("Boardgame not found".to_string()));
    };

    let recommendation = state
        .catalog
        .similar_games(&[document.es_id.clone()], RECOMMENDATION_COUNT)
        .await?;

    Ok(Json(GameDetailResponse {
        game: document.source,
        recommendation,
    }))
}

/// Uniform random pick from the games satisfying all supplied constraints.
/// Responds with a 0- or 1-element array; no match is a valid outcome, not
/// an error.
pub async fn random_pick(
    State(state): State<AppState>,
    Json(request): Json<PickRequest>,
) -> AppResult<Json<Vec<GameCandidate>>> {
    let candidates = hydrate_candidates(state.catalog.clone(), request.game_ids).await?;

    tracing::info!(candidates = candidates.len(), "Candidates hydrated");

    let selection = picker::pick(candidates, &request.constraints);
    Ok(Json(selection.into_iter().collect()))
}

/// One assistant exchange; conversation history travels with the request
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidInput("message is required".to_string()));
    }

    let answer = state
        .assistant
        .ask(&request.message, &request.history)
        .await?;

    Ok(Json(ChatResponse { answer }))
}
