/// Elasticsearch-backed catalog
///
/// Speaks the `_search` JSON API directly over HTTP. Three request shapes
/// cover the whole surface: a boolean query with pagination and a name
/// spelling-suggestion block, a constant-score term lookup by catalog id,
/// and a more-like-this query for recommendations. Single-document and
/// recommendation lookups are cached.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::db::{Cache, CacheKey};
use crate::error::{AppError, AppResult};
use crate::models::{BoardGame, GameDocument, GameSummary, Page, SearchHit, SearchResults};
use crate::services::providers::Catalog;
use crate::services::query::SearchQuery;
use crate::with_cache;

const GAME_CACHE_TTL: u64 = 3600; // 1 hour
const SIMILAR_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct ElasticCatalog {
    http_client: HttpClient,
    base_url: String,
    index: String,
    username: String,
    password: Option<String>,
    cache: Cache,
}

// Raw engine response types

#[derive(Debug, Deserialize)]
struct EsResponse {
    hits: EsHits,
    #[serde(default)]
    suggest: Value,
}

#[derive(Debug, Deserialize)]
struct EsHits {
    total: EsTotal,
    hits: Vec<EsHit>,
}

#[derive(Debug, Deserialize)]
struct EsTotal {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct EsHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: BoardGame,
}

/// Full `_search` envelope for a boolean catalog search. The query's clause
/// lists are embedded verbatim; the suggestion block asks for corrections of
/// terms missing from the name field.
fn search_body(query: &SearchQuery, page: Page, suggest_text: Option<&str>) -> Value {
    let mut body = json!({
        "query": {
            "bool": {
                "must": query.must,
                "filter": query.filter,
            }
        },
        "from": page.from,
        "size": page.size,
    });

    if let Some(text) = suggest_text {
        body["suggest"] = json!({
            "text": text,
            "name-suggestion": {
                "term": {
                    "field": "name",
                    "suggest_mode": "missing",
                }
            }
        });
    }

    body
}

fn term_body(bg_id: u64) -> Value {
    json!({
        "query": {
            "constant_score": {
                "filter": {
                    "term": { "id": bg_id }
                }
            }
        },
        "size": 1,
    })
}

fn similar_body(es_ids: &[String], size: usize) -> Value {
    let like: Vec<Value> = es_ids.iter().map(|id| json!({ "_id": id })).collect();
    json!({
        "query": {
            "more_like_this": {
                "fields": ["name", "description", "boardgame_subdomain"],
                "like": like,
                "min_term_freq": 1,
                "min_doc_freq": 5,
                "max_query_terms": 20,
            }
        },
        "size": size,
    })
}

impl ElasticCatalog {
    pub fn new(cache: Cache, config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: config.elastic_url.clone(),
            index: config.elastic_index.clone(),
            username: config.elastic_username.clone(),
            password: config.elastic_password.clone(),
            cache,
        }
    }

    async fn execute(&self, body: &Value) -> AppResult<EsResponse> {
        let url = format!("{}/{}/_search", self.base_url, self.index);

        let mut request = self.http_client.post(&url).json(body);
        if let Some(password) = &self.password {
            request = request.basic_auth(&self.username, Some(password));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::SearchEngine(format!(
                "Search engine returned status {}: {}",
                status, text
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_game(&self, bg_id: u64) -> AppResult<Option<GameDocument>> {
        let response = self.execute(&term_body(bg_id)).await?;

        let document = response.hits.hits.into_iter().next().map(|hit| GameDocument {
            es_id: hit.id,
            source: hit.source,
        });

        if document.is_none() {
            tracing::debug!(bg_id, "Game not found in catalog index");
        }

        Ok(document)
    }

    async fn fetch_similar(&self, es_ids: &[String], size: usize) -> AppResult<Vec<GameSummary>> {
        let response = self.execute(&similar_body(es_ids, size)).await?;

        let summaries: Vec<GameSummary> = response
            .hits
            .hits
            .into_iter()
            .map(|hit| GameSummary::from(hit.source))
            .collect();

        tracing::info!(
            sources = es_ids.len(),
            recommendations = summaries.len(),
            "Recommendations fetched"
        );

        Ok(summaries)
    }
}

#[async_trait::async_trait]
impl Catalog for ElasticCatalog {
    async fn search(
        &self,
        query: &SearchQuery,
        page: Page,
        suggest_text: Option<String>,
    ) -> AppResult<SearchResults> {
        let body = search_body(query, page, suggest_text.as_deref());
        let response = self.execute(&body).await?;

        tracing::info!(
            total = response.hits.total.value,
            returned = response.hits.hits.len(),
            from = page.from,
            "Catalog search completed"
        );

        Ok(SearchResults {
            total: response.hits.total.value,
            hits: response
                .hits
                .hits
                .into_iter()
                .map(|hit| SearchHit {
                    score: hit.score,
                    game: hit.source,
                })
                .collect(),
            suggest: response.suggest,
        })
    }

    async fn get_game(&self, bg_id: u64) -> AppResult<Option<GameDocument>> {
        with_cache!(
            self.cache,
            CacheKey::Game(bg_id),
            GAME_CACHE_TTL,
            self.fetch_game(bg_id)
        )
    }

    async fn similar_games(&self, es_ids: &[String], size: usize) -> AppResult<Vec<GameSummary>> {
        if es_ids.is_empty() {
            return Ok(Vec::new());
        }

        with_cache!(
            self.cache,
            CacheKey::Similar(es_ids.join(","), size),
            SIMILAR_CACHE_TTL,
            self.fetch_similar(es_ids, size)
        )
    }
}
