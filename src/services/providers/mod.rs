/// Catalog backend abstraction
///
/// The board game catalog lives in an external search index. Everything the
/// application needs from it goes through the `Catalog` trait: boolean
/// search, single-document lookup by catalog id, and more-like-this
/// recommendations. Keeping the surface this narrow lets tests substitute an
/// in-memory catalog.
use std::sync::Arc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::{GameCandidate, GameDocument, GameSummary, Page, SearchResults};
use crate::services::query::SearchQuery;

pub mod elastic;

pub use elastic::ElasticCatalog;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Runs a boolean search over the catalog index.
    ///
    /// The query's clause lists are embedded verbatim into the engine
    /// request; pagination and the spelling-suggestion block are owned by
    /// the backend.
    async fn search(
        &self,
        query: &SearchQuery,
        page: Page,
        suggest_text: Option<String>,
    ) -> AppResult<SearchResults>;

    /// Looks up a single document by its catalog id.
    async fn get_game(&self, bg_id: u64) -> AppResult<Option<GameDocument>>;

    /// Content-based recommendations for the given source documents.
    async fn similar_games(&self, es_ids: &[String], size: usize) -> AppResult<Vec<GameSummary>>;
}

/// Hydrates pick candidates from the catalog, one lookup per id, in
/// parallel.
///
/// Ids missing from the index are skipped with a warning rather than
/// failing the pick; the request only errors when every lookup failed.
/// Result order follows the input id order.
pub async fn hydrate_candidates(
    catalog: Arc<dyn Catalog>,
    game_ids: Vec<u64>,
) -> AppResult<Vec<GameCandidate>> {
    let mut tasks = Vec::new();

    for bg_id in game_ids {
        let catalog = catalog.clone();
        tasks.push(tokio::spawn(async move {
            (bg_id, catalog.get_game(bg_id).await)
        }));
    }

    let mut candidates = Vec::new();
    let mut failures = 0;

    for task in tasks {
        match task.await {
            Ok((_, Ok(Some(document)))) => candidates.push(GameCandidate::from(document.source)),
            Ok((bg_id, Ok(None))) => {
                tracing::warn!(bg_id, "Game missing from catalog index, skipping");
            }
            Ok((bg_id, Err(e))) => {
                tracing::error!(bg_id, error = %e, "Candidate hydration failed");
                failures += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                failures += 1;
            }
        }
    }

    if candidates.is_empty() && failures > 0 {
        return Err(AppError::SearchEngine(
            "Failed to hydrate any pick candidates".to_string(),
        ));
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoardGame;
    use serde_json::json;

    fn document(bg_id: u64) -> GameDocument {
        let source: BoardGame = serde_json::from_value(json!({
            "id": bg_id,
            "name": format!("Game {}", bg_id),
            "min_players": 2,
            "max_players": 4,
            "min_playtime": 30,
            "max_playtime": 60,
            "age": 10
        }))
        .unwrap();
        GameDocument {
            es_id: format!("es-{}", bg_id),
            source,
        }
    }

    #[tokio::test]
    async fn test_hydrate_skips_missing_games() {
        let mut catalog = MockCatalog::new();
        catalog.expect_get_game().returning(|bg_id| {
            if bg_id == 404 {
                Ok(None)
            } else {
                Ok(Some(document(bg_id)))
            }
        });

        let candidates = hydrate_candidates(Arc::new(catalog), vec![1, 404, 2])
            .await
            .unwrap();

        let ids: Vec<u64> = candidates.iter().map(|c| c.bg_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_hydrate_tolerates_partial_failures() {
        let mut catalog = MockCatalog::new();
        catalog.expect_get_game().returning(|bg_id| {
            if bg_id == 2 {
                Err(AppError::SearchEngine("index unreachable".to_string()))
            } else {
                Ok(Some(document(bg_id)))
            }
        });

        let candidates = hydrate_candidates(Arc::new(catalog), vec![1, 2])
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].bg_id, 1);
    }

    #[tokio::test]
    async fn test_hydrate_errors_when_everything_fails() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_get_game()
            .returning(|_| Err(AppError::SearchEngine("index unreachable".to_string())));

        let result = hydrate_candidates(Arc::new(catalog), vec![1, 2]).await;
        assert!(matches!(result, Err(AppError::SearchEngine(_))));
    }

    #[tokio::test]
    async fn test_hydrate_empty_id_list_is_empty() {
        let catalog = MockCatalog::new();
        let candidates = hydrate_candidates(Arc::new(catalog), Vec::new())
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }
}
