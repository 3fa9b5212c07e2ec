use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A catalog document as stored in the search index.
///
/// The index field is named `age`; everywhere else in the API it is the
/// game's minimum recommended age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardGame {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year_published: Option<i32>,
    #[serde(default)]
    pub min_players: u32,
    #[serde(default)]
    pub max_players: u32,
    #[serde(default)]
    pub min_playtime: u32,
    #[serde(default)]
    pub max_playtime: u32,
    #[serde(rename = "age", default)]
    pub min_age: u32,
    #[serde(default)]
    pub boardgame_designer: Option<String>,
    #[serde(default)]
    pub boardgame_publisher: Option<String>,
    #[serde(default)]
    pub boardgame_subdomain: Option<String>,
}

/// A catalog document together with its search-engine document id, which is
/// what more-like-this lookups are keyed by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDocument {
    pub es_id: String,
    pub source: BoardGame,
}

/// Display-oriented subset used in recommendation lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub bg_id: u64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<BoardGame> for GameSummary {
    fn from(game: BoardGame) -> Self {
        Self {
            bg_id: game.id,
            name: game.name,
            image: game.image,
        }
    }
}

/// One board game being evaluated for random selection. Request-scoped:
/// hydrated from the catalog, filtered, and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCandidate {
    pub bg_id: u64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    pub min_age: u32,
    pub min_players: u32,
    pub max_players: u32,
    pub min_playtime: u32,
    pub max_playtime: u32,
}

impl From<BoardGame> for GameCandidate {
    fn from(game: BoardGame) -> Self {
        Self {
            bg_id: game.id,
            name: game.name,
            image: game.image,
            min_age: game.min_age,
            min_players: game.min_players,
            max_players: game.max_players,
            min_playtime: game.min_playtime,
            max_playtime: game.max_playtime,
        }
    }
}

/// Pagination window for catalog searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub from: u32,
    pub size: u32,
}

/// One scored search hit returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: Option<f64>,
    #[serde(flatten)]
    pub game: BoardGame,
}

/// Search results as returned by the catalog, suggestion block included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub total: u64,
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub suggest: Value,
}

/// One prior exchange in an assistant conversation. History is supplied by
/// the client with each request; nothing is persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}
