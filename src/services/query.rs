/// Search query construction
///
/// Turns raw, optionally-absent query parameters into the boolean query
/// handed to the catalog index: a `filter` list of range clauses and a
/// `must` list of match/relevance clauses. Construction is pure and
/// append-only, and clauses are emitted in a fixed field order so the same
/// criteria always produce the same query.
use serde_json::{json, Value};

/// A raw numeric query parameter after validation.
///
/// The three states are deliberately distinct: a field that was never
/// supplied, a field that was supplied but does not parse as an integer,
/// and a field with a usable value. Both `Absent` and `Invalid` emit no
/// clause; malformed input is swallowed rather than surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericParam {
    #[default]
    Absent,
    Invalid,
    Value(i64),
}

impl NumericParam {
    /// Parses an optional raw string parameter.
    ///
    /// Missing, empty, and whitespace-only input is `Absent`; anything else
    /// that fails integer parsing is `Invalid`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => NumericParam::Absent,
            Some(text) => text
                .parse::<i64>()
                .map(NumericParam::Value)
                .unwrap_or(NumericParam::Invalid),
        }
    }

    fn value(self) -> Option<i64> {
        match self {
            NumericParam::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Validated per-request search criteria.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub min_age: NumericParam,
    pub min_players: NumericParam,
    pub max_players: NumericParam,
    pub min_playtime: NumericParam,
    pub max_playtime: NumericParam,
    pub min_year: NumericParam,
    pub max_year: NumericParam,
    pub designer: Option<String>,
    pub publisher: Option<String>,
    pub subdomain: Option<String>,
    pub query_text: Option<String>,
}

/// Clause lists embedded verbatim into the search engine request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub must: Vec<Value>,
    pub filter: Vec<Value>,
}

// Range clause stages, one per field. Each stage is independent: it either
// contributes exactly one clause or nothing at all.

fn min_age_clause(param: NumericParam) -> Option<Value> {
    match param.value() {
        Some(v) if v > 0 => Some(json!({ "range": { "age": { "gte": v } } })),
        _ => None,
    }
}

// A minimum party size is satisfied by games whose own minimum player count
// is at or below it, hence `lte`. A non-positive bound flips the comparison;
// preserved as observed pending product-owner confirmation.
fn min_players_clause(param: NumericParam) -> Option<Value> {
    match param.value() {
        Some(v) if v > 0 => Some(json!({ "range": { "min_players": { "lte": v } } })),
        Some(v) => Some(json!({ "range": { "min_players": { "gte": v } } })),
        None => None,
    }
}

fn max_players_clause(param: NumericParam) -> Option<Value> {
    match param.value() {
        Some(v) if v > 0 => Some(json!({ "range": { "max_players": { "gte": v } } })),
        _ => None,
    }
}

// Playtime mirrors the player-count pair, including the sign-dependent
// branch on the minimum bound.
fn min_playtime_clause(param: NumericParam) -> Option<Value> {
    match param.value() {
        Some(v) if v > 0 => Some(json!({ "range": { "min_playtime": { "lte": v } } })),
        Some(v) => Some(json!({ "range": { "min_playtime": { "gte": v } } })),
        None => None,
    }
}

fn max_playtime_clause(param: NumericParam) -> Option<Value> {
    match param.value() {
        Some(v) if v > 0 => Some(json!({ "range": { "max_playtime": { "gte": v } } })),
        _ => None,
    }
}

fn min_year_clause(param: NumericParam) -> Option<Value> {
    match param.value() {
        Some(v) if v > 0 => Some(json!({ "range": { "year_published": { "gte": v } } })),
        _ => None,
    }
}

fn max_year_clause(param: NumericParam) -> Option<Value> {
    match param.value() {
        Some(v) if v > 0 => Some(json!({ "range": { "year_published": { "lte": v } } })),
        _ => None,
    }
}

fn present(facet: &Option<String>) -> Option<&str> {
    facet.as_deref().filter(|s| !s.is_empty())
}

/// One match clause per present facet, in designer/publisher/subdomain order.
fn facet_clauses(criteria: &FilterCriteria) -> Vec<Value> {
    let mut clauses = Vec::new();
    if let Some(designer) = present(&criteria.designer) {
        clauses.push(json!({ "match": { "boardgame_designer": designer } }));
    }
    if let Some(publisher) = present(&criteria.publisher) {
        clauses.push(json!({ "match": { "boardgame_publisher": publisher } }));
    }
    if let Some(subdomain) = present(&criteria.subdomain) {
        clauses.push(json!({ "match": { "boardgame_subdomain": subdomain } }));
    }
    clauses
}

/// Weighted free-text clause: best-of-fields across name (boosted) and
/// description, 0.3 tie-breaker for non-best fields, typo tolerance scaled
/// to term length.
fn relevance_clause(query_text: &str) -> Value {
    json!({
        "multi_match": {
            "query": query_text,
            "type": "best_fields",
            "fields": ["name^3", "description"],
            "tie_breaker": 0.3,
            "fuzziness": "AUTO",
        }
    })
}

/// Builds the full search query for one request.
///
/// Range clauses are appended in fixed field order (age, min/max players,
/// min/max playtime, min/max year). The match list carries one clause per
/// present facet; when no facet and no free text is supplied a single
/// catch-all clause matches every document.
pub fn build_query(criteria: &FilterCriteria) -> SearchQuery {
    let filter: Vec<Value> = [
        min_age_clause(criteria.min_age),
        min_players_clause(criteria.min_players),
        max_players_clause(criteria.max_players),
        min_playtime_clause(criteria.min_playtime),
        max_playtime_clause(criteria.max_playtime),
        min_year_clause(criteria.min_year),
        max_year_clause(criteria.max_year),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut must = facet_clauses(criteria);
    let query_text = criteria.query_text.as_deref().filter(|q| !q.is_empty());

    if must.is_empty() && query_text.is_none() {
        must.push(json!({ "match_all": {} }));
    }

    if let Some(text) = query_text {
        must.push(relevance_clause(text));
    }

    SearchQuery { must, filter }
}
