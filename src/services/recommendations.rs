use crate::{
    models::{RecommendationQuery, Recommendations, ScoredTitle},
    services::{catalog::Catalog, similarity::cosine_similarity},
};

pub const NO_MATCHES_MESSAGE: &str = "No films with that rating.";

/// Ranks catalog titles by similarity to the query
///
/// Titles are restricted to the requested rating, scored with cosine
/// similarity over the raw `(duration, release_year)` vector, sorted by
/// descending score and truncated to `query.limit`. Equal scores keep
/// catalog order.
pub fn recommend(catalog: &Catalog, query: &RecommendationQuery) -> Recommendations {
    let target = query.features();

    // Restrict to the requested rating and score what is left
    let mut scored: Vec<ScoredTitle> = catalog
        .entries()
        .iter()
        .filter(|entry| query.rating.matches(&entry.rating))
        .map(|entry| ScoredTitle {
            similarity: cosine_similarity(&target, &entry.features()),
            entry: entry.clone(),
        })
        .collect();

    if scored.is_empty() {
        tracing::info!(rating = %query.rating, "No titles match rating filter");
        return Recommendations::NoMatches {
            message: NO_MATCHES_MESSAGE.to_string(),
        };
    }

    // Stable sort, so equal scores keep catalog order
    let candidates = scored.len();
    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(query.limit);

    tracing::debug!(
        candidates,
        returned = scored.len(),
        "Ranked recommendations"
    );

    Recommendations::Ranked {
        recommendations: scored,
    }
}
