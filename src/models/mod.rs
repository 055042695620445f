use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::CatalogError;

pub const MIN_DURATION: u32 = 1;
pub const MAX_DURATION: u32 = 500;
pub const MIN_RELEASE_YEAR: i32 = 1900;
pub const MAX_RELEASE_YEAR: i32 = 2025;

/// Label used by the rating selector to disable rating filtering
pub const ALL_RATINGS: &str = "All";

/// A cleaned catalog row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    /// Minutes for films, season count for series
    pub duration: f64,
    pub release_year: f64,
    pub rating: String,
}

impl CatalogEntry {
    /// The `(duration, release_year)` vector the scorer compares against
    pub fn features(&self) -> [f64; 2] {
        [self.duration, self.release_year]
    }

    pub fn value(&self, column: FeatureColumn) -> f64 {
        match column {
            FeatureColumn::Duration => self.duration,
            FeatureColumn::ReleaseYear => self.release_year,
        }
    }
}

/// Numeric catalog columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    Duration,
    ReleaseYear,
}

impl Display for FeatureColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureColumn::Duration => write!(f, "duration"),
            FeatureColumn::ReleaseYear => write!(f, "release_year"),
        }
    }
}

impl FromStr for FeatureColumn {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "duration" => Ok(FeatureColumn::Duration),
            "release_year" => Ok(FeatureColumn::ReleaseYear),
            other => Err(CatalogError::UnknownColumn(other.to_string())),
        }
    }
}

/// Rating restriction applied before scoring
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RatingFilter {
    #[default]
    All,
    Only(String),
}

impl RatingFilter {
    pub fn matches(&self, rating: &str) -> bool {
        match self {
            RatingFilter::All => true,
            RatingFilter::Only(wanted) => wanted == rating,
        }
    }
}

impl From<&str> for RatingFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_RATINGS {
            RatingFilter::All
        } else {
            RatingFilter::Only(value.to_string())
        }
    }
}

impl Display for RatingFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RatingFilter::All => write!(f, "{}", ALL_RATINGS),
            RatingFilter::Only(rating) => write!(f, "{}", rating),
        }
    }
}

/// A validated recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub duration: u32,
    pub release_year: i32,
    pub rating: RatingFilter,
    pub limit: usize,
}

impl RecommendationQuery {
    pub fn features(&self) -> [f64; 2] {
        [f64::from(self.duration), f64::from(self.release_year)]
    }
}

/// A catalog entry with its similarity to the query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredTitle {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub similarity: f64,
}

/// Outcome of a recommendation request
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendations {
    /// Titles in descending similarity order
    Ranked { recommendations: Vec<ScoredTitle> },
    /// The rating filter left nothing to score
    NoMatches { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_filter_from_all() {
        assert_eq!(RatingFilter::from("All"), RatingFilter::All);
        assert_eq!(RatingFilter::from(""), RatingFilter::All);
        assert_eq!(
            RatingFilter::from(" PG-13 "),
            RatingFilter::Only("PG-13".to_string())
        );
    }

    #[test]
    fn test_rating_filter_matches() {
        assert!(RatingFilter::All.matches("R"));
        assert!(RatingFilter::Only("R".to_string()).matches("R"));
        assert!(!RatingFilter::Only("R".to_string()).matches("PG"));
    }

    #[test]
    fn test_feature_column_round_trip_names() {
        assert_eq!("duration".parse::<FeatureColumn>().unwrap(), FeatureColumn::Duration);
        assert_eq!(FeatureColumn::ReleaseYear.to_string(), "release_year");
        assert!("rating".parse::<FeatureColumn>().is_err());
    }

    #[test]
    fn test_recommendations_serialize_tagged() {
        let outcome = Recommendations::NoMatches {
            message: "No films with that rating.".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_matches");
        assert_eq!(json["message"], "No films with that rating.");
    }

    #[test]
    fn test_scored_title_serializes_flat() {
        let scored = ScoredTitle {
            entry: CatalogEntry {
                title: "Inception".to_string(),
                duration: 148.0,
                release_year: 2010.0,
                rating: "PG-13".to_string(),
            },
            similarity: 0.99,
        };
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["title"], "Inception");
        assert_eq!(json["similarity"], 0.99);
    }
}
