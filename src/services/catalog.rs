use std::{collections::BTreeSet, fs::File, io::Read, path::Path};

use crate::{
    error::CatalogError,
    models::{CatalogEntry, FeatureColumn},
    services::cleaning::{
        is_numeric, parse_duration, parse_rating_code, parse_release_year, rating_label,
        remove_outliers,
    },
};

/// Columns the catalog CSV must provide, in report order
pub const REQUIRED_COLUMNS: [&str; 4] = ["title", "duration", "release_year", "rating"];

/// Options applied once while building the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningOptions {
    /// Columns stripped of IQR outliers, applied in order
    pub outlier_columns: Vec<FeatureColumn>,
}

/// Positions of the required columns in the header row
struct Schema {
    title: usize,
    duration: usize,
    release_year: usize,
    rating: usize,
}

impl Schema {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, CatalogError> {
        let position = |name: &str| headers.iter().position(|header| header.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(**name).is_none())
            .map(|name| name.to_string())
            .collect();

        let (Some(title), Some(duration), Some(release_year), Some(rating)) = (
            position("title"),
            position("duration"),
            position("release_year"),
            position("rating"),
        ) else {
            return Err(CatalogError::MissingColumns(missing));
        };

        Ok(Self {
            title,
            duration,
            release_year,
            rating,
        })
    }
}

/// Required fields of one record before coercion
struct RawRow {
    title: String,
    duration: String,
    release_year: String,
    rating: String,
}

impl RawRow {
    fn from_record(record: &csv::StringRecord, schema: &Schema) -> Self {
        let field = |index: usize| record.get(index).unwrap_or_default().trim().to_string();
        Self {
            title: field(schema.title),
            duration: field(schema.duration),
            release_year: field(schema.release_year),
            rating: field(schema.rating),
        }
    }
}

/// The cleaned, read-only title catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Loads and cleans the catalog CSV at `path`
    pub fn from_path(path: impl AsRef<Path>, options: &CleaningOptions) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading catalog");
        let file = File::open(path)?;
        Self::from_reader(file, options)
    }

    /// Loads and cleans catalog CSV data from any reader
    pub fn from_reader<R: Read>(reader: R, options: &CleaningOptions) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new().from_reader(reader);

        // 1. Validate the header before touching any rows
        let schema = Schema::from_headers(reader.headers()?)?;

        // 2. Collect raw fields, skipping records with the wrong field count
        let mut raw_rows = Vec::new();
        let mut malformed = 0usize;
        for record in reader.records() {
            match record {
                Ok(record) => raw_rows.push(RawRow::from_record(&record, &schema)),
                Err(e) if matches!(e.kind(), csv::ErrorKind::UnequalLengths { .. }) => {
                    tracing::debug!(error = %e, "Skipping malformed record");
                    malformed += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // 3. Coerce numerics and normalize ratings
        let total = raw_rows.len() + malformed;
        let mut entries = clean_rows(raw_rows);

        tracing::info!(
            total,
            kept = entries.len(),
            dropped = total - entries.len(),
            "Cleaned catalog rows"
        );

        // 4. Strip outliers column by column, in configured order
        for column in &options.outlier_columns {
            entries = remove_outliers(entries, *column);
        }

        tracing::info!(titles = entries.len(), "Catalog ready");

        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct rating labels, sorted
    pub fn ratings(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.rating.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// A rating column is numeric when every non-empty value is a number.
///
/// Non-integral values in a numeric column fail the code lookup later and
/// their rows are dropped.
fn ratings_are_codes(rows: &[RawRow]) -> bool {
    let mut values = rows.iter().map(|row| row.rating.as_str()).filter(|r| !r.is_empty()).peekable();
    values.peek().is_some() && values.all(is_numeric)
}

fn clean_rows(rows: Vec<RawRow>) -> Vec<CatalogEntry> {
    // Rating encoding is decided once for the whole column
    let numeric_ratings = ratings_are_codes(&rows);
    if numeric_ratings {
        tracing::info!("Rating column is numeric, mapping codes to labels");
    }

    rows.into_iter()
        .filter_map(|row| {
            if row.title.is_empty() {
                return None;
            }

            // Unparsable duration or year drops the row
            let duration = parse_duration(&row.duration)?;
            let release_year = parse_release_year(&row.release_year)?;

            // Codes outside the table drop the row too
            let rating = if numeric_ratings {
                parse_rating_code(&row.rating)
                    .and_then(rating_label)?
                    .to_string()
            } else if row.rating.is_empty() {
                return None;
            } else {
                row.rating
            };

            Some(CatalogEntry {
                title: row.title,
                duration,
                release_year,
                rating,
            })
        })
        .collect()
}
