use crate::models::{CatalogEntry, FeatureColumn};

/// Rating labels indexed by their numeric code in encoded catalogs
pub const RATING_CODES: [&str; 11] = [
    "G", "PG", "PG-13", "R", "NC-17", "TV-Y", "TV-Y7", "TV-G", "TV-PG", "TV-14", "TV-MA",
];

const IQR_FENCE: f64 = 1.5;

/// Parses a duration such as `"90 min"` or `"2 Seasons"` into its leading number.
///
/// Season counts are returned as-is, not converted to minutes.
pub fn parse_duration(raw: &str) -> Option<f64> {
    let token = raw.split_whitespace().next()?;
    parse_finite(token)
}

/// Parses a release year such as `"2020"` or `"2020.0"`.
pub fn parse_release_year(raw: &str) -> Option<f64> {
    parse_finite(raw.trim())
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Whether a raw value reads as a finite number
pub fn is_numeric(raw: &str) -> bool {
    parse_finite(raw.trim()).is_some()
}

/// Parses an integral rating code (`"3"` or `"3.0"`)
pub fn parse_rating_code(raw: &str) -> Option<i64> {
    let value = parse_finite(raw.trim())?;
    if value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

/// Maps a numeric rating code to its label
pub fn rating_label(code: i64) -> Option<&'static str> {
    usize::try_from(code)
        .ok()
        .and_then(|index| RATING_CODES.get(index))
        .copied()
}

/// Quantile of sorted values using linear interpolation between closest ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Inclusive `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]` bounds for a column, `None` when empty
pub fn iqr_bounds(entries: &[CatalogEntry], column: FeatureColumn) -> Option<(f64, f64)> {
    if entries.is_empty() {
        return None;
    }

    let mut values: Vec<f64> = entries.iter().map(|entry| entry.value(column)).collect();
    values.sort_by(f64::total_cmp);

    let q1 = quantile(&values, 0.25);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;

    Some((q1 - IQR_FENCE * iqr, q3 + IQR_FENCE * iqr))
}

/// Drops entries whose value in `column` falls outside the IQR fences
pub fn remove_outliers(entries: Vec<CatalogEntry>, column: FeatureColumn) -> Vec<CatalogEntry> {
    let Some((low, high)) = iqr_bounds(&entries, column) else {
        return entries;
    };

    let before = entries.len();
    let kept: Vec<CatalogEntry> = entries
        .into_iter()
        .filter(|entry| {
            let value = entry.value(column);
            value >= low && value <= high
        })
        .collect();

    tracing::info!(
        column = %column,
        low,
        high,
        removed = before - kept.len(),
        "Removed outliers"
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(duration: f64, release_year: f64) -> CatalogEntry {
        CatalogEntry {
            title: format!("{}-{}", duration, release_year),
            duration,
            release_year,
            rating: "PG".to_string(),
        }
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration("90 min"), Some(90.0));
        assert_eq!(parse_duration("  125 min "), Some(125.0));
        assert_eq!(parse_duration("95"), Some(95.0));
    }

    #[test]
    fn test_parse_duration_keeps_season_count() {
        assert_eq!(parse_duration("3 Seasons"), Some(3.0));
        assert_eq!(parse_duration("1 Season"), Some(1.0));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("min"), None);
        assert_eq!(parse_duration("NaN min"), None);
        assert_eq!(parse_duration("inf"), None);
    }

    #[test]
    fn test_parse_release_year() {
        assert_eq!(parse_release_year("2020"), Some(2020.0));
        assert_eq!(parse_release_year(" 1999.0 "), Some(1999.0));
        assert_eq!(parse_release_year("nineteen"), None);
        assert_eq!(parse_release_year(""), None);
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("3"));
        assert!(is_numeric(" 2.5 "));
        assert!(!is_numeric("PG-13"));
        assert!(!is_numeric(""));
    }

    #[test]
    fn test_rating_codes() {
        assert_eq!(parse_rating_code("0"), Some(0));
        assert_eq!(parse_rating_code("10.0"), Some(10));
        assert_eq!(parse_rating_code("2.5"), None);
        assert_eq!(parse_rating_code("PG"), None);
        assert_eq!(rating_label(0), Some("G"));
        assert_eq!(rating_label(10), Some("TV-MA"));
        assert_eq!(rating_label(11), None);
        assert_eq!(rating_label(-1), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&values, 0.75), 3.25);
        assert_eq!(quantile(&[7.0], 0.25), 7.0);
    }

    #[test]
    fn test_remove_outliers_drops_extremes() {
        let mut entries: Vec<CatalogEntry> = (0..10).map(|i| entry(90.0 + i as f64, 2010.0)).collect();
        entries.push(entry(900.0, 2010.0));

        let (low, high) = iqr_bounds(&entries, FeatureColumn::Duration).unwrap();
        let kept = remove_outliers(entries, FeatureColumn::Duration);

        assert_eq!(kept.len(), 10);
        assert!(kept.iter().all(|e| e.duration >= low && e.duration <= high));
        assert!(kept.iter().all(|e| e.duration < 900.0));
    }

    #[test]
    fn test_remove_outliers_per_column() {
        let mut entries: Vec<CatalogEntry> = (0..8).map(|i| entry(100.0, 2000.0 + i as f64)).collect();
        entries.push(entry(100.0, 1920.0));

        let kept = remove_outliers(entries.clone(), FeatureColumn::Duration);
        assert_eq!(kept.len(), 9);

        let kept = remove_outliers(entries, FeatureColumn::ReleaseYear);
        assert_eq!(kept.len(), 8);
        assert!(kept.iter().all(|e| e.release_year >= 2000.0));
    }

    #[test]
    fn test_remove_outliers_empty() {
        assert!(remove_outliers(Vec::new(), FeatureColumn::Duration).is_empty());
    }
}
