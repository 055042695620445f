use crate::{
    models::{
        CatalogEntry, RecommendationQuery, Recommendations, ScoredTitle, ALL_RATINGS, MAX_DURATION,
        MAX_RELEASE_YEAR, MIN_DURATION, MIN_RELEASE_YEAR,
    },
    views::{chart::scatter_svg, escape},
};

pub const DEFAULT_DURATION: u32 = 120;
pub const DEFAULT_RELEASE_YEAR: i32 = 2020;

/// Values shown in the query form
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub duration: u32,
    pub release_year: i32,
    pub rating: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            release_year: DEFAULT_RELEASE_YEAR,
            rating: ALL_RATINGS.to_string(),
        }
    }
}

impl From<&RecommendationQuery> for FormValues {
    fn from(query: &RecommendationQuery) -> Self {
        Self {
            duration: query.duration,
            release_year: query.release_year,
            rating: query.rating.to_string(),
        }
    }
}

/// The landing page: just the form
pub fn render_index(ratings: &[String], form: &FormValues) -> String {
    layout(&render_form(ratings, form))
}

/// The form followed by either the warning or the table and chart
pub fn render_results(
    ratings: &[String],
    query: &RecommendationQuery,
    catalog: &[CatalogEntry],
    outcome: &Recommendations,
) -> String {
    let form = FormValues::from(query);
    let mut body = render_form(ratings, &form);

    match outcome {
        Recommendations::NoMatches { message } => {
            body.push_str(&format!(r#"<p class="warning">{}</p>"#, escape(message)));
        }
        Recommendations::Ranked { recommendations } => {
            body.push_str(&format!(
                r#"<p class="success">Titles similar to <strong>{} minutes</strong>, year <strong>{}</strong>, rating <strong>{}</strong>:</p>"#,
                query.duration,
                query.release_year,
                escape(&form.rating)
            ));
            body.push_str(&render_table(recommendations));
            body.push_str("<h2>Visualization (Duration vs Release Year)</h2>");
            body.push_str(&scatter_svg(
                catalog,
                recommendations,
                (f64::from(query.duration), f64::from(query.release_year)),
            ));
        }
    }

    layout(&body)
}

fn render_form(ratings: &[String], form: &FormValues) -> String {
    let mut options = String::new();
    for rating in std::iter::once(ALL_RATINGS).chain(ratings.iter().map(String::as_str)) {
        let selected = if rating == form.rating { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{value}"{selected}>{value}</option>"#,
            value = escape(rating)
        ));
    }

    format!(
        r#"<form method="get" action="/recommend">
<label>Duration (minutes): <input type="number" name="duration" min="{MIN_DURATION}" max="{MAX_DURATION}" value="{}" required></label>
<label>Release year: <input type="number" name="release_year" min="{MIN_RELEASE_YEAR}" max="{MAX_RELEASE_YEAR}" value="{}" required></label>
<label>Rating: <select name="rating">{options}</select></label>
<button type="submit">Find recommendations</button>
</form>"#,
        form.duration, form.release_year
    )
}

fn render_table(recommendations: &[ScoredTitle]) -> String {
    let mut table = String::from(
        "<table><thead><tr><th>Title</th><th>Duration</th><th>Release year</th><th>Rating</th></tr></thead><tbody>",
    );
    for scored in recommendations {
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&scored.entry.title),
            scored.entry.duration,
            scored.entry.release_year,
            escape(&scored.entry.rating)
        ));
    }
    table.push_str("</tbody></table>");
    table
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Film Recommender</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
label {{ display: block; margin: 0.5rem 0; }}
.warning {{ background: #fff4ce; padding: 0.5rem; }}
.success {{ background: #dff6dd; padding: 0.5rem; }}
table {{ border-collapse: collapse; margin: 1rem 0; }}
td, th {{ border: 1px solid #ccc; padding: 0.25rem 0.5rem; }}
</style>
</head>
<body>
<h1>Film Recommender</h1>
<p>Enter a <strong>duration</strong>, a <strong>release year</strong> and pick a <strong>rating</strong> to find similar titles.</p>
{body}
</body>
</html>"#
    )
}
