use crate::models::{CatalogEntry, ScoredTitle};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 55.0;
const TICKS: usize = 5;

/// Inclusive value range of one axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn covering(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !min.is_finite() || !max.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
        Self {
            min: min - pad,
            max: max + pad,
        }
    }

    /// Position of `value` within the range, 0.0 at `min` and 1.0 at `max`
    fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    fn tick(&self, index: usize) -> f64 {
        self.min + (self.max - self.min) * index as f64 / (TICKS - 1) as f64
    }
}

struct Plot {
    x: Range,
    y: Range,
}

impl Plot {
    fn px(&self, duration: f64) -> f64 {
        MARGIN_LEFT + self.x.fraction(duration) * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn py(&self, release_year: f64) -> f64 {
        HEIGHT - MARGIN_BOTTOM - self.y.fraction(release_year) * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM)
    }
}

/// Renders the duration vs. release year scatter chart as inline SVG.
///
/// Draws every catalog title faintly, the recommended titles highlighted,
/// and the query point on top.
pub fn scatter_svg(catalog: &[CatalogEntry], recommended: &[ScoredTitle], query: (f64, f64)) -> String {
    let plot = Plot {
        x: Range::covering(catalog.iter().map(|e| e.duration).chain(std::iter::once(query.0))),
        y: Range::covering(
            catalog
                .iter()
                .map(|e| e.release_year)
                .chain(std::iter::once(query.1)),
        ),
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" role="img" aria-label="Duration vs release year">"#
    ));

    write_axes(&mut svg, &plot);

    svg.push_str(r#"<g class="catalog">"#);
    for entry in catalog {
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="gray" fill-opacity="0.4"/>"#,
            plot.px(entry.duration),
            plot.py(entry.release_year)
        ));
    }
    svg.push_str("</g>");

    svg.push_str(r#"<g class="recommended">"#);
    for scored in recommended {
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="7" fill="orange"/>"#,
            plot.px(scored.entry.duration),
            plot.py(scored.entry.release_year)
        ));
    }
    svg.push_str("</g>");

    svg.push_str(&format!(
        r#"<circle class="query" cx="{:.1}" cy="{:.1}" r="10" fill="red" stroke="black" stroke-width="1.5"/>"#,
        plot.px(query.0),
        plot.py(query.1)
    ));

    write_legend(&mut svg);
    svg.push_str("</svg>");
    svg
}

fn write_axes(svg: &mut String, plot: &Plot) {
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = MARGIN_TOP;
    let bottom = HEIGHT - MARGIN_BOTTOM;

    svg.push_str(&format!(
        r#"<g class="axes" stroke="black" stroke-width="1"><line x1="{left}" y1="{bottom}" x2="{right}" y2="{bottom}"/><line x1="{left}" y1="{top}" x2="{left}" y2="{bottom}"/></g>"#
    ));

    svg.push_str(r#"<g class="ticks" font-size="11" fill="black">"#);
    for index in 0..TICKS {
        let value = plot.x.tick(index);
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{:.0}</text>"#,
            plot.px(value),
            bottom + 16.0,
            value
        ));
        let value = plot.y.tick(index);
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{:.0}</text>"#,
            left - 6.0,
            plot.py(value) + 4.0,
            value
        ));
    }
    svg.push_str("</g>");

    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="13">Duration (minutes)</text>"#,
        (left + right) / 2.0,
        HEIGHT - 12.0
    ));
    svg.push_str(&format!(
        r#"<text transform="translate(18 {:.1}) rotate(-90)" text-anchor="middle" font-size="13">Release year</text>"#,
        (top + bottom) / 2.0
    ));
}

fn write_legend(svg: &mut String) {
    let x = WIDTH - MARGIN_RIGHT - 150.0;
    let items = [
        (r#"fill="gray" fill-opacity="0.4""#, 3.0, "All titles"),
        (r#"fill="orange""#, 7.0, "Recommended"),
        (r#"fill="red" stroke="black""#, 8.0, "Your input"),
    ];

    svg.push_str(&format!(
        r#"<g class="legend" font-size="12"><rect x="{x}" y="{MARGIN_TOP}" width="140" height="72" fill="white" stroke="lightgray"/>"#
    ));
    for (index, (style, radius, label)) in items.iter().enumerate() {
        let y = MARGIN_TOP + 16.0 + 20.0 * index as f64;
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{y:.1}" r="{radius}" {style} /><text x="{:.1}" y="{:.1}">{label}</text>"#,
            x + 16.0,
            x + 32.0,
            y + 4.0
        ));
    }
    svg.push_str("</g>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, duration: f64, release_year: f64) -> CatalogEntry {
        CatalogEntry {
            title: title.to_string(),
            duration,
            release_year,
            rating: "PG".to_string(),
        }
    }

    #[test]
    fn test_range_pads_single_value() {
        let range = Range::covering([2020.0].into_iter());
        assert_eq!(range, Range { min: 2019.0, max: 2021.0 });
        assert_eq!(range.fraction(2020.0), 0.5);
    }

    #[test]
    fn test_range_empty_defaults() {
        let range = Range::covering(std::iter::empty());
        assert_eq!(range, Range { min: 0.0, max: 1.0 });
    }

    #[test]
    fn test_scatter_draws_every_layer() {
        let catalog = vec![entry("A", 90.0, 2020.0), entry("B", 200.0, 1990.0)];
        let recommended = vec![ScoredTitle {
            entry: catalog[0].clone(),
            similarity: 1.0,
        }];

        let svg = scatter_svg(&catalog, &recommended, (120.0, 2005.0));

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(r#"fill-opacity="0.4"/>"#).count(), 2);
        assert_eq!(svg.matches(r#"r="7" fill="orange"/>"#).count(), 1);
        assert_eq!(svg.matches(r#"class="query""#).count(), 1);
        assert!(svg.contains("Duration (minutes)"));
        assert!(svg.contains("Release year"));
        assert!(svg.contains("Your input"));
    }

    #[test]
    fn test_points_stay_inside_plot_area() {
        let plot = Plot {
            x: Range::covering([90.0, 200.0].into_iter()),
            y: Range::covering([1990.0, 2020.0].into_iter()),
        };

        for duration in [90.0, 200.0] {
            let x = plot.px(duration);
            assert!(x >= MARGIN_LEFT && x <= WIDTH - MARGIN_RIGHT);
        }
        for year in [1990.0, 2020.0] {
            let y = plot.py(year);
            assert!(y >= MARGIN_TOP && y <= HEIGHT - MARGIN_BOTTOM);
        }
        assert!(plot.py(2020.0) < plot.py(1990.0));
    }
}
