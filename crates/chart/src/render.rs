use crate::chart::CorrelationChart;
use crate::summary::BoxStats;

const GLYPH_WIDTH: usize = 32;

/// Render a chart as Markdown: one table per population, one row per outcome
pub fn render_markdown(chart: &CorrelationChart) -> String {
    let groups = chart.groups();
    let (lo, hi) = score_range(chart);

    let mut md = String::new();
    md.push_str(&format!("# {}\n\n", chart.title()));
    md.push_str(&format!("- Factor: `{}`\n", chart.factor()));
    md.push_str(&format!("- Populations: `{}`\n", chart.populations().join(", ")));
    md.push_str(&format!("- Samples: `{}`\n", chart.rows().len()));
    md.push_str(&format!("- Score range: `{lo}`..`{hi}`\n\n"));

    for population in &groups {
        md.push_str(&format!("## {}\n\n", population.population));
        md.push_str("| outcome | n | min | q1 | median | q3 | max | mean | distribution |\n");
        md.push_str("|---|---:|---:|---:|---:|---:|---:|---:|---|\n");
        for group in &population.groups {
            let s = &group.stats;
            md.push_str(&format!(
                "| `{}` | `{}` | `{}` | `{}` | `{}` | `{}` | `{}` | `{:.2}` | `{}` |\n",
                escape_cell(&group.outcome),
                s.count,
                s.min,
                s.q1,
                s.median,
                s.q3,
                s.max,
                s.mean,
                box_glyph(s, lo, hi, GLYPH_WIDTH),
            ));
        }
        md.push('\n');
    }

    md
}

fn score_range(chart: &CorrelationChart) -> (i64, i64) {
    let lo = chart.rows().iter().map(|row| row.score).min().unwrap_or(0);
    let hi = chart.rows().iter().map(|row| row.score).max().unwrap_or(0);
    (lo, hi)
}

/// Text box plot on a `lo..=hi` axis: `-` whiskers, `=` box, `|` median
fn box_glyph(stats: &BoxStats, lo: i64, hi: i64, width: usize) -> String {
    // f64 span: `hi - lo` may leave the i64 range
    let span = (hi as f64 - lo as f64).max(1.0);
    let cell = |value: f64| -> usize {
        let scaled = (value - lo as f64) / span * (width - 1) as f64;
        (scaled.round() as usize).min(width - 1)
    };
    let (min, q1, median, q3, max) = (
        cell(stats.min),
        cell(stats.q1),
        cell(stats.median),
        cell(stats.q3),
        cell(stats.max),
    );

    (0..width)
        .map(|i| {
            if i == median {
                '|'
            } else if (q1..=q3).contains(&i) {
                '='
            } else if (min..=max).contains(&i) {
                '-'
            } else {
                ' '
            }
        })
        .collect()
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
