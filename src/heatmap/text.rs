use super::grid::Heatmap;
use super::levels::{ActivityLevel, TextStyle};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Render the grid as plain text, one character per day.
///
/// Year and month labels are only printed for segments that contain commits,
/// and are cut to the width of the segment.
pub fn render_text(heatmap: &Heatmap, style: &TextStyle) -> String {
    let gutter = if style.weekday_labels { " ".repeat(4) } else { String::new() };
    let mut out = String::new();

    out.push_str(&gutter);
    out.push_str(&axis_line(
        heatmap
            .year_segments
            .iter()
            .map(|seg| (seg.span, seg.has_commits.then(|| seg.year.to_string()))),
    ));
    out.push('\n');

    out.push_str(&gutter);
    out.push_str(&axis_line(heatmap.month_segments.iter().map(|seg| {
        let label = seg.has_commits.then(|| seg.label.chars().take(3).collect::<String>());
        (seg.span, label)
    })));
    out.push('\n');

    for (row, weekday) in WEEKDAYS.iter().enumerate() {
        if style.weekday_labels {
            out.push_str(weekday);
            out.push(' ');
        }
        for week in &heatmap.weeks {
            out.push(week.days[row].level().glyph());
        }
        out.push('\n');
    }

    if style.legend {
        out.push_str(&gutter);
        out.push_str("Less ");
        for level in ActivityLevel::ALL {
            out.push(level.glyph());
        }
        out.push_str(" More\n");
    }

    out
}

fn axis_line(segments: impl Iterator<Item = (usize, Option<String>)>) -> String {
    let mut line = String::new();
    for (span, label) in segments {
        let label: String = label.unwrap_or_default().chars().take(span).collect();
        let width = label.chars().count();
        line.push_str(&label);
        line.push_str(&" ".repeat(span - width));
    }
    line.trim_end().to_string()
}
