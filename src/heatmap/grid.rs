use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::levels::ActivityLevel;
use crate::utils::dates::{
    first_of_month_back, format_day, month_name, parse_day, start_of_week_sun,
};

/// Weeks shown when there is no data and no explicit start.
const DEFAULT_LOOKBACK_WEEKS: i64 = 52;

/// Optional bounds for [`build_heatmap`].
///
/// `start` and `end` are UTC calendar days; callers holding a timestamp should
/// pass `ts.with_timezone(&Utc).date_naive()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeatmapOptions {
    /// Hard start of the grid
    pub start: Option<NaiveDate>,
    /// Hard end of the grid (defaults to today)
    pub end: Option<NaiveDate>,
    /// Only show the last N months; zero or negative is ignored
    pub months_window: Option<i32>,
}

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapDay {
    pub date: NaiveDate,
    pub count: u32,
}

impl HeatmapDay {
    pub fn level(&self) -> ActivityLevel {
        ActivityLevel::from_count(self.count)
    }

    /// The key used by the day-keyed maps and by selection callbacks.
    pub fn key(&self) -> String {
        format_day(self.date)
    }
}

/// Seven consecutive days starting on a Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekColumn {
    pub start: NaiveDate,
    pub days: [HeatmapDay; 7],
    /// The column's Sunday falls in a different month than the previous column's.
    /// Always true for the first column; renderers skip it there.
    pub is_month_start: bool,
}

impl WeekColumn {
    fn first_of_month(&self) -> Option<&HeatmapDay> {
        self.days.iter().find(|d| d.date.day() == 1)
    }

    /// Day the column is labelled by: the 1st of a month if it holds one, else its Sunday.
    fn label_day(&self) -> NaiveDate {
        self.first_of_month().map_or(self.start, |d| d.date)
    }

    fn has_commits(&self) -> bool {
        self.days.iter().any(|d| d.count > 0)
    }
}

/// Run of columns labelled with one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSegment {
    pub label: String,
    pub month: u32,
    pub year: i32,
    /// Number of week columns covered
    pub span: usize,
    pub has_commits: bool,
}

/// Run of month segments sharing a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSegment {
    pub year: i32,
    pub span: usize,
    pub has_commits: bool,
}

/// Output of the builder: the grid plus its axis segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub weeks: Vec<WeekColumn>,
    pub month_segments: Vec<MonthSegment>,
    pub year_segments: Vec<YearSegment>,
}

impl Heatmap {
    pub fn start(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w.start)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|w| w.start)
    }

    /// Find the cell for a given day, if the grid covers it.
    pub fn day(&self, date: NaiveDate) -> Option<&HeatmapDay> {
        let first = self.start()?;
        let offset = (date - first).num_days();
        if offset < 0 {
            return None;
        }
        let offset = offset as usize;
        self.weeks.get(offset / 7).map(|w| &w.days[offset % 7])
    }

    pub fn total_commits(&self) -> u64 {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .map(|d| u64::from(d.count))
            .sum()
    }
}

/// Build the heatmap relative to the current UTC day.
pub fn build_heatmap_now(
    counts_by_date: &BTreeMap<String, u32>,
    options: &HeatmapOptions,
) -> Heatmap {
    build_heatmap(counts_by_date, options, Utc::now().date_naive())
}

/// Build the week grid and its month/year segments from day counts.
///
/// `today` stands in for the end of the grid when `options.end` is absent.
/// The grid never stretches past the week of the latest counted day, and
/// `months_window` can only move the start later, never earlier.
pub fn build_heatmap(
    counts_by_date: &BTreeMap<String, u32>,
    options: &HeatmapOptions,
    today: NaiveDate,
) -> Heatmap {
    let (grid_start, grid_end) = resolve_range(counts_by_date, options, today);
    let weeks = build_weeks(counts_by_date, grid_start, grid_end);
    let month_segments = segment_months(&weeks);
    let year_segments = segment_years(&month_segments);

    Heatmap {
        weeks,
        month_segments,
        year_segments,
    }
}

/// Sunday-aligned `(start, end)` of the grid, `start <= end`.
fn resolve_range(
    counts_by_date: &BTreeMap<String, u32>,
    options: &HeatmapOptions,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let mut days = counts_by_date.keys().filter_map(|k| parse_day(k));
    let first = days.next();
    let last = days.last().or(first);

    let mut grid_end = start_of_week_sun(options.end.unwrap_or(today));
    if let Some(last) = last.map(start_of_week_sun) {
        if last < grid_end {
            grid_end = last;
        }
    }

    let mut grid_start = match (options.start, first) {
        (Some(start), _) => start_of_week_sun(start),
        (None, Some(first)) => start_of_week_sun(first),
        (None, None) => grid_end - Duration::weeks(DEFAULT_LOOKBACK_WEEKS),
    };

    if let Some(months) = options.months_window.filter(|m| *m > 0) {
        let window_start =
            first_of_month_back(grid_end, months.unsigned_abs() - 1).map(start_of_week_sun);
        if let Some(window_start) = window_start {
            if window_start > grid_start {
                grid_start = window_start;
            }
        }
    }

    if grid_start > grid_end {
        grid_start = grid_end;
    }

    (grid_start, grid_end)
}

fn build_weeks(
    counts_by_date: &BTreeMap<String, u32>,
    grid_start: NaiveDate,
    grid_end: NaiveDate,
) -> Vec<WeekColumn> {
    let capacity = ((grid_end - grid_start).num_days() / 7 + 1) as usize;
    let mut weeks: Vec<WeekColumn> = Vec::with_capacity(capacity);

    let mut cursor = grid_start;
    while cursor <= grid_end {
        let days = std::array::from_fn(|i| {
            let date = cursor + Duration::days(i as i64);
            HeatmapDay {
                date,
                count: counts_by_date.get(&format_day(date)).copied().unwrap_or(0),
            }
        });
        let is_month_start = weeks.last().map_or(true, |prev| prev.start.month() != cursor.month());
        weeks.push(WeekColumn {
            start: cursor,
            days,
            is_month_start,
        });
        cursor += Duration::weeks(1);
    }

    weeks
}

fn segment_months(weeks: &[WeekColumn]) -> Vec<MonthSegment> {
    let Some(first) = weeks.first() else {
        return Vec::new();
    };

    let open = |column: &WeekColumn| {
        let day = column.label_day();
        (month_name(day), day.month(), day.year())
    };

    let mut segments = Vec::new();
    let mut seg_start = 0;
    let mut current = open(first);

    for (i, column) in weeks.iter().enumerate().skip(1) {
        if column.first_of_month().is_some() {
            let (label, month, year) = std::mem::replace(&mut current, open(column));
            segments.push(MonthSegment {
                label,
                month,
                year,
                span: i - seg_start,
                has_commits: weeks[seg_start..i].iter().any(WeekColumn::has_commits),
            });
            seg_start = i;
        }
    }

    let (label, month, year) = current;
    segments.push(MonthSegment {
        label,
        month,
        year,
        span: weeks.len() - seg_start,
        has_commits: weeks[seg_start..].iter().any(WeekColumn::has_commits),
    });

    segments
}

fn segment_years(months: &[MonthSegment]) -> Vec<YearSegment> {
    let mut years: Vec<YearSegment> = Vec::new();
    for month in months {
        match years.last_mut() {
            Some(current) if current.year == month.year => {
                current.span += month.span;
                current.has_commits |= month.has_commits;
            }
            _ => years.push(YearSegment {
                year: month.year,
                span: month.span,
                has_commits: month.has_commits,
            }),
        }
    }
    years
}
