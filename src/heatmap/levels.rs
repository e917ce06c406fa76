use serde::Serialize;

/// Discrete activity level of a single heatmap day.
///
/// The thresholds are fixed so the legend stays meaningful across projects:
/// `0 → 0`, `1 → 1`, `2..=3 → 2`, `4..=6 → 3`, `7+ → 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum ActivityLevel {
    None,
    Low,
    Medium,
    High,
    Max,
}

impl ActivityLevel {
    /// Every level in legend order, "less" to "more".
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::None,
        ActivityLevel::Low,
        ActivityLevel::Medium,
        ActivityLevel::High,
        ActivityLevel::Max,
    ];

    pub fn from_count(count: u32) -> Self {
        match count {
            0 => ActivityLevel::None,
            1 => ActivityLevel::Low,
            2..=3 => ActivityLevel::Medium,
            4..=6 => ActivityLevel::High,
            _ => ActivityLevel::Max,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ActivityLevel::None => 0,
            ActivityLevel::Low => 1,
            ActivityLevel::Medium => 2,
            ActivityLevel::High => 3,
            ActivityLevel::Max => 4,
        }
    }

    /// Cell glyph used by the text renderer.
    pub fn glyph(self) -> char {
        match self {
            ActivityLevel::None => '·',
            ActivityLevel::Low => '░',
            ActivityLevel::Medium => '▒',
            ActivityLevel::High => '▓',
            ActivityLevel::Max => '█',
        }
    }
}

impl From<ActivityLevel> for u8 {
    fn from(level: ActivityLevel) -> Self {
        level.as_u8()
    }
}

/// Text renderer layout settings
pub struct TextStyle {
    /// Print a weekday label column on the left
    pub weekday_labels: bool,
    /// Print the "Less … More" legend under the grid
    pub legend: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            weekday_labels: true,
            legend: true,
        }
    }
}
