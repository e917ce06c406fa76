use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static FRONTMATTER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z0-9_-]+)\s*:\s*(.+?)\s*$").expect("valid regex"));

/// A project's case study, split into frontmatter and markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseStudy {
    pub frontmatter: BTreeMap<String, String>,
    pub body: String,
}

impl CaseStudy {
    pub fn is_empty(&self) -> bool {
        self.frontmatter.is_empty() && self.body.trim().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.frontmatter.get(key).map(String::as_str)
    }
}

fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

/// Split a leading `---` block of `key: value` lines off a markdown document.
///
/// Documents without a closed frontmatter block come back whole as the body.
/// Lines in the block that are not `key: value` are skipped.
pub fn parse_frontmatter(md: &str) -> CaseStudy {
    let Some(rest) = md.strip_prefix("---") else {
        return CaseStudy {
            frontmatter: BTreeMap::new(),
            body: md.to_string(),
        };
    };
    let Some(end) = rest.find("\n---") else {
        return CaseStudy {
            frontmatter: BTreeMap::new(),
            body: md.to_string(),
        };
    };

    let frontmatter = rest[..end]
        .trim()
        .lines()
        .filter_map(|line| FRONTMATTER_LINE.captures(line))
        .map(|caps| (caps[1].to_string(), strip_quotes(&caps[2]).to_string()))
        .collect();
    let body = rest[end + "\n---".len()..].trim_start().to_string();

    CaseStudy { frontmatter, body }
}
