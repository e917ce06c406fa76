use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

// `[abc1234] - text` or `[abc1234]: text`
static SHA_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\[([0-9a-f]{7,40})\]\s*[-:]\s*(.+)\s*$").expect("valid regex")
});

// `## [abc1234]`
static SHA_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s{0,3}#{2,6}\s*\[([0-9a-f]{7,40})\]\s*$").expect("valid regex")
});

// `# Anything (abc1234)`
static SHA_HEADER_PAREN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s{0,3}#{1,6}\s+.*\(([0-9a-f]{7,40})\)\s*$").expect("valid regex")
});

/// Free-text notes from a progress log, keyed by lowercased commit SHA or SHA prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlurbMap(HashMap<String, String>);

impl BlurbMap {
    /// Find the blurb for a commit.
    ///
    /// Logs often abbreviate SHAs, so the full lowercased SHA is tried first,
    /// then its 7-character prefix, then its 8-character prefix.
    pub fn lookup(&self, sha: &str) -> Option<&str> {
        let sha = sha.trim().to_lowercase();
        let found = [Some(sha.as_str()), sha.get(..7), sha.get(..8)]
            .into_iter()
            .flatten()
            .find_map(|key| self.0.get(key));
        found.map(String::as_str)
    }

    /// Exact-key access, without prefix fallback.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Line-by-line accumulator for one pass over a log.
#[derive(Default)]
struct BlurbParser {
    current: Option<String>,
    buf: Vec<String>,
    map: HashMap<String, String>,
}

impl BlurbParser {
    fn open(&mut self, sha: &str, seed: Option<&str>) {
        self.flush();
        self.current = Some(sha.to_lowercase());
        if let Some(seed) = seed {
            self.buf.push(seed.to_string());
        }
    }

    fn flush(&mut self) {
        if let Some(sha) = self.current.take() {
            let text = self.buf.join("\n");
            let text = text.trim();
            if !text.is_empty() {
                self.map.insert(sha, text.to_string());
            }
        }
        self.buf.clear();
    }

    fn line(&mut self, line: &str) {
        if let Some(caps) = SHA_LINE.captures(line) {
            self.open(&caps[1], Some(&caps[2]));
        } else if let Some(caps) = SHA_HEADER.captures(line) {
            self.open(&caps[1], None);
        } else if let Some(caps) = SHA_HEADER_PAREN.captures(line) {
            self.open(&caps[1], None);
        } else if self.current.is_some() {
            self.buf.push(line.to_string());
        }
    }

    fn finish(mut self) -> BlurbMap {
        self.flush();
        BlurbMap(self.map)
    }
}

/// Parse a progress log into a [`BlurbMap`].
///
/// Three line shapes open an entry, checked in this order:
/// `[sha] - text` / `[sha]: text`, a heading of two to six `#` that is exactly
/// `[sha]`, and any heading of one to six `#` ending in `(sha)`. Other lines are
/// appended to the open entry, or dropped when none is open. A SHA is 7 to 40
/// hex characters. Entries with no text after trimming are discarded.
pub fn parse_blurbs(md: &str) -> BlurbMap {
    let mut parser = BlurbParser::default();
    for line in md.lines() {
        parser.line(line);
    }
    parser.finish()
}

/// Read and parse a progress log from disk.
pub fn parse_blurbs_file(path: &Path) -> std::io::Result<BlurbMap> {
    std::fs::read_to_string(path).map(|md| parse_blurbs(&md))
}
