/// Minimum normalized article length (in characters) for an article to be kept
pub const MIN_ARTICLE_CHARS: usize = 2000;

/// Sections whose body is at most this many characters are treated as stubs
pub const STUB_SECTION_MAX_CHARS: usize = 300;

/// Heading fragments (matched case-insensitively) that mark boilerplate sections
pub const BOILERPLATE_HEADINGS: &[&str] = &[
    "link",
    "further reading",
    "sources",
    "references",
    "notes",
    "citations",
    "see also",
];

/// Characters allowed in prose beyond U+0000..=U+036F
pub const EXTRA_ALLOWED_CHARS: &str = "Δωστλβμ£€ηδρπαθε";

/// Heading given to the lead section of every article
pub const LEAD_HEADING: &str = "Definition";

/// Progress update interval (refresh the bar every N titles)
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Buffer size for the decompressed dump reader
pub const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Buffer size for the JSON output writer
pub const WRITE_BUFFER_SIZE: usize = 128 * 1024;

/// Tunable heuristics for the markup normalizer and the accept/reject decision.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    pub min_article_chars: usize,
    pub stub_section_max_chars: usize,
    pub boilerplate_headings: Vec<String>,
    pub extra_allowed_chars: Vec<char>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            min_article_chars: MIN_ARTICLE_CHARS,
            stub_section_max_chars: STUB_SECTION_MAX_CHARS,
            boilerplate_headings: BOILERPLATE_HEADINGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extra_allowed_chars: EXTRA_ALLOWED_CHARS.chars().collect(),
        }
    }
}

impl NormalizeConfig {
    /// Extends the extra allowed characters, skipping ones already present.
    pub fn allow_chars(mut self, chars: &str) -> Self {
        for c in chars.chars() {
            if !self.extra_allowed_chars.contains(&c) {
                self.extra_allowed_chars.push(c);
            }
        }
        self
    }
}
