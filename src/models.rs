use serde::{Deserialize, Serialize};
use std::fmt;

/// Unmodified text-field content of one dump entry.
#[derive(Debug, Clone)]
pub struct RawArticle {
    pub title: String,
    pub body: String,
}

/// Normalizer output: prose interleaved with `##### <title>, <heading>` markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub title: String,
    pub text: String,
}

impl NormalizedText {
    /// Length in characters, the basis for the minimum-size check.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// The sections of one accepted article; serialized as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleRecord {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotAllowed,
    Redirect,
    TooShort,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::NotAllowed => "not allowed",
            SkipReason::Redirect => "redirect",
            SkipReason::TooShort => "too short",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub enum PageEvent {
    Accepted { title: String, record: ArticleRecord },
    Skipped { title: String, reason: SkipReason },
}

impl PageEvent {
    pub fn title(&self) -> &str {
        match self {
            PageEvent::Accepted { title, .. } | PageEvent::Skipped { title, .. } => title,
        }
    }
}
