use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Set of article titles eligible for extraction.
pub struct AllowList {
    titles: FxHashSet<String>,
}

impl AllowList {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open allow-list at: {}", path.display()))?;
        let list = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to read allow-list at: {}", path.display()))?;

        info!(titles = list.len(), "Allow-list loaded");
        Ok(list)
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut titles = FxHashSet::default();
        for line in reader.lines() {
            let line = line?;
            let title = normalize_title(&line);
            if !title.is_empty() {
                titles.insert(title);
            }
        }
        Ok(Self { titles })
    }

    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            titles: titles
                .into_iter()
                .map(|t| normalize_title(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(&normalize_title(title))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Canonical title form: underscores as spaces, single spaces, first letter upper-case.
pub fn normalize_title(title: &str) -> String {
    let spaced = title.replace('_', " ");
    let mut words = spaced.split_whitespace();
    let mut out = String::with_capacity(spaced.len());

    if let Some(first) = words.next() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(chars.as_str());
        }
        for word in words {
            out.push(' ');
            out.push_str(word);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_underscores() {
        assert_eq!(normalize_title("Albert_Einstein"), "Albert Einstein");
    }

    #[test]
    fn normalize_first_letter_only() {
        assert_eq!(normalize_title("iPhone"), "IPhone");
        assert_eq!(normalize_title("rust (programming language)"), "Rust (programming language)");
    }

    #[test]
    fn normalize_trims_and_collapses() {
        assert_eq!(normalize_title("  New   York_City \n"), "New York City");
    }

    #[test]
    fn normalize_non_ascii_first_letter() {
        assert_eq!(normalize_title("über"), "Über");
    }

    #[test]
    fn normalize_empty() {
        assert_eq!(normalize_title("   "), "");
    }

    #[test]
    fn from_reader_skips_blank_lines() {
        let data = "Rust\n\n  Python  \nAlbert_Einstein\n";
        let list = AllowList::from_reader(data.as_bytes()).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.contains("Rust"));
        assert!(list.contains("Python"));
        assert!(list.contains("Albert Einstein"));
    }

    #[test]
    fn contains_normalizes_lookup() {
        let list = AllowList::from_titles(["Albert Einstein"]);
        assert!(list.contains("Albert_Einstein"));
        assert!(list.contains("albert Einstein"));
        assert!(!list.contains("Albert einstein"));
    }

    #[test]
    fn empty_list_contains_nothing() {
        let list = AllowList::from_titles(Vec::<String>::new());
        assert!(list.is_empty());
        assert!(!list.contains("Anything"));
    }

    #[test]
    fn load_missing_file_errors() {
        let result = AllowList::load("/nonexistent/titles.txt");
        assert!(result.is_err());
    }
}
