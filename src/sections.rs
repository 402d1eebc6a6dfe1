use crate::models::{NormalizedText, Section};

/// Prefix of the synthetic heading lines emitted by the normalizer.
pub const HEADING_MARKER: &str = "#####";

/// Splits normalized text into sections, one per heading marker.
///
/// Text before the first marker is discarded. Headings are reported without
/// the `"<title>, "` prefix the normalizer writes into each marker.
pub fn segment(normalized: &NormalizedText) -> Vec<Section> {
    let title_prefix = format!("{}, ", normalized.title);
    let mut sections = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in normalized.text.split('\n') {
        let label = line
            .strip_prefix(HEADING_MARKER)
            .and_then(|rest| rest.strip_prefix(' '));

        match label {
            Some(label) => {
                if let Some((heading, body)) = current.take() {
                    sections.push(make_section(heading, &body));
                }
                let heading = label.strip_prefix(title_prefix.as_str()).unwrap_or(label);
                current = Some((heading, Vec::new()));
            }
            None => {
                if let Some((_, body)) = current.as_mut() {
                    body.push(line);
                }
            }
        }
    }

    if let Some((heading, body)) = current {
        sections.push(make_section(heading, &body));
    }

    sections
}

fn make_section(heading: &str, body: &[&str]) -> Section {
    Section {
        title: heading.to_string(),
        content: body.join("\n").trim_matches('\n').to_string(),
    }
}
