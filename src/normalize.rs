//! Wikitext to prose normalization.
//!
//! The normalizer is a fixed list of text-to-text stages. Stage order is
//! significant: bracket stripping runs before link simplification, entity
//! decoding runs before tag stripping, and every line filter assumes the
//! constructs removed by earlier stages are already gone.

use crate::config::{NormalizeConfig, LEAD_HEADING};
use crate::convert::rewrite_conversions;
use crate::models::NormalizedText;
use crate::sections::HEADING_MARKER;
use crate::typography;
use once_cell::sync::Lazy;
use quick_xml::escape::unescape;
use regex::Regex;
use tracing::trace;

pub struct StageContext<'a> {
    pub title: &'a str,
    pub config: &'a NormalizeConfig,
}

type Stage = fn(&str, &StageContext) -> String;

const STAGES: &[(&str, Stage)] = &[
    ("conversions", conversions),
    ("templates", unwrap_templates),
    ("brackets", strip_brackets),
    ("blocks", remove_blocks),
    ("entities", clean_entities_and_tags),
    ("markup_lines", drop_markup_lines),
    ("links", simplify_links),
    ("typography", typography_stage),
    ("quotes", fix_quotes),
    ("residue", drop_residue_lines),
    ("balance", drop_unbalanced_lines),
    ("charset", drop_disallowed_lines),
    ("canonicalize", canonicalize),
];

static IPA_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(?:vr|IPA|angbr| )+\|/\[\[.*?\|(.*?)\]\]/\}\}").unwrap()
});

static IPA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(?:vr|IPA|angbr| )+\|(.*?)\}\}").unwrap());

static LANG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{lang(?:\||-).*?\|(.*?)\}\}").unwrap());

static LANG_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{Lang-.*?\|(.*?)\}\}").unwrap());

static TRANSL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"''\{\{transl\|.*?\|(.*?)\}\}''").unwrap());

static APOSTROPHE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{'(s)?\}\}").unwrap());

static TECH_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&lt;(?:math|code|sub|sup)(?:&gt;|\s)").unwrap());

static SELF_CLOSING_REF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&lt;ref(?:\s(?:[^&\n]|&quot;|&amp;)*?)?/&gt;").unwrap());

static REF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&lt;ref(?:&gt;)?.*?(?:&lt;)?/ref(?:&gt;)?").unwrap());

static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap()
});

static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\s[^<>]*)?/?>").unwrap());

static BOLD_TEMPLATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{.*('''.*?''').*\}\}").unwrap());

static MARKUP_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[*_{}|!&#@;:. ,?%/\\]|\[?\[?(?:File|Image|Category):)").unwrap()
});

static PLAIN_LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^|\]]*?)\]\]").unwrap());

static PIPED_LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[.*?\|(.*?)\]\]").unwrap());

static SINGLE_BRACKET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());

static SPACE_BEFORE_PUNCT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ ]+([.:;,])").unwrap());

static ELLIPSIS_BEFORE_LOWER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?\.\.\. ([a-z])").unwrap());

static DOT_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{4,}").unwrap());

static PERIOD_INSIDE_QUOTE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([a-z])\."( *[A-Z])"#).unwrap());

static SPACE_BEFORE_COMMA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.) ,").unwrap());

static MULTI_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ ]{2,}").unwrap());

static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^={2,}\s*([^=].*?)\s*={2,}$").unwrap());

/// Turns raw article wikitext into sectioned prose.
pub fn normalize(title: &str, raw: &str, config: &NormalizeConfig) -> NormalizedText {
    let ctx = StageContext { title, config };
    let mut text = raw.to_string();

    for (name, stage) in STAGES {
        text = stage(&text, &ctx);
        trace!(title, stage = *name, bytes = text.len(), "Normalizer stage applied");
    }

    NormalizedText {
        title: title.to_string(),
        text,
    }
}

/// Keeps the lines accepted by `keep`, preserving the remaining line breaks.
pub(crate) fn retain_lines(text: &str, mut keep: impl FnMut(&str) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut first = true;
    for line in text.split('\n') {
        if !keep(line) {
            continue;
        }
        if !first {
            out.push('\n');
        }
        out.push_str(line);
        first = false;
    }
    out
}

fn conversions(text: &str, _: &StageContext) -> String {
    rewrite_conversions(text)
}

fn unwrap_templates(text: &str, _: &StageContext) -> String {
    let text = IPA_LINK_REGEX.replace_all(text, "\"${1}\"");
    let text = IPA_REGEX.replace_all(&text, "\"${1}\"");
    let text = LANG_REGEX.replace_all(&text, "${1}");
    let text = LANG_PREFIX_REGEX.replace_all(&text, "${1}");
    let text = TRANSL_REGEX.replace_all(&text, "\"${1}\"");
    APOSTROPHE_REGEX.replace_all(&text, "'${1}").into_owned()
}

fn strip_brackets(text: &str, _: &StageContext) -> String {
    strip_nested(&text.replace(" (", "("))
}

/// Emits only the characters found at nesting depth zero of `{}`/`()`.
///
/// Openers and closers of both kinds share one counter. A closer seen at depth
/// zero has nothing to close and is emitted as ordinary text.
pub fn strip_nested(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth: usize = 0;

    for c in text.chars() {
        match c {
            '{' | '(' => depth += 1,
            '}' | ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn remove_blocks(text: &str, _: &StageContext) -> String {
    let text = retain_lines(text, |line| !TECH_TAG_REGEX.is_match(line));
    let text = SELF_CLOSING_REF_REGEX.replace_all(&text, "");
    REF_REGEX.replace_all(&text, "").into_owned()
}

/// Resolves HTML5 named and numeric entities; unknown ones are left as-is.
pub fn decode_entities(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            match unescape(&caps[0]) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn clean_entities_and_tags(text: &str, _: &StageContext) -> String {
    let decoded = decode_entities(text);
    let uncommented = COMMENT_REGEX.replace_all(&decoded, "");
    let untagged = TAG_REGEX.replace_all(&uncommented, "");
    decode_entities(&untagged)
}

fn is_caption_line(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 6 && line.starts_with("'''") && line.ends_with("'''")
}

fn drop_markup_lines(text: &str, _: &StageContext) -> String {
    let text = BOLD_TEMPLATE_REGEX.replace_all(text, "${1}");
    let text = retain_lines(&text, |line| !is_caption_line(line)).replace("'''", "");
    retain_lines(&text, |line| {
        !MARKUP_LINE_REGEX.is_match(line) && !line.contains("[http")
    })
}

fn simplify_links(text: &str, _: &StageContext) -> String {
    let text = PLAIN_LINK_REGEX.replace_all(text, "${1}");
    let text = PIPED_LINK_REGEX.replace_all(&text, "${1}");
    let text = SINGLE_BRACKET_REGEX.replace_all(&text, "${1}");
    SPACE_BEFORE_PUNCT_REGEX
        .replace_all(&text, "${1}")
        .into_owned()
}

fn typography_stage(text: &str, _: &StageContext) -> String {
    let text = typography::substitute(text);
    let text = ELLIPSIS_BEFORE_LOWER_REGEX.replace_all(&text, " ${1}");
    DOT_RUN_REGEX.replace_all(&text, "...").into_owned()
}

fn fix_quotes(text: &str, _: &StageContext) -> String {
    let text = text
        .replace("''''", "")
        .replace("''", "\"")
        .replace("\"\"", "\"")
        .replace(",\"", "\"")
        .replace(". ...", ".");
    let text = PERIOD_INSIDE_QUOTE_REGEX.replace_all(&text, "${1}\".${2}");
    SPACE_BEFORE_COMMA_REGEX
        .replace_all(&text, "${1},")
        .into_owned()
}

fn has_lone_equals(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'='
            && (i == 0 || bytes[i - 1] != b'=')
            && bytes.get(i + 1).is_none_or(|&next| next != b'=')
    })
}

/// Lines that end mid-sentence, continue a sentence, or still carry markup.
fn is_residue_line(line: &str) -> bool {
    let trimmed = line.trim_end_matches(' ');
    let dangling_end = trimmed
        .chars()
        .last()
        .is_some_and(|c| matches!(c, ':' | ';' | '!' | '?' | ',') || c.is_ascii_alphanumeric());
    let continuation = line.starts_with(|c: char| c.is_ascii_lowercase());
    let markup = has_lone_equals(line) || line.contains(['|', '[', ']']);
    let bare_rule = !trimmed.is_empty() && trimmed.chars().all(|c| c == '=');

    dangling_end || continuation || markup || bare_rule
}

fn drop_residue_lines(text: &str, _: &StageContext) -> String {
    retain_lines(text, |line| !is_residue_line(line))
        .split('\n')
        .map(|line| line.trim_end_matches(' '))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Odd quote or parenthesis counts point at a stripping artifact.
fn is_balanced_line(line: &str) -> bool {
    let quotes = line.chars().filter(|&c| c == '"').count();
    let parens = line.chars().filter(|&c| c == '(' || c == ')').count();
    quotes % 2 == 0 && parens % 2 == 0
}

fn drop_unbalanced_lines(text: &str, _: &StageContext) -> String {
    retain_lines(text, is_balanced_line)
}

fn drop_disallowed_lines(text: &str, ctx: &StageContext) -> String {
    let extra = &ctx.config.extra_allowed_chars;
    retain_lines(text, |line| {
        line.chars().all(|c| typography::is_allowed_char(c, extra))
    })
}

struct Block<'a> {
    heading: &'a str,
    lines: Vec<&'a str>,
}

impl Block<'_> {
    fn body_chars(&self) -> usize {
        let text: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        text + self.lines.len().saturating_sub(1)
    }
}

fn is_boilerplate(heading: &str, config: &NormalizeConfig) -> bool {
    let heading = heading.to_lowercase();
    config
        .boilerplate_headings
        .iter()
        .any(|term| heading.contains(&term.to_lowercase()))
}

/// Groups lines under headings, drops stub, boilerplate and empty sections,
/// and renders the synthetic heading markers.
fn canonicalize(text: &str, ctx: &StageContext) -> String {
    let collapsed = MULTI_SPACE_REGEX.replace_all(text, " ");

    let mut blocks = vec![Block {
        heading: LEAD_HEADING,
        lines: Vec::new(),
    }];
    for line in collapsed.split('\n').filter(|l| !l.is_empty()) {
        match HEADING_REGEX.captures(line) {
            Some(caps) => blocks.push(Block {
                heading: caps.get(1).map_or("", |m| m.as_str().trim()),
                lines: Vec::new(),
            }),
            None => {
                if let Some(block) = blocks.last_mut() {
                    block.lines.push(line);
                }
            }
        }
    }

    let last = blocks.len() - 1;
    let stub_max = ctx.config.stub_section_max_chars;
    let mut out = String::with_capacity(collapsed.len() + 64);

    for (i, block) in blocks.iter().enumerate() {
        let is_lead = i == 0;
        if !is_lead && i != last && block.body_chars() <= stub_max {
            continue;
        }
        if !is_lead && (block.heading.is_empty() || is_boilerplate(block.heading, ctx.config)) {
            continue;
        }
        if block.lines.is_empty() {
            continue;
        }
        out.push_str("\n\n");
        out.push_str(HEADING_MARKER);
        out.push(' ');
        out.push_str(ctx.title);
        out.push_str(", ");
        out.push_str(block.heading);
        out.push('\n');
        out.push_str(&block.lines.join("\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(config: &NormalizeConfig) -> StageContext<'_> {
        StageContext {
            title: "Example",
            config,
        }
    }

    fn reference_depth_zero(text: &str) -> String {
        let mut stack = Vec::new();
        let mut out = String::new();
        for c in text.chars() {
            match c {
                '{' | '(' => stack.push(c),
                '}' | ')' if !stack.is_empty() => {
                    stack.pop();
                }
                _ if stack.is_empty() => out.push(c),
                _ => {}
            }
        }
        out
    }

    /// Deterministic generator of well-formed nested bracket strings.
    fn nested_samples() -> Vec<String> {
        let mut samples = Vec::new();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..200 {
            let mut s = String::new();
            let mut open: Vec<char> = Vec::new();
            for _ in 0..40 {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                match (seed >> 33) % 6 {
                    0 if open.len() < 8 => {
                        s.push('(');
                        open.push(')');
                    }
                    1 if open.len() < 8 => {
                        s.push('{');
                        open.push('}');
                    }
                    2 => {
                        if let Some(close) = open.pop() {
                            s.push(close);
                        }
                    }
                    n => s.push(char::from(b'a' + n as u8)),
                }
            }
            while let Some(close) = open.pop() {
                s.push(close);
            }
            samples.push(s);
        }
        samples
    }

    #[test]
    fn strip_nested_basic() {
        assert_eq!(strip_nested("a (b) c {d} e"), "a  c  e");
    }

    #[test]
    fn strip_nested_deep() {
        assert_eq!(strip_nested("x{{a|{{b(c)}}}}y"), "xy");
    }

    #[test]
    fn strip_nested_mixed_kinds_share_counter() {
        assert_eq!(strip_nested("a(b}c)d"), "ac)d");
    }

    #[test]
    fn strip_nested_excess_closer_is_text() {
        assert_eq!(strip_nested("a) b"), "a) b");
    }

    #[test]
    fn strip_nested_unclosed_drops_rest() {
        assert_eq!(strip_nested("kept (never closed"), "kept ");
    }

    #[test]
    fn strip_nested_matches_reference_counter() {
        for sample in nested_samples() {
            assert_eq!(strip_nested(&sample), reference_depth_zero(&sample), "{sample}");
        }
    }

    #[test]
    fn brackets_stage_removes_space_before_paren() {
        let config = NormalizeConfig::default();
        assert_eq!(
            strip_brackets("Paris (French: Paris) is a city.", &ctx(&config)),
            "Paris is a city."
        );
    }

    #[test]
    fn templates_ipa_and_lang() {
        let config = NormalizeConfig::default();
        let c = ctx(&config);
        assert_eq!(unwrap_templates("said {{IPA|ˈpær}}", &c), "said \"ˈpær\"");
        assert_eq!(
            unwrap_templates("{{IPA|/[[Help:IPA|ˈpær]]/}}", &c),
            "\"ˈpær\""
        );
        assert_eq!(unwrap_templates("{{lang|fr|Bonjour}}", &c), "Bonjour");
        assert_eq!(unwrap_templates("{{lang-de|Hallo}}", &c), "Hallo");
        assert_eq!(unwrap_templates("{{Lang-es|Hola}}", &c), "Hola");
        assert_eq!(unwrap_templates("''{{transl|ar|Salam}}''", &c), "\"Salam\"");
        assert_eq!(unwrap_templates("Newton{{'s}} law", &c), "Newton's law");
        assert_eq!(unwrap_templates("rock{{'}}n", &c), "rock'n");
    }

    #[test]
    fn blocks_remove_refs_and_math_lines() {
        let config = NormalizeConfig::default();
        let raw = "Fact.&lt;ref&gt;Source, p. 1&lt;/ref&gt; More.&lt;ref name=\"a\" /&gt;\nSee &lt;math&gt;x^2&lt;/math&gt; here.\nEnd.";
        assert_eq!(remove_blocks(raw, &ctx(&config)), "Fact. More.\nEnd.");
    }

    #[test]
    fn entities_decoded_and_tags_stripped() {
        let config = NormalizeConfig::default();
        let raw = "A &lt;b&gt;bold&lt;/b&gt; word &amp;amp; more&lt;!-- hidden --&gt; &amp;nbsp;x";
        assert_eq!(
            clean_entities_and_tags(raw, &ctx(&config)),
            "A bold word & more \u{00A0}x"
        );
    }

    #[test]
    fn unknown_entities_left_alone() {
        assert_eq!(decode_entities("AT&T &bogus; &#65;"), "AT&T &bogus; A");
    }

    #[test]
    fn markup_lines_dropped() {
        let config = NormalizeConfig::default();
        let raw = "Lead.\n* bullet\n| table cell\n[[File:X.jpg|thumb]]\n[[Category:Things]]\nSee [http://x.org site].\n: indent\nKept.";
        assert_eq!(drop_markup_lines(raw, &ctx(&config)), "Lead.\nKept.");
    }

    #[test]
    fn bold_lead_is_unwrapped_but_caption_dropped() {
        let config = NormalizeConfig::default();
        let raw = "'''Example''' is a term.\n'''Caption only'''\nNext.";
        assert_eq!(
            drop_markup_lines(raw, &ctx(&config)),
            "Example is a term.\nNext."
        );
    }

    #[test]
    fn links_simplified() {
        let config = NormalizeConfig::default();
        let c = ctx(&config);
        assert_eq!(simplify_links("A [[Cat]] sat.", &c), "A Cat sat.");
        assert_eq!(simplify_links("A [[Felis catus|cat]] sat.", &c), "A cat sat.");
        assert_eq!(simplify_links("See [note] here .", &c), "See note here.");
    }

    #[test]
    fn typography_dot_runs_after_ellipsis() {
        let config = NormalizeConfig::default();
        let c = ctx(&config);
        assert_eq!(typography_stage("Wait\u{2026}. Go.", &c), "Wait... Go.");
        assert_eq!(typography_stage("Wait\u{2026}\u{2026}", &c), "Wait...");
        assert_eq!(typography_stage("one \u{2026} two", &c), "one two");
        assert_eq!(typography_stage("so... then", &c), "so then");
        assert_eq!(typography_stage("End... Next", &c), "End... Next");
    }

    #[test]
    fn quotes_fixed() {
        let config = NormalizeConfig::default();
        let c = ctx(&config);
        assert_eq!(fix_quotes("the ''Nature'' journal", &c), "the \"Nature\" journal");
        assert_eq!(fix_quotes("called ''''x''''", &c), "called x");
        assert_eq!(fix_quotes("said \"yes.\" Then", &c), "said \"yes\". Then");
        assert_eq!(fix_quotes("a , b", &c), "a, b");
    }

    #[test]
    fn residue_lines_dropped() {
        let config = NormalizeConfig::default();
        let raw = "Good sentence.\nDangling clause,\nlowercase start.\nHas a = sign.\nHas | pipe.\n== Heading ==\nNo period\nQuoted \"end\"\nTrailing.   ";
        assert_eq!(
            drop_residue_lines(raw, &ctx(&config)),
            "Good sentence.\n== Heading ==\nQuoted \"end\"\nTrailing."
        );
    }

    #[test]
    fn bare_equals_runs_are_residue() {
        let config = NormalizeConfig::default();
        let raw = "Kept.\n==\n====  \nAlso kept.";
        assert_eq!(drop_residue_lines(raw, &ctx(&config)), "Kept.\nAlso kept.");
        assert_eq!(normalize("T", "==", &config).text, "");
    }

    #[test]
    fn lone_equals_detection() {
        assert!(has_lone_equals("a = b"));
        assert!(has_lone_equals("=start"));
        assert!(!has_lone_equals("== Heading =="));
        assert!(!has_lone_equals("no equals"));
    }

    #[test]
    fn balance_filter() {
        let config = NormalizeConfig::default();
        let raw = "Even \"quotes\" here.\nOdd \"quote here.\nStray ) paren.\nPaired (x) parens.";
        assert_eq!(
            drop_unbalanced_lines(raw, &ctx(&config)),
            "Even \"quotes\" here.\nPaired (x) parens."
        );
    }

    #[test]
    fn charset_filter() {
        let config = NormalizeConfig::default();
        let raw = "Latin é ok.\nGreek π ok.\nChinese 中文 no.\nGamma γ no.";
        assert_eq!(
            drop_disallowed_lines(raw, &ctx(&config)),
            "Latin é ok.\nGreek π ok."
        );

        let extended = NormalizeConfig::default().allow_chars("γ");
        assert_eq!(
            drop_disallowed_lines(raw, &ctx(&extended)),
            "Latin é ok.\nGreek π ok.\nGamma γ no."
        );
    }

    #[test]
    fn canonicalize_prefixes_definition() {
        let config = NormalizeConfig::default();
        let raw = "Lead  text.\n\n\nMore lead.";
        assert_eq!(
            canonicalize(raw, &ctx(&config)),
            "\n\n##### Example, Definition\nLead text.\nMore lead."
        );
    }

    #[test]
    fn canonicalize_drops_boilerplate_and_stubs() {
        let config = NormalizeConfig::default();
        let long = "Long body sentence. ".repeat(20);
        let raw = format!(
            "Lead.\n== History ==\n{long}\n== Stub ==\nShort.\n== Culture ==\n{long}\n== See also ==\n{long}\n== References ==\nRefs."
        );
        let out = canonicalize(&raw, &ctx(&config));
        assert!(out.contains("##### Example, Definition\nLead."));
        assert!(out.contains("##### Example, History\n"));
        assert!(out.contains("##### Example, Culture\n"));
        assert!(!out.contains("Stub"));
        assert!(!out.contains("See also"));
        assert!(!out.contains("References"));
    }

    #[test]
    fn canonicalize_drops_empty_sections() {
        let config = NormalizeConfig::default();
        let long = "Body text sentence. ".repeat(20);
        let raw = format!("== First ==\n== Second ==\n{long}\n== Trailing ==");
        let out = canonicalize(&raw, &ctx(&config));
        assert!(out.starts_with("\n\n##### Example, Second\n"));
        assert!(!out.contains("Definition"));
        assert!(!out.contains("First"));
        assert!(!out.contains("Trailing"));
    }

    #[test]
    fn canonicalize_skips_blank_headings() {
        let config = NormalizeConfig::default();
        let raw = "Lead.\n== ==\nOrphan line.";
        assert_eq!(
            canonicalize(raw, &ctx(&config)),
            "\n\n##### Example, Definition\nLead."
        );
    }

    #[test]
    fn canonicalize_keeps_short_final_section() {
        let config = NormalizeConfig::default();
        let raw = "Lead.\n== Legacy ==\nShort but last.";
        assert_eq!(
            canonicalize(raw, &ctx(&config)),
            "\n\n##### Example, Definition\nLead.\n\n##### Example, Legacy\nShort but last."
        );
    }

    #[test]
    fn stub_threshold_is_configurable() {
        let config = NormalizeConfig {
            stub_section_max_chars: 2,
            ..NormalizeConfig::default()
        };
        let raw = "Lead.\n== Middle ==\nShort.\n== End ==\nLast.";
        let out = canonicalize(raw, &ctx(&config));
        assert!(out.contains("##### Example, Middle\nShort."));
    }

    #[test]
    fn clean_prose_is_unchanged_except_whitespace() {
        let config = NormalizeConfig::default();
        let raw = "Rust is a  language.\n\nIt is fast.";
        let out = normalize("Rust", raw, &config);
        assert_eq!(
            out.text,
            "\n\n##### Rust, Definition\nRust is a language.\nIt is fast."
        );
    }

    #[test]
    fn normalize_full_article() {
        let config = NormalizeConfig::default();
        let history = "The term was coined long ago. ".repeat(15);
        let raw = format!(
            "{{{{Short description|A term}}}}\n{{{{Infobox thing\n| name = Example\n}}}}\n'''Example''' (from [[Latin]] ''exemplum'') is a [[term|word]] of {{{{convert|5|km}}}} length.&lt;ref&gt;Cite&lt;/ref&gt;\n\n== History ==\n{history}\n\n== See also ==\n* [[Other]]\n\n== References ==\n{{{{Reflist}}}}"
        );
        let out = normalize("Example", &raw, &config);
        assert_eq!(
            out.text,
            format!(
                "\n\n##### Example, Definition\nExample is a word of 5 km length.\n\n##### Example, History\n{}",
                history.trim_end()
            )
        );
    }

    #[test]
    fn normalize_empty_input() {
        let out = normalize("Empty", "", &NormalizeConfig::default());
        assert!(out.is_empty());
    }
}
