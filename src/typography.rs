//! Character-level tables used by the normalizer.
//!
//! The substitution table maps single characters to ASCII replacements and is
//! applied in one pass, so no replacement can feed another.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Characters rewritten during typography normalization, in table order.
pub const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2014}', "-"),  // em dash
    ('\u{2013}', "-"),  // en dash
    ('\u{2212}', "-"),  // minus sign
    ('\u{2010}', "-"),  // hyphen
    ('\u{2015}', "-"),  // horizontal bar
    ('\u{2019}', "'"),
    ('\u{02BC}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2033}', "\""), // double prime
    ('\u{02BB}', "'"),
    ('\u{2032}', "'"),  // prime
    ('\u{2018}', "'"),
    ('\u{02C8}', "'"),  // IPA stress mark
    ('\u{00A0}', " "),
    ('\u{00B1}', "+/-"),
    ('\u{0430}', "a"),  // Cyrillic a
    ('\u{0441}', "c"),  // Cyrillic es
    ('\u{03BF}', "o"),  // Greek omicron
    ('\u{223C}', "~"),
    ('\u{2248}', "~"),
    ('\u{00BD}', "1/2"),
    ('\u{2153}', "1/3"),
    ('\u{2026}', "..."),
    ('\u{2024}', "."),
    ('\u{2217}', "*"),
];

static SUBSTITUTION_MAP: Lazy<FxHashMap<char, &'static str>> =
    Lazy::new(|| SUBSTITUTIONS.iter().copied().collect());

/// Highest code point allowed without being listed explicitly
/// (ASCII, Latin-1, Latin Extended A/B, IPA extensions, combining marks).
pub const ALLOWED_BLOCK_END: char = '\u{036F}';

pub fn substitute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match SUBSTITUTION_MAP.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

pub fn is_allowed_char(c: char, extra: &[char]) -> bool {
    c <= ALLOWED_BLOCK_END || extra.contains(&c)
}
