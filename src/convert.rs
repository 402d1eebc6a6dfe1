//! Collapses `{{convert}}` templates into plain "<value> <unit>" text.
//!
//! Conversions that cannot be read with confidence are dropped together with
//! the line that carries them.

use crate::normalize::retain_lines;
use once_cell::sync::Lazy;
use regex::Regex;

const MULTIPLIER: &str = r"(?:y|z|a|f|p|n|µ|m|c|d|da|h|k|M|G|T|P|E|Z|Y|L|S|e6|[Uu]\.?[Ss]\.?)";

const UNIT: &str = r"(?:in|inche?s?|ft|feet|foot|mi|miles?|yd|yards?|lbs?|gal|floz|oz|oilbbl|carat|°?C|°?F|atm|\$|€|£|ha|acres?|t|tonnes?|PS|T|J|W|o|B|iB|D|m|meters?|metres?|min|minutes?|s|sec|seconds?|p?h|hours?|d|days?|g|gf|A|K|mol|cd|L|l|liters?|e?V|Pa|bar|n|N|psi|AU|ly|lbf|pc|cal|hp|knot|[Mm]ach|cc)";

const POWER: &str = r"(?:[0-9]+|²|³)?";

const SEPARATOR: &str = r"(?:by|to|and|or|x|×|-|\+/-|±|\*)";

const OPEN: &str = r"\{\{(?:[cC]onvert|cvt) *\| *";

const CLOSE: &str = r" *(?:\|[^\n]*?\}\}|\}\})";

fn unit_expr() -> String {
    let simple = format!("(?:sq)?{MULTIPLIER}?{UNIT}{POWER}");
    format!("{simple}(?:(?:/|p|\\.){simple})?")
}

static RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    let num = r"[-+±]?[0-9][0-9.,]*";
    Regex::new(&format!(
        r"{OPEN}(?P<v1>{num}) *\| *(?P<sep>{SEPARATOR}) *\| *(?P<v2>{num}) *\| *(?P<unit>{unit}){CLOSE}",
        unit = unit_expr()
    ))
    .unwrap()
});

static CONVERT_REGEX: Lazy<Regex> = Lazy::new(|| {
    let value = r"[-+±.]?[0-9][0-9.,\- /+x*×±()bytoand]*?";
    Regex::new(&format!(
        r"{OPEN}(?P<value>{value}) *\| *(?P<unit>{unit}){CLOSE}",
        unit = unit_expr()
    ))
    .unwrap()
});

static RESIDUE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(?:[cC]onvert|cvt).*?\}\}").unwrap());

pub fn rewrite_conversions(text: &str) -> String {
    let ranged = RANGE_REGEX.replace_all(text, "$v1 $sep $v2 $unit");
    let converted = CONVERT_REGEX.replace_all(&ranged, |caps: &regex::Captures| {
        format!("{} {}", caps["value"].trim(), &caps["unit"])
    });
    retain_lines(&converted, |line| !RESIDUE_REGEX.is_match(line))
}
