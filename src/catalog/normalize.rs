use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

fn strip_diacritics(s: &str) -> String {
    s.nfkd().filter(|&c| !is_combining_mark(c)).collect()
}

/// Sorting / comparison key: diacritics stripped, `/` and `-` turned into
/// spaces, whitespace collapsed, upper-cased.
pub fn normalize(s: &str) -> String {
    // Upper-casing can itself produce combining marks, hence the second strip.
    let folded = strip_diacritics(&strip_diacritics(s).to_uppercase());
    folded
        .replace(['/', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capital-table key for a province: normalized with every space removed,
/// so "Ciudad Real" and "CIUDADREAL" collide.
pub fn province_key(province: &str) -> String {
    normalize(province).replace(' ', "")
}

/// First run of decimal digits anywhere in a classification label
/// ("4 ESTRELLAS", "H3*", "Hotel 5"). Anything else counts as zero stars.
pub fn parse_stars(label: &str) -> u32 {
    label
        .split(|c: char| !c.is_ascii_digit())
        .find(|part| !part.is_empty())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
