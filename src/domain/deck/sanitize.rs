//! Text sanitization applied to every title, body and table cell before rendering.
//!
//! The pass is deterministic and idempotent. It runs three steps in order:
//!
//! 1. Strip control characters in `U+0000..=U+0008`, `U+000B`, `U+000C`,
//!    `U+000E..=U+001F` and `U+007F`. Tab, line feed and carriage return survive
//!    so that body text keeps its line structure.
//! 2. Replace every dash in `U+2010..=U+2015` (hyphen through horizontal bar)
//!    with an ASCII hyphen-minus.
//! 3. Trim leading and trailing whitespace.

/// Returns true for characters removed by the control-character step.
pub fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{0008}' | '\u{000B}' | '\u{000C}' | '\u{000E}'..='\u{001F}' | '\u{007F}')
}

/// Returns true for characters folded into `-` by the dash step.
pub fn is_dash_variant(c: char) -> bool {
    matches!(c, '\u{2010}'..='\u{2015}')
}

/// Normalizes generated text into presentable slide text.
pub fn sanitize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !is_stripped_control(*c))
        .map(|c| if is_dash_variant(c) { '-' } else { c })
        .collect();

    cleaned.trim().to_string()
}

/// Same as [`sanitize`], with an absent value mapping to the empty string.
pub fn sanitize_opt(text: Option<&str>) -> String {
    text.map(sanitize).unwrap_or_default()
}
