use serde_json::Value;

/// Typographic characters replaced by their ASCII counterparts.
const TYPOGRAPHIC: &[(char, &str)] = &[
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
];

/// Decodes HTML entities until nothing decodes any further.
///
/// Each pass follows the HTML5 rules: every named reference, numeric
/// references, and the legacy names that may omit the `;` (`&amp`, `&nbsp`).
pub fn unescape_html(s: &str) -> String {
    let mut current = s.to_string();
    loop {
        let next = htmlize::unescape(current.as_str()).into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Unescapes HTML, folds smart quotes, dashes and ellipses to ASCII, trims.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(text: &str) -> String {
    let mut out = unescape_html(text);
    for (from, to) in TYPOGRAPHIC {
        if out.contains(*from) {
            out = out.replace(*from, to);
        }
    }
    out.trim().to_string()
}

/// [`normalize`] for loosely typed JSON input; anything but a string is `""`.
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::String(s) => normalize(s),
        _ => String::new(),
    }
}
