//! Repair pipeline for raw model output.
//!
//! Steps, in order:
//! 1. strip Markdown fences and surrounding whitespace;
//! 2. cut out the first top-level `{ ... }` object;
//! 3. turn smart quotes into ASCII quotes;
//! 4. rewrite a `"nutrition": ["k": "v", ...]` list into an object;
//! 5. drop trailing commas before `}` or `]`;
//! 6. parse strictly, then permissively.
//!
//! Running the pipeline on its own strictly valid output yields the same
//! structure again.

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GeneratorError, Result};
use crate::literal;

/// Run steps 1 through 5 and return the repaired object text.
///
/// # Errors
/// [`GeneratorError::NoJsonFound`] when the text has no `{`.
pub fn repair(raw: &str) -> Result<String> {
    let unfenced = strip_fences(raw);
    let object = extract_object(&unfenced).ok_or(GeneratorError::NoJsonFound)?;
    let quoted = normalize_quotes(object);
    let nutrition = rewrite_nutrition_pairs(&quoted);
    Ok(strip_trailing_commas(&nutrition))
}

/// Full pipeline: repair, then parse into a JSON object.
///
/// # Errors
/// - [`GeneratorError::NoJsonFound`] when no object is present
/// - [`GeneratorError::Unparseable`] when both parsers reject the object
pub fn repair_and_parse(raw: &str) -> Result<Map<String, Value>> {
    let blob = repair(raw)?;
    let value = match serde_json::from_str::<Value>(&blob) {
        Ok(v) => v,
        Err(strict) => {
            debug!(
                target: "recipe_generator::repair",
                error = %strict,
                "strict parse failed; trying literal parser"
            );
            literal::parse(&blob)
                .map_err(|lit| GeneratorError::Unparseable(format!("{strict}; {lit}")))?
        }
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(GeneratorError::Unparseable(format!(
            "expected an object, got {}",
            type_name(&other)
        ))),
    }
}

/// Remove ```` ``` ```` and ```` ```json ```` markers anywhere, then trim.
pub fn strip_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find("```") {
        out.push_str(&rest[..at]);
        rest = &rest[at + 3..];
        if rest.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json")) {
            rest = &rest[4..];
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// First balanced top-level object, skipping braces inside double-quoted
/// strings. Without a balanced close, everything from the first `{` to the
/// last `}` is returned.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }

    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn is_smart_double(c: char) -> bool {
    matches!(c, '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}')
}

fn is_smart_single(c: char) -> bool {
    matches!(c, '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}')
}

/// `true` when the next non-blank character ends a JSON string token.
fn closes_token(rest: &str) -> bool {
    match rest.chars().find(|c| !c.is_whitespace()) {
        None => true,
        Some(c) => matches!(c, ':' | ',' | '}' | ']'),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Opener {
    Ascii,
    Smart,
}

/// Replace smart quotes with ASCII ones, string-aware.
///
/// Outside a string a smart double quote opens one. A string opened by a
/// smart quote closes on a smart or ASCII quote followed by `:`, `,`, `}`
/// or `]`; any other quote inside it is escaped as text. A string opened
/// by an ASCII quote closes only on an ASCII quote, and every smart quote
/// inside it is text. Smart single quotes become `'`.
pub fn normalize_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut open: Option<Opener> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if is_smart_single(c) {
            out.push('\'');
            escaped = false;
            continue;
        }
        let Some(opener) = open else {
            match c {
                '"' => {
                    open = Some(Opener::Ascii);
                    out.push('"');
                }
                c if is_smart_double(c) => {
                    open = Some(Opener::Smart);
                    out.push('"');
                }
                _ => out.push(c),
            }
            continue;
        };
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        let rest = &text[i + c.len_utf8()..];
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' if opener == Opener::Ascii || closes_token(rest) => {
                open = None;
                out.push('"');
            }
            c if is_smart_double(c) && opener == Opener::Smart && closes_token(rest) => {
                open = None;
                out.push('"');
            }
            c if c == '"' || is_smart_double(c) => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

/// Rewrite `"nutrition": [ "k": "v", ... ]` into `"nutrition": {"k": "v", ...}`.
///
/// Only lists holding at least one `"k": value` pair are touched, so a
/// plain positional list stays a list.
pub fn rewrite_nutrition_pairs(text: &str) -> String {
    let (Ok(list_re), Ok(pair_re)) = (
        Regex::new(r#"(?s)"nutrition"\s*:\s*\[(.*?)\]"#),
        Regex::new(r#""([^"]+)"\s*:\s*(?:"([^"]*)"|(-?\d+(?:\.\d+)?))"#),
    ) else {
        return text.to_string();
    };

    list_re
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let inner = caps.get(1).map_or("", |m| m.as_str());
            let pairs: Vec<String> = pair_re
                .captures_iter(inner)
                .filter_map(|p| {
                    let key = p.get(1)?.as_str();
                    match (p.get(2), p.get(3)) {
                        (Some(s), _) => Some(format!("\"{key}\":\"{}\"", s.as_str())),
                        (None, Some(n)) => Some(format!("\"{key}\":{}", n.as_str())),
                        (None, None) => None,
                    }
                })
                .collect();
            if pairs.is_empty() {
                caps[0].to_string()
            } else {
                format!("\"nutrition\": {{{}}}", pairs.join(", "))
            }
        })
        .into_owned()
}

/// Drop commas that directly precede `}` or `]`, outside strings.
pub fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = in_string {
            out.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if c == q => in_string = None,
                _ => {}
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_string = Some(c);
                out.push(c);
            }
            ',' => {
                let next = text[i + 1..].chars().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}' | ']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
