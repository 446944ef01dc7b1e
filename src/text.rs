//! Text utilities: HTML-to-plain-text conversion and handle normalization.

use regex::Regex;
use scraper::{Html, Node};

use crate::error::{FetchError, Result};

/// Converts an HTML fragment into plain text.
///
/// Tags are dropped and entities decoded. `<br>` becomes a newline and every
/// paragraph after the first starts on a new blank-line-separated block.
/// Runs of three or more newlines collapse to two and the result is trimmed.
/// Plain text passes through with only its entities decoded.
pub fn to_plain_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());

    for node in fragment.tree.root().descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => match element.name() {
                "br" => out.push('\n'),
                "p" if !out.is_empty() => out.push_str("\n\n"),
                _ => {}
            },
            _ => {}
        }
    }

    collapse_newlines(&out).trim().to_string()
}

fn collapse_newlines(text: &str) -> String {
    match Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+") {
        Ok(re) => re.replace_all(text, "\n\n").into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Normalizes a user handle: strips a leading `@` and validates the rest.
///
/// Accepts 1 to 30 ASCII letters, digits or underscores.
pub fn normalize_handle(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let handle = trimmed.strip_prefix('@').unwrap_or(trimmed);

    let re = Regex::new(r"^[A-Za-z0-9_]{1,30}$")
        .map_err(|e| FetchError::Config(format!("handle pattern: {}", e)))?;
    if re.is_match(handle) {
        Ok(handle.to_string())
    } else {
        Err(FetchError::InvalidArgument(format!(
            "Invalid handle '{}': expected 1-30 letters, digits or underscores",
            raw
        )))
    }
}
