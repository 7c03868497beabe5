use super::{highlight, Chunk};
use crate::constants::markup::{
    LINKED_PARTS_SEPARATOR, NOWRAP_CLASS, SUBTEXT_CLASS, SUBTEXT_DELIMITER_CLASS,
    SUBTEXT_INLINE_CLASS, VALUE_CLASS,
};
use crate::models::Suggestion;
use crate::utils::tokens::Stopwords;
use once_cell::sync::Lazy;
use regex::Regex;

static POSTAL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d{6}( РОССИЯ)?, ").expect("postal prefix regex"));

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_chunks(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            let text = escape_html(&chunk.text);
            if chunk.matched && !text.is_empty() {
                format!("<strong>{}</strong>", text)
            } else {
                text
            }
        })
        .collect()
}

pub fn nowrap_linked_parts(formatted: &str) -> String {
    let parts: Vec<&str> = formatted.split(LINKED_PARTS_SEPARATOR).collect();
    if parts.len() == 1 {
        return formatted.to_string();
    }
    parts
        .iter()
        .map(|part| format!("<span class=\"{}\">{}</span>", NOWRAP_CLASS, part))
        .collect::<Vec<_>>()
        .join(LINKED_PARTS_SEPARATOR)
}

pub fn highlight_html(
    value: &str,
    query: &str,
    unformattable: Option<&Stopwords>,
    max_length: Option<usize>,
) -> String {
    if value.is_empty() {
        return String::new();
    }
    let chunks = highlight(value, query, unformattable, max_length);
    nowrap_linked_parts(&render_chunks(&chunks))
}

pub fn has_match(formatted: &str) -> bool {
    formatted.contains("<strong>")
}

pub fn choose_formatted(main: String, alt: String) -> String {
    if has_match(&alt) && !has_match(&main) {
        alt
    } else {
        main
    }
}

pub fn wrap_formatted_value(formatted: &str, suggestion: &Suggestion) -> String {
    match suggestion.data_text("state.status") {
        Some(status) => format!(
            "<span class=\"{}\" data-suggestion-status=\"{}\">{}</span>",
            VALUE_CLASS,
            escape_html(&status),
            formatted
        ),
        None => format!("<span class=\"{}\">{}</span>", VALUE_CLASS, formatted),
    }
}

pub fn format_value(
    suggestion: &Suggestion,
    query: &str,
    unformattable: Option<&Stopwords>,
    max_length: Option<usize>,
) -> String {
    let formatted = highlight_html(&suggestion.value, query, unformattable, max_length);
    wrap_formatted_value(&formatted, suggestion)
}

pub fn strip_postal_prefix(address: &str) -> String {
    POSTAL_PREFIX.replace(address, "").into_owned()
}

pub fn group_digits(formatted: &str, lengths: &[usize]) -> String {
    let mut chars = formatted.chars().peekable();
    let mut groups = Vec::with_capacity(lengths.len());
    for length in lengths {
        let mut remaining = *length;
        let mut group = String::new();
        while remaining > 0 {
            let Some(c) = chars.next() else {
                break;
            };
            group.push(c);
            if c.is_ascii_digit() {
                remaining -= 1;
            }
        }
        groups.push(group);
    }
    let delimiter = format!("<span class=\"{}\"></span>", SUBTEXT_DELIMITER_CLASS);
    let mut out = groups.join(&delimiter);
    out.extend(chars);
    out
}

pub fn subtext(inline: &str, rest: &str) -> String {
    format!(
        "<div class=\"{}\"><span class=\"{}\">{}</span>{}</div>",
        SUBTEXT_CLASS, SUBTEXT_INLINE_CLASS, inline, rest
    )
}
