pub mod label;
pub mod markup;

use crate::constants::delimiters::is_word_delimiter;
use crate::constants::markup::ELLIPSIS;
use crate::utils::tokens::{expand_sub_tokens, normalize_token, Stopwords};
use regex::Regex;
use serde::Serialize;

const WORD_PART_CLASS: &str = r"\-\+/\\\?!@#\$%\^&";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub text: String,
    /// Lowercased text with `ё` folded; same char count as `text`.
    pub normalized: String,
    pub matchable: bool,
    pub matched: bool,
    #[serde(skip)]
    upper_case: bool,
}

impl Chunk {
    fn word(text: &str) -> Self {
        Self {
            text: text.to_string(),
            normalized: normalize_token(text),
            matchable: true,
            matched: false,
            upper_case: text.to_lowercase() != text,
        }
    }

    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            normalized: normalize_token(text),
            matchable: false,
            matched: false,
            upper_case: false,
        }
    }

    fn part(&self, from: usize, to: usize, matchable: bool) -> Self {
        Self {
            text: char_slice(&self.text, from, to),
            normalized: char_slice(&self.normalized, from, to),
            matchable,
            matched: false,
            upper_case: false,
        }
    }

    fn eligible(&self, unformattable: Option<&Stopwords>) -> bool {
        self.matchable
            && !self.matched
            && !self.text.is_empty()
            && (self.upper_case
                || !unformattable
                    .map(|tokens| tokens.contains(self.normalized.as_str()))
                    .unwrap_or(false))
    }
}

fn char_slice(text: &str, from: usize, to: usize) -> String {
    text.chars().skip(from).take(to.saturating_sub(from)).collect()
}

struct TokenHit {
    before_text: usize,
    before_delimiter: usize,
    token: usize,
    after: usize,
}

fn token_matcher(token: &str) -> Option<Regex> {
    let pattern = format!(
        r"^(?:(.*)([{parts}]+))?({token})([^{parts}]*[{parts}]*)",
        parts = WORD_PART_CLASS,
        token = regex::escape(token)
    );
    Regex::new(&pattern).ok()
}

fn find_hit(matchers: &[Regex], normalized: &str) -> Option<TokenHit> {
    let count = |m: Option<regex::Match<'_>>| m.map(|m| m.as_str().chars().count()).unwrap_or(0);
    matchers.iter().find_map(|matcher| {
        let caps = matcher.captures(normalized)?;
        Some(TokenHit {
            before_text: count(caps.get(1)),
            before_delimiter: count(caps.get(2)),
            token: count(caps.get(3)),
            after: count(caps.get(4)),
        })
    })
}

fn split_chunk(chunk: &Chunk, hit: &TokenHit) -> Vec<Chunk> {
    let total = chunk.normalized.chars().count();
    let token_start = hit.before_text + hit.before_delimiter;
    let token_end = token_start + hit.token;
    let after_end = token_end + hit.after;

    let mut matched = chunk.part(token_start, token_end, true);
    matched.matched = true;

    [
        chunk.part(0, hit.before_text, true),
        chunk.part(hit.before_text, token_start, false),
        matched,
        chunk.part(token_end, after_end, false),
        chunk.part(after_end, total, true),
    ]
    .into_iter()
    .filter(|piece| !piece.text.is_empty())
    .collect()
}

fn split_value(value: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_delimiter = false;
    for c in value.chars() {
        let delimiter = is_word_delimiter(c);
        if delimiter != in_delimiter && !current.is_empty() {
            chunks.push(if in_delimiter {
                Chunk::plain(&current)
            } else {
                Chunk::word(&current)
            });
            current.clear();
        }
        in_delimiter = delimiter;
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(if in_delimiter {
            Chunk::plain(&current)
        } else {
            Chunk::word(&current)
        });
    }
    chunks
}

pub fn query_tokens(query: &str) -> Vec<String> {
    let words: Vec<String> = normalize_token(query)
        .split(is_word_delimiter)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    expand_sub_tokens(&words)
}

fn truncate(chunks: Vec<Chunk>, max_length: usize) -> Vec<Chunk> {
    let mut budget = max_length as isize;
    let mut kept = Vec::with_capacity(chunks.len());
    for mut chunk in chunks {
        if budget < 0 {
            break;
        }
        let length = chunk.text.chars().count() as isize;
        budget -= length;
        if budget < 0 {
            let keep = (length + budget).max(0) as usize;
            chunk.text = chunk.text.chars().take(keep).collect();
            chunk.text.push_str(ELLIPSIS);
        }
        kept.push(chunk);
    }
    kept
}

pub fn highlight(
    value: &str,
    query: &str,
    unformattable: Option<&Stopwords>,
    max_length: Option<usize>,
) -> Vec<Chunk> {
    let mut chunks = split_value(value);
    let matchers: Vec<Regex> = query_tokens(query)
        .iter()
        .filter_map(|token| token_matcher(token))
        .collect();

    let mut idx = 0;
    while idx < chunks.len() {
        if chunks[idx].eligible(unformattable) {
            if let Some(hit) = find_hit(&matchers, &chunks[idx].normalized) {
                let pieces = split_chunk(&chunks[idx], &hit);
                chunks.splice(idx..=idx, pieces);
                continue;
            }
        }
        idx += 1;
    }

    match max_length {
        Some(limit) if limit > 0 => truncate(chunks, limit),
        _ => chunks,
    }
}
