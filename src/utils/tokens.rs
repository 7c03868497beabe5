use crate::constants::delimiters::{is_word_delimiter, is_word_part_delimiter};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub type Stopwords = HashSet<&'static str>;

static DIGITS_THEN_LETTERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)([а-яА-ЯёЁ]{2,})").expect("digits/letters regex"));
static LETTERS_THEN_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([а-яА-ЯёЁ]+)([0-9]+)").expect("letters/digits regex"));

pub fn split_words(text: &str, stopwords: Option<&Stopwords>) -> Vec<String> {
    let separated = DIGITS_THEN_LETTERS.replace_all(text, "$1 $2");
    let separated = LETTERS_THEN_DIGITS.replace_all(&separated, "$1 $2");

    let mut words: Vec<String> = separated
        .split(is_word_delimiter)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect();
    let Some(last) = words.pop() else {
        return words;
    };
    if let Some(stopwords) = stopwords {
        words.retain(|word| !stopwords.contains(word.as_str()));
    }
    words.push(last);
    words
}

pub fn normalize(text: &str, stopwords: Option<&Stopwords>) -> String {
    split_words(text, stopwords).join(" ")
}

pub fn normalize_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    let folded = match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => c,
    };
    if folded == 'ё' {
        'е'
    } else {
        folded
    }
}

pub fn normalize_token(token: &str) -> String {
    token.chars().map(normalize_char).collect()
}

pub fn expand_sub_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut push = |token: &str, result: &mut Vec<String>| {
        if seen.insert(token.to_string()) {
            result.push(token.to_string());
        }
    };
    for token in tokens {
        let token = token.as_ref();
        push(token, &mut result);
        let parts: Vec<&str> = token.split(is_word_part_delimiter).collect();
        if parts.len() > 1 {
            for part in parts.into_iter().filter(|p| !p.is_empty()) {
                push(part, &mut result);
            }
        }
    }
    result
}

pub fn word_tokens(text: &str, stopwords: Option<&Stopwords>) -> Vec<String> {
    expand_sub_tokens(&split_words(&text.to_lowercase(), stopwords))
}

pub fn string_encloses(outer: &str, inner: &str) -> bool {
    outer.len() > inner.len() && outer.contains(inner)
}

pub fn is_subset<S: AsRef<str>>(subset: &[S], superset: &[String]) -> bool {
    let lookup: HashSet<&str> = superset.iter().map(String::as_str).collect();
    subset.iter().all(|token| lookup.contains(token.as_ref()))
}
