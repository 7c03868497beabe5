pub fn is_truthy(value: impl AsRef<str>) -> bool {
    matches!(
        value.as_ref().trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .filter(|raw| !raw.trim().is_empty())
        .map(is_truthy)
}

pub fn env_text(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

#[cfg(test)]
mod tests {
    use super::is_truthy;

    #[test]
    fn truthy_spellings() {
        for raw in ["1", "true", " YES ", "on"] {
            assert!(is_truthy(raw), "{}", raw);
        }
        for raw in ["0", "false", "", "nope"] {
            assert!(!is_truthy(raw), "{}", raw);
        }
    }
}
