pub mod version {
    pub const PLUGIN_VERSION: &str = "15.8.1";
    pub const USER_AGENT: &str = "suggestions/15.8";
}

pub mod delimiters {
    pub fn is_word_delimiter(c: char) -> bool {
        c.is_whitespace()
            || matches!(
                c,
                '"' | '\'' | '~' | '*' | '.' | ',' | ':' | '|' | '[' | ']' | '(' | ')' | '{'
                    | '}' | '<' | '>' | '№'
            )
    }

    pub fn is_word_part_delimiter(c: char) -> bool {
        matches!(
            c,
            '-' | '+' | '/' | '\\' | '?' | '!' | '@' | '#' | '$' | '%' | '^' | '&'
        )
    }
}

pub mod defaults {
    pub const MIN_CHARS: usize = 1;
    pub const DEFER_REQUEST_BY_MS: u64 = 100;
    pub const TIMEOUT_MS: u64 = 3_000;
    pub const COUNT: u32 = 5;
    pub const PARAM_NAME: &str = "query";
    pub const HINT: &str = "Выберите вариант или продолжите ввод";
}

pub mod markup {
    pub const NOWRAP_CLASS: &str = "suggestions-nowrap";
    pub const VALUE_CLASS: &str = "suggestions-value";
    pub const SUBTEXT_CLASS: &str = "suggestions-subtext";
    pub const SUBTEXT_INLINE_CLASS: &str = "suggestions-subtext suggestions-subtext_inline";
    pub const SUBTEXT_DELIMITER_CLASS: &str = "suggestions-subtext-delimiter";
    pub const ELLIPSIS: &str = "...";
    pub const LINKED_PARTS_SEPARATOR: &str = ", ";
}

pub mod kladr {
    pub const LENGTHS: &[(&str, usize, usize)] = &[
        ("region", 2, 11),
        ("area", 5, 8),
        ("city", 8, 5),
        ("settlement", 11, 2),
        ("street", 15, 2),
        ("house", 19, 0),
    ];
}

pub mod location {
    pub const FIELDS: &[&str] = &[
        "kladr_id",
        "postal_code",
        "region",
        "area",
        "city",
        "settlement",
        "street",
    ];
}
