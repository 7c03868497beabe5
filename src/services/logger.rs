use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    const ALL: [LogLevel; 4] = [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "debug" | "trace" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    fn from_env() -> Self {
        crate::utils::feature_flags::env_text("SUGGESTIONS_LOG_LEVEL")
            .map(|raw| Self::parse(&raw))
            .unwrap_or(LogLevel::Info)
    }

    fn name(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

#[derive(Debug, Clone)]
enum Sink {
    Stderr,
    Memory(Arc<Mutex<Vec<String>>>),
}

#[derive(Debug, Clone)]
pub struct Logger {
    context: String,
    level: LogLevel,
    counts: Arc<[AtomicU64; 4]>,
    sink: Sink,
}

impl Logger {
    pub fn new(context: &str) -> Self {
        Self::with_sink(context, LogLevel::from_env(), Sink::Stderr)
    }

    pub fn capturing(context: &str) -> Self {
        Self::with_sink(context, LogLevel::Debug, Sink::Memory(Arc::default()))
    }

    fn with_sink(context: &str, level: LogLevel, sink: Sink) -> Self {
        Self {
            context: context.to_string(),
            level,
            counts: Arc::new(Default::default()),
            sink,
        }
    }

    pub fn child(&self, suffix: &str) -> Self {
        let mut child = self.clone();
        if !suffix.is_empty() {
            child.context = format!("{}:{}", self.context, suffix);
        }
        child
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn emit(&self, level: LogLevel, message: &str, meta: Option<&Value>) {
        if level > self.level {
            return;
        }
        self.counts[level as usize].fetch_add(1, Ordering::Relaxed);

        let mut line = format!("{} [{}] {}", level, self.context, message);
        if let Some(meta) = meta.filter(|meta| !meta.is_null()) {
            line.push(' ');
            line.push_str(&meta.to_string());
        }
        match &self.sink {
            Sink::Stderr => eprintln!("[{}] {}", chrono::Utc::now().to_rfc3339(), line),
            Sink::Memory(lines) => lines
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(line),
        }
    }

    pub fn error(&self, message: &str, meta: Option<&Value>) {
        self.emit(LogLevel::Error, message, meta);
    }

    pub fn warn(&self, message: &str, meta: Option<&Value>) {
        self.emit(LogLevel::Warn, message, meta);
    }

    pub fn info(&self, message: &str, meta: Option<&Value>) {
        self.emit(LogLevel::Info, message, meta);
    }

    pub fn debug(&self, message: &str, meta: Option<&Value>) {
        self.emit(LogLevel::Debug, message, meta);
    }

    pub fn captured(&self) -> Vec<String> {
        match &self.sink {
            Sink::Stderr => Vec::new(),
            Sink::Memory(lines) => lines
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone(),
        }
    }

    pub fn stats(&self) -> Value {
        let mut stats = serde_json::Map::new();
        stats.insert("context".to_string(), Value::from(self.context.as_str()));
        stats.insert("level".to_string(), Value::from(self.level.name()));
        for level in LogLevel::ALL {
            let count = self.counts[level as usize].load(Ordering::Relaxed);
            stats.insert(level.name().to_string(), Value::from(count));
        }
        Value::Object(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn level_parse_falls_back_to_info() {
        assert_eq!(LogLevel::parse("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::parse(" debug "), LogLevel::Debug);
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
    }

    #[test]
    fn child_shares_counts_and_capture() {
        let logger = Logger::capturing("suggestions");
        let child = logger.child("cache");
        child.warn("miss", Some(&json!({"key": "abc"})));
        logger.debug("plain", Some(&Value::Null));

        assert_eq!(
            logger.captured(),
            vec![
                r#"WARN [suggestions:cache] miss {"key":"abc"}"#.to_string(),
                "DEBUG [suggestions] plain".to_string(),
            ]
        );
        let stats = logger.stats();
        assert_eq!(stats["warn"], 1);
        assert_eq!(stats["debug"], 1);
        assert_eq!(stats["level"], "debug");
    }

    #[test]
    fn level_filters_messages() {
        let mut logger = Logger::capturing("t");
        logger.set_level(LogLevel::Warn);
        logger.info("hidden", None);
        logger.error("shown", None);
        assert_eq!(logger.captured(), vec!["ERROR [t] shown".to_string()]);
        assert_eq!(logger.stats()["info"], 0);
    }
}
