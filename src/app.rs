use crate::errors::SuggestError;
use crate::models::{Suggestion, SuggestionsOptions};
use crate::services::http_fetcher::HttpFetcher;
use crate::services::listener::{RenderedSuggestion, SuggestionsListener};
use crate::services::logger::Logger;
use crate::widget::{SelectOptions, Suggestions};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Input(String),
    Select,
    Pick(usize),
    Fix,
    Clear,
    ClearCache,
    Status,
    Stats,
    Set(Value),
    Quit,
}

impl FromStr for Command {
    type Err = SuggestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Command::Input(line.to_string()));
        };
        let (name, rest) = command
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((command, ""));
        match name {
            "select" => Ok(Command::Select),
            "pick" => rest.parse().map(Command::Pick).map_err(|_| {
                SuggestError::configuration(format!("Invalid index: '{}'", rest))
                    .with_hint("Usage: :pick <index>")
            }),
            "fix" => Ok(Command::Fix),
            "clear" => Ok(Command::Clear),
            "clear-cache" => Ok(Command::ClearCache),
            "status" => Ok(Command::Status),
            "stats" => Ok(Command::Stats),
            "set" => serde_json::from_str(rest).map(Command::Set).map_err(|err| {
                SuggestError::configuration(format!("Invalid options JSON: {}", err))
                    .with_hint("Usage: :set {\"count\": 10}")
            }),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(SuggestError::configuration(format!("Unknown command: ':{}'", other))
                .with_hint(
                    "Commands: :select, :pick N, :fix, :clear, :clear-cache, :status, :stats, :set JSON, :quit",
                )),
        }
    }
}

struct EventListener {
    events: mpsc::UnboundedSender<Value>,
}

impl EventListener {
    fn emit(&self, event: Value) {
        let _ = self.events.send(event);
    }
}

impl SuggestionsListener for EventListener {
    fn render(&self, suggestions: &[RenderedSuggestion]) {
        self.emit(serde_json::json!({ "event": "render", "suggestions": suggestions }));
    }

    fn hide(&self) {
        self.emit(serde_json::json!({ "event": "hide" }));
    }

    fn on_search_error(&self, query: Option<&str>, error: &SuggestError) {
        self.emit(serde_json::json!({ "event": "search_error", "query": query, "error": error }));
    }

    fn on_select(&self, suggestion: &Suggestion, value_changed: bool) {
        self.emit(serde_json::json!({
            "event": "select",
            "suggestion": suggestion,
            "value_changed": value_changed,
        }));
    }

    fn on_select_nothing(&self, query: &str) {
        self.emit(serde_json::json!({ "event": "select_nothing", "query": query }));
    }

    fn on_invalidate_selection(&self, suggestion: &Suggestion) {
        self.emit(serde_json::json!({ "event": "invalidate_selection", "suggestion": suggestion }));
    }
}

pub struct App {
    pub logger: Logger,
    pub widget: Suggestions,
    events: mpsc::UnboundedReceiver<Value>,
}

impl App {
    pub async fn initialize(options: SuggestionsOptions) -> Result<Self, SuggestError> {
        let logger = Logger::new("suggestions");
        let fetcher = Arc::new(HttpFetcher::new(logger.clone(), &options)?);
        let widget = Suggestions::with_logger(options, fetcher, logger.clone());
        if let Some(err) = widget.configuration_error() {
            return Err(err);
        }

        let (sender, events) = mpsc::unbounded_channel();
        widget.add_listener(Arc::new(EventListener { events: sender }));

        if widget.check_status().await.is_ok() {
            let geo = widget.check_location().await;
            logger.debug("Location", Some(&serde_json::json!({ "geo": format!("{:?}", geo) })));
        }
        logger.info(
            "Widget ready",
            Some(&serde_json::json!({ "type": widget.kind() })),
        );

        Ok(Self {
            logger,
            widget,
            events,
        })
    }

    pub async fn handle(&self, command: Command) -> Result<Option<Value>, SuggestError> {
        let widget = &self.widget;
        match command {
            Command::Input(value) => {
                widget.input(&value).await;
                Ok(None)
            }
            Command::Select => {
                let index = widget.select_current_value(SelectOptions::default()).await;
                Ok(Some(serde_json::json!({ "selected_index": index, "value": widget.value() })))
            }
            Command::Pick(index) => {
                widget.select(Some(index), SelectOptions::default()).await;
                Ok(Some(serde_json::json!({ "value": widget.value() })))
            }
            Command::Fix => {
                widget.fix_data().await;
                Ok(Some(serde_json::json!({
                    "value": widget.value(),
                    "selection": widget.selection(),
                })))
            }
            Command::Clear => {
                widget.clear();
                Ok(None)
            }
            Command::ClearCache => {
                widget.clear_cache();
                Ok(None)
            }
            Command::Status => widget.check_status().await.map(Some),
            Command::Stats => Ok(Some(serde_json::json!({
                "cache": widget.cache_stats(),
                "log": self.logger.stats(),
            }))),
            Command::Set(patch) => {
                widget.set_options(&patch)?;
                Ok(Some(serde_json::json!({ "options": widget.options() })))
            }
            Command::Quit => Ok(None),
        }
    }

    pub fn drain_events(&mut self) -> Vec<Value> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_lines_are_input() {
        assert_eq!(
            "г Москва ".parse::<Command>().unwrap(),
            Command::Input("г Москва ".to_string())
        );
    }

    #[test]
    fn parses_commands() {
        assert_eq!(":select".parse::<Command>().unwrap(), Command::Select);
        assert_eq!(":pick 2".parse::<Command>().unwrap(), Command::Pick(2));
        assert_eq!(
            ":set {\"count\": 10}".parse::<Command>().unwrap(),
            Command::Set(json!({"count": 10}))
        );
        assert_eq!(":exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn bad_commands_carry_hints() {
        let err = ":pick two".parse::<Command>().unwrap_err();
        assert!(err.hint.unwrap().contains(":pick"));
        let err = ":frobnicate".parse::<Command>().unwrap_err();
        assert!(err.message.contains("frobnicate"));
    }
}
