use crate::app::{App, Command};
use crate::errors::SuggestError;
use crate::models::SuggestionsOptions;
use clap::Parser;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

#[derive(Debug, Parser)]
#[command(
    name = "suggestions",
    version,
    about = "Drives an autocomplete widget from stdin, one value or :command per line"
)]
pub struct Args {
    #[arg(long = "type", default_value = "ADDRESS", help = "NAME, ADDRESS, PARTY, EMAIL, BANK or PROFESSIONS")]
    pub kind: String,

    #[arg(long, help = "Base URL of the suggestions API")]
    pub service_url: Option<String>,

    #[arg(long)]
    pub token: Option<String>,

    #[arg(long, help = "Bound range such as city-street")]
    pub bounds: Option<String>,

    #[arg(long, help = "Debounce delay in milliseconds")]
    pub defer: Option<u64>,

    #[arg(long, help = "Extra options as a JSON object")]
    pub options: Option<String>,
}

impl Args {
    pub fn to_options(&self) -> Result<SuggestionsOptions, SuggestError> {
        let base = match &self.options {
            Some(raw) => {
                let value: Value = serde_json::from_str(raw).map_err(|err| {
                    SuggestError::configuration(format!("--options is not JSON: {}", err))
                })?;
                SuggestionsOptions::from_value(&value)?
            }
            None => SuggestionsOptions::default(),
        };
        let mut options = base.apply_env();
        options.type_name = Some(self.kind.clone());
        if let Some(url) = &self.service_url {
            options.service_url = Some(url.clone());
        }
        if let Some(token) = &self.token {
            options.token = Some(token.clone());
        }
        if let Some(bounds) = &self.bounds {
            options.bounds = Some(bounds.clone());
        }
        if let Some(defer) = self.defer {
            options.defer_request_by = defer;
        }
        options.validate()?;
        Ok(options)
    }
}

fn io_error(err: std::io::Error) -> SuggestError {
    SuggestError::network(format!("stdio: {}", err))
}

pub async fn run_stdio() -> Result<(), SuggestError> {
    let args = Args::parse();
    let mut app = App::initialize(args.to_options()?).await?;

    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    let mut writer = BufWriter::new(tokio::io::stdout());

    while let Some(line) = reader.next_line().await.map_err(io_error)? {
        if line.trim().is_empty() {
            continue;
        }

        let outcome = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => app.handle(command).await,
            Err(err) => Err(err),
        };

        let mut lines: Vec<Value> = app.drain_events();
        match outcome {
            Ok(Some(result)) => lines.push(serde_json::json!({ "result": result })),
            Ok(None) => {}
            Err(err) => lines.push(serde_json::json!({ "error": err })),
        }
        for value in lines {
            let payload = serde_json::to_string(&value).unwrap_or_default();
            writer.write_all(payload.as_bytes()).await.map_err(io_error)?;
            writer.write_all(b"\n").await.map_err(io_error)?;
        }
        writer.flush().await.map_err(io_error)?;
    }

    app.widget.dispose();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_options_json() {
        let args = Args::parse_from([
            "suggestions",
            "--type",
            "party",
            "--service-url",
            "https://suggestions.example.com/api",
            "--defer",
            "0",
            "--options",
            r#"{"count": 10, "deferRequestBy": 300}"#,
        ]);
        let options = args.to_options().unwrap();
        assert_eq!(options.type_name.as_deref(), Some("party"));
        assert_eq!(options.count, 10);
        assert_eq!(options.defer_request_by, 0);
        assert_eq!(
            options.service_url.as_deref(),
            Some("https://suggestions.example.com/api")
        );
    }

    #[test]
    fn invalid_options_json_is_rejected() {
        let args = Args::parse_from(["suggestions", "--options", "{nope"]);
        assert!(args.to_options().is_err());
    }
}
