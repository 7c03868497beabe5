#[tokio::main]
async fn main() {
    if let Err(err) = suggestions::cli::run_stdio().await {
        eprintln!("suggestions: {}", err);
        if let Some(hint) = &err.hint {
            eprintln!("hint: {}", hint);
        }
        std::process::exit(1);
    }
}
