use kitchenfire_import::{ExtractResult, RecipeExtractor, TranscriptPayload};
use log::error;
use std::env;
use tokio::io::AsyncReadExt;

const USAGE: &str = "Usage: kitchenfire-import <transcript-file|-> [--prompt-only]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let prompt_only = args.iter().any(|arg| arg == "--prompt-only");
    let path = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .ok_or(USAGE)?;

    let contents = if path == "-" {
        let mut buffer = String::new();
        tokio::io::stdin().read_to_string(&mut buffer).await?;
        buffer
    } else {
        tokio::fs::read_to_string(path).await?
    };

    // Fetcher responses wrap the transcript in an envelope
    let payload = serde_json::from_str::<serde_json::Value>(&contents)
        .ok()
        .and_then(|value| TranscriptPayload::from_envelope(&value))
        .unwrap_or(TranscriptPayload::Text(contents));

    let mut builder = RecipeExtractor::builder().payload(payload);
    if prompt_only {
        builder = builder.prompt_only();
    }

    match builder.build().await {
        Ok(ExtractResult::Recipe(recipe)) => {
            println!("{}", serde_json::to_string_pretty(&recipe)?);
            Ok(())
        }
        Ok(ExtractResult::Prompt(prompt)) => {
            println!("{}", prompt);
            Ok(())
        }
        Err(e) => {
            error!("Extraction failed: {}", e);
            Err(e.into())
        }
    }
}
