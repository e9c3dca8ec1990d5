//! Extracts product fields from a live page through a local Ollama server.
//!
//! The page fetch itself stays outside the pipeline: any HTTP client (or a
//! full crawler) can supply the raw markup.
//!
//! Run with: OLLAMA_MODEL=mistral cargo run --example ollama_extraction

use llm_extract::{ClientConfig, FieldSchema, LogConfig, Page, PageExtractor, setup_logging};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging(LogConfig {
        console_output: true,
        file_output: false,
        ..Default::default()
    });

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://books.toscrape.com/catalogue/sharp-objects_997/index.html".to_string());

    let body = reqwest::get(&url).await?.text().await?;
    let page = Page::new(url, body);

    let schema = FieldSchema::builder()
        .field("name", "Product name")
        .field("price", "Product price as a number, without the currency symbol")
        .build()?;

    let client = Arc::new(ClientConfig::ollama_from_env()?);
    let extractor = PageExtractor::new(client);

    match extractor.process(&page, &schema).await {
        Ok(record) => println!("{}", serde_json::to_string(&record)?),
        Err(e) => {
            e.log();
            return Err(e.into());
        }
    }

    Ok(())
}
