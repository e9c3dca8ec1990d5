//! Offline walkthrough of the extraction pipeline using the mock client.
//!
//! Run with: cargo run --example extract_book

use llm_extract::{FieldSchema, MockClient, Page, PageExtractor};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let schema = FieldSchema::builder()
        .field("name", "Product name")
        .field("price", "Product price as a number, without the currency symbol")
        .build()?;

    let page = Page::new(
        "http://books.toscrape.com/catalogue/dune_151/index.html",
        r#"<html>
            <body>
                <article class="product_page">
                    <h1>Dune</h1>
                    <p class="price_color">£12.99</p>
                    <p class="availability">In stock (22 available)</p>
                </article>
            </body>
        </html>"#,
    );

    // A real deployment would plug in OllamaClient or OpenAiCompatClient.
    let client = Arc::new(MockClient::returning(
        r#"{"name": "Dune", "price": "12.99"}"#,
    ));
    let extractor = PageExtractor::new(client);

    let record = extractor.process(&page, &schema).await?;
    println!("{}", serde_json::to_string(&record)?);

    Ok(())
}
