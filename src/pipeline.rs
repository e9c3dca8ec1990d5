//! Page-level orchestration
//!
//! [`PageExtractor`] ties the pipeline together per fetched page:
//! normalize → compose → complete → parse/validate → merge. Each `process`
//! invocation owns its intermediates exclusively; the extractor itself is
//! stateless across calls and safe to share between concurrent pages.

use crate::parser::parse_and_validate;
use crate::{
    CompletionClient, DiagnosticSink, ExtractError, ExtractionRequest, FieldSchema, Normalizer,
    OutputRecord, Page, TracingSink,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct PageExtractor {
    client: Arc<dyn CompletionClient>,
    normalizer: Normalizer,
    sink: Arc<dyn DiagnosticSink>,
}

impl PageExtractor {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            normalizer: Normalizer::new(),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Extracts the schema's fields from one page.
    ///
    /// Transport failures propagate so the surrounding crawler can apply
    /// its own retry policy; malformed service output instead degrades to
    /// a record containing only the page URL. When an extracted key
    /// collides with the literal `url` key, the extracted value wins.
    ///
    /// Dropping the returned future cancels the extraction; no partial
    /// record is ever produced.
    #[instrument(level = "debug", skip_all, fields(url = %page.url))]
    pub async fn process(
        &self,
        page: &Page,
        schema: &FieldSchema,
    ) -> Result<OutputRecord, ExtractError> {
        debug!(
            markup_length = page.body.len(),
            field_count = schema.len(),
            "Starting page extraction"
        );

        let text = self.normalizer.normalize(&page.body);
        let request = ExtractionRequest::compose(schema, &text);
        let response = self.client.complete(&request).await?;
        let result = parse_and_validate(&response, schema, &page.url, self.sink.as_ref());

        debug!(
            service = %self.client.name(),
            extracted_fields = result.len(),
            "Page extraction finished"
        );
        Ok(OutputRecord::from_parts(&page.url, result))
    }

    /// Processes several pages concurrently against one schema.
    ///
    /// Results come back in input order; pages share no state, so a failure
    /// on one page never affects the others.
    pub async fn process_batch(
        &self,
        pages: &[Page],
        schema: &FieldSchema,
    ) -> Vec<Result<OutputRecord, ExtractError>> {
        let futures: Vec<_> = pages.iter().map(|page| self.process(page, schema)).collect();
        join_all(futures).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockClient;

    fn test_schema() -> FieldSchema {
        FieldSchema::builder()
            .field("name", "Product name")
            .field("price", "Product price as a number, without the currency symbol")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_process_merges_url_and_fields() {
        let client = Arc::new(MockClient::returning(
            r#"{"name": "Dune", "price": "12.99"}"#,
        ));
        let extractor = PageExtractor::new(client);
        let page = Page::new(
            "http://example.test/book/1",
            "<html><h1>Dune</h1>Price: £12.99</html>",
        );

        let record = extractor.process(&page, &test_schema()).await.unwrap();
        assert_eq!(record.url(), "http://example.test/book/1");
        assert_eq!(record.get("name").unwrap().as_str().unwrap(), "Dune");
        assert_eq!(record.get("price").unwrap().as_str().unwrap(), "12.99");
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let client = Arc::new(MockClient::failing("connection reset"));
        let extractor = PageExtractor::new(client);
        let page = Page::new("http://example.test/book/1", "<html></html>");

        let err = extractor.process(&page, &test_schema()).await.unwrap_err();
        assert!(matches!(err, ExtractError::ServiceError { .. }));
    }

    #[tokio::test]
    async fn test_extracted_url_key_wins_over_page_url() {
        let client = Arc::new(MockClient::returning(
            r#"{"url": "http://elsewhere.test", "name": "Dune"}"#,
        ));
        let extractor = PageExtractor::new(client);
        let page = Page::new("http://example.test/book/1", "<html></html>");

        let record = extractor.process(&page, &test_schema()).await.unwrap();
        assert_eq!(record.url(), "http://elsewhere.test");
    }

    #[tokio::test]
    async fn test_process_batch_keeps_input_order() {
        let client = Arc::new(MockClient::returning(r#"{"name": "Dune"}"#));
        let extractor = PageExtractor::new(client);
        let pages = vec![
            Page::new("http://example.test/book/1", "<html>a</html>"),
            Page::new("http://example.test/book/2", "<html>b</html>"),
        ];

        let records = extractor.process_batch(&pages, &test_schema()).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().url(), "http://example.test/book/1");
        assert_eq!(records[1].as_ref().unwrap().url(), "http://example.test/book/2");
    }
}
