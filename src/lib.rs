mod clients;
mod config;
mod diagnostics;
mod error;
mod logging;
mod normalizer;
mod parser;
mod pipeline;
mod request;
mod schema;
mod utils;

pub use clients::{
    CompletionClient, ExtractionResponse, MockClient, OllamaClient, OpenAiCompatClient,
};
pub use config::ClientConfig;
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, MemorySink, TracingSink};
pub use error::ExtractError;
pub use logging::{log_record_card, setup_logging, LogConfig, LogLevelGuard};
pub use normalizer::{NormalizedText, Normalizer};
pub use parser::{parse_and_validate, ExtractionResult};
pub use pipeline::PageExtractor;
pub use request::ExtractionRequest;
pub use schema::{Field, FieldSchema, FieldSchemaBuilder};

use serde_json::{Map, Value};

/// A fetched page handed in by the surrounding crawler: its source URL plus
/// the raw markup body. Immutable for the duration of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Page {
    pub url: String,
    pub body: String,
}

impl Page {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }
}

/// Terminal artifact of one page's extraction: a flat mapping from field
/// name to value, always containing the `url` key. Serializes transparently
/// as the underlying object, ready for line-delimited output.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct OutputRecord {
    fields: Map<String, Value>,
}

impl OutputRecord {
    /// Merges a page URL with the extracted entries. Extracted keys take
    /// precedence, so a schema field named `url` overwrites the page URL.
    pub fn from_parts(url: &str, result: ExtractionResult) -> Self {
        let mut fields = Map::new();
        fields.insert("url".to_string(), Value::String(url.to_string()));
        for (name, value) in result.into_entries() {
            fields.insert(name, value);
        }
        Self { fields }
    }

    /// The `url` entry, or an empty string if an extracted `url` value was
    /// not a string.
    pub fn url(&self) -> &str {
        self.fields
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}
